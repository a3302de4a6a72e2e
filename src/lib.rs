//! Quiz Quest - study material turned into spell battles
//!
//! `quiz` builds and serves the question bank, `llm` talks to the text
//! generation service, `battle` runs a single encounter and `session` ties
//! them to the player's HP, inventory and enemy roster.

pub mod battle;
pub mod core;
pub mod llm;
pub mod quiz;
pub mod session;
