//! Text-generation client and the question wire format
//!
//! The LLM only writes question text. Selection, dedup, and scoring stay in
//! `quiz`.

pub mod client;
pub mod parser;
pub mod prompt;

pub use client::LlmClient;
pub use parser::{parse_question, QuestionPayload};
