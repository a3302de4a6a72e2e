//! Encounter engine - question-gated spell duels
//!
//! One engagement is a small state machine driven by three inputs: a cast
//! deals a question, an answer resolves it, and frame ticks advance the
//! timers and projectiles. Every state change comes back as a
//! `BattleEventLog` for the front end to render.

pub mod constants;
pub mod engagement;
pub mod events;
pub mod hp;
pub mod inventory;
pub mod projectile;
pub mod spell;

// Re-exports for convenient access
pub use constants::*;
pub use engagement::{BattleInput, BattlePhase, Engagement};
pub use events::{
    BattleEvent, BattleEventLog, BattleEventType, BattleOutcome, Combatant, EncounterResult,
};
pub use hp::{HitPoints, HpStep, HpTier, Vitals};
pub use inventory::{Inventory, InventoryItem, ItemKind, RewardAssets};
pub use projectile::Projectile;
pub use spell::{ProjectileColor, Spell};
