pub mod config;
pub mod error;
pub mod types;

pub use config::{BankConfig, BattleConfig, GameConfig, RewardConfig};
pub use error::{QuizError, Result};
