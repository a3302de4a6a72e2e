use thiserror::Error;

use crate::core::types::EnemyId;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Cannot use item: {0}")]
    InvalidItemUse(String),

    #[error("No encounter is active")]
    NoActiveEncounter,

    #[error("An encounter is already in progress")]
    EncounterInProgress,

    #[error("Enemy not found: {0:?}")]
    UnknownEnemy(EnemyId),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;
