//! Game configuration with documented defaults
//!
//! Tunables live here; fixed rules of the encounter (tier values, spell
//! colors) live in `battle::constants`. A config file only needs the
//! sections it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{QuizError, Result};

/// Question bank tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    /// Questions requested per `initialize` when the caller does not say
    pub target_count: usize,

    /// Concurrent generation requests per batch
    ///
    /// Batches run one after another, so this is also the cap on
    /// outbound requests in flight at any moment.
    pub batch_size: usize,

    /// Overlap ratio above which two questions count as duplicates
    pub similarity_threshold: f64,

    /// Number of weak-area keywords used to bias selection
    pub weak_keyword_count: usize,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            target_count: 15,
            batch_size: 5,
            similarity_threshold: 0.8,
            weak_keyword_count: 5,
        }
    }
}

/// Encounter timing and arena geometry
///
/// All delays are in milliseconds of elapsed frame time, all positions in
/// arena pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// How long the chosen answer stays on screen before it resolves
    pub answer_reveal_ms: u64,

    /// Delay between a wrong answer resolving and the caster taking damage
    pub wrong_answer_delay_ms: u64,

    /// Duration of the red "hurt" pulse on either combatant
    pub hurt_flash_ms: u64,

    /// Delay between HP reaching zero and the outcome being reported
    pub outcome_delay_ms: u64,

    /// Horizontal projectile movement per frame
    pub projectile_speed: f32,

    /// Distance from a projectile's x to its leading edge
    pub projectile_reach: f32,

    pub arena_width: f32,
    pub arena_height: f32,

    /// Left edge of the enemy's bounding box
    pub enemy_left: f32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            answer_reveal_ms: 1500,
            wrong_answer_delay_ms: 300,
            hurt_flash_ms: 200,
            outcome_delay_ms: 500,
            projectile_speed: 10.0,
            projectile_reach: 10.0,
            arena_width: 1280.0,
            arena_height: 720.0,
            enemy_left: 960.0,
        }
    }
}

/// Reward and recovery rules applied when an encounter ends
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Potions held before further rewards turn into coins
    pub potion_cap: usize,

    /// HP the player is raised to after losing or fleeing
    pub mercy_floor_hp: u8,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            potion_cap: 5,
            mercy_floor_hp: 50,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub bank: BankConfig,
    pub battle: BattleConfig,
    pub rewards: RewardConfig,
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.bank.batch_size == 0 {
            return Err(QuizError::ConfigError("bank.batch_size must be > 0".into()));
        }

        if !(0.0..=1.0).contains(&self.bank.similarity_threshold) {
            return Err(QuizError::ConfigError(format!(
                "bank.similarity_threshold ({}) must be within 0.0..=1.0",
                self.bank.similarity_threshold
            )));
        }

        if self.battle.projectile_speed <= 0.0 {
            return Err(QuizError::ConfigError(
                "battle.projectile_speed must be positive".into(),
            ));
        }

        // Projectiles spawn at 20% width and must have room to fly
        if self.battle.enemy_left <= self.battle.arena_width * 0.2
            || self.battle.enemy_left > self.battle.arena_width
        {
            return Err(QuizError::ConfigError(format!(
                "battle.enemy_left ({}) must lie between the spawn point and arena_width ({})",
                self.battle.enemy_left, self.battle.arena_width
            )));
        }

        if !matches!(self.rewards.mercy_floor_hp, 0 | 25 | 50 | 75 | 100) {
            return Err(QuizError::ConfigError(format!(
                "rewards.mercy_floor_hp ({}) must be one of 0, 25, 50, 75, 100",
                self.rewards.mercy_floor_hp
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            [bank]
            target_count = 8

            [rewards]
            potion_cap = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.bank.target_count, 8);
        assert_eq!(config.bank.batch_size, 5);
        assert_eq!(config.rewards.potion_cap, 3);
        assert_eq!(config.battle.outcome_delay_ms, 500);
    }

    #[test]
    fn test_rejects_zero_batch_size() {
        let result = GameConfig::from_toml_str("[bank]\nbatch_size = 0\n");
        assert!(matches!(result, Err(QuizError::ConfigError(_))));
    }

    #[test]
    fn test_rejects_off_tier_mercy_floor() {
        let mut config = GameConfig::default();
        config.rewards.mercy_floor_hp = 40;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_enemy_behind_spawn_point() {
        let mut config = GameConfig::default();
        config.battle.enemy_left = 10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let result = GameConfig::from_toml_str("[bank\ntarget_count = ");
        assert!(matches!(result, Err(QuizError::TomlError(_))));
    }
}
