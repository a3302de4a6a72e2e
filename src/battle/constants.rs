//! Encounter rules that are not tunable
//!
//! Timings and geometry are in `core::config::BattleConfig`.

/// HP moved by one damage or heal event
pub const HP_TIER_STEP: u8 = 25;

/// HP at the top tier
pub const MAX_HP: u8 = 100;

/// Projectiles spawn this far across the arena, in front of the caster
pub const PROJECTILE_SPAWN_X_FRACTION: f32 = 0.2;

/// Frame length used by drivers that do not measure real time (~60 fps)
pub const FRAME_MS: u64 = 16;
