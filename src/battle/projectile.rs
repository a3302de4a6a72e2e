//! Spell projectiles in flight toward the enemy

use serde::{Deserialize, Serialize};

use crate::battle::spell::ProjectileColor;
use crate::core::types::ProjectileId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub x: f32,
    pub y: f32,
    pub color: ProjectileColor,
    /// Set once the projectile has struck; it is removed the same frame
    pub stopped: bool,
}

impl Projectile {
    pub fn new(x: f32, y: f32, color: ProjectileColor) -> Self {
        Self {
            id: ProjectileId::new(),
            x,
            y,
            color,
            stopped: false,
        }
    }

    /// Position after one more frame at `speed`
    pub fn next_x(&self, speed: f32) -> f32 {
        self.x + speed
    }

    /// Whether the leading edge at `x` has reached `target_left`
    pub fn reaches(x: f32, reach: f32, target_left: f32) -> bool {
        x + reach >= target_left
    }
}
