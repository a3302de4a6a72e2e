//! Enemies placed on the roaming map

use serde::{Deserialize, Serialize};

use crate::core::types::EnemyId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub title: String,
    pub color: String,
    pub x: f32,
    pub y: f32,
}

impl Enemy {
    pub fn new(id: u32, title: &str, color: &str, x: f32, y: f32) -> Self {
        Self {
            id: EnemyId(id),
            title: title.to_string(),
            color: color.to_string(),
            x,
            y,
        }
    }
}

/// The starting map: eight enemies on a 3-column grid
pub fn default_roster() -> Vec<Enemy> {
    vec![
        Enemy::new(1, "Blue Room", "blue", 150.0, 100.0),
        Enemy::new(2, "Green Forest", "green", 400.0, 100.0),
        Enemy::new(3, "Purple Cave", "purple", 650.0, 100.0),
        Enemy::new(4, "Orange Sunset", "orange", 150.0, 250.0),
        Enemy::new(5, "Red Mountain", "red", 400.0, 250.0),
        Enemy::new(6, "Yellow Desert", "yellow", 650.0, 250.0),
        Enemy::new(7, "Cyan Lake", "cyan", 150.0, 400.0),
        Enemy::new(8, "Pink Valley", "pink", 400.0, 400.0),
    ]
}
