//! Events emitted by an encounter for the front-end

use serde::{Deserialize, Serialize};

use crate::battle::hp::HpTier;
use crate::battle::inventory::InventoryItem;
use crate::battle::projectile::Projectile;
use crate::battle::spell::Spell;
use crate::core::types::{ProjectileId, Tick};
use crate::quiz::question::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combatant {
    Player,
    Enemy,
}

/// Engagement result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattleOutcome {
    #[default]
    Undecided,
    Victory,
    Defeat,
}

/// How an encounter ended, as seen by the game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterResult {
    Win,
    Loss,
    Fled,
}

/// Log entry for battle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleEvent {
    pub tick: Tick,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BattleEventType {
    QuestionDealt { spell: Spell, question: Question },
    Answered { question: Question, choice: usize, correct: bool },
    ProjectileSpawned { projectile: Projectile },
    ProjectileMoved { id: ProjectileId, x: f32 },
    ProjectileHit { id: ProjectileId },
    ProjectileDespawned { id: ProjectileId },
    HpChanged { combatant: Combatant, hp: HpTier },
    Hurt { combatant: Combatant },
    HurtCleared { combatant: Combatant },
    OutcomeDecided { outcome: BattleOutcome },
    EncounterEnded { result: EncounterResult, reward: Option<InventoryItem> },
}

/// Events produced by one input
#[derive(Debug, Clone, Default)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: BattleEventType, description: String, tick: Tick) {
        self.events.push(BattleEvent {
            tick,
            event_type,
            description,
        });
    }

    pub fn extend(&mut self, other: BattleEventLog) {
        self.events.extend(other.events);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &BattleEventType> {
        self.events.iter().map(|e| &e.event_type)
    }

    /// The outcome decided in this log, if any
    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.iter().find_map(|e| match e {
            BattleEventType::OutcomeDecided { outcome } => Some(*outcome),
            _ => None,
        })
    }

    /// Latest HP reported for a combatant in this log
    pub fn last_hp(&self, combatant: Combatant) -> Option<HpTier> {
        self.iter().rev().find_map(|e| match e {
            BattleEventType::HpChanged { combatant: c, hp } if *c == combatant => Some(*hp),
            _ => None,
        })
    }
}
