//! Tiered hit points
//!
//! HP only ever sits on one of five tiers and moves one tier per event.

use serde::{Deserialize, Serialize};

use crate::battle::constants::HP_TIER_STEP;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum HpTier {
    Zero,
    Quarter,
    Half,
    ThreeQuarters,
    #[default]
    Full,
}

impl HpTier {
    pub const ALL: [HpTier; 5] = [
        HpTier::Zero,
        HpTier::Quarter,
        HpTier::Half,
        HpTier::ThreeQuarters,
        HpTier::Full,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Numeric HP: 0, 25, 50, 75 or 100
    pub fn value(self) -> u8 {
        self.index() as u8 * HP_TIER_STEP
    }

    pub fn from_value(value: u8) -> Option<Self> {
        if value % HP_TIER_STEP != 0 {
            return None;
        }
        Self::ALL.get((value / HP_TIER_STEP) as usize).copied()
    }

    /// One tier lower, stopping at zero
    pub fn step_down(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }

    /// One tier higher, stopping at full
    pub fn step_up(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }

    pub fn apply(self, step: HpStep) -> Self {
        match step {
            HpStep::Damage => self.step_down(),
            HpStep::Heal => self.step_up(),
        }
    }

    pub fn is_zero(self) -> bool {
        self == HpTier::Zero
    }

    pub fn is_full(self) -> bool {
        self == HpTier::Full
    }
}

/// Direction of a single HP change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HpStep {
    Damage,
    Heal,
}

/// Narrow access to HP someone else owns
///
/// The engagement mutates player HP only through this trait, one tier at a
/// time.
pub trait HitPoints {
    fn hp(&self) -> HpTier;

    /// Move one tier and return the new value
    fn step(&mut self, step: HpStep) -> HpTier;
}

/// Plain HP holder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    hp: HpTier,
}

impl Vitals {
    pub fn new(hp: HpTier) -> Self {
        Self { hp }
    }

    /// Raise HP to at least `floor`. Never lowers it.
    pub fn raise_to(&mut self, floor: HpTier) {
        self.hp = self.hp.max(floor);
    }
}

impl HitPoints for Vitals {
    fn hp(&self) -> HpTier {
        self.hp
    }

    fn step(&mut self, step: HpStep) -> HpTier {
        self.hp = self.hp.apply(step);
        self.hp
    }
}
