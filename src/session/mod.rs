//! Game session: the player's side of the world
//!
//! Owns the player's HP, inventory, and the enemies still on the map, and
//! runs at most one encounter at a time. Questions come from the bank when
//! it is ready and straight from the source otherwise.

pub mod enemy;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::battle::engagement::{BattleInput, BattlePhase, Engagement};
use crate::battle::events::{BattleEventLog, BattleEventType, BattleOutcome, EncounterResult};
use crate::battle::hp::{HitPoints, HpStep, HpTier, Vitals};
use crate::battle::inventory::{Inventory, InventoryItem, ItemKind, RewardAssets};
use crate::battle::spell::Spell;
use crate::core::config::GameConfig;
use crate::core::error::{QuizError, Result};
use crate::core::types::EnemyId;
use crate::quiz::bank::QuestionBank;
use crate::quiz::question::AgeLevel;
use crate::quiz::source::QuestionSource;

pub use enemy::{default_roster, Enemy};

/// What the session reports when an encounter closes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncounterReport {
    pub enemy: EnemyId,
    pub result: EncounterResult,
    pub reward: Option<InventoryItem>,
}

struct Encounter {
    enemy: Enemy,
    engagement: Engagement,
}

pub struct GameSession<S: QuestionSource> {
    config: GameConfig,
    bank: QuestionBank<Arc<S>>,
    source: Arc<S>,
    material: String,
    age_level: AgeLevel,
    player: Vitals,
    inventory: Inventory,
    reward_assets: RewardAssets,
    enemies: Vec<Enemy>,
    defeated: usize,
    encounter: Option<Encounter>,
}

impl<S: QuestionSource> GameSession<S> {
    pub fn new(source: S, config: GameConfig, material: impl Into<String>, age_level: AgeLevel) -> Self {
        let source = Arc::new(source);
        let bank = QuestionBank::new(Arc::clone(&source), config.bank.clone());
        Self::with_bank(source, bank, config, material.into(), age_level)
    }

    /// Deterministic question selection for reproducible runs
    pub fn with_seed(
        source: S,
        config: GameConfig,
        material: impl Into<String>,
        age_level: AgeLevel,
        seed: u64,
    ) -> Self {
        let source = Arc::new(source);
        let bank = QuestionBank::with_seed(Arc::clone(&source), config.bank.clone(), seed);
        Self::with_bank(source, bank, config, material.into(), age_level)
    }

    fn with_bank(
        source: Arc<S>,
        bank: QuestionBank<Arc<S>>,
        config: GameConfig,
        material: String,
        age_level: AgeLevel,
    ) -> Self {
        Self {
            config,
            bank,
            source,
            material,
            age_level,
            player: Vitals::default(),
            inventory: Inventory::new(),
            reward_assets: RewardAssets::default(),
            enemies: default_roster(),
            defeated: 0,
            encounter: None,
        }
    }

    pub fn with_enemies(mut self, enemies: Vec<Enemy>) -> Self {
        self.enemies = enemies;
        self
    }

    pub fn with_reward_assets(mut self, assets: RewardAssets) -> Self {
        self.reward_assets = assets;
        self
    }

    /// Build the question bank from the session's study material.
    /// Without material, encounters deal fallback questions directly.
    pub async fn prepare_questions(&self) {
        if self.material.trim().is_empty() {
            info!("No study material supplied, skipping question bank");
            return;
        }
        self.bank
            .initialize(&self.material, self.age_level, self.config.bank.target_count)
            .await;
    }

    pub fn bank(&self) -> &QuestionBank<Arc<S>> {
        &self.bank
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player_hp(&self) -> HpTier {
        self.player.hp()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn defeated_count(&self) -> usize {
        self.defeated
    }

    pub fn in_encounter(&self) -> bool {
        self.encounter.is_some()
    }

    pub fn engagement(&self) -> Option<&Engagement> {
        self.encounter.as_ref().map(|e| &e.engagement)
    }

    pub fn active_enemy(&self) -> Option<&Enemy> {
        self.encounter.as_ref().map(|e| &e.enemy)
    }

    /// Something is still moving or scheduled in the current encounter
    pub fn is_animating(&self) -> bool {
        self.engagement().is_some_and(|e| e.is_animating())
    }

    /// Start an encounter with an enemy on the map
    pub fn engage(&mut self, enemy_id: EnemyId) -> Result<()> {
        if self.encounter.is_some() {
            return Err(QuizError::EncounterInProgress);
        }
        let enemy = self
            .enemies
            .iter()
            .find(|e| e.id == enemy_id)
            .cloned()
            .ok_or(QuizError::UnknownEnemy(enemy_id))?;

        info!(enemy = %enemy.title, "Encounter started");
        self.encounter = Some(Encounter {
            enemy,
            engagement: Engagement::new(self.config.battle.clone()),
        });
        Ok(())
    }

    /// Ready a spell: deal a question for it.
    ///
    /// Ignored (empty log) while a question is outstanding or the outcome is
    /// already decided, so no question is drawn for a cast that cannot land.
    pub async fn cast(&mut self, spell: Spell) -> Result<BattleEventLog> {
        let can_cast = self
            .encounter
            .as_ref()
            .ok_or(QuizError::NoActiveEncounter)?
            .engagement
            .can_cast();
        if !can_cast {
            debug!(?spell, "cast ignored");
            return Ok(BattleEventLog::new());
        }

        let banked = if self.bank.is_ready() {
            self.bank.next_question()
        } else {
            None
        };
        let question = match banked {
            Some(question) => question,
            None => self.source.generate(&self.material, self.age_level).await,
        };

        // The encounter may have been closed while the question was generated
        let Some(encounter) = self.encounter.as_mut() else {
            return Ok(BattleEventLog::new());
        };
        Ok(encounter
            .engagement
            .apply(BattleInput::Cast { spell, question }, &mut self.player))
    }

    /// Answer the outstanding question. The result goes into the bank history.
    pub fn answer(&mut self, choice: usize) -> Result<BattleEventLog> {
        let encounter = self.encounter.as_mut().ok_or(QuizError::NoActiveEncounter)?;
        let log = encounter
            .engagement
            .apply(BattleInput::Answer(choice), &mut self.player);

        for event in log.iter() {
            if let BattleEventType::Answered {
                question, correct, ..
            } = event
            {
                self.bank.record_result(question, *correct);
            }
        }
        Ok(log)
    }

    /// Advance the encounter by one frame. Closes it once the outcome is in.
    pub fn tick(&mut self, elapsed_ms: u64) -> BattleEventLog {
        let Some(encounter) = self.encounter.as_mut() else {
            return BattleEventLog::new();
        };
        let mut log = encounter
            .engagement
            .apply(BattleInput::Tick { elapsed_ms }, &mut self.player);

        let result = match log.outcome() {
            Some(BattleOutcome::Victory) => Some(EncounterResult::Win),
            Some(BattleOutcome::Defeat) => Some(EncounterResult::Loss),
            _ => None,
        };
        let tick = encounter.engagement.tick();
        if let Some(result) = result {
            let Some(closed) = self.encounter.take() else {
                return log;
            };
            let report = self.close_encounter(closed.enemy.id, result);
            log.push(
                BattleEventType::EncounterEnded {
                    result: report.result,
                    reward: report.reward,
                },
                format!("Encounter ended: {:?}", result),
                tick,
            );
        }
        log
    }

    /// Leave the encounter without a reward
    pub fn run_away(&mut self) -> Result<EncounterReport> {
        let encounter = self.encounter.take().ok_or(QuizError::NoActiveEncounter)?;
        Ok(self.close_encounter(encounter.enemy.id, EncounterResult::Fled))
    }

    fn close_encounter(&mut self, enemy: EnemyId, result: EncounterResult) -> EncounterReport {
        let reward = match result {
            EncounterResult::Win => {
                self.enemies.retain(|e| e.id != enemy);
                self.defeated += 1;
                Some(
                    self.inventory
                        .grant_reward(self.config.rewards.potion_cap, &self.reward_assets),
                )
            }
            EncounterResult::Loss | EncounterResult::Fled => {
                let floor = HpTier::from_value(self.config.rewards.mercy_floor_hp)
                    .unwrap_or(HpTier::Half);
                self.player.raise_to(floor);
                None
            }
        };

        info!(?result, ?enemy, hp = self.player.hp().value(), "Encounter closed");
        EncounterReport {
            enemy,
            result,
            reward,
        }
    }

    /// Use the inventory item at `index`
    ///
    /// Only potions are usable, only during an encounter, and not at full HP.
    pub fn use_item(&mut self, index: usize) -> Result<HpTier> {
        let in_battle = self
            .engagement()
            .is_some_and(|e| e.phase() != BattlePhase::Terminal);
        if !in_battle {
            return Err(QuizError::InvalidItemUse(
                "You can only use items during battle!".into(),
            ));
        }

        let item = self
            .inventory
            .get(index)
            .ok_or_else(|| QuizError::InvalidItemUse(format!("No item in slot {}", index)))?;
        if item.kind != ItemKind::Potion {
            return Err(QuizError::InvalidItemUse(format!(
                "{:?} cannot be used",
                item.kind
            )));
        }
        if self.player.hp().is_full() {
            return Err(QuizError::InvalidItemUse(
                "You are already at full health!".into(),
            ));
        }

        let hp = self.player.step(HpStep::Heal);
        self.inventory.remove(index);
        info!(hp = hp.value(), "Potion used");
        Ok(hp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::constants::FRAME_MS;
    use crate::quiz::fallback::FallbackSource;

    fn session() -> GameSession<FallbackSource> {
        GameSession::with_seed(
            FallbackSource::with_seed(5),
            GameConfig::default(),
            "",
            AgeLevel::EarlyElementary,
            5,
        )
    }

    #[test]
    fn test_engage_unknown_enemy() {
        let mut session = session();
        assert!(matches!(
            session.engage(EnemyId(99)),
            Err(QuizError::UnknownEnemy(EnemyId(99)))
        ));
    }

    #[test]
    fn test_engage_twice_rejected() {
        let mut session = session();
        session.engage(EnemyId(1)).unwrap();
        assert!(matches!(
            session.engage(EnemyId(2)),
            Err(QuizError::EncounterInProgress)
        ));
    }

    #[tokio::test]
    async fn test_cast_without_encounter_is_error() {
        let mut session = session();
        assert!(matches!(
            session.cast(Spell::Fireball).await,
            Err(QuizError::NoActiveEncounter)
        ));
    }

    #[tokio::test]
    async fn test_unbanked_cast_uses_source() {
        let mut session = session();
        session.prepare_questions().await;
        assert!(!session.bank().is_ready());

        session.engage(EnemyId(1)).unwrap();
        let log = session.cast(Spell::Heal).await.unwrap();
        assert!(log
            .iter()
            .any(|e| matches!(e, BattleEventType::QuestionDealt { spell: Spell::Heal, .. })));
    }

    #[tokio::test]
    async fn test_answer_recorded_in_bank() {
        let mut session = session();
        session.engage(EnemyId(1)).unwrap();
        session.cast(Spell::Fireball).await.unwrap();
        session.answer(0).unwrap();
        session.answer(1).unwrap();

        assert_eq!(session.bank().stats().attempts, 1);
    }

    #[test]
    fn test_item_use_outside_battle_rejected() {
        let mut session = session();
        session
            .inventory_mut()
            .grant_reward(5, &RewardAssets::default());
        assert!(matches!(
            session.use_item(0),
            Err(QuizError::InvalidItemUse(_))
        ));
        assert_eq!(session.inventory().len(), 1);
    }

    #[test]
    fn test_item_use_at_full_hp_rejected() {
        let mut session = session();
        session
            .inventory_mut()
            .grant_reward(5, &RewardAssets::default());
        session.engage(EnemyId(1)).unwrap();
        assert!(matches!(
            session.use_item(0),
            Err(QuizError::InvalidItemUse(_))
        ));
        assert_eq!(session.inventory().len(), 1);
    }

    #[test]
    fn test_coin_cannot_be_used() {
        let mut session = session();
        session
            .inventory_mut()
            .grant_reward(0, &RewardAssets::default());
        session.player.step(HpStep::Damage);
        session.engage(EnemyId(1)).unwrap();
        assert!(session.use_item(0).is_err());
    }

    #[test]
    fn test_potion_heals_one_tier_and_is_consumed() {
        let mut session = session();
        session
            .inventory_mut()
            .grant_reward(5, &RewardAssets::default());
        session.player.step(HpStep::Damage);
        session.player.step(HpStep::Damage);
        session.engage(EnemyId(1)).unwrap();

        assert_eq!(session.use_item(0).unwrap(), HpTier::ThreeQuarters);
        assert!(session.inventory().is_empty());
    }

    #[test]
    fn test_run_away_applies_mercy_floor() {
        let mut session = session();
        for _ in 0..4 {
            session.player.step(HpStep::Damage);
        }
        session.engage(EnemyId(3)).unwrap();
        let report = session.run_away().unwrap();

        assert_eq!(report.result, EncounterResult::Fled);
        assert!(report.reward.is_none());
        assert_eq!(session.player_hp(), HpTier::Half);
        assert_eq!(session.enemies().len(), 8);
        assert!(!session.in_encounter());
    }

    #[test]
    fn test_tick_without_encounter_is_quiet() {
        let mut session = session();
        assert!(session.tick(FRAME_MS).is_empty());
        assert!(session.run_away().is_err());
    }
}
