//! Encounter state machine
//!
//! Idle -> AwaitingAnswer -> Resolving -> Idle, until one side's HP reaches
//! zero and the outcome latches. Every change comes through `apply`, driven
//! by casts, answers, and frame ticks from whatever owns the clock. Nothing
//! here sleeps or renders.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battle::constants::PROJECTILE_SPAWN_X_FRACTION;
use crate::battle::events::{BattleEventLog, BattleEventType, BattleOutcome, Combatant};
use crate::battle::hp::{HitPoints, HpStep, HpTier};
use crate::battle::projectile::Projectile;
use crate::battle::spell::Spell;
use crate::core::config::BattleConfig;
use crate::core::types::Tick;
use crate::quiz::question::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    /// No question outstanding
    #[default]
    Idle,
    /// One question dealt and waiting for the player's choice
    AwaitingAnswer,
    /// Answer locked in; result shown before it takes effect
    Resolving,
    /// Outcome decided; all further input is ignored
    Terminal,
}

/// Input to the state machine
#[derive(Debug, Clone)]
pub enum BattleInput {
    /// Player picked a spell and a question was dealt for it
    Cast { spell: Spell, question: Question },
    /// Player chose option `n` of the outstanding question
    Answer(usize),
    /// One frame elapsed
    Tick { elapsed_ms: u64 },
}

#[derive(Debug, Clone)]
struct DealtQuestion {
    spell: Spell,
    question: Question,
}

#[derive(Debug, Clone, Copy)]
enum TimerKind {
    RevealAnswer { spell: Spell, correct: bool },
    PlayerPenalty,
    ClearHurt(Combatant),
    LatchOutcome(BattleOutcome),
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    remaining_ms: u64,
    kind: TimerKind,
}

/// One player-vs-enemy encounter
#[derive(Debug, Clone)]
pub struct Engagement {
    config: BattleConfig,
    phase: BattlePhase,
    outstanding: Option<DealtQuestion>,
    enemy_hp: HpTier,
    projectiles: Vec<Projectile>,
    timers: Vec<Timer>,
    player_hurt: bool,
    enemy_hurt: bool,
    outcome: BattleOutcome,
    /// Outcome scheduled but not yet reported
    pending_outcome: Option<BattleOutcome>,
    tick: Tick,
}

impl Engagement {
    pub fn new(config: BattleConfig) -> Self {
        Self::with_enemy_hp(config, HpTier::Full)
    }

    pub fn with_enemy_hp(config: BattleConfig, enemy_hp: HpTier) -> Self {
        Self {
            config,
            phase: BattlePhase::Idle,
            outstanding: None,
            enemy_hp,
            projectiles: Vec::new(),
            timers: Vec::new(),
            player_hurt: false,
            enemy_hurt: false,
            outcome: BattleOutcome::Undecided,
            pending_outcome: None,
            tick: 0,
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn outcome(&self) -> BattleOutcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.phase == BattlePhase::Terminal
    }

    pub fn enemy_hp(&self) -> HpTier {
        self.enemy_hp
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn is_hurt(&self, combatant: Combatant) -> bool {
        match combatant {
            Combatant::Player => self.player_hurt,
            Combatant::Enemy => self.enemy_hurt,
        }
    }

    /// The question waiting for an answer, with the spell it was dealt for
    pub fn outstanding_question(&self) -> Option<(Spell, &Question)> {
        self.outstanding
            .as_ref()
            .map(|dealt| (dealt.spell, &dealt.question))
    }

    /// A cast would be accepted right now
    pub fn can_cast(&self) -> bool {
        self.phase == BattlePhase::Idle && self.pending_outcome.is_none()
    }

    /// Anything still moving or scheduled
    pub fn is_animating(&self) -> bool {
        !self.projectiles.is_empty() || !self.timers.is_empty()
    }

    /// Advance the state machine by one input
    pub fn apply(&mut self, input: BattleInput, player: &mut impl HitPoints) -> BattleEventLog {
        let mut log = BattleEventLog::new();

        if self.is_finished() {
            return log;
        }

        match input {
            BattleInput::Cast { spell, question } => self.on_cast(spell, question, &mut log),
            BattleInput::Answer(choice) => self.on_answer(choice, player, &mut log),
            BattleInput::Tick { elapsed_ms } => self.on_tick(elapsed_ms, player, &mut log),
        }

        log
    }

    fn on_cast(&mut self, spell: Spell, question: Question, log: &mut BattleEventLog) {
        if !self.can_cast() {
            debug!(?spell, phase = ?self.phase, "ignoring cast");
            return;
        }

        log.push(
            BattleEventType::QuestionDealt {
                spell,
                question: question.clone(),
            },
            format!("{} readied: {}", spell, question.text()),
            self.tick,
        );
        self.outstanding = Some(DealtQuestion { spell, question });
        self.phase = BattlePhase::AwaitingAnswer;
    }

    fn on_answer(&mut self, choice: usize, player: &mut impl HitPoints, log: &mut BattleEventLog) {
        if self.phase != BattlePhase::AwaitingAnswer {
            debug!(choice, phase = ?self.phase, "ignoring answer");
            return;
        }
        let Some(dealt) = self.outstanding.take() else {
            return;
        };

        let correct = dealt.question.is_correct(choice);
        log.push(
            BattleEventType::Answered {
                question: dealt.question,
                choice,
                correct,
            },
            if correct {
                "Correct answer".into()
            } else {
                "Wrong answer".into()
            },
            self.tick,
        );

        self.phase = BattlePhase::Resolving;
        self.schedule(
            self.config.answer_reveal_ms,
            TimerKind::RevealAnswer {
                spell: dealt.spell,
                correct,
            },
        );
        // A zero reveal delay resolves immediately
        self.run_timers(0, player, &mut TickBudget::default(), log);
    }

    fn on_tick(&mut self, elapsed_ms: u64, player: &mut impl HitPoints, log: &mut BattleEventLog) {
        self.tick += 1;
        let mut budget = TickBudget::default();

        self.run_timers(elapsed_ms, player, &mut budget, log);
        if self.is_finished() {
            return;
        }

        self.move_projectiles(&mut budget, log);
        self.check_outcome(player);
    }

    fn schedule(&mut self, delay_ms: u64, kind: TimerKind) {
        self.timers.push(Timer {
            remaining_ms: delay_ms,
            kind,
        });
    }

    /// Count down timers and fire the ones that are due, in schedule order.
    /// Timers scheduled by a firing timer with no delay fire in the same pass.
    fn run_timers(
        &mut self,
        elapsed_ms: u64,
        player: &mut impl HitPoints,
        budget: &mut TickBudget,
        log: &mut BattleEventLog,
    ) {
        for timer in &mut self.timers {
            timer.remaining_ms = timer.remaining_ms.saturating_sub(elapsed_ms);
        }

        let mut deferred = Vec::new();
        loop {
            let Some(pos) = self.timers.iter().position(|t| t.remaining_ms == 0) else {
                break;
            };
            let timer = self.timers.remove(pos);

            match timer.kind {
                TimerKind::RevealAnswer { spell, correct } => self.resolve_answer(spell, correct, log),
                TimerKind::PlayerPenalty => {
                    if budget.player_stepped {
                        // Already damaged this frame; try again next frame
                        deferred.push(timer);
                    } else {
                        budget.player_stepped = true;
                        self.damage_player(player, log);
                    }
                }
                TimerKind::ClearHurt(combatant) => {
                    match combatant {
                        Combatant::Player => self.player_hurt = false,
                        Combatant::Enemy => self.enemy_hurt = false,
                    }
                    log.push(
                        BattleEventType::HurtCleared { combatant },
                        format!("{:?} recovered", combatant),
                        self.tick,
                    );
                }
                TimerKind::LatchOutcome(outcome) => {
                    self.finish(outcome, log);
                    return;
                }
            }
        }
        self.timers.extend(deferred);
    }

    fn resolve_answer(&mut self, spell: Spell, correct: bool, log: &mut BattleEventLog) {
        if correct {
            let projectile = Projectile::new(
                self.config.arena_width * PROJECTILE_SPAWN_X_FRACTION,
                self.config.arena_height / 2.0,
                spell.color(),
            );
            log.push(
                BattleEventType::ProjectileSpawned {
                    projectile: projectile.clone(),
                },
                format!("{} launched", spell),
                self.tick,
            );
            self.projectiles.push(projectile);
        } else {
            self.schedule(self.config.wrong_answer_delay_ms, TimerKind::PlayerPenalty);
        }

        self.phase = BattlePhase::Idle;
    }

    fn damage_player(&mut self, player: &mut impl HitPoints, log: &mut BattleEventLog) {
        let before = player.hp();
        let hp = player.step(HpStep::Damage);
        if hp != before {
            log.push(
                BattleEventType::HpChanged {
                    combatant: Combatant::Player,
                    hp,
                },
                format!("Player HP {}", hp.value()),
                self.tick,
            );
        }
        self.hurt(Combatant::Player, log);
    }

    fn hurt(&mut self, combatant: Combatant, log: &mut BattleEventLog) {
        match combatant {
            Combatant::Player => self.player_hurt = true,
            Combatant::Enemy => self.enemy_hurt = true,
        }
        log.push(
            BattleEventType::Hurt { combatant },
            format!("{:?} hurt", combatant),
            self.tick,
        );
        self.schedule(self.config.hurt_flash_ms, TimerKind::ClearHurt(combatant));
    }

    /// Move every projectile one frame. Only the first to reach the enemy
    /// this frame lands; later ones hold position and land next frame.
    fn move_projectiles(&mut self, budget: &mut TickBudget, log: &mut BattleEventLog) {
        let speed = self.config.projectile_speed;
        let reach = self.config.projectile_reach;
        let enemy_left = self.config.enemy_left;
        let arena_width = self.config.arena_width;
        let tick = self.tick;

        let mut enemy_hit = false;
        for projectile in &mut self.projectiles {
            if projectile.stopped {
                continue;
            }
            let next_x = projectile.next_x(speed);

            if Projectile::reaches(next_x, reach, enemy_left) {
                if budget.enemy_stepped {
                    continue;
                }
                budget.enemy_stepped = true;
                enemy_hit = true;
                projectile.x = next_x;
                projectile.stopped = true;
                log.push(
                    BattleEventType::ProjectileHit { id: projectile.id },
                    "Projectile hit the enemy".into(),
                    tick,
                );
            } else {
                projectile.x = next_x;
                log.push(
                    BattleEventType::ProjectileMoved {
                        id: projectile.id,
                        x: next_x,
                    },
                    String::new(),
                    tick,
                );
            }
        }

        // Despawn anything that struck or left the arena
        let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.projectiles)
            .into_iter()
            .partition(|p| p.stopped || p.x >= arena_width);
        self.projectiles = kept;
        for projectile in gone {
            log.push(
                BattleEventType::ProjectileDespawned { id: projectile.id },
                String::new(),
                tick,
            );
        }

        if enemy_hit {
            let before = self.enemy_hp;
            self.enemy_hp = self.enemy_hp.step_down();
            if self.enemy_hp != before {
                log.push(
                    BattleEventType::HpChanged {
                        combatant: Combatant::Enemy,
                        hp: self.enemy_hp,
                    },
                    format!("Enemy HP {}", self.enemy_hp.value()),
                    tick,
                );
            }
            self.hurt(Combatant::Enemy, log);
        }
    }

    /// Schedule the outcome once either side is down. Enemy is checked first.
    fn check_outcome(&mut self, player: &impl HitPoints) {
        if self.pending_outcome.is_some() || self.outcome != BattleOutcome::Undecided {
            return;
        }

        let outcome = if self.enemy_hp.is_zero() {
            BattleOutcome::Victory
        } else if player.hp().is_zero() {
            BattleOutcome::Defeat
        } else {
            return;
        };

        debug!(?outcome, tick = self.tick, "outcome scheduled");
        self.pending_outcome = Some(outcome);
        self.schedule(self.config.outcome_delay_ms, TimerKind::LatchOutcome(outcome));
    }

    fn finish(&mut self, outcome: BattleOutcome, log: &mut BattleEventLog) {
        self.outcome = outcome;
        self.phase = BattlePhase::Terminal;
        self.outstanding = None;
        self.timers.clear();
        log.push(
            BattleEventType::OutcomeDecided { outcome },
            format!("Battle ended: {:?}", outcome),
            self.tick,
        );
    }
}

/// HP steps already spent in the current frame
#[derive(Debug, Default)]
struct TickBudget {
    player_stepped: bool,
    enemy_stepped: bool,
}
