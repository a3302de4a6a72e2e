//! Encounter integration tests: full fights through the game session

use std::sync::atomic::{AtomicUsize, Ordering};

use quiz_quest::battle::*;
use quiz_quest::core::config::GameConfig;
use quiz_quest::core::error::QuizError;
use quiz_quest::core::types::EnemyId;
use quiz_quest::quiz::{AgeLevel, Question, QuestionSource};
use quiz_quest::session::GameSession;

/// Deals numbered questions whose first option is always right
struct NumberedSource {
    calls: AtomicUsize,
}

impl QuestionSource for NumberedSource {
    async fn generate(&self, _material: &str, _age_level: AgeLevel) -> Question {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Question::new(
            format!("Question {} about the water cycle?", n),
            vec!["Right".into(), "Wrong".into(), "Wrong".into(), "Wrong".into()],
            0,
        )
        .unwrap()
    }
}

fn session() -> GameSession<NumberedSource> {
    GameSession::with_seed(
        NumberedSource {
            calls: AtomicUsize::new(0),
        },
        GameConfig::default(),
        "",
        AgeLevel::Elementary,
        21,
    )
}

/// Cast, answer, then tick until nothing moves. Returns the logs in order.
async fn play_round(
    session: &mut GameSession<NumberedSource>,
    choice: usize,
) -> Vec<BattleEventLog> {
    let mut logs = vec![session.cast(Spell::Fireball).await.unwrap()];
    logs.push(session.answer(choice).unwrap());
    for _ in 0..10_000 {
        if !session.is_animating() {
            break;
        }
        logs.push(session.tick(FRAME_MS));
    }
    logs
}

fn ended(logs: &[BattleEventLog]) -> Option<(EncounterResult, Option<InventoryItem>)> {
    logs.iter().flat_map(|log| log.iter()).find_map(|e| match e {
        BattleEventType::EncounterEnded { result, reward } => Some((*result, reward.clone())),
        _ => None,
    })
}

#[tokio::test]
async fn test_four_wrong_answers_lose_and_restore_half_hp() {
    let mut session = session();
    session.engage(EnemyId(2)).unwrap();

    let mut hp_seen = Vec::new();
    let mut last_logs = Vec::new();
    for _ in 0..4 {
        let logs = play_round(&mut session, 2).await;
        let hp = logs
            .iter()
            .rev()
            .find_map(|log| log.last_hp(Combatant::Player))
            .unwrap();
        hp_seen.push(hp);
        last_logs = logs;
    }

    assert_eq!(
        hp_seen,
        vec![HpTier::ThreeQuarters, HpTier::Half, HpTier::Quarter, HpTier::Zero]
    );

    // Loss is reported on a later frame than the final damage, not the same one
    let zero_frame = last_logs
        .iter()
        .position(|log| log.last_hp(Combatant::Player) == Some(HpTier::Zero))
        .unwrap();
    let outcome_frame = last_logs
        .iter()
        .position(|log| log.outcome() == Some(BattleOutcome::Defeat))
        .unwrap();
    let delay = GameConfig::default().battle.outcome_delay_ms;
    assert!((outcome_frame - zero_frame) as u64 * FRAME_MS >= delay);

    assert_eq!(ended(&last_logs), Some((EncounterResult::Loss, None)));
    assert!(!session.in_encounter());
    assert_eq!(session.player_hp(), HpTier::Half);
    assert_eq!(session.enemies().len(), 8);
    assert_eq!(session.bank().stats().incorrect, 4);
}

#[tokio::test]
async fn test_four_hits_win_and_grant_potion() {
    let mut session = session();
    session.engage(EnemyId(5)).unwrap();

    let mut enemy_hp = Vec::new();
    let mut last_logs = Vec::new();
    for _ in 0..4 {
        let logs = play_round(&mut session, 0).await;
        if let Some(hp) = logs
            .iter()
            .rev()
            .find_map(|log| log.last_hp(Combatant::Enemy))
        {
            enemy_hp.push(hp);
        }
        last_logs = logs;
    }

    assert_eq!(
        enemy_hp,
        vec![HpTier::ThreeQuarters, HpTier::Half, HpTier::Quarter, HpTier::Zero]
    );
    let (result, reward) = ended(&last_logs).unwrap();
    assert_eq!(result, EncounterResult::Win);
    assert_eq!(reward.map(|item| item.kind), Some(ItemKind::Potion));

    assert_eq!(session.player_hp(), HpTier::Full);
    assert_eq!(session.defeated_count(), 1);
    assert!(session.enemies().iter().all(|e| e.id != EnemyId(5)));
    assert_eq!(session.inventory().count(ItemKind::Potion), 1);
    assert!(matches!(
        session.engage(EnemyId(5)),
        Err(QuizError::UnknownEnemy(_))
    ));
}

#[tokio::test]
async fn test_potion_used_mid_fight() {
    let mut session = session();
    session.engage(EnemyId(1)).unwrap();
    for _ in 0..4 {
        play_round(&mut session, 0).await;
    }
    assert_eq!(session.inventory().len(), 1);

    session.engage(EnemyId(3)).unwrap();
    play_round(&mut session, 3).await;
    assert_eq!(session.player_hp(), HpTier::ThreeQuarters);

    assert_eq!(session.use_item(0).unwrap(), HpTier::Full);
    assert!(session.inventory().is_empty());
}

#[tokio::test]
async fn test_cast_ignored_while_question_outstanding() {
    let mut session = session();
    session.engage(EnemyId(4)).unwrap();

    let first = session.cast(Spell::Lightning).await.unwrap();
    assert!(!first.is_empty());
    let second = session.cast(Spell::IceShard).await.unwrap();
    assert!(second.is_empty());

    let (spell, _) = session
        .engagement()
        .and_then(|e| e.outstanding_question())
        .unwrap();
    assert_eq!(spell, Spell::Lightning);
}

#[tokio::test]
async fn test_fleeing_keeps_enemy_on_map() {
    let mut session = session();
    session.engage(EnemyId(6)).unwrap();
    play_round(&mut session, 1).await;
    play_round(&mut session, 1).await;
    play_round(&mut session, 1).await;
    assert_eq!(session.player_hp(), HpTier::Quarter);

    let report = session.run_away().unwrap();
    assert_eq!(report.result, EncounterResult::Fled);
    assert_eq!(session.player_hp(), HpTier::Half);
    assert!(session.enemies().iter().any(|e| e.id == EnemyId(6)));
}
