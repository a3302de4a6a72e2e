//! Question bank integration tests

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Notify};

use quiz_quest::core::config::BankConfig;
use quiz_quest::llm::client::LlmClient;
use quiz_quest::quiz::*;

const DISTINCT: &[&str] = &[
    "What is the largest planet in our solar system?",
    "How many legs does a spider have?",
    "Which gas do plants absorb from the air?",
    "Who wrote the play Romeo and Juliet?",
    "What is the boiling point of water at sea level?",
    "Which ocean lies between Africa and Australia?",
    "What do bees collect from flowers?",
    "How many sides does a hexagon have?",
    "Which metal is liquid at room temperature?",
    "Where does photosynthesis happen inside a leaf?",
];

fn question(text: &str) -> Question {
    Question::new(
        text,
        vec!["A".into(), "B".into(), "C".into(), "D".into()],
        0,
    )
    .unwrap()
}

/// Cycles through DISTINCT in order
struct CyclingSource {
    calls: AtomicUsize,
}

impl CyclingSource {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl QuestionSource for CyclingSource {
    async fn generate(&self, _material: &str, _age_level: AgeLevel) -> Question {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        question(DISTINCT[n % DISTINCT.len()])
    }
}

/// Holds generation for "old" material until the gate opens
struct GatedSource {
    started: Arc<Notify>,
    gate: watch::Receiver<bool>,
    calls: AtomicUsize,
}

impl QuestionSource for GatedSource {
    async fn generate(&self, material: &str, _age_level: AgeLevel) -> Question {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if material.starts_with("old") {
            self.started.notify_one();
            let mut gate = self.gate.clone();
            let _ = gate.wait_for(|open| *open).await;
            return question(&format!("Stale question number {} from old notes", n));
        }
        question(DISTINCT[n % DISTINCT.len()])
    }
}

/// Returns near-identical phrasings of a few questions
struct EchoSource {
    calls: AtomicUsize,
}

impl QuestionSource for EchoSource {
    async fn generate(&self, _material: &str, _age_level: AgeLevel) -> Question {
        const ECHOES: &[&str] = &[
            "What color is the sky on a clear day?",
            "What colour is the sky on a clear day?",
            "What color is the sky on a clear day??",
            "How many wheels does a bicycle have?",
            "How many wheels does a bicycle have",
            "Which animal is known as the king of the jungle?",
        ];
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        question(ECHOES[n % ECHOES.len()])
    }
}

#[tokio::test]
async fn test_ten_distinct_texts_settle_at_ten() {
    let bank = QuestionBank::with_seed(CyclingSource::new(), BankConfig::default(), 3);
    bank.initialize("Notes about the world", AgeLevel::Elementary, 15)
        .await;

    let stats = bank.stats();
    assert_eq!(stats.total, 10);
    assert!(!stats.is_generating);
    assert!(bank.is_ready());
}

#[tokio::test]
async fn test_round_robin_then_recycle() {
    let bank = QuestionBank::with_seed(CyclingSource::new(), BankConfig::default(), 3);
    bank.initialize("Notes about the world", AgeLevel::Elementary, 10)
        .await;

    let mut seen = HashSet::new();
    for _ in 0..10 {
        let q = bank.next_question().unwrap();
        assert!(seen.insert(q.text().to_string()), "repeat before exhaustion");
    }
    assert_eq!(bank.stats().remaining, 0);

    // Eleventh draw recycles the pool
    let q = bank.next_question().unwrap();
    assert!(seen.contains(q.text()));
    assert_eq!(bank.stats().used, 1);
}

#[tokio::test]
async fn test_no_duplicates_survive() {
    let config = BankConfig::default();
    let threshold = config.similarity_threshold;
    let bank = QuestionBank::with_seed(
        EchoSource {
            calls: AtomicUsize::new(0),
        },
        config,
        9,
    );
    bank.initialize("Everyday facts", AgeLevel::EarlyElementary, 12)
        .await;

    let pool = bank.questions();
    assert_eq!(pool.len(), 3);
    for (i, a) in pool.iter().enumerate() {
        for b in &pool[i + 1..] {
            assert!(
                similarity(a.text(), b.text()) <= threshold,
                "{:?} and {:?} both survived",
                a.text(),
                b.text()
            );
        }
    }
}

#[tokio::test]
async fn test_weak_area_question_comes_next() {
    let bank = QuestionBank::with_seed(CyclingSource::new(), BankConfig::default(), 3);
    bank.initialize("Notes about the world", AgeLevel::Elementary, 10)
        .await;

    bank.record_result(&question("Photosynthesis turns sunlight into sugar"), false);
    bank.record_result(&question("Photosynthesis needs which pigment"), false);

    let q = bank.next_question().unwrap();
    assert_eq!(q.text(), "Where does photosynthesis happen inside a leaf?");
}

#[tokio::test]
async fn test_newer_initialize_supersedes_in_flight_one() {
    let started = Arc::new(Notify::new());
    let (open_tx, gate) = watch::channel(false);
    let bank = QuestionBank::with_seed(
        GatedSource {
            started: Arc::clone(&started),
            gate,
            calls: AtomicUsize::new(0),
        },
        BankConfig::default(),
        1,
    );

    let stale = bank.initialize("old notes", AgeLevel::Elementary, 5);
    let fresh = async {
        started.notified().await;
        bank.initialize("new notes", AgeLevel::Elementary, 5).await;
        open_tx.send_replace(true);
    };
    tokio::join!(stale, fresh);

    assert_eq!(bank.material(), "new notes");
    let stats = bank.stats();
    assert_eq!(stats.total, 5);
    assert!(!stats.is_generating);
    assert!(bank
        .questions()
        .iter()
        .all(|q| !q.text().starts_with("Stale")));
}

#[tokio::test]
async fn test_unreachable_service_fills_from_fallbacks() {
    let client = LlmClient::new(
        "test-key".into(),
        "http://127.0.0.1:9/v1/chat/completions".into(),
        "test-model".into(),
    );
    let source = LlmQuestionSource::new(Some(client), FallbackSource::with_seed(4));
    let bank = QuestionBank::with_seed(source, BankConfig::default(), 4);

    bank.initialize("Plants need water and light", AgeLevel::Kindergarten, 6)
        .await;

    let pool = bank.questions();
    assert!(!pool.is_empty());
    assert!(pool.len() <= fallback_questions(AgeLevel::Kindergarten).len());
    assert!(pool.iter().all(|q| q.provenance() == Provenance::Fallback));
}

#[tokio::test]
async fn test_every_age_level_gets_a_valid_question() {
    let source = LlmQuestionSource::new(None, FallbackSource::with_seed(8));
    for level in AgeLevel::ALL {
        let q = source.generate("Some notes", level).await;
        assert!(!q.text().is_empty());
        assert_eq!(q.options().len(), OPTION_COUNT);
        assert!(q.correct_index() < OPTION_COUNT);
    }
}
