//! Question bank
//!
//! Pre-generates a deduplicated pool from study material, deals questions
//! without replacement until the pool is exhausted, and steers selection
//! toward topics the player keeps getting wrong.
//!
//! The bank is an owned instance rather than a global. State sits behind a
//! mutex that is never held across an await, so readiness and stats can be
//! read while a generation batch is in flight.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::config::BankConfig;
use crate::quiz::question::{AgeLevel, Question, QuestionResult};
use crate::quiz::similarity::is_similar;
use crate::quiz::source::QuestionSource;

/// Words never treated as weak-area keywords
const STOP_WORDS: &[&str] = &[
    "what", "which", "who", "how", "when", "where", "why", "the", "a", "an", "is", "are", "was",
    "were", "of", "to", "in", "for", "on", "with",
];

/// Keywords must be longer than this many characters
const MIN_KEYWORD_CHARS: usize = 3;

/// Read-only snapshot of bank counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankStats {
    pub total: usize,
    pub used: usize,
    pub remaining: usize,
    pub attempts: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub age_level: AgeLevel,
    pub is_generating: bool,
}

#[derive(Debug, Default)]
struct BankState {
    questions: Vec<Question>,
    used: HashSet<usize>,
    results: Vec<QuestionResult>,
    age_level: AgeLevel,
    material: String,
    is_generating: bool,
    /// Bumped on every replacement; in-flight batches from an older epoch
    /// are dropped.
    epoch: u64,
}

pub struct QuestionBank<S> {
    source: S,
    config: BankConfig,
    state: Mutex<BankState>,
    rng: Mutex<StdRng>,
}

impl<S: QuestionSource> QuestionBank<S> {
    pub fn new(source: S, config: BankConfig) -> Self {
        Self::with_rng(source, config, StdRng::from_entropy())
    }

    /// Deterministic selection for reproducible runs
    pub fn with_seed(source: S, config: BankConfig, seed: u64) -> Self {
        Self::with_rng(source, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(source: S, config: BankConfig, rng: StdRng) -> Self {
        Self {
            source,
            config,
            state: Mutex::new(BankState::default()),
            rng: Mutex::new(rng),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn lock_state(&self) -> MutexGuard<'_, BankState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fill the pool from `material`
    ///
    /// No-op when the same material and age level are already loaded with at
    /// least one question. Otherwise the previous pool, used markers, and
    /// results are discarded and up to `target_count` questions are generated
    /// in sequential batches of concurrent requests. Duplicates are dropped,
    /// not retried, so the pool may end up smaller than requested.
    pub async fn initialize(&self, material: &str, age_level: AgeLevel, target_count: usize) {
        let epoch = {
            let mut state = self.lock_state();
            if state.material == material
                && state.age_level == age_level
                && !state.questions.is_empty()
            {
                info!("Question bank already initialized with this material");
                return;
            }

            let epoch = state.epoch + 1;
            *state = BankState {
                age_level,
                material: material.to_string(),
                is_generating: true,
                epoch,
                ..BankState::default()
            };
            epoch
        };

        info!(
            target_count,
            age = %age_level,
            "Initializing question bank"
        );

        let batch_size = self.config.batch_size.max(1);
        let batches = target_count.div_ceil(batch_size);

        for batch in 0..batches {
            let remaining = {
                let state = self.lock_state();
                if state.epoch != epoch {
                    debug!(epoch, "question bank replaced, abandoning generation");
                    return;
                }
                target_count.saturating_sub(state.questions.len())
            };
            let current_batch = remaining.min(batch_size);
            if current_batch == 0 {
                break;
            }

            let generated = join_all(
                (0..current_batch).map(|_| self.source.generate(material, age_level)),
            )
            .await;

            let mut state = self.lock_state();
            if state.epoch != epoch {
                debug!(epoch, "question bank replaced, dropping batch results");
                return;
            }

            for question in generated {
                if self.is_duplicate(&question, &state.questions) {
                    debug!(question = question.text(), "dropping duplicate question");
                } else {
                    state.questions.push(question);
                }
            }

            debug!(
                batch = batch + 1,
                batches,
                total = state.questions.len(),
                "generated batch"
            );
        }

        let mut state = self.lock_state();
        if state.epoch == epoch {
            state.is_generating = false;
            info!(
                total = state.questions.len(),
                "Question bank ready"
            );
        }
    }

    /// Initialize with the configured default question count
    pub async fn initialize_default(&self, material: &str, age_level: AgeLevel) {
        self.initialize(material, age_level, self.config.target_count)
            .await
    }

    fn is_duplicate(&self, question: &Question, existing: &[Question]) -> bool {
        existing.iter().any(|q| {
            is_similar(
                q.text(),
                question.text(),
                self.config.similarity_threshold,
            )
        })
    }

    /// Deal the next question
    ///
    /// Every pool entry is dealt once before any repeats. Unused questions
    /// mentioning a weak-area keyword come first; otherwise the pick is
    /// random. Returns `None` only when the pool is empty.
    pub fn next_question(&self) -> Option<Question> {
        let mut state = self.lock_state();

        if state.questions.is_empty() {
            warn!("Question bank is empty");
            return None;
        }

        let mut unused = unused_indices(&state);
        if unused.is_empty() {
            info!("All questions used, recycling pool");
            state.used.clear();
            unused = unused_indices(&state);
        }

        let keywords = weak_area_keywords(&state.results, self.config.weak_keyword_count);

        let selected = if keywords.is_empty() {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            *unused.choose(&mut *rng)?
        } else {
            unused
                .iter()
                .copied()
                .find(|&idx| {
                    let text = state.questions[idx].text().to_lowercase();
                    keywords.iter().any(|keyword| text.contains(keyword.as_str()))
                })
                .unwrap_or(unused[0])
        };

        state.used.insert(selected);
        Some(state.questions[selected].clone())
    }

    /// Append an answer to the result history
    pub fn record_result(&self, question: &Question, was_correct: bool) {
        let mut state = self.lock_state();
        state.results.push(QuestionResult {
            question: question.clone(),
            was_correct,
            timestamp: Utc::now(),
        });
        debug!(
            correct = was_correct,
            attempts = state.results.len(),
            "recorded result"
        );
    }

    /// True when the pool has questions and no batch is in flight
    pub fn is_ready(&self) -> bool {
        let state = self.lock_state();
        !state.questions.is_empty() && !state.is_generating
    }

    pub fn stats(&self) -> BankStats {
        let state = self.lock_state();
        let correct = state.results.iter().filter(|r| r.was_correct).count();
        BankStats {
            total: state.questions.len(),
            used: state.used.len(),
            remaining: state.questions.len() - state.used.len(),
            attempts: state.results.len(),
            correct,
            incorrect: state.results.len() - correct,
            age_level: state.age_level,
            is_generating: state.is_generating,
        }
    }

    pub fn age_level(&self) -> AgeLevel {
        self.lock_state().age_level
    }

    pub fn material(&self) -> String {
        self.lock_state().material.clone()
    }

    pub fn results(&self) -> Vec<QuestionResult> {
        self.lock_state().results.clone()
    }

    pub fn questions(&self) -> Vec<Question> {
        self.lock_state().questions.clone()
    }
}

fn unused_indices(state: &BankState) -> Vec<usize> {
    (0..state.questions.len())
        .filter(|idx| !state.used.contains(idx))
        .collect()
}

/// Most frequent words from missed questions, most frequent first
///
/// Lowercased whitespace tokens, stop words and short words removed. Ties
/// keep first-seen order. Punctuation stays attached to the word.
pub fn weak_area_keywords(results: &[QuestionResult], limit: usize) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for result in results.iter().filter(|r| !r.was_correct) {
        let text = result.question.text().to_lowercase();
        for word in text.split_whitespace() {
            if word.chars().count() <= MIN_KEYWORD_CHARS || STOP_WORDS.contains(&word) {
                continue;
            }
            let count = counts.entry(word.to_string()).or_insert(0);
            if *count == 0 {
                order.push(word.to_string());
            }
            *count += 1;
        }
    }

    // Stable sort keeps first-seen order among equal counts
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.truncate(limit);
    order
}
