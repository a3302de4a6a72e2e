//! Question generation, deduplication, and adaptive selection

pub mod bank;
pub mod fallback;
pub mod question;
pub mod similarity;
pub mod source;

pub use bank::{weak_area_keywords, BankStats, QuestionBank};
pub use fallback::{fallback_questions, FallbackSource};
pub use question::{AgeLevel, Provenance, Question, QuestionResult, OPTION_COUNT};
pub use similarity::{similar, similarity};
pub use source::{LlmQuestionSource, QuestionSource};
