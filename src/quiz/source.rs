//! Question sources
//!
//! A source turns study material into one question and never fails: when
//! generation is unavailable it deals from the fallback table instead.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::llm::client::LlmClient;
use crate::llm::parser::parse_question;
use crate::llm::prompt::{system_prompt, user_prompt};
use crate::quiz::fallback::FallbackSource;
use crate::quiz::question::{AgeLevel, Question};

/// Produces questions from study material
///
/// Implementations must always resolve with a valid question.
#[allow(async_fn_in_trait)]
pub trait QuestionSource {
    async fn generate(&self, material: &str, age_level: AgeLevel) -> Question;
}

impl<T: QuestionSource> QuestionSource for Arc<T> {
    async fn generate(&self, material: &str, age_level: AgeLevel) -> Question {
        self.as_ref().generate(material, age_level).await
    }
}

/// LLM-backed source with a silent fallback
pub struct LlmQuestionSource {
    client: Option<LlmClient>,
    fallback: FallbackSource,
}

impl LlmQuestionSource {
    pub fn new(client: Option<LlmClient>, fallback: FallbackSource) -> Self {
        Self { client, fallback }
    }

    /// Build from `LLM_*` environment variables; without a key every
    /// question comes from the fallback table.
    pub fn from_env() -> Self {
        let client = match LlmClient::from_env() {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("{} - questions will come from the fallback table", e);
                None
            }
        };
        Self::new(client, FallbackSource::new())
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }
}

impl QuestionSource for LlmQuestionSource {
    async fn generate(&self, material: &str, age_level: AgeLevel) -> Question {
        let Some(client) = &self.client else {
            return self.fallback.pick(age_level);
        };

        if material.trim().is_empty() {
            return self.fallback.pick(age_level);
        }

        let reply = client
            .complete(&system_prompt(age_level), &user_prompt(material, age_level))
            .await;

        match reply.and_then(|text| parse_question(&text)) {
            Ok(question) => {
                debug!(age = %age_level, question = question.text(), "generated question");
                question
            }
            Err(e) => {
                warn!("question generation failed: {}", e);
                self.fallback.pick(age_level)
            }
        }
    }
}
