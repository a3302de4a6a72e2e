//! Parse LLM replies into structured questions
//!
//! Models are asked for bare JSON but often wrap it in code fences or a
//! sentence of prose, so the object is cut out of the reply before decoding.

use crate::core::error::{QuizError, Result};
use crate::quiz::question::{Question, OPTION_COUNT};
use serde::{Deserialize, Serialize};

/// Raw question object as the model returns it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionPayload {
    pub question: String,
    pub options: Vec<String>,
    /// Kept as a float: some models emit `1.0`
    #[serde(rename = "correctIndex")]
    pub correct_index: f64,
}

impl QuestionPayload {
    /// Coerce the payload into a valid question
    ///
    /// Extra options are dropped and the answer index is clamped into range.
    /// Fewer than four options or a blank prompt cannot be repaired.
    pub fn into_question(self) -> Result<Question> {
        let mut options = self.options;
        options.truncate(OPTION_COUNT);
        let correct_index = self.correct_index.clamp(0.0, (OPTION_COUNT - 1) as f64) as usize;

        Question::new(self.question, options, correct_index)
            .ok_or_else(|| QuizError::LlmError("Invalid question format".into()))
    }
}

/// Decode a model reply into a question
pub fn parse_question(response: &str) -> Result<Question> {
    let json_str = extract_json(response)?;

    let payload: QuestionPayload = serde_json::from_str(json_str).map_err(|e| {
        QuizError::LlmError(format!(
            "Failed to parse question: {} - Response: {}",
            e, response
        ))
    })?;

    payload.into_question()
}

/// Extract JSON object from LLM response (handles surrounding text)
fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| QuizError::LlmError("No JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| QuizError::LlmError("No closing brace found in response".into()))?;
    if end < start {
        return Err(QuizError::LlmError("Malformed JSON in response".into()));
    }
    Ok(&response[start..=end])
}
