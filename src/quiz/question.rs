//! Question, result, and age-level types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of answer options on every question
pub const OPTION_COUNT: usize = 4;

/// Age bracket that calibrates vocabulary and reasoning depth
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    clap::ValueEnum,
)]
pub enum AgeLevel {
    #[serde(rename = "0-1")]
    #[value(name = "0-1")]
    Toddler,
    #[serde(rename = "2-3")]
    #[value(name = "2-3")]
    Preschool,
    #[serde(rename = "4-5")]
    #[value(name = "4-5")]
    Kindergarten,
    #[default]
    #[serde(rename = "6-7")]
    #[value(name = "6-7")]
    EarlyElementary,
    #[serde(rename = "8-9")]
    #[value(name = "8-9")]
    Elementary,
    #[serde(rename = "10-11")]
    #[value(name = "10-11")]
    UpperElementary,
    #[serde(rename = "12+")]
    #[value(name = "12+")]
    MiddleSchool,
}

impl AgeLevel {
    /// All brackets, youngest first
    pub const ALL: [AgeLevel; 7] = [
        AgeLevel::Toddler,
        AgeLevel::Preschool,
        AgeLevel::Kindergarten,
        AgeLevel::EarlyElementary,
        AgeLevel::Elementary,
        AgeLevel::UpperElementary,
        AgeLevel::MiddleSchool,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeLevel::Toddler => "0-1",
            AgeLevel::Preschool => "2-3",
            AgeLevel::Kindergarten => "4-5",
            AgeLevel::EarlyElementary => "6-7",
            AgeLevel::Elementary => "8-9",
            AgeLevel::UpperElementary => "10-11",
            AgeLevel::MiddleSchool => "12+",
        }
    }
}

impl fmt::Display for AgeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeLevel::ALL
            .iter()
            .copied()
            .find(|level| level.label() == s.trim())
            .ok_or_else(|| format!("unknown age level: {}", s))
    }
}

/// Where a question came from. Only visible to tests and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provenance {
    #[default]
    Generated,
    Fallback,
}

/// A four-option multiple choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    text: String,
    options: [String; OPTION_COUNT],
    correct_index: usize,
    #[serde(skip)]
    provenance: Provenance,
}

impl Question {
    /// Build a question, rejecting anything but exactly four options and an
    /// in-range answer index.
    pub fn new(text: impl Into<String>, options: Vec<String>, correct_index: usize) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() || correct_index >= OPTION_COUNT {
            return None;
        }
        let options: [String; OPTION_COUNT] = options.try_into().ok()?;
        Some(Self {
            text,
            options,
            correct_index,
            provenance: Provenance::Generated,
        })
    }

    pub(crate) fn fallback(text: &str, options: [&str; OPTION_COUNT], correct_index: usize) -> Self {
        Self {
            text: text.to_string(),
            options: options.map(String::from),
            correct_index,
            provenance: Provenance::Fallback,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_index
    }

    #[doc(hidden)]
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }
}

/// One answered question in the bank's history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question: Question,
    pub was_correct: bool,
    pub timestamp: DateTime<Utc>,
}
