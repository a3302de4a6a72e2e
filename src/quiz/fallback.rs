//! Built-in questions used whenever generation is unavailable
//!
//! Every age level has at least two entries so repeated fallbacks still vary.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::quiz::question::{AgeLevel, Question};
use crate::quiz::source::QuestionSource;

/// The fixed fallback questions for one age level
pub fn fallback_questions(age_level: AgeLevel) -> Vec<Question> {
    match age_level {
        AgeLevel::Toddler => vec![
            Question::fallback("What color is an apple?", ["Red", "Blue", "Green", "Yellow"], 0),
            Question::fallback("What says 'moo'?", ["Dog", "Cat", "Cow", "Bird"], 2),
        ],
        AgeLevel::Preschool => vec![
            Question::fallback(
                "How many fingers do you have on one hand?",
                ["3", "4", "5", "6"],
                2,
            ),
            Question::fallback(
                "What shape is a ball?",
                ["Square", "Circle", "Triangle", "Star"],
                1,
            ),
        ],
        AgeLevel::Kindergarten => vec![
            Question::fallback(
                "What do plants need to grow?",
                ["Toys", "Water", "Candy", "TV"],
                1,
            ),
            Question::fallback(
                "Which animal has a long neck?",
                ["Dog", "Cat", "Giraffe", "Fish"],
                2,
            ),
        ],
        AgeLevel::EarlyElementary => vec![
            Question::fallback("What is 5 + 3?", ["6", "7", "8", "9"], 2),
            Question::fallback("How many days are in a week?", ["5", "6", "7", "8"], 2),
        ],
        AgeLevel::Elementary => vec![
            Question::fallback(
                "What is the largest planet in our solar system?",
                ["Earth", "Mars", "Jupiter", "Saturn"],
                2,
            ),
            Question::fallback(
                "What do we call an animal that eats only plants?",
                ["Carnivore", "Herbivore", "Omnivore", "Insectivore"],
                1,
            ),
        ],
        AgeLevel::UpperElementary => vec![
            Question::fallback(
                "What is the process by which plants make their own food?",
                ["Respiration", "Photosynthesis", "Digestion", "Fermentation"],
                1,
            ),
            Question::fallback(
                "What fraction is equivalent to 50%?",
                ["1/4", "1/3", "1/2", "2/3"],
                2,
            ),
        ],
        AgeLevel::MiddleSchool => vec![
            Question::fallback(
                "What is the chemical symbol for Gold?",
                ["Go", "Gd", "Au", "Ag"],
                2,
            ),
            Question::fallback(
                "Which type of energy transfer occurs through direct contact?",
                ["Radiation", "Convection", "Conduction", "Evaporation"],
                2,
            ),
        ],
    }
}

/// Question source that only ever deals from the fallback table
pub struct FallbackSource {
    rng: Mutex<StdRng>,
}

impl FallbackSource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic draws for reproducible runs
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draw one fallback question for the age level
    pub fn pick(&self, age_level: AgeLevel) -> Question {
        let mut questions = fallback_questions(age_level);
        let index = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.gen_range(0..questions.len())
        };
        debug!(age = %age_level, index, "dealing fallback question");
        questions.swap_remove(index)
    }
}

impl Default for FallbackSource {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionSource for FallbackSource {
    async fn generate(&self, _material: &str, age_level: AgeLevel) -> Question {
        self.pick(age_level)
    }
}
