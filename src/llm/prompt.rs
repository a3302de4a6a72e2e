//! Prompt construction for question generation
//!
//! Each age bracket gets its own vocabulary ceiling and reasoning depth.

use crate::quiz::question::AgeLevel;

/// Characters of study material sent with each request
pub const MATERIAL_CHAR_LIMIT: usize = 2000;

/// Language guidelines for one age bracket
pub fn age_guidelines(age_level: AgeLevel) -> &'static str {
    match age_level {
        AgeLevel::Toddler => {
            r#"TODDLER LEVEL (0-1 years):
- Use only the simplest words (1-2 syllables maximum)
- Questions about colors, animals, basic objects
- Example: "What color is a banana?" with options like "Yellow", "Blue"
- All answers should be single words
- Use very concrete, tangible concepts only"#
        }
        AgeLevel::Preschool => {
            r#"PRESCHOOL LEVEL (2-3 years):
- Simple vocabulary, very short sentences
- Questions about colors, shapes, animals, counting (1-5)
- Example: "How many legs does a dog have?"
- Answers should be 1-3 words max
- Avoid abstract concepts entirely"#
        }
        AgeLevel::Kindergarten => {
            r#"KINDERGARTEN LEVEL (4-5 years):
- Simple but complete sentences
- Questions about nature, family, basic science, counting (1-20)
- Can include simple "why" questions
- Answers can be short phrases
- Begin introducing cause-and-effect"#
        }
        AgeLevel::EarlyElementary => {
            r#"EARLY ELEMENTARY LEVEL (6-7 years):
- Clear, straightforward language
- Questions testing comprehension and recall
- Can include simple vocabulary from the material
- Answers can be full sentences if needed
- Include questions about sequences and order"#
        }
        AgeLevel::Elementary => {
            r#"ELEMENTARY LEVEL (8-9 years):
- Grade-appropriate vocabulary
- Questions requiring inference and analysis
- Can test understanding of main ideas
- Include questions about cause and effect
- Answers can be more detailed"#
        }
        AgeLevel::UpperElementary => {
            r#"UPPER ELEMENTARY LEVEL (10-11 years):
- More sophisticated vocabulary
- Questions requiring critical thinking
- Test deeper understanding of concepts
- Include application questions
- Can reference specific details from material"#
        }
        AgeLevel::MiddleSchool => {
            r#"MIDDLE SCHOOL+ LEVEL (12+ years):
- Advanced vocabulary appropriate to the subject
- Complex questions requiring synthesis
- Test application of concepts to new situations
- Include analytical and evaluative questions
- Can use subject-specific terminology"#
        }
    }
}

/// System prompt: role, age guidelines, and the strict output format
pub fn system_prompt(age_level: AgeLevel) -> String {
    format!(
        r#"You are an expert educational quiz question generator for children. Your task is to create age-appropriate multiple choice questions from study material.

{}

Respond ONLY in this exact JSON format (no markdown, no code blocks):
{{
  "question": "Your question here?",
  "options": ["Option A", "Option B", "Option C", "Option D"],
  "correctIndex": 0
}}

CRITICAL RULES:
- correctIndex is 0-3 indicating which option is correct
- Shuffle the correct answer position (don't always put it first)
- STRICTLY follow the age guidelines above
- Make distractors (wrong answers) plausible but clearly incorrect
- Focus on key educational concepts from the material
- Each question should test a DIFFERENT aspect of the material
- Don't generate questions that require external knowledge"#,
        age_guidelines(age_level)
    )
}

/// User prompt carrying the (truncated) study material
pub fn user_prompt(material: &str, age_level: AgeLevel) -> String {
    format!(
        "Generate a unique quiz question for a {} year old based on this study material:\n\n{}",
        age_level,
        truncate_chars(material, MATERIAL_CHAR_LIMIT)
    )
}

/// First `limit` characters of `s`, never splitting a character
fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((byte_index, _)) => &s[..byte_index],
        None => s,
    }
}
