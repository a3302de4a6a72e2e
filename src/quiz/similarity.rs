//! Near-duplicate detection for question text
//!
//! Compares character trigram sets of the normalized strings. No tokenizing,
//! so reworded questions with the same core phrase still collide.

use std::collections::HashSet;

/// Overlap ratio above which two questions are duplicates
pub const DUPLICATE_THRESHOLD: f64 = 0.8;

const GRAM_SIZE: usize = 3;

/// Lowercase and keep only ASCII letters and digits
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter_map(|c| {
            let c = c.to_ascii_lowercase();
            c.is_ascii_alphanumeric().then_some(c)
        })
        .collect()
}

fn grams(s: &str) -> HashSet<&str> {
    // normalize() leaves only ASCII, so byte windows are char windows
    (0..=s.len().saturating_sub(GRAM_SIZE))
        .filter(|&i| i + GRAM_SIZE <= s.len())
        .map(|i| &s[i..i + GRAM_SIZE])
        .collect()
}

/// Jaccard ratio of the trigram sets of two strings, in 0.0..=1.0
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let a_grams = grams(&a);
    let b_grams = grams(&b);
    let intersection = a_grams.intersection(&b_grams).count();
    let union = a_grams.len() + b_grams.len() - intersection;

    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// True when two strings overlap more than `threshold`
pub fn is_similar(a: &str, b: &str, threshold: f64) -> bool {
    similarity(a, b) > threshold
}

/// True when two strings are near-duplicates at the default threshold
pub fn similar(a: &str, b: &str) -> bool {
    is_similar(a, b, DUPLICATE_THRESHOLD)
}
