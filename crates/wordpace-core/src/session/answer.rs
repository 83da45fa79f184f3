//! Answer matching and scramble fragments.
//!
//! The matcher is deliberately forgiving about everything except the
//! letters: case, spacing, hyphenation, and punctuation differences never
//! fail an otherwise correct answer.

use rand::seq::SliceRandom;
use rand::Rng;

/// Lowercases and strips every character outside `a-z0-9`.
pub fn normalize(answer: &str) -> String {
    answer
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Compares a submitted answer against the expected headword.
pub fn check_typing_answer(submitted: &str, expected: &str) -> bool {
    normalize(submitted) == normalize(expected)
}

/// The fragments a scramble prompt presents, shuffled.
///
/// A headword containing a space splits into words; anything else splits
/// into characters.
pub fn scramble_fragments(answer: &str, rng: &mut impl Rng) -> Vec<String> {
    let mut fragments = fragments_of(answer);
    fragments.shuffle(rng);
    fragments
}

/// Joins chosen fragments back into a candidate answer, using the same
/// separator the headword was split with.
pub fn assemble_fragments(expected: &str, chosen: &[String]) -> String {
    if expected.contains(' ') {
        chosen.join(" ")
    } else {
        chosen.concat()
    }
}

fn fragments_of(answer: &str) -> Vec<String> {
    if answer.contains(' ') {
        answer.split_whitespace().map(str::to_string).collect()
    } else {
        answer.chars().map(|c| c.to_string()).collect()
    }
}
