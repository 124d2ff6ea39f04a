//! Shipped challenge strategies
//!
//! Each strategy is a deterministic heuristic blending keyword, length,
//! and structure signals into the 0-100 scale. Strategies are stateless;
//! per-round variation comes from the round number in the context.

mod alliance;
mod creative;
mod debate;
mod strategy;
mod trivia;

pub use alliance::AllianceChallenge;
pub use creative::CreativeChallenge;
pub use debate::DebateChallenge;
pub use strategy::StrategyChallenge;
pub use trivia::TriviaChallenge;

/// Whitespace-delimited word count, shared by the scoring heuristics.
pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Ratio of distinct words to total words (0.0 for empty input).
pub(crate) fn vocabulary_richness(text: &str) -> f64 {
    let words: Vec<String> = text
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect();
    if words.is_empty() {
        return 0.0;
    }
    let unique: std::collections::HashSet<&String> = words.iter().collect();
    unique.len() as f64 / words.len() as f64
}

/// How many of `terms` occur in `text` (case-insensitive).
pub(crate) fn term_matches(text: &str, terms: &[&str]) -> usize {
    let lower = text.to_lowercase();
    terms.iter().filter(|t| lower.contains(*t)).count()
}
