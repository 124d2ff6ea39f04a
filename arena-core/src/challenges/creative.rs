//! Creative writing challenge - originality, imagery, and structure

use async_trait::async_trait;

use super::{term_matches, vocabulary_richness, word_count};
use crate::registry::{Challenge, ChallengeContext};
use crate::scorer::NormalizedScore;

const PROMPTS: [&str; 6] = [
    "Write a compelling opening paragraph for a sci-fi novel set in 2077.",
    "Compose a haiku about the feeling of debugging code at 3 AM.",
    "Pitch a startup idea that combines two completely unrelated industries.",
    "Write a short fable with a modern moral lesson.",
    "Create a movie logline for a film that combines horror and comedy.",
    "Describe an invention that would change everyday life in a surprising way.",
];

const IMAGERY_WORDS: [&str; 10] = [
    "shimmer", "whisper", "thunder", "glow", "shadow", "spark", "dance", "roar", "silent",
    "vivid",
];

pub struct CreativeChallenge;

#[async_trait]
impl Challenge for CreativeChallenge {
    fn type_key(&self) -> &'static str {
        "creative"
    }

    fn description(&self) -> &'static str {
        "Creative writing challenge scored on originality, entertainment, and relevance"
    }

    fn public_description(&self) -> &'static str {
        "Creative Challenge: Agents showcase their creativity and imagination"
    }

    fn generate_prompt(&self, context: &ChallengeContext<'_>) -> String {
        let prompt = PROMPTS[context.round as usize % PROMPTS.len()];
        format!(
            "Creative Challenge: {}\n\nBe original, entertaining, and stay on topic. \
             Keep your response under 200 words.",
            prompt
        )
    }

    async fn score_response(
        &self,
        response: &str,
        _context: &ChallengeContext<'_>,
    ) -> NormalizedScore {
        let mut score: i32 = 50;

        // Length: reward concise but substantive
        let words = word_count(response);
        if (30..=200).contains(&words) {
            score += 10;
        } else if words < 10 {
            score -= 20;
        } else if words > 300 {
            score -= 10;
        }

        let richness = vocabulary_richness(response);
        if richness > 0.65 {
            score += 15;
        } else if richness > 0.5 {
            score += 5;
        }

        let imagery = term_matches(response, &IMAGERY_WORDS) as i32;
        score += (imagery * 5).min(15);

        // Punctuation variety reads as deliberate structure
        if response.chars().any(|c| matches!(c, '!' | '?' | ';' | ':' | '—')) {
            score += 5;
        }

        if has_dialogue(response) {
            score += 5;
        }

        NormalizedScore::new(score as f64)
    }
}

/// A line with at least two quote characters is treated as dialogue.
fn has_dialogue(text: &str) -> bool {
    text.lines()
        .any(|line| line.chars().filter(|c| *c == '"' || *c == '\'').count() >= 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(round: u32) -> ChallengeContext<'static> {
        ChallengeContext {
            round,
            agents: &[],
            criteria: "",
        }
    }

    #[tokio::test]
    async fn test_vivid_story_beats_flat_fragment() {
        let challenge = CreativeChallenge;
        let vivid = "The city lay silent under a vivid amber glow; every shadow seemed to \
                     dance along the glass towers. \"Who goes there?\" called a voice like \
                     distant thunder, and the night answered with a whisper of sparks \
                     drifting off the broken transit rail toward the harbor!";
        let flat = "a story about a city";

        let v = challenge.score_response(vivid, &ctx(0)).await;
        let f = challenge.score_response(flat, &ctx(0)).await;
        assert!(v.value() > f.value());
        assert!(v.value() >= 85);
    }

    #[tokio::test]
    async fn test_too_short_loses_points() {
        let challenge = CreativeChallenge;
        let score = challenge.score_response("once upon a time", &ctx(0)).await;
        assert!(score.value() <= 50);
    }

    #[test]
    fn test_has_dialogue_requires_paired_quotes_on_one_line() {
        assert!(has_dialogue("she said \"hello\" and left"));
        assert!(!has_dialogue("it's a contraction only"));
        assert!(!has_dialogue("an open quote \"\nand a close quote\" apart"));
    }

    #[test]
    fn test_prompt_rotates_by_round() {
        let challenge = CreativeChallenge;
        assert_ne!(
            challenge.generate_prompt(&ctx(0)),
            challenge.generate_prompt(&ctx(1))
        );
    }
}
