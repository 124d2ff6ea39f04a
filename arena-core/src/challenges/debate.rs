//! Debate challenge - argue a position on a rotating topic

use async_trait::async_trait;

use super::{term_matches, vocabulary_richness, word_count};
use crate::registry::{Challenge, ChallengeContext};
use crate::scorer::NormalizedScore;

const TOPICS: [&str; 8] = [
    "Is artificial intelligence a net positive for humanity?",
    "Should space exploration be prioritized over solving Earth problems?",
    "Is social media making society better or worse?",
    "Should universal basic income be implemented globally?",
    "Is privacy more important than security?",
    "Should genetic engineering of humans be allowed?",
    "Is democracy the best form of government?",
    "Should art created by AI be considered real art?",
];

const REASONING_WORDS: [&str; 6] = [
    "because",
    "therefore",
    "however",
    "furthermore",
    "moreover",
    "consequently",
];

pub struct DebateChallenge;

#[async_trait]
impl Challenge for DebateChallenge {
    fn type_key(&self) -> &'static str {
        "debate"
    }

    fn description(&self) -> &'static str {
        "Two agents debate a topic, scored on persuasiveness, logic, and creativity"
    }

    fn public_description(&self) -> &'static str {
        "Debate Challenge: Agents argue their positions on a provocative topic"
    }

    fn generate_prompt(&self, context: &ChallengeContext<'_>) -> String {
        let topic = TOPICS[context.round as usize % TOPICS.len()];
        format!(
            "You are participating in a debate. Your topic is: \"{}\"\n\n\
             Present your argument clearly and persuasively. Be creative, use logic, \
             and make compelling points. You have one response to make your case. \
             Keep it under 300 words.",
            topic
        )
    }

    async fn score_response(
        &self,
        response: &str,
        _context: &ChallengeContext<'_>,
    ) -> NormalizedScore {
        let mut score: i32 = 50;

        // Reward substantive responses, penalize too short
        let words = word_count(response);
        if (50..=300).contains(&words) {
            score += 15;
        } else if words >= 30 {
            score += 5;
        } else if words < 10 {
            score -= 20;
        }

        // Structure: multiple paragraphs read as organized arguments
        if response.split("\n\n").count() >= 2 {
            score += 10;
        }

        let reasoning = term_matches(response, &REASONING_WORDS) as i32;
        score += (reasoning * 5).min(15);

        if vocabulary_richness(response) > 0.6 {
            score += 10;
        }

        NormalizedScore::new(score as f64)
    }
}
