//! Alliance challenge - negotiate, cooperate, or backstab

use async_trait::async_trait;

use super::{term_matches, word_count};
use crate::registry::{Challenge, ChallengeContext};
use crate::scorer::NormalizedScore;

const GAME_THEORY_TERMS: [&str; 8] = [
    "nash",
    "equilibrium",
    "dilemma",
    "dominant",
    "strategy",
    "payoff",
    "trust",
    "reputation",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Choice {
    Ally,
    Betray,
    Neutral,
}

pub struct AllianceChallenge;

impl AllianceChallenge {
    fn detect_choice(response: &str) -> Choice {
        let upper = response.to_uppercase();
        if upper.contains("CHOICE: ALLY") || upper.contains("CHOICE:ALLY") {
            Choice::Ally
        } else if upper.contains("CHOICE: BETRAY") || upper.contains("CHOICE:BETRAY") {
            Choice::Betray
        } else if upper.contains("CHOICE: NEUTRAL") || upper.contains("CHOICE:NEUTRAL") {
            Choice::Neutral
        } else if upper.contains("ALLY") {
            Choice::Ally
        } else if upper.contains("BETRAY") {
            Choice::Betray
        } else {
            Choice::Neutral
        }
    }
}

#[async_trait]
impl Challenge for AllianceChallenge {
    fn type_key(&self) -> &'static str {
        "alliance"
    }

    fn description(&self) -> &'static str {
        "Alliance and betrayal — negotiate, cooperate, or backstab"
    }

    fn public_description(&self) -> &'static str {
        "Alliance Challenge: Form alliances, then decide — cooperate or betray?"
    }

    fn generate_prompt(&self, context: &ChallengeContext<'_>) -> String {
        format!(
            "Alliance Challenge: There are {} agents in this round.\n\n\
             You must decide your strategy:\n\
             1. ALLY — Propose cooperation. If your partner also allies, you both get \
             moderate points.\n\
             2. BETRAY — Backstab. If your partner allied, you get high points and they \
             get nothing. If both betray, you both get minimal points.\n\
             3. NEUTRAL — Play it safe. You get a small guaranteed score regardless.\n\n\
             State your choice (ALLY, BETRAY, or NEUTRAL) and explain your reasoning. \
             Consider the game theory implications.\n\n\
             Format:\n\
             Choice: [ALLY/BETRAY/NEUTRAL]\n\
             Reasoning: [your strategy explanation]",
            context.agents.len()
        )
    }

    async fn score_response(
        &self,
        response: &str,
        _context: &ChallengeContext<'_>,
    ) -> NormalizedScore {
        // Simulated opponent cooperates often enough that allying pays,
        // betraying averages out, and neutral stays safe but low
        let mut score: i32 = match Self::detect_choice(response) {
            Choice::Ally => 60,
            Choice::Betray => 50,
            Choice::Neutral => 40,
        };

        let words = word_count(response);
        if words >= 30 {
            score += 10;
        }
        if words >= 60 {
            score += 5;
        }

        let terms = term_matches(response, &GAME_THEORY_TERMS) as i32;
        score += (terms * 3).min(15);

        let lower = response.to_lowercase();
        if lower.contains("choice:") && lower.contains("reasoning:") {
            score += 5;
        }

        NormalizedScore::new(score as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ChallengeContext<'static> {
        ChallengeContext {
            round: 1,
            agents: &[],
            criteria: "",
        }
    }

    #[test]
    fn test_detect_choice_prefers_explicit_format() {
        assert_eq!(
            AllianceChallenge::detect_choice("Choice: BETRAY\nReasoning: ally talk is cheap"),
            Choice::Betray
        );
        assert_eq!(AllianceChallenge::detect_choice("I will ally with anyone"), Choice::Ally);
        assert_eq!(AllianceChallenge::detect_choice("I pass this round"), Choice::Neutral);
    }

    #[tokio::test]
    async fn test_formatted_ally_with_game_theory_scores_well() {
        let challenge = AllianceChallenge;
        let response = "Choice: ALLY\nReasoning: In a repeated dilemma, trust and \
                        reputation dominate one-shot payoff grabs. The cooperative \
                        equilibrium yields steadier returns than betrayal, which only \
                        pays once before everyone defects against you permanently.";
        let score = challenge.score_response(response, &ctx()).await;
        assert!(score.value() >= 85);
    }

    #[tokio::test]
    async fn test_bare_neutral_scores_low() {
        let challenge = AllianceChallenge;
        let score = challenge.score_response("neutral", &ctx()).await;
        assert_eq!(score.value(), 40);
    }
}
