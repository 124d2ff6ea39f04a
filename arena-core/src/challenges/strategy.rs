//! Strategy challenge - iterated prisoner's dilemma

use async_trait::async_trait;

use crate::registry::{Challenge, ChallengeContext};
use crate::scorer::NormalizedScore;

pub struct StrategyChallenge;

#[async_trait]
impl Challenge for StrategyChallenge {
    fn type_key(&self) -> &'static str {
        "strategy"
    }

    fn description(&self) -> &'static str {
        "Prisoner's dilemma style strategy challenge"
    }

    fn public_description(&self) -> &'static str {
        "Strategy Challenge: Agents face a classic dilemma — cooperate or compete?"
    }

    fn generate_prompt(&self, _context: &ChallengeContext<'_>) -> String {
        "You are playing a strategy game. You must choose: COOPERATE or DEFECT.\n\n\
         Rules:\n\
         - If both players cooperate: both get 60 points\n\
         - If both defect: both get 30 points\n\
         - If one cooperates and one defects: defector gets 80, cooperator gets 10\n\n\
         You will play 3 rounds. For each round, state your choice (COOPERATE or DEFECT) \
         and briefly explain your reasoning.\n\n\
         Format your response as:\n\
         Round 1: [COOPERATE/DEFECT] - [reasoning]\n\
         Round 2: [COOPERATE/DEFECT] - [reasoning]\n\
         Round 3: [COOPERATE/DEFECT] - [reasoning]"
            .to_string()
    }

    async fn score_response(
        &self,
        response: &str,
        _context: &ChallengeContext<'_>,
    ) -> NormalizedScore {
        let upper = response.to_uppercase();
        let mut total: u32 = 0;
        let mut rounds: u32 = 0;

        for line in upper.lines() {
            if line.contains("ROUND") {
                rounds += 1;
                if line.contains("COOPERATE") {
                    // Assume the opponent cooperates for solo scoring
                    total += 60;
                } else if line.contains("DEFECT") {
                    total += 40;
                } else {
                    // No valid choice on the line
                    total += 30;
                }
            }
        }

        // Max possible is 3 rounds of 60; scale to 0-100
        let max_possible = rounds.max(3) * 60;
        let normalized = total as f64 / max_possible as f64 * 100.0;

        let bonus = if response.len() > 100 { 10.0 } else { 0.0 };

        NormalizedScore::new(normalized + bonus)
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

    #[tokio::test]
    async fn test_full_cooperation_with_reasoning_scores_max() {
        let challenge = StrategyChallenge;
        let response = "Round 1: COOPERATE - trust builds mutual payoff over time\n\
                        Round 2: COOPERATE - sticking with the cooperative line\n\
                        Round 3: COOPERATE - no reason to defect on the last move";
        let score = challenge.score_response(response, &ctx()).await;
        // 180/180 * 100 + 10 length bonus, clamped to 100
        assert_eq!(score.value(), 100);
    }

    #[tokio::test]
    async fn test_defection_scores_below_cooperation() {
        let challenge = StrategyChallenge;
        let cooperate = "Round 1: COOPERATE\nRound 2: COOPERATE\nRound 3: COOPERATE";
        let defect = "Round 1: DEFECT\nRound 2: DEFECT\nRound 3: DEFECT";
        let c = challenge.score_response(cooperate, &ctx()).await;
        let d = challenge.score_response(defect, &ctx()).await;
        assert!(c.value() > d.value());
    }

    #[tokio::test]
    async fn test_no_round_lines_scores_zero() {
        let challenge = StrategyChallenge;
        let score = challenge.score_response("I refuse to play.", &ctx()).await;
        assert_eq!(score.value(), 0);
    }

    #[tokio::test]
    async fn test_invalid_choice_gets_low_round_credit() {
        let challenge = StrategyChallenge;
        let response = "Round 1: maybe\nRound 2: unsure\nRound 3: pass";
        let score = challenge.score_response(response, &ctx()).await;
        // 90/180 * 100 = 50, no length bonus
        assert_eq!(score.value(), 50);
    }
}
