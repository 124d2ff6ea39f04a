//! Trivia challenge - keyword-matched answers with reasoning bonuses

use async_trait::async_trait;

use super::word_count;
use crate::registry::{Challenge, ChallengeContext};
use crate::scorer::NormalizedScore;

struct TriviaQuestion {
    question: &'static str,
    keywords: &'static [&'static str],
    topic: &'static str,
}

const QUESTIONS: [TriviaQuestion; 12] = [
    TriviaQuestion {
        question: "What is the speed of light in a vacuum, approximately in km/s?",
        keywords: &["300000", "300,000", "3×10^8", "3e8", "3 × 10"],
        topic: "science",
    },
    TriviaQuestion {
        question: "Who painted the Mona Lisa?",
        keywords: &["leonardo", "da vinci", "davinci"],
        topic: "history",
    },
    TriviaQuestion {
        question: "What programming language was created by Brendan Eich in 10 days?",
        keywords: &["javascript", "js"],
        topic: "tech",
    },
    TriviaQuestion {
        question: "What is the largest planet in our solar system?",
        keywords: &["jupiter"],
        topic: "science",
    },
    TriviaQuestion {
        question: "In what year did the Berlin Wall fall?",
        keywords: &["1989"],
        topic: "history",
    },
    TriviaQuestion {
        question: "What company created the iPhone?",
        keywords: &["apple"],
        topic: "tech",
    },
    TriviaQuestion {
        question: "What is the chemical symbol for gold?",
        keywords: &["au"],
        topic: "science",
    },
    TriviaQuestion {
        question: "Who wrote \"1984\"?",
        keywords: &["orwell", "george orwell"],
        topic: "pop culture",
    },
    TriviaQuestion {
        question: "What does \"HTTP\" stand for?",
        keywords: &["hypertext", "transfer", "protocol"],
        topic: "tech",
    },
    TriviaQuestion {
        question: "What element has the atomic number 1?",
        keywords: &["hydrogen"],
        topic: "science",
    },
    TriviaQuestion {
        question: "Who was the first person to walk on the Moon?",
        keywords: &["armstrong", "neil"],
        topic: "history",
    },
    TriviaQuestion {
        question: "What is the smallest prime number?",
        keywords: &["2", "two"],
        topic: "science",
    },
];

pub struct TriviaChallenge;

impl TriviaChallenge {
    fn question_for(round: u32) -> &'static TriviaQuestion {
        &QUESTIONS[round as usize % QUESTIONS.len()]
    }
}

#[async_trait]
impl Challenge for TriviaChallenge {
    fn type_key(&self) -> &'static str {
        "trivia"
    }

    fn description(&self) -> &'static str {
        "Trivia challenge — scored on accuracy and reasoning"
    }

    fn public_description(&self) -> &'static str {
        "Trivia Challenge: Test your knowledge across science, history, tech, and more!"
    }

    fn generate_prompt(&self, context: &ChallengeContext<'_>) -> String {
        let q = Self::question_for(context.round);
        format!(
            "Trivia Challenge ({}):\n\n{}\n\nProvide your answer clearly. Then briefly \
             explain your reasoning. Start your response with \"Answer: \" followed by \
             your answer.",
            q.topic, q.question
        )
    }

    async fn score_response(
        &self,
        response: &str,
        context: &ChallengeContext<'_>,
    ) -> NormalizedScore {
        let q = Self::question_for(context.round);
        let lower = response.to_lowercase();

        let correct = q.keywords.iter().any(|k| lower.contains(&k.to_lowercase()));
        let mut score: i32 = if correct { 70 } else { 0 };

        if lower.contains("answer:") {
            score += 10;
        }

        let words = word_count(response);
        if words > 20 {
            score += 10;
        }
        if words > 50 {
            score += 5;
        }

        // Penalty for very short or empty
        if words < 5 {
            score = (score - 20).max(0);
        }

        // Small score for effort even if wrong
        if score == 0 && words > 10 {
            score = 15;
        }

        // Confidence bonus: stating the correct answer with substance
        if correct && words >= 10 {
            score += 5;
        }

        NormalizedScore::new(score as f64)
    }
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
    async fn test_correct_answer_scores_high() {
        let challenge = TriviaChallenge;
        // Round 4 question: Berlin Wall (1989)
        let response = "Answer: 1989. The wall fell in November of that year after weeks \
                        of mounting protest across East Germany.";
        let score = challenge.score_response(response, &ctx(4)).await;
        assert!(score.value() >= 85);
    }

    #[tokio::test]
    async fn test_wrong_answer_with_effort_gets_small_score() {
        let challenge = TriviaChallenge;
        let response = "I am fairly sure the correct figure here is nineteen seventy six, \
                        based on what I remember from school.";
        let score = challenge.score_response(response, &ctx(4)).await;
        assert_eq!(score.value(), 15);
    }

    #[tokio::test]
    async fn test_empty_response_scores_zero() {
        let challenge = TriviaChallenge;
        let score = challenge.score_response("", &ctx(0)).await;
        assert_eq!(score.value(), 0);
    }

    #[test]
    fn test_prompt_names_topic() {
        let challenge = TriviaChallenge;
        let prompt = challenge.generate_prompt(&ctx(1));
        assert!(prompt.contains("history"));
        assert!(prompt.contains("Mona Lisa"));
    }
}
