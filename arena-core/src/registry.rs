//! Challenge trait and registry
//!
//! Challenge types are interchangeable behind one capability set: build a
//! prompt, score a submission. New types register independently; the
//! engine never needs to know which strategies exist.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;

use crate::scorer::NormalizedScore;
use crate::types::{ActiveAgent, ChallengeInfo};

/// Context handed to a challenge when generating a prompt or scoring.
pub struct ChallengeContext<'a> {
    pub round: u32,
    /// The agents in the matchup being played
    pub agents: &'a [ActiveAgent],
    /// Scoring criteria (the challenge's own internal description)
    pub criteria: &'a str,
}

/// One pluggable challenge type.
///
/// Scoring may be asynchronous so a strategy can delegate to an external
/// judge; the shipped strategies are self-contained heuristics.
#[async_trait]
pub trait Challenge: Send + Sync {
    /// Stable key the registry indexes by
    fn type_key(&self) -> &'static str;
    /// Internal description; doubles as scoring criteria
    fn description(&self) -> &'static str;
    /// Spectator-safe description (never reveals scoring internals)
    fn public_description(&self) -> &'static str;

    fn generate_prompt(&self, context: &ChallengeContext<'_>) -> String;

    async fn score_response(
        &self,
        response: &str,
        context: &ChallengeContext<'_>,
    ) -> NormalizedScore;
}

/// Spectator/replay metadata for a challenge.
pub fn challenge_info(challenge: &dyn Challenge) -> ChallengeInfo {
    ChallengeInfo {
        type_key: challenge.type_key().to_string(),
        description: challenge.description().to_string(),
        public_description: challenge.public_description().to_string(),
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Selecting from an empty registry is a configuration error; the
    /// engine surfaces it as a game error rather than crashing.
    #[error("no challenges registered")]
    Empty,
}

/// Holds the set of registered challenge strategies.
pub struct ChallengeRegistry {
    challenges: Vec<Arc<dyn Challenge>>,
}

impl ChallengeRegistry {
    pub fn new() -> Self {
        Self {
            challenges: Vec::new(),
        }
    }

    /// Registry pre-loaded with the five shipped strategies.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::challenges::DebateChallenge));
        registry.register(Arc::new(crate::challenges::StrategyChallenge));
        registry.register(Arc::new(crate::challenges::TriviaChallenge));
        registry.register(Arc::new(crate::challenges::CreativeChallenge));
        registry.register(Arc::new(crate::challenges::AllianceChallenge));
        registry
    }

    /// Register a challenge, replacing any prior entry with the same key.
    pub fn register(&mut self, challenge: Arc<dyn Challenge>) {
        if let Some(existing) = self
            .challenges
            .iter_mut()
            .find(|c| c.type_key() == challenge.type_key())
        {
            *existing = challenge;
        } else {
            self.challenges.push(challenge);
        }
    }

    pub fn get(&self, type_key: &str) -> Option<Arc<dyn Challenge>> {
        self.challenges
            .iter()
            .find(|c| c.type_key() == type_key)
            .cloned()
    }

    /// Uniform-random selection over the registered strategies.
    pub fn get_random<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Arc<dyn Challenge>, RegistryError> {
        if self.challenges.is_empty() {
            return Err(RegistryError::Empty);
        }
        let index = rng.gen_range(0..self.challenges.len());
        Ok(Arc::clone(&self.challenges[index]))
    }

    pub fn all(&self) -> &[Arc<dyn Challenge>] {
        &self.challenges
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }
}

impl Default for ChallengeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
