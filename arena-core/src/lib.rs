//! Agent Arena Core - domain types and challenge mechanics
//!
//! This crate provides the leaf pieces of the arena:
//! - Agent, matchup, and standing types
//! - Score normalization (every score is a bounded 0-100 integer)
//! - Deterministic round pairing with rotating byes
//! - The `Challenge` trait, its registry, and the shipped strategies

pub mod challenges;
pub mod pairing;
pub mod registry;
pub mod scorer;
pub mod types;

// Re-exports for convenient access
pub use pairing::create_matchups;
pub use registry::{Challenge, ChallengeContext, ChallengeRegistry, RegistryError};
pub use scorer::NormalizedScore;
pub use types::{
    ActiveAgent, Agent, ChallengeInfo, GameConfig, GameMode, Matchup, MatchupKind, PublicAgent,
    RoundResult, Standing, Visibility,
};
