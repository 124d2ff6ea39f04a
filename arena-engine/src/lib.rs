//! Agent Arena Engine - tournament orchestration
//!
//! This crate drives a multi-round elimination tournament to completion:
//! - Typed domain events with redaction rules for everything that leaves
//!   the engine's trust boundary
//! - The `TournamentEngine` state machine (rounds, byes, elimination)
//! - An event-sourced replay log with strictly increasing sequences
//! - The pairwise ELO leaderboard updater
//!
//! The engine is the sole writer of game state; persistence, broadcast,
//! and rating are pure consumers of its emitted event stream.

pub mod engine;
pub mod events;
pub mod leaderboard;
pub mod query;
pub mod replay;
pub mod sanitize;
pub mod sink;

// Re-exports for convenient access
pub use engine::{EngineError, TournamentEngine};
pub use events::{GameEvent, MatchupSummary};
pub use leaderboard::{Leaderboard, LeaderboardEntry, DEFAULT_RATING, K_FACTOR};
pub use query::QueryHandler;
pub use replay::{ReplayEvent, ReplayLog};
pub use sanitize::{sanitize, REDACTION_MARKER};
pub use sink::{EventSink, FanoutSink, MemorySink, ReplaySink};
