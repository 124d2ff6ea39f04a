//! Shared domain types for the arena
//!
//! The engine owns a private `ActiveAgent` copy per game; identity fields
//! are never mutated after roster freeze. Only display identifiers cross
//! the broadcast boundary.

use serde::{Deserialize, Serialize};

/// Immutable identity of a competing agent.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Internal id (never broadcast)
    pub id: String,
    /// Spectator-facing id
    pub display_id: String,
    pub name: String,
    /// Personality seed used when building prompts
    pub personality: String,
    /// System prompt handed to the backing model (never broadcast)
    pub system_prompt: String,
    /// Seed for avatar rendering on the client
    pub avatar_seed: String,
}

/// An agent inside a running game: identity plus per-game mutable state.
#[derive(Clone, Debug)]
pub struct ActiveAgent {
    pub agent: Agent,
    /// Cumulative score across rounds
    pub score: u32,
    pub eliminated: bool,
    /// Round in which the agent was eliminated, if any
    pub eliminated_round: Option<u32>,
}

impl ActiveAgent {
    pub fn new(agent: Agent) -> Self {
        Self {
            agent,
            score: 0,
            eliminated: false,
            eliminated_round: None,
        }
    }

    /// Spectator-safe projection (no internal id, no system prompt).
    pub fn to_public(&self) -> PublicAgent {
        PublicAgent {
            display_id: self.agent.display_id.clone(),
            name: self.agent.name.clone(),
            avatar_seed: self.agent.avatar_seed.clone(),
            score: self.score,
            eliminated: self.eliminated,
        }
    }
}

/// What spectators are allowed to see of an agent.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAgent {
    pub display_id: String,
    pub name: String,
    pub avatar_seed: String,
    pub score: u32,
    pub eliminated: bool,
}

/// Tournament mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Lowest scorer drops each round while more than two remain
    Elimination,
    /// Nobody is eliminated; highest cumulative score wins
    RoundRobin,
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::Elimination
    }
}

/// Who may spectate the game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Public
    }
}

/// Per-game configuration
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    pub mode: GameMode,
    pub visibility: Visibility,
    /// Seed for challenge selection (None = entropy; set for reproducible runs)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Elimination,
            visibility: Visibility::Public,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn elimination() -> Self {
        Self::default()
    }

    pub fn round_robin() -> Self {
        Self {
            mode: GameMode::RoundRobin,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Kind of pairing unit produced for a round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchupKind {
    #[serde(rename = "head-to-head")]
    HeadToHead,
    #[serde(rename = "bye")]
    Bye,
}

/// One round's pairing unit. Holds indices into the roster slice handed
/// to `create_matchups`; ephemeral, rebuilt every round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matchup {
    pub kind: MatchupKind,
    /// One index for a bye, two for head-to-head
    pub agents: Vec<usize>,
}

/// Metadata describing a challenge to spectators and replays.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeInfo {
    #[serde(rename = "type")]
    pub type_key: String,
    pub description: String,
    pub public_description: String,
}

/// Per-agent outcome of a single round.
#[derive(Clone, Debug)]
pub struct RoundResult {
    pub agent_id: String,
    pub display_id: String,
    pub score: u32,
    /// Raw submission text; `None` for byes. Only used transiently for
    /// scoring, redacted before leaving the engine.
    pub response: Option<String>,
}

/// Derived per-agent rank snapshot computed at game end.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub agent_id: String,
    pub display_id: String,
    pub name: String,
    pub score: u32,
    /// 1..N, 1 is the winner
    pub placement: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eliminated_round: Option<u32>,
}
