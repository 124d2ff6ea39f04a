//! Domain events emitted by the tournament engine
//!
//! A closed set of tagged payloads. Every event except `agent:query` is
//! durable; `agent:query` carries the raw outbound prompt and must never
//! be persisted or broadcast (see `sanitize`).

use serde::{Deserialize, Serialize};

use arena_core::types::{ChallengeInfo, MatchupKind, PublicAgent, RoundResult, Standing};

/// Summary of one matchup as exposed to spectators: kind plus display ids.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupSummary {
    #[serde(rename = "type")]
    pub kind: MatchupKind,
    pub agent_display_ids: Vec<String>,
}

/// One engine-emitted fact about a game.
#[derive(Clone, Debug)]
pub enum GameEvent {
    GameStart {
        game_id: String,
        agents: Vec<PublicAgent>,
        rounds: u32,
    },
    RoundStart {
        game_id: String,
        round: u32,
        matchups: Vec<MatchupSummary>,
    },
    ChallengeStart {
        game_id: String,
        challenge: ChallengeInfo,
    },
    /// Raw outbound prompt; non-durable and never broadcast.
    AgentQuery {
        game_id: String,
        agent_id: String,
        prompt: String,
    },
    AgentResponse {
        game_id: String,
        display_id: String,
        response: String,
        score: u32,
    },
    RoundEnd {
        game_id: String,
        round: u32,
        results: Vec<RoundResult>,
    },
    Elimination {
        game_id: String,
        display_id: String,
        round: u32,
    },
    GameEnd {
        game_id: String,
        winner: PublicAgent,
        final_standings: Vec<Standing>,
    },
    GameError {
        game_id: String,
        error: String,
    },
}

impl GameEvent {
    /// Stable tag used for replay rows and event routing.
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::GameStart { .. } => "game:start",
            GameEvent::RoundStart { .. } => "round:start",
            GameEvent::ChallengeStart { .. } => "challenge:start",
            GameEvent::AgentQuery { .. } => "agent:query",
            GameEvent::AgentResponse { .. } => "agent:response",
            GameEvent::RoundEnd { .. } => "round:end",
            GameEvent::Elimination { .. } => "elimination",
            GameEvent::GameEnd { .. } => "game:end",
            GameEvent::GameError { .. } => "game:error",
        }
    }

    pub fn game_id(&self) -> &str {
        match self {
            GameEvent::GameStart { game_id, .. }
            | GameEvent::RoundStart { game_id, .. }
            | GameEvent::ChallengeStart { game_id, .. }
            | GameEvent::AgentQuery { game_id, .. }
            | GameEvent::AgentResponse { game_id, .. }
            | GameEvent::RoundEnd { game_id, .. }
            | GameEvent::Elimination { game_id, .. }
            | GameEvent::GameEnd { game_id, .. }
            | GameEvent::GameError { game_id, .. } => game_id,
        }
    }

    /// Terminal events end a game's lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GameEvent::GameEnd { .. } | GameEvent::GameError { .. }
        )
    }
}
