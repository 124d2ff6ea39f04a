//! Live game state projection
//!
//! Folds the engine's event stream into a spectator-safe snapshot per
//! game, so a reconnecting client can be brought back to current truth
//! with a single `FULL_STATE` push instead of replaying history.

use std::sync::RwLock;

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;

use arena_core::types::{ChallengeInfo, PublicAgent};
use arena_engine::GameEvent;

/// Lifecycle status exposed to spectators and HTTP clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Pending,
    Running,
    Completed,
    Cancelled,
}

/// Spectator-safe snapshot of one game. Contains display ids only.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicGameState {
    pub game_id: String,
    pub status: GameStatus,
    pub current_round: u32,
    pub total_rounds: u32,
    pub agents: Vec<PublicAgent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_challenge: Option<ChallengeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<PublicAgent>,
}

/// Registry of live snapshots, one per known game.
pub struct LiveGames {
    games: RwLock<FxHashMap<String, PublicGameState>>,
}

impl LiveGames {
    pub fn new() -> Self {
        Self {
            games: RwLock::new(FxHashMap::default()),
        }
    }

    /// Fold one engine event into the game's snapshot.
    pub fn apply(&self, event: &GameEvent) {
        let mut games = self.games.write().unwrap();
        match event {
            GameEvent::GameStart {
                game_id,
                agents,
                rounds,
            } => {
                games.insert(
                    game_id.clone(),
                    PublicGameState {
                        game_id: game_id.clone(),
                        status: GameStatus::Running,
                        current_round: 0,
                        total_rounds: *rounds,
                        agents: agents.clone(),
                        current_challenge: None,
                        winner: None,
                    },
                );
            }
            GameEvent::RoundStart { game_id, round, .. } => {
                if let Some(state) = games.get_mut(game_id) {
                    state.current_round = *round;
                    state.current_challenge = None;
                }
            }
            GameEvent::ChallengeStart { game_id, challenge } => {
                if let Some(state) = games.get_mut(game_id) {
                    state.current_challenge = Some(challenge.clone());
                }
            }
            GameEvent::AgentResponse {
                game_id,
                display_id,
                score,
                ..
            } => {
                if let Some(state) = games.get_mut(game_id) {
                    if let Some(agent) =
                        state.agents.iter_mut().find(|a| &a.display_id == display_id)
                    {
                        agent.score += score;
                    }
                }
            }
            GameEvent::RoundEnd { game_id, results, .. } => {
                // Bye scores arrive only through round results
                if let Some(state) = games.get_mut(game_id) {
                    for result in results.iter().filter(|r| r.response.is_none()) {
                        if let Some(agent) = state
                            .agents
                            .iter_mut()
                            .find(|a| a.display_id == result.display_id)
                        {
                            agent.score += result.score;
                        }
                    }
                }
            }
            GameEvent::Elimination {
                game_id,
                display_id,
                ..
            } => {
                if let Some(state) = games.get_mut(game_id) {
                    if let Some(agent) =
                        state.agents.iter_mut().find(|a| &a.display_id == display_id)
                    {
                        agent.eliminated = true;
                    }
                }
            }
            GameEvent::GameEnd {
                game_id, winner, ..
            } => {
                if let Some(state) = games.get_mut(game_id) {
                    state.status = GameStatus::Completed;
                    state.winner = Some(winner.clone());
                }
            }
            GameEvent::GameError { game_id, .. } => {
                if let Some(state) = games.get_mut(game_id) {
                    state.status = GameStatus::Cancelled;
                }
            }
            GameEvent::AgentQuery { .. } => {}
        }
    }

    /// Current snapshot for a game, serialized for the wire.
    pub fn snapshot(&self, game_id: &str) -> Option<Value> {
        let games = self.games.read().unwrap();
        games
            .get(game_id)
            .and_then(|state| serde_json::to_value(state).ok())
    }

    pub fn status(&self, game_id: &str) -> Option<GameStatus> {
        let games = self.games.read().unwrap();
        games.get(game_id).map(|s| s.status)
    }

    /// All known games with their statuses, for listing endpoints.
    pub fn list(&self) -> Vec<(String, GameStatus)> {
        let games = self.games.read().unwrap();
        let mut out: Vec<(String, GameStatus)> = games
            .values()
            .map(|s| (s.game_id.clone(), s.status))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    pub fn running_count(&self) -> usize {
        let games = self.games.read().unwrap();
        games
            .values()
            .filter(|s| s.status == GameStatus::Running)
            .count()
    }
}

impl Default for LiveGames {
    fn default() -> Self {
        Self::new()
    }
}
