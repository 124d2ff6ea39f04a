//! Game lifecycle and state endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use arena_core::types::{Agent, GameConfig};

use crate::launcher::LaunchError;
use crate::protocol::is_game_id;
use crate::state::ServerState;

#[derive(Deserialize)]
pub struct StartGameRequest {
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub config: GameConfig,
}

/// Start a game with a frozen roster. One start per game id, ever.
pub async fn start_game(
    State(state): State<Arc<ServerState>>,
    Path(game_id): Path<String>,
    Json(req): Json<StartGameRequest>,
) -> (StatusCode, Json<Value>) {
    if !is_game_id(&game_id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid game ID" })),
        );
    }

    match state.launcher.start(&game_id, req.agents, req.config) {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(json!({ "gameId": game_id, "started": true })),
        ),
        Err(err @ LaunchError::AlreadyStarted(_)) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": err.to_string() })),
        ),
        Err(err @ LaunchError::RosterTooSmall) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        ),
    }
}

/// List known games and their statuses.
pub async fn list_games(State(state): State<Arc<ServerState>>) -> Json<Value> {
    let games: Vec<Value> = state
        .live
        .list()
        .into_iter()
        .map(|(game_id, status)| json!({ "gameId": game_id, "status": status }))
        .collect();
    Json(json!({ "games": games }))
}

/// Current spectator-safe snapshot of one game.
pub async fn get_game(
    State(state): State<Arc<ServerState>>,
    Path(game_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    match state.live.snapshot(&game_id) {
        Some(snapshot) => (StatusCode::OK, Json(snapshot)),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Game not found" })),
        ),
    }
}
