//! Replay read endpoint
//!
//! The replay already went through sanitization when recorded, so the
//! rows are safe for direct external exposure.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::state::ServerState;

/// Get the ordered event log for a game.
pub async fn get_replay(
    State(state): State<Arc<ServerState>>,
    Path(game_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let events = state.replay.get_replay(&game_id);
    let status = state.live.status(&game_id);

    if events.is_empty() && status.is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Game not found" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "gameId": game_id,
            "status": status,
            "totalEvents": events.len(),
            "events": events,
        })),
    )
}
