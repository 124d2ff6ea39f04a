//! Status endpoint

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::ServerState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub engine: &'static str,
    #[serde(rename = "activeGames")]
    pub active_games: usize,
    pub connections: usize,
}

pub async fn status_handler(State(state): State<Arc<ServerState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        engine: "rust",
        active_games: state.live.running_count(),
        connections: state.hub.connection_count(),
    })
}
