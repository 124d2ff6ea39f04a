//! Leaderboard endpoint

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::state::ServerState;

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Paginated ratings, best first.
pub async fn get_leaderboard(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Json<Value> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = query.offset.unwrap_or(0);
    let entries = state.leaderboard.top(limit, offset);

    Json(json!({
        "entries": entries,
        "total": state.leaderboard.len(),
        "limit": limit,
        "offset": offset,
    }))
}
