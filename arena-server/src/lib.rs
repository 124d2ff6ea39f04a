//! Agent Arena Server - HTTP + WebSocket backend
//!
//! This crate provides the web layer around the tournament engine:
//! - REST API for starting games, replay reads, and the leaderboard
//! - WebSocket fan-out that streams sanitized game events to spectators
//! - Static file serving for the spectator UI

mod hub;
mod launcher;
mod live;
mod protocol;
mod routes;
mod state;
mod wiring;
mod ws;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use hub::{BroadcastHub, GOING_AWAY};
pub use launcher::{GameLauncher, LaunchError};
pub use live::{GameStatus, LiveGames, PublicGameState};
pub use protocol::{parse_client_message, ClientMessage, ProtocolError};
pub use state::ServerState;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8010,
            static_dir: "arena/spectator".to_string(),
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Game lifecycle and state
        .route("/api/games", get(routes::games::list_games))
        .route("/api/games/:id", get(routes::games::get_game))
        .route("/api/games/:id/start", post(routes::games::start_game))
        // Replay API
        .route("/api/games/:id/replay", get(routes::replay::get_replay))
        // Leaderboard API
        .route("/api/leaderboard", get(routes::leaderboard::get_leaderboard))
        // Spectator stream
        .route("/ws", get(ws::ws_handler))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive())
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::new());
    let router = create_router(&config, state.clone());

    tracing::info!("Arena Server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

/// Wait for Ctrl-C, then close every spectator with a "going away"
/// frame so clients can distinguish shutdown from a network fault.
async fn shutdown_signal(state: Arc<ServerState>) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown handler");
        return;
    }
    tracing::info!("shutting down, closing spectator connections");
    state.hub.close_all();
}
