//! Server-wide shared state
//!
//! One instance wires the engine's event stream into the replay log,
//! the live snapshot registry, the leaderboard, and the spectator hub.

use std::sync::Arc;

use arena_core::ChallengeRegistry;
use arena_engine::{
    EventSink, FanoutSink, Leaderboard, QueryHandler, ReplayLog, ReplaySink, TournamentEngine,
};

use crate::hub::BroadcastHub;
use crate::launcher::GameLauncher;
use crate::live::LiveGames;
use crate::wiring::{BroadcastSink, LiveSink, RatingSink};

pub struct ServerState {
    pub hub: Arc<BroadcastHub>,
    pub replay: Arc<ReplayLog>,
    pub leaderboard: Arc<Leaderboard>,
    pub live: Arc<LiveGames>,
    pub launcher: GameLauncher,
}

impl ServerState {
    pub fn new() -> Self {
        Self::with_query_handler(None)
    }

    /// Build the full sink chain and engine. The live sink runs before
    /// the broadcast sink so snapshots are current when pushed.
    pub fn with_query_handler(query: Option<Arc<dyn QueryHandler>>) -> Self {
        let hub = Arc::new(BroadcastHub::new());
        let replay = Arc::new(ReplayLog::new());
        let leaderboard = Arc::new(Leaderboard::new());
        let live = Arc::new(LiveGames::new());

        let sinks: Vec<Arc<dyn EventSink>> = vec![
            Arc::new(LiveSink::new(live.clone())),
            Arc::new(ReplaySink::new(replay.clone())),
            Arc::new(BroadcastSink::new(hub.clone(), live.clone())),
            Arc::new(RatingSink::new(leaderboard.clone())),
        ];
        let registry = Arc::new(ChallengeRegistry::with_defaults());
        let mut engine = TournamentEngine::new(registry, Arc::new(FanoutSink::new(sinks)));
        if let Some(handler) = query {
            engine = engine.with_query_handler(handler);
        }

        Self {
            hub,
            replay,
            leaderboard,
            live,
            launcher: GameLauncher::new(Arc::new(engine)),
        }
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
