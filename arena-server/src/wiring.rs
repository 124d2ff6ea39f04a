//! Event sinks bridging the engine to server-side consumers
//!
//! The engine publishes once; these sinks fan the stream out to the
//! live snapshot, the spectator hub, and the leaderboard. Sanitization
//! happens before anything crosses into the hub.

use std::sync::Arc;

use arena_engine::{sanitize, EventSink, GameEvent, Leaderboard};

use crate::hub::BroadcastHub;
use crate::live::LiveGames;
use crate::protocol::{event_frame, full_state_frame, wire_type};

/// Keeps the per-game live snapshot current. Must run before the
/// broadcast sink so `FULL_STATE` pushes reflect the event being sent.
pub struct LiveSink {
    live: Arc<LiveGames>,
}

impl LiveSink {
    pub fn new(live: Arc<LiveGames>) -> Self {
        Self { live }
    }
}

impl EventSink for LiveSink {
    fn publish(&self, event: &GameEvent) {
        self.live.apply(event);
    }
}

/// Pushes sanitized events to every spectator of the game.
pub struct BroadcastSink {
    hub: Arc<BroadcastHub>,
    live: Arc<LiveGames>,
}

impl BroadcastSink {
    pub fn new(hub: Arc<BroadcastHub>, live: Arc<LiveGames>) -> Self {
        Self { hub, live }
    }
}

impl EventSink for BroadcastSink {
    fn publish(&self, event: &GameEvent) {
        let Some(payload) = sanitize(event) else {
            return;
        };
        let Some(frame_type) = wire_type(event.event_type()) else {
            return;
        };
        let game_id = event.game_id();
        let frame = if frame_type == "FULL_STATE" {
            // Game start reaches spectators as a complete snapshot
            let snapshot = self.live.snapshot(game_id).unwrap_or(payload);
            full_state_frame(snapshot, self.hub.spectator_count(game_id))
        } else {
            event_frame(frame_type, payload)
        };
        self.hub.broadcast(game_id, &frame);
    }
}

/// Folds terminal events into the leaderboard.
pub struct RatingSink {
    leaderboard: Arc<Leaderboard>,
}

impl RatingSink {
    pub fn new(leaderboard: Arc<Leaderboard>) -> Self {
        Self { leaderboard }
    }
}

impl EventSink for RatingSink {
    fn publish(&self, event: &GameEvent) {
        if let GameEvent::GameEnd {
            game_id,
            final_standings,
            ..
        } = event
        {
            tracing::debug!(game_id = %game_id, "folding standings into leaderboard");
            self.leaderboard.update_from_game(final_standings);
        }
    }
}
