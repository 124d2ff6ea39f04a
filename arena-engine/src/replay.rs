//! Event-sourced replay log
//!
//! Per game, sequence numbers are contiguous starting at 1 with no gaps
//! or duplicates, and insertion order equals sequence order. The counter
//! map is process-local; `cleanup` drops a concluded game's counter while
//! its rows remain readable.

use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;

/// A durable, ordered, already-sanitized record of one engine event.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayEvent {
    pub sequence: u64,
    pub event_type: String,
    pub data: Value,
    /// Unix seconds at insertion
    pub timestamp: u64,
}

#[derive(Default)]
struct ReplayInner {
    sequences: FxHashMap<String, u64>,
    events: FxHashMap<String, Vec<ReplayEvent>>,
}

/// In-memory event store keyed by game id.
#[derive(Default)]
pub struct ReplayLog {
    inner: RwLock<ReplayInner>,
}

impl ReplayLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event under the next sequence number for `game_id`.
    pub fn record(&self, game_id: &str, event_type: &str, data: Value) -> u64 {
        let mut inner = self.inner.write().unwrap();
        let counter = inner.sequences.entry(game_id.to_string()).or_insert(0);
        *counter += 1;
        let sequence = *counter;

        inner
            .events
            .entry(game_id.to_string())
            .or_default()
            .push(ReplayEvent {
                sequence,
                event_type: event_type.to_string(),
                data,
                timestamp: unix_now(),
            });
        sequence
    }

    /// All events for a game, ordered by sequence ascending.
    pub fn get_replay(&self, game_id: &str) -> Vec<ReplayEvent> {
        self.inner
            .read()
            .unwrap()
            .events
            .get(game_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn event_count(&self, game_id: &str) -> usize {
        self.inner
            .read()
            .unwrap()
            .events
            .get(game_id)
            .map(|e| e.len())
            .unwrap_or(0)
    }

    /// Drop the in-memory counter once a game concludes. Rows remain.
    pub fn cleanup(&self, game_id: &str) {
        self.inner.write().unwrap().sequences.remove(game_id);
    }

    /// Whether a live sequence counter exists for the game.
    pub fn has_counter(&self, game_id: &str) -> bool {
        self.inner.read().unwrap().sequences.contains_key(game_id)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
