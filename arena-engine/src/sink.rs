//! Event fan-out
//!
//! The engine publishes into a single `EventSink`; composite sinks fan
//! the stream out to persistence, broadcast, and lifecycle consumers
//! without the engine knowing any of them.

use std::sync::{Arc, Mutex};

use crate::events::GameEvent;
use crate::replay::ReplayLog;
use crate::sanitize::sanitize;

/// A consumer of the engine's event stream.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &GameEvent);
}

/// Fans each event out to several sinks in registration order.
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }
}

impl EventSink for FanoutSink {
    fn publish(&self, event: &GameEvent) {
        for sink in &self.sinks {
            sink.publish(event);
        }
    }
}

/// Buffers events in memory; used by tests and the simulate command.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<GameEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything published so far.
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Drain the buffer.
    pub fn take(&self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events.lock().unwrap())
    }
}

impl EventSink for MemorySink {
    fn publish(&self, event: &GameEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Appends every durable event to the replay log, sanitized, and drops
/// the game's sequence counter once it concludes.
pub struct ReplaySink {
    log: Arc<ReplayLog>,
}

impl ReplaySink {
    pub fn new(log: Arc<ReplayLog>) -> Self {
        Self { log }
    }
}

impl EventSink for ReplaySink {
    fn publish(&self, event: &GameEvent) {
        if let Some(data) = sanitize(event) {
            self.log.record(event.game_id(), event.event_type(), data);
        }
        if event.is_terminal() {
            self.log.cleanup(event.game_id());
        }
    }
}
