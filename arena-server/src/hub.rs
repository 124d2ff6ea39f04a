//! Spectator fan-out hub
//!
//! Tracks live connections and their per-game subscriber sets. One
//! connection subscribes to at most one game at a time; subscribing
//! again replaces the prior subscription. Broadcasts to one game never
//! reach subscribers of another.

use std::sync::Mutex;

use axum::extract::ws::{CloseFrame, Message};
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

/// Close code sent when the server shuts down ("going away").
pub const GOING_AWAY: u16 = 1001;

struct ConnectionEntry {
    sender: UnboundedSender<Message>,
    game: Option<String>,
}

struct HubInner {
    next_id: u64,
    connections: FxHashMap<u64, ConnectionEntry>,
    games: FxHashMap<String, FxHashSet<u64>>,
}

/// Connection registry and per-game broadcast sets.
///
/// All mutation happens in short critical sections; serialization of
/// outbound frames happens outside the lock.
pub struct BroadcastHub {
    inner: Mutex<HubInner>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HubInner {
                next_id: 0,
                connections: FxHashMap::default(),
                games: FxHashMap::default(),
            }),
        }
    }

    /// Register a new connection and return its id.
    pub fn register(&self, sender: UnboundedSender<Message>) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.connections.insert(id, ConnectionEntry { sender, game: None });
        id
    }

    /// Remove a connection and drop it from its game's subscriber set.
    pub fn unregister(&self, conn_id: u64) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(entry) = inner.connections.remove(&conn_id) {
            if let Some(game_id) = entry.game {
                remove_subscriber(&mut inner, &game_id, conn_id);
            }
        }
    }

    /// Subscribe a connection to a game, replacing any prior
    /// subscription.
    pub fn subscribe(&self, conn_id: u64, game_id: &str) {
        let mut inner = self.inner.lock().unwrap();
        let previous = match inner.connections.get_mut(&conn_id) {
            Some(entry) => entry.game.replace(game_id.to_string()),
            None => return,
        };
        if let Some(prev) = previous {
            remove_subscriber(&mut inner, &prev, conn_id);
        }
        inner
            .games
            .entry(game_id.to_string())
            .or_default()
            .insert(conn_id);
    }

    /// Unsubscribe a connection; returns the game it was watching.
    pub fn unsubscribe(&self, conn_id: u64) -> Option<String> {
        let mut inner = self.inner.lock().unwrap();
        let game_id = inner.connections.get_mut(&conn_id)?.game.take()?;
        remove_subscriber(&mut inner, &game_id, conn_id);
        Some(game_id)
    }

    /// Game the connection is currently subscribed to, if any.
    pub fn subscription(&self, conn_id: u64) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner.connections.get(&conn_id)?.game.clone()
    }

    /// Send a payload to every subscriber of one game. Connections whose
    /// channel has closed are pruned.
    pub fn broadcast(&self, game_id: &str, payload: &Value) {
        let text = payload.to_string();
        let mut dead: Vec<u64> = Vec::new();
        {
            let inner = self.inner.lock().unwrap();
            let Some(subscribers) = inner.games.get(game_id) else {
                return;
            };
            for &conn_id in subscribers {
                if let Some(entry) = inner.connections.get(&conn_id) {
                    if entry.sender.send(Message::Text(text.clone())).is_err() {
                        dead.push(conn_id);
                    }
                }
            }
        }
        for conn_id in dead {
            tracing::debug!(conn_id, game_id, "pruning dead subscriber");
            self.unregister(conn_id);
        }
    }

    /// Send a payload to a single connection.
    pub fn send_to(&self, conn_id: u64, payload: &Value) {
        let inner = self.inner.lock().unwrap();
        if let Some(entry) = inner.connections.get(&conn_id) {
            // A closed channel is cleaned up by the connection task
            let _ = entry.sender.send(Message::Text(payload.to_string()));
        }
    }

    /// Send a raw frame (ping, close) to a single connection.
    pub fn send_to_raw(&self, conn_id: u64, message: Message) {
        let inner = self.inner.lock().unwrap();
        if let Some(entry) = inner.connections.get(&conn_id) {
            let _ = entry.sender.send(message);
        }
    }

    /// Number of connections subscribed to a game.
    pub fn spectator_count(&self, game_id: &str) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.games.get(game_id).map_or(0, FxHashSet::len)
    }

    /// Total registered connections.
    pub fn connection_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.connections.len()
    }

    /// Close every connection with a "going away" frame. Used during
    /// shutdown.
    pub fn close_all(&self) {
        let mut inner = self.inner.lock().unwrap();
        for entry in inner.connections.values() {
            let _ = entry.sender.send(Message::Close(Some(CloseFrame {
                code: GOING_AWAY,
                reason: "server shutting down".into(),
            })));
        }
        inner.connections.clear();
        inner.games.clear();
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

fn remove_subscriber(inner: &mut HubInner, game_id: &str, conn_id: u64) {
    if let Some(set) = inner.games.get_mut(game_id) {
        set.remove(&conn_id);
        if set.is_empty() {
            inner.games.remove(game_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;

    fn connect(hub: &BroadcastHub) -> (u64, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (hub.register(tx), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Message>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            if let Message::Text(text) = msg {
                out.push(text);
            }
        }
        out
    }

    #[tokio::test]
    async fn test_broadcast_reaches_only_subscribed_game() {
        let hub = BroadcastHub::new();
        let (a, mut rx_a) = connect(&hub);
        let (b, mut rx_b) = connect(&hub);
        let (c, mut rx_c) = connect(&hub);
        hub.subscribe(a, "game-x");
        hub.subscribe(b, "game-x");
        hub.subscribe(c, "game-y");

        hub.broadcast("game-x", &json!({"type": "ROUND_START"}));

        assert_eq!(drain(&mut rx_a).len(), 1);
        assert_eq!(drain(&mut rx_b).len(), 1);
        assert_eq!(drain(&mut rx_c).len(), 0);
    }

    #[tokio::test]
    async fn test_subscribe_replaces_prior_subscription() {
        let hub = BroadcastHub::new();
        let (a, mut rx_a) = connect(&hub);
        hub.subscribe(a, "game-x");
        hub.subscribe(a, "game-y");

        assert_eq!(hub.spectator_count("game-x"), 0);
        assert_eq!(hub.spectator_count("game-y"), 1);

        hub.broadcast("game-x", &json!({"type": "ROUND_START"}));
        assert_eq!(drain(&mut rx_a).len(), 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_and_unregister() {
        let hub = BroadcastHub::new();
        let (a, _rx_a) = connect(&hub);
        hub.subscribe(a, "game-x");

        assert_eq!(hub.unsubscribe(a), Some("game-x".to_string()));
        assert_eq!(hub.spectator_count("game-x"), 0);
        assert_eq!(hub.unsubscribe(a), None);

        hub.unregister(a);
        assert_eq!(hub.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_dead_connections_pruned_on_broadcast() {
        let hub = BroadcastHub::new();
        let (a, rx_a) = connect(&hub);
        hub.subscribe(a, "game-x");
        drop(rx_a);

        hub.broadcast("game-x", &json!({"type": "ROUND_START"}));
        assert_eq!(hub.connection_count(), 0);
        assert_eq!(hub.spectator_count("game-x"), 0);
    }

    #[tokio::test]
    async fn test_close_all_sends_going_away() {
        let hub = BroadcastHub::new();
        let (_a, mut rx_a) = connect(&hub);
        hub.close_all();

        match rx_a.try_recv() {
            Ok(Message::Close(Some(frame))) => assert_eq!(frame.code, GOING_AWAY),
            other => panic!("expected close frame, got {:?}", other),
        }
        assert_eq!(hub.connection_count(), 0);
    }
}
