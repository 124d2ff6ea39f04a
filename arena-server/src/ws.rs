//! Spectator WebSocket endpoint
//!
//! Each connection gets an outbound channel registered with the hub and
//! a read loop that handles the client protocol. Liveness is checked
//! with a periodic ping; a connection that misses a whole interval is
//! closed and removed from its game's subscriber set.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::protocol::{
    error_frame, full_state_frame, parse_client_message, subscribed_frame, unsubscribed_frame,
    ClientMessage,
};
use crate::state::ServerState;

/// Interval between liveness probes.
const HEARTBEAT: Duration = Duration::from_secs(30);

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<ServerState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<ServerState>) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let conn_id = state.hub.register(tx);
    tracing::debug!(conn_id, "spectator connected");

    // Writer task: everything outbound goes through the hub channel so
    // broadcasts and replies share one ordered stream
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() || closing {
                break;
            }
        }
    });

    let mut heartbeat = tokio::time::interval(HEARTBEAT);
    heartbeat.tick().await; // first tick completes immediately
    let mut alive = true;

    loop {
        tokio::select! {
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_text(&state, conn_id, &text);
                    }
                    Some(Ok(Message::Pong(_))) => {
                        alive = true;
                    }
                    Some(Ok(Message::Ping(_))) => {
                        // axum answers pings automatically
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {
                        state.hub.send_to(conn_id, &error_frame("Invalid message format"));
                    }
                    Some(Err(err)) => {
                        tracing::debug!(conn_id, error = %err, "socket error");
                        break;
                    }
                }
            }
            _ = heartbeat.tick() => {
                if !alive {
                    tracing::debug!(conn_id, "liveness probe missed, closing");
                    break;
                }
                alive = false;
                state.hub.send_to_raw(conn_id, Message::Ping(Vec::new()));
            }
        }
    }

    state.hub.unregister(conn_id);
    writer.abort();
    tracing::debug!(conn_id, "spectator disconnected");
}

/// Apply one parsed client message against the hub and live registry.
fn handle_client_text(state: &Arc<ServerState>, conn_id: u64, text: &str) {
    let message = match parse_client_message(text) {
        Ok(message) => message,
        Err(err) => {
            state.hub.send_to(conn_id, &error_frame(&err.message()));
            return;
        }
    };

    match message {
        ClientMessage::Subscribe { game_id } => {
            state.hub.subscribe(conn_id, &game_id);
            state.hub.send_to(conn_id, &subscribed_frame(&game_id));
        }
        ClientMessage::Unsubscribe => match state.hub.unsubscribe(conn_id) {
            Some(game_id) => {
                state.hub.send_to(conn_id, &unsubscribed_frame(&game_id));
            }
            None => {
                state
                    .hub
                    .send_to(conn_id, &error_frame("Not subscribed to any game"));
            }
        },
        ClientMessage::Resync { game_id } => {
            // The current subscription wins over the message's game id;
            // the id only subscribes a connection that has none, so a
            // reconnecting client catches up with a single message
            let target = match state.hub.subscription(conn_id) {
                Some(current) => Some(current),
                None => game_id.map(|id| {
                    state.hub.subscribe(conn_id, &id);
                    id
                }),
            };
            let Some(target) = target else {
                state
                    .hub
                    .send_to(conn_id, &error_frame("Not subscribed to any game"));
                return;
            };
            match state.live.snapshot(&target) {
                Some(snapshot) => {
                    let spectators = state.hub.spectator_count(&target);
                    state
                        .hub
                        .send_to(conn_id, &full_state_frame(snapshot, spectators));
                }
                None => {
                    state
                        .hub
                        .send_to(conn_id, &error_frame("Unknown game"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::ws::Message;
    use serde_json::Value;
    use tokio::sync::mpsc::UnboundedReceiver;

    const GAME_ID: &str = "7f6c1f24-9b5e-4f7a-8a62-3d2f8a1c9b01";

    fn connect(state: &Arc<ServerState>) -> (u64, UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (state.hub.register(tx), rx)
    }

    fn next_json(rx: &mut UnboundedReceiver<Message>) -> Value {
        match rx.try_recv().expect("expected a frame") {
            Message::Text(text) => serde_json::from_str(&text).unwrap(),
            other => panic!("expected text frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_subscribe_replies_subscribed() {
        let state = Arc::new(ServerState::new());
        let (conn, mut rx) = connect(&state);

        handle_client_text(
            &state,
            conn,
            &format!(r#"{{"type":"SUBSCRIBE","gameId":"{}"}}"#, GAME_ID),
        );
        let reply = next_json(&mut rx);
        assert_eq!(reply["type"], "SUBSCRIBED");
        assert_eq!(reply["gameId"], GAME_ID);
        assert_eq!(state.hub.spectator_count(GAME_ID), 1);
    }

    #[tokio::test]
    async fn test_malformed_message_gets_error_not_disconnect() {
        let state = Arc::new(ServerState::new());
        let (conn, mut rx) = connect(&state);

        handle_client_text(&state, conn, "not json");
        let reply = next_json(&mut rx);
        assert_eq!(reply["type"], "ERROR");
        assert_eq!(reply["message"], "Invalid message format");

        handle_client_text(&state, conn, r#"{"type":"PING"}"#);
        let reply = next_json(&mut rx);
        assert_eq!(reply["message"], "Unknown message type: PING");

        // Connection is still registered
        assert_eq!(state.hub.connection_count(), 1);
    }

    #[tokio::test]
    async fn test_unsubscribe_without_subscription_errors() {
        let state = Arc::new(ServerState::new());
        let (conn, mut rx) = connect(&state);

        handle_client_text(&state, conn, r#"{"type":"UNSUBSCRIBE"}"#);
        let reply = next_json(&mut rx);
        assert_eq!(reply["type"], "ERROR");
    }

    fn game_start(game_id: &str) -> arena_engine::GameEvent {
        arena_engine::GameEvent::GameStart {
            game_id: game_id.to_string(),
            agents: vec![],
            rounds: 1,
        }
    }

    #[tokio::test]
    async fn test_resync_snapshot_includes_spectator_count() {
        let state = Arc::new(ServerState::new());
        state.live.apply(&game_start(GAME_ID));

        let (conn, mut rx) = connect(&state);
        handle_client_text(
            &state,
            conn,
            &format!(r#"{{"type":"SUBSCRIBE","gameId":"{}"}}"#, GAME_ID),
        );
        let _subscribed = next_json(&mut rx);

        handle_client_text(&state, conn, r#"{"type":"RESYNC"}"#);
        let reply = next_json(&mut rx);
        assert_eq!(reply["type"], "FULL_STATE");
        assert_eq!(reply["data"]["gameId"], GAME_ID);
        assert_eq!(reply["data"]["spectatorCount"], 1);
    }

    #[tokio::test]
    async fn test_resync_prefers_existing_subscription() {
        const OTHER_ID: &str = "3b9d8e10-2c4f-4d6a-9e71-5a0c7b2d4e90";
        let state = Arc::new(ServerState::new());
        state.live.apply(&game_start(GAME_ID));

        let (conn, mut rx) = connect(&state);
        handle_client_text(
            &state,
            conn,
            &format!(r#"{{"type":"SUBSCRIBE","gameId":"{}"}}"#, GAME_ID),
        );
        let _subscribed = next_json(&mut rx);

        // A resync naming a different game does not move the connection
        handle_client_text(
            &state,
            conn,
            &format!(r#"{{"type":"RESYNC","gameId":"{}"}}"#, OTHER_ID),
        );
        let reply = next_json(&mut rx);
        assert_eq!(reply["type"], "FULL_STATE");
        assert_eq!(reply["data"]["gameId"], GAME_ID);
        assert_eq!(state.hub.spectator_count(GAME_ID), 1);
        assert_eq!(state.hub.spectator_count(OTHER_ID), 0);
    }

    #[tokio::test]
    async fn test_resync_unknown_game_errors() {
        let state = Arc::new(ServerState::new());
        let (conn, mut rx) = connect(&state);

        handle_client_text(
            &state,
            conn,
            &format!(r#"{{"type":"RESYNC","gameId":"{}"}}"#, GAME_ID),
        );
        let reply = next_json(&mut rx);
        assert_eq!(reply["type"], "ERROR");
        assert_eq!(reply["message"], "Unknown game");
        // The resync still subscribed the connection
        assert_eq!(state.hub.spectator_count(GAME_ID), 1);
    }
}
