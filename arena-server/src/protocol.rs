//! Spectator wire protocol
//!
//! Inbound: `SUBSCRIBE {gameId}`, `UNSUBSCRIBE`, `RESYNC {gameId?}`.
//! Outbound frame types: `SUBSCRIBED`, `UNSUBSCRIBED`, `FULL_STATE`,
//! `ROUND_START`, `CHALLENGE`, `RESPONSE`, `ELIMINATION`, `GAME_END`,
//! `ERROR`. Protocol errors answer with an `ERROR` frame on that
//! connection only; the connection stays open.

use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

/// Parsed inbound client message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Subscribe { game_id: String },
    Unsubscribe,
    Resync { game_id: Option<String> },
}

/// Why an inbound frame was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Not JSON, or JSON without a string `type` field.
    InvalidFormat,
    /// A `type` outside the inbound taxonomy.
    UnknownType(String),
    /// `SUBSCRIBE`/`RESYNC` with a missing or non-UUID game id.
    InvalidGameId,
}

impl ProtocolError {
    pub fn message(&self) -> String {
        match self {
            ProtocolError::InvalidFormat => "Invalid message format".to_string(),
            ProtocolError::UnknownType(t) => format!("Unknown message type: {}", t),
            ProtocolError::InvalidGameId => "Invalid game ID".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "gameId")]
    game_id: Option<String>,
}

/// Parse one inbound text frame.
pub fn parse_client_message(text: &str) -> Result<ClientMessage, ProtocolError> {
    let raw: RawMessage =
        serde_json::from_str(text).map_err(|_| ProtocolError::InvalidFormat)?;
    let kind = raw.kind.ok_or(ProtocolError::InvalidFormat)?;

    match kind.as_str() {
        "SUBSCRIBE" => {
            let game_id = raw.game_id.ok_or(ProtocolError::InvalidGameId)?;
            if !is_game_id(&game_id) {
                return Err(ProtocolError::InvalidGameId);
            }
            Ok(ClientMessage::Subscribe { game_id })
        }
        "UNSUBSCRIBE" => Ok(ClientMessage::Unsubscribe),
        "RESYNC" => {
            // RESYNC may omit the game id and fall back to the current
            // subscription, but a present id must still be well-formed
            if let Some(game_id) = &raw.game_id {
                if !is_game_id(game_id) {
                    return Err(ProtocolError::InvalidGameId);
                }
            }
            Ok(ClientMessage::Resync {
                game_id: raw.game_id,
            })
        }
        other => Err(ProtocolError::UnknownType(other.to_string())),
    }
}

/// Game ids on the wire are UUIDs assigned by the lifecycle layer.
pub fn is_game_id(value: &str) -> bool {
    Uuid::parse_str(value).is_ok()
}

// === Outbound frames ===

pub fn subscribed_frame(game_id: &str) -> Value {
    json!({ "type": "SUBSCRIBED", "gameId": game_id })
}

pub fn unsubscribed_frame(game_id: &str) -> Value {
    json!({ "type": "UNSUBSCRIBED", "gameId": game_id })
}

/// Snapshots carry the current spectator count so a reconnecting client
/// sees the audience, not just the game.
pub fn full_state_frame(mut state: Value, spectators: usize) -> Value {
    if let Some(fields) = state.as_object_mut() {
        fields.insert("spectatorCount".to_string(), json!(spectators));
    }
    json!({ "type": "FULL_STATE", "data": state })
}

pub fn error_frame(message: &str) -> Value {
    json!({ "type": "ERROR", "message": message })
}

/// Map a durable event type to its broadcast frame type. `round:end` is
/// durable-only; `game:start` reaches spectators as a full snapshot.
pub fn wire_type(event_type: &str) -> Option<&'static str> {
    match event_type {
        "game:start" => Some("FULL_STATE"),
        "round:start" => Some("ROUND_START"),
        "challenge:start" => Some("CHALLENGE"),
        "agent:response" => Some("RESPONSE"),
        "elimination" => Some("ELIMINATION"),
        "game:end" => Some("GAME_END"),
        "game:error" => Some("ERROR"),
        _ => None,
    }
}

/// Broadcast envelope for a mapped event payload.
pub fn event_frame(frame_type: &str, data: Value) -> Value {
    json!({ "type": frame_type, "data": data })
}
