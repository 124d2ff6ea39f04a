//! Redaction rules for events leaving the engine's trust boundary
//!
//! Raw submissions and outbound prompts are a leak risk (prompt
//! injection, personal data echoed by a model), so:
//! - `agent:query` events are never recorded or broadcast at all
//! - submission text in `agent:response` and `round:end` is replaced with
//!   a marker; only display ids survive in round results

use serde_json::{json, Value};

use crate::events::GameEvent;

/// Stands in for raw submission text everywhere outside scoring.
pub const REDACTION_MARKER: &str = "[redacted]";

/// Sanitized wire/durable payload for an event. `None` means the event
/// must not leave the engine at all.
pub fn sanitize(event: &GameEvent) -> Option<Value> {
    match event {
        GameEvent::AgentQuery { .. } => None,
        GameEvent::GameStart {
            game_id,
            agents,
            rounds,
        } => Some(json!({
            "gameId": game_id,
            "agents": agents,
            "rounds": rounds,
        })),
        GameEvent::RoundStart {
            game_id,
            round,
            matchups,
        } => Some(json!({
            "gameId": game_id,
            "round": round,
            "matchups": matchups,
        })),
        GameEvent::ChallengeStart { game_id, challenge } => Some(json!({
            "gameId": game_id,
            "challenge": challenge,
        })),
        GameEvent::AgentResponse {
            game_id,
            display_id,
            score,
            ..
        } => Some(json!({
            "gameId": game_id,
            "agentId": display_id,
            "response": REDACTION_MARKER,
            "score": score,
        })),
        GameEvent::RoundEnd {
            game_id,
            round,
            results,
        } => Some(json!({
            "gameId": game_id,
            "round": round,
            "results": results
                .iter()
                .map(|r| json!({
                    "agentId": r.display_id,
                    "score": r.score,
                    "response": r.response.as_deref().map(|_| REDACTION_MARKER),
                }))
                .collect::<Vec<_>>(),
        })),
        GameEvent::Elimination {
            game_id,
            display_id,
            round,
        } => Some(json!({
            "gameId": game_id,
            "agentId": display_id,
            "round": round,
        })),
        GameEvent::GameEnd {
            game_id,
            winner,
            final_standings,
        } => Some(json!({
            "gameId": game_id,
            "winner": winner,
            "finalStandings": final_standings
                .iter()
                .map(|s| json!({
                    "agentId": s.display_id,
                    "name": s.name,
                    "score": s.score,
                    "placement": s.placement,
                    "eliminatedRound": s.eliminated_round,
                }))
                .collect::<Vec<_>>(),
        })),
        GameEvent::GameError { game_id, error } => Some(json!({
            "gameId": game_id,
            "error": error,
        })),
    }
}
