//! Query seam between the engine and the backing model provider

use async_trait::async_trait;

/// Submission substituted when a query fails; the round continues with
/// this low-effort text instead of aborting.
pub const FAILED_RESPONSE: &str = "[Agent failed to respond]";

/// Host-supplied callback that turns a prompt into an agent submission.
///
/// Opaque to the engine; may call any backing provider and may block or
/// suspend arbitrarily. Failures surface as `Err` and degrade to
/// [`FAILED_RESPONSE`] rather than aborting the game.
#[async_trait]
pub trait QueryHandler: Send + Sync {
    async fn query(&self, agent_id: &str, prompt: &str) -> anyhow::Result<String>;
}
