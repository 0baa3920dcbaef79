//! Text-generation seam shared by the router and every agent.

use anyhow::Result;

/// A model that turns one prompt into one reply.
///
/// Implementations are built once at start-up and handed around behind an `Arc`;
/// callers make exactly one `generate` call per step and never retry.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
