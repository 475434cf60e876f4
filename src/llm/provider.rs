//! Provider trait for chat completion backends.

use async_trait::async_trait;

use super::error::LlmError;
use super::message::Message;
use super::types::{CompletionResult, RequestOptions};

/// A chat completion backend that turns messages into one answer.
///
/// Implementations perform a single request. Retries and context-budget
/// enforcement live in [`CompletionGateway`](super::gateway::CompletionGateway).
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Returns the provider name (e.g. `"openai"`).
    fn name(&self) -> &str;

    /// Send one completion request.
    async fn send(
        &self,
        messages: &[Message],
        options: &RequestOptions,
    ) -> Result<CompletionResult, LlmError>;
}
