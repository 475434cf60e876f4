//! Completion gateway: context budget, retry with backoff, single answer.

use std::sync::Arc;

use tracing::{debug, warn};

use super::budget::{DEFAULT_CONTEXT_BUDGET_CHARS, enforce_context_budget};
use super::error::LlmError;
use super::message::Message;
use super::provider::ChatProvider;
use super::retry::RetryPolicy;
use super::types::{CompletionResult, RequestOptions};

/// Sends messages to a [`ChatProvider`] and returns the answer with its usage.
///
/// Every call trims the messages to the context budget, then retries
/// transient provider failures according to the [`RetryPolicy`]. Fatal
/// errors are returned on first sight.
#[derive(Clone)]
pub struct CompletionGateway {
    provider: Arc<dyn ChatProvider>,
    options: RequestOptions,
    retry: RetryPolicy,
    context_budget: usize,
}

impl std::fmt::Debug for CompletionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionGateway")
            .field("provider", &self.provider.name())
            .field("options", &self.options)
            .field("retry", &self.retry)
            .field("context_budget", &self.context_budget)
            .finish()
    }
}

impl CompletionGateway {
    /// Create a gateway with default options, retry policy and budget.
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            provider,
            options: RequestOptions::default(),
            retry: RetryPolicy::default(),
            context_budget: DEFAULT_CONTEXT_BUDGET_CHARS,
        }
    }

    /// Set the sampling options sent with every request.
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the context budget in chars.
    pub fn with_context_budget(mut self, chars: usize) -> Self {
        self.context_budget = chars;
        self
    }

    /// Send `messages` and return the first choice's text and token usage.
    ///
    /// # Errors
    ///
    /// - [`LlmError::InvalidRequest`] if nothing is left after budget enforcement.
    /// - Any non-retryable provider error, immediately.
    /// - The last transient error once `max_attempts` is exhausted.
    pub async fn complete(&self, messages: Vec<Message>) -> Result<CompletionResult, LlmError> {
        let messages = enforce_context_budget(messages, self.context_budget);
        if messages.is_empty() {
            return Err(LlmError::InvalidRequest(
                "no messages left to send after context budget enforcement".into(),
            ));
        }

        let result = self.send_with_retry(&messages).await?;
        debug!(
            provider = self.provider.name(),
            prompt_tokens = result.usage.prompt_tokens,
            completion_tokens = result.usage.completion_tokens,
            total_tokens = result.usage.total_tokens,
            "completion finished"
        );
        Ok(result)
    }

    /// Send a single user message.
    pub async fn complete_prompt(
        &self,
        prompt: impl Into<String>,
    ) -> Result<CompletionResult, LlmError> {
        self.complete(vec![Message::user(prompt)]).await
    }

    async fn send_with_retry(&self, messages: &[Message]) -> Result<CompletionResult, LlmError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1u32;

        loop {
            match self.provider.send(messages, &self.options).await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    if !error.is_retryable() || attempt >= max_attempts {
                        return Err(error);
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        provider = self.provider.name(),
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "transient completion failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt = attempt.saturating_add(1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::llm::budget::TRUNCATION_MARKER;
    use crate::llm::types::TokenUsage;

    /// Replays a scripted sequence of outcomes and records what it was sent.
    struct ScriptedProvider {
        script: Mutex<VecDeque<Result<String, LlmError>>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Result<String, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.seen.lock().expect("lock").len()
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn send(
            &self,
            messages: &[Message],
            _options: &RequestOptions,
        ) -> Result<CompletionResult, LlmError> {
            self.seen.lock().expect("lock").push(messages.to_vec());
            let next = self
                .script
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| Err(LlmError::Protocol("script exhausted".into())));
            next.map(|text| CompletionResult {
                text,
                usage: TokenUsage::new(1, 1),
            })
        }
    }

    fn gateway(provider: Arc<ScriptedProvider>, attempts: u32) -> CompletionGateway {
        CompletionGateway::new(provider).with_retry_policy(RetryPolicy::immediate(attempts))
    }

    #[tokio::test]
    async fn returns_first_success() {
        let provider = ScriptedProvider::new(vec![Ok("answer".into())]);
        let gw = gateway(provider.clone(), 3);
        assert_eq!(gw.complete_prompt("q").await.expect("ok").text, "answer");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn usage_is_passed_through_to_caller() {
        let provider = ScriptedProvider::new(vec![
            Err(LlmError::Server("503".into())),
            Ok("counted".into()),
        ]);
        let gw = gateway(provider.clone(), 3);
        let result = gw
            .complete(vec![Message::system("sys"), Message::user("q")])
            .await
            .expect("ok");
        assert_eq!(result.text, "counted");
        assert_eq!(result.usage, TokenUsage::new(1, 1));
        assert_eq!(result.usage.total_tokens, 2);
    }

    #[tokio::test]
    async fn retries_transient_errors_until_success() {
        let provider = ScriptedProvider::new(vec![
            Err(LlmError::RateLimited("429".into())),
            Err(LlmError::Server("503".into())),
            Err(LlmError::Api("connection reset".into())),
            Ok("finally".into()),
        ]);
        let gw = gateway(provider.clone(), 10);
        assert_eq!(gw.complete_prompt("q").await.expect("ok").text, "finally");
        assert_eq!(provider.calls(), 4);
    }

    #[tokio::test]
    async fn fatal_error_is_not_retried() {
        let provider = ScriptedProvider::new(vec![
            Err(LlmError::Auth("bad key".into())),
            Ok("unreachable".into()),
        ]);
        let gw = gateway(provider.clone(), 10);
        let err = gw.complete_prompt("q").await.expect_err("auth");
        assert!(matches!(err, LlmError::Auth(_)));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let provider = ScriptedProvider::new(
            (0..5)
                .map(|_| Err(LlmError::Server("down".into())))
                .collect(),
        );
        let gw = gateway(provider.clone(), 3);
        let err = gw.complete_prompt("q").await.expect_err("exhausted");
        assert!(matches!(err, LlmError::Server(_)));
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn messages_are_trimmed_before_sending() {
        let provider = ScriptedProvider::new(vec![Ok("ok".into())]);
        let gw = gateway(provider.clone(), 1).with_context_budget(2_000);
        let messages = vec![
            Message::system("s".repeat(500)),
            Message::user("u".repeat(10_000)),
            Message::user("tail"),
        ];
        gw.complete(messages).await.expect("ok");

        let seen = provider.seen.lock().expect("lock");
        let sent = &seen[0];
        assert_eq!(sent.len(), 2);
        let total: usize = sent.iter().map(Message::char_len).sum();
        assert!(total <= 2_000);
        assert!(sent[1].content.ends_with(TRUNCATION_MARKER));
    }

    #[tokio::test]
    async fn empty_after_budget_is_invalid_request() {
        let provider = ScriptedProvider::new(vec![Ok("ok".into())]);
        let gw = gateway(provider.clone(), 1).with_context_budget(500);
        let err = gw
            .complete(vec![Message::user("x".repeat(600))])
            .await
            .expect_err("nothing to send");
        assert!(matches!(err, LlmError::InvalidRequest(_)));
        assert_eq!(provider.calls(), 0);
    }
}
