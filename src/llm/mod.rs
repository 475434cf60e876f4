//! Language-model completion layer.
//!
//! - [`message`]: role-tagged messages
//! - [`budget`]: context-window enforcement
//! - [`retry`]: randomized exponential backoff
//! - [`provider`] / [`openai`]: the chat completion backend
//! - [`gateway`]: the retrying entry point used by the rest of the crate

pub mod budget;
pub mod error;
pub mod gateway;
pub mod message;
pub mod openai;
pub mod provider;
pub mod retry;
pub mod types;

pub use error::LlmError;
pub use gateway::CompletionGateway;
pub use message::{Message, Role};
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use provider::ChatProvider;
pub use retry::RetryPolicy;
pub use types::{CompletionResult, RequestOptions, TokenUsage};
