//! Error types for the completion gateway.
//!
//! Each error variant carries a stable error code (SCREAMING_SNAKE_CASE)
//! that is included in the Display output and accessible via [`LlmError::code()`].

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// The provider rejected the request because of rate limiting (HTTP 429).
    pub const RATE_LIMITED: &str = "RATE_LIMITED";

    /// The provider failed with a server error (HTTP 5xx).
    pub const SERVER_ERROR: &str = "SERVER_ERROR";

    /// Any other API failure: unexpected status, connection failure, timeout.
    pub const API_ERROR: &str = "API_ERROR";

    /// Authentication failed (invalid/missing API key).
    pub const AUTH_FAILED: &str = "AUTH_FAILED";

    /// The provider answered, but the response was empty or malformed.
    pub const PROTOCOL_ERROR: &str = "PROTOCOL_ERROR";

    /// The request could not be built from the given input.
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

    /// Invalid or missing configuration.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
}

/// Errors produced by the completion gateway and its providers.
///
/// The Display impl formats as `[CODE] message`.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// HTTP 429 from the provider.
    #[error("[{}] {}", error_codes::RATE_LIMITED, .0)]
    RateLimited(String),

    /// HTTP 5xx from the provider.
    #[error("[{}] {}", error_codes::SERVER_ERROR, .0)]
    Server(String),

    /// Other non-success status, connection failure or timeout.
    #[error("[{}] {}", error_codes::API_ERROR, .0)]
    Api(String),

    /// HTTP 401/403 from the provider.
    #[error("[{}] {}", error_codes::AUTH_FAILED, .0)]
    Auth(String),

    /// Zero choices, missing content, or an undecodable body.
    #[error("[{}] {}", error_codes::PROTOCOL_ERROR, .0)]
    Protocol(String),

    /// Nothing sendable was left after context-budget enforcement.
    #[error("[{}] {}", error_codes::INVALID_REQUEST, .0)]
    InvalidRequest(String),

    /// Invalid or missing configuration.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    Config(String),
}

impl LlmError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RateLimited(_) => error_codes::RATE_LIMITED,
            Self::Server(_) => error_codes::SERVER_ERROR,
            Self::Api(_) => error_codes::API_ERROR,
            Self::Auth(_) => error_codes::AUTH_FAILED,
            Self::Protocol(_) => error_codes::PROTOCOL_ERROR,
            Self::InvalidRequest(_) => error_codes::INVALID_REQUEST,
            Self::Config(_) => error_codes::CONFIG_INVALID,
        }
    }

    /// Returns the inner message without the code prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::RateLimited(m)
            | Self::Server(m)
            | Self::Api(m)
            | Self::Auth(m)
            | Self::Protocol(m)
            | Self::InvalidRequest(m)
            | Self::Config(m) => m,
        }
    }

    /// Returns true if this error is transient and the gateway should retry.
    ///
    /// Rate limits, server errors and generic API failures are transient.
    /// Auth, protocol, request and config errors are not: the same call
    /// would fail the same way.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited(_) | Self::Server(_) | Self::Api(_) => true,
            Self::Auth(_) | Self::Protocol(_) | Self::InvalidRequest(_) | Self::Config(_) => false,
        }
    }
}

/// Convenience alias for gateway results.
pub type Result<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_prefix() {
        let err = LlmError::RateLimited("slow down".into());
        let display = format!("{err}");
        assert!(display.starts_with("[RATE_LIMITED]"));
        assert!(display.contains("slow down"));
    }

    #[test]
    fn message_strips_prefix() {
        let err = LlmError::Protocol("empty choices".into());
        assert_eq!(err.message(), "empty choices");
        assert_eq!(err.code(), "PROTOCOL_ERROR");
    }

    #[test]
    fn transient_errors_are_retryable() {
        assert!(LlmError::RateLimited(String::new()).is_retryable());
        assert!(LlmError::Server(String::new()).is_retryable());
        assert!(LlmError::Api(String::new()).is_retryable());
    }

    #[test]
    fn fatal_errors_are_not_retryable() {
        assert!(!LlmError::Auth(String::new()).is_retryable());
        assert!(!LlmError::Protocol(String::new()).is_retryable());
        assert!(!LlmError::InvalidRequest(String::new()).is_retryable());
        assert!(!LlmError::Config(String::new()).is_retryable());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LlmError>();
    }
}
