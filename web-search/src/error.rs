//! Error types for the web-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. No API keys or subscription keys appear in
//! error messages.

/// Errors that can occur during a single backend search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The request could not be sent, or the backend answered with a
    /// non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request timed out before the backend responded.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// The backend answered, but the body was not the expected JSON shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The backend response had no result container at all.
    ///
    /// Distinct from [`crate::SearchOutcome::NoResults`], which is an
    /// answered-but-empty result and not an error.
    #[error("no results: {0}")]
    NoResults(String),

    /// Invalid or missing backend configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Returns a stable SCREAMING_SNAKE_CASE code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "SEARCH_HTTP",
            Self::Timeout(_) => "SEARCH_TIMEOUT",
            Self::Parse(_) => "SEARCH_PARSE",
            Self::NoResults(_) => "SEARCH_NO_RESULTS",
            Self::Config(_) => "SEARCH_CONFIG",
        }
    }
}

/// Convenience type alias for web-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
