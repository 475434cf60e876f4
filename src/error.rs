//! Error types for the retrieval pipeline.

use crate::llm::LlmError;
use web_search::SearchError;

/// Top-level error type for query synthesis and retrieval.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// The model answer contained no usable query block.
    #[error("query parse error: {0}")]
    QueryParse(String),

    /// Completion gateway error.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Search backend error.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RetrievalError {
    /// Stable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_INVALID",
            Self::QueryParse(_) => "QUERY_PARSE",
            Self::Llm(e) => e.code(),
            Self::Search(e) => e.code(),
            Self::Io(_) => "IO_ERROR",
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, RetrievalError>;
