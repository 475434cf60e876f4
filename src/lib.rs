//! Survey retrieval: find the web sources most relevant to a research topic.
//!
//! Given a topic, the crate asks a language model for search queries, runs
//! them against a web search backend, and asks the model again to rate each
//! result snippet. The best-rated URLs come back first:
//! Topic → queries → search → dedup → score → rank
//!
//! # Architecture
//!
//! - **LLM** ([`llm`]): OpenAI-compatible completion gateway with context
//!   budgeting and randomized exponential backoff
//! - **Queries** ([`queries`]): prompt, call, parse a fenced query list
//! - **Search**: the `web-search` crate (SearXNG, Bing, SerpAPI)
//! - **Relevance** ([`relevance`]): 0–100 snippet scores that never fail
//! - **Retrieval** ([`retrieval`]): collection, concurrent scoring, ranking
//!
//! [`LlmSearch`] wires these together behind two calls.

pub mod config;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod queries;
pub mod relevance;
pub mod retrieval;

pub use config::{LlmConfig, RetrievalConfig};
pub use error::{Result, RetrievalError};
pub use queries::QuerySynthesizer;
pub use relevance::{RelevanceScorer, SnippetScorer};
pub use retrieval::Retriever;

use web_search::{SearchBackend, WebSearch};

/// Query synthesis plus retrieval, sharing one completion gateway.
#[derive(Debug, Clone)]
pub struct LlmSearch<B = WebSearch, S = RelevanceScorer> {
    synthesizer: QuerySynthesizer,
    retriever: Retriever<B, S>,
    default_top_n: usize,
}

impl LlmSearch {
    /// Build the gateway, search backend and scorer from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] if validation fails or no API key
    /// is set, and [`RetrievalError::Search`] if no search backend is
    /// configured.
    pub fn from_config(config: &RetrievalConfig) -> Result<Self> {
        config.validate()?;
        let gateway = config.llm.build_gateway()?;
        let backend = WebSearch::from_config(&config.search)?;
        tracing::info!(
            model = %config.llm.model,
            backend = %backend.kind(),
            workers = config.workers,
            "retrieval pipeline ready"
        );
        Ok(Self::from_parts(
            QuerySynthesizer::new(gateway.clone(), config.query_attempts),
            Retriever::new(backend, RelevanceScorer::new(gateway), config.workers),
            config.default_top_n,
        ))
    }
}

impl<B, S> LlmSearch<B, S>
where
    B: SearchBackend,
    S: SnippetScorer,
{
    /// Assemble from already-built parts.
    pub fn from_parts(
        synthesizer: QuerySynthesizer,
        retriever: Retriever<B, S>,
        default_top_n: usize,
    ) -> Self {
        Self {
            synthesizer,
            retriever,
            default_top_n,
        }
    }

    /// Ask the model for search queries about `topic`.
    ///
    /// # Errors
    ///
    /// See [`QuerySynthesizer::synthesize`].
    pub async fn get_queries(&self, topic: &str, description: Option<&str>) -> Result<Vec<String>> {
        self.synthesizer.synthesize(topic, description).await
    }

    /// Search every query and return the most relevant URLs, best first.
    ///
    /// `top_n` falls back to the configured default.
    pub async fn batch_web_search(
        &self,
        queries: &[String],
        topic: &str,
        top_n: Option<usize>,
    ) -> Vec<String> {
        let top_n = top_n.unwrap_or(self.default_top_n);
        self.retriever.retrieve(queries, topic, top_n).await
    }

    /// Synthesize queries for `topic` and retrieve in one call.
    ///
    /// # Errors
    ///
    /// Only query synthesis can fail.
    pub async fn search_topic(
        &self,
        topic: &str,
        description: Option<&str>,
        top_n: Option<usize>,
    ) -> Result<Vec<String>> {
        let queries = self.get_queries(topic, description).await?;
        Ok(self.batch_web_search(&queries, topic, top_n).await)
    }
}
