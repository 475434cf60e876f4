//! Retrieval: search every query, deduplicate, score, rank.
//!
//! # Pipeline
//!
//! 1. **Collecting**: queries run one after another against the backend.
//!    Failed or empty queries are logged and skipped. Hits are merged into
//!    a [`UrlTable`] where the first sighting of a URL wins.
//! 2. **Scoring**: every entry with a snippet is scored by a pool of
//!    concurrent workers.
//! 3. **Done**: URLs are ranked by score (ties by first sighting) and cut
//!    to `top_n`.

pub mod collect;
pub mod pool;

use std::fmt;

use tracing::{debug, info, warn};
use web_search::{SearchBackend, SearchOutcome};

use crate::relevance::SnippetScorer;

pub use collect::{CollectedEntry, ScoreItem, UrlTable};
pub use pool::{ScoredUrl, rank, score_all};

/// Stage of a retrieval run, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Running search queries and filling the URL table.
    Collecting,
    /// Scoring snippets.
    Scoring,
    /// Ranking finished.
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collecting => write!(f, "collecting"),
            Self::Scoring => write!(f, "scoring"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Runs queries against a search backend and ranks the results.
#[derive(Debug, Clone)]
pub struct Retriever<B, S> {
    backend: B,
    scorer: S,
    workers: usize,
}

impl<B, S> Retriever<B, S>
where
    B: SearchBackend,
    S: SnippetScorer,
{
    /// Create a retriever with `workers` concurrent scorers (at least one).
    pub fn new(backend: B, scorer: S, workers: usize) -> Self {
        Self {
            backend,
            scorer,
            workers: workers.max(1),
        }
    }

    /// Return up to `top_n` URLs relevant to `topic`, best first.
    ///
    /// Never fails: query errors are skipped and scoring errors count as 0.
    pub async fn retrieve(&self, queries: &[String], topic: &str, top_n: usize) -> Vec<String> {
        info!(phase = %Phase::Collecting, queries = queries.len(), "retrieval started");
        let table = self.collect(queries).await;
        if table.is_empty() {
            info!(phase = %Phase::Done, "no search results, nothing to rank");
            return Vec::new();
        }

        let items = table.scorable();
        info!(
            phase = %Phase::Scoring,
            urls = table.len(),
            scorable = items.len(),
            workers = self.workers,
            "scoring snippets"
        );
        let scored = score_all(&self.scorer, topic, &items, self.workers).await;

        let urls = rank(scored, top_n);
        info!(phase = %Phase::Done, returned = urls.len(), top_n, "retrieval finished");
        urls
    }

    /// Run every query in order and merge the hits.
    pub async fn collect(&self, queries: &[String]) -> UrlTable {
        let mut table = UrlTable::new();

        for query in queries {
            let query = query.trim();
            if query.is_empty() {
                info!("skipping empty query");
                continue;
            }
            info!(query, "searching");

            match self.backend.search(query).await {
                Ok(SearchOutcome::Hits(hits)) => {
                    let found = hits.len();
                    let added = table.extend(hits.into_values());
                    debug!(query, found, added, total = table.len(), "hits merged");
                }
                Ok(SearchOutcome::NoResults(message)) => {
                    warn!(query, %message, "query returned no results, skipping");
                }
                Err(e) => {
                    warn!(query, error = %e, code = e.code(), "search failed, skipping query");
                }
            }
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Collecting.to_string(), "collecting");
        assert_eq!(Phase::Scoring.to_string(), "scoring");
        assert_eq!(Phase::Done.to_string(), "done");
    }
}
