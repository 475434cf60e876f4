//! Concurrent scoring and final ranking.
//!
//! Workers are futures polled together by
//! [`futures_util::future::join_all`]. They claim items through a shared
//! atomic cursor, so each item is scored exactly once and a worker stops as
//! soon as the queue is drained.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use super::collect::ScoreItem;
use crate::relevance::SnippetScorer;

/// A scored URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredUrl {
    /// Sequence number of the source entry.
    pub seq: usize,
    /// The URL.
    pub url: String,
    /// Relevance score in `0.0..=100.0`.
    pub score: f64,
}

/// Score every item with at most `workers` requests in flight.
///
/// The output order is unspecified; pass it to [`rank`].
pub async fn score_all<S>(
    scorer: &S,
    topic: &str,
    items: &[ScoreItem],
    workers: usize,
) -> Vec<ScoredUrl>
where
    S: SnippetScorer + ?Sized,
{
    let total = items.len();
    let cursor = AtomicUsize::new(0);
    let done = AtomicUsize::new(0);
    let workers = workers.clamp(1, total.max(1));

    let worker = |id: usize| {
        let cursor = &cursor;
        let done = &done;
        async move {
            let mut out = Vec::new();
            loop {
                let idx = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(item) = items.get(idx) else {
                    break;
                };
                let score = scorer.score(topic, &item.snippet).await;
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(
                    worker = id,
                    url = %item.url,
                    score,
                    remaining = total - finished,
                    total,
                    "snippet scored"
                );
                out.push(ScoredUrl {
                    seq: item.seq,
                    url: item.url.clone(),
                    score,
                });
            }
            out
        }
    };

    futures_util::future::join_all((0..workers).map(worker))
        .await
        .into_iter()
        .flatten()
        .collect()
}

/// Sort by score descending, then by sequence ascending, and keep the
/// first `top_n` URLs.
pub fn rank(mut scored: Vec<ScoredUrl>, top_n: usize) -> Vec<String> {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(CmpOrdering::Equal)
            .then(a.seq.cmp(&b.seq))
    });
    scored.truncate(top_n);
    scored.into_iter().map(|s| s.url).collect()
}
