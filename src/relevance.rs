//! Snippet relevance scoring.

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::llm::{CompletionGateway, LlmError};
use crate::prompts;

/// Highest score the model may give.
pub const MAX_SCORE: f64 = 100.0;

const SCORE_OPEN: &str = "<SCORE>";
const SCORE_CLOSE: &str = "</SCORE>";

/// Rates how relevant a snippet is to a topic, from 0 to 100.
///
/// Scoring never fails: anything that goes wrong degrades to `0.0`.
#[async_trait]
pub trait SnippetScorer: Send + Sync {
    /// Score `snippet` against `topic`.
    async fn score(&self, topic: &str, snippet: &str) -> f64;
}

/// Why a model answer produced no score.
#[derive(Debug, thiserror::Error)]
enum ScoreError {
    #[error("no <SCORE> tag in answer")]
    Missing,

    #[error("score {0} is outside 0..=100")]
    OutOfRange(f64),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Scores snippets by asking the model through a [`CompletionGateway`].
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    gateway: CompletionGateway,
}

impl RelevanceScorer {
    /// Create a scorer backed by `gateway`.
    pub fn new(gateway: CompletionGateway) -> Self {
        Self { gateway }
    }

    async fn try_score(&self, topic: &str, snippet: &str) -> Result<f64, ScoreError> {
        let prompt = prompts::snippet_score_prompt(topic, snippet);
        let answer = self.gateway.complete_prompt(prompt).await?.text;
        let score = last_score_tag(&answer).ok_or(ScoreError::Missing)?;
        if !(0.0..=MAX_SCORE).contains(&score) {
            return Err(ScoreError::OutOfRange(score));
        }
        Ok(score)
    }
}

#[async_trait]
impl SnippetScorer for RelevanceScorer {
    async fn score(&self, topic: &str, snippet: &str) -> f64 {
        match self.try_score(topic, snippet).await {
            Ok(score) => {
                debug!(score, "snippet scored");
                score
            }
            Err(ScoreError::Llm(e)) => {
                error!(error = %e, "snippet scoring failed, using 0");
                0.0
            }
            Err(e) => {
                warn!(error = %e, "unusable snippet score, using 0");
                0.0
            }
        }
    }
}

/// The value of the last well-formed `<SCORE>digits</SCORE>` tag.
pub fn last_score_tag(text: &str) -> Option<f64> {
    let mut last = None;
    let mut rest = text;
    while let Some(open) = rest.find(SCORE_OPEN) {
        rest = &rest[open + SCORE_OPEN.len()..];
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && rest[digits..].starts_with(SCORE_CLOSE) {
            // Digit runs too long for f64 still parse, to a huge value.
            last = rest[..digits].parse::<f64>().ok();
            rest = &rest[digits + SCORE_CLOSE.len()..];
        }
    }
    last
}
