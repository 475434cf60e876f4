//! Query synthesis: ask the model for search queries about a topic.

use tracing::{debug, info, warn};

use crate::error::{Result, RetrievalError};
use crate::llm::budget::truncate_chars;
use crate::llm::{CompletionGateway, Message};
use crate::prompts;

/// Messages longer than this are cut before sending.
pub const PRE_TRUNCATION_CHARS: usize = 10_000;

/// Appended to a message cut by [`pre_truncate`].
pub const PRE_TRUNCATION_MARKER: &str = "... [pre-truncated]";

const FENCE_OPEN: &str = "```markdown\n";
const FENCE_CLOSE: &str = "```";

/// Turns a topic into a list of web search queries.
#[derive(Debug, Clone)]
pub struct QuerySynthesizer {
    gateway: CompletionGateway,
    attempts: u32,
}

impl QuerySynthesizer {
    /// Create a synthesizer that tries up to `attempts` times (at least once).
    pub fn new(gateway: CompletionGateway, attempts: u32) -> Self {
        Self {
            gateway,
            attempts: attempts.max(1),
        }
    }

    /// Ask the model for queries about `topic`.
    ///
    /// An unparseable answer triggers a fresh attempt without delay. Gateway
    /// errors are returned at once; the gateway has already retried them.
    ///
    /// # Errors
    ///
    /// - [`RetrievalError::QueryParse`] if every attempt lacked a query block.
    /// - [`RetrievalError::Llm`] on a gateway failure.
    pub async fn synthesize(&self, topic: &str, description: Option<&str>) -> Result<Vec<String>> {
        let prompt = prompts::query_expansion_prompt(topic, description);
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            let messages = pre_truncate(vec![Message::user(prompt.clone())]);
            let answer = self.gateway.complete(messages).await?.text;
            match parse_query_block(&answer) {
                Some(queries) => {
                    info!(topic, count = queries.len(), ?queries, "queries synthesized");
                    return Ok(queries);
                }
                None => {
                    warn!(
                        attempt,
                        max_attempts = self.attempts,
                        "no query block in model answer"
                    );
                    debug!(answer = %answer, "unparseable query answer");
                    last_error = Some(RetrievalError::QueryParse(format!(
                        "unable to parse query list from response: {answer}"
                    )));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| RetrievalError::QueryParse("no synthesis attempt was made".into())))
    }
}

/// Cut any message over [`PRE_TRUNCATION_CHARS`] and mark it.
pub fn pre_truncate(messages: Vec<Message>) -> Vec<Message> {
    let mut cut = 0usize;
    let out: Vec<Message> = messages
        .into_iter()
        .map(|mut msg| {
            if msg.char_len() > PRE_TRUNCATION_CHARS {
                let mut content = truncate_chars(&msg.content, PRE_TRUNCATION_CHARS).to_owned();
                content.push_str(PRE_TRUNCATION_MARKER);
                msg.content = content;
                cut += 1;
            }
            msg
        })
        .collect();
    if cut > 0 {
        debug!(messages = out.len(), cut, "pre-truncated long messages");
    }
    out
}

/// Extract queries from the first fenced `markdown` block in `text`.
///
/// The block body is trimmed, split on `;`, stripped of `"` and trimmed
/// again; empty entries are dropped. Returns `None` when there is no
/// complete block. A block with no queries yields `Some(vec![])`.
pub fn parse_query_block(text: &str) -> Option<Vec<String>> {
    let start = text.find(FENCE_OPEN)? + FENCE_OPEN.len();
    let body_len = text[start..].find(FENCE_CLOSE)?;
    let body = text[start..start + body_len].trim();

    Some(
        body.split(';')
            .map(|q| q.replace('"', "").trim().to_owned())
            .filter(|q| !q.is_empty())
            .collect(),
    )
}
