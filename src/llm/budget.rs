//! Context-window enforcement.
//!
//! Messages are measured in chars. The model's window is approximated as
//! 140k tokens at 4 chars per token.

use super::message::Message;

/// Default context budget in chars.
pub const DEFAULT_CONTEXT_BUDGET_CHARS: usize = 140_000 * 4;

/// Below this much remaining budget an overflowing message is dropped
/// rather than truncated.
pub const MIN_TRUNCATION_REMAINDER: usize = 1000;

/// Appended to a message shortened by [`enforce_context_budget`].
pub const TRUNCATION_MARKER: &str = "... [truncated]";

/// Fit `messages` into `budget` chars, preserving order.
///
/// Messages are kept whole until one would overflow. That message is cut
/// to the remaining budget (marker included) if at least
/// [`MIN_TRUNCATION_REMAINDER`] chars remain, or dropped otherwise. Every
/// message after it is discarded.
pub fn enforce_context_budget(messages: Vec<Message>, budget: usize) -> Vec<Message> {
    let total_in = messages.len();
    let mut used = 0usize;
    let mut truncated = false;
    let mut kept = Vec::with_capacity(total_in);

    for mut msg in messages {
        let len = msg.char_len();
        if used + len <= budget {
            used += len;
            kept.push(msg);
            continue;
        }

        let remaining = budget - used;
        if remaining >= MIN_TRUNCATION_REMAINDER {
            let keep = remaining - TRUNCATION_MARKER.chars().count();
            let mut content = truncate_chars(&msg.content, keep).to_owned();
            content.push_str(TRUNCATION_MARKER);
            msg.content = content;
            used += msg.char_len();
            kept.push(msg);
            truncated = true;
        }
        break;
    }

    if truncated || kept.len() < total_in {
        tracing::debug!(
            kept = kept.len(),
            dropped = total_in - kept.len(),
            chars = used,
            budget,
            "messages truncated to context budget"
        );
    }
    kept
}

/// The longest prefix of `text` with at most `max_chars` chars.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
