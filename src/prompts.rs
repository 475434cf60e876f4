//! Prompt templates for query synthesis and snippet scoring.
//!
//! The synthesis prompts ask for queries inside a fenced `markdown` block,
//! separated by `;`. The scoring prompt asks for a `<SCORE>n</SCORE>` tag.

/// Build the query-expansion prompt for `topic`.
///
/// A non-blank `description` selects the richer template that also
/// grounds the queries in the description.
pub fn query_expansion_prompt(topic: &str, description: Option<&str>) -> String {
    match description.map(str::trim).filter(|d| !d.is_empty()) {
        Some(description) => format!(
            "You are preparing to write a literature survey.\n\
             Topic: {topic}\n\
             Description: {description}\n\n\
             Propose web search queries that together cover the topic as \
             described: its core concepts, main methods, key results, open \
             problems and closely related areas. Prefer specific, \
             keyword-dense queries over questions. Do not repeat a query.\n\n\
             Answer with the queries inside a single fenced block tagged \
             markdown, separated by semicolons, for example:\n\
             ```markdown\n\
             first query; second query; third query\n\
             ```"
        ),
        None => format!(
            "You are preparing to write a literature survey.\n\
             Topic: {topic}\n\n\
             Propose web search queries that together cover the topic: its \
             core concepts, main methods, key results, open problems and \
             closely related areas. Prefer specific, keyword-dense queries \
             over questions. Do not repeat a query.\n\n\
             Answer with the queries inside a single fenced block tagged \
             markdown, separated by semicolons, for example:\n\
             ```markdown\n\
             first query; second query; third query\n\
             ```"
        ),
    }
}

/// Build the prompt that rates how relevant `snippet` is to `topic`.
pub fn snippet_score_prompt(topic: &str, snippet: &str) -> String {
    format!(
        "Rate how useful the following search result snippet is as a source \
         for a survey on the given topic.\n\n\
         Topic: {topic}\n\
         Snippet: {snippet}\n\n\
         Think briefly about whether the snippet addresses the topic \
         directly, touches it in passing, or is unrelated. Then give a \
         score from 0 (unrelated) to 100 (directly on topic) as an integer \
         wrapped in a tag, for example <SCORE>75</SCORE>. End your answer \
         with the tag."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expansion_prompt_mentions_topic_and_fence() {
        let prompt = query_expansion_prompt("graph neural networks", None);
        assert!(prompt.contains("graph neural networks"));
        assert!(prompt.contains("```markdown\n"));
        assert!(!prompt.contains("Description:"));
    }

    #[test]
    fn description_selects_richer_template() {
        let prompt = query_expansion_prompt("GNNs", Some("message passing on molecules"));
        assert!(prompt.contains("Description: message passing on molecules"));
    }

    #[test]
    fn blank_description_is_ignored() {
        assert_eq!(
            query_expansion_prompt("GNNs", Some("   ")),
            query_expansion_prompt("GNNs", None)
        );
    }

    #[test]
    fn score_prompt_embeds_inputs() {
        let prompt = snippet_score_prompt("ocean acidification", "pH of seawater drops");
        assert!(prompt.contains("ocean acidification"));
        assert!(prompt.contains("pH of seawater drops"));
        assert!(prompt.contains("<SCORE>"));
    }
}
