//! Retrieve the most relevant web sources for a topic.
//!
//! Usage: `survey-retrieve <topic> [description]`
//!
//! Configuration is read from the TOML file named by
//! `SURVEY_RETRIEVAL_CONFIG` (optional), then overlaid with environment
//! variables such as `OPENAI_API_KEY` and `SERP_API_KEY`. Ranked URLs are
//! printed to stdout, one per line; logs go to stderr.

use std::path::PathBuf;

use anyhow::Context;
use survey_retrieval::{LlmSearch, RetrievalConfig};

const CONFIG_ENV: &str = "SURVEY_RETRIEVAL_CONFIG";
const DEFAULT_FILTER: &str = "survey_retrieval=info,web_search=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let topic = args
        .next()
        .filter(|t| !t.trim().is_empty())
        .context("usage: survey-retrieve <topic> [description]")?;
    let description = args.next();

    let mut config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            RetrievalConfig::from_file(&path)
                .with_context(|| format!("failed to load config from {}", path.display()))?
        }
        None => RetrievalConfig::default(),
    };
    config.apply_env();

    let search = LlmSearch::from_config(&config).context("failed to build retrieval pipeline")?;

    let queries = search
        .get_queries(&topic, description.as_deref())
        .await
        .context("query synthesis failed")?;
    let urls = search.batch_web_search(&queries, &topic, None).await;

    if urls.is_empty() {
        tracing::warn!(topic = %topic, "no relevant sources found");
    }
    for url in urls {
        println!("{url}");
    }
    Ok(())
}
