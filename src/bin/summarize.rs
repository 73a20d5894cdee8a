use std::path::PathBuf;

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Parser;
use newsdigest::ai::LlmClient;
use newsdigest::core::config::SummarizeConfig;
use newsdigest::features::{deliver, summarize};
use newsdigest::utils::filters::{MAX_ARTICLE_AGE_HOURS, filter_articles, load_articles};
use tracing::{error, info, warn};

/// Summarize the freshest articles and write the Slack payload files.
#[derive(Debug, Parser)]
#[command(name = "newsdigest-summarize", version)]
struct Args {
    /// JSON file holding an array of article records
    input: PathBuf,
}

async fn run(args: Args) -> Result<()> {
    let config = SummarizeConfig::from_env()?;
    let llm = LlmClient::new(
        &config.completion_token,
        &config.completion_endpoint,
        &config.completion_model,
    )?;

    let now = Utc::now();
    let articles = load_articles(&args.input).await?;
    let loaded = articles.len();
    let articles = filter_articles(articles, now, Duration::hours(MAX_ARTICLE_AGE_HOURS));
    info!(
        "Loaded {} articles from {}, {} fresh with valid links",
        loaded,
        args.input.display(),
        articles.len()
    );

    let outcome = summarize::summarize_articles(&llm, &articles, &config.output_dir).await;
    if outcome.summaries.is_empty() {
        warn!("No summaries were produced; the reply payload will carry no blocks");
    }

    let today = now.with_timezone(&config.timezone).date_naive();
    deliver::format_digest(
        &outcome.summaries,
        config.channel_id.as_deref(),
        today,
        &config.output_dir,
    )
    .await?;

    if let Some(skipped) = outcome.first_unrecoverable() {
        anyhow::bail!(
            "Summarizing \"{}\" failed: {}",
            skipped.title,
            skipped.error
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    newsdigest::setup_logging();
    let args = Args::parse();

    run(args).await.inspect_err(|e| error!("Summarize stage failed: {}", e))
}
