use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use newsdigest::core::config::CollectConfig;
use newsdigest::features::collect::{collect_articles, write_articles};
use newsdigest::utils::curation::RSS_FEEDS;
use tracing::{error, info};

/// Gather recent tech articles from the tracked feeds.
#[derive(Debug, Parser)]
#[command(name = "newsdigest-collect", version)]
struct Args {
    /// Where to write the article batch (default: data/input.json)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

async fn run(args: Args) -> Result<()> {
    let config = CollectConfig::new(args.output);
    let articles = collect_articles(RSS_FEEDS, Utc::now()).await?;

    info!("Final articles:");
    for article in &articles {
        info!(
            "  - {} ({}), {} chars",
            article.title,
            article
                .raw_published()
                .map(|ts| ts.display())
                .unwrap_or_default(),
            article.body().chars().count()
        );
    }

    write_articles(&config.output_path, &articles).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    newsdigest::setup_logging();
    let args = Args::parse();

    run(args).await.inspect_err(|e| error!("Collect stage failed: {}", e))
}
