use anyhow::Result;
use clap::Parser;
use newsdigest::core::config::PostConfig;
use newsdigest::features::post::post_digest;
use tracing::error;

/// Post the saved digest as a reply in an existing Slack thread.
///
/// Reads `BOT_TOKEN`, `CHANNEL_ID` and `SLACK_THREAD_TS` from the environment.
#[derive(Debug, Parser)]
#[command(name = "newsdigest-post", version)]
struct Args {}

async fn run() -> Result<()> {
    let config = PostConfig::from_env()?;
    post_digest(&config).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    newsdigest::setup_logging();
    let _args = Args::parse();

    run().await.inspect_err(|e| error!("Post stage failed: {}", e))
}
