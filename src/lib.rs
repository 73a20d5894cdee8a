/// newsdigest - A daily tech-news digest posted to a Slack thread.
///
/// The pipeline runs as three separate binaries that hand data to each other
/// through JSON files:
/// 1. `newsdigest-collect` pulls RSS and Atom feeds, scrapes and curates the linked
///    articles and writes `data/input.json`
/// 2. `newsdigest-summarize` filters that batch, summarizes up to five articles with a
///    chat-completion model and writes `parent_payload.json` / `thread_reply_payload.json`
/// 3. `newsdigest-post` posts the reply payload under an existing parent message
///
/// # Architecture
///
/// The system uses:
/// - reqwest for the completion, Slack, feed and article-page HTTP calls
/// - feed-rs for RSS/Atom parsing
/// - openai-api-rs message types for prompt construction
/// - slack-morphism token and id types for the Slack client
/// - Tokio for the async runtime
///
/// # Example
///
/// ```no_run
/// use newsdigest::ai::LlmClient;
/// use newsdigest::core::config::SummarizeConfig;
/// use newsdigest::features::summarize::summarize_articles;
/// use newsdigest::utils::{filter_articles, load_articles};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     newsdigest::setup_logging();
///
///     let config = SummarizeConfig::from_env()?;
///     let llm = LlmClient::new(
///         &config.completion_token,
///         &config.completion_endpoint,
///         &config.completion_model,
///     )?;
///
///     let articles = load_articles(std::path::Path::new("data/input.json")).await?;
///     let fresh = filter_articles(articles, chrono::Utc::now(), chrono::Duration::hours(36));
///     let outcome = summarize_articles(&llm, &fresh, &config.output_dir).await;
///     println!("{} summaries", outcome.summaries.len());
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod core;
pub mod errors;
pub mod features;
pub mod slack;
pub mod utils;

pub use errors::DigestError;

/// Configure structured JSON logging.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// newsdigest::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
