//! Build the input batch from RSS and Atom feeds.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, Feed};
use feed_rs::parser;
use reqwest::Client;
use tracing::{info, warn};

use crate::core::models::{Article, RawTimestamp};
use crate::errors::DigestError;
use crate::utils::curation::{
    deduplicate_articles, is_tracked_publication, mentions_keyword, rank_articles, source_host,
};

/// Collection stops once this many entries pass the entry rules.
pub const MAX_COLLECTED: usize = 20;
/// Articles handed to the summarizer; extra beyond five leaves room for skips.
pub const MAX_SELECTED: usize = 15;
pub const MIN_BODY_CHARS: usize = 100;
pub const MAX_BODY_CHARS: usize = 8000;
pub const DEFAULT_WINDOW_HOURS: i64 = 24;
pub const WIDE_WINDOW_HOURS: i64 = 36;
/// Below this many articles the window is widened once.
pub const MIN_ARTICLES: usize = 5;

const TEXT_WIDTH: usize = 120;
const USER_AGENT: &str = concat!("newsdigest/", env!("CARGO_PKG_VERSION"));

/// A feed entry that passed the feed-level rules; its body is not fetched yet.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub source: String,
    pub published: DateTime<Utc>,
    /// Markup the feed itself carried, used when the page cannot be scraped.
    pub feed_html: String,
}

/// Strip markup from a page, description or content block.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    html2text::from_read(html.as_bytes(), TEXT_WIDTH)
        .map(|text| text.trim().to_string())
        .unwrap_or_else(|_| html.trim().to_string())
}

fn text_of(text: Option<&feed_rs::model::Text>) -> &str {
    text.map(|t| t.content.as_str()).unwrap_or_default()
}

fn entry_link(entry: &Entry) -> Option<&str> {
    entry
        .links
        .iter()
        .map(|link| link.href.trim())
        .find(|href| !href.is_empty())
}

/// Apply the date, link, keyword and publication rules to one parsed feed.
#[must_use]
pub fn entries_from_feed(feed: &Feed, feed_url: &str, since: DateTime<Utc>) -> Vec<FeedEntry> {
    let Some(source) = source_host(feed_url) else {
        return Vec::new();
    };
    if !is_tracked_publication(&source) {
        return Vec::new();
    }

    feed.entries
        .iter()
        .filter_map(|entry| {
            let published = entry.published.or(entry.updated)?;
            if published < since {
                return None;
            }
            let link = entry_link(entry)?;

            let title = text_of(entry.title.as_ref());
            let summary = text_of(entry.summary.as_ref());
            if !mentions_keyword(title, summary) {
                return None;
            }

            let feed_html = entry
                .content
                .as_ref()
                .and_then(|c| c.body.as_deref())
                .filter(|body| !body.trim().is_empty())
                .unwrap_or(summary);

            Some(FeedEntry {
                title: title.to_string(),
                link: link.to_string(),
                source: source.clone(),
                published,
                feed_html: feed_html.to_string(),
            })
        })
        .collect()
}

async fn scrape_page(client: &Client, link: &str) -> Result<String, DigestError> {
    let html = client
        .get(link)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(html_to_text(&html))
}

/// Scraped page text, or the feed's own text when scraping failed.
#[must_use]
pub fn choose_body(scraped: Result<String, DigestError>, entry: &FeedEntry) -> String {
    match scraped {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to scrape {}: {}", entry.link, e);
            html_to_text(&entry.feed_html)
        }
    }
}

/// Full article text for an entry.
pub async fn article_body(client: &Client, entry: &FeedEntry) -> String {
    choose_body(scrape_page(client, &entry.link).await, entry)
}

/// Applies the minimum-length rule and trims the body.
#[must_use]
pub fn into_article(entry: FeedEntry, body: &str) -> Option<Article> {
    if body.chars().count() < MIN_BODY_CHARS {
        return None;
    }
    Some(Article {
        title: entry.title,
        url: entry.link,
        source: entry.source,
        published: Some(RawTimestamp::Text(entry.published.to_rfc3339())),
        content: Some(body.chars().take(MAX_BODY_CHARS).collect()),
        ..Article::default()
    })
}

async fn fetch_feed(client: &Client, feed_url: &str) -> Result<Feed, DigestError> {
    let bytes = client
        .get(feed_url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    parser::parse(&bytes[..])
        .map_err(|e| DigestError::ParseError(format!("Invalid feed {feed_url}: {e}")))
}

/// Collect, dedupe and rank articles published within `window_hours` of `now`.
pub async fn fetch_articles(
    client: &Client,
    feeds: &[&str],
    now: DateTime<Utc>,
    window_hours: i64,
) -> Vec<Article> {
    let since = now - chrono::Duration::hours(window_hours);
    let mut articles: Vec<Article> = Vec::new();

    'feeds: for feed_url in feeds {
        info!("Fetching: {}", feed_url);

        let feed = match fetch_feed(client, feed_url).await {
            Ok(feed) if !feed.entries.is_empty() => feed,
            Ok(_) => {
                warn!("Skipped: {} (no entries)", feed_url);
                continue;
            }
            Err(e) => {
                warn!("Skipped: {} ({})", feed_url, e);
                continue;
            }
        };

        for entry in entries_from_feed(&feed, feed_url, since) {
            let body = article_body(client, &entry).await;
            if let Some(article) = into_article(entry, &body) {
                articles.push(article);
                if articles.len() >= MAX_COLLECTED {
                    break 'feeds;
                }
            }
        }
    }

    let articles = deduplicate_articles(articles);
    info!("Deduplicated to {} articles", articles.len());
    rank_articles(articles, MAX_SELECTED)
}

/// Fetch with the default window, widening once when too few articles survive.
///
/// # Errors
///
/// Returns `UpstreamError` if the HTTP client cannot be built.
pub async fn collect_articles(feeds: &[&str], now: DateTime<Utc>) -> Result<Vec<Article>, DigestError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| DigestError::UpstreamError(format!("Failed to build feed HTTP client: {e}")))?;

    let articles = fetch_articles(&client, feeds, now, DEFAULT_WINDOW_HOURS).await;
    if articles.len() >= MIN_ARTICLES {
        return Ok(articles);
    }

    info!(
        "Fewer than {} articles found, expanding window to {} hours",
        MIN_ARTICLES, WIDE_WINDOW_HOURS
    );
    Ok(fetch_articles(&client, feeds, now, WIDE_WINDOW_HOURS).await)
}

/// # Errors
///
/// Returns `IoError` if the directory or file cannot be written.
pub async fn write_articles(path: &Path, articles: &[Article]) -> Result<(), DigestError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let body = serde_json::to_string_pretty(articles)
        .map_err(|e| DigestError::IoError(format!("Failed to serialize articles: {e}")))?;
    tokio::fs::write(path, body).await?;
    info!("Saved input for summarization to {}", path.display());
    Ok(())
}
