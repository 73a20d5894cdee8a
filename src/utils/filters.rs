use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::core::models::Article;
use crate::errors::DigestError;

/// Articles older than this are considered stale.
pub const MAX_ARTICLE_AGE_HOURS: i64 = 36;

/// Parse a raw JSON array of article records.
///
/// Elements that are not objects are dropped with a warning. Fields with an
/// unexpected type read as absent, so the filter decides what survives.
///
/// # Errors
///
/// Returns `InputError` if the text is not a JSON array.
pub fn parse_articles(raw: &str) -> Result<Vec<Article>, DigestError> {
    let records: Vec<Value> = serde_json::from_str(raw)
        .map_err(|e| DigestError::InputError(format!("Invalid JSON input: {e}")))?;

    let mut articles = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        if !record.is_object() {
            warn!("Dropping input record {}: not a JSON object", index);
            continue;
        }
        match serde_json::from_value::<Article>(record) {
            Ok(article) => articles.push(article),
            Err(e) => warn!("Dropping input record {}: {}", index, e),
        }
    }
    Ok(articles)
}

/// # Errors
///
/// Returns `InputError` if the file cannot be read or parsed.
pub async fn load_articles(path: &Path) -> Result<Vec<Article>, DigestError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        DigestError::InputError(format!("Failed to read {}: {e}", path.display()))
    })?;
    parse_articles(&raw)
}

/// True when `candidate` is an absolute `http` or `https` URL.
#[must_use]
pub fn is_valid_url(candidate: &str) -> bool {
    Url::parse(candidate).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

/// True when the article has a parseable date no older than `max_age` at `now`.
#[must_use]
pub fn is_recent(article: &Article, now: DateTime<Utc>, max_age: Duration) -> bool {
    article
        .published_time()
        .is_some_and(|published| now.signed_duration_since(published) <= max_age)
}

/// Keeps recent articles with valid links, preserving input order.
#[must_use]
pub fn filter_articles(articles: Vec<Article>, now: DateTime<Utc>, max_age: Duration) -> Vec<Article> {
    articles
        .into_iter()
        .filter(|article| is_recent(article, now, max_age) && is_valid_url(&article.url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::RawTimestamp;

    fn article(title: &str, url: &str, published: DateTime<Utc>) -> Article {
        Article {
            title: title.to_string(),
            url: url.to_string(),
            source: "Example".to_string(),
            published: Some(RawTimestamp::Text(published.to_rfc3339())),
            ..Article::default()
        }
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://a.co/1"));
        assert!(is_valid_url("http://example.com"));
        assert!(!is_valid_url("ftp://a.co"));
        assert!(!is_valid_url("/relative/path"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_filter_keeps_recent_and_drops_stale_or_bad_urls() {
        let now = Utc::now();
        let max_age = Duration::hours(MAX_ARTICLE_AGE_HOURS);
        let articles = vec![
            article("fresh", "https://a.co/1", now - Duration::hours(35)),
            article("stale", "https://a.co/2", now - Duration::hours(40)),
            article("ftp", "ftp://a.co", now - Duration::hours(1)),
            article("fresh2", "http://b.co/3", now - Duration::minutes(5)),
        ];

        let kept: Vec<String> = filter_articles(articles, now, max_age)
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(kept, vec!["fresh".to_string(), "fresh2".to_string()]);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let now = Utc::now();
        let max_age = Duration::hours(MAX_ARTICLE_AGE_HOURS);
        let exact = article("edge", "https://a.co/1", now - max_age);
        let over = article("over", "https://a.co/2", now - max_age - Duration::seconds(1));
        assert!(is_recent(&exact, now, max_age));
        assert!(!is_recent(&over, now, max_age));
    }

    #[test]
    fn test_missing_or_garbage_date_is_dropped() {
        let now = Utc::now();
        let mut undated = article("undated", "https://a.co/1", now);
        undated.published = None;
        let mut garbage = article("garbage", "https://a.co/2", now);
        garbage.published = Some(RawTimestamp::Text("sometime".to_string()));
        let kept = filter_articles(vec![undated, garbage], now, Duration::hours(36));
        assert!(kept.is_empty());
    }

    #[test]
    fn test_parse_articles_rejects_non_array() {
        assert!(matches!(
            parse_articles("{\"title\": \"x\"}"),
            Err(DigestError::InputError(_))
        ));
        assert!(matches!(parse_articles("not json"), Err(DigestError::InputError(_))));
        assert_eq!(parse_articles("[]").unwrap().len(), 0);
    }

    #[test]
    fn test_parse_articles_drops_non_object_records() {
        let articles = parse_articles(r#"[{"title":"ok","url":"https://a.co/1"}, 42, "text", null, [1]]"#)
            .unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "ok");
    }

    #[tokio::test]
    async fn test_load_articles_missing_file() {
        let err = load_articles(Path::new("/definitely/not/here.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, DigestError::InputError(_)));
    }
}
