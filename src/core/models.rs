use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A date field as it appears in article feeds: either text or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Text(String),
    Millis(f64),
}

impl RawTimestamp {
    fn is_blank(&self) -> bool {
        match self {
            RawTimestamp::Text(s) => s.trim().is_empty(),
            RawTimestamp::Millis(ms) => *ms == 0.0 || ms.is_nan(),
        }
    }

    /// Parse into a UTC instant. Naive date-times are taken as UTC.
    #[must_use]
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::Millis(ms) => {
                if !ms.is_finite() {
                    return None;
                }
                #[allow(clippy::cast_possible_truncation)]
                let millis = ms.trunc() as i64;
                Utc.timestamp_millis_opt(millis).single()
            }
            RawTimestamp::Text(s) => parse_date_text(s.trim()),
        }
    }

    #[must_use]
    pub fn display(&self) -> String {
        match self {
            RawTimestamp::Text(s) => s.clone(),
            RawTimestamp::Millis(ms) => self
                .to_datetime()
                .map_or_else(|| ms.to_string(), |dt| dt.to_rfc3339()),
        }
    }
}

fn parse_date_text(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// Feed records come from many scrapers; a null or oddly typed field is
// treated as absent rather than failing the whole batch.

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Accepts `"Wired"` or a NewsAPI-style `{"id": null, "name": "Wired"}`.
fn lenient_source<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Object(map) => map
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    })
}

fn lenient_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<RawTimestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(RawTimestamp::Text(s)),
        Value::Number(n) => n.as_f64().map(RawTimestamp::Millis),
        _ => None,
    })
}

/// A news article from the input batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_source")]
    pub source: String,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub published: Option<RawTimestamp>,
    #[serde(
        default,
        rename = "publishedAt",
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<RawTimestamp>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<RawTimestamp>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<RawTimestamp>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<RawTimestamp>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Option<String>,
}

impl Article {
    /// The first present, non-empty date field in priority order.
    #[must_use]
    pub fn raw_published(&self) -> Option<&RawTimestamp> {
        [
            &self.published,
            &self.published_at,
            &self.date,
            &self.timestamp,
            &self.created_at,
        ]
        .into_iter()
        .flatten()
        .find(|ts| !ts.is_blank())
    }

    #[must_use]
    pub fn published_time(&self) -> Option<DateTime<Utc>> {
        self.raw_published().and_then(RawTimestamp::to_datetime)
    }

    /// Body text: `content`, falling back to `summary`.
    #[must_use]
    pub fn body(&self) -> &str {
        self.content
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.summary.as_deref())
            .unwrap_or("")
    }
}

/// A structured summary returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub title: String,
    pub url: String,
    pub source: String,
    pub why: String,
    pub highlight: String,
}

/// Parent announcement message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    pub text: String,
}

/// Threaded reply carrying every summary block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadReplyPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    pub text: String,
    pub blocks: Vec<Value>,
    pub unfurl_links: bool,
    pub unfurl_media: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_date_field_priority() {
        let article: Article = serde_json::from_str(
            r#"{"title":"X","url":"https://a.co/1","published":"","publishedAt":"2025-06-01T10:00:00Z","date":"2020-01-01"}"#,
        )
        .unwrap();
        assert_eq!(
            article.published_time(),
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_article_accepts_epoch_millis() {
        let article: Article =
            serde_json::from_str(r#"{"title":"X","url":"u","timestamp":1717236000000}"#).unwrap();
        assert_eq!(
            article.published_time(),
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_article_tolerates_null_and_nested_fields() {
        let article: Article = serde_json::from_str(
            r#"{"title":null,"url":null,"source":{"id":null,"name":"Wired"},"publishedAt":true,"content":{"html":"x"},"summary":"s"}"#,
        )
        .unwrap();
        assert_eq!(article.title, "");
        assert_eq!(article.url, "");
        assert_eq!(article.source, "Wired");
        assert_eq!(article.published_at, None);
        assert_eq!(article.content, None);
        assert_eq!(article.body(), "s");
    }

    #[test]
    fn test_date_text_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        for text in [
            "2025-03-04T05:06:07Z",
            "2025-03-04T07:06:07+02:00",
            "Tue, 04 Mar 2025 05:06:07 +0000",
            "2025-03-04T05:06:07",
            "2025-03-04 05:06:07",
        ] {
            assert_eq!(
                RawTimestamp::Text(text.to_string()).to_datetime(),
                Some(expected),
                "failed on {text}"
            );
        }
        assert_eq!(
            RawTimestamp::Text("2025-03-04".to_string()).to_datetime(),
            Some(Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap())
        );
        assert_eq!(RawTimestamp::Text("yesterday".to_string()).to_datetime(), None);
    }

    #[test]
    fn test_body_prefers_content() {
        let mut article = Article {
            content: Some("full text".to_string()),
            summary: Some("short".to_string()),
            ..Article::default()
        };
        assert_eq!(article.body(), "full text");
        article.content = None;
        assert_eq!(article.body(), "short");
        article.summary = None;
        assert_eq!(article.body(), "");
    }

    #[test]
    fn test_parent_payload_omits_missing_channel() {
        let payload = ParentPayload {
            channel: None,
            text: "hi".to_string(),
        };
        assert_eq!(serde_json::to_value(&payload).unwrap(), serde_json::json!({"text": "hi"}));
    }
}
