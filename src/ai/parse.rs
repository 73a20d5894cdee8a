//! Structural validation of model output into a [`Summary`].

use serde_json::{Map, Value};
use tracing::warn;

use crate::core::models::Summary;
use crate::errors::DigestError;

const WHY_WORDS: (usize, usize) = (25, 50);
const HIGHLIGHT_WORDS: (usize, usize) = (80, 110);

/// Remove a surrounding Markdown code fence, if any.
#[must_use]
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map_or(trimmed, |rest| rest.strip_prefix('\n').unwrap_or(rest));
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

fn required_str(obj: &Map<String, Value>, key: &str) -> Result<String, DigestError> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) => Err(DigestError::ParseError(format!("field `{key}` is empty"))),
        Some(other) => Err(DigestError::ParseError(format!(
            "field `{key}` must be a string, got {other}"
        ))),
        None => Err(DigestError::ParseError(format!("missing field `{key}`"))),
    }
}

#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Parse raw model output into a typed summary.
///
/// # Errors
///
/// Returns `ParseError` if the text is not a single JSON object carrying
/// `title`, `url`, `source`, `why` and `highlight` as non-empty strings.
pub fn parse_summary(raw: &str) -> Result<Summary, DigestError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))?;
    let Value::Object(obj) = value else {
        return Err(DigestError::ParseError(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    let summary = Summary {
        title: required_str(&obj, "title")?,
        url: required_str(&obj, "url")?,
        source: required_str(&obj, "source")?,
        why: required_str(&obj, "why")?,
        highlight: required_str(&obj, "highlight")?,
    };

    for (field, text, (min, max)) in [
        ("why", &summary.why, WHY_WORDS),
        ("highlight", &summary.highlight, HIGHLIGHT_WORDS),
    ] {
        let words = word_count(text);
        if words < min || words > max {
            warn!(
                "Summary `{}` has {} words in `{}` (expected {}-{})",
                summary.title, words, field, min, max
            );
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"title":"T","url":"https://a.co/1","source":"S","why":"because","highlight":"this"}"#;

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{}```"), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }

    #[test]
    fn test_parse_summary_plain_and_fenced() {
        let plain = parse_summary(VALID).unwrap();
        assert_eq!(plain.title, "T");
        assert_eq!(plain.highlight, "this");

        let fenced = parse_summary(&format!("```json\n{VALID}\n```")).unwrap();
        assert_eq!(fenced, plain);
    }

    #[test]
    fn test_parse_summary_rejects_prose() {
        let err = parse_summary("Here is your summary: ...").unwrap_err();
        assert!(matches!(err, DigestError::ParseError(_)));
    }

    #[test]
    fn test_parse_summary_rejects_arrays() {
        let err = parse_summary(&format!("[{VALID}]")).unwrap_err();
        assert!(matches!(err, DigestError::ParseError(ref m) if m.contains("object")));
    }

    #[test]
    fn test_parse_summary_rejects_missing_or_mistyped_fields() {
        let missing = r#"{"title":"T","url":"u","source":"S","why":"w"}"#;
        assert!(
            matches!(parse_summary(missing), Err(DigestError::ParseError(ref m)) if m.contains("highlight"))
        );

        let mistyped = r#"{"title":"T","url":"u","source":"S","why":42,"highlight":"h"}"#;
        assert!(
            matches!(parse_summary(mistyped), Err(DigestError::ParseError(ref m)) if m.contains("why"))
        );

        let blank = r#"{"title":"  ","url":"u","source":"S","why":"w","highlight":"h"}"#;
        assert!(parse_summary(blank).is_err());
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two  three\nfour"), 4);
        assert_eq!(word_count(""), 0);
    }
}
