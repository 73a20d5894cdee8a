//! Payload files handed from the summarize stage to the poster.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::core::models::{ParentPayload, Summary, ThreadReplyPayload};
use crate::errors::DigestError;
use crate::slack::message_formatter::build_payloads;

pub const THREAD_REPLY_PAYLOAD_FILE: &str = "thread_reply_payload.json";
pub const PARENT_PAYLOAD_FILE: &str = "parent_payload.json";

/// Paths of the two files written by [`write_payloads`].
#[derive(Debug, Clone)]
pub struct PayloadFiles {
    pub parent: PathBuf,
    pub thread_reply: PathBuf,
}

async fn write_pretty_json<T: Serialize>(path: &Path, value: &T) -> Result<(), DigestError> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|e| DigestError::IoError(format!("Failed to serialize {}: {e}", path.display())))?;
    tokio::fs::write(path, body)
        .await
        .map_err(|e| DigestError::IoError(format!("Failed to write {}: {e}", path.display())))
}

/// # Errors
///
/// Returns `IoError` if either file cannot be written.
pub async fn write_payloads(
    dir: &Path,
    parent: &ParentPayload,
    reply: &ThreadReplyPayload,
) -> Result<PayloadFiles, DigestError> {
    let files = PayloadFiles {
        parent: dir.join(PARENT_PAYLOAD_FILE),
        thread_reply: dir.join(THREAD_REPLY_PAYLOAD_FILE),
    };

    write_pretty_json(&files.thread_reply, reply).await?;
    write_pretty_json(&files.parent, parent).await?;

    info!(
        "Saved {} and {}",
        files.parent.display(),
        files.thread_reply.display()
    );
    Ok(files)
}

/// Format summaries into blocks and write both payload files.
///
/// # Errors
///
/// Returns `IoError` if a payload file cannot be written.
pub async fn format_digest(
    summaries: &[Summary],
    channel: Option<&str>,
    date: NaiveDate,
    dir: &Path,
) -> Result<PayloadFiles, DigestError> {
    let (parent, reply) = build_payloads(summaries, channel, date);
    info!(
        "Formatted {} summaries into {} blocks",
        summaries.len(),
        reply.blocks.len()
    );
    write_payloads(dir, &parent, &reply).await
}

/// Read the threaded-reply payload written by the summarize stage.
///
/// # Errors
///
/// Returns `InputError` if the file is missing, not JSON, or not an object.
pub async fn load_reply_payload(path: &Path) -> Result<Value, DigestError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        DigestError::InputError(format!(
            "Failed to read Slack payload file {}: {e}",
            path.display()
        ))
    })?;

    let payload: Value = serde_json::from_str(&raw).map_err(|e| {
        DigestError::InputError(format!(
            "Failed to parse Slack payload file {}: {e}",
            path.display()
        ))
    })?;

    if !payload.is_object() {
        return Err(DigestError::InputError(format!(
            "Slack payload file {} does not contain a JSON object",
            path.display()
        )));
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_reply_payload_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = load_reply_payload(&dir.path().join("nope.json")).await;
        assert!(matches!(missing, Err(DigestError::InputError(_))));

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "{not json").unwrap();
        assert!(matches!(
            load_reply_payload(&garbage).await,
            Err(DigestError::InputError(_))
        ));

        let array = dir.path().join("array.json");
        std::fs::write(&array, "[]").unwrap();
        assert!(matches!(
            load_reply_payload(&array).await,
            Err(DigestError::InputError(_))
        ));
    }

    #[tokio::test]
    async fn test_write_payloads_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let parent = ParentPayload {
            channel: None,
            text: "t".to_string(),
        };
        let reply = ThreadReplyPayload {
            channel: None,
            text: "t".to_string(),
            blocks: vec![],
            unfurl_links: false,
            unfurl_media: false,
        };
        let err = write_payloads(&dir.path().join("missing"), &parent, &reply)
            .await
            .unwrap_err();
        assert!(matches!(err, DigestError::IoError(_)));
    }
}
