use slack_morphism::{SlackChannelId, SlackTs};
use tracing::info;

use crate::core::config::PostConfig;
use crate::errors::DigestError;
use crate::features::deliver::{THREAD_REPLY_PAYLOAD_FILE, load_reply_payload};
use crate::slack::{PostMessageResponse, SlackClient};

/// Post the saved thread-reply payload under the configured parent message.
///
/// # Errors
///
/// Returns `InputError` if the payload file is unusable and `UpstreamError`
/// if Slack rejects the post. Nothing is retried.
pub async fn post_digest(config: &PostConfig) -> Result<PostMessageResponse, DigestError> {
    let payload_path = config.output_dir.join(THREAD_REPLY_PAYLOAD_FILE);
    let payload = load_reply_payload(&payload_path).await?;

    let client = SlackClient::new(config.bot_token.clone());
    let response = client
        .post_thread_reply(
            &SlackChannelId::new(config.channel_id.clone()),
            &SlackTs::new(config.thread_ts.clone()),
            &payload,
        )
        .await?;

    info!(
        "Successfully posted Slack message to thread_ts={} (ts={})",
        config.thread_ts,
        response.ts.as_deref().unwrap_or("unknown")
    );
    if let Some(blocks) = payload.get("blocks") {
        info!(
            "Posted blocks:\n{}",
            serde_json::to_string_pretty(blocks).unwrap_or_default()
        );
    }

    Ok(response)
}
