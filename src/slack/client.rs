//! Slack API client module
//!
//! Posts prepared Block Kit payloads through `chat.postMessage`.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use slack_morphism::{SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackTs};
use std::time::Duration;

use crate::errors::DigestError;

const CHAT_POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Response from `chat.postMessage`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    /// Whether the API call succeeded.
    pub ok: bool,
    /// Channel ID the message landed in.
    pub channel: Option<String>,
    /// Timestamp of the posted message.
    pub ts: Option<String>,
    /// Error code if `ok` is false.
    pub error: Option<String>,
}

/// Merge the prepared payload with the target channel and thread.
///
/// The configured channel and thread always win over whatever the payload
/// file carries.
///
/// # Errors
///
/// Returns `InputError` if the payload is not a JSON object.
pub fn build_thread_reply_request(
    channel: &SlackChannelId,
    thread_ts: &SlackTs,
    payload: &Value,
) -> Result<Value, DigestError> {
    let Value::Object(fields) = payload else {
        return Err(DigestError::InputError(
            "Slack payload must be a JSON object".to_string(),
        ));
    };

    let mut request = fields.clone();
    request.insert("channel".to_string(), Value::String(channel.0.clone()));
    request.insert("thread_ts".to_string(), Value::String(thread_ts.0.clone()));
    Ok(Value::Object(request))
}

/// Slack Web API client
pub struct SlackClient {
    token: SlackApiToken,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        }
    }

    #[must_use]
    pub fn token(&self) -> &SlackApiToken {
        &self.token
    }

    /// Post a prepared payload as a reply in `thread_ts`.
    ///
    /// A single attempt: any transport failure, non-2xx status or `ok: false`
    /// body is returned as an error.
    ///
    /// # Errors
    ///
    /// Returns `InputError` for a non-object payload and `UpstreamError` if
    /// the request fails or Slack rejects the message.
    pub async fn post_thread_reply(
        &self,
        channel: &SlackChannelId,
        thread_ts: &SlackTs,
        payload: &Value,
    ) -> Result<PostMessageResponse, DigestError> {
        let request = build_thread_reply_request(channel, thread_ts, payload)?;

        let resp = HTTP_CLIENT
            .post(CHAT_POST_MESSAGE_URL)
            .bearer_auth(&self.token.token_value.0)
            .json(&request)
            .send()
            .await
            .map_err(|e| DigestError::UpstreamError(format!("Failed to post thread reply: {e}")))?;

        if !resp.status().is_success() {
            return Err(DigestError::UpstreamError(format!(
                "chat.postMessage HTTP {}",
                resp.status()
            )));
        }

        let body: PostMessageResponse = resp.json().await.map_err(|e| {
            DigestError::UpstreamError(format!("chat.postMessage JSON parse error: {e}"))
        })?;

        check_post_response(body)
    }
}

/// Turn an `ok: false` body into an error carrying Slack's error code.
///
/// # Errors
///
/// Returns `UpstreamError` when `ok` is false.
pub fn check_post_response(body: PostMessageResponse) -> Result<PostMessageResponse, DigestError> {
    if body.ok {
        Ok(body)
    } else {
        Err(DigestError::UpstreamError(format!(
            "chat.postMessage error: {}",
            body.error.as_deref().unwrap_or("unknown")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_thread_reply_request_sets_target() {
        let payload = json!({
            "channel": "C_OLD",
            "text": "title",
            "blocks": [{"type": "divider"}],
            "unfurl_links": false
        });
        let request = build_thread_reply_request(
            &SlackChannelId::new("C123".to_string()),
            &SlackTs::new("1700000000.000100".to_string()),
            &payload,
        )
        .unwrap();

        assert_eq!(request["channel"], "C123");
        assert_eq!(request["thread_ts"], "1700000000.000100");
        assert_eq!(request["text"], "title");
        assert_eq!(request["blocks"], json!([{"type": "divider"}]));
        assert_eq!(request["unfurl_links"], false);
    }

    #[test]
    fn test_build_thread_reply_request_rejects_non_object() {
        let err = build_thread_reply_request(
            &SlackChannelId::new("C123".to_string()),
            &SlackTs::new("1.2".to_string()),
            &json!([1, 2]),
        )
        .unwrap_err();
        assert!(matches!(err, DigestError::InputError(_)));
    }

    #[test]
    fn test_post_message_response_parsing() {
        let ok: PostMessageResponse =
            serde_json::from_str(r#"{"ok":true,"channel":"C123","ts":"1.2","message":{}}"#)
                .unwrap();
        let ok = check_post_response(ok).unwrap();
        assert_eq!(ok.ts.as_deref(), Some("1.2"));

        let failed: PostMessageResponse =
            serde_json::from_str(r#"{"ok":false,"error":"thread_not_found"}"#).unwrap();
        let err = check_post_response(failed).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Upstream API call failed: chat.postMessage error: thread_not_found"
        );
    }

    #[test]
    fn test_token_is_wrapped() {
        let client = SlackClient::new("xoxb-test".to_string());
        assert_eq!(client.token().token_value.0, "xoxb-test");
    }
}
