//! Chat-completion API client module
//!
//! Encapsulates the completion call used to summarize each article.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::info;

use crate::errors::DigestError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// Anything that can turn a system instruction plus a user prompt into text.
#[async_trait]
pub trait Completion: Send + Sync {
    /// # Errors
    ///
    /// Returns `UpstreamError` when the call fails and `EmptyResponse` when
    /// it yields no content.
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, DigestError>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint
pub struct LlmClient {
    http: Client,
    api_key: String,
    endpoint: String,
    model_name: String,
}

impl LlmClient {
    /// # Errors
    ///
    /// Returns `ConfigError` if the API key is blank, `UpstreamError` if the
    /// HTTP client cannot be built.
    pub fn new(api_key: &str, endpoint: &str, model_name: &str) -> Result<Self, DigestError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(DigestError::ConfigError(
                "completion API token is missing".to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                DigestError::UpstreamError(format!("Failed to build completion HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model_name: model_name.to_string(),
        })
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }

    #[must_use]
    pub fn build_prompt(&self, system_prompt: &str, prompt: &str) -> Vec<ChatCompletionMessage> {
        vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text(system_prompt.to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text(prompt.to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ]
    }

    /// Send a prepared prompt and return the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError` if the request fails or the status is not a
    /// success, and `EmptyResponse` if the response carries no message content.
    pub async fn generate(&self, prompt: &[ChatCompletionMessage]) -> Result<String, DigestError> {
        #[cfg(feature = "debug-logs")]
        info!("Using completion prompt:\n{:?}", prompt);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            "Requesting completion from {} with ~{} input tokens",
            self.model_name,
            prompt
                .iter()
                .map(|msg| estimate_tokens(&format!("{:?}", msg.content)))
                .sum::<usize>()
        );

        let request_body = build_chat_request_body(&self.model_name, prompt);

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| DigestError::UpstreamError(format!("Completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(DigestError::UpstreamError(format!(
                "Completion API error (status {status}): {error_text}"
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            DigestError::UpstreamError(format!("Failed to parse completion response: {e}"))
        })?;

        extract_message_content(&response_json)
            .ok_or(DigestError::EmptyResponse)
    }
}

#[async_trait]
impl Completion for LlmClient {
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, DigestError> {
        let messages = self.build_prompt(system_prompt, prompt);
        self.generate(&messages).await
    }
}

/// Build the `/chat/completions` request body from a chat-style prompt.
pub(crate) fn build_chat_request_body(model: &str, prompt: &[ChatCompletionMessage]) -> Value {
    let messages: Vec<Value> = prompt
        .iter()
        .filter_map(|m| {
            let role_str = match m.role {
                MessageRole::system => "system",
                MessageRole::user | MessageRole::function | MessageRole::tool => "user",
                MessageRole::assistant => "assistant",
            };

            match &m.content {
                Content::Text(t) => Some(json!({
                    "role": role_str,
                    "content": t
                })),
                Content::ImageUrl(_) => None,
            }
        })
        .collect();

    json!({
        "model": model,
        "messages": messages
    })
}

/// Pull `choices[0].message.content`, treating blank text as absent.
pub(crate) fn extract_message_content(response: &Value) -> Option<String> {
    response
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}
