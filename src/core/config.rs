use std::env;
use std::path::PathBuf;

use chrono_tz::Tz;

use crate::errors::DigestError;

pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://models.inference.ai.azure.com";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o";
pub const DEFAULT_COLLECT_OUTPUT: &str = "data/input.json";

/// Settings for the summarize + format stage.
#[derive(Debug, Clone)]
pub struct SummarizeConfig {
    pub completion_token: String,
    pub completion_endpoint: String,
    pub completion_model: String,
    /// Optional at this stage; the poster supplies the channel authoritatively.
    pub channel_id: Option<String>,
    pub timezone: Tz,
    pub output_dir: PathBuf,
}

/// Settings for the thread-reply poster.
#[derive(Debug, Clone)]
pub struct PostConfig {
    pub bot_token: String,
    pub channel_id: String,
    pub thread_ts: String,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct CollectConfig {
    pub output_path: PathBuf,
}

fn non_blank<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn output_dir<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    non_blank(lookup, "DIGEST_OUTPUT_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from)
}

impl SummarizeConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` when the completion credential is missing or the
    /// configured timezone is not a known IANA name.
    pub fn from_env() -> Result<Self, DigestError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// # Errors
    ///
    /// See [`SummarizeConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DigestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let completion_token = non_blank(&lookup, "GITHUB_TOKEN")
            .ok_or_else(|| DigestError::ConfigError("GITHUB_TOKEN is missing".to_string()))?;

        let timezone = match non_blank(&lookup, "DIGEST_TIMEZONE") {
            Some(name) => name.parse::<Tz>().map_err(|e| {
                DigestError::ConfigError(format!("DIGEST_TIMEZONE: {e}"))
            })?,
            None => Tz::UTC,
        };

        Ok(Self {
            completion_token,
            completion_endpoint: non_blank(&lookup, "COMPLETION_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_COMPLETION_ENDPOINT.to_string()),
            completion_model: non_blank(&lookup, "COMPLETION_MODEL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string()),
            channel_id: non_blank(&lookup, "CHANNEL_ID"),
            timezone,
            output_dir: output_dir(&lookup),
        })
    }
}

impl PostConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` listing every required variable that is missing.
    pub fn from_env() -> Result<Self, DigestError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// # Errors
    ///
    /// See [`PostConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DigestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = non_blank(&lookup, "BOT_TOKEN");
        let channel_id = non_blank(&lookup, "CHANNEL_ID");
        let thread_ts = non_blank(&lookup, "SLACK_THREAD_TS");

        match (bot_token, channel_id, thread_ts) {
            (Some(bot_token), Some(channel_id), Some(thread_ts)) => Ok(Self {
                bot_token,
                channel_id,
                thread_ts,
                output_dir: output_dir(&lookup),
            }),
            (bot_token, channel_id, thread_ts) => {
                let missing: Vec<&str> = [
                    ("BOT_TOKEN", bot_token.is_none()),
                    ("CHANNEL_ID", channel_id.is_none()),
                    ("SLACK_THREAD_TS", thread_ts.is_none()),
                ]
                .iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| *name)
                .collect();

                Err(DigestError::ConfigError(format!(
                    "Missing one or more required environment variables: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

impl CollectConfig {
    #[must_use]
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self {
            output_path: output_path.unwrap_or_else(|| PathBuf::from(DEFAULT_COLLECT_OUTPUT)),
        }
    }
}
