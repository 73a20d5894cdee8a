use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Invalid input: {0}")]
    InputError(String),

    #[error("Missing configuration: {0}")]
    ConfigError(String),

    #[error("Upstream API call failed: {0}")]
    UpstreamError(String),

    #[error("Upstream API call failed: Empty response from model")]
    EmptyResponse,

    #[error("Failed to parse model output: {0}")]
    ParseError(String),

    #[error("Failed to write local file: {0}")]
    IoError(String),
}

impl DigestError {
    /// Whether a skipped article still lets the summarize run succeed.
    ///
    /// The loop skips every completion failure; an unrecoverable one also
    /// fails the run once the payload files are written.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::UpstreamError(_) | Self::ParseError(_))
    }
}

impl From<reqwest::Error> for DigestError {
    fn from(error: reqwest::Error) -> Self {
        DigestError::UpstreamError(error.to_string())
    }
}

impl From<std::io::Error> for DigestError {
    fn from(error: std::io::Error) -> Self {
        DigestError::IoError(error.to_string())
    }
}

impl From<serde_json::Error> for DigestError {
    fn from(error: serde_json::Error) -> Self {
        DigestError::ParseError(error.to_string())
    }
}
