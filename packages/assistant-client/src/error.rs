//! Error types for the assistants client.

use thiserror::Error;

/// Result type for assistants client operations.
pub type Result<T> = std::result::Result<T, AssistantError>;

/// Assistants client errors.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Configuration error (missing API key, invalid settings)
    #[error("configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, DNS, TLS)
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// API error (non-2xx response, failed run)
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    /// Parse error (invalid JSON, unexpected response shape)
    #[error("parse error: {0}")]
    Parse(String),

    /// Run did not complete within the allotted time
    #[error("run timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Run completed but produced no assistant message
    #[error("run completed without an assistant reply")]
    EmptyReply,
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        AssistantError::Network(Box::new(err))
    }
}
