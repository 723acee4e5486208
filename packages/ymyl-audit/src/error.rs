//! Typed errors for the audit library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur during the audit pipeline.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Content extraction failed
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// Remote agent call failed
    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    /// Every auditor call in the ensemble failed
    #[error("all {attempted} auditor calls failed")]
    AllAuditsFailed { attempted: usize },

    /// Operation was cancelled
    #[error("operation cancelled")]
    Cancelled,

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during content extraction.
///
/// Extraction is deliberately forgiving: malformed markup degrades to the
/// placeholder chunk rather than an error, so this surface is small.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Internal selector or tree traversal failure
    #[error("document parse error: {0}")]
    Parse(String),
}

/// Errors that can occur calling a remote audit agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Configuration error (missing credentials, unknown agent id)
    #[error("configuration error: {0}")]
    Config(String),

    /// Network-level failure
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Remote service rejected the call or the run failed
    #[error("agent API error ({code}): {message}")]
    Api { code: String, message: String },

    /// Call did not complete within its deadline
    #[error("agent call timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Call completed but produced no usable reply text
    #[error("agent returned an empty reply")]
    EmptyReply,
}

/// Errors that can occur fetching a URL for extraction.
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL failed validation
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// HTTP request failed
    #[error("connection error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request did not complete in time
    #[error("request timed out")]
    Timeout,

    /// Non-success HTTP status
    #[error("HTTP {status} fetching {url}")]
    Status { status: u16, url: String },

    /// Response body exceeded the size cap
    #[error("content too large (>{limit_bytes} bytes)")]
    TooLarge { limit_bytes: usize },
}

/// Result type alias for audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for extraction operations.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Result type alias for agent calls.
pub type AgentResult<T> = std::result::Result<T, AgentError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
