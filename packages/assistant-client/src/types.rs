//! Request and response types for the Assistants API.
//!
//! Only the fields the client actually reads are modeled; the API returns
//! far more, and unknown fields are ignored on deserialization.

use serde::{Deserialize, Serialize};

/// A conversation thread.
#[derive(Debug, Clone, Deserialize)]
pub struct Thread {
    pub id: String,
}

/// Request body for adding a message to a thread.
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageRequest {
    pub role: String,
    pub content: String,
}

impl CreateMessageRequest {
    /// A user-role message with the given content.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for starting a run.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRunRequest {
    pub assistant_id: String,
}

/// A run of an assistant over a thread.
#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

impl Run {
    /// Whether the run is still making progress and worth polling again.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self.status,
            RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling
        )
    }
}

/// Lifecycle states of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    Cancelling,
    Completed,
    Failed,
    Cancelled,
    Expired,
    RequiresAction,
    Incomplete,
}

/// Error details attached to a failed run.
#[derive(Debug, Clone, Deserialize)]
pub struct RunError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A page of thread messages, newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub data: Vec<MessageObject>,
}

/// A single message in a thread.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageObject {
    pub role: String,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

impl MessageObject {
    /// Concatenated text of all text-type content parts.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| part.text.as_ref())
            .map(|t| t.value.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One content part of a message.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageContent {
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(default)]
    pub text: Option<TextContent>,
}

/// The text payload of a text content part.
#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub value: String,
}

/// Error envelope returned by the API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

/// Body of an API error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_status_parses_snake_case() {
        let run: Run =
            serde_json::from_str(r#"{"id":"run_1","status":"in_progress"}"#).unwrap();
        assert_eq!(run.status, RunStatus::InProgress);
        assert!(run.is_in_flight());
    }

    #[test]
    fn completed_run_is_not_in_flight() {
        let run: Run = serde_json::from_str(r#"{"id":"run_1","status":"completed"}"#).unwrap();
        assert!(!run.is_in_flight());
    }

    #[test]
    fn message_text_joins_text_parts() {
        let msg: MessageObject = serde_json::from_str(
            r#"{"role":"assistant","content":[
                {"type":"text","text":{"value":"part one"}},
                {"type":"image_file"},
                {"type":"text","text":{"value":"part two"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(msg.text(), "part one\npart two");
    }
}
