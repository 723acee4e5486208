//! Pure OpenAI Assistants API client
//!
//! A clean, minimal client for the Assistants API (v2) with no domain
//! logic. Covers the thread → message → run → poll → read-reply workflow
//! used by assistant-backed services.
//!
//! # Example
//!
//! ```rust,ignore
//! use assistant_client::AssistantsClient;
//! use std::time::Duration;
//!
//! let client = AssistantsClient::from_env()?;
//!
//! // One-shot: send content to an assistant and wait for its reply text.
//! let reply = client
//!     .run_assistant("asst_abc123", "Audit this content...", Duration::from_secs(300))
//!     .await?;
//! ```
//!
//! The granular endpoint methods (`create_thread`, `add_message`,
//! `create_run`, `get_run`, `list_messages`) are public for callers that
//! need finer control over the workflow.

pub mod error;
pub mod types;

pub use error::{AssistantError, Result};
pub use types::{
    CreateMessageRequest, CreateRunRequest, MessageList, MessageObject, Run, RunError, RunStatus,
    Thread,
};

use std::time::{Duration, Instant};

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use types::ApiErrorEnvelope;

/// Interval between run status polls.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Assistants API client.
#[derive(Clone)]
pub struct AssistantsClient {
    http_client: Client,
    api_key: SecretString,
    base_url: String,
}

impl AssistantsClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: SecretString::from(api_key.into()),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AssistantError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full workflow: create thread → add message → run assistant → poll
    /// until terminal → return the newest assistant message text.
    ///
    /// `timeout` bounds the whole workflow; on expiry the call returns
    /// [`AssistantError::Timeout`] and the remote run is left to expire on
    /// its own.
    pub async fn run_assistant(
        &self,
        assistant_id: &str,
        content: &str,
        timeout: Duration,
    ) -> Result<String> {
        let started = Instant::now();

        let thread = self.create_thread().await?;
        self.add_message(&thread.id, CreateMessageRequest::user(content))
            .await?;

        let mut run = self.create_run(&thread.id, assistant_id).await?;
        debug!(run_id = %run.id, thread_id = %thread.id, "Started assistant run");

        while run.is_in_flight() {
            if started.elapsed() > timeout {
                warn!(run_id = %run.id, "Assistant run timed out");
                return Err(AssistantError::Timeout {
                    seconds: timeout.as_secs(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
            run = self.get_run(&thread.id, &run.id).await?;
        }

        match run.status {
            RunStatus::Completed => {
                let messages = self.list_messages(&thread.id).await?;
                let reply = messages
                    .data
                    .into_iter()
                    .find(|m| m.role == "assistant")
                    .ok_or(AssistantError::EmptyReply)?;
                let text = reply.text();
                if text.is_empty() {
                    return Err(AssistantError::EmptyReply);
                }
                debug!(run_id = %run.id, chars = text.len(), "Assistant run completed");
                Ok(text)
            }
            RunStatus::Failed => {
                let (code, message) = run
                    .last_error
                    .map(|e| {
                        (
                            e.code.unwrap_or_else(|| "unknown".into()),
                            e.message.unwrap_or_else(|| "run failed".into()),
                        )
                    })
                    .unwrap_or_else(|| ("unknown".into(), "run failed".into()));
                Err(AssistantError::Api { code, message })
            }
            status => Err(AssistantError::Api {
                code: "unexpected_status".into(),
                message: format!("run ended with status {status:?}"),
            }),
        }
    }

    /// Create an empty thread.
    pub async fn create_thread(&self) -> Result<Thread> {
        self.post("threads", &serde_json::json!({})).await
    }

    /// Add a message to a thread.
    pub async fn add_message(
        &self,
        thread_id: &str,
        message: CreateMessageRequest,
    ) -> Result<MessageObject> {
        self.post(&format!("threads/{thread_id}/messages"), &message)
            .await
    }

    /// Start a run of an assistant over a thread.
    pub async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        self.post(
            &format!("threads/{thread_id}/runs"),
            &CreateRunRequest {
                assistant_id: assistant_id.to_string(),
            },
        )
        .await
    }

    /// Retrieve the current state of a run.
    pub async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.get(&format!("threads/{thread_id}/runs/{run_id}")).await
    }

    /// List thread messages, newest first.
    pub async fn list_messages(&self, thread_id: &str) -> Result<MessageList> {
        self.get(&format!("threads/{thread_id}/messages")).await
    }

    async fn post<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .http_client
            .post(format!("{}/{path}", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("OpenAI-Beta", "assistants=v2")
            .json(body)
            .send()
            .await?;
        Self::read_response(response).await
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http_client
            .get(format!("{}/{path}", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("OpenAI-Beta", "assistants=v2")
            .send()
            .await?;
        Self::read_response(response).await
    }

    async fn read_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Prefer the API's own error envelope when it parses.
            if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(&body) {
                return Err(AssistantError::Api {
                    code: envelope
                        .error
                        .code
                        .unwrap_or_else(|| status.as_u16().to_string()),
                    message: envelope
                        .error
                        .message
                        .unwrap_or_else(|| "request failed".into()),
                });
            }
            return Err(AssistantError::Api {
                code: status.as_u16().to_string(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| AssistantError::Parse(e.to_string()))
    }
}
