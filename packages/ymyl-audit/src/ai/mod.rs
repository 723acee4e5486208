//! Assistants API implementation of the [`AuditAgent`] trait.
//!
//! A reference implementation over the `assistant-client` crate. The
//! per-section auditor and the deduplicating filter agent are two
//! [`AssistantAuditor`]s pointing at differently-tuned assistants.
//!
//! # Example
//!
//! ```rust,ignore
//! use assistant_client::AssistantsClient;
//! use ymyl_audit::ai::AssistantAuditor;
//! use ymyl_audit::Orchestrator;
//!
//! let client = AssistantsClient::from_env()?;
//! let auditor = AssistantAuditor::new(client.clone(), "asst_casino_auditor");
//! let filter = AssistantAuditor::new(client, "asst_deduplicator");
//! let orchestrator = Orchestrator::new(auditor, filter);
//! ```

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use assistant_client::{AssistantError, AssistantsClient};

use crate::agent::AuditAgent;
use crate::error::{AgentError, AgentResult};

/// An audit agent backed by one tuned assistant.
#[derive(Clone)]
pub struct AssistantAuditor {
    client: AssistantsClient,
    assistant_id: String,
}

impl AssistantAuditor {
    /// Create an auditor for the given assistant.
    pub fn new(client: AssistantsClient, assistant_id: impl Into<String>) -> Self {
        Self {
            client,
            assistant_id: assistant_id.into(),
        }
    }

    /// The assistant this auditor calls.
    pub fn assistant_id(&self) -> &str {
        &self.assistant_id
    }
}

#[async_trait]
impl AuditAgent for AssistantAuditor {
    async fn review(
        &self,
        payload: &str,
        task_name: &str,
        timeout: Duration,
    ) -> AgentResult<String> {
        debug!(task = task_name, assistant = %self.assistant_id, "Dispatching to assistant");
        self.client
            .run_assistant(&self.assistant_id, payload, timeout)
            .await
            .map_err(|error| match error {
                AssistantError::Config(message) => AgentError::Config(message),
                AssistantError::Network(source) => AgentError::Network(source),
                AssistantError::Api { code, message } => AgentError::Api { code, message },
                AssistantError::Parse(message) => AgentError::Api {
                    code: "parse".to_string(),
                    message,
                },
                AssistantError::Timeout { seconds } => AgentError::Timeout { seconds },
                AssistantError::EmptyReply => AgentError::EmptyReply,
            })
    }
}
