//! The audit agent trait - the seam between the pipeline and LLM providers.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::AgentResult;

/// An LLM-backed audit agent.
///
/// Implementations wrap a specific provider and a specific tuned agent
/// (the per-section auditor and the deduplicating filter agent are two
/// instances of this trait). The pipeline treats the reply as untrusted
/// text: extraction, healing and parsing happen downstream.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditAgent: Send + Sync {
    /// Send a payload and return the agent's raw reply text.
    ///
    /// `task_name` is a human-readable label for logs ("Audit #3",
    /// "Deduplicator"); it must not influence the reply. `timeout` bounds
    /// the whole round trip.
    async fn review(
        &self,
        payload: &str,
        task_name: &str,
        timeout: Duration,
    ) -> AgentResult<String>;
}
