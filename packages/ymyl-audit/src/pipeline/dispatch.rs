//! Ensemble dispatch - bounded parallel fan-out of auditor calls.
//!
//! The N calls are deliberate redundant sampling, not retries: each is
//! independent and stateless, and their pooled findings are reconciled by
//! the filter agent afterwards. A semaphore caps in-flight calls
//! regardless of ensemble size, and each call starts after an
//! index-proportional stagger to smooth burst arrival at the remote
//! service.

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::agent::AuditAgent;
use crate::error::{AgentError, AgentResult};
use crate::types::config::AuditConfig;

/// Outcome of one auditor call, tagged with its 1-based ensemble index.
/// The tag exists for traceability only; calls have no mutual ordering.
#[derive(Debug)]
pub struct RawAuditResult {
    pub audit_id: usize,
    pub outcome: AgentResult<String>,
}

/// Run `count` independent auditor calls over the same payload.
///
/// One call's failure never aborts its siblings; the caller decides what
/// an all-failed batch means.
pub async fn dispatch<A: AuditAgent>(
    agent: &A,
    payload: &str,
    count: usize,
    config: &AuditConfig,
) -> Vec<RawAuditResult> {
    info!(audits = count, cap = config.max_concurrent_audits, "Dispatching audit ensemble");
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_audits));

    let calls = (0..count).map(|index| {
        let semaphore = Arc::clone(&semaphore);
        async move {
            let _permit = semaphore
                .acquire()
                .await
                .expect("audit semaphore is never closed");
            tokio::time::sleep(config.stagger * index as u32).await;

            let audit_id = index + 1;
            let task_name = format!("Audit #{audit_id}");
            let outcome = match tokio::time::timeout(
                config.audit_timeout,
                agent.review(payload, &task_name, config.audit_timeout),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(AgentError::Timeout {
                    seconds: config.audit_timeout.as_secs(),
                }),
            };

            if let Err(error) = &outcome {
                warn!(audit_id, %error, "Audit call failed");
            }
            RawAuditResult { audit_id, outcome }
        }
    });

    join_all(calls).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAuditor;
    use std::time::Duration;

    fn fast_config(count: usize, cap: usize) -> AuditConfig {
        AuditConfig::new()
            .with_ensemble_size(count)
            .with_max_concurrent(cap)
            .with_stagger(Duration::ZERO)
    }

    #[tokio::test]
    async fn all_calls_complete_and_are_tagged() {
        let agent = MockAuditor::new().with_default_response("[]");
        let config = fast_config(4, 4);
        let results = dispatch(&agent, "payload", 4, &config).await;

        assert_eq!(results.len(), 4);
        let ids: Vec<_> = results.iter().map(|r| r.audit_id).collect();
        assert_eq!(ids, [1, 2, 3, 4]);
        assert!(results.iter().all(|r| r.outcome.is_ok()));
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_the_cap() {
        let agent = MockAuditor::new()
            .with_default_response("[]")
            .with_call_delay(Duration::from_millis(25));
        let config = fast_config(5, 3);
        let results = dispatch(&agent, "payload", 5, &config).await;

        assert_eq!(results.len(), 5);
        assert!(
            agent.concurrent_high_water_mark() <= 3,
            "high-water mark was {}",
            agent.concurrent_high_water_mark()
        );
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_siblings() {
        let agent = MockAuditor::new()
            .with_failure("rate limited")
            .with_default_response("[]");
        let config = fast_config(3, 3);
        let results = dispatch(&agent, "payload", 3, &config).await;

        let failures = results.iter().filter(|r| r.outcome.is_err()).count();
        let successes = results.iter().filter(|r| r.outcome.is_ok()).count();
        assert_eq!(failures, 1);
        assert_eq!(successes, 2);
    }

    #[tokio::test]
    async fn slow_agent_times_out_as_a_failed_attempt() {
        let agent = MockAuditor::new()
            .with_default_response("[]")
            .with_call_delay(Duration::from_millis(200));
        let config = fast_config(1, 1).with_audit_timeout(Duration::from_millis(20));
        let results = dispatch(&agent, "payload", 1, &config).await;

        assert!(matches!(
            results[0].outcome,
            Err(AgentError::Timeout { .. })
        ));
    }
}
