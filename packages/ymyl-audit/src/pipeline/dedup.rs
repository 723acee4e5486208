//! Deduplication - the second-pass filter agent over pooled findings.
//!
//! The filter agent merges near-duplicates and applies risk-based
//! filtering. Its failure mode matters more than its success mode: losing
//! every finding to a broken call is worse than over-reporting to a human
//! reviewer, so any failure falls back to the unfiltered input.

use serde_json::json;
use tracing::{info, warn};

use crate::agent::AuditAgent;
use crate::types::config::AuditConfig;
use crate::types::violation::Violation;

use super::parse::try_parse_violations;

/// Result of a deduplication pass: the surviving records plus the raw
/// agent reply (or a failure note) for the debug bundle.
pub async fn filter_violations<F: AuditAgent>(
    agent: &F,
    violations: &[Violation],
    context_backpack: &serde_json::Value,
    config: &AuditConfig,
) -> (Vec<Violation>, String) {
    // Nothing to merge.
    if violations.is_empty() {
        return (Vec::new(), "Skipped".to_string());
    }

    let payload = json!({
        "context_backpack": context_backpack,
        "violations_input": violations,
    });
    let payload = match serde_json::to_string_pretty(&payload) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Deduplicator: payload serialization failed, keeping input");
            return (violations.to_vec(), format!("FAILED: {e}"));
        }
    };

    info!(input = violations.len(), "Running deduplication pass");
    let reply = match tokio::time::timeout(
        config.dedup_timeout,
        agent.review(&payload, "Deduplicator", config.dedup_timeout),
    )
    .await
    {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(error = %e, "Deduplicator call failed, keeping unfiltered list");
            return (violations.to_vec(), format!("FAILED: {e}"));
        }
        Err(_) => {
            warn!("Deduplicator call timed out, keeping unfiltered list");
            return (
                violations.to_vec(),
                format!("FAILED: timeout after {}s", config.dedup_timeout.as_secs()),
            );
        }
    };

    match try_parse_violations(&reply) {
        Some(filtered) => {
            let mut debug_text = reply;
            // Total filtering of a non-trivial finding set is an anomaly
            // worth surfacing, not a confirmed true negative.
            if filtered.is_empty() && violations.len() > config.suspicious_wipeout_threshold {
                warn!(
                    input = violations.len(),
                    "Deduplicator filtered every finding - flagging as suspicious"
                );
                debug_text.push_str(&format!(
                    "\n\n[SUSPICIOUS: {} findings filtered to zero]",
                    violations.len()
                ));
            }
            (filtered, debug_text)
        }
        None => {
            warn!("Deduplicator reply was unparseable, keeping unfiltered list");
            (violations.to_vec(), "FAILED: unparseable reply".to_string())
        }
    }
}
