//! The orchestrator - the full audit pipeline over a chunk document.
//!
//! Stages run strictly in sequence, each consuming the complete output of
//! the previous one: payload build → ensemble dispatch → per-reply parse →
//! sanitize → deduplicate → sanitize → translation restoration → report.
//! Only the dispatch stage is concurrent internally.

use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::agent::AuditAgent;
use crate::error::{AuditError, Result};
use crate::extract::extract_content;
use crate::report::render_markdown;
use crate::types::chunk::ChunkDocument;
use crate::types::config::{AuditConfig, ExtractionMode};
use crate::types::result::{AnalysisResult, AuditDebugRecord, DebugBundle};
use crate::types::violation::Violation;

use super::context::build_analyzer_payload;
use super::dedup::filter_violations;
use super::dispatch::dispatch;
use super::parse::parse_to_violations;
use super::sanitize::{sanitize, SanitizePolicy};

/// The audit pipeline entry point.
///
/// Holds the per-section auditor and the deduplicating filter agent -
/// two differently-tuned agents behind the same trait.
///
/// # Example
///
/// ```rust,ignore
/// use ymyl_audit::{Orchestrator, AuditConfig, extract_content, ExtractionMode};
///
/// let orchestrator = Orchestrator::new(auditor, filter_agent)
///     .with_config(AuditConfig::new().with_ensemble_size(5));
///
/// let document = extract_content(&html, ExtractionMode::Surgical)?;
/// let result = orchestrator.run(&document).await;
/// ```
pub struct Orchestrator<A: AuditAgent, F: AuditAgent> {
    auditor: A,
    filter_agent: F,
    config: AuditConfig,
    policy: SanitizePolicy,
}

impl<A: AuditAgent, F: AuditAgent> Orchestrator<A, F> {
    /// Create an orchestrator with default configuration.
    pub fn new(auditor: A, filter_agent: F) -> Self {
        Self {
            auditor,
            filter_agent,
            config: AuditConfig::default(),
            policy: SanitizePolicy::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: AuditConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the sanitation policy table.
    pub fn with_policy(mut self, policy: SanitizePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Run the full audit pipeline over an extracted document.
    ///
    /// The infallible boundary: total failure comes back as
    /// `success == false` with a cause string, partial degradation is
    /// visible only in the debug bundle. Use [`Orchestrator::try_run`]
    /// for the typed error instead.
    pub async fn run(&self, document: &ChunkDocument) -> AnalysisResult {
        match self.try_run(document).await {
            Ok(result) => result,
            Err(error) => AnalysisResult::failure(error.to_string()),
        }
    }

    /// Run the pipeline, surfacing total failure as a typed error.
    pub async fn try_run(&self, document: &ChunkDocument) -> Result<AnalysisResult> {
        let started = Instant::now();
        let run_id = Uuid::new_v4();
        info!(%run_id, audits = self.config.ensemble_size, "Starting audit run");

        let (payload, global_context) = build_analyzer_payload(document)?;

        // Ensemble fan-out.
        let raw_results = dispatch(
            &self.auditor,
            &payload,
            self.config.ensemble_size,
            &self.config,
        )
        .await;

        // Parse each reply independently; tag findings with their source
        // call for traceability.
        let mut pooled: Vec<Violation> = Vec::new();
        let mut successful_audits = 0usize;
        let mut debug_records: Vec<AuditDebugRecord> = Vec::new();

        for result in &raw_results {
            match &result.outcome {
                Ok(text) => {
                    let mut violations = parse_to_violations(text);
                    successful_audits += 1;
                    for violation in &mut violations {
                        violation.source_audit_id = Some(result.audit_id);
                    }
                    if self.config.debug_mode {
                        debug_records.push(AuditDebugRecord {
                            audit_number: result.audit_id,
                            raw_response: Some(text.clone()),
                            error: None,
                            parsed_count: violations.len(),
                        });
                    }
                    pooled.extend(violations);
                }
                Err(error) => {
                    warn!(audit_id = result.audit_id, %error, "Audit failed");
                    if self.config.debug_mode {
                        debug_records.push(AuditDebugRecord {
                            audit_number: result.audit_id,
                            raw_response: None,
                            error: Some(error.to_string()),
                            parsed_count: 0,
                        });
                    }
                }
            }
        }

        if successful_audits == 0 {
            return Err(AuditError::AllAuditsFailed {
                attempted: raw_results.len(),
            });
        }

        let total_found = pooled.len();
        let sanitized = sanitize(pooled, &self.policy);

        // Second-pass reconciliation, then sanitize again - the filter
        // agent may itself emit "no issue" noise.
        let backpack = serde_json::to_value(&global_context)
            .unwrap_or(serde_json::Value::Null);
        let (filtered, dedup_raw) =
            filter_violations(&self.filter_agent, &sanitized, &backpack, &self.config).await;
        let filtered = sanitize(filtered, &self.policy);

        let final_violations = super::restore::restore_translations(filtered, &sanitized);
        let report = render_markdown(&final_violations, successful_audits);

        info!(
            %run_id,
            total = total_found,
            unique = final_violations.len(),
            "Audit run complete"
        );

        Ok(AnalysisResult {
            success: true,
            run_id,
            unique_violations: final_violations.len(),
            violations: final_violations,
            report: Some(report),
            total_violations_found: total_found,
            processing_time_seconds: started.elapsed().as_secs_f64(),
            error: None,
            debug: self.config.debug_mode.then(|| DebugBundle {
                audits: debug_records,
                deduplicator_raw: dedup_raw,
            }),
        })
    }

    /// Run with whole-batch cancellation. Cancellation simply discards
    /// the pending batch; there is no per-call cancellation.
    pub async fn run_with_cancel(
        &self,
        document: &ChunkDocument,
        cancel: CancellationToken,
    ) -> AnalysisResult {
        tokio::select! {
            result = self.run(document) => result,
            _ = cancel.cancelled() => AnalysisResult::failure(AuditError::Cancelled.to_string()),
        }
    }

    /// Convenience: extract a chunk document from raw HTML and audit it.
    pub async fn analyze_html(&self, html: &str, mode: ExtractionMode) -> AnalysisResult {
        match extract_content(html, mode) {
            Ok(document) => self.run(&document).await,
            Err(e) => AnalysisResult::failure(AuditError::from(e).to_string()),
        }
    }
}
