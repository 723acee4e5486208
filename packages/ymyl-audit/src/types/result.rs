//! The analysis result - the package returned to the caller.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::violation::Violation;

/// Raw record of one auditor call, kept for debugging and traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditDebugRecord {
    /// 1-based index of the call within the ensemble.
    pub audit_number: usize,
    /// Raw text returned by the agent, if the call succeeded.
    pub raw_response: Option<String>,
    /// Error description, if the call failed.
    pub error: Option<String>,
    /// How many violations were parsed out of the response.
    pub parsed_count: usize,
}

/// Debug bundle attached to a result when debug mode is on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugBundle {
    /// Per-auditor raw records.
    pub audits: Vec<AuditDebugRecord>,
    /// Raw text of the deduplicator reply, or a failure note.
    pub deduplicator_raw: String,
}

/// The final package returned by an audit run.
///
/// `success == false` means total pipeline failure (e.g. every auditor
/// call failed); partial degradation is only visible through the debug
/// bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub success: bool,

    /// Unique identifier of this run, for correlating logs.
    pub run_id: Uuid,

    /// Final violations after dedup, sanitation and restoration.
    pub violations: Vec<Violation>,

    /// Markdown report rendered from the final violations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,

    /// Pooled findings count before deduplication.
    pub total_violations_found: usize,

    /// Findings count after deduplication.
    pub unique_violations: usize,

    /// Wall-clock duration of the run.
    pub processing_time_seconds: f64,

    /// Cause category on total failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Raw per-stage records, present only in debug mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugBundle>,
}

impl AnalysisResult {
    /// A failure result carrying only the error description.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            run_id: Uuid::new_v4(),
            violations: Vec::new(),
            report: None,
            total_violations_found: 0,
            unique_violations: 0,
            processing_time_seconds: 0.0,
            error: Some(error.into()),
            debug: None,
        }
    }
}
