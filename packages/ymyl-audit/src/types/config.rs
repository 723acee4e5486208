//! Configuration for the audit pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for an audit run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Number of independent auditor calls per analysis run.
    ///
    /// This is ensemble redundancy, not retries: each call is stateless
    /// and their pooled findings are reconciled by the filter agent.
    /// Default: 5.
    pub ensemble_size: usize,

    /// Cap on simultaneously in-flight auditor calls, independent of
    /// `ensemble_size`. Respects the remote service's rate limits.
    /// Default: 5.
    pub max_concurrent_audits: usize,

    /// Startup stagger per call: call `i` waits `i × stagger` before
    /// dispatch to smooth burst arrival. Default: 1s.
    pub stagger: Duration,

    /// Deadline for a single auditor call. Default: 300s.
    pub audit_timeout: Duration,

    /// Deadline for the filter-agent call, which processes the pooled
    /// findings and needs more headroom. Default: 400s.
    pub dedup_timeout: Duration,

    /// If more than this many findings go into deduplication and zero come
    /// out, the result is flagged as suspicious. Default: 3.
    pub suspicious_wipeout_threshold: usize,

    /// Collect raw per-auditor responses into the debug bundle.
    pub debug_mode: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            ensemble_size: 5,
            max_concurrent_audits: 5,
            stagger: Duration::from_secs(1),
            audit_timeout: Duration::from_secs(300),
            dedup_timeout: Duration::from_secs(400),
            suspicious_wipeout_threshold: 3,
            debug_mode: false,
        }
    }
}

impl AuditConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ensemble size (minimum 1).
    pub fn with_ensemble_size(mut self, count: usize) -> Self {
        self.ensemble_size = count.max(1);
        self
    }

    /// Set the concurrency cap (minimum 1).
    pub fn with_max_concurrent(mut self, cap: usize) -> Self {
        self.max_concurrent_audits = cap.max(1);
        self
    }

    /// Set the per-call startup stagger.
    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    /// Set the single-audit timeout.
    pub fn with_audit_timeout(mut self, timeout: Duration) -> Self {
        self.audit_timeout = timeout;
        self
    }

    /// Enable debug collection.
    pub fn with_debug(mut self) -> Self {
        self.debug_mode = true;
        self
    }
}

/// Which extraction strategy the caller wants for ordinary HTML.
///
/// Document-export inputs are detected from content and routed to their
/// own extractor regardless of this flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Heading-based sectioning for arbitrary pages.
    Generic,
    /// Selector-driven extraction tuned to the known casino page template.
    Surgical,
}

impl Default for ExtractionMode {
    fn default() -> Self {
        ExtractionMode::Generic
    }
}
