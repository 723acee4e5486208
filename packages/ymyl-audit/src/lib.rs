//! YMYL Content Audit Core
//!
//! A library for auditing web-page and document content for
//! regulatory-risk ("Your Money or Your Life") violations: structured
//! chunk extraction from HTML, a parallel ensemble of LLM auditors, and
//! the reconciliation passes that turn their raw replies into a report.
//!
//! # Design Philosophy
//!
//! **Sample, then reconcile**
//!
//! - One auditor call is noisy; N independent calls plus a judge pass are
//!   not. The ensemble is redundancy against hallucination and omission,
//!   not retry logic.
//! - LLM replies are untrusted text: located, healed, parsed and
//!   defensively defaulted before anything downstream sees them.
//! - Failure is graded: one bad record is skipped, one failed call is
//!   absorbed, a failed filter pass falls back to the unfiltered list.
//!   Only an all-failed ensemble fails the run.
//! - Extraction walks a read-only parse tree with an explicit visited
//!   set - the source tree is never mutated.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ymyl_audit::{extract_content, ExtractionMode, Orchestrator};
//! use ymyl_audit::testing::MockAuditor;
//!
//! // Extract the page into the chunk model.
//! let document = extract_content(&html, ExtractionMode::Surgical)?;
//!
//! // Audit it with an ensemble of 5 parallel auditors.
//! let orchestrator = Orchestrator::new(auditor, filter_agent);
//! let result = orchestrator.run(&document).await;
//! println!("{}", result.report.unwrap_or_default());
//! ```
//!
//! # Modules
//!
//! - [`extract`] - HTML/document-export extraction into chunk documents
//! - [`pipeline`] - dispatch, parsing, sanitation, dedup, orchestration
//! - [`agent`] - the [`AuditAgent`] trait implemented by LLM providers
//! - [`types`] - chunk documents, violations, results, configuration
//! - [`report`] - markdown report rendering
//! - [`fetch`] - bounded URL fetching for the extractor
//! - [`testing`] - mock agents for tests

pub mod agent;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub mod testing;
pub mod text;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use agent::AuditAgent;
pub use error::{AgentError, AuditError, ExtractError, FetchError};
pub use types::{
    chunk::{BigChunk, ChunkDocument},
    config::{AuditConfig, ExtractionMode},
    result::{AnalysisResult, AuditDebugRecord, DebugBundle},
    violation::{PageNumber, Severity, Violation},
};

// Re-export extraction entry points
pub use extract::{
    detect_format, extract_content, ContentExtractor, DocumentExportExtractor, DocumentFormat,
    GenericExtractor, SurgicalExtractor,
};

// Re-export pipeline components
pub use pipeline::{
    // Orchestration
    Orchestrator,
    // Payload construction
    build_analyzer_payload, inject_global_context, GlobalContext,
    // Dispatch
    dispatch, RawAuditResult,
    // Reply handling
    parse_to_violations, try_parse_violations,
    // Reconciliation
    filter_violations, restore_translations, sanitize, SanitizePolicy,
};

// Re-export report rendering
pub use report::render_markdown;

// Re-export fetching
pub use fetch::fetch_url;

// Re-export testing utilities
pub use testing::{MockAuditor, MockCall};
