//! Integration tests for the full audit pipeline.
//!
//! These exercise the whole flow over mock agents:
//! 1. Extract HTML into a chunk document
//! 2. Fan out the auditor ensemble
//! 3. Parse, sanitize, deduplicate
//! 4. Restore translations and render the report

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use ymyl_audit::{
    extract_content, AuditConfig, ExtractionMode, MockAuditor, Orchestrator,
};

/// One real finding (with a translation) plus a "no issue" row, as an
/// auditor would reply.
const AUDIT_REPLY: &str = r#"{
    "violations": [
        {
            "problematic_text": "Guaranteed 100% win!",
            "violation_type": "Misleading Claim",
            "explanation": "Promises a certain outcome.",
            "guideline_section": "2.1",
            "page_number": 14,
            "severity": "critical",
            "suggested_rewrite": "Winning is never guaranteed.",
            "translation": "Gewonnen garantiert!",
            "chunk_language": "German"
        },
        {
            "problematic_text": "n/a",
            "violation_type": "No violation found",
            "explanation": "",
            "guideline_section": "",
            "page_number": 0,
            "severity": "low",
            "suggested_rewrite": ""
        }
    ]
}"#;

/// The filter agent's merged reply - translation dropped, punctuation
/// stripped, as the merge pass tends to do.
const DEDUP_REPLY: &str = r#"[{
    "problematic_text": "Guaranteed 100% win",
    "violation_type": "Misleading Claim",
    "explanation": "Promises a certain outcome.",
    "guideline_section": "2.1",
    "page_number": 14,
    "severity": "critical",
    "suggested_rewrite": "Winning is never guaranteed."
}]"#;

const PAGE: &str = "<body><h1>Casino Review</h1><p>⚠️ 18+ only.</p>\
    <h2>Bonuses</h2><p>Guaranteed 100% win!</p></body>";

fn fast_config(ensemble: usize) -> AuditConfig {
    AuditConfig::new()
        .with_ensemble_size(ensemble)
        .with_stagger(Duration::ZERO)
}

#[tokio::test]
async fn full_pipeline_produces_a_deduplicated_report() {
    let auditor = MockAuditor::new().with_default_response(AUDIT_REPLY);
    let filter = MockAuditor::new().with_response(DEDUP_REPLY);
    let orchestrator = Orchestrator::new(auditor, filter).with_config(fast_config(3));

    let document = extract_content(PAGE, ExtractionMode::Generic).unwrap();
    let result = orchestrator.run(&document).await;

    assert!(result.success);
    assert!(result.error.is_none());
    // 3 audits × 2 raw rows pooled before any filtering.
    assert_eq!(result.total_violations_found, 6);
    assert_eq!(result.unique_violations, 1);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].violation_type, "Misleading Claim");

    let report = result.report.unwrap();
    assert!(report.contains("Misleading Claim"));
    assert!(report.contains("**Audits Performed:** 3"));
}

#[tokio::test]
async fn translations_survive_the_merge_pass() {
    let auditor = MockAuditor::new().with_default_response(AUDIT_REPLY);
    let filter = MockAuditor::new().with_response(DEDUP_REPLY);
    let orchestrator = Orchestrator::new(auditor, filter).with_config(fast_config(2));

    let document = extract_content(PAGE, ExtractionMode::Generic).unwrap();
    let result = orchestrator.run(&document).await;

    // The filter agent dropped the translation; restoration brings it
    // back via the normalized text key despite the stripped punctuation.
    assert_eq!(
        result.violations[0].translation.as_deref(),
        Some("Gewonnen garantiert!")
    );
}

#[tokio::test]
async fn partial_ensemble_failure_still_succeeds() {
    let auditor = MockAuditor::new()
        .with_timeout_failure()
        .with_timeout_failure()
        .with_default_response(AUDIT_REPLY);
    let filter = MockAuditor::new().with_response(DEDUP_REPLY);
    let orchestrator = Orchestrator::new(auditor, filter)
        .with_config(fast_config(5).with_debug());

    let document = extract_content(PAGE, ExtractionMode::Generic).unwrap();
    let result = orchestrator.run(&document).await;

    assert!(result.success);
    assert!(result.error.is_none());
    // 3 of 5 audits succeeded; the failures live only in debug metadata.
    assert_eq!(result.total_violations_found, 6);
    let debug = result.debug.unwrap();
    assert_eq!(debug.audits.len(), 5);
    assert_eq!(debug.audits.iter().filter(|a| a.error.is_some()).count(), 2);
}

#[tokio::test]
async fn all_audits_failing_fails_the_run() {
    let auditor = MockAuditor::new()
        .with_failure("rate limited")
        .with_failure("rate limited")
        .with_failure("rate limited");
    let filter = MockAuditor::new();
    let orchestrator = Orchestrator::new(auditor, filter).with_config(fast_config(3));

    let document = extract_content(PAGE, ExtractionMode::Generic).unwrap();
    let result = orchestrator.run(&document).await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("all 3 auditor calls failed"));
    assert!(result.violations.is_empty());
}

#[tokio::test]
async fn filter_agent_failure_falls_back_to_pooled_findings() {
    let auditor = MockAuditor::new().with_default_response(AUDIT_REPLY);
    let filter = MockAuditor::new()
        .with_failure("deduplicator unavailable")
        .with_default_response("unused");
    let orchestrator = Orchestrator::new(auditor, filter).with_config(fast_config(2));

    let document = extract_content(PAGE, ExtractionMode::Generic).unwrap();
    let result = orchestrator.run(&document).await;

    // Fail open: the sanitized pooled list survives (2 audits × 1 real
    // finding each), rather than vanishing with the broken filter call.
    assert!(result.success);
    assert_eq!(result.violations.len(), 2);
    assert!(result
        .violations
        .iter()
        .all(|v| v.violation_type == "Misleading Claim"));
}

#[tokio::test]
async fn ensemble_respects_the_concurrency_cap() {
    let auditor = MockAuditor::new()
        .with_default_response(AUDIT_REPLY)
        .with_call_delay(Duration::from_millis(25));
    let probe = auditor.clone();
    let filter = MockAuditor::new().with_response(DEDUP_REPLY);
    let orchestrator = Orchestrator::new(auditor, filter)
        .with_config(fast_config(5).with_max_concurrent(3));

    let document = extract_content(PAGE, ExtractionMode::Generic).unwrap();
    let result = orchestrator.run(&document).await;

    assert!(result.success);
    assert_eq!(result.total_violations_found, 10);
    assert_eq!(probe.calls().len(), 5);
    assert!(
        probe.concurrent_high_water_mark() <= 3,
        "high-water mark was {}",
        probe.concurrent_high_water_mark()
    );
}

#[tokio::test]
async fn cancellation_discards_the_batch() {
    let auditor = MockAuditor::new()
        .with_default_response(AUDIT_REPLY)
        .with_call_delay(Duration::from_millis(100));
    let filter = MockAuditor::new();
    let orchestrator = Orchestrator::new(auditor, filter).with_config(fast_config(2));

    let cancel = CancellationToken::new();
    cancel.cancel();

    let document = extract_content(PAGE, ExtractionMode::Generic).unwrap();
    let result = orchestrator.run_with_cancel(&document, cancel).await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("operation cancelled"));
}

#[tokio::test]
async fn analyze_html_wires_extraction_into_the_run() {
    let auditor = MockAuditor::new().with_default_response(AUDIT_REPLY);
    let filter = MockAuditor::new().with_response(DEDUP_REPLY);
    let orchestrator = Orchestrator::new(auditor, filter).with_config(fast_config(1));

    let result = orchestrator
        .analyze_html(PAGE, ExtractionMode::Surgical)
        .await;
    assert!(result.success);
    assert_eq!(result.violations.len(), 1);
}

#[tokio::test]
async fn auditors_see_injected_global_context() {
    let auditor = MockAuditor::new().with_default_response("[]");
    let probe = auditor.clone();
    let filter = MockAuditor::new();
    let orchestrator = Orchestrator::new(auditor, filter).with_config(fast_config(2));

    let document = extract_content(PAGE, ExtractionMode::Generic).unwrap();
    let _ = orchestrator.run(&document).await;

    // Every auditor call sees the identical payload, with the page-level
    // warning injected into the per-section context line.
    let calls = probe.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].payload, calls[1].payload);
    assert!(calls[0]
        .payload
        .contains("GLOBAL_CONTEXT (applies to this section):"));
    assert!(calls[0].payload.contains("18+ only"));
    assert!(calls[0].payload.contains("\"primary_topic\": \"Casino Review\""));
}
