//! Sanitation - dropping records that are not real findings.
//!
//! Both the first-pass auditors and the filter agent occasionally emit
//! "everything is fine" rows shaped like violations. The sanitizer is a
//! pure filter applied identically before and after deduplication.

use crate::types::violation::Violation;

/// Policy table for the sanitizer.
///
/// The vocabulary is a hand-maintained policy, not a constant: deployments
/// add locale variants as they encounter them. The default carries only
/// entries evidenced in auditor replies.
#[derive(Debug, Clone)]
pub struct SanitizePolicy {
    /// `violation_type` values (casefolded, trimmed) that mean "no issue".
    pub no_issue_types: Vec<String>,

    /// Substrings of `violation_type` that mean "no issue" wherever they
    /// appear ("No violation found in this section").
    pub no_issue_fragments: Vec<String>,

    /// Placeholder `problematic_text` values that carry no finding.
    pub placeholder_texts: Vec<String>,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        Self {
            // Exact matches: short words like "safe" must not catch real
            // types such as "Unsafe claim".
            no_issue_types: ["no violations", "compliant", "n/a", "safe", "passed"]
                .map(String::from)
                .to_vec(),
            no_issue_fragments: vec!["no violation".to_string()],
            placeholder_texts: ["n/a", "none"].map(String::from).to_vec(),
        }
    }
}

impl SanitizePolicy {
    /// True if the record is a real finding under this policy.
    pub fn is_real_finding(&self, violation: &Violation) -> bool {
        let violation_type = violation.violation_type.trim().to_lowercase();
        if violation_type.is_empty()
            || self.no_issue_types.iter().any(|t| *t == violation_type)
            || self
                .no_issue_fragments
                .iter()
                .any(|f| violation_type.contains(f.as_str()))
        {
            return false;
        }

        let text = violation.problematic_text.trim().to_lowercase();
        if text.is_empty() || self.placeholder_texts.iter().any(|p| *p == text) {
            return false;
        }

        true
    }
}

/// Drop non-findings. Pure and idempotent.
pub fn sanitize(violations: Vec<Violation>, policy: &SanitizePolicy) -> Vec<Violation> {
    violations
        .into_iter()
        .filter(|v| policy.is_real_finding(v))
        .collect()
}
