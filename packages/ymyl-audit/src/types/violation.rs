//! Violation records - the structured findings produced by auditors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity levels matching the auditor prompt's severity framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Lenient conversion from AI string output. Unknown or empty values
    /// default to [`Severity::Medium`].
    pub fn from_str_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "low" => Severity::Low,
            _ => Severity::Medium,
        }
    }

    /// The wire-format string for this severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Medium
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guideline page reference - source documents use either form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageNumber {
    Int(i64),
    Text(String),
}

impl Default for PageNumber {
    fn default() -> Self {
        PageNumber::Int(0)
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageNumber::Int(n) => write!(f, "{n}"),
            PageNumber::Text(s) => f.write_str(s),
        }
    }
}

/// A single reported compliance issue.
///
/// Created by the response parser from untrusted LLM text; merged or
/// dropped by the deduplicator; mutated only to restore translation fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub problematic_text: String,
    pub violation_type: String,
    pub explanation: String,
    pub guideline_section: String,
    pub page_number: PageNumber,
    pub severity: Severity,
    pub suggested_rewrite: String,

    // Multilingual support
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub rewrite_translation: Option<String>,
    #[serde(default = "default_chunk_language")]
    pub chunk_language: String,

    /// Which parallel auditor run produced this record. Debug traceability
    /// only - excluded from every external serialization.
    #[serde(skip)]
    pub source_audit_id: Option<usize>,
}

fn default_chunk_language() -> String {
    "English".to_string()
}

impl Violation {
    /// A violation with required fields set and defaults elsewhere.
    pub fn new(problematic_text: impl Into<String>, violation_type: impl Into<String>) -> Self {
        Self {
            problematic_text: problematic_text.into(),
            violation_type: violation_type.into(),
            explanation: String::new(),
            guideline_section: String::new(),
            page_number: PageNumber::default(),
            severity: Severity::default(),
            suggested_rewrite: String::new(),
            translation: None,
            rewrite_translation: None,
            chunk_language: default_chunk_language(),
            source_audit_id: None,
        }
    }

    /// Set the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the guideline page number.
    pub fn with_page(mut self, page: PageNumber) -> Self {
        self.page_number = page;
        self
    }

    /// Set the original-language translation of the problematic text.
    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_defaults_to_medium_on_unknown() {
        assert_eq!(Severity::from_str_lenient("urgent"), Severity::Medium);
        assert_eq!(Severity::from_str_lenient(""), Severity::Medium);
    }

    #[test]
    fn severity_tolerates_case_and_whitespace() {
        assert_eq!(Severity::from_str_lenient("CRITICAL "), Severity::Critical);
        assert_eq!(Severity::from_str_lenient(" High"), Severity::High);
    }

    #[test]
    fn page_number_accepts_both_forms() {
        let int: PageNumber = serde_json::from_str("14").unwrap();
        let text: PageNumber = serde_json::from_str("\"14-15\"").unwrap();
        assert_eq!(int, PageNumber::Int(14));
        assert_eq!(text, PageNumber::Text("14-15".into()));
    }

    #[test]
    fn source_audit_id_never_serializes() {
        let mut v = Violation::new("text", "Exaggerated Claim");
        v.source_audit_id = Some(3);
        let json = serde_json::to_string(&v).unwrap();
        assert!(!json.contains("source_audit_id"));
    }
}
