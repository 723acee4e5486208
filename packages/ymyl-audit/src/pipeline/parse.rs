//! Response parsing - untrusted LLM reply text into violation records.
//!
//! Replies may wrap their JSON in markdown fences, prepend prose, use any
//! of three historical shapes, or arrive mildly corrupted. The parser
//! locates the JSON span, heals it once if strict parsing fails, then maps
//! records with defensive defaults so one malformed field never aborts a
//! batch. Unrecoverable failure yields an empty list, never a panic.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::warn;

use crate::text::strip_control_chars;
use crate::types::violation::{PageNumber, Severity, Violation};

/// Parse raw auditor reply text into violation records.
pub fn parse_to_violations(raw_text: &str) -> Vec<Violation> {
    try_parse_violations(raw_text).unwrap_or_default()
}

/// Like [`parse_to_violations`], but distinguishes structural failure
/// (`None`: no JSON found, or unparseable after healing) from a valid
/// reply containing zero findings (`Some(vec![])`). The deduplication
/// fallback needs that distinction.
pub fn try_parse_violations(raw_text: &str) -> Option<Vec<Violation>> {
    let Some(span) = extract_json_span(raw_text) else {
        warn!("Parser: could not find JSON structure in response");
        return None;
    };

    let value = match serde_json::from_str::<Value>(&span) {
        Ok(value) => value,
        Err(_) => {
            warn!("Parser: JSON error, attempting heuristic fix");
            let healed = strip_control_chars(&span);
            match serde_json::from_str::<Value>(&healed) {
                Ok(value) => value,
                Err(e) => {
                    warn!(error = %e, "Parser: fatal JSON error after healing");
                    return None;
                }
            }
        }
    };

    Some(map_value_to_violations(value))
}

/// Locate the JSON payload inside reply text: a fenced code block first,
/// then the span from the first opening brace/bracket to the last closing
/// one of the same kind.
fn extract_json_span(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*([\[{].*[\]}])\s*```").expect("fence pattern is valid")
    });
    if let Some(capture) = fence.captures(text) {
        return Some(capture[1].to_string());
    }

    let start = text.find(['[', '{'])?;
    let closing = if text.as_bytes()[start] == b'[' { ']' } else { '}' };
    let end = text.rfind(closing)?;
    if end <= start {
        return None;
    }
    Some(text[start..=end].to_string())
}

/// Normalize the three historical reply shapes into a flat record list:
/// a single object with a `violations` array, an array of per-section
/// objects each nesting `violations`, or a bare array of violation
/// objects. A per-section `violations` that is a string ("no violation
/// found") counts as zero findings, not an error.
fn map_value_to_violations(value: Value) -> Vec<Violation> {
    match value {
        Value::Object(object) => match object.get("violations") {
            Some(Value::Array(items)) => items.iter().filter_map(map_violation).collect(),
            _ => Vec::new(),
        },
        Value::Array(items) => {
            let mut violations = Vec::new();
            for item in items {
                let Value::Object(object) = item else {
                    warn!("Parser: skipping non-object entry");
                    continue;
                };
                match object.get("violations") {
                    Some(Value::Array(nested)) => {
                        violations.extend(nested.iter().filter_map(map_violation));
                    }
                    Some(_) => {} // "no violation found" or null for this section
                    None => {
                        if let Some(violation) = map_violation(&Value::Object(object)) {
                            violations.push(violation);
                        }
                    }
                }
            }
            violations
        }
        _ => {
            warn!("Parser: expected JSON object or array, got something else");
            Vec::new()
        }
    }
}

/// Map one raw dict to a [`Violation`] with defaults for every missing or
/// mistyped field. Returns `None` (with a log) only for non-objects.
fn map_violation(value: &Value) -> Option<Violation> {
    let Value::Object(dict) = value else {
        warn!("Parser: failed to map individual violation: not an object");
        return None;
    };

    Some(Violation {
        problematic_text: string_field(dict, "problematic_text", "N/A"),
        violation_type: string_field(dict, "violation_type", "Unknown"),
        explanation: string_field(dict, "explanation", "No explanation"),
        guideline_section: stringified_field(dict, "guideline_section", "N/A"),
        page_number: page_number_field(dict),
        severity: Severity::from_str_lenient(&string_field(dict, "severity", "medium")),
        suggested_rewrite: string_field(dict, "suggested_rewrite", "N/A"),
        translation: optional_string(dict, "translation"),
        rewrite_translation: optional_string(dict, "rewrite_translation"),
        chunk_language: string_field(dict, "chunk_language", "English"),
        source_audit_id: None,
    })
}

fn string_field(dict: &Map<String, Value>, key: &str, default: &str) -> String {
    match dict.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => default.to_string(),
    }
}

/// Like [`string_field`] but also accepts numbers, stringifying them -
/// guideline sections arrive as both `"3.2"` and `3.2`.
fn stringified_field(dict: &Map<String, Value>, key: &str, default: &str) -> String {
    match dict.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

fn optional_string(dict: &Map<String, Value>, key: &str) -> Option<String> {
    match dict.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn page_number_field(dict: &Map<String, Value>) -> PageNumber {
    match dict.get("page_number") {
        Some(Value::Number(n)) => PageNumber::Int(n.as_i64().unwrap_or(0)),
        Some(Value::String(s)) if !s.is_empty() => PageNumber::Text(s.clone()),
        _ => PageNumber::Int(0),
    }
}
