//! Markdown report rendering.
//!
//! A pure function of the final violation list; document conversion and
//! persistence belong to the calling application.

use chrono::Local;

use crate::types::violation::{Severity, Violation};

/// Render the final violation list as a markdown report.
pub fn render_markdown(violations: &[Violation], audits_performed: usize) -> String {
    let date = Local::now().format("%Y-%m-%d");
    let mut md = vec![format!(
        "# YMYL Compliance Report\n**Date:** {date}\n**Audits Performed:** {audits_performed}\n---"
    )];

    if violations.is_empty() {
        md.push("\n✅ **No violations found.**".to_string());
        return md.join("\n");
    }

    let mut count = 1;
    for violation in violations {
        // Belt and braces: a "no violation" row that slipped through
        // sanitation must not reach the reader.
        if violation.violation_type.to_lowercase().contains("no violation") {
            continue;
        }

        let emoji = match violation.severity {
            Severity::Critical => "🔴",
            Severity::High | Severity::Medium => "🟠",
            Severity::Low => "🔵",
        };

        md.push(format!("### {count}. {emoji} {}", violation.violation_type));
        md.push(format!("**Severity:** {}", capitalize(violation.severity.as_str())));
        md.push(format!(
            "**Problematic Text:** \"{}\"",
            violation.problematic_text
        ));
        if let Some(translation) = &violation.translation {
            md.push(format!("> 🌐 **Translation:** _{translation}_"));
        }
        md.push(format!("**Explanation:** {}", violation.explanation));
        md.push(format!(
            "**Guideline:** Section {} (Page {})",
            violation.guideline_section, violation.page_number
        ));
        md.push(format!(
            "**Suggested Fix:** \"{}\"",
            violation.suggested_rewrite
        ));
        if let Some(rewrite_translation) = &violation.rewrite_translation {
            md.push(format!("> 🛠️ **Fix Translation:** _{rewrite_translation}_"));
        }
        md.push("\n---\n".to_string());
        count += 1;
    }

    md.join("\n")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
