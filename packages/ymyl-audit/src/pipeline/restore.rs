//! Translation restoration - the safety net after deduplication.
//!
//! The filter agent is free to rewrite `problematic_text` while merging,
//! and it sometimes drops the optional translation fields. This pass
//! re-associates filtered records with their originals - first by a
//! normalized text key, then by a `(page, type)` fallback for records the
//! merge paraphrased - and restores what was lost.

use std::collections::HashMap;
use tracing::debug;

use crate::text::normalized_match_key;
use crate::types::violation::Violation;

/// Translation fields captured from an original record.
#[derive(Debug, Clone)]
struct TranslationFields {
    translation: Option<String>,
    rewrite_translation: Option<String>,
}

fn secondary_key(violation: &Violation) -> (String, String) {
    (
        violation.page_number.to_string(),
        violation.violation_type.trim().to_lowercase(),
    )
}

/// Restore translation fields dropped by the filter agent. Mutates and
/// returns `filtered`; records that already carry translations are left
/// alone.
pub fn restore_translations(
    mut filtered: Vec<Violation>,
    originals: &[Violation],
) -> Vec<Violation> {
    let mut by_text: HashMap<String, TranslationFields> = HashMap::new();
    let mut by_page_and_type: HashMap<(String, String), TranslationFields> = HashMap::new();

    for original in originals {
        if original.translation.is_none() && original.rewrite_translation.is_none() {
            continue;
        }
        let fields = TranslationFields {
            translation: original.translation.clone(),
            rewrite_translation: original.rewrite_translation.clone(),
        };
        by_text
            .entry(normalized_match_key(&original.problematic_text))
            .or_insert_with(|| fields.clone());
        by_page_and_type
            .entry(secondary_key(original))
            .or_insert(fields);
    }

    if by_text.is_empty() {
        return filtered;
    }

    let mut restored = 0usize;
    for record in &mut filtered {
        if record.translation.is_some() && record.rewrite_translation.is_some() {
            continue;
        }

        let fields = by_text
            .get(&normalized_match_key(&record.problematic_text))
            .or_else(|| by_page_and_type.get(&secondary_key(record)));

        if let Some(fields) = fields {
            if record.translation.is_none() {
                record.translation = fields.translation.clone();
            }
            if record.rewrite_translation.is_none() {
                record.rewrite_translation = fields.rewrite_translation.clone();
            }
            restored += 1;
        }
    }

    if restored > 0 {
        debug!(restored, "Restored translation fields after deduplication");
    }
    filtered
}
