//! Global context backpack - page-global facts hoisted into chunk 0.
//!
//! Licensing statements, age/safety warnings and restriction notices apply
//! to the whole document, not the section they happen to appear in. The
//! backpack collects them into the reserved index-0 chunk so every
//! downstream consumer keeps document-wide awareness.

use regex::Regex;
use scraper::Html;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::text::clean_text;
use crate::types::chunk::BigChunk;

/// Name of the reserved context chunk.
pub const BACKPACK_NAME: &str = "GLOBAL CONTEXT";

/// Keywords whose surrounding sentence indicates licensing/regulation.
const LICENSE_KEYWORDS: &[&str] = &[
    "UKGC", "MGA", "Curacao", "License", "Licencja", "Regulated", "Commission",
];

/// Keywords whose surrounding sentence indicates a player restriction.
const RESTRICTION_KEYWORDS: &[&str] = &["Restricted", "Prohibited"];

/// Per-keyword cap on harvested sentences, to keep the backpack bounded on
/// pages that repeat their licensing boilerplate.
const MAX_SENTENCES_PER_KEYWORD: usize = 2;

fn license_regexes() -> &'static Vec<Regex> {
    static REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();
    REGEXES.get_or_init(|| keyword_sentence_regexes(LICENSE_KEYWORDS))
}

fn restriction_regexes() -> &'static Vec<Regex> {
    static REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();
    REGEXES.get_or_init(|| keyword_sentence_regexes(RESTRICTION_KEYWORDS))
}

fn keyword_sentence_regexes(keywords: &[&str]) -> Vec<Regex> {
    keywords
        .iter()
        .map(|kw| {
            Regex::new(&format!(r"(?i)([^.]*{}[^.]*\.)", regex::escape(kw)))
                .expect("keyword sentence pattern is valid")
        })
        .collect()
}

/// Scan the whole document text for always-applicable context. Returns the
/// index-0 chunk, or `None` when nothing qualifies.
pub fn scan_global_context(document: &Html) -> Option<BigChunk> {
    let full_text = clean_text(&document.root_element().text().collect::<String>());
    if full_text.is_empty() {
        return None;
    }

    let mut items: Vec<String> = Vec::new();

    for regex in license_regexes() {
        for capture in regex.captures_iter(&full_text).take(MAX_SENTENCES_PER_KEYWORD) {
            items.push(format!("LICENSE_CTX: {}", clean_text(&capture[1])));
        }
    }

    for regex in restriction_regexes() {
        for capture in regex.captures_iter(&full_text).take(MAX_SENTENCES_PER_KEYWORD) {
            items.push(format!("RESTRICTION_CTX: {}", clean_text(&capture[1])));
        }
    }

    if full_text.contains('⚠') || full_text.contains("18+") {
        items.push("SAFETY_CTX: Risk warnings found in document.".to_string());
    }

    // Dedupe while keeping first-seen order.
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));

    if items.is_empty() {
        return None;
    }

    Some(
        BigChunk::new(0)
            .with_name(BACKPACK_NAME)
            .with_lines(items),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn license_sentences_are_harvested() {
        let html = Html::parse_document(
            "<p>Great slots here. The site is regulated by the UKGC. Have fun.</p>",
        );
        let chunk = scan_global_context(&html).unwrap();
        assert_eq!(chunk.big_chunk_index, 0);
        assert!(chunk
            .small_chunks
            .iter()
            .any(|l| l.starts_with("LICENSE_CTX:") && l.contains("UKGC")));
    }

    #[test]
    fn age_marker_yields_safety_context() {
        let html = Html::parse_document("<p>Players must be 18+ to join.</p>");
        let chunk = scan_global_context(&html).unwrap();
        assert!(chunk.small_chunks.iter().any(|l| l.starts_with("SAFETY_CTX:")));
    }

    #[test]
    fn plain_page_has_no_backpack() {
        let html = Html::parse_document("<p>Just an article about cooking.</p>");
        assert!(scan_global_context(&html).is_none());
    }

    #[test]
    fn duplicate_sentences_collapse() {
        let html = Html::parse_document(
            "<p>Licensed by the MGA.</p><div>Licensed by the MGA.</div>",
        );
        let chunk = scan_global_context(&html).unwrap();
        let license_lines = chunk
            .small_chunks
            .iter()
            .filter(|l| l.contains("MGA"))
            .count();
        assert_eq!(license_lines, 1);
    }
}
