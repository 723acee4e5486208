//! Document-export extraction - the "scavenger hunt" for exported editing
//! documents (Google Docs HTML and similar).
//!
//! Exported markup is loose and inconsistently styled: metadata is labeled
//! in plain text ("H1:", "MT:", "Lead text:") rather than by CSS class,
//! headings are often just bold paragraphs, and layout varies by author and
//! language. This extractor hunts for label prefixes anywhere in the text,
//! promotes visual headers, flattens tables, detects FAQs flexibly and
//! chunks what remains linearly.

use indexmap::IndexMap;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::OnceLock;
use tracing::debug;

use super::backpack::scan_global_context;
use super::dom::{element_text, exclude_noise_tags, walk_elements, walk_under, WalkState};
use super::faq::faq_from_heading;
use super::generic::{flatten_table, is_warning_block};
use super::ContentExtractor;
use crate::error::ExtractResult;
use crate::types::chunk::{tag, BigChunk, ChunkDocument, ITEM_SEPARATOR};

const METADATA_NAME: &str = "Metadata & Summary";
const FAQ_NAME: &str = "Frequently Asked Questions";

/// A bold paragraph longer than this is body text, not a visual header.
const VISUAL_HEADER_MAX_LEN: usize = 100;

/// One metadata label and the text keys that introduce it.
struct MetadataKey {
    label: &'static str,
    /// Pattern plus whether its key is short enough to demand an explicit
    /// colon ("MT" would otherwise match mid-sentence).
    patterns: Vec<(Regex, bool)>,
}

/// Label keys hunted in document text, in priority order per element.
/// Longer keys precede their prefixes ("lead text" before "lead") so the
/// most specific label wins.
fn metadata_keys() -> &'static Vec<MetadataKey> {
    static KEYS: OnceLock<Vec<MetadataKey>> = OnceLock::new();
    KEYS.get_or_init(|| {
        let table: IndexMap<&str, Vec<&str>> = IndexMap::from([
            ("H1", vec!["h1", "title"]),
            ("SUBTITLE", vec!["subtitle", "sub title", "sub-title"]),
            ("LEAD", vec!["lead text", "lead", "intro"]),
            ("META TITLE", vec!["meta title", "meta_title", "mt"]),
            ("META DESC", vec!["meta description", "meta_desc", "md"]),
        ]);
        table
            .into_iter()
            .map(|(label, keys)| MetadataKey {
                label,
                patterns: keys
                    .iter()
                    .map(|key| {
                        let pattern =
                            Regex::new(&format!(r"(?is)^{}[:\s]+(.*)", regex::escape(key)))
                                .expect("metadata key pattern is valid");
                        (pattern, key.len() < 3)
                    })
                    .collect(),
            })
            .collect()
    })
}

/// Extractor for exported editing documents.
#[derive(Debug, Default)]
pub struct DocumentExportExtractor;

impl ContentExtractor for DocumentExportExtractor {
    fn extract(&self, html: &str) -> ExtractResult<ChunkDocument> {
        // Cloudflare email obfuscation breaks text scanning; neutralize it.
        let html = html.replace("[email&#160;protected]", "EMAIL_HIDDEN");

        let document = Html::parse_document(&html);
        let mut state = WalkState::new();
        exclude_noise_tags(&document, &mut state);
        if let Some(head) = walk_elements(&document).find(|el| el.value().name() == "head") {
            state.exclude_subtree(head);
        }

        let mut chunks: Vec<BigChunk> = Vec::new();
        let mut next_index: i64 = 1;

        let metadata_lines = hunt_metadata(&document, &mut state);
        if !metadata_lines.is_empty() {
            chunks.push(
                BigChunk::new(next_index)
                    .with_name(METADATA_NAME)
                    .with_lines(metadata_lines),
            );
            next_index += 1;
        }

        let faq_lines = faq_from_heading(&document, &mut state);

        let content = chunk_linear_content(&document, &mut state, next_index);
        next_index += content.len() as i64;
        chunks.extend(content);

        if !faq_lines.is_empty() {
            chunks.push(
                BigChunk::new(next_index)
                    .with_name(FAQ_NAME)
                    .with_lines(faq_lines),
            );
        }

        let mut result = ChunkDocument { big_chunks: chunks };
        if result.big_chunks.is_empty() {
            result.big_chunks.push(
                BigChunk::new(1)
                    .with_name("Empty")
                    .with_lines(["No content found"]),
            );
        }
        if let Some(backpack) = scan_global_context(&document) {
            result.big_chunks.insert(0, backpack);
        }

        debug!(chunks = result.big_chunks.len(), "Document export extraction complete");
        Ok(result)
    }
}

/// Scan paragraphs, list items and table cells for metadata labels like
/// "Lead text:" or "MT:". The first hit per label wins; matched elements
/// are consumed. Falls back to the first `<h1>` tag when no H1 label is
/// present.
fn hunt_metadata(document: &Html, state: &mut WalkState) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut found: Vec<&'static str> = Vec::new();

    let hunted: Vec<ElementRef<'_>> = walk_elements(document)
        .filter(|el| matches!(el.value().name(), "p" | "li" | "td" | "h1" | "h2" | "h3"))
        .collect();

    for element in hunted {
        if state.is_consumed(element) {
            continue;
        }
        let text = element_text(element);
        if text.is_empty() {
            continue;
        }

        let matched = metadata_keys().iter().find_map(|key| {
            if found.contains(&key.label) {
                return None;
            }
            key.patterns.iter().find_map(|(pattern, is_short)| {
                let capture = pattern.captures(&text)?;
                if *is_short && !text.chars().take(5).any(|c| c == ':') {
                    return None;
                }
                let value = capture[1].trim().to_string();
                (!value.is_empty()).then_some((key.label, value))
            })
        });

        if let Some((label, value)) = matched {
            found.push(label);
            lines.push(format!("{label}: {value}"));
            state.mark_subtree_visited(element);
        }
    }

    if !found.contains(&"H1") {
        let fallback = walk_elements(document)
            .find(|el| el.value().name() == "h1" && !state.is_consumed(*el));
        if let Some(h1) = fallback {
            let text = element_text(h1);
            if !text.is_empty() {
                lines.insert(0, format!("{} {text}", tag::H1));
                state.mark_subtree_visited(h1);
            }
        }
    }

    lines
}

/// A short bold paragraph without terminal punctuation is a visual header.
fn is_visual_header(element: ElementRef<'_>, text: &str) -> bool {
    if text.is_empty()
        || text.len() > VISUAL_HEADER_MAX_LEN
        || text.ends_with(['.', '!', '?'])
    {
        return false;
    }
    if walk_under(element).any(|el| matches!(el.value().name(), "b" | "strong")) {
        return true;
    }
    let markup = element.html().to_lowercase();
    markup.contains("font-weight") && (markup.contains("700") || markup.contains("bold"))
}

/// Linear chunking: group surviving elements under H2/H3 (or visual
/// header) boundaries.
fn chunk_linear_content(
    document: &Html,
    state: &mut WalkState,
    start_index: i64,
) -> Vec<BigChunk> {
    let mut chunks: Vec<BigChunk> = Vec::new();
    let mut index = start_index;
    let mut current_title = "Main Content".to_string();
    let mut current: Vec<String> = Vec::new();

    let mut flush =
        |chunks: &mut Vec<BigChunk>, index: &mut i64, title: &str, lines: &mut Vec<String>| {
            if lines.is_empty() {
                return;
            }
            chunks.push(
                BigChunk::new(*index)
                    .with_name(title)
                    .with_lines(std::mem::take(lines)),
            );
            *index += 1;
        };

    let root = walk_elements(document)
        .find(|el| el.value().name() == "body")
        .unwrap_or_else(|| document.root_element());

    for element in walk_under(root) {
        if state.is_consumed(element) {
            continue;
        }
        let name = element.value().name();
        if !matches!(name, "p" | "h2" | "h3" | "ul" | "ol" | "table") {
            continue;
        }
        state.mark_visited(element);
        let text = element_text(element);
        if text.is_empty() && name != "table" {
            continue;
        }

        let is_header = matches!(name, "h2" | "h3") || (name == "p" && is_visual_header(element, &text));
        if is_header {
            flush(&mut chunks, &mut index, &current_title, &mut current);
            current_title = text.clone();
            current.push(format!("HEADER: {text}"));
            continue;
        }

        match name {
            "ul" | "ol" => {
                let items: Vec<String> = walk_under(element)
                    .filter(|el| el.value().name() == "li")
                    .map(element_text)
                    .filter(|t| !t.is_empty())
                    .collect();
                if !items.is_empty() {
                    state.mark_subtree_visited(element);
                    current.push(format!("{} {}", tag::LIST, items.join(ITEM_SEPARATOR)));
                }
            }
            "table" => {
                let rows = flatten_table(element);
                if !rows.is_empty() {
                    state.mark_subtree_visited(element);
                    current.push(format!("TABLE_DATA: {}", rows.join(ITEM_SEPARATOR)));
                }
            }
            _ => {
                let prefix = if is_warning_block(element, &text) {
                    tag::WARNING
                } else {
                    tag::CONTENT
                };
                current.push(format!("{prefix} {text}"));
            }
        }
    }

    flush(&mut chunks, &mut index, &current_title, &mut current);
    chunks
}
