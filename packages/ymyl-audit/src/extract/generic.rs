//! Generic extraction - heading-based sectioning for arbitrary pages.
//!
//! Walks block elements in document order, grouping lines into a new big
//! chunk at every H2. Content before the first H2 forms an implicit
//! "Introduction" section. Lists and tables are flattened to single tagged
//! lines; warning-marked elements are tagged `WARNING:` regardless of tag.

use scraper::{ElementRef, Html};
use tracing::debug;

use super::dom::{
    element_text, exclude_noise_tags, has_class_containing, heading_level, walk_elements,
    walk_under, WalkState,
};
use super::ContentExtractor;
use crate::error::ExtractResult;
use crate::types::chunk::{tag, BigChunk, ChunkDocument, CELL_SEPARATOR, ITEM_SEPARATOR};

/// Text markers that classify an element as a warning block.
const WARNING_MARKERS: &[&str] = &["⚠", "WARNING", "UWAGA"];

/// Name of the implicit section preceding the first H2.
const INTRO_SECTION: &str = "Introduction";

/// Heading-based extractor for pages without a known template.
#[derive(Debug, Default)]
pub struct GenericExtractor;

impl ContentExtractor for GenericExtractor {
    fn extract(&self, html: &str) -> ExtractResult<ChunkDocument> {
        let document = Html::parse_document(html);
        let mut state = WalkState::new();
        exclude_noise_tags(&document, &mut state);

        let chunks = walk_sections(&document, &mut state, 1);
        debug!(chunks = chunks.len(), "Generic extraction complete");

        Ok(ChunkDocument { big_chunks: chunks }.or_placeholder())
    }
}

/// A formatted line and whether it opens a new section.
struct FormattedLine {
    line: String,
    is_section_break: bool,
    section_name: Option<String>,
}

/// Walk remaining block elements in document order and group them into
/// H2-delimited sections. Shared by the generic and surgical extractors;
/// `start_index` lets the surgical variant continue numbering after its
/// metadata chunk.
pub(crate) fn walk_sections(
    document: &Html,
    state: &mut WalkState,
    start_index: i64,
) -> Vec<BigChunk> {
    let mut chunks: Vec<BigChunk> = Vec::new();
    let mut index = start_index;
    let mut pre_section: Vec<String> = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    let mut flush = |chunks: &mut Vec<BigChunk>,
                     index: &mut i64,
                     name: String,
                     lines: Vec<String>| {
        if lines.is_empty() {
            return;
        }
        chunks.push(BigChunk::new(*index).with_name(name).with_lines(lines));
        *index += 1;
    };

    let root = main_content_root(document);
    for element in walk_under(root) {
        if state.is_consumed(element) {
            continue;
        }
        let Some(formatted) = format_element(element, state) else {
            continue;
        };

        if formatted.is_section_break {
            match current.take() {
                Some((name, lines)) => flush(&mut chunks, &mut index, name, lines),
                None => flush(
                    &mut chunks,
                    &mut index,
                    INTRO_SECTION.to_string(),
                    std::mem::take(&mut pre_section),
                ),
            }
            current = Some((
                formatted.section_name.unwrap_or_default(),
                vec![formatted.line],
            ));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(formatted.line);
        } else {
            pre_section.push(formatted.line);
        }
    }

    match current {
        Some((name, lines)) => flush(&mut chunks, &mut index, name, lines),
        None => flush(
            &mut chunks,
            &mut index,
            INTRO_SECTION.to_string(),
            pre_section,
        ),
    }

    chunks
}

/// The subtree most likely to hold editorial content: `article`, then
/// `main`, then `body`, falling back to the document root.
fn main_content_root(document: &Html) -> ElementRef<'_> {
    for candidate in ["article", "main", "body"] {
        if let Some(found) = walk_elements(document).find(|el| el.value().name() == candidate) {
            return found;
        }
    }
    document.root_element()
}

/// Convert one element into a tagged line, marking it (and, for flattened
/// containers, its descendants) as consumed.
fn format_element(element: ElementRef<'_>, state: &mut WalkState) -> Option<FormattedLine> {
    let name = element.value().name();
    if !matches!(
        name,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" | "ul" | "ol" | "table"
    ) {
        return None;
    }

    state.mark_visited(element);
    let text = element_text(element);
    if text.is_empty() && name != "table" {
        return None;
    }

    // Warning classification wins over tag type.
    if is_warning_block(element, &text) {
        return Some(plain(format!("{} {text}", tag::WARNING)));
    }

    if let Some(level) = heading_level(element) {
        // h5/h6 carry no tag in the chunk vocabulary; keep their text as
        // ordinary content.
        if level > 4 {
            return Some(plain(format!("{} {text}", tag::CONTENT)));
        }
        let prefix = match level {
            1 => tag::H1,
            2 => tag::H2,
            3 => tag::H3,
            _ => tag::H4,
        };
        // Guard against sources whose heading text already carries the
        // prefix ("H2: Title" would otherwise become "H2: H2: Title").
        let line = if text.to_uppercase().starts_with(prefix) {
            text.clone()
        } else {
            format!("{prefix} {text}")
        };
        return Some(FormattedLine {
            line,
            is_section_break: level == 2,
            section_name: (level == 2).then(|| text),
        });
    }

    match name {
        "p" => Some(plain(format!("{} {text}", tag::CONTENT))),
        "ul" | "ol" => {
            let items: Vec<String> = walk_under(element)
                .filter(|li| li.value().name() == "li")
                .map(element_text)
                .filter(|t| !t.is_empty())
                .collect();
            if items.is_empty() {
                return None;
            }
            state.mark_subtree_visited(element);
            Some(plain(format!("{} {}", tag::LIST, items.join(ITEM_SEPARATOR))))
        }
        "table" => {
            let rows = flatten_table(element);
            if rows.is_empty() {
                return None;
            }
            state.mark_subtree_visited(element);
            Some(plain(format!("{} {}", tag::TABLE, rows.join(ITEM_SEPARATOR))))
        }
        _ => None,
    }
}

fn plain(line: String) -> FormattedLine {
    FormattedLine {
        line,
        is_section_break: false,
        section_name: None,
    }
}

/// Rows of a table as `cell | cell` strings, empty rows dropped.
pub(crate) fn flatten_table(table: ElementRef<'_>) -> Vec<String> {
    walk_under(table)
        .filter(|el| el.value().name() == "tr")
        .filter_map(|tr| {
            let cells: Vec<String> = walk_under(tr)
                .filter(|el| matches!(el.value().name(), "td" | "th"))
                .map(element_text)
                .collect();
            if cells.iter().any(|c| !c.is_empty()) {
                Some(cells.join(CELL_SEPARATOR))
            } else {
                None
            }
        })
        .collect()
}

/// Warning marker: a warning class, the warning emoji, or a literal
/// WARNING/UWAGA in the text.
pub(crate) fn is_warning_block(element: ElementRef<'_>, text: &str) -> bool {
    has_class_containing(element, "warning") || WARNING_MARKERS.iter().any(|m| text.contains(m))
}
