//! Surgical extraction - selector-driven walking of the known casino page
//! template.
//!
//! Stage order is load-bearing:
//! 1. metadata (H1/subtitle/lead/summary) is anchored and consumed first;
//! 2. FAQ regions are harvested and consumed;
//! 3. widget noise is excluded - after metadata/FAQ so noise exclusion can
//!    never swallow an already-located anchor, before the main walk so the
//!    walk never sees it;
//! 4. the shared H2-section walk covers whatever remains;
//! 5. the global context backpack becomes chunk 0.

use scraper::{ElementRef, Html};
use std::collections::HashSet;
use tracing::debug;

use super::backpack::scan_global_context;
use super::dom::{
    element_text, exclude_noise_tags, first_after, has_class_containing, heading_level,
    walk_elements, walk_under, WalkState,
};
use super::faq::{self, pair_items, FaqItem};
use super::generic::walk_sections;
use super::ContentExtractor;
use crate::error::ExtractResult;
use crate::types::chunk::{tag, BigChunk, ChunkDocument};

/// Class fragment marking the intro container that anchors the H1 search.
const INTRO_FRAGMENT: &str = "intro";

/// Class fragments for the metadata elements adjacent to the H1.
const SUBTITLE_FRAGMENT: &str = "sub-title";
const LEAD_FRAGMENT: &str = "lead";

/// Class fragment marking the page summary block.
const SUMMARY_FRAGMENT: &str = "summary";

/// Class fragments of known non-editorial widget regions.
const WIDGET_NOISE_FRAGMENTS: &[&str] =
    &["rating", "related", "details-table", "author-bio", "sticky"];

const METADATA_NAME: &str = "Metadata & Summary";
const FAQ_NAME: &str = "Frequently Asked Questions";

/// Template-driven extractor for the known casino page layout.
#[derive(Debug, Default)]
pub struct SurgicalExtractor;

impl ContentExtractor for SurgicalExtractor {
    fn extract(&self, html: &str) -> ExtractResult<ChunkDocument> {
        let document = Html::parse_document(html);
        let mut state = WalkState::new();
        exclude_noise_tags(&document, &mut state);

        let metadata_lines = extract_metadata(&document, &mut state);
        let faq_lines = extract_faq(&document, &mut state);
        exclude_widget_noise(&document, &mut state);

        let mut chunks: Vec<BigChunk> = Vec::new();
        let mut next_index: i64 = 1;

        if !metadata_lines.is_empty() {
            chunks.push(
                BigChunk::new(next_index)
                    .with_name(METADATA_NAME)
                    .with_lines(metadata_lines),
            );
            next_index += 1;
        }

        let content = walk_sections(&document, &mut state, next_index);
        next_index += content.len() as i64;
        chunks.extend(content);

        if !faq_lines.is_empty() {
            chunks.push(
                BigChunk::new(next_index)
                    .with_name(FAQ_NAME)
                    .with_lines(faq_lines),
            );
        }

        let mut result = ChunkDocument { big_chunks: chunks }.or_placeholder();
        if let Some(backpack) = scan_global_context(&document) {
            result.big_chunks.insert(0, backpack);
        }

        debug!(chunks = result.big_chunks.len(), "Surgical extraction complete");
        Ok(result)
    }
}

/// Locate H1, subtitle, lead and summary; emit their tagged lines and
/// consume the source elements.
///
/// H1 is searched inside the intro container first, then globally.
/// Subtitle and lead are the next matching elements *after* the H1 in
/// document order - an unordered global scan could pick up an unrelated
/// subtitle elsewhere on the page.
fn extract_metadata(document: &Html, state: &mut WalkState) -> Vec<String> {
    let mut lines = Vec::new();

    let intro = walk_elements(document)
        .find(|el| !state.is_excluded(*el) && has_class_containing(*el, INTRO_FRAGMENT));
    let h1 = intro
        .and_then(|container| walk_under(container).find(|el| el.value().name() == "h1"))
        .or_else(|| {
            walk_elements(document)
                .find(|el| el.value().name() == "h1" && !state.is_excluded(*el))
        });

    if let Some(h1) = h1 {
        let h1_text = element_text(h1);
        if !h1_text.is_empty() {
            lines.push(format!("{} {h1_text}", tag::H1));
            state.mark_subtree_visited(h1);

            let mut anchor = h1;
            if let Some(subtitle) = first_after(document, anchor, |el| {
                has_class_containing(el, SUBTITLE_FRAGMENT) && !state.is_excluded(el)
            }) {
                let text = element_text(subtitle);
                if !text.is_empty() {
                    lines.push(format!("{} {text}", tag::SUBTITLE));
                    state.mark_subtree_visited(subtitle);
                    anchor = subtitle;
                }
            }

            if let Some(lead) = first_after(document, anchor, |el| {
                has_class_containing(el, LEAD_FRAGMENT) && !state.is_excluded(el)
            }) {
                let text = element_text(lead);
                if !text.is_empty() {
                    lines.push(format!("{} {text}", tag::LEAD));
                    state.mark_subtree_visited(lead);
                }
            }
        }
    }

    if let Some(summary) = walk_elements(document).find(|el| {
        has_class_containing(*el, SUMMARY_FRAGMENT) && !state.is_consumed(*el)
    }) {
        let text = summary_text(summary);
        if !text.is_empty() {
            lines.push(format!("{} {text}", tag::SUMMARY));
        }
        state.mark_subtree_visited(summary);
    }

    lines
}

/// Text of the summary block with its own heading discarded, so the block
/// title is not emitted twice.
fn summary_text(summary: ElementRef<'_>) -> String {
    let heading_roots: HashSet<_> = walk_under(summary)
        .filter(|el| heading_level(*el).is_some())
        .map(|el| el.id())
        .collect();

    let mut parts: Vec<String> = Vec::new();
    for node in summary.descendants() {
        if let Some(text) = node.value().as_text() {
            let inside_heading = node
                .ancestors()
                .any(|ancestor| heading_roots.contains(&ancestor.id()));
            if !inside_heading {
                parts.push(text.to_string());
            }
        }
    }
    crate::text::clean_text(&parts.join(" "))
}

/// FAQ extraction strategies in priority order: explicit Q/A markup,
/// schema.org microdata, then the heading heuristic.
fn extract_faq(document: &Html, state: &mut WalkState) -> Vec<String> {
    let lines = faq_from_markup(document, state);
    if !lines.is_empty() {
        return lines;
    }
    let lines = faq_from_microdata(document, state);
    if !lines.is_empty() {
        return lines;
    }
    faq::faq_from_heading(document, state)
}

/// Strategy (a): elements explicitly classed as FAQ questions/answers.
fn faq_from_markup(document: &Html, state: &mut WalkState) -> Vec<String> {
    let mut items: Vec<FaqItem> = Vec::new();
    let mut consumed: Vec<ElementRef<'_>> = Vec::new();
    let mut consumed_ids: HashSet<_> = HashSet::new();

    for element in walk_elements(document) {
        if state.is_consumed(element)
            || element
                .ancestors()
                .any(|ancestor| consumed_ids.contains(&ancestor.id()))
        {
            continue;
        }
        let text = element_text(element);
        if text.is_empty() {
            continue;
        }
        if has_class_containing(element, "faq-question") {
            items.push(FaqItem::Question(text));
        } else if has_class_containing(element, "faq-answer") {
            items.push(FaqItem::Answer(text));
        } else {
            continue;
        }
        consumed_ids.insert(element.id());
        consumed.push(element);
    }

    let lines = pair_items(items);
    if lines.is_empty() {
        return Vec::new();
    }
    for element in consumed {
        state.mark_subtree_visited(element);
    }
    lines
}

/// Strategy (b): schema.org Question/acceptedAnswer microdata.
fn faq_from_microdata(document: &Html, state: &mut WalkState) -> Vec<String> {
    let mut items: Vec<FaqItem> = Vec::new();
    let mut consumed: Vec<ElementRef<'_>> = Vec::new();

    for element in walk_elements(document) {
        if state.is_consumed(element) {
            continue;
        }
        let is_question = element
            .value()
            .attr("itemtype")
            .is_some_and(|t| t.contains("schema.org/Question"));
        if !is_question {
            continue;
        }

        let question = walk_under(element)
            .find(|el| el.value().attr("itemprop") == Some("name"))
            .map(element_text);
        let answer = walk_under(element)
            .find(|el| el.value().attr("itemprop") == Some("text"))
            .map(element_text);

        if let (Some(q), Some(a)) = (question, answer) {
            if !q.is_empty() && !a.is_empty() {
                items.push(FaqItem::Question(q));
                items.push(FaqItem::Answer(a));
                consumed.push(element);
            }
        }
    }

    let lines = pair_items(items);
    if lines.is_empty() {
        return Vec::new();
    }
    for element in consumed {
        state.mark_subtree_visited(element);
    }
    lines
}

/// Exclude known widget regions by their class-name convention.
fn exclude_widget_noise(document: &Html, state: &mut WalkState) {
    for element in walk_elements(document) {
        if WIDGET_NOISE_FRAGMENTS
            .iter()
            .any(|fragment| has_class_containing(element, fragment))
        {
            state.exclude_subtree(element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> ChunkDocument {
        SurgicalExtractor.extract(html).unwrap()
    }

    #[test]
    fn metadata_lines_appear_in_order_and_only_once() {
        let doc = extract(
            "<body><div class=\"intro\"><h1>A</h1></div>\
             <span class=\"sub-title\">B</span><p class=\"lead\">C</p>\
             <h2>Games</h2><p>Slots galore.</p></body>",
        );

        let metadata = &doc.big_chunks[0];
        assert_eq!(metadata.content_name.as_deref(), Some("Metadata & Summary"));
        assert_eq!(metadata.small_chunks, ["H1: A", "SUBTITLE: B", "LEAD: C"]);

        // None of the anchors may reappear in later chunks.
        for chunk in &doc.big_chunks[1..] {
            for line in &chunk.small_chunks {
                assert!(!line.contains(": A") && !line.ends_with(" B") && !line.ends_with(" C"));
            }
        }
    }

    #[test]
    fn h1_outside_intro_is_found_globally() {
        let doc = extract("<body><h1>Standalone Title</h1><p>Text.</p></body>");
        assert_eq!(doc.big_chunks[0].small_chunks[0], "H1: Standalone Title");
    }

    #[test]
    fn subtitle_before_h1_is_not_captured() {
        let doc = extract(
            "<body><span class=\"sub-title\">stray</span><h1>Title</h1>\
             <span class=\"sub-title\">real</span></body>",
        );
        let metadata = &doc.big_chunks[0];
        assert_eq!(metadata.small_chunks, ["H1: Title", "SUBTITLE: real"]);
    }

    #[test]
    fn summary_block_drops_its_own_heading() {
        let doc = extract(
            "<body><h1>T</h1><div class=\"summary\"><h3>Quick Summary</h3>\
             <p>Fast payouts overall.</p></div></body>",
        );
        let metadata = &doc.big_chunks[0];
        assert!(metadata
            .small_chunks
            .contains(&"SUMMARY: Fast payouts overall.".to_string()));
        assert!(!metadata.small_chunks.iter().any(|l| l.contains("Quick Summary")));
    }

    #[test]
    fn widget_noise_is_not_walked() {
        let doc = extract(
            "<body><h1>T</h1><div class=\"rating-panel\"><p>9.5/10 stars</p></div>\
             <div class=\"author-bio\"><p>Written by X</p></div><p>Editorial text.</p></body>",
        );
        let all_lines: Vec<&String> = doc
            .big_chunks
            .iter()
            .flat_map(|c| c.small_chunks.iter())
            .collect();
        assert!(all_lines.iter().any(|l| l.contains("Editorial text.")));
        assert!(!all_lines.iter().any(|l| l.contains("stars")));
        assert!(!all_lines.iter().any(|l| l.contains("Written by")));
    }

    #[test]
    fn noise_exclusion_cannot_remove_harvested_metadata() {
        // The H1 lives inside a wrapper that also matches a noise fragment;
        // metadata runs first, so the title must survive.
        let doc = extract(
            "<body><div class=\"intro sticky\"><h1>Kept Title</h1></div>\
             <p>Body.</p></body>",
        );
        assert_eq!(doc.big_chunks[0].small_chunks[0], "H1: Kept Title");
    }

    #[test]
    fn faq_markup_strategy_wins_over_heuristic() {
        let doc = extract(
            "<body><h1>T</h1>\
             <div class=\"faq-question\">Is it legal?</div>\
             <div class=\"faq-answer\">Yes.</div></body>",
        );
        let faq = doc
            .big_chunks
            .iter()
            .find(|c| c.content_name.as_deref() == Some("Frequently Asked Questions"))
            .unwrap();
        assert_eq!(faq.small_chunks, ["FAQ_Q: Is it legal? // FAQ_A: Yes."]);
    }

    #[test]
    fn faq_microdata_strategy_pairs_questions() {
        let doc = extract(
            "<body><h1>T</h1>\
             <div itemscope itemtype=\"https://schema.org/Question\">\
             <span itemprop=\"name\">How fast are payouts?</span>\
             <div itemscope itemtype=\"https://schema.org/Answer\">\
             <span itemprop=\"text\">Within 24 hours.</span></div></div></body>",
        );
        let faq = doc
            .big_chunks
            .iter()
            .find(|c| c.content_name.as_deref() == Some("Frequently Asked Questions"))
            .unwrap();
        assert_eq!(
            faq.small_chunks,
            ["FAQ_Q: How fast are payouts? // FAQ_A: Within 24 hours."]
        );
    }

    #[test]
    fn faq_heuristic_consumes_region_and_appends_last() {
        let doc = extract(
            "<body><h1>T</h1><p>Intro text.</p>\
             <h2>FAQ</h2>\
             <ul><li>One?</li><li>Two?</li><li>Three?</li></ul>\
             <p>First.</p><p>Second.</p><p>Third.</p></body>",
        );

        let faq = doc.big_chunks.last().unwrap();
        assert_eq!(faq.content_name.as_deref(), Some("Frequently Asked Questions"));
        assert_eq!(
            faq.small_chunks,
            [
                "FAQ_Q: One? // FAQ_A: First.",
                "FAQ_Q: Two? // FAQ_A: Second.",
                "FAQ_Q: Three? // FAQ_A: Third.",
            ]
        );

        // FAQ text must not leak into content chunks.
        for chunk in &doc.big_chunks[..doc.big_chunks.len() - 1] {
            for line in &chunk.small_chunks {
                assert!(!line.contains("One?") && !line.contains("First."));
            }
        }
    }

    #[test]
    fn indices_are_contiguous_with_backpack_at_zero() {
        let doc = extract(
            "<body><h1>T</h1><p>Licensed by the UKGC for UK players.</p>\
             <h2>Games</h2><p>Slots.</p></body>",
        );
        let indices: Vec<_> = doc.big_chunks.iter().map(|c| c.big_chunk_index).collect();
        assert_eq!(indices[0], 0);
        for (i, window) in indices.windows(2).enumerate() {
            assert_eq!(window[1] - window[0], 1, "gap after position {i}");
        }
    }
}
