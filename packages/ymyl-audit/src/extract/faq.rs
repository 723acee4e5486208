//! Heuristic FAQ detection shared by the surgical and document-export
//! extractors.
//!
//! The heuristic finds a FAQ heading (localized spellings included), scans
//! its following siblings until the next top-level heading, classifies each
//! as question or answer, and pairs them in order.

use scraper::{ElementRef, Html};
use std::collections::VecDeque;

use super::dom::{element_text, walk_elements, walk_under, WalkState};
use crate::types::chunk::tag;

/// Heading spellings that introduce a FAQ block ("KKK" Estonian,
/// "PYTANIA" Polish).
const FAQ_HEADING_MARKERS: &[&str] = &["FAQ", "KKK", "PYTANIA"];

/// A FAQ heading longer than this is assumed to be body text that merely
/// mentions the FAQ.
const FAQ_HEADING_MAX_LEN: usize = 60;

/// A paragraph containing `?` only counts as a question under this length.
const QUESTION_MAX_LEN: usize = 150;

/// One classified element from the FAQ region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FaqItem {
    Question(String),
    Answer(String),
}

/// Pair questions with answers in order.
///
/// Questions queue up and each answer consumes the oldest unanswered
/// question, so both layouts work: alternating Q/A/Q/A and a question list
/// followed by an answer block.
pub(crate) fn pair_items(items: Vec<FaqItem>) -> Vec<String> {
    let mut open_questions: VecDeque<String> = VecDeque::new();
    let mut lines = Vec::new();

    for item in items {
        match item {
            FaqItem::Question(q) => open_questions.push_back(q),
            FaqItem::Answer(a) => {
                if let Some(q) = open_questions.pop_front() {
                    lines.push(format!("{} {q} // {} {a}", tag::FAQ_Q, tag::FAQ_A));
                }
            }
        }
    }

    lines
}

/// True if the text reads as a FAQ heading.
pub(crate) fn is_faq_heading(text: &str) -> bool {
    let upper = text.to_uppercase();
    !text.is_empty()
        && text.len() < FAQ_HEADING_MAX_LEN
        && FAQ_HEADING_MARKERS.iter().any(|m| upper.contains(m))
}

/// Classify a paragraph as question or answer.
fn classify_paragraph(text: String) -> FaqItem {
    if text.contains('?') && text.len() < QUESTION_MAX_LEN {
        FaqItem::Question(text)
    } else {
        FaqItem::Answer(text)
    }
}

/// Heuristic FAQ extraction: FAQ heading → sibling scan → Q/A pairing.
///
/// On success the heading and every consumed sibling are marked visited so
/// the main content walk never re-emits the FAQ text. Finding no FAQ is
/// not an error; the result is simply empty.
pub(crate) fn faq_from_heading(document: &Html, state: &mut WalkState) -> Vec<String> {
    let header = walk_elements(document).find(|el| {
        !state.is_consumed(*el)
            && matches!(el.value().name(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p")
            && is_faq_heading(&element_text(*el))
    });
    let Some(header) = header else {
        return Vec::new();
    };

    let mut items: Vec<FaqItem> = Vec::new();
    let mut consumed: Vec<ElementRef<'_>> = Vec::new();

    for sibling in header.next_siblings().filter_map(ElementRef::wrap) {
        if state.is_consumed(sibling) {
            continue;
        }
        let name = sibling.value().name();
        let text = element_text(sibling);

        // A new top-level section ends the FAQ region.
        if matches!(name, "h1" | "h2") && !text.is_empty() {
            break;
        }

        match name {
            "ul" | "ol" => {
                for li in walk_under(sibling).filter(|el| el.value().name() == "li") {
                    let question = element_text(li);
                    if !question.is_empty() {
                        items.push(FaqItem::Question(question));
                    }
                }
                consumed.push(sibling);
            }
            "p" if !text.is_empty() => {
                items.push(classify_paragraph(text));
                consumed.push(sibling);
            }
            _ => {}
        }
    }

    let lines = pair_items(items);
    if lines.is_empty() {
        return Vec::new();
    }

    state.mark_subtree_visited(header);
    for element in consumed {
        state.mark_subtree_visited(element);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternating_items_pair_in_order() {
        let lines = pair_items(vec![
            FaqItem::Question("Q1?".into()),
            FaqItem::Answer("A1".into()),
            FaqItem::Question("Q2?".into()),
            FaqItem::Answer("A2".into()),
        ]);
        assert_eq!(
            lines,
            ["FAQ_Q: Q1? // FAQ_A: A1", "FAQ_Q: Q2? // FAQ_A: A2"]
        );
    }

    #[test]
    fn question_block_pairs_with_answer_block() {
        let lines = pair_items(vec![
            FaqItem::Question("Q1?".into()),
            FaqItem::Question("Q2?".into()),
            FaqItem::Answer("A1".into()),
            FaqItem::Answer("A2".into()),
        ]);
        assert_eq!(
            lines,
            ["FAQ_Q: Q1? // FAQ_A: A1", "FAQ_Q: Q2? // FAQ_A: A2"]
        );
    }

    #[test]
    fn unanswered_questions_produce_nothing() {
        assert!(pair_items(vec![FaqItem::Question("Q?".into())]).is_empty());
    }

    #[test]
    fn heading_detection_is_localized_and_bounded() {
        assert!(is_faq_heading("FAQ"));
        assert!(is_faq_heading("Często zadawane pytania"));
        assert!(is_faq_heading("KKK"));
        assert!(!is_faq_heading(
            "This long paragraph mentions the FAQ but is clearly body copy, not a heading at all"
        ));
    }

    #[test]
    fn heading_scan_pairs_list_questions_with_paragraph_answers() {
        let html = Html::parse_document(
            "<body><h2>FAQ</h2>\
             <ul><li>Is it legal?</li><li>Is it safe?</li><li>Is it fast?</li></ul>\
             <p>Yes, fully licensed.</p><p>Yes, audited.</p><p>Usually instant.</p>\
             <h2>Next section</h2><p>Other text.</p></body>",
        );
        let mut state = WalkState::new();
        let lines = faq_from_heading(&html, &mut state);
        assert_eq!(
            lines,
            [
                "FAQ_Q: Is it legal? // FAQ_A: Yes, fully licensed.",
                "FAQ_Q: Is it safe? // FAQ_A: Yes, audited.",
                "FAQ_Q: Is it fast? // FAQ_A: Usually instant.",
            ]
        );
    }

    #[test]
    fn scan_stops_at_next_section_heading() {
        let html = Html::parse_document(
            "<body><h2>FAQ</h2><p>Is it legal?</p><p>Yes.</p>\
             <h2>Bonuses</h2><p>Is this a question? No.</p></body>",
        );
        let mut state = WalkState::new();
        let lines = faq_from_heading(&html, &mut state);
        assert_eq!(lines, ["FAQ_Q: Is it legal? // FAQ_A: Yes."]);
    }
}
