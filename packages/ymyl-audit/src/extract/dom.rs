//! Read-only DOM walking primitives.
//!
//! The extractors never mutate the parse tree. Instead they walk an
//! immutable `scraper::Html` once in document order, tracking consumed and
//! excluded subtrees in a [`WalkState`] keyed by stable node identity
//! (`NodeId`), not by text content.

use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use std::collections::HashSet;

use crate::text::clean_text;

/// Tags whose subtrees are never editorial content.
///
/// `header` is deliberately absent: the wrapper around a page's H1/lead
/// frequently is a header element, and anchors must stay reachable.
pub const NOISE_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "aside", "noscript", "iframe", "svg",
];

/// Mutable bookkeeping for one extraction pass over an immutable tree.
#[derive(Debug, Default)]
pub struct WalkState {
    visited: HashSet<NodeId>,
    excluded: HashSet<NodeId>,
}

impl WalkState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a single element as consumed.
    pub fn mark_visited(&mut self, element: ElementRef<'_>) {
        self.visited.insert(element.id());
    }

    /// Mark an element and every element beneath it as consumed. Used when
    /// a container (list, table, metadata anchor) has been flattened into
    /// one line so its children are never independently re-emitted.
    pub fn mark_subtree_visited(&mut self, element: ElementRef<'_>) {
        for node in element.descendants() {
            self.visited.insert(node.id());
        }
    }

    pub fn is_visited(&self, element: ElementRef<'_>) -> bool {
        self.visited.contains(&element.id())
    }

    /// Exclude an element's subtree from all subsequent walks (noise).
    pub fn exclude_subtree(&mut self, element: ElementRef<'_>) {
        self.excluded.insert(element.id());
    }

    /// True if the element is inside an excluded subtree.
    pub fn is_excluded(&self, element: ElementRef<'_>) -> bool {
        if self.excluded.contains(&element.id()) {
            return true;
        }
        element
            .ancestors()
            .any(|ancestor| self.excluded.contains(&ancestor.id()))
    }

    /// Visited or excluded.
    pub fn is_consumed(&self, element: ElementRef<'_>) -> bool {
        self.is_visited(element) || self.is_excluded(element)
    }
}

/// Exclude the standard non-editorial tags across the whole document.
pub fn exclude_noise_tags(document: &Html, state: &mut WalkState) {
    for element in walk_elements(document) {
        if NOISE_TAGS.contains(&element.value().name()) {
            state.exclude_subtree(element);
        }
    }
}

/// All elements of the document in document (reading) order.
pub fn walk_elements<'a>(document: &'a Html) -> impl Iterator<Item = ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
}

/// All elements beneath `root` in document order, excluding `root` itself.
pub fn walk_under<'a>(root: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    let root_id = root.id();
    root.descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.id() != root_id)
}

/// Whitespace-normalized text of an element's subtree.
pub fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

/// True if any class on the element contains the given fragment
/// (case-insensitive).
pub fn has_class_containing(element: ElementRef<'_>, fragment: &str) -> bool {
    element
        .value()
        .classes()
        .any(|class| class.to_lowercase().contains(fragment))
}

/// Heading level for `h1`..`h6` tags, if the element is one.
pub fn heading_level(element: ElementRef<'_>) -> Option<u8> {
    match element.value().name() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// First element matching `predicate` that appears after `anchor` in
/// document order. This is how subtitle/lead are located: the next
/// structurally-adjacent match after the H1, never an unordered global
/// scan that could pick up an unrelated element elsewhere on the page.
pub fn first_after<'a>(
    document: &'a Html,
    anchor: ElementRef<'a>,
    predicate: impl Fn(ElementRef<'a>) -> bool,
) -> Option<ElementRef<'a>> {
    let mut seen_anchor = false;
    for element in walk_elements(document) {
        if element.id() == anchor.id() {
            seen_anchor = true;
            continue;
        }
        if seen_anchor && predicate(element) {
            return Some(element);
        }
    }
    None
}
