//! Content extraction - raw HTML into an ordered chunk document.
//!
//! Three extractor variants share one interface:
//! - [`GenericExtractor`] - H2-based sectioning for arbitrary pages;
//! - [`SurgicalExtractor`] - selector-driven walking of the known casino
//!   page template;
//! - [`DocumentExportExtractor`] - scavenger-hunt extraction for exported
//!   editing documents with loose, inconsistently styled markup.
//!
//! [`extract_content`] is the entry point: it sniffs the input format and
//! routes to the right variant.

pub mod backpack;
pub mod doc_export;
pub mod dom;
pub mod faq;
pub mod generic;
pub mod surgical;

pub use doc_export::DocumentExportExtractor;
pub use generic::GenericExtractor;
pub use surgical::SurgicalExtractor;

use regex::Regex;
use std::sync::OnceLock;

use crate::error::ExtractResult;
use crate::types::chunk::ChunkDocument;
use crate::types::config::ExtractionMode;

/// A content extractor: raw HTML in, chunk document out.
///
/// Implementations never panic and never return a partial document; any
/// internal failure surfaces as an [`crate::error::ExtractError`].
pub trait ContentExtractor {
    fn extract(&self, html: &str) -> ExtractResult<ChunkDocument>;
}

/// Detected input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Ordinary web page HTML.
    Html,
    /// HTML exported from an editing document (Google Docs export).
    DocExport,
}

/// Signature markers of a Google-Docs HTML export: the internal GUID
/// wrapper, list-style class prefixes, or the generated `.cN { ... }`
/// style block paired with `class="cN"` usage.
pub fn detect_format(html: &str) -> DocumentFormat {
    if html.contains("docs-internal-guid") || html.contains("lst-kix_") {
        return DocumentFormat::DocExport;
    }

    static STYLE_SIG: OnceLock<Regex> = OnceLock::new();
    static CLASS_SIG: OnceLock<Regex> = OnceLock::new();
    let style_sig = STYLE_SIG
        .get_or_init(|| Regex::new(r"\.c\d+\s*\{[^}]*\}").expect("style signature is valid"));
    let class_sig = CLASS_SIG
        .get_or_init(|| Regex::new(r#"class="c\d"#).expect("class signature is valid"));

    if style_sig.is_match(html) && class_sig.is_match(html) {
        return DocumentFormat::DocExport;
    }

    DocumentFormat::Html
}

/// Extract a chunk document from raw HTML.
///
/// Document exports are detected from content and always routed to the
/// export extractor; otherwise `mode` selects the generic or surgical
/// variant.
pub fn extract_content(html: &str, mode: ExtractionMode) -> ExtractResult<ChunkDocument> {
    match detect_format(html) {
        DocumentFormat::DocExport => DocumentExportExtractor.extract(html),
        DocumentFormat::Html => match mode {
            ExtractionMode::Generic => GenericExtractor.extract(html),
            ExtractionMode::Surgical => SurgicalExtractor.extract(html),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_html_is_not_a_doc_export() {
        assert_eq!(
            detect_format("<html><body><p>hello</p></body></html>"),
            DocumentFormat::Html
        );
    }

    #[test]
    fn guid_marker_detects_doc_export() {
        let html = "<b id=\"docs-internal-guid-1234\"><p>doc text</p></b>";
        assert_eq!(detect_format(html), DocumentFormat::DocExport);
    }

    #[test]
    fn generated_style_block_detects_doc_export() {
        let html = "<style>.c0{font-weight:700}.c1{font-size:11pt}</style>\
                    <p class=\"c1\"><span class=\"c0\">Title</span></p>";
        assert_eq!(detect_format(html), DocumentFormat::DocExport);
    }

    #[test]
    fn doc_export_routing_ignores_mode() {
        let html = "<b id=\"docs-internal-guid-x\"></b><p>H1: Doc Title</p><p>Body here.</p>";
        let generic = extract_content(html, ExtractionMode::Generic).unwrap();
        let surgical = extract_content(html, ExtractionMode::Surgical).unwrap();
        assert_eq!(generic, surgical);
        assert!(generic.big_chunks[0]
            .small_chunks
            .contains(&"H1: Doc Title".to_string()));
    }

    #[test]
    fn extraction_indices_are_contiguous_for_any_input() {
        for html in [
            "",
            "<p>one paragraph</p>",
            "<h2>A</h2><p>a</p><h2>B</h2><p>b</p>",
            "<h1>T</h1><span class=\"sub-title\">S</span><p class=\"lead\">L</p><h2>X</h2><p>x</p>",
        ] {
            for mode in [ExtractionMode::Generic, ExtractionMode::Surgical] {
                let doc = extract_content(html, mode).unwrap();
                assert!(!doc.big_chunks.is_empty());
                let indices: Vec<_> =
                    doc.big_chunks.iter().map(|c| c.big_chunk_index).collect();
                let start = indices[0];
                assert!(start == 0 || start == 1, "start was {start}");
                for window in indices.windows(2) {
                    assert_eq!(window[1], window[0] + 1);
                }
            }
        }
    }
}
