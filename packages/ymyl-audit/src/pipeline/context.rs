//! Global context injection and analyzer payload construction.
//!
//! A warning or license stated once in the intro must still suppress a
//! false positive three sections later, so page-level context lines are
//! prepended into every chunk before the ensemble fan-out. Injection
//! happens per chunk, once, before dispatch - every auditor call sees an
//! identical payload. Payload inflation is the accepted price of context
//! completeness.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::types::chunk::{tag, BigChunk, ChunkDocument};

/// How many leading chunks are scanned for the page H1.
const TOPIC_SCAN_CHUNKS: usize = 3;

/// Marker prefix of the synthetic per-chunk context line.
const CONTEXT_MARKER: &str = "GLOBAL_CONTEXT (applies to this section):";

/// Page-level context shipped alongside the chunk text in every auditor
/// payload, and passed to the filter agent as its context backpack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalContext {
    pub primary_topic: String,
    pub content_type: String,
    pub ymyl_category: String,
    pub global_assumptions: GlobalAssumptions,
}

/// Site-level assumptions the auditors should not re-litigate per section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalAssumptions {
    pub site_identity: String,
    pub affiliate_disclosure: String,
    pub site_reputation: String,
}

impl GlobalContext {
    /// Build the context from a chunk document.
    pub fn from_document(document: &ChunkDocument) -> Self {
        Self {
            primary_topic: document
                .primary_topic(TOPIC_SCAN_CHUNKS)
                .unwrap_or_else(|| "Unknown Title".to_string()),
            content_type: "Commercial Review".to_string(),
            ymyl_category: "Financial/Gambling".to_string(),
            global_assumptions: GlobalAssumptions {
                site_identity: "Compliant".to_string(),
                affiliate_disclosure: "Compliant".to_string(),
                site_reputation: "Neutral/Good".to_string(),
            },
        }
    }
}

/// Lines that apply to the whole page: everything in the backpack chunk
/// plus H1 and warning lines wherever they appear.
pub fn harvest_global_lines(document: &ChunkDocument) -> Vec<String> {
    let mut lines = Vec::new();
    for chunk in &document.big_chunks {
        if chunk.is_backpack() {
            lines.extend(chunk.small_chunks.iter().cloned());
            continue;
        }
        for line in &chunk.small_chunks {
            if line.starts_with(tag::H1) || line.starts_with(tag::WARNING) {
                lines.push(line.clone());
            }
        }
    }
    lines
}

/// Prepend the synthetic context line to every numbered chunk. The
/// backpack chunk itself is passed through untouched. Returns a new
/// document; the input is never mutated.
pub fn inject_global_context(document: &ChunkDocument) -> ChunkDocument {
    let lines = harvest_global_lines(document);
    if lines.is_empty() {
        return document.clone();
    }
    let marker = format!("{CONTEXT_MARKER} {}", lines.join(" | "));

    let big_chunks = document
        .big_chunks
        .iter()
        .map(|chunk| {
            if chunk.is_backpack() {
                return chunk.clone();
            }
            let mut injected = BigChunk::new(chunk.big_chunk_index);
            injected.content_name = chunk.content_name.clone();
            injected.small_chunks.push(marker.clone());
            injected.small_chunks.extend(chunk.small_chunks.iter().cloned());
            injected
        })
        .collect();

    ChunkDocument { big_chunks }
}

/// Build the payload string sent to every auditor, plus the context
/// object reused by the deduplication pass.
pub fn build_analyzer_payload(
    document: &ChunkDocument,
) -> serde_json::Result<(String, GlobalContext)> {
    let context = GlobalContext::from_document(document);
    let injected = inject_global_context(document);
    let payload = json!({
        "global_context": context,
        "chunk_text": injected.to_json()?,
    });
    Ok((serde_json::to_string_pretty(&payload)?, context))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> ChunkDocument {
        ChunkDocument {
            big_chunks: vec![
                BigChunk::new(0)
                    .with_name("GLOBAL CONTEXT")
                    .with_lines(["LICENSE_CTX: Licensed by the MGA."]),
                BigChunk::new(1).with_lines(["H1: Casino Review", "CONTENT: Intro."]),
                BigChunk::new(2).with_lines(["WARNING: 18+ only", "CONTENT: Games."]),
                BigChunk::new(3).with_lines(["CONTENT: Payments."]),
            ],
        }
    }

    #[test]
    fn harvest_collects_backpack_h1_and_warnings() {
        let lines = harvest_global_lines(&document());
        assert_eq!(
            lines,
            [
                "LICENSE_CTX: Licensed by the MGA.",
                "H1: Casino Review",
                "WARNING: 18+ only",
            ]
        );
    }

    #[test]
    fn every_numbered_chunk_gets_the_marker_line() {
        let injected = inject_global_context(&document());
        for chunk in &injected.big_chunks {
            if chunk.is_backpack() {
                assert!(!chunk.small_chunks[0].starts_with(CONTEXT_MARKER));
            } else {
                assert!(chunk.small_chunks[0].starts_with(CONTEXT_MARKER));
                assert!(chunk.small_chunks[0].contains("18+ only"));
            }
        }
        // Original content follows the marker untouched.
        assert_eq!(injected.big_chunks[3].small_chunks[1], "CONTENT: Payments.");
    }

    #[test]
    fn injection_does_not_mutate_the_input() {
        let original = document();
        let _ = inject_global_context(&original);
        assert_eq!(original.big_chunks[1].small_chunks[0], "H1: Casino Review");
    }

    #[test]
    fn context_free_document_passes_through() {
        let plain = ChunkDocument {
            big_chunks: vec![BigChunk::new(1).with_lines(["CONTENT: nothing global"])],
        };
        assert_eq!(inject_global_context(&plain), plain);
    }

    #[test]
    fn payload_carries_topic_and_chunk_text() {
        let (payload, context) = build_analyzer_payload(&document()).unwrap();
        assert_eq!(context.primary_topic, "Casino Review");
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["global_context"]["primary_topic"], "Casino Review");
        assert!(value["chunk_text"].as_str().unwrap().contains("big_chunks"));
    }

    #[test]
    fn missing_h1_falls_back_to_unknown_title() {
        let plain = ChunkDocument {
            big_chunks: vec![BigChunk::new(1).with_lines(["CONTENT: text"])],
        };
        let context = GlobalContext::from_document(&plain);
        assert_eq!(context.primary_topic, "Unknown Title");
    }
}
