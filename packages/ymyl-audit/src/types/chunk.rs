//! The chunk document - structured extraction output.
//!
//! A [`ChunkDocument`] is an ordered sequence of "big chunks", each a named
//! group of tagged text lines ("small chunks"). Index 0 is reserved for the
//! optional global context backpack; numbered content chunks start at 1.

use serde::{Deserialize, Serialize};

/// Tag prefixes for small chunks.
///
/// A closed vocabulary: consumers must treat an unrecognized prefix as
/// plain `CONTENT:`-equivalent text rather than erroring.
pub mod tag {
    pub const H1: &str = "H1:";
    pub const H2: &str = "H2:";
    pub const H3: &str = "H3:";
    pub const H4: &str = "H4:";
    pub const CONTENT: &str = "CONTENT:";
    pub const LIST: &str = "LIST:";
    pub const TABLE: &str = "TABLE:";
    pub const WARNING: &str = "WARNING:";
    pub const FAQ_Q: &str = "FAQ_Q:";
    pub const FAQ_A: &str = "FAQ_A:";
    pub const SUBTITLE: &str = "SUBTITLE:";
    pub const LEAD: &str = "LEAD:";
    pub const SUMMARY: &str = "SUMMARY:";
}

/// Separator joining flattened list items and table rows into one line.
pub const ITEM_SEPARATOR: &str = " // ";

/// Separator joining table cells within a row.
pub const CELL_SEPARATOR: &str = " | ";

/// One logical section of a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigChunk {
    /// Position in document reading order. 0 is reserved for the global
    /// context backpack; content chunks count up from 1.
    pub big_chunk_index: i64,

    /// Section title, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_name: Option<String>,

    /// Tagged text lines in source order.
    pub small_chunks: Vec<String>,
}

impl BigChunk {
    /// Create a chunk with the given index and no name.
    pub fn new(index: i64) -> Self {
        Self {
            big_chunk_index: index,
            content_name: None,
            small_chunks: Vec::new(),
        }
    }

    /// Set the section name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.content_name = Some(name.into());
        self
    }

    /// Append tagged lines.
    pub fn with_lines(mut self, lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.small_chunks.extend(lines.into_iter().map(|l| l.into()));
        self
    }

    /// True if this is the reserved global-context chunk.
    pub fn is_backpack(&self) -> bool {
        self.big_chunk_index == 0
    }
}

/// The extraction output: ordered big chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDocument {
    pub big_chunks: Vec<BigChunk>,
}

impl ChunkDocument {
    /// A document with no chunks yet.
    pub fn new() -> Self {
        Self {
            big_chunks: Vec::new(),
        }
    }

    /// The placeholder document emitted when extraction finds nothing, so
    /// downstream consumers never see an empty chunk list.
    pub fn placeholder() -> Self {
        Self {
            big_chunks: vec![BigChunk::new(1).with_lines(["CONTENT: No content found"])],
        }
    }

    /// Replace an empty chunk list with the placeholder.
    pub fn or_placeholder(self) -> Self {
        if self.big_chunks.is_empty() {
            Self::placeholder()
        } else {
            self
        }
    }

    /// Serialize to the JSON wire format crossing the core boundary.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse the JSON wire format.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// The first `H1:` line among the first `scan` chunks, used as the
    /// document's primary topic.
    pub fn primary_topic(&self, scan: usize) -> Option<String> {
        self.big_chunks.iter().take(scan).find_map(|chunk| {
            chunk
                .small_chunks
                .iter()
                .find_map(|line| line.strip_prefix(tag::H1))
                .map(|rest| rest.trim().to_string())
        })
    }
}

impl Default for ChunkDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_never_empty() {
        let doc = ChunkDocument::new().or_placeholder();
        assert_eq!(doc.big_chunks.len(), 1);
        assert!(doc.big_chunks[0].small_chunks[0].contains("No content found"));
    }

    #[test]
    fn wire_format_round_trips() {
        let doc = ChunkDocument {
            big_chunks: vec![BigChunk::new(1)
                .with_name("Intro")
                .with_lines(["H1: Title", "CONTENT: Body text"])],
        };
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"big_chunk_index\": 1"));
        assert!(json.contains("\"content_name\": \"Intro\""));
        assert_eq!(ChunkDocument::from_json(&json).unwrap(), doc);
    }

    #[test]
    fn content_name_absent_is_omitted_from_wire() {
        let doc = ChunkDocument {
            big_chunks: vec![BigChunk::new(1).with_lines(["CONTENT: x"])],
        };
        let json = doc.to_json().unwrap();
        assert!(!json.contains("content_name"));
    }

    #[test]
    fn primary_topic_scans_leading_chunks_only() {
        let doc = ChunkDocument {
            big_chunks: vec![
                BigChunk::new(1).with_lines(["CONTENT: no title here"]),
                BigChunk::new(2).with_lines(["H1: Casino Review"]),
                BigChunk::new(3).with_lines(["H1: Too Late"]),
            ],
        };
        assert_eq!(doc.primary_topic(3).as_deref(), Some("Casino Review"));
        assert_eq!(doc.primary_topic(1), None);
    }
}
