//! Chunk record representation.
//!
//! A chunk record is the unit the worker reports back to its caller: the
//! chunk text and its size in the chunker's token unit. Records are
//! produced by a chunker, emitted once and dropped.

use crate::io::find_char_boundary;
use serde::{Deserialize, Serialize};

/// One chunk produced by a chunking strategy.
///
/// Serializes to a flat JSON object with exactly two keys, in the order
/// `token_count`, `text`. Embedded newlines in `text` are escaped by the
/// JSON encoder, so a serialized record always fits on a single line.
///
/// # Examples
///
/// ```
/// use rag_chunker::core::ChunkRecord;
///
/// let record = ChunkRecord::new(2, "hello");
/// assert_eq!(
///     record.to_json_line().unwrap(),
///     r#"{"token_count":2,"text":"hello"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChunkRecord {
    /// Size of the chunk in the chunker's token unit.
    pub token_count: usize,

    /// Chunk content (may contain newlines).
    pub text: String,
}

impl ChunkRecord {
    /// Creates a new chunk record.
    #[must_use]
    pub fn new(token_count: usize, text: impl Into<String>) -> Self {
        Self {
            token_count,
            text: text.into(),
        }
    }

    /// Serializes the record as a single JSON line (without terminator).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parses a record from a single JSON line.
    ///
    /// Unknown fields are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is not a valid record.
    pub fn from_json_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    /// Returns the size of the chunk text in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.text.len()
    }

    /// Checks if the chunk text is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns a preview of the text, at most `max_len` bytes, cut on a
    /// character boundary.
    #[must_use]
    pub fn preview(&self, max_len: usize) -> &str {
        if self.text.len() <= max_len {
            &self.text
        } else {
            let end = find_char_boundary(&self.text, max_len);
            &self.text[..end]
        }
    }
}
