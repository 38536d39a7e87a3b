//! Chunker trait definition.
//!
//! The worker session only ever sees this interface: text in, chunk
//! records out. Strategies plug in behind it, and tests substitute
//! deterministic stubs.

use crate::core::ChunkRecord;
use crate::error::Result;

/// Trait for splitting text into chunk records.
///
/// Implementations must be deterministic for a given input and
/// configuration. Empty input may produce zero chunks.
///
/// # Examples
///
/// ```
/// use rag_chunker::chunking::{Chunker, RecursiveChunker};
/// use rag_chunker::config::ChunkingConfig;
///
/// let chunker = RecursiveChunker::new(&ChunkingConfig::default()).unwrap();
/// let chunks = chunker.chunk("hello").unwrap();
/// assert_eq!(chunks.len(), 1);
/// assert_eq!(chunks[0].text, "hello");
/// ```
pub trait Chunker {
    /// Splits `text` into chunk records, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if chunking fails. Inside a worker session this is
    /// fatal.
    fn chunk(&self, text: &str) -> Result<Vec<ChunkRecord>>;

    /// Returns the name of the chunking strategy.
    fn name(&self) -> &'static str;

    /// Returns a description of the chunking strategy.
    fn description(&self) -> &'static str {
        "No description available"
    }
}

impl<T: Chunker + ?Sized> Chunker for &T {
    fn chunk(&self, text: &str) -> Result<Vec<ChunkRecord>> {
        (**self).chunk(text)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn description(&self) -> &'static str {
        (**self).description()
    }
}

impl<T: Chunker + ?Sized> Chunker for Box<T> {
    fn chunk(&self, text: &str) -> Result<Vec<ChunkRecord>> {
        (**self).chunk(text)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn description(&self) -> &'static str {
        (**self).description()
    }
}
