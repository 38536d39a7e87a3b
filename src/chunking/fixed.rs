//! Fixed-size chunking strategy.
//!
//! Provides simple character-window chunking with configurable size and
//! overlap. Windows are measured in characters and never split a multi-byte
//! character; `token_count` is still reported in the configured counter.

use crate::chunking::tokens::TokenCounter;
use crate::chunking::traits::Chunker;
use crate::config::ChunkingConfig;
use crate::core::ChunkRecord;
use crate::error::Result;
use crate::io::unicode::advance_chars;

/// Fixed-size chunker that splits text into character windows.
///
/// # Examples
///
/// ```
/// use rag_chunker::chunking::{Chunker, FixedChunker};
/// use rag_chunker::config::ChunkingConfig;
///
/// let config = ChunkingConfig::default().strategy("fixed").chunk_size(100);
/// let chunker = FixedChunker::new(&config).unwrap();
/// let text = "Hello, world! ".repeat(20);
/// for chunk in chunker.chunk(&text).unwrap() {
///     assert!(chunk.text.chars().count() <= 100);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FixedChunker {
    /// Window size in characters.
    chunk_size: usize,
    /// Characters shared by consecutive windows.
    overlap: usize,
    /// Whether to end windows just after a nearby newline.
    line_aware: bool,
    counter: TokenCounter,
}

impl FixedChunker {
    /// Creates a fixed chunker from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the size settings are invalid or the token
    /// counter is unknown.
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            chunk_size: config.chunk_size,
            overlap: config.overlap,
            line_aware: true,
            counter: TokenCounter::parse(&config.token_counter)?,
        })
    }

    /// Sets whether to align windows to line boundaries.
    ///
    /// When enabled, a window ends right after the last newline found in
    /// its final tenth, if there is one.
    #[must_use]
    pub const fn line_aware(mut self, enabled: bool) -> Self {
        self.line_aware = enabled;
        self
    }

    fn find_boundary(&self, text: &str, start: usize, target: usize) -> usize {
        if !self.line_aware {
            return target;
        }
        let lookback = (self.chunk_size / 10).max(1);
        text[start..target]
            .char_indices()
            .rev()
            .take(lookback)
            .find(|&(_, c)| c == '\n')
            .map_or(target, |(offset, _)| start + offset + 1)
    }

    /// Byte offset `overlap` characters before `end`.
    fn overlap_start(&self, text: &str, end: usize) -> usize {
        if self.overlap == 0 {
            return end;
        }
        text[..end]
            .char_indices()
            .rev()
            .nth(self.overlap - 1)
            .map_or(0, |(offset, _)| offset)
    }
}

impl Chunker for FixedChunker {
    fn chunk(&self, text: &str) -> Result<Vec<ChunkRecord>> {
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < text.len() {
            let target = advance_chars(text, start, self.chunk_size);
            let end = if target >= text.len() {
                text.len()
            } else {
                self.find_boundary(text, start, target)
            };

            let slice = &text[start..end];
            chunks.push(ChunkRecord::new(self.counter.count(slice), slice));

            if end >= text.len() {
                break;
            }

            let next = self.overlap_start(text, end);
            start = if next <= start { end } else { next };
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }

    fn description(&self) -> &'static str {
        "Fixed-size character windows with optional overlap"
    }
}
