//! Recursive chunking strategy.
//!
//! Splits text along a hierarchy of boundaries, coarsest first:
//! paragraphs, lines, sentences, words, and finally grapheme clusters.
//! Adjacent pieces are packed greedily while they fit the chunk size;
//! a piece that is too large on its own descends to the next level.
//!
//! Chunks are contiguous slices of the input, so concatenating the chunk
//! texts always reproduces the input exactly.

use crate::chunking::tokens::TokenCounter;
use crate::chunking::traits::Chunker;
use crate::config::ChunkingConfig;
use crate::core::ChunkRecord;
use crate::error::{ChunkingError, Result};
use crate::io::unicode::{char_count, grapheme_ranges};
use regex::Regex;
use std::ops::Range;

/// Split levels, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Paragraph,
    Line,
    Sentence,
    Word,
    Grapheme,
}

impl Level {
    const fn next(self) -> Option<Self> {
        match self {
            Self::Paragraph => Some(Self::Line),
            Self::Line => Some(Self::Sentence),
            Self::Sentence => Some(Self::Word),
            Self::Word => Some(Self::Grapheme),
            Self::Grapheme => None,
        }
    }
}

/// Delimiter patterns. A piece ends where a match ends, so delimiters stay
/// attached to the text before them.
const PARAGRAPH_PATTERN: &str = r"\n\n";
const LINE_PATTERN: &str = r"\n";
const SENTENCE_PATTERN: &str = r"[.!?]+\s+|[。！？]+\s*";
const WORD_PATTERN: &str = r"\s+";

/// Hierarchical chunker that respects paragraph, line, sentence and word
/// boundaries, in that order of preference.
///
/// # Examples
///
/// ```
/// use rag_chunker::chunking::{Chunker, RecursiveChunker};
/// use rag_chunker::config::ChunkingConfig;
///
/// let config = ChunkingConfig::default()
///     .chunk_size(20)
///     .min_characters_per_chunk(0);
/// let chunker = RecursiveChunker::new(&config).unwrap();
/// let text = "First paragraph.\n\nSecond paragraph.";
/// let chunks = chunker.chunk(text).unwrap();
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[0].text, "First paragraph.\n\n");
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    min_characters_per_chunk: usize,
    counter: TokenCounter,
    paragraph: Regex,
    line: Regex,
    sentence: Regex,
    word: Regex,
}

impl RecursiveChunker {
    /// Creates a recursive chunker from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the chunk size is zero, the token counter is
    /// unknown, or a delimiter pattern fails to compile.
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        if config.chunk_size == 0 {
            return Err(ChunkingError::InvalidConfig {
                reason: "chunk_size must be > 0".to_string(),
            }
            .into());
        }

        Ok(Self {
            chunk_size: config.chunk_size,
            min_characters_per_chunk: config.min_characters_per_chunk,
            counter: TokenCounter::parse(&config.token_counter)?,
            paragraph: compile(PARAGRAPH_PATTERN)?,
            line: compile(LINE_PATTERN)?,
            sentence: compile(SENTENCE_PATTERN)?,
            word: compile(WORD_PATTERN)?,
        })
    }

    /// Returns the token counter in use.
    #[must_use]
    pub const fn counter(&self) -> TokenCounter {
        self.counter
    }

    fn fits(&self, text: &str) -> bool {
        self.counter.count(text) <= self.chunk_size
    }

    /// Cuts `range` into contiguous pieces at the boundaries of `level`.
    fn pieces(&self, text: &str, range: Range<usize>, level: Level) -> Vec<Range<usize>> {
        let pattern = match level {
            Level::Paragraph => &self.paragraph,
            Level::Line => &self.line,
            Level::Sentence => &self.sentence,
            Level::Word => &self.word,
            Level::Grapheme => {
                return grapheme_ranges(&text[range.clone()], range.start).collect();
            }
        };

        let mut pieces = Vec::new();
        let mut start = range.start;
        for m in pattern.find_iter(&text[range.clone()]) {
            let end = range.start + m.end();
            if end > start && end < range.end {
                pieces.push(start..end);
                start = end;
            }
        }
        pieces.push(start..range.end);
        pieces
    }

    fn split(&self, text: &str, range: Range<usize>, level: Level, out: &mut Vec<Range<usize>>) {
        if self.fits(&text[range.clone()]) {
            out.push(range);
            return;
        }

        let mut current: Option<Range<usize>> = None;
        for piece in self.pieces(text, range, level) {
            if !self.fits(&text[piece.clone()]) {
                if let Some(done) = current.take() {
                    out.push(done);
                }
                match level.next() {
                    Some(next) => self.split(text, piece, next, out),
                    // A single grapheme larger than the limit cannot be split.
                    None => out.push(piece),
                }
                continue;
            }

            current = match current {
                Some(open) if self.fits(&text[open.start..piece.end]) => {
                    Some(open.start..piece.end)
                }
                Some(open) => {
                    out.push(open);
                    Some(piece)
                }
                None => Some(piece),
            };
        }

        if let Some(done) = current {
            out.push(done);
        }
    }

    /// Folds chunks shorter than the minimum into their predecessor when
    /// the merged chunk still fits.
    fn merge_short(&self, text: &str, ranges: Vec<Range<usize>>) -> Vec<Range<usize>> {
        let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
        for range in ranges {
            if char_count(&text[range.clone()]) < self.min_characters_per_chunk
                && let Some(prev) = merged.last_mut()
                && self.fits(&text[prev.start..range.end])
            {
                prev.end = range.end;
                continue;
            }
            merged.push(range);
        }
        merged
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ChunkingError::from(e).into())
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, text: &str) -> Result<Vec<ChunkRecord>> {
        if text.is_empty() {
            return Ok(vec![]);
        }

        let mut ranges = Vec::new();
        self.split(text, 0..text.len(), Level::Paragraph, &mut ranges);
        let ranges = self.merge_short(text, ranges);

        Ok(ranges
            .into_iter()
            .map(|range| {
                let slice = &text[range];
                ChunkRecord::new(self.counter.count(slice), slice)
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "recursive"
    }

    fn description(&self) -> &'static str {
        "Recursive chunking over paragraph, line, sentence, word and grapheme boundaries"
    }
}
