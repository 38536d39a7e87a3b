//! Unicode utilities for text processing.
//!
//! Boundary helpers used by the chunkers so that no chunk ever splits a
//! multi-byte character or a grapheme cluster, plus the counting primitives
//! behind the token counters.

use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Finds a valid UTF-8 character boundary at or before the given position.
///
/// # Examples
///
/// ```
/// use rag_chunker::io::find_char_boundary;
///
/// let s = "Hello 世界";
/// assert_eq!(find_char_boundary(s, 6), 6); // Before '世'
/// assert_eq!(find_char_boundary(s, 7), 6); // Middle of '世', backs up
/// ```
#[must_use]
pub const fn find_char_boundary(s: &str, pos: usize) -> usize {
    if pos >= s.len() {
        return s.len();
    }
    let bytes = s.as_bytes();
    let mut boundary = pos;
    // UTF-8 continuation bytes start with 10xxxxxx (0x80-0xBF)
    while boundary > 0 && (bytes[boundary] & 0xC0) == 0x80 {
        boundary -= 1;
    }
    boundary
}

/// Returns the byte offset reached after advancing `chars` characters from
/// `start`, clamped to the end of the string.
#[must_use]
pub fn advance_chars(s: &str, start: usize, chars: usize) -> usize {
    s[start..]
        .char_indices()
        .nth(chars)
        .map_or(s.len(), |(offset, _)| start + offset)
}

/// Counts Unicode scalar values.
#[must_use]
pub fn char_count(s: &str) -> usize {
    s.chars().count()
}

/// Counts words using Unicode word segmentation rules.
///
/// ```
/// use rag_chunker::io::unicode::word_count;
///
/// assert_eq!(word_count("Hello, wonderful world!"), 3);
/// ```
#[must_use]
pub fn word_count(s: &str) -> usize {
    s.unicode_words().count()
}

/// Byte ranges of the extended grapheme clusters of `s`, offset by `base`.
pub fn grapheme_ranges(s: &str, base: usize) -> impl Iterator<Item = Range<usize>> + '_ {
    s.grapheme_indices(true)
        .map(move |(offset, g)| base + offset..base + offset + g.len())
}
