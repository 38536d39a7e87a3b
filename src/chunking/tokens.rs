//! Token counters.
//!
//! A token counter defines the unit of `token_count` in every chunk record
//! and the unit of the configured chunk size.

use crate::error::{ChunkingError, Result};
use crate::io::unicode::{char_count, word_count};

/// How chunk sizes are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenCounter {
    /// One token per Unicode scalar value.
    #[default]
    Character,
    /// One token per Unicode word.
    Word,
    /// Rough model-token estimate, ~4 bytes per token.
    Estimate,
}

impl TokenCounter {
    /// All counters, in display order.
    pub const ALL: [Self; 3] = [Self::Character, Self::Word, Self::Estimate];

    /// Parses a counter by name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ChunkingError::UnknownTokenCounter`] for unknown names.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "character" | "char" | "chars" => Ok(Self::Character),
            "word" | "words" => Ok(Self::Word),
            "estimate" | "approx" => Ok(Self::Estimate),
            _ => Err(ChunkingError::UnknownTokenCounter {
                name: name.to_string(),
            }
            .into()),
        }
    }

    /// Canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Word => "word",
            Self::Estimate => "estimate",
        }
    }

    /// Counts tokens in `text`.
    #[must_use]
    pub fn count(self, text: &str) -> usize {
        match self {
            Self::Character => char_count(text),
            Self::Word => word_count(text),
            Self::Estimate => text.len().div_ceil(4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("character", TokenCounter::Character ; "character")]
    #[test_case("CHARS", TokenCounter::Character ; "chars uppercase")]
    #[test_case("word", TokenCounter::Word ; "word")]
    #[test_case("estimate", TokenCounter::Estimate ; "estimate")]
    fn test_parse(name: &str, expected: TokenCounter) {
        assert_eq!(TokenCounter::parse(name).unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(
            TokenCounter::parse("bpe"),
            Err(crate::Error::Chunking(ChunkingError::UnknownTokenCounter { .. }))
        ));
    }

    #[test_case(TokenCounter::Character, "héllo wörld", 11 ; "characters")]
    #[test_case(TokenCounter::Word, "héllo wörld", 2 ; "words")]
    #[test_case(TokenCounter::Estimate, "Hello, world!", 4 ; "estimate")]
    #[test_case(TokenCounter::Character, "", 0 ; "empty")]
    fn test_count(counter: TokenCounter, text: &str, expected: usize) {
        assert_eq!(counter.count(text), expected);
    }

    #[test]
    fn test_names_round_trip() {
        for counter in TokenCounter::ALL {
            assert_eq!(TokenCounter::parse(counter.name()).unwrap(), counter);
        }
    }
}
