//! Chunking strategies for rag-chunker.
//!
//! The worker session depends only on the [`Chunker`] trait. Two strategies
//! ship with the crate:
//!
//! - **Recursive** (default): paragraph → line → sentence → word → grapheme
//!   splitting with greedy packing
//! - **Fixed**: character windows with configurable overlap

pub mod fixed;
pub mod recursive;
pub mod tokens;
pub mod traits;

pub use fixed::FixedChunker;
pub use recursive::RecursiveChunker;
pub use tokens::TokenCounter;
pub use traits::Chunker;

use crate::config::ChunkingConfig;
use crate::error::{ChunkingError, Result};

/// Names and descriptions of the available strategies.
#[must_use]
pub const fn available_strategies() -> &'static [(&'static str, &'static str)] {
    &[
        (
            "recursive",
            "Split on paragraphs, then lines, sentences, words and graphemes",
        ),
        ("fixed", "Fixed-size character windows with optional overlap"),
    ]
}

/// Creates a chunker from configuration.
///
/// # Errors
///
/// Returns [`ChunkingError::UnknownStrategy`] if the strategy name is not
/// recognized, or a configuration error from [`ChunkingConfig::validate`]
/// or the strategy itself. Size settings are validated for every strategy,
/// so `overlap >= chunk_size` is rejected even for `recursive`.
///
/// # Examples
///
/// ```
/// use rag_chunker::chunking::create_chunker;
/// use rag_chunker::config::ChunkingConfig;
///
/// let chunker = create_chunker(&ChunkingConfig::default()).unwrap();
/// assert_eq!(chunker.name(), "recursive");
/// ```
pub fn create_chunker(config: &ChunkingConfig) -> Result<Box<dyn Chunker>> {
    config.validate()?;
    match config.strategy.to_lowercase().as_str() {
        "recursive" => Ok(Box::new(RecursiveChunker::new(config)?)),
        "fixed" => Ok(Box::new(FixedChunker::new(config)?)),
        _ => Err(ChunkingError::UnknownStrategy {
            name: config.strategy.clone(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("recursive" ; "recursive")]
    #[test_case("fixed" ; "fixed")]
    #[test_case("FIXED" ; "case insensitive")]
    fn test_create_chunker(name: &str) {
        let config = ChunkingConfig::default().strategy(name);
        let chunker = create_chunker(&config).unwrap();
        assert_eq!(chunker.name(), name.to_lowercase());
    }

    #[test]
    fn test_create_chunker_unknown() {
        let config = ChunkingConfig::default().strategy("semantic-llm");
        let result = create_chunker(&config);
        assert!(matches!(
            result,
            Err(crate::Error::Chunking(ChunkingError::UnknownStrategy { .. }))
        ));
    }

    #[test_case("recursive" ; "recursive ignores overlap but still checks it")]
    #[test_case("fixed" ; "fixed")]
    fn test_create_chunker_rejects_overlap_at_chunk_size(name: &str) {
        let config = ChunkingConfig::default()
            .strategy(name)
            .chunk_size(5)
            .overlap(5);
        assert!(matches!(
            create_chunker(&config),
            Err(crate::Error::Chunking(ChunkingError::OverlapTooLarge { .. }))
        ));
    }

    #[test]
    fn test_available_strategies_all_constructible() {
        for (name, description) in available_strategies() {
            assert!(!description.is_empty());
            let config = ChunkingConfig::default().strategy(name);
            assert!(create_chunker(&config).is_ok(), "{name}");
        }
    }
}
