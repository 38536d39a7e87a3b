//! Chunking configuration.
//!
//! Settings come from an optional JSON file, then CLI flags override
//! individual fields. A config path that does not exist falls back to the
//! defaults; a file that exists but does not parse is an error.

use crate::error::{ChunkingError, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default strategy name.
pub const DEFAULT_STRATEGY: &str = "recursive";

/// Default maximum chunk size, in tokens of the configured counter.
pub const DEFAULT_CHUNK_SIZE: usize = 2048;

/// Default minimum characters per chunk before it is merged into its
/// predecessor.
pub const DEFAULT_MIN_CHARACTERS: usize = 24;

/// Default token counter name.
pub const DEFAULT_TOKEN_COUNTER: &str = "character";

/// Configuration shared by all chunking strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Strategy name (`recursive` or `fixed`).
    pub strategy: String,

    /// Maximum chunk size in tokens.
    pub chunk_size: usize,

    /// Overlap between consecutive chunks (fixed strategy only).
    pub overlap: usize,

    /// Chunks shorter than this many characters are merged into the
    /// previous chunk when the result still fits.
    pub min_characters_per_chunk: usize,

    /// Token counter name (`character`, `word`, `estimate`).
    pub token_counter: String,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            strategy: DEFAULT_STRATEGY.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: 0,
            min_characters_per_chunk: DEFAULT_MIN_CHARACTERS,
            token_counter: DEFAULT_TOKEN_COUNTER.to_string(),
        }
    }
}

impl ChunkingConfig {
    /// Loads configuration from a JSON file.
    ///
    /// `None` or a path that does not exist yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        if !path.exists() {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("{}: {e}", path.display()),
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| Error::Config {
            message: format!("{}: {e}", path.display()),
        })?;

        tracing::debug!(path = %path.display(), ?config, "loaded chunking config");
        Ok(config)
    }

    /// Sets the strategy name.
    #[must_use]
    pub fn strategy(mut self, strategy: &str) -> Self {
        self.strategy = strategy.to_string();
        self
    }

    /// Sets the chunk size.
    #[must_use]
    pub const fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the overlap.
    #[must_use]
    pub const fn overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    /// Sets the minimum characters per chunk.
    #[must_use]
    pub const fn min_characters_per_chunk(mut self, min: usize) -> Self {
        self.min_characters_per_chunk = min;
        self
    }

    /// Sets the token counter name.
    #[must_use]
    pub fn token_counter(mut self, counter: &str) -> Self {
        self.token_counter = counter.to_string();
        self
    }

    /// Validates size settings.
    ///
    /// The overlap bound applies to every strategy, including those that
    /// ignore `overlap`, so a config stays valid when only the strategy
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns an error if chunk size is zero or overlap is not smaller
    /// than the chunk size.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChunkingError::InvalidConfig {
                reason: "chunk_size must be > 0".to_string(),
            }
            .into());
        }
        if self.overlap >= self.chunk_size {
            return Err(ChunkingError::OverlapTooLarge {
                overlap: self.overlap,
                size: self.chunk_size,
            }
            .into());
        }
        Ok(())
    }
}
