//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::config::ChunkingConfig;
use crate::error::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// rag-chunker: text chunking worker.
///
/// Runs as a long-lived worker speaking a sentinel-framed line protocol
/// on stdin/stdout, or chunks a single document on demand.
#[derive(Parser, Debug)]
#[command(name = "rag-chunker")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a JSON chunking configuration file.
    #[arg(short, long, env = "RAG_CHUNKER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    ///
    /// Logs always go to stderr.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Output format for one-shot commands (text, json, ndjson).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// Chunking overrides.
    #[command(flatten)]
    pub chunking: ChunkingArgs,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that override values from the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct ChunkingArgs {
    /// Chunking strategy (recursive, fixed).
    #[arg(short, long, env = "RAG_CHUNKER_STRATEGY", global = true)]
    pub strategy: Option<String>,

    /// Maximum chunk size in tokens.
    #[arg(long, global = true)]
    pub chunk_size: Option<usize>,

    /// Overlap between consecutive chunks (fixed strategy).
    #[arg(long, global = true)]
    pub overlap: Option<usize>,

    /// Minimum characters per chunk before merging into the previous one.
    #[arg(long, global = true)]
    pub min_chars: Option<usize>,

    /// Token counter (character, word, estimate).
    #[arg(long, global = true)]
    pub token_counter: Option<String>,
}

impl ChunkingArgs {
    /// Applies the flags that were given on top of `config`.
    #[must_use]
    pub fn apply(&self, mut config: ChunkingConfig) -> ChunkingConfig {
        if let Some(strategy) = &self.strategy {
            config = config.strategy(strategy);
        }
        if let Some(size) = self.chunk_size {
            config = config.chunk_size(size);
        }
        if let Some(overlap) = self.overlap {
            config = config.overlap(overlap);
        }
        if let Some(min) = self.min_chars {
            config = config.min_characters_per_chunk(min);
        }
        if let Some(counter) = &self.token_counter {
            config = config.token_counter(counter);
        }
        config
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the worker protocol on stdin/stdout until <EXIT> or end of input.
    #[command(alias = "repr")]
    Serve,

    /// Chunk a file (or stdin) once and print the chunks.
    Chunk {
        /// Input file; reads stdin when omitted.
        file: Option<PathBuf>,
    },

    /// List chunking strategies and token counters.
    Strategies,
}

impl Cli {
    /// Resolves the effective chunking configuration: file (or defaults),
    /// then flag overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but is invalid.
    pub fn chunking_config(&self) -> Result<ChunkingConfig> {
        let base = ChunkingConfig::load(self.config.as_deref())?;
        Ok(self.chunking.apply(base))
    }
}
