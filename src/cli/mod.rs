//! CLI layer for rag-chunker.
//!
//! Provides the command-line interface using clap: the `serve` worker
//! mode plus one-shot `chunk` and `strategies` commands.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{ChunkingArgs, Cli, Commands};
