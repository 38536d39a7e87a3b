//! # rag-chunker
//!
//! A long-lived, single-process worker that reads raw text from a byte
//! stream, splits it into chunks, and reports each chunk's token count and
//! text back over the same stream, framed by sentinel lines.
//!
//! ## Features
//!
//! - **Line protocol**: `<READY>` handshake, `<EOL>`-terminated requests and
//!   batches, `<EXIT>` shutdown, every line flushed
//! - **Pluggable chunkers**: the session depends only on the [`Chunker`]
//!   trait; recursive and fixed strategies ship with the crate
//! - **Client**: a blocking caller-side driver for spawned workers

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]

pub mod chunking;
pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod logging;
pub mod protocol;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

pub use core::ChunkRecord;

pub use config::ChunkingConfig;

pub use chunking::{
    Chunker, FixedChunker, RecursiveChunker, TokenCounter, available_strategies, create_chunker,
};

pub use protocol::{ChunkEmitter, Sentinel, Session, SessionState, SessionSummary, Termination};

pub use client::{ChunkerClient, WorkerProcess};

pub use cli::{Cli, Commands, OutputFormat};
