//! Error types for rag-chunker operations.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! session protocol, the chunking strategies, I/O, configuration and CLI
//! commands. Inside a worker session every error is fatal: it propagates out
//! of the loop and the process exits, leaving recovery to the supervisor.

use thiserror::Error;

/// Result type alias for rag-chunker operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Line protocol violations (client side).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Chunking-related errors (text processing).
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkingError),

    /// I/O errors (streams, files, child processes).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Errors raised while speaking the sentinel protocol.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The stream closed before the expected line arrived.
    #[error("stream closed while waiting for {expected}")]
    UnexpectedEof {
        /// What the reader was waiting for.
        expected: String,
    },

    /// A chunk record line could not be decoded.
    #[error("malformed chunk record {line:?}: {reason}")]
    MalformedRecord {
        /// The offending line.
        line: String,
        /// Decoder message.
        reason: String,
    },

    /// Request text contains a line the worker would read as a control line.
    #[error("request text contains sentinel line {line:?}")]
    SentinelInText {
        /// The sentinel that appeared in the text.
        line: String,
    },

    /// The worker process exited unsuccessfully.
    #[error("worker exited with {status}")]
    WorkerExited {
        /// Exit status description.
        status: String,
    },
}

/// Chunking-specific errors.
#[derive(Error, Debug)]
pub enum ChunkingError {
    /// Invalid chunk configuration.
    #[error("invalid chunk configuration: {reason}")]
    InvalidConfig {
        /// Reason the configuration is invalid.
        reason: String,
    },

    /// Overlap exceeds chunk size.
    #[error("overlap {overlap} must be less than chunk size {size}")]
    OverlapTooLarge {
        /// Overlap size.
        overlap: usize,
        /// Chunk size.
        size: usize,
    },

    /// Unknown chunking strategy.
    #[error("unknown chunking strategy: {name}")]
    UnknownStrategy {
        /// Name of the unknown strategy.
        name: String,
    },

    /// Unknown token counter.
    #[error("unknown token counter: {name}")]
    UnknownTokenCounter {
        /// Name of the unknown counter.
        name: String,
    },

    /// Regex compilation error.
    #[error("regex error: {0}")]
    Regex(String),
}

/// I/O-specific errors.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read from a file or stream.
    #[error("failed to read {source_name}: {reason}")]
    ReadFailed {
        /// File path or stream name.
        source_name: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to write to a file or stream.
    #[error("failed to write {target}: {reason}")]
    WriteFailed {
        /// File path or stream name.
        target: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to start a worker process.
    #[error("failed to spawn {program}: {reason}")]
    Spawn {
        /// Program that could not be started.
        program: String,
        /// Reason for failure.
        reason: String,
    },

    /// The peer closed its end of a pipe.
    #[error("broken pipe: {0}")]
    BrokenPipe(String),

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Output format error.
    #[error("output format error: {0}")]
    OutputFormat(String),
}

impl Error {
    /// Returns true when the error came from the peer closing a pipe.
    #[must_use]
    pub const fn is_broken_pipe(&self) -> bool {
        matches!(self, Self::Io(IoError::BrokenPipe(_)))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::BrokenPipe {
            Self::Io(IoError::BrokenPipe(err.to_string()))
        } else {
            Self::Io(IoError::Generic(err.to_string()))
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Command(CommandError::OutputFormat(err.to_string()))
    }
}

impl From<regex::Error> for ChunkingError {
    fn from(err: regex::Error) -> Self {
        Self::Regex(err.to_string())
    }
}
