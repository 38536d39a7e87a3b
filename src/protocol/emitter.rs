//! Chunk Emitter: writes records and sentinels to the output stream.
//!
//! Every write is followed by a flush. The caller does blocking reads on
//! the other end of the pipe, so data left in a buffer is a stall.

use crate::core::ChunkRecord;
use crate::error::{Error, IoError, Result};
use crate::protocol::Sentinel;
use std::io::Write;

/// Serializes chunk batches onto a line-oriented output stream.
#[derive(Debug)]
pub struct ChunkEmitter<W> {
    writer: W,
    records_written: usize,
}

impl<W: Write> ChunkEmitter<W> {
    /// Wraps an output stream.
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            records_written: 0,
        }
    }

    /// Writes the `<READY>` handshake line.
    ///
    /// # Errors
    ///
    /// Returns an error if the write or flush fails.
    pub fn ready(&mut self) -> Result<()> {
        self.sentinel(Sentinel::Ready)
    }

    /// Writes one record per chunk, then the closing `<EOL>`.
    ///
    /// An empty batch writes only `<EOL>`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, a write or a flush fails.
    pub fn emit_batch(&mut self, chunks: &[ChunkRecord]) -> Result<()> {
        for chunk in chunks {
            self.record(chunk)?;
        }
        self.sentinel(Sentinel::Eol)
    }

    /// Total records written over the emitter's lifetime.
    #[must_use]
    pub const fn records_written(&self) -> usize {
        self.records_written
    }

    /// Consumes the emitter, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn record(&mut self, chunk: &ChunkRecord) -> Result<()> {
        let line = chunk.to_json_line().map_err(|e| IoError::WriteFailed {
            target: "output stream".to_string(),
            reason: e.to_string(),
        })?;
        self.line(&line)?;
        self.records_written += 1;
        Ok(())
    }

    fn sentinel(&mut self, sentinel: Sentinel) -> Result<()> {
        tracing::trace!(%sentinel, "writing sentinel");
        self.line(sentinel.as_str())
    }

    fn line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}").map_err(write_error)?;
        self.writer.flush().map_err(write_error)
    }
}

fn write_error(err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::BrokenPipe {
        return err.into();
    }
    IoError::WriteFailed {
        target: "output stream".to_string(),
        reason: err.to_string(),
    }
    .into()
}
