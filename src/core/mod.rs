//! Core domain models for rag-chunker.
//!
//! Pure data structures with no I/O dependencies.

pub mod chunk;

pub use chunk::ChunkRecord;
