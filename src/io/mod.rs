//! I/O utilities for rag-chunker.
//!
//! Line-oriented stream reading for the worker protocol, whole-file reads
//! for one-shot chunking, and Unicode boundary helpers.

pub mod reader;
pub mod unicode;

pub use reader::{LineReader, read_all, read_file, strip_terminator};
pub use unicode::find_char_boundary;
