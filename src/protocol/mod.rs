//! Sentinel-framed line protocol.
//!
//! A worker and its caller exchange newline-terminated lines over two byte
//! streams:
//!
//! | Direction       | Line                      | Meaning                         |
//! |-----------------|---------------------------|---------------------------------|
//! | worker → caller | `<READY>`                 | worker is live                  |
//! | caller → worker | any other line            | request text                    |
//! | caller → worker | `<EOL>`                   | request complete, process it    |
//! | worker → caller | `{"token_count":..,"text":..}` | one chunk record           |
//! | worker → caller | `<EOL>`                   | batch complete                  |
//! | caller → worker | `<EXIT>`                  | terminate                       |
//!
//! There is no escaping: request text containing a line equal to a sentinel
//! is read as a control line by the worker.

pub mod emitter;
pub mod sentinel;
pub mod session;

pub use emitter::ChunkEmitter;
pub use sentinel::Sentinel;
pub use session::{Session, SessionState, SessionSummary, Termination};
