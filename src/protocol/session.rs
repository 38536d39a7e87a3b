//! Session Loop: the worker's request state machine.
//!
//! ```text
//! AwaitingReadySent --(write <READY>)--> Reading
//! Reading --(text line)--> Reading          buffer grows
//! Reading --(<EOL>)------> Reading          chunk buffer, emit batch, clear
//! Reading --(<EXIT>)-----> Terminated       buffer discarded
//! Reading --(end of input)-> Terminated     buffer discarded
//! ```
//!
//! There is no error state. Any line that is not `<EXIT>` or `<EOL>` is
//! request text. Errors from the chunker or the output stream end the
//! session by propagating to the caller.

use crate::chunking::Chunker;
use crate::error::Result;
use crate::io::LineReader;
use crate::protocol::{ChunkEmitter, Sentinel};
use std::io::{BufRead, Write};
use std::ops::ControlFlow;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed; the handshake has not been written yet.
    AwaitingReadySent,
    /// Accumulating request lines. Steady state.
    Reading,
    /// Finished; no further input is consumed.
    Terminated,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The caller sent `<EXIT>`.
    Exit,
    /// The input stream closed.
    EndOfStream,
}

/// Totals reported when a session ends. Not visible on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Why the session ended.
    pub outcome: Termination,
    /// Requests processed (one per `<EOL>` received).
    pub requests: usize,
    /// Chunk records emitted across all requests.
    pub chunks: usize,
    /// Buffered lines of an unterminated request that were dropped.
    pub discarded_lines: usize,
}

/// One worker session.
///
/// Owns the chunker and the request buffer. Nothing else reads or writes
/// the buffer, so independent sessions can be driven side by side in tests.
///
/// # Examples
///
/// ```
/// use rag_chunker::chunking::create_chunker;
/// use rag_chunker::config::ChunkingConfig;
/// use rag_chunker::protocol::{Session, Termination};
///
/// let chunker = create_chunker(&ChunkingConfig::default()).unwrap();
/// let input = "hello\n<EOL>\n<EXIT>\n".as_bytes();
/// let mut output = Vec::new();
///
/// let summary = Session::new(chunker).run(input, &mut output).unwrap();
/// assert_eq!(summary.outcome, Termination::Exit);
/// assert_eq!(
///     String::from_utf8(output).unwrap(),
///     "<READY>\n{\"token_count\":5,\"text\":\"hello\"}\n<EOL>\n"
/// );
/// ```
#[derive(Debug)]
pub struct Session<C> {
    chunker: C,
    buffer: Vec<String>,
    state: SessionState,
    outcome: Option<Termination>,
    requests: usize,
    chunks: usize,
    discarded_lines: usize,
}

impl<C: Chunker> Session<C> {
    /// Creates a session around a chunker.
    pub const fn new(chunker: C) -> Self {
        Self {
            chunker,
            buffer: Vec::new(),
            state: SessionState::AwaitingReadySent,
            outcome: None,
            requests: 0,
            chunks: 0,
            discarded_lines: 0,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Number of lines buffered for the request in progress.
    #[must_use]
    pub const fn buffered_lines(&self) -> usize {
        self.buffer.len()
    }

    /// Runs the whole session: handshake, then one line at a time until
    /// `<EXIT>` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input, chunking, or writing output fails.
    /// All of these are fatal for the worker.
    pub fn run<R: BufRead, W: Write>(mut self, input: R, output: W) -> Result<SessionSummary> {
        let mut emitter = ChunkEmitter::new(output);
        let mut lines = LineReader::new(input);

        self.start(&mut emitter)?;

        let outcome = loop {
            let Some(line) = lines.next_line()? else {
                break Termination::EndOfStream;
            };
            if let ControlFlow::Break(outcome) = self.handle_line(line, &mut emitter)? {
                break outcome;
            }
        };

        Ok(self.finish(outcome))
    }

    /// Writes the `<READY>` handshake and enters the reading state.
    ///
    /// Does nothing once the handshake has been sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the handshake cannot be written.
    pub fn start<W: Write>(&mut self, emitter: &mut ChunkEmitter<W>) -> Result<()> {
        if self.state != SessionState::AwaitingReadySent {
            return Ok(());
        }
        emitter.ready()?;
        self.state = SessionState::Reading;
        tracing::info!(strategy = self.chunker.name(), "worker ready");
        Ok(())
    }

    /// Feeds one terminator-stripped input line through the state machine.
    ///
    /// Sends the handshake first if it has not gone out yet. Returns
    /// `Break` once the session has terminated.
    ///
    /// # Errors
    ///
    /// Returns an error if chunking or writing output fails.
    pub fn handle_line<W: Write>(
        &mut self,
        line: String,
        emitter: &mut ChunkEmitter<W>,
    ) -> Result<ControlFlow<Termination>> {
        if let Some(outcome) = self.outcome {
            return Ok(ControlFlow::Break(outcome));
        }
        self.start(emitter)?;

        match Sentinel::parse(&line) {
            Some(Sentinel::Exit) => {
                self.finish(Termination::Exit);
                Ok(ControlFlow::Break(Termination::Exit))
            }
            Some(Sentinel::Eol) => {
                self.process_request(emitter)?;
                Ok(ControlFlow::Continue(()))
            }
            _ => {
                self.buffer.push(line);
                Ok(ControlFlow::Continue(()))
            }
        }
    }

    /// Terminates the session, dropping any unterminated request, and
    /// returns the totals. Idempotent.
    pub fn finish(&mut self, outcome: Termination) -> SessionSummary {
        if self.outcome.is_none() {
            self.discarded_lines = self.buffer.len();
            self.buffer.clear();
            self.outcome = Some(outcome);
            self.state = SessionState::Terminated;

            if self.discarded_lines > 0 {
                tracing::debug!(
                    lines = self.discarded_lines,
                    "discarding unterminated request"
                );
            }
            tracing::info!(
                ?outcome,
                requests = self.requests,
                chunks = self.chunks,
                "session terminated"
            );
        }
        self.summary()
    }

    fn summary(&self) -> SessionSummary {
        SessionSummary {
            outcome: self.outcome.unwrap_or(Termination::EndOfStream),
            requests: self.requests,
            chunks: self.chunks,
            discarded_lines: self.discarded_lines,
        }
    }

    fn process_request<W: Write>(&mut self, emitter: &mut ChunkEmitter<W>) -> Result<()> {
        let lines = self.buffer.len();
        let text = self.buffer.join("\n");
        self.buffer.clear();

        let chunks = self.chunker.chunk(&text)?;
        emitter.emit_batch(&chunks)?;

        self.requests += 1;
        self.chunks += chunks.len();
        tracing::debug!(
            request = self.requests,
            lines,
            bytes = text.len(),
            chunks = chunks.len(),
            "request processed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChunkRecord;
    use crate::error::{ChunkingError, Error};
    use std::cell::RefCell;

    /// Records every text it is asked to chunk and answers from a script.
    #[derive(Default)]
    struct StubChunker {
        calls: RefCell<Vec<String>>,
        reply: Vec<ChunkRecord>,
    }

    impl StubChunker {
        fn replying(reply: Vec<ChunkRecord>) -> Self {
            Self {
                calls: RefCell::default(),
                reply,
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl Chunker for StubChunker {
        fn chunk(&self, text: &str) -> Result<Vec<ChunkRecord>> {
            self.calls.borrow_mut().push(text.to_string());
            Ok(self.reply.clone())
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    struct FailingChunker;

    impl Chunker for FailingChunker {
        fn chunk(&self, _text: &str) -> Result<Vec<ChunkRecord>> {
            Err(ChunkingError::InvalidConfig {
                reason: "boom".to_string(),
            }
            .into())
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn run(stub: &StubChunker, input: &str) -> (SessionSummary, String) {
        let mut output = Vec::new();
        let summary = Session::new(stub).run(input.as_bytes(), &mut output).unwrap();
        (summary, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_single_line_request() {
        let stub = StubChunker::replying(vec![ChunkRecord::new(2, "hello")]);
        let (summary, output) = run(&stub, "hello\n<EOL>\n");

        assert_eq!(stub.calls(), vec!["hello"]);
        assert_eq!(
            output,
            "<READY>\n{\"token_count\":2,\"text\":\"hello\"}\n<EOL>\n"
        );
        assert_eq!(summary.outcome, Termination::EndOfStream);
        assert_eq!(summary.requests, 1);
        assert_eq!(summary.chunks, 1);
    }

    #[test]
    fn test_multi_line_request_joined_with_newlines() {
        let stub = StubChunker::default();
        run(&stub, "line1\nline2\n<EOL>\n");
        assert_eq!(stub.calls(), vec!["line1\nline2"]);
    }

    #[test]
    fn test_blank_lines_preserved() {
        let stub = StubChunker::default();
        run(&stub, "a\n\n\nb\n<EOL>\n");
        assert_eq!(stub.calls(), vec!["a\n\n\nb"]);
    }

    #[test]
    fn test_crlf_terminators_stripped() {
        let stub = StubChunker::default();
        run(&stub, "a\r\nb\r\n<EOL>\r\n");
        assert_eq!(stub.calls(), vec!["a\nb"]);
    }

    #[test]
    fn test_exit_first_line() {
        let stub = StubChunker::default();
        let (summary, output) = run(&stub, "<EXIT>\nignored\n<EOL>\n");

        assert!(stub.calls().is_empty());
        assert_eq!(output, "<READY>\n");
        assert_eq!(summary.outcome, Termination::Exit);
        assert_eq!(summary.requests, 0);
    }

    #[test]
    fn test_exit_discards_buffered_text() {
        let stub = StubChunker::default();
        let (summary, output) = run(&stub, "pending\nmore\n<EXIT>\n");

        assert!(stub.calls().is_empty());
        assert_eq!(output, "<READY>\n");
        assert_eq!(summary.discarded_lines, 2);
    }

    #[test]
    fn test_end_of_stream_drops_partial_request() {
        let stub = StubChunker::default();
        let (summary, output) = run(&stub, "one\n<EOL>\npartial");

        assert_eq!(stub.calls(), vec!["one"]);
        assert_eq!(output, "<READY>\n<EOL>\n");
        assert_eq!(summary.outcome, Termination::EndOfStream);
        assert_eq!(summary.discarded_lines, 1);
    }

    #[test]
    fn test_empty_request_yields_bare_eol() {
        let stub = StubChunker::default();
        let (_, output) = run(&stub, "<EOL>\n<EOL>\n");

        assert_eq!(stub.calls(), vec!["", ""]);
        assert_eq!(output, "<READY>\n<EOL>\n<EOL>\n");
    }

    #[test]
    fn test_requests_processed_in_order() {
        let stub = StubChunker::replying(vec![ChunkRecord::new(1, "x")]);
        let (summary, output) = run(&stub, "first\n<EOL>\nsecond\n<EOL>\n<EXIT>\n");

        assert_eq!(stub.calls(), vec!["first", "second"]);
        assert_eq!(output.matches("<EOL>").count(), 2);
        assert_eq!(summary.requests, 2);
        assert_eq!(summary.chunks, 2);
    }

    #[test]
    fn test_ready_line_from_caller_is_text() {
        let stub = StubChunker::default();
        run(&stub, "<READY>\n<EOL>\n");
        assert_eq!(stub.calls(), vec!["<READY>"]);
    }

    #[test]
    fn test_empty_input_still_handshakes() {
        let stub = StubChunker::default();
        let (summary, output) = run(&stub, "");
        assert_eq!(output, "<READY>\n");
        assert_eq!(summary.outcome, Termination::EndOfStream);
    }

    #[test]
    fn test_state_transitions() {
        let stub = StubChunker::default();
        let mut session = Session::new(&stub);
        let mut emitter = ChunkEmitter::new(Vec::new());
        assert_eq!(session.state(), SessionState::AwaitingReadySent);

        let flow = session.handle_line("text".to_string(), &mut emitter).unwrap();
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(session.state(), SessionState::Reading);
        assert_eq!(session.buffered_lines(), 1);

        let flow = session.handle_line("<EOL>".to_string(), &mut emitter).unwrap();
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(session.state(), SessionState::Reading);
        assert_eq!(session.buffered_lines(), 0);

        let flow = session.handle_line("<EXIT>".to_string(), &mut emitter).unwrap();
        assert_eq!(flow, ControlFlow::Break(Termination::Exit));
        assert_eq!(session.state(), SessionState::Terminated);

        // Terminated sessions consume nothing further.
        let flow = session.handle_line("<EOL>".to_string(), &mut emitter).unwrap();
        assert_eq!(flow, ControlFlow::Break(Termination::Exit));
        assert_eq!(stub.calls(), vec!["text"]);

        let output = String::from_utf8(emitter.into_inner()).unwrap();
        assert_eq!(output, "<READY>\n<EOL>\n");
    }

    #[test]
    fn test_start_is_idempotent() {
        let stub = StubChunker::default();
        let mut session = Session::new(&stub);
        let mut emitter = ChunkEmitter::new(Vec::new());
        session.start(&mut emitter).unwrap();
        session.start(&mut emitter).unwrap();
        assert_eq!(String::from_utf8(emitter.into_inner()).unwrap(), "<READY>\n");
    }

    #[test]
    fn test_chunker_failure_is_fatal() {
        let mut output = Vec::new();
        let result = Session::new(FailingChunker).run("text\n<EOL>\nnext\n<EOL>\n".as_bytes(), &mut output);

        assert!(matches!(result, Err(Error::Chunking(_))));
        // Handshake went out; no partial batch was closed.
        assert_eq!(String::from_utf8(output).unwrap(), "<READY>\n");
    }

    #[test]
    fn test_independent_sessions() {
        let first = StubChunker::default();
        let second = StubChunker::default();
        let mut a = Session::new(&first);
        let mut b = Session::new(&second);
        let mut out_a = ChunkEmitter::new(Vec::new());
        let mut out_b = ChunkEmitter::new(Vec::new());

        let flow_a = a.handle_line("only in a".to_string(), &mut out_a).unwrap();
        let flow_b = b.handle_line("<EOL>".to_string(), &mut out_b).unwrap();
        assert_eq!(flow_a, ControlFlow::Continue(()));
        assert_eq!(flow_b, ControlFlow::Continue(()));

        assert_eq!(a.buffered_lines(), 1);
        assert_eq!(second.calls(), vec![""]);
        assert!(first.calls().is_empty());
    }
}
