//! Caller side of the worker protocol.
//!
//! [`ChunkerClient`] speaks the protocol over any reader/writer pair;
//! [`WorkerProcess`] spawns a worker and drives it through a client.

use crate::core::ChunkRecord;
use crate::error::{IoError, ProtocolError, Result};
use crate::io::LineReader;
use crate::protocol::Sentinel;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// Blocking client for a chunking worker.
///
/// # Examples
///
/// ```
/// use rag_chunker::client::ChunkerClient;
///
/// // Scripted worker output: handshake, one record, end of batch.
/// let worker_out = "<READY>\n{\"token_count\":2,\"text\":\"hi\"}\n<EOL>\n";
/// let mut sent = Vec::new();
///
/// let mut client = ChunkerClient::connect(worker_out.as_bytes(), &mut sent).unwrap();
/// let chunks = client.split("hi").unwrap();
/// assert_eq!(chunks[0].token_count, 2);
/// client.close().unwrap();
///
/// assert_eq!(String::from_utf8(sent).unwrap(), "hi\n<EOL>\n<EXIT>\n");
/// ```
#[derive(Debug)]
pub struct ChunkerClient<R, W> {
    lines: LineReader<R>,
    writer: W,
}

impl<R: BufRead, W: Write> ChunkerClient<R, W> {
    /// Waits for the worker's `<READY>` line.
    ///
    /// Lines before the handshake are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnexpectedEof`] if the stream closes first.
    pub fn connect(reader: R, writer: W) -> Result<Self> {
        let mut lines = LineReader::new(reader);
        loop {
            match lines.next_line()? {
                None => {
                    return Err(ProtocolError::UnexpectedEof {
                        expected: Sentinel::Ready.to_string(),
                    }
                    .into());
                }
                Some(line) if Sentinel::parse(&line) == Some(Sentinel::Ready) => break,
                Some(line) => tracing::debug!(%line, "skipping line before handshake"),
            }
        }
        tracing::debug!("worker handshake received");
        Ok(Self { lines, writer })
    }

    /// Sends `text` as one request and collects the resulting chunks.
    ///
    /// A single trailing newline on `text` is not preserved by the protocol.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::SentinelInText`] without sending anything if
    /// a line of `text` would be read as `<EOL>` or `<EXIT>`; otherwise an
    /// I/O or protocol error if the exchange fails.
    pub fn split(&mut self, text: &str) -> Result<Vec<ChunkRecord>> {
        ensure_no_control_lines(text)?;

        if !text.is_empty() {
            self.writer.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                self.writer.write_all(b"\n")?;
            }
        }
        writeln!(self.writer, "{}", Sentinel::Eol)?;
        self.writer.flush()?;

        let mut chunks = Vec::new();
        loop {
            let Some(line) = self.lines.next_line()? else {
                return Err(ProtocolError::UnexpectedEof {
                    expected: Sentinel::Eol.to_string(),
                }
                .into());
            };
            if Sentinel::parse(&line) == Some(Sentinel::Eol) {
                return Ok(chunks);
            }
            let chunk =
                ChunkRecord::from_json_line(&line).map_err(|e| ProtocolError::MalformedRecord {
                    reason: e.to_string(),
                    line,
                })?;
            chunks.push(chunk);
        }
    }

    /// Sends `<EXIT>` and releases the streams.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn close(mut self) -> Result<()> {
        writeln!(self.writer, "{}", Sentinel::Exit)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Rejects request text containing a line the worker treats as control.
///
/// Lines are split the way the worker reads them: on `\n`, with one
/// trailing `\r` removed. `split` terminates the final line, so a last
/// line of `<EOL>\r` arrives as `<EOL>\r\n` and counts too.
fn ensure_no_control_lines(text: &str) -> Result<()> {
    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(sentinel @ (Sentinel::Eol | Sentinel::Exit)) = Sentinel::parse(line) {
            return Err(ProtocolError::SentinelInText {
                line: sentinel.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

/// A spawned worker process with a connected client.
///
/// The worker's stderr is inherited so its logs reach the parent's stderr.
#[derive(Debug)]
pub struct WorkerProcess {
    child: Child,
    client: ChunkerClient<BufReader<ChildStdout>, ChildStdin>,
}

impl WorkerProcess {
    /// Spawns `command` as a worker and waits for its handshake.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started or exits before
    /// sending `<READY>`.
    pub fn spawn(mut command: Command) -> Result<Self> {
        let program = command.get_program().to_string_lossy().into_owned();
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        let mut child = command.spawn().map_err(|e| IoError::Spawn {
            program: program.clone(),
            reason: e.to_string(),
        })?;

        let pipes = child.stdin.take().zip(child.stdout.take());
        let Some((stdin, stdout)) = pipes else {
            let _ = child.kill();
            return Err(IoError::Spawn {
                program,
                reason: "worker pipes were not captured".to_string(),
            }
            .into());
        };

        tracing::info!(%program, pid = child.id(), "waiting for worker handshake");
        match ChunkerClient::connect(BufReader::new(stdout), stdin) {
            Ok(client) => Ok(Self { child, client }),
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(err)
            }
        }
    }

    /// Spawns the current executable in `serve` mode with extra arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable path is unknown or spawning fails.
    pub fn spawn_self<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let exe = std::env::current_exe()?;
        let mut command = Command::new(exe);
        command.arg("serve").args(args);
        Self::spawn(command)
    }

    /// OS process id of the worker.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Chunks `text` in the worker.
    ///
    /// # Errors
    ///
    /// See [`ChunkerClient::split`].
    pub fn split(&mut self, text: &str) -> Result<Vec<ChunkRecord>> {
        self.client.split(text)
    }

    /// Sends `<EXIT>` and waits for the worker to exit.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::WorkerExited`] if the worker exits
    /// unsuccessfully.
    pub fn close(self) -> Result<()> {
        let Self { mut child, client } = self;
        client.close()?;
        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(ProtocolError::WorkerExited {
                status: status.to_string(),
            }
            .into())
        }
    }
}
