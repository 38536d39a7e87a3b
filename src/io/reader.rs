//! Line and file reading utilities.
//!
//! The worker reads its input stream one line at a time with
//! [`LineReader`], which never rejects input: bytes that are not valid
//! UTF-8 are decoded lossily. Whole-file reads serve the one-shot `chunk`
//! command.

use crate::error::{IoError, Result};
use std::borrow::Cow;
use std::io::{BufRead, Read};
use std::path::Path;

/// Strips one trailing line terminator (`\n` or `\r\n`) from `line`.
///
/// # Examples
///
/// ```
/// use rag_chunker::io::strip_terminator;
///
/// assert_eq!(strip_terminator("hello\n"), "hello");
/// assert_eq!(strip_terminator("hello\r\n"), "hello");
/// assert_eq!(strip_terminator("hello"), "hello");
/// assert_eq!(strip_terminator("a\n\n"), "a\n");
/// ```
#[must_use]
pub fn strip_terminator(line: &str) -> &str {
    line.strip_suffix('\n')
        .map_or(line, |rest| rest.strip_suffix('\r').unwrap_or(rest))
}

/// Reads newline-terminated lines from a buffered stream.
///
/// Each returned line has its terminator removed. A final line without a
/// terminator is still returned.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    lines_read: usize,
}

impl<R: BufRead> LineReader<R> {
    /// Wraps a buffered reader.
    pub const fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            lines_read: 0,
        }
    }

    /// Reads the next line, or `None` once the stream is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        let read = self
            .inner
            .read_until(b'\n', &mut self.buf)
            .map_err(|e| IoError::ReadFailed {
                source_name: "input stream".to_string(),
                reason: e.to_string(),
            })?;
        if read == 0 {
            return Ok(None);
        }
        self.lines_read += 1;

        let decoded = String::from_utf8_lossy(&self.buf);
        if matches!(decoded, Cow::Owned(_)) {
            tracing::debug!(line = self.lines_read, "replaced invalid UTF-8 in input line");
        }
        Ok(Some(strip_terminator(&decoded).to_string()))
    }

    /// Number of lines returned so far.
    #[must_use]
    pub const fn lines_read(&self) -> usize {
        self.lines_read
    }
}

/// Reads a whole file as text.
///
/// # Errors
///
/// Returns an error if the file doesn't exist or can't be read as UTF-8.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path_ref = path.as_ref();
    let path_str = path_ref.to_string_lossy().to_string();

    if !path_ref.exists() {
        return Err(IoError::FileNotFound { path: path_str }.into());
    }

    std::fs::read_to_string(path_ref).map_err(|e| {
        IoError::ReadFailed {
            source_name: path_str,
            reason: e.to_string(),
        }
        .into()
    })
}

/// Reads all of `reader` as text (used for stdin).
///
/// # Errors
///
/// Returns an error if reading fails or the content is not valid UTF-8.
pub fn read_all<R: Read>(mut reader: R) -> Result<String> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| IoError::ReadFailed {
            source_name: "stdin".to_string(),
            reason: e.to_string(),
        })?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_strip_terminator_only_one() {
        assert_eq!(strip_terminator("\n"), "");
        assert_eq!(strip_terminator("\r\n"), "");
        assert_eq!(strip_terminator("x\r"), "x\r");
        assert_eq!(strip_terminator(""), "");
    }

    #[test]
    fn test_line_reader_lines() {
        let mut reader = LineReader::new(Cursor::new("one\r\ntwo\n\nlast"));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("one"));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("two"));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("last"));
        assert_eq!(reader.next_line().unwrap(), None);
        assert_eq!(reader.lines_read(), 4);
    }

    #[test]
    fn test_line_reader_lossy_utf8() {
        let bytes: Vec<u8> = vec![b'a', 0xFF, b'b', b'\n'];
        let mut reader = LineReader::new(Cursor::new(bytes));
        assert_eq!(
            reader.next_line().unwrap().as_deref(),
            Some("a\u{FFFD}b")
        );
    }

    #[test]
    fn test_read_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "content here").unwrap();
        assert_eq!(read_file(file.path()).unwrap(), "content here");
    }

    #[test]
    fn test_read_file_missing() {
        let result = read_file("/nonexistent/path/to/file.txt");
        assert!(matches!(
            result,
            Err(crate::Error::Io(IoError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_read_all() {
        assert_eq!(read_all(Cursor::new("abc\n")).unwrap(), "abc\n");
    }
}
