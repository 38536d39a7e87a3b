//! Protocol control lines.

use std::fmt;

/// A reserved line exchanged as a control signal rather than data.
///
/// Sentinels carry no payload and are compared exactly, after the line
/// terminator has been stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    /// Worker → caller: the worker is live and accepts requests.
    Ready,
    /// Caller → worker: request text is complete. Worker → caller: all
    /// records for the request have been sent.
    Eol,
    /// Caller → worker: terminate the session.
    Exit,
}

impl Sentinel {
    /// Every sentinel.
    pub const ALL: [Self; 3] = [Self::Ready, Self::Eol, Self::Exit];

    /// The exact line content of this sentinel.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "<READY>",
            Self::Eol => "<EOL>",
            Self::Exit => "<EXIT>",
        }
    }

    /// Recognizes a terminator-stripped line as a sentinel.
    ///
    /// ```
    /// use rag_chunker::protocol::Sentinel;
    ///
    /// assert_eq!(Sentinel::parse("<EOL>"), Some(Sentinel::Eol));
    /// assert_eq!(Sentinel::parse(" <EOL>"), None);
    /// assert_eq!(Sentinel::parse("hello"), None);
    /// ```
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == line)
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
