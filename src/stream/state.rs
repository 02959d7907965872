//! Stream state machine.

use std::fmt;

/// State of a [`CompoundStream`](super::CompoundStream).
///
/// ```text
/// Closed ── append/insert ──► Good
/// Good   ── last file read ─► End
/// End    ── append/insert/putback/reset ──► Good
/// Good   ── I/O fault ──────► Error
/// Error  ── reset ──────────► Good, or Closed with no files
/// any    ── close ──────────► Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamState {
    /// The front file has data or can still be read.
    Good,
    /// Every file is exhausted; the last byte has been delivered.
    End,
    /// A read or resolution fault occurred. Sticky until reset.
    Error,
    /// No files: never opened, or closed.
    Closed,
}

impl StreamState {
    /// Check if reads can make progress.
    pub fn is_good(self) -> bool {
        self == Self::Good
    }

    /// Check if the stream has been fully consumed or closed.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::End | Self::Closed)
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Good => "good",
            Self::End => "end",
            Self::Error => "error",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(StreamState::Good.is_good());
        assert!(!StreamState::End.is_good());
        assert!(!StreamState::Error.is_good());
        assert!(!StreamState::Closed.is_good());

        assert!(StreamState::End.is_finished());
        assert!(StreamState::Closed.is_finished());
        assert!(!StreamState::Good.is_finished());
        assert!(!StreamState::Error.is_finished());
    }

    #[test]
    fn test_display() {
        assert_eq!(StreamState::Good.to_string(), "good");
        assert_eq!(StreamState::Closed.to_string(), "closed");
    }
}
