//! Stream position reported for diagnostics.

use std::fmt;
use std::path::PathBuf;

/// Where the next byte of a stream comes from.
///
/// `line` and `column` are 1-based and `offset` is a 0-based byte offset
/// within the current file. A stream with no open file reports
/// [`Location::empty`], whose numbers are all zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    /// The file name as the caller supplied it.
    pub name: String,
    /// The canonical path the name resolved to.
    pub resolved: PathBuf,
    /// Line of the next byte.
    pub line: usize,
    /// Column of the next byte.
    pub column: usize,
    /// Byte offset of the next byte.
    pub offset: usize,
}

impl Location {
    /// The location of a stream with no open file.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if this is the empty location.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.resolved.as_os_str().is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("<no input>");
        }
        write!(f, "{}:{}:{}", self.name, self.line, self.column)
    }
}
