//! Error types for the compound stream.

use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::stream::CompoundStream;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StreamError>;

/// Error type for stream operations.
///
/// End-of-file is never reported through this type: it is the normal
/// [`StreamState::End`](crate::StreamState::End) state.
///
/// # Example
///
/// ```ignore
/// match stream.append("defs.lp") {
///     Ok(()) => {}
///     Err(StreamError::NotFound { names }) => {
///         eprintln!("missing: {names:?}");
///     }
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum StreamError {
    /// One or more file names could not be resolved or opened.
    #[error("{}", not_found_message(.names))]
    NotFound {
        /// The names as the caller supplied them, in request order.
        names: Vec<String>,
    },

    /// The operation is not allowed in the stream's current state.
    #[error("invalid stream state: {reason}")]
    InvalidState {
        /// What went wrong and how to recover.
        reason: String,
    },

    /// The underlying handle failed with something other than end-of-file.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// Resolved path of the file being read.
        path: PathBuf,
        /// The handle's error.
        #[source]
        source: io::Error,
    },
}

impl StreamError {
    /// Create a not-found error for a single name.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            names: vec![name.into()],
        }
    }

    /// Create an invalid-state error.
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    /// Check if this error reports unresolved files.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error reports a rejected operation.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    /// Get the unresolved names if this is a not-found error.
    pub fn missing_names(&self) -> &[String] {
        match self {
            Self::NotFound { names } => names,
            _ => &[],
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::Io { source, .. } => source,
            StreamError::NotFound { .. } => io::Error::new(io::ErrorKind::NotFound, err),
            StreamError::InvalidState { .. } => io::Error::other(err),
        }
    }
}

fn not_found_message(names: &[String]) -> String {
    match names {
        [name] => format!(
            "an error occurred opening the file '{name}'; \
             check that the file exists and you have permission to read it"
        ),
        _ => {
            let mut msg = String::from("the following files could not be opened for reading: ");
            for (i, name) in names.iter().enumerate() {
                if i > 0 {
                    msg.push_str(", ");
                }
                let _ = write!(msg, "'{name}'");
            }
            msg.push_str("; check that the files exist and you have permission to read them");
            msg
        }
    }
}

/// A multi-file open that partly failed.
///
/// Construction is best effort: every name is attempted, the failures are
/// collected into one [`StreamError::NotFound`], and the files that did
/// resolve stay usable in the returned stream (which is left in the
/// `Error` state until [`CompoundStream::reset`] is called).
#[derive(Debug, Error)]
#[error("{error}")]
pub struct PartialOpen {
    #[source]
    error: StreamError,
    stream: Box<CompoundStream>,
}

impl PartialOpen {
    pub(crate) fn new(error: StreamError, stream: CompoundStream) -> Self {
        Self {
            error,
            stream: Box::new(stream),
        }
    }

    /// The aggregated error.
    pub fn error(&self) -> &StreamError {
        &self.error
    }

    /// Names that could not be resolved, in input order.
    pub fn missing_names(&self) -> &[String] {
        self.error.missing_names()
    }

    /// The partially opened stream.
    pub fn stream(&self) -> &CompoundStream {
        &self.stream
    }

    /// Take the partially opened stream.
    pub fn into_stream(self) -> CompoundStream {
        *self.stream
    }

    /// Split into the error and the stream.
    pub fn into_parts(self) -> (StreamError, CompoundStream) {
        (self.error, *self.stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_not_found_message() {
        let err = StreamError::not_found("rules.lp");
        assert!(err.to_string().contains("'rules.lp'"));
        assert!(err.is_not_found());
        assert_eq!(err.missing_names(), ["rules.lp".to_string()]);
    }

    #[test]
    fn test_multi_not_found_message() {
        let err = StreamError::NotFound {
            names: vec!["a".into(), "b".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'a', 'b'"));
        assert!(msg.starts_with("the following files"));
    }

    #[test]
    fn test_invalid_state() {
        let err = StreamError::invalid_state("reset first");
        assert!(err.is_invalid_state());
        assert!(err.missing_names().is_empty());
        assert_eq!(err.to_string(), "invalid stream state: reset first");
    }

    #[test]
    fn test_into_io_error() {
        let err: io::Error = StreamError::not_found("x").into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        let err: io::Error = StreamError::Io {
            path: PathBuf::from("/tmp/x"),
            source: io::Error::new(io::ErrorKind::InvalidData, "bad"),
        }
        .into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_partial_open_exposes_source() {
        use std::error::Error as _;

        let err = PartialOpen::new(StreamError::not_found("gone.lp"), CompoundStream::new());
        assert_eq!(err.to_string(), err.error().to_string());

        let source = err.source().unwrap();
        assert_eq!(source.to_string(), err.error().to_string());
        assert!(source.downcast_ref::<StreamError>().unwrap().is_not_found());
    }
}
