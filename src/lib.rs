//! # compound-source
//!
//! Read an ordered stack of files as one seamless byte stream.
//!
//! This crate is the input device for a translator that works on many
//! source files at once: the files are resolved (optionally against a
//! search path), opened eagerly, and served as a single stream. It supports
//! what a hand-written lexer needs:
//!
//! - **Boundary-crossing reads**: one `read` call may span any number of files
//! - **Mid-stream inclusion**: `insert` makes a file the very next input
//! - **Putback**: push bytes back for lookahead, any number at a time
//! - **Locations**: name, resolved path, line, column and offset of the
//!   next byte, for diagnostics
//!
//! ## Quick Start
//!
//! ```ignore
//! use compound_source::CompoundStream;
//!
//! let mut stream = CompoundStream::open(["main.lp", "facts.lp"])?;
//!
//! while let Some(byte) = stream.get()? {
//!     if byte == b'#' {
//!         // an include directive: read the rest of it, then
//!         stream.insert("included.lp")?;
//!     }
//! }
//! ```
//!
//! ## Failure Policy
//!
//! Opening a list of files is best effort: every name is attempted, the
//! ones that fail are reported together in a [`PartialOpen`], and the ones
//! that succeeded stay usable. A read fault puts the stream in
//! [`StreamState::Error`], which sticks until [`CompoundStream::reset`].
//!
//! ## Modules
//!
//! - [`stream`]: the stream device, its state and locations
//! - [`resource`]: name validation, search paths, file handles
//! - [`config`]: input configuration and builder
//! - [`diagnostic`]: diagnostics anchored at a stream location
//! - [`error`]: error types

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod prelude;
pub mod resource;
pub mod stream;

// =============================================================================
// Stream
// =============================================================================

pub use stream::{CompoundStream, HISTORY_LIMIT, Location, PUSHBACK_BLOCK, StreamState};

// =============================================================================
// Inputs
// =============================================================================

pub use config::{Config, ConfigBuilder};
pub use resource::{EncodingContext, SearchPath};

// =============================================================================
// Errors
// =============================================================================

pub use error::{PartialOpen, Result, StreamError};

// =============================================================================
// Diagnostics
// =============================================================================

pub use diagnostic::{Diagnostic, DiagnosticOptions, DisplayStyle, Severity, format_diagnostics};
