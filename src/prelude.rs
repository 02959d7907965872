//! Prelude module for convenient imports.
//!
//! ```ignore
//! use compound_source::prelude::*;
//! ```

// Stream
pub use crate::stream::{CompoundStream, Location, StreamState};

// Inputs
pub use crate::config::{Config, ConfigBuilder};
pub use crate::resource::{EncodingContext, SearchPath};

// Errors
pub use crate::error::{PartialOpen, Result, StreamError};

// Diagnostics
pub use crate::diagnostic::{Diagnostic, DiagnosticOptions, DisplayStyle, Severity};
