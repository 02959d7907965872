//! Diagnostics anchored at a stream location.
//!
//! The stream itself never reports problems in the text it serves; a lexer
//! or translator reading from it does. This module gives those consumers a
//! small diagnostic type that carries the [`Location`] taken from
//! [`CompoundStream::current_location`](crate::CompoundStream::current_location)
//! and renders it the way compilers usually do.

mod format;

use std::fmt;

use crate::stream::Location;

pub use format::{DiagnosticOptions, DisplayStyle, format_diagnostic, format_diagnostics};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Input cannot be processed.
    Error,
    /// Input is suspicious but usable.
    Warning,
}

impl Severity {
    /// Lowercase label used in rendered output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A message tied to a position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Where it happened, or [`Location::empty`] for stream-wide issues.
    pub location: Location,
}

impl Diagnostic {
    /// Create an error with no location.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning with no location.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            location: Location::empty(),
        }
    }

    /// Attach a location.
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Check if this is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            write!(f, "{}: {}", self.severity.label(), self.message)
        } else {
            write!(f, "{}: {}: {}", self.location, self.severity.label(), self.message)
        }
    }
}
