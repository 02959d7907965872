//! Diagnostic formatting utilities.

use std::fmt::Write;
use std::fs;

use super::{Diagnostic, Severity};
use crate::stream::Location;

// ============================================================================
// Options
// ============================================================================

/// Display style for diagnostic output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayStyle {
    /// Header, location line and the offending source line with a marker.
    #[default]
    Rich,
    /// One line: `name:line:col: severity: message`.
    Short,
}

/// Options for controlling diagnostic formatting.
///
/// # Example
///
/// ```ignore
/// use compound_source::diagnostic::{DiagnosticOptions, DisplayStyle};
///
/// // Plain text (no ANSI colors) for logging
/// let opts = DiagnosticOptions::plain();
///
/// // Short format for CI/IDE integration
/// let opts = DiagnosticOptions::short().with_colored(false);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticOptions {
    /// Whether to use ANSI colors in output.
    pub colored: bool,
    /// Display style (rich with snippets or short).
    pub style: DisplayStyle,
    /// Whether to include the source line in rich output.
    pub snippets: bool,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        Self {
            colored: true,
            style: DisplayStyle::Rich,
            snippets: true,
        }
    }
}

impl DiagnosticOptions {
    /// Create options for plain text output (no ANSI colors).
    pub fn plain() -> Self {
        Self {
            colored: false,
            ..Self::default()
        }
    }

    /// Create options for short format (file:line:col: message).
    pub fn short() -> Self {
        Self {
            style: DisplayStyle::Short,
            snippets: false,
            ..Self::default()
        }
    }

    /// Set whether to use colors.
    pub fn with_colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Set display style.
    pub fn with_style(mut self, style: DisplayStyle) -> Self {
        self.style = style;
        self
    }

    /// Set whether to include source snippets.
    pub fn with_snippets(mut self, snippets: bool) -> Self {
        self.snippets = snippets;
        self
    }
}

// ============================================================================
// Coloring
// ============================================================================

/// Apply color to text based on severity.
#[cfg(feature = "colored-diagnostics")]
fn colorize(text: &str, severity: Severity) -> String {
    use owo_colors::OwoColorize;
    match severity {
        Severity::Error => text.red().to_string(),
        Severity::Warning => text.yellow().to_string(),
    }
}

#[cfg(not(feature = "colored-diagnostics"))]
fn colorize(text: &str, _severity: Severity) -> String {
    text.to_owned()
}

/// Get paint function based on options.
fn get_paint_fn(options: &DiagnosticOptions, severity: Severity) -> Box<dyn Fn(&str) -> String> {
    if options.colored {
        Box::new(move |s| colorize(s, severity))
    } else {
        Box::new(|s: &str| s.to_owned())
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Format a list of diagnostics into a string.
pub fn format_diagnostics(diagnostics: &[Diagnostic], options: DiagnosticOptions) -> String {
    let mut output = String::new();
    for diag in diagnostics {
        format_diagnostic(&mut output, diag, options);
    }
    output
}

/// Format a single diagnostic into the output string.
pub fn format_diagnostic(output: &mut String, diag: &Diagnostic, options: DiagnosticOptions) {
    let paint = get_paint_fn(&options, diag.severity);
    let label = diag.severity.label();

    match options.style {
        DisplayStyle::Short => format_short(output, diag, label, &paint),
        DisplayStyle::Rich => format_rich(output, diag, label, &paint, &options),
    }
}

fn format_short(
    output: &mut String,
    diag: &Diagnostic,
    label: &str,
    paint: &dyn Fn(&str) -> String,
) {
    if diag.location.is_empty() {
        _ = writeln!(output, "{}: {}", paint(label), diag.message);
    } else {
        _ = writeln!(output, "{}: {}: {}", diag.location, paint(label), diag.message);
    }
}

fn format_rich(
    output: &mut String,
    diag: &Diagnostic,
    label: &str,
    paint: &dyn Fn(&str) -> String,
    options: &DiagnosticOptions,
) {
    // Header: "error: message"
    _ = writeln!(output, "{}: {}", paint(label), diag.message);

    if diag.location.is_empty() {
        return;
    }

    let width = diag.location.line.to_string().len();
    _ = writeln!(output, "{:>width$} {} {}", "", gutter::HEADER, diag.location);

    if options.snippets
        && let Some(text) = source_line(&diag.location)
    {
        let marker_pad = " ".repeat(diag.location.column.saturating_sub(1));
        _ = writeln!(output, "{:>width$} {}", "", gutter::BAR);
        _ = writeln!(output, "{:>width$} {} {}", diag.location.line, gutter::BAR, text);
        _ = writeln!(
            output,
            "{:>width$} {} {}{}",
            "",
            gutter::BAR,
            marker_pad,
            paint(gutter::MARKER)
        );
    }
}

/// Box-drawing characters for source code display.
mod gutter {
    pub const HEADER: &str = "┌─";
    pub const BAR: &str = "│";
    pub const MARKER: &str = "^";
}

/// Fetch the text of the location's line from its resolved file.
fn source_line(location: &Location) -> Option<String> {
    let bytes = fs::read(&location.resolved).ok()?;
    let text = String::from_utf8_lossy(&bytes);
    text.lines()
        .nth(location.line.checked_sub(1)?)
        .map(|line| line.trim_end_matches('\r').to_owned())
}

/// Disable colored output globally (for tests).
#[cfg(all(test, feature = "colored-diagnostics"))]
pub fn disable_colors() {
    owo_colors::set_override(false);
}
