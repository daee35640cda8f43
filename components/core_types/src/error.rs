//! Compile error types.
//!
//! Every failure the compiler can report is a [`CompileError`]. User-facing
//! failures (syntax and indentation errors) carry the position and the set of
//! expectations that could not be met; invariant violations indicate a bug in
//! the compiler itself.

use crate::SourcePosition;

/// The kind of compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The text does not match the grammar at some position
    SyntaxError,
    /// A dedent returned to a column no open block was indented at
    IndentationError,
    /// An emitter or resolver contract was broken (compiler bug)
    InvariantViolation,
}

impl ErrorKind {
    /// Short human-readable name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::IndentationError => "IndentationError",
            ErrorKind::InvariantViolation => "InvariantViolation",
        }
    }
}

/// A compile failure with position and expectation details.
///
/// # Examples
///
/// ```
/// use core_types::{CompileError, ErrorKind, SourcePosition};
///
/// let error = CompileError::new(ErrorKind::SyntaxError, "Expected \"then\"")
///     .at(SourcePosition { line: 3, column: 9, offset: 40 });
///
/// assert_eq!(error.to_string(), "3:9: SyntaxError: Expected \"then\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render(.kind, .message, .source_position))]
pub struct CompileError {
    /// The category of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Descriptions of what the parser would have accepted at the failure point
    pub expected: Vec<String>,
    /// Source position where the error occurred
    pub source_position: Option<SourcePosition>,
    /// True when the failure happened because the input ran out
    pub at_end_of_input: bool,
}

impl CompileError {
    /// Create an error without position information
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            expected: Vec::new(),
            source_position: None,
            at_end_of_input: false,
        }
    }

    /// Create an invariant violation (compiler bug)
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvariantViolation, message)
    }

    /// Attach a source position
    pub fn at(mut self, position: SourcePosition) -> Self {
        self.source_position = Some(position);
        self
    }

    /// Attach the list of expectations
    pub fn with_expected(mut self, expected: Vec<String>) -> Self {
        self.expected = expected;
        self
    }

    /// Mark the failure as caused by reaching the end of the input
    pub fn at_end(mut self, at_end_of_input: bool) -> Self {
        self.at_end_of_input = at_end_of_input;
        self
    }

    /// True for errors caused by the input text rather than by the compiler
    pub fn is_user_error(&self) -> bool {
        !matches!(self.kind, ErrorKind::InvariantViolation)
    }

    /// True when more input could still complete the text (REPL continuation)
    pub fn is_incomplete_input(&self) -> bool {
        self.kind == ErrorKind::SyntaxError && self.at_end_of_input
    }
}

fn render(kind: &ErrorKind, message: &str, position: &Option<SourcePosition>) -> String {
    match position {
        Some(position) => format!("{}: {}: {}", position, kind.name(), message),
        None => format!("{}: {}", kind.name(), message),
    }
}
