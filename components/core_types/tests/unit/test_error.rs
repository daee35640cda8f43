//! Unit tests for CompileError and ErrorKind

use core_types::{CompileError, ErrorKind, SourcePosition};

#[test]
fn test_error_kind_names() {
    assert_eq!(ErrorKind::SyntaxError.name(), "SyntaxError");
    assert_eq!(ErrorKind::IndentationError.name(), "IndentationError");
    assert_eq!(ErrorKind::InvariantViolation.name(), "InvariantViolation");
}

#[test]
fn test_compile_error_builder() {
    let error = CompileError::new(ErrorKind::SyntaxError, "Expected \"'\"")
        .at(SourcePosition {
            line: 2,
            column: 14,
            offset: 30,
        })
        .with_expected(vec!["\"'\"".to_string()])
        .at_end(true);

    assert_eq!(error.expected, vec!["\"'\"".to_string()]);
    assert_eq!(error.source_position.map(|p| p.line), Some(2));
    assert!(error.is_incomplete_input());
    assert_eq!(error.to_string(), "2:14: SyntaxError: Expected \"'\"");
}

#[test]
fn test_compile_error_is_std_error() {
    fn takes_error(_: &dyn std::error::Error) {}
    takes_error(&CompileError::invariant("unreachable"));
}
