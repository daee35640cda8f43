//! Parser error types and helpers

use core_types::{CompileError, ErrorKind, SourcePosition};

/// Create a syntax error at a given position
pub fn syntax_error(message: impl Into<String>, position: Option<SourcePosition>) -> CompileError {
    let error = CompileError::new(ErrorKind::SyntaxError, message);
    match position {
        Some(position) => error.at(position),
        None => error,
    }
}

/// Create an error listing everything the parser would have accepted
pub fn expected_error(
    expected: Vec<String>,
    position: SourcePosition,
    at_end_of_input: bool,
) -> CompileError {
    let message = if at_end_of_input {
        format!("{}, got end of input", expected_message(&expected))
    } else {
        expected_message(&expected)
    };
    syntax_error(message, Some(position))
        .with_expected(expected)
        .at_end(at_end_of_input)
}

/// Create an indentation error for a dedent that matches no open block
pub fn indentation_error(message: impl Into<String>, position: SourcePosition) -> CompileError {
    CompileError::new(ErrorKind::IndentationError, message).at(position)
}

/// Render `["a", "b", "c"]` as `Expected a, b or c`
pub fn expected_message(expected: &[String]) -> String {
    match expected {
        [] => "Unexpected input".to_string(),
        [only] => format!("Expected {}", only),
        [init @ .., last] => format!("Expected {} or {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error() {
        let err = syntax_error("test", None);
        assert!(matches!(err.kind, ErrorKind::SyntaxError));
        assert!(err.source_position.is_none());
    }

    #[test]
    fn test_expected_message_joins_alternatives() {
        let expected = vec!["\"then\"".to_string(), "indented block".to_string(), "\")\"".to_string()];
        assert_eq!(
            expected_message(&expected),
            "Expected \"then\", indented block or \")\""
        );
    }

    #[test]
    fn test_expected_error_at_end() {
        let err = expected_error(vec!["'\"'".to_string()], SourcePosition::default(), true);
        assert!(err.is_incomplete_input());
        assert!(err.message.ends_with("got end of input"));
    }

    #[test]
    fn test_indentation_error_kind() {
        let err = indentation_error("bad", SourcePosition::default());
        assert_eq!(err.kind, ErrorKind::IndentationError);
    }
}
