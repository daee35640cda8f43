//! Behavioural guarantees of the compiler as a whole

use codegen::lowering::unescape;
use core_types::{CompileOptions, ErrorKind};

fn compile(source: &str) -> String {
    codegen::compile(source, &CompileOptions::default()).unwrap()
}

/// Content of the first double-quoted literal in `output`, escapes resolved
fn first_string(output: &str) -> String {
    let start = output.find("= \"").unwrap() + 3;
    let rest = &output[start..];
    let mut end = 0;
    let mut escaped = false;
    for (index, ch) in rest.char_indices() {
        match ch {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => {
                end = index;
                break;
            }
            _ => escaped = false,
        }
    }
    unescape(&rest[..end])
}

// =============================================================================
// String de-indentation
// =============================================================================

#[cfg(test)]
mod dedent_tests {
    use super::*;

    #[test]
    fn test_dedent_strips_quote_column() {
        let output = compile("text = \"first\n        second\n          third\"");
        assert_eq!(first_string(&output), "first\nsecond\n  third");
    }

    #[test]
    fn test_dedent_independent_of_line_count() {
        for count in 1..6 {
            let mut source = String::from("text = \"head");
            let mut expected = String::from("head");
            for index in 0..count {
                source.push_str(&format!("\n        line{}", index));
                expected.push_str(&format!("\nline{}", index));
            }
            source.push('"');
            assert_eq!(first_string(&compile(&source)), expected);
        }
    }

    #[test]
    fn test_dedent_keeps_lines_with_less_indentation() {
        let output = compile("text = \"a\n  b\nc\"");
        assert_eq!(first_string(&output), "a\nb\nc");
    }

    #[test]
    fn test_newlines_are_escaped_in_output() {
        let output = compile("text = \"a\n        b\"");
        assert!(output.contains("text = \"a\\nb\";"));
    }
}

// =============================================================================
// Switch clauses
// =============================================================================

#[cfg(test)]
mod switch_tests {
    use super::*;

    #[test]
    fn test_case_clause_ends_with_break() {
        let output = compile("switch x\n  case 1\n    one()");
        assert!(output.contains("case 1: {\n    one();\n    break;\n  }"));
    }

    #[test]
    fn test_default_clause_ends_with_break() {
        let output = compile("switch x\n  case 1\n    one()\n  default\n    other()");
        assert!(output.contains("default: {\n    other();\n    break;\n  }"));
    }

    #[test]
    fn test_stacked_case_labels() {
        let output = compile("switch x\n  case 1, 2\n    small()");
        assert!(output.contains("case 1:\n  case 2: {\n    small();\n    break;\n  }"));
    }
}

// =============================================================================
// Range loops
// =============================================================================

#[cfg(test)]
mod range_tests {
    use super::*;

    #[test]
    fn test_descending_without_bound() {
        let output = compile("for i from 5 downto\n  tick(i)");
        assert!(output.contains("for (let i = 5; i > -Infinity; i -= 1) {"));
    }

    #[test]
    fn test_ascending_without_start() {
        let output = compile("for i to 10\n  tick(i)");
        assert!(output.contains("for (let i = 0; i < 10; i += 1) {"));
    }

    #[test]
    fn test_inclusive_bound() {
        let output = compile("for i from 1 through n\n  tick(i)");
        assert!(output.contains("for (let i = 1; i <= n; i += 1) {"));
    }
}

// =============================================================================
// Top-level yield
// =============================================================================

#[cfg(test)]
mod generator_tests {
    use super::*;

    #[test]
    fn test_top_level_yield_compiles_to_throwing_stub() {
        let output = compile("x = 1\nyield x");
        assert!(output.contains("throw new SyntaxError("));
        assert!(!output.contains("yield"));
    }

    #[test]
    fn test_yield_inside_function_is_kept() {
        let output = compile("fn numbers()\n  yield 1");
        assert!(output.contains("function* numbers() {\n  yield 1;\n}"));
    }
}

// =============================================================================
// Parse failures
// =============================================================================

#[cfg(test)]
mod failure_tests {
    use super::*;

    #[test]
    fn test_unterminated_string_position_and_message() {
        let error = codegen::compile("x = \"abc", &CompileOptions::default()).unwrap_err();
        assert_eq!(error.kind, ErrorKind::SyntaxError);
        let position = error.source_position.unwrap();
        assert_eq!(position.line, 1);
        assert!(position.column >= 5);
        assert!(error.expected.iter().any(|e| e.contains("closing quote")));
        assert!(error.is_incomplete_input());
    }

    #[test]
    fn test_inconsistent_dedent() {
        let error = codegen::compile("if a\n    b()\n  c()", &CompileOptions::default()).unwrap_err();
        assert_eq!(error.kind, ErrorKind::IndentationError);
    }

    #[test]
    fn test_deep_nesting_compiles() {
        let source = format!("x = {}1{}", "(".repeat(200), ")".repeat(200));
        assert!(compile(&source).starts_with("\"use strict\";\nlet x;\nx = "));
        let tree = codegen::compile_to_ast_json(&source, &CompileOptions::default()).unwrap();
        assert!(tree.contains("\"Program\""));
    }

    #[test]
    fn test_nesting_past_limit_is_syntax_error() {
        let parens = format!("x = {}1{}", "(".repeat(5000), ")".repeat(5000));
        let prefixes = format!("x = {}1", "not ".repeat(5000));
        for source in [parens, prefixes] {
            let error = codegen::compile(&source, &CompileOptions::default()).unwrap_err();
            assert_eq!(error.kind, ErrorKind::SyntaxError);
            assert!(error.message.contains("Nesting deeper than"), "{}", error);
            assert!(!error.is_incomplete_input());
        }
    }

    #[test]
    fn test_error_display_has_line_and_column() {
        let error = codegen::compile("x = )", &CompileOptions::default()).unwrap_err();
        assert!(error.to_string().starts_with("1:"));
    }
}

// =============================================================================
// Receiver binding
// =============================================================================

#[cfg(test)]
mod receiver_tests {
    use super::*;

    #[test]
    fn test_nested_function_uses_outer_receiver() {
        let output = compile(
            "class Timer\n  start()\n    setTimeout(fn () => @tick(), 10)",
        );
        assert!(output.contains("let $self = this;"));
        assert!(output.contains("return $self.tick();"));
        assert!(!output.contains("this.tick"));
    }

    #[test]
    fn test_nested_arrow_uses_outer_receiver() {
        let output = compile("class Timer\n  start()\n    run(() => @tick())");
        assert!(output.contains("run(() => $self.tick());"));
    }

    #[test]
    fn test_separate_compilations_do_not_share_state() {
        let first = compile("if a\n  x = 1");
        let second = compile("if a\n  x = 1");
        assert_eq!(first, second);
    }
}
