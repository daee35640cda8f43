//! Implicit `let` placement in text and syntax-tree output

use core_types::CompileOptions;
use serde_json::Value;

fn compile(source: &str) -> String {
    codegen::compile(source, &CompileOptions::default()).unwrap()
}

fn ast(source: &str) -> Value {
    let node = codegen::compile_to_ast(source, &CompileOptions::default()).unwrap();
    serde_json::to_value(node).unwrap()
}

fn declared_names(declaration: &Value) -> Vec<String> {
    declaration["declarations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|declarator| declarator["id"]["name"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Text output
// =============================================================================

#[cfg(test)]
mod text_tests {
    use super::*;

    #[test]
    fn test_declared_once_in_innermost_block() {
        let output = compile("if a\n  if b\n    total = 1");
        assert_eq!(output.matches("let total;").count(), 1);
        assert!(output.contains("if (b) {\n    let total;\n    total = 1;\n  }"));
    }

    #[test]
    fn test_sibling_blocks_declare_separately() {
        let output = compile("if a\n  x = 1\nelse\n  x = 2");
        assert_eq!(
            output,
            "\"use strict\";\nif (a) {\n  let x;\n  x = 1;\n} else {\n  let x;\n  x = 2;\n}\n"
        );
    }

    #[test]
    fn test_outer_assignment_absorbs_inner() {
        let output = compile("x = 0\nif a\n  x = 1");
        assert_eq!(output, "\"use strict\";\nlet x;\nx = 0;\nif (a) {\n  x = 1;\n}\n");
    }

    #[test]
    fn test_names_sorted_in_one_line() {
        let output = compile("zeta = 1\nalpha = 2\nmid = 3");
        assert!(output.starts_with("\"use strict\";\nlet alpha, mid, zeta;\n"));
    }

    #[test]
    fn test_parameters_are_not_redeclared() {
        let output = compile("fn reset(count)\n  count = 0");
        assert_eq!(output.matches("let").count(), 0);
    }

    #[test]
    fn test_explicit_declaration_blocks_hoisting() {
        let output = compile("let x = 1\nif a\n  x = 2");
        assert_eq!(output.matches("let x").count(), 1);
        assert!(output.contains("let x = 1;"));
    }

    #[test]
    fn test_closure_sees_outer_variable() {
        let output = compile("count = 0\nfn bump()\n  count += 1");
        assert_eq!(output.matches("let count;").count(), 1);
        assert!(output.starts_with("\"use strict\";\nlet count;\n"));
    }

    #[test]
    fn test_private_use_text_is_not_a_declaration_slot() {
        assert_eq!(
            compile("s = \"\u{F8FF}1\u{F8FF}\""),
            "\"use strict\";\nlet s;\ns = \"\\uF8FF1\\uF8FF\";\n"
        );
        let unknown = compile("s = \"\u{F8FF}99\u{F8FF}\"");
        assert!(unknown.ends_with("s = \"\\uF8FF99\\uF8FF\";\n"));
    }

    #[test]
    fn test_private_use_text_in_other_literals() {
        let output = compile(
            "if a\n  r = /\u{F8FF}2\u{F8FF}/g\n  t = \"x#{a}\u{F8FF}1\u{F8FF}\"\n  v = <b>\u{F8FF}1\u{F8FF}</b>",
        );
        assert!(!output.contains('\u{F8FF}'));
        assert!(output.contains("  let r, t, v;\n"));
        assert!(output.contains("r = /\\uF8FF2\\uF8FF/g;"));
        assert!(output.contains("t = `x${a}\\uF8FF1\\uF8FF`;"));
        assert!(output.contains("v = <b>{\"\\uF8FF\"}1{\"\\uF8FF\"}</b>;"));
    }
}

// =============================================================================
// Syntax-tree output
// =============================================================================

#[cfg(test)]
mod ast_tests {
    use super::*;

    #[test]
    fn test_sibling_blocks_declare_separately() {
        let program = ast("if a\n  x = 1\nelse\n  x = 2");
        let body = program["body"].as_array().unwrap();
        assert_eq!(body.len(), 2);
        let statement = &body[1];
        assert_eq!(statement["type"], "IfStatement");

        let consequent = &statement["consequent"]["body"][0];
        assert_eq!(consequent["kind"], "let");
        assert_eq!(declared_names(consequent), vec!["x"]);

        let alternate = &statement["alternate"]["body"][0];
        assert_eq!(declared_names(alternate), vec!["x"]);
    }

    #[test]
    fn test_outer_assignment_absorbs_inner() {
        let program = ast("x = 0\nif a\n  x = 1");
        let body = &program["body"];
        assert_eq!(declared_names(&body[1]), vec!["x"]);
        let inner = &body[3]["consequent"]["body"];
        assert_eq!(inner.as_array().unwrap().len(), 1);
        assert_eq!(inner[0]["type"], "ExpressionStatement");
    }

    #[test]
    fn test_declarators_have_no_initializer() {
        let program = ast("b = 1\na = 2");
        let declaration = &program["body"][1];
        assert_eq!(declared_names(declaration), vec!["a", "b"]);
        assert_eq!(declaration["declarations"][0]["init"], Value::Null);
    }

    #[test]
    fn test_directive_precedes_declaration() {
        let program = ast("x = 1");
        assert_eq!(program["body"][0]["directive"], "use strict");
        assert_eq!(program["body"][1]["type"], "VariableDeclaration");
    }
}
