//! Parser → Codegen Integration Tests
//!
//! Tests that the parse tree produced by the parser is the one both emitters
//! consume, and that the two emitters agree on what they produce from it.

use codegen::{AstEmitter, TextEmitter};
use core_types::CompileOptions;
use serde_json::Value;

const PROGRAM: &str = "\
fn total(items)
  sum = 0
  for item of items
    sum += item
  return sum

class Counter
  count = 0
  increment()
    @count += 1

if ready
  result = total([1, 2, 3])
";

/// Test: the public dump is the parser's dump of the same tree
#[test]
fn test_dump_matches_parser_tree() {
    let program = parser::parse(PROGRAM).expect("Parse failed");
    let dump = codegen::dump_parse_tree(PROGRAM).expect("Dump failed");

    assert_eq!(dump, parser::dump_tree(&program));
}

/// Test: one parse feeds both emitters
#[test]
fn test_one_tree_two_emitters() {
    let options = CompileOptions::default();
    let program = parser::parse(PROGRAM).expect("Parse failed");

    let text = TextEmitter::new(&options).emit_program(&program).expect("Text emit failed");
    let node = AstEmitter::new(&options).emit_program(&program).expect("AST emit failed");
    let tree = serde_json::to_value(node).unwrap();

    assert_eq!(text, codegen::compile(PROGRAM, &options).unwrap());
    assert_eq!(tree["type"], "Program");

    // directive, function, class, if
    let body = tree["body"].as_array().unwrap();
    assert_eq!(body.len(), 4);
    assert_eq!(body[1]["type"], "FunctionDeclaration");
    assert_eq!(body[2]["type"], "ClassDeclaration");
    assert_eq!(body[3]["type"], "IfStatement");
}

/// Test: both emitters place implicit declarations in the same blocks
#[test]
fn test_emitters_agree_on_hoisting() {
    let options = CompileOptions::default();
    let text = codegen::compile(PROGRAM, &options).unwrap();
    let tree = serde_json::to_value(codegen::compile_to_ast(PROGRAM, &options).unwrap()).unwrap();

    assert!(text.contains("function total(items) {\n  let sum;\n"));
    assert!(text.contains("if (ready) {\n  let result;\n"));
    assert!(!text.contains("\"use strict\";\nlet"));

    let function_body = &tree["body"][1]["body"]["body"];
    assert_eq!(function_body[0]["type"], "VariableDeclaration");
    assert_eq!(function_body[0]["declarations"][0]["id"]["name"], "sum");

    let if_body = &tree["body"][3]["consequent"]["body"];
    assert_eq!(if_body[0]["declarations"][0]["id"]["name"], "result");
}

/// Test: parse errors reach the caller unchanged through every entry point
#[test]
fn test_parse_error_identical_across_entry_points() {
    let source = "if a\n  b(\n";
    let options = CompileOptions::default();

    let parsed = parser::parse(source).unwrap_err();
    assert_eq!(codegen::compile(source, &options).unwrap_err(), parsed);
    assert_eq!(codegen::compile_to_ast(source, &options).unwrap_err(), parsed);
    assert_eq!(codegen::dump_parse_tree(source).unwrap_err(), parsed);
}

/// Test: method receivers survive the round through both emitters
#[test]
fn test_method_receiver_in_both_emitters() {
    let options = CompileOptions::default();
    let text = codegen::compile(PROGRAM, &options).unwrap();
    assert!(text.contains("increment() {\n    let $self = this;\n    $self.count += 1;\n  }"));

    let tree = serde_json::to_value(codegen::compile_to_ast(PROGRAM, &options).unwrap()).unwrap();
    let members = tree["body"][2]["body"]["body"].as_array().unwrap();
    let method = members.iter().find(|m| m["kind"] == "method").unwrap();
    let statements = &method["value"]["body"]["body"];
    assert_eq!(statements[0]["declarations"][0]["id"]["name"], "$self");
    assert_eq!(statements[0]["declarations"][0]["init"]["type"], "ThisExpression");
    assert_eq!(statements[1]["expression"]["left"]["object"]["name"], "$self");
    assert_ne!(statements[1]["expression"]["left"]["object"], Value::Null);
}
