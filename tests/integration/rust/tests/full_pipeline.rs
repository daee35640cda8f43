//! Full Pipeline Integration Tests
//!
//! Tests the complete flow: Source -> Layout -> Parser -> Emitter -> Scope
//! resolution -> Output, across the option combinations the compiler supports.

use core_types::{CompileOptions, ErrorKind, ModuleKind, TargetVersion};

/// Helper function to compile with default options
fn compile(source: &str) -> String {
    codegen::compile(source, &CompileOptions::default()).expect("Compilation failed")
}

/// Test: empty program is just the pragma
#[test]
fn test_full_pipeline_empty() {
    assert_eq!(compile(""), "\"use strict\";\n");
    assert_eq!(compile("\n\n   \n"), "\"use strict\";\n");
}

/// Test: simple assignment
#[test]
fn test_full_pipeline_assignment() {
    assert_eq!(compile("total = 1 + 2"), "\"use strict\";\nlet total;\ntotal = 1 + 2;\n");
}

/// Test: a small module with imports, a class, a function and a loop
#[test]
fn test_full_pipeline_module() {
    let source = "\
import {fetchJson} from \"./http\"

export class Inventory
  items = []
  add(item)
    @items.push(item)
  count() => @items.length

export fn restock(inventory, names)
  for name of names
    inventory.add(name)
  return inventory.count()
";
    let output = compile(source);

    assert!(output.starts_with("\"use strict\";\nimport { fetchJson } from \"./http\";\n"));
    assert!(output.contains("export class Inventory {\n  items = [];\n"));
    assert!(output.contains("  add(item) {\n    let $self = this;\n    $self.items.push(item);\n  }"));
    assert!(output.contains("export function restock(inventory, names) {\n  for (let name of names) {"));
    assert!(output.ends_with("  return inventory.count();\n}\n"));
}

/// Test: the same module as CommonJS
#[test]
fn test_full_pipeline_commonjs() {
    let options = CompileOptions::default().with_module_kind(ModuleKind::CommonJs);
    let output = codegen::compile(
        "import {readFile} from \"fs\"\nexport fn load(path) => readFile(path)",
        &options,
    )
    .unwrap();

    assert_eq!(
        output,
        "\"use strict\";\nconst { readFile } = require(\"fs\");\nfunction load(path) {\n  return readFile(path);\n}\nexports.load = load;\n"
    );
}

/// Test: lowering for the oldest target
#[test]
fn test_full_pipeline_es2015() {
    let options = CompileOptions::default().with_target(TargetVersion::Es2015);
    let output = codegen::compile("area = side ** 2\nname = given ?? \"anon\"", &options).unwrap();

    assert!(output.contains("let $ref1, area, name;"));
    assert!(output.contains("area = Math.pow(side, 2);"));
    assert!(output.contains("name = (($ref1 = given) != null ? $ref1 : \"anon\");"));
}

/// Test: type annotations only when requested
#[test]
fn test_full_pipeline_type_annotations() {
    let source = "fn id(value: number): number => value";
    assert_eq!(compile(source), "\"use strict\";\nfunction id(value) {\n  return value;\n}\n");

    let typed = codegen::compile(source, &CompileOptions::default().with_type_annotations(true)).unwrap();
    assert_eq!(typed, "\"use strict\";\nfunction id(value: number): number {\n  return value;\n}\n");
}

/// Test: JSX kept as syntax or turned into factory calls
#[test]
fn test_full_pipeline_jsx() {
    let kept = compile("view = <b>hi</b>");
    assert!(kept.contains("view = <b>hi</b>;"));

    let options = CompileOptions::default().with_jsx_factory(Some("h".to_string()));
    let called = codegen::compile("view = <b>hi</b>", &options).unwrap();
    assert!(called.contains("view = h(\"b\", null, \"hi\");"));
}

/// Test: every failure kind is user-facing except invariant violations
#[test]
fn test_full_pipeline_error_kinds() {
    let syntax = codegen::compile("x = = 1", &CompileOptions::default()).unwrap_err();
    assert_eq!(syntax.kind, ErrorKind::SyntaxError);
    assert!(syntax.is_user_error());
    assert!(!syntax.is_incomplete_input());

    let layout = codegen::compile("if a\n    b()\n  c()", &CompileOptions::default()).unwrap_err();
    assert_eq!(layout.kind, ErrorKind::IndentationError);
    assert!(layout.is_user_error());
}

/// Test: compilation is a pure function of its input
#[test]
fn test_full_pipeline_repeatable() {
    let source = "f(a ?? b)\nif c\n  d = 1";
    let options = CompileOptions::default().with_target(TargetVersion::Es2017);
    let first = codegen::compile(source, &options).unwrap();
    for _ in 0..3 {
        assert_eq!(codegen::compile(source, &options).unwrap(), first);
    }
}
