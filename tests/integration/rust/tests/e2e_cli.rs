//! End-to-End CLI Integration Tests
//!
//! Tests the compiler through the sable_cli driver and REPL session, from
//! files on disk to written outputs and diagnostics.

use core_types::CompileOptions;
use sable_cli::{BatchReport, Driver, EmitMode, ReplSession, ReplStep};
use std::fs;
use std::path::PathBuf;

/// Run a batch, capturing stdout and stderr
fn run(driver: &Driver, files: &[PathBuf]) -> (BatchReport, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let report = driver.run_files(files, &mut out, &mut err).expect("Writing failed");
    (
        report,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

fn default_driver() -> Driver {
    Driver::new(CompileOptions::default(), EmitMode::Js)
}

/// Test: a multi-file project compiles into an output directory
#[test]
fn test_e2e_project_to_out_dir() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("math.sable"), "export fn square(x) => x * x\n").unwrap();
    fs::write(
        src.join("main.sable"),
        "import {square} from \"./math.js\"\nresult = square(4)\n",
    )
    .unwrap();

    let out_dir = dir.path().join("dist");
    let driver = default_driver().with_out_dir(Some(out_dir.clone()));
    let (report, stdout, stderr) = run(&driver, &[src.join("math.sable"), src.join("main.sable")]);

    assert!(report.succeeded(), "{}", stderr);
    assert!(stdout.is_empty());
    assert_eq!(
        fs::read_to_string(out_dir.join("math.js")).unwrap(),
        "\"use strict\";\nexport function square(x) {\n  return x * x;\n}\n"
    );
    assert_eq!(
        fs::read_to_string(out_dir.join("main.js")).unwrap(),
        "\"use strict\";\nlet result;\nimport { square } from \"./math.js\";\nresult = square(4);\n"
    );
}

/// Test: one broken file among good ones
#[test]
fn test_e2e_partial_failure() {
    let dir = tempfile::tempdir().unwrap();
    let files: Vec<_> = ["a", "b", "c"].iter().map(|n| dir.path().join(format!("{}.sable", n))).collect();
    fs::write(&files[0], "a = 1\n").unwrap();
    fs::write(&files[1], "if x\n    y()\n  z()\n").unwrap();
    fs::write(&files[2], "c = 3\n").unwrap();

    let (report, stdout, stderr) = run(&default_driver(), &files);

    assert_eq!(report.compiled, 2);
    assert_eq!(report.failed, 1);
    assert!(stdout.contains("a = 1;"));
    assert!(stdout.contains("c = 3;"));
    assert!(stderr.starts_with(&format!("{}:3:", files[1].display())));
    assert!(stderr.contains("IndentationError"));
}

/// Test: syntax-tree output is valid JSON
#[test]
fn test_e2e_ast_output() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("app.sable");
    fs::write(&file, "greeting = \"hi\"\n").unwrap();

    let driver = Driver::new(CompileOptions::default(), EmitMode::Ast);
    let (report, stdout, _) = run(&driver, &[file]);

    assert!(report.succeeded());
    let tree: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tree["body"][2]["expression"]["right"]["value"], "hi");
}

/// Test: parse-tree output
#[test]
fn test_e2e_tree_output() {
    let driver = Driver::new(CompileOptions::default(), EmitMode::Tree);
    let mut out = Vec::new();
    let mut err = Vec::new();
    let report = driver.run_source("<stdin>", "x = 1", &mut out, &mut err).unwrap();

    assert!(report.succeeded());
    let dump = String::from_utf8(out).unwrap();
    assert!(dump.ends_with('\n'));
    assert_eq!(dump.trim_end(), codegen::dump_parse_tree("x = 1").unwrap().trim_end());
}

/// Test: a REPL session across several inputs
#[test]
fn test_e2e_repl_session() {
    let mut session = ReplSession::new(default_driver());

    assert!(matches!(session.feed("x = 1"), ReplStep::Output(_)));
    assert_eq!(session.feed("fn twice(n)"), ReplStep::Continue);
    assert_eq!(session.feed("  return n * 2"), ReplStep::Continue);
    match session.feed("") {
        ReplStep::Output(output) => {
            assert_eq!(output, "\"use strict\";\nfunction twice(n) {\n  return n * 2;\n}\n")
        }
        other => panic!("unexpected step: {:?}", other),
    }
    assert!(matches!(session.feed("x = )"), ReplStep::Error(_)));
    assert_eq!(session.prompt(), "> ");
}
