//! Unit tests for CompileOptions deserialization

use core_types::{CompileOptions, ModuleKind, TargetVersion};

#[test]
fn test_options_from_json() {
    let options: CompileOptions = serde_json::from_str(
        r#"{ "emit_type_annotations": true, "module_kind": "commonjs", "target": "es2015", "jsx_factory": "h" }"#,
    )
    .unwrap();

    assert!(options.emit_type_annotations);
    assert_eq!(options.module_kind, ModuleKind::CommonJs);
    assert_eq!(options.target, TargetVersion::Es2015);
    assert_eq!(options.jsx_factory.as_deref(), Some("h"));
}

#[test]
fn test_options_missing_fields_use_defaults() {
    let options: CompileOptions = serde_json::from_str(r#"{ "module_kind": "esm" }"#).unwrap();
    assert_eq!(options, CompileOptions::default());
}

#[test]
fn test_options_reject_unknown_target() {
    let result: Result<CompileOptions, _> = serde_json::from_str(r#"{ "target": "es3" }"#);
    assert!(result.is_err());
}
