//! Target-dependent rewrites, checked on both emitters

use core_types::{CompileOptions, ModuleKind, TargetVersion};
use serde_json::Value;

fn text_for(source: &str, target: TargetVersion) -> String {
    let options = CompileOptions::default().with_target(target);
    codegen::compile(source, &options).unwrap()
}

fn last_statement(source: &str, target: TargetVersion) -> Value {
    let options = CompileOptions::default().with_target(target);
    let node = codegen::compile_to_ast(source, &options).unwrap();
    let value = serde_json::to_value(node).unwrap();
    value["body"].as_array().unwrap().last().unwrap().clone()
}

#[cfg(test)]
mod exponent_tests {
    use super::*;

    #[test]
    fn test_kept_from_es2017() {
        for target in [TargetVersion::Es2017, TargetVersion::Es2020, TargetVersion::EsNext] {
            assert!(text_for("f(a ** 2)", target).contains("f(a ** 2);"));
            let call = last_statement("f(a ** 2)", target);
            assert_eq!(call["expression"]["arguments"][0]["operator"], "**");
        }
    }

    #[test]
    fn test_lowered_for_es2015() {
        assert!(text_for("f(a ** 2)", TargetVersion::Es2015).contains("f(Math.pow(a, 2));"));
        let call = last_statement("f(a ** 2)", TargetVersion::Es2015);
        assert_eq!(call["expression"]["arguments"][0]["type"], "CallExpression");
    }
}

#[cfg(test)]
mod nullish_tests {
    use super::*;

    #[test]
    fn test_kept_from_es2020() {
        assert!(text_for("f(a ?? b)", TargetVersion::Es2020).contains("f(a ?? b);"));
        let call = last_statement("f(a ?? b)", TargetVersion::Es2020);
        let argument = &call["expression"]["arguments"][0];
        assert_eq!(argument["type"], "LogicalExpression");
        assert_eq!(argument["operator"], "??");
    }

    #[test]
    fn test_references_are_numbered_per_compilation() {
        let output = text_for("f(a ?? b)\ng(c ?? d)", TargetVersion::Es2017);
        assert!(output.contains("let $ref1, $ref2;"));
        let again = text_for("f(a ?? b)", TargetVersion::Es2017);
        assert!(again.contains("let $ref1;"));
    }
}

#[cfg(test)]
mod module_tests {
    use super::*;

    #[test]
    fn test_top_level_await_marks_module_only_for_esm() {
        let esm = codegen::compile("data = await load()", &CompileOptions::default()).unwrap();
        assert!(esm.ends_with("export {};\n"));

        let options = CompileOptions::default().with_module_kind(ModuleKind::CommonJs);
        let commonjs = codegen::compile("data = await load()", &options).unwrap();
        assert!(!commonjs.contains("export"));
    }

    #[test]
    fn test_script_without_modules() {
        let node = codegen::compile_to_ast("x = 1", &CompileOptions::default()).unwrap();
        let value = serde_json::to_value(node).unwrap();
        assert_eq!(value["sourceType"], "script");
    }
}
