//! Shape of the serialized syntax tree

use core_types::CompileOptions;
use serde_json::{json, Value};

fn tree(source: &str) -> Value {
    let json = codegen::compile_to_ast_json(source, &CompileOptions::default()).unwrap();
    serde_json::from_str(&json).unwrap()
}

fn assigned(source: &str) -> Value {
    let program = tree(source);
    program["body"].as_array().unwrap().last().unwrap()["expression"]["right"].clone()
}

#[cfg(test)]
mod literal_tests {
    use super::*;

    #[test]
    fn test_number_drops_separators() {
        let literal = assigned("x = 1_000");
        assert_eq!(literal["value"], json!(1000.0));
        assert_eq!(literal["raw"], "1000");
    }

    #[test]
    fn test_bigint_has_null_value() {
        let literal = assigned("x = 12n");
        assert_eq!(literal["value"], Value::Null);
        assert_eq!(literal["bigint"], "12");
    }

    #[test]
    fn test_regex_has_pattern_and_flags() {
        let literal = assigned("x = /ab+c/gi");
        assert_eq!(literal["value"], Value::Null);
        assert_eq!(literal["regex"]["pattern"], "ab+c");
        assert_eq!(literal["regex"]["flags"], "gi");
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let literal = assigned("x = true");
        let object = literal.as_object().unwrap();
        assert!(!object.contains_key("regex"));
        assert!(!object.contains_key("bigint"));
    }
}

#[cfg(test)]
mod structure_tests {
    use super::*;

    #[test]
    fn test_every_node_has_a_type() {
        fn walk(value: &Value, count: &mut usize) {
            match value {
                Value::Object(map) => {
                    if map.contains_key("body") || map.contains_key("expression") {
                        assert!(map.contains_key("type"), "untyped node: {}", value);
                    }
                    *count += 1;
                    map.values().for_each(|child| walk(child, count));
                }
                Value::Array(items) => items.iter().for_each(|child| walk(child, count)),
                _ => {}
            }
        }
        let mut count = 0;
        walk(&tree("fn f(a)\n  for i to a\n    g(i)\n  return a"), &mut count);
        assert!(count > 10);
    }

    #[test]
    fn test_keyword_fields_use_estree_names() {
        let program = tree("fn load() => await fetch()");
        let function = &program["body"][1];
        assert_eq!(function["type"], "FunctionDeclaration");
        assert_eq!(function["async"], true);
        assert_eq!(function["generator"], false);
    }

    #[test]
    fn test_class_heritage() {
        let program = tree("class Dog extends Animal\n  bark() => 1");
        let class = &program["body"][1];
        assert_eq!(class["superClass"]["name"], "Animal");
        assert_eq!(class["body"]["body"][0]["kind"], "method");
    }
}
