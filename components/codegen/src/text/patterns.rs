//! Destructuring targets
//!
//! Patterns only produce text; callers decide whether the names they bind are
//! declared (`let`, parameters, loops) or hoisted (plain assignment).

use super::expressions::ASSIGNMENT;
use super::{Text, TextEmitter};
use crate::decorated::{Aggregate, Decorated};
use parser::cst::{ObjectPatternProperty, Pattern};

impl<'a> TextEmitter<'a> {
    pub(crate) fn emit_pattern(&mut self, pattern: &Pattern) -> Text {
        match pattern {
            Pattern::Identifier(name) => Decorated::leaf(name.clone()),
            Pattern::Expression(expression) => self.emit_expression(expression),
            Pattern::Array(elements) => {
                let mut parts = Aggregate::new();
                let elements: Vec<String> = elements
                    .iter()
                    .map(|element| parts.take(self.emit_pattern(element)))
                    .collect();
                parts.finish(format!("[{}]", elements.join(", ")))
            }
            Pattern::Object(properties) => {
                if properties.is_empty() {
                    return Decorated::leaf("{}".to_string());
                }
                let mut parts = Aggregate::new();
                let mut members = Vec::new();
                for property in properties {
                    members.push(match property {
                        ObjectPatternProperty::Property {
                            value,
                            shorthand: true,
                            ..
                        } => parts.take(self.emit_pattern(value)),
                        ObjectPatternProperty::Property { key, value, .. } => {
                            let key = parts.take(self.emit_property_key(key));
                            let value = parts.take(self.emit_pattern(value));
                            format!("{}: {}", key, value)
                        }
                        ObjectPatternProperty::Rest(target) => {
                            format!("...{}", parts.take(self.emit_pattern(target)))
                        }
                    });
                }
                parts.finish(format!("{{ {} }}", members.join(", ")))
            }
            Pattern::Default { target, default } => {
                let mut parts = Aggregate::new();
                let target = parts.take(self.emit_pattern(target));
                let default = parts.take(self.emit_operand(default, ASSIGNMENT));
                parts.finish(format!("{} = {}", target, default))
            }
            Pattern::Rest(target) => self
                .emit_pattern(target)
                .map(|target| format!("...{}", target)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::text::TextEmitter;
    use core_types::CompileOptions;

    fn body(source: &str) -> String {
        let program = parser::parse(source).unwrap();
        let output = TextEmitter::new(&CompileOptions::default())
            .emit_program(&program)
            .unwrap();
        output.strip_prefix("\"use strict\";\n").unwrap().to_string()
    }

    #[test]
    fn test_array_destructuring_hoists_every_name() {
        assert_eq!(
            body("[first, second = 2, ...rest] = list"),
            "let first, rest, second;\n[first, second = 2, ...rest] = list;\n"
        );
    }

    #[test]
    fn test_object_destructuring_with_renames() {
        assert_eq!(
            body("{x, y: [a, b], ...others} = point"),
            "let a, b, others, x;\n({ x, y: [a, b], ...others } = point);\n"
        );
    }

    #[test]
    fn test_member_targets_are_not_hoisted() {
        assert_eq!(body("[@a, obj.b] = pair"), "[this.a, obj.b] = pair;\n");
    }

    #[test]
    fn test_let_pattern_is_declared_not_hoisted() {
        assert_eq!(body("let {a, b = 1} = opts"), "let { a, b = 1 } = opts;\n");
    }
}
