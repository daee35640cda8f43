//! Expression and pattern handlers
//!
//! Lowerings match the text emitter; the tree needs no parentheses, so
//! operands are emitted directly.

use super::node::{RegexLiteral, TemplateValue};
use super::{AstEmitter, Ast, Node};
use crate::decorated::{Aggregate, Decorated};
use crate::grow_stack;
use crate::lowering::{dedent, escape_string, lower_number, parse_numeric, plain_delimiter, unescape, NumberOutput};
use core_types::TargetVersion;
use parser::cst::*;
use serde_json::Value;

/// Property key node and whether it is computed
pub(crate) type Key = Decorated<(Node, bool)>;

fn number_node(literal: &NumberLiteral) -> Node {
    match lower_number(literal) {
        NumberOutput::Numeric(text) => match text.strip_suffix('n') {
            Some(digits) => Node::Literal {
                value: Value::Null,
                bigint: Some(digits.to_string()),
                raw: text.clone(),
                regex: None,
            },
            None => Node::number(parse_numeric(&text).unwrap_or(f64::NAN), text.clone()),
        },
        NumberOutput::Text(text) => Node::string(&text),
    }
}

fn math_pow(base: Node, exponent: Node) -> Node {
    Node::call(Node::member(Node::identifier("Math"), "pow"), vec![base, exponent])
}

/// `(($ref = value) != null ? $ref : fallback)`
fn nullish_test(reference: &str, value: Node, fallback: Node) -> Node {
    Node::ConditionalExpression {
        test: Box::new(Node::binary(
            "!=",
            Node::assign("=", Node::identifier(reference), value),
            Node::literal(Value::Null, "null"),
        )),
        consequent: Box::new(Node::identifier(reference)),
        alternate: Box::new(fallback),
    }
}

impl<'a> AstEmitter<'a> {
    fn lowers_nullish(&self) -> bool {
        !self.options.target.supports_nullish_coalescing()
    }

    fn lowers_exponent(&self) -> bool {
        !self.options.target.supports_exponent_operator()
    }

    pub(crate) fn emit_expression(&mut self, expression: &Expression) -> Ast {
        grow_stack(|| self.emit_expression_kind(expression))
    }

    fn emit_expression_kind(&mut self, expression: &Expression) -> Ast {
        match expression {
            Expression::Identifier(name) => Decorated::leaf(Node::identifier(name.as_str())),
            Expression::Number(literal) => Decorated::leaf(number_node(literal)),
            Expression::String(literal) => self.emit_string(literal),
            Expression::Regex { pattern, flags } => Decorated::leaf(Node::Literal {
                value: Value::Null,
                raw: format!("/{}/{}", pattern, flags),
                regex: Some(RegexLiteral {
                    pattern: pattern.clone(),
                    flags: flags.clone(),
                }),
                bigint: None,
            }),
            Expression::Boolean(value) => {
                Decorated::leaf(Node::literal(Value::Bool(*value), if *value { "true" } else { "false" }))
            }
            Expression::Null => Decorated::leaf(Node::literal(Value::Null, "null")),
            Expression::Undefined => Decorated::leaf(Node::identifier("undefined")),
            Expression::This => Decorated::leaf(Node::ThisExpression),
            Expression::Super => Decorated::leaf(Node::Super),
            Expression::SelfRef => Decorated::leaf(self.receiver()),
            Expression::SelfMember(name) => Decorated::leaf(Node::member(self.receiver(), name)),
            Expression::WellKnownSymbol(name) => {
                Decorated::leaf(Node::member(Node::identifier("Symbol"), name))
            }

            Expression::Array(elements) => {
                let mut parts = Aggregate::new();
                let elements = elements
                    .iter()
                    .map(|element| parts.take(self.emit_expression(element)))
                    .collect();
                parts.finish(Node::ArrayExpression { elements })
            }
            Expression::Comprehension {
                element,
                clauses,
                conditions,
            } => self.emit_comprehension(element, clauses, conditions),
            Expression::Object(properties) => self.emit_object(properties),

            Expression::Function(function) => self.emit_function_expression(function),
            Expression::Arrow(function) => self.emit_arrow(function),
            Expression::Class(class) => self.emit_class(class, false),
            Expression::Jsx(element) => self.emit_jsx(element),

            Expression::Unary { operator, argument } => {
                let operator = operator.as_str().trim_end();
                self.emit_expression(argument).map(|argument| Node::UnaryExpression {
                    operator,
                    prefix: true,
                    argument: Box::new(argument),
                })
            }
            Expression::Update {
                operator,
                prefix,
                argument,
            } => self.emit_expression(argument).map(|argument| Node::UpdateExpression {
                operator: operator.as_str(),
                prefix: *prefix,
                argument: Box::new(argument),
            }),
            Expression::Binary {
                operator,
                left,
                right,
            } => {
                let mut parts = Aggregate::new();
                let left = parts.take(self.emit_expression(left));
                let right = parts.take(self.emit_expression(right));
                if *operator == BinaryOperator::Exponent && self.lowers_exponent() {
                    parts.finish(math_pow(left, right))
                } else {
                    parts.finish(Node::binary(operator.as_str(), left, right))
                }
            }
            Expression::Logical {
                operator,
                left,
                right,
            } => {
                let lowered = *operator == LogicalOperator::NullishCoalescing && self.lowers_nullish();
                let reference = if lowered { Some(self.reference()) } else { None };
                let mut parts = Aggregate::new();
                let left = parts.take(self.emit_expression(left));
                let right = parts.take(self.emit_expression(right));
                match reference {
                    Some(reference) => parts
                        .finish(nullish_test(&reference, left, right))
                        .hoisting(vec![reference]),
                    None => parts.finish(Node::LogicalExpression {
                        operator: operator.as_str(),
                        left: Box::new(left),
                        right: Box::new(right),
                    }),
                }
            }
            Expression::Conditional {
                test,
                consequent,
                alternate,
            } => {
                let mut parts = Aggregate::new();
                let test = parts.take(self.emit_expression(test));
                let consequent = parts.take(self.emit_expression(consequent));
                let alternate = parts.take(self.emit_expression(alternate));
                parts.finish(Node::ConditionalExpression {
                    test: Box::new(test),
                    consequent: Box::new(consequent),
                    alternate: Box::new(alternate),
                })
            }
            Expression::Assignment {
                operator,
                target,
                value,
            } => self.emit_assignment(*operator, target, value),

            Expression::Member {
                object,
                property,
                optional,
            } => {
                let mut parts = Aggregate::new();
                let object = parts.take(self.emit_expression(object));
                let (property, computed) = match property {
                    MemberProperty::Identifier(name) => (Node::identifier(name.as_str()), false),
                    MemberProperty::Computed(index) => (parts.take(self.emit_expression(index)), true),
                };
                parts.finish(Node::MemberExpression {
                    object: Box::new(object),
                    property: Box::new(property),
                    computed,
                    optional: *optional,
                })
            }
            Expression::Call {
                callee,
                arguments,
                optional,
            } => {
                let mut parts = Aggregate::new();
                let arguments = self.emit_arguments(&mut parts, arguments);
                if matches!(callee.as_ref(), Expression::Super) && self.in_derived_constructor {
                    let call = Node::call(Node::Super, arguments);
                    return parts.finish(Node::assign("=", Node::identifier("$self"), call));
                }
                let callee = parts.take(self.emit_expression(callee));
                parts.finish(Node::CallExpression {
                    callee: Box::new(callee),
                    arguments,
                    optional: *optional,
                })
            }
            Expression::New { callee, arguments } => {
                let mut parts = Aggregate::new();
                let callee = parts.take(self.emit_expression(callee));
                let arguments = self.emit_arguments(&mut parts, arguments);
                parts.finish(Node::NewExpression {
                    callee: Box::new(callee),
                    arguments,
                })
            }

            Expression::Spread(argument) => self.emit_expression(argument).map(|argument| {
                Node::SpreadElement {
                    argument: Box::new(argument),
                }
            }),
            Expression::Await(argument) => self
                .emit_expression(argument)
                .map(|argument| Node::AwaitExpression {
                    argument: Box::new(argument),
                })
                .asynchronous(),
            Expression::Yield { argument, delegate } => {
                let ast = match argument {
                    Some(argument) => self.emit_expression(argument).map(|argument| Some(Box::new(argument))),
                    None => Decorated::leaf(None),
                };
                ast.map(|argument| Node::YieldExpression {
                    argument,
                    delegate: *delegate,
                })
                .generator()
            }
            Expression::TypeAssertion { expression, .. } => self.emit_expression(expression),
            Expression::Parenthesized(inner) => self.emit_expression(inner),
        }
    }

    fn emit_arguments(&mut self, parts: &mut Aggregate, arguments: &[Expression]) -> Vec<Node> {
        arguments
            .iter()
            .map(|argument| parts.take(self.emit_expression(argument)))
            .collect()
    }

    fn emit_assignment(&mut self, operator: AssignmentOperator, target: &Pattern, value: &Expression) -> Ast {
        let hoisted = if operator == AssignmentOperator::Assign {
            target.bound_names()
        } else {
            Vec::new()
        };

        let mut parts = Aggregate::new();
        let target = parts.take(self.emit_pattern(target));
        let value = parts.take(self.emit_expression(value));

        let node = match operator {
            AssignmentOperator::ExponentAssign if self.lowers_exponent() => {
                Node::assign("=", target.clone(), math_pow(target, value))
            }
            AssignmentOperator::NullishAssign if self.lowers_nullish() => {
                let reference = self.reference();
                parts.scoped_variables.push(reference.clone());
                nullish_test(&reference, target.clone(), Node::assign("=", target, value))
            }
            AssignmentOperator::AndAssign
            | AssignmentOperator::OrAssign
            | AssignmentOperator::NullishAssign
                if self.options.target < TargetVersion::EsNext =>
            {
                let logical = match operator {
                    AssignmentOperator::AndAssign => "&&",
                    AssignmentOperator::OrAssign => "||",
                    _ => "??",
                };
                Node::LogicalExpression {
                    operator: logical,
                    left: Box::new(target.clone()),
                    right: Box::new(Node::assign("=", target, value)),
                }
            }
            _ => Node::assign(operator.as_str(), target, value),
        };
        parts.finish(node).hoisting(hoisted)
    }

    // ---- literals ----

    pub(crate) fn emit_string(&mut self, literal: &StringLiteral) -> Ast {
        let cutoff = literal.indent_cutoff as usize;
        if !literal.is_interpolated() {
            let text = literal.plain_text().unwrap_or_default();
            let delimiter = plain_delimiter(literal.quote);
            let escaped = escape_string(&dedent(&text, cutoff), delimiter);
            return Decorated::leaf(Node::Literal {
                value: Value::String(unescape(&escaped)),
                raw: format!("{d}{}{d}", escaped, d = delimiter),
                regex: None,
                bigint: None,
            });
        }

        let element = |raw: String, tail: bool| Node::TemplateElement {
            value: TemplateValue {
                cooked: unescape(&raw),
                raw,
            },
            tail,
        };
        let mut parts = Aggregate::new();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        let mut pending = String::new();
        for part in &literal.parts {
            match part {
                StringPart::Text(text) => pending.push_str(&escape_string(&dedent(text, cutoff), '`')),
                StringPart::Interpolation(expression) => {
                    quasis.push(element(std::mem::take(&mut pending), false));
                    expressions.push(parts.take(self.emit_expression(expression)));
                }
            }
        }
        quasis.push(element(pending, true));
        parts.finish(Node::TemplateLiteral { quasis, expressions })
    }

    fn emit_object(&mut self, properties: &[ObjectProperty]) -> Ast {
        let mut parts = Aggregate::new();
        let mut members = Vec::new();
        for property in properties {
            let member = match property {
                ObjectProperty::KeyValue { key, value } => {
                    let (key, computed) = parts.take(self.emit_property_key(key));
                    let value = parts.take(self.emit_expression(value));
                    Node::Property {
                        key: Box::new(key),
                        value: Box::new(value),
                        kind: "init",
                        method: false,
                        shorthand: false,
                        computed,
                    }
                }
                ObjectProperty::Shorthand(name) => Node::Property {
                    key: Box::new(Node::identifier(name.as_str())),
                    value: Box::new(Node::identifier(name.as_str())),
                    kind: "init",
                    method: false,
                    shorthand: true,
                    computed: false,
                },
                ObjectProperty::Spread(argument) => Node::SpreadElement {
                    argument: Box::new(parts.take(self.emit_expression(argument))),
                },
                ObjectProperty::Method {
                    key,
                    kind,
                    function,
                } => parts.take(self.emit_object_method(key, *kind, function)),
            };
            members.push(member);
        }
        parts.finish(Node::ObjectExpression { properties: members })
    }

    pub(crate) fn emit_property_key(&mut self, key: &PropertyKey) -> Key {
        match key {
            PropertyKey::Identifier(name) => Decorated::leaf((Node::identifier(name.as_str()), false)),
            PropertyKey::String(literal) => {
                let computed = literal.is_interpolated();
                self.emit_string(literal).map(|node| (node, computed))
            }
            PropertyKey::Number(raw) => {
                let text: String = raw.chars().filter(|&c| c != '_').collect();
                let value = parse_numeric(&text).unwrap_or(f64::NAN);
                Decorated::leaf((Node::number(value, text), false))
            }
            PropertyKey::Computed(expression) => self.emit_expression(expression).map(|node| (node, true)),
            PropertyKey::Symbol(name) => {
                Decorated::leaf((Node::member(Node::identifier("Symbol"), name), true))
            }
        }
    }

    /// Nested `flatMap` calls, one per `for` clause
    fn emit_comprehension(
        &mut self,
        element: &Expression,
        clauses: &[ComprehensionClause],
        conditions: &[Expression],
    ) -> Ast {
        let mut parts = Aggregate::new();
        let element = parts.take(self.emit_expression(element));
        let conditions: Vec<Node> = conditions
            .iter()
            .map(|condition| parts.take(self.emit_expression(condition)))
            .collect();

        let wrapped = Node::ArrayExpression {
            elements: vec![element],
        };
        let mut node = match conditions.into_iter().reduce(|left, right| Node::LogicalExpression {
            operator: "&&",
            left: Box::new(left),
            right: Box::new(right),
        }) {
            Some(test) => Node::ConditionalExpression {
                test: Box::new(test),
                consequent: Box::new(wrapped),
                alternate: Box::new(Node::ArrayExpression { elements: Vec::new() }),
            },
            None => wrapped,
        };
        for clause in clauses.iter().rev() {
            let binding = parts.take(self.emit_pattern(&clause.pattern));
            let source = parts.take(self.emit_expression(&clause.source));
            let source = if clause.keys {
                Node::call(Node::member(Node::identifier("Object"), "keys"), vec![source])
            } else {
                Node::call(Node::member(Node::identifier("Array"), "from"), vec![source])
            };
            let callback = Node::ArrowFunctionExpression {
                params: vec![binding],
                body: Box::new(node),
                is_async: false,
                expression: true,
            };
            node = Node::call(Node::member(source, "flatMap"), vec![callback]);
        }
        parts.finish(node)
    }

    // ---- patterns ----

    pub(crate) fn emit_pattern(&mut self, pattern: &Pattern) -> Ast {
        match pattern {
            Pattern::Identifier(name) => Decorated::leaf(Node::identifier(name.as_str())),
            Pattern::Expression(expression) => self.emit_expression(expression),
            Pattern::Array(elements) => {
                let mut parts = Aggregate::new();
                let elements = elements
                    .iter()
                    .map(|element| parts.take(self.emit_pattern(element)))
                    .collect();
                parts.finish(Node::ArrayPattern { elements })
            }
            Pattern::Object(properties) => {
                let mut parts = Aggregate::new();
                let mut members = Vec::new();
                for property in properties {
                    members.push(match property {
                        ObjectPatternProperty::Property { key, value, shorthand } => {
                            let (key, computed) = parts.take(self.emit_property_key(key));
                            let value = parts.take(self.emit_pattern(value));
                            Node::Property {
                                key: Box::new(key),
                                value: Box::new(value),
                                kind: "init",
                                method: false,
                                shorthand: *shorthand,
                                computed,
                            }
                        }
                        ObjectPatternProperty::Rest(target) => Node::RestElement {
                            argument: Box::new(parts.take(self.emit_pattern(target))),
                        },
                    });
                }
                parts.finish(Node::ObjectPattern { properties: members })
            }
            Pattern::Default { target, default } => {
                let mut parts = Aggregate::new();
                let target = parts.take(self.emit_pattern(target));
                let default = parts.take(self.emit_expression(default));
                parts.finish(Node::AssignmentPattern {
                    left: Box::new(target),
                    right: Box::new(default),
                })
            }
            Pattern::Rest(target) => self.emit_pattern(target).map(|target| Node::RestElement {
                argument: Box::new(target),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::estree::AstEmitter;
    use core_types::{CompileOptions, TargetVersion};
    use serde_json::{json, Value};

    fn program_with(source: &str, options: &CompileOptions) -> Value {
        let program = parser::parse(source).unwrap();
        let node = AstEmitter::new(options).emit_program(&program).unwrap();
        serde_json::to_value(node).unwrap()
    }

    /// Expression of the last statement
    fn last_expression(source: &str) -> Value {
        last_expression_with(source, &CompileOptions::default())
    }

    fn last_expression_with(source: &str, options: &CompileOptions) -> Value {
        let value = program_with(source, options);
        let body = value["body"].as_array().unwrap();
        body.last().unwrap()["expression"].clone()
    }

    #[test]
    fn test_equality_is_strict() {
        let expression = last_expression("a == b");
        assert_eq!(expression["type"], "BinaryExpression");
        assert_eq!(expression["operator"], "===");
    }

    #[test]
    fn test_keyword_unary_operator_is_trimmed() {
        let expression = last_expression("typeof x");
        assert_eq!(expression["operator"], "typeof");
        assert_eq!(expression["prefix"], true);
    }

    #[test]
    fn test_units_fold_to_numbers() {
        assert_eq!(last_expression("f(2.5s)")["arguments"][0]["value"], 2500.0);
        assert_eq!(last_expression("f(10px)")["arguments"][0]["value"], "10px");
    }

    #[test]
    fn test_bigint_literal() {
        let argument = &last_expression("f(12n)")["arguments"][0];
        assert_eq!(argument["bigint"], "12");
        assert_eq!(argument["raw"], "12n");
    }

    #[test]
    fn test_string_value_is_dedented_and_cooked() {
        let value = program_with("x = \"one\n     two\"", &CompileOptions::default());
        let literal = &value["body"][2]["expression"]["right"];
        assert_eq!(literal["value"], "one\ntwo");
        assert_eq!(literal["raw"], "\"one\\ntwo\"");
    }

    #[test]
    fn test_template_literal() {
        let expression = last_expression("f(\"a #{b} c\")");
        let template = &expression["arguments"][0];
        assert_eq!(template["type"], "TemplateLiteral");
        assert_eq!(template["quasis"][0]["value"]["raw"], "a ");
        assert_eq!(template["quasis"][1]["value"]["cooked"], " c");
        assert_eq!(template["quasis"][1]["tail"], true);
        assert_eq!(template["expressions"][0]["name"], "b");
    }

    #[test]
    fn test_nullish_lowering_hoists_reference() {
        let options = CompileOptions::default().with_target(TargetVersion::Es2017);
        let value = program_with("x = a ?? b", &options);
        let names: Vec<Value> = value["body"][1]["declarations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["id"]["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("$ref1"), json!("x")]);
        let conditional = &value["body"][2]["expression"]["right"];
        assert_eq!(conditional["type"], "ConditionalExpression");
        assert_eq!(conditional["test"]["left"]["left"]["name"], "$ref1");
    }

    #[test]
    fn test_exponent_lowering() {
        let options = CompileOptions::default().with_target(TargetVersion::Es2015);
        let expression = last_expression_with("f(a ** b)", &options);
        assert_eq!(expression["arguments"][0]["callee"]["object"]["name"], "Math");
        assert_eq!(expression["arguments"][0]["callee"]["property"]["name"], "pow");
    }

    #[test]
    fn test_receiver_at_top_level_is_this() {
        let expression = last_expression("@name");
        assert_eq!(expression["object"]["type"], "ThisExpression");
    }

    #[test]
    fn test_comprehension() {
        let expression = last_expression("[x * 2 for x of xs if x > 1]");
        assert_eq!(expression["callee"]["property"]["name"], "flatMap");
        assert_eq!(expression["callee"]["object"]["callee"]["property"]["name"], "from");
        let callback = &expression["arguments"][0];
        assert_eq!(callback["params"][0]["name"], "x");
        assert_eq!(callback["body"]["type"], "ConditionalExpression");
    }

    #[test]
    fn test_destructuring_assignment() {
        let value = program_with("{x, y: [a, b], ...others} = point", &CompileOptions::default());
        let target = &value["body"][2]["expression"]["left"];
        assert_eq!(target["type"], "ObjectPattern");
        assert_eq!(target["properties"][0]["shorthand"], true);
        assert_eq!(target["properties"][1]["value"]["type"], "ArrayPattern");
        assert_eq!(target["properties"][2]["type"], "RestElement");
    }

    #[test]
    fn test_regex_literal() {
        let expression = last_expression("f(/ab+c/gi)");
        assert_eq!(expression["arguments"][0]["regex"]["pattern"], "ab+c");
        assert_eq!(expression["arguments"][0]["regex"]["flags"], "gi");
    }
}
