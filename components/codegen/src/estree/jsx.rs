//! JSX elements as `JSX*` nodes, or as factory calls when a factory is set

use super::{AstEmitter, Ast, Node};
use crate::decorated::Aggregate;
use crate::lowering::{fragment_name, is_identifier_name, is_intrinsic_tag, jsx_text};
use parser::cst::{JsxAttribute, JsxAttributeValue, JsxChild, JsxElement};
use serde_json::Value;

/// `a.b.c` as nested member expressions
fn dotted(path: &str) -> Node {
    let mut segments = path.split('.');
    let head = Node::identifier(segments.next().unwrap_or_default());
    segments.fold(head, Node::member)
}

/// `a.b` as nested `JSXMemberExpression`s
fn jsx_name(name: &str) -> Node {
    let mut segments = name.split('.');
    let head = Node::JsxIdentifier {
        name: segments.next().unwrap_or_default().to_string(),
    };
    segments.fold(head, |object, property| Node::JsxMemberExpression {
        object: Box::new(object),
        property: Box::new(Node::JsxIdentifier {
            name: property.to_string(),
        }),
    })
}

/// String attribute value as written, quotes included
fn attribute_literal(text: &str) -> Node {
    let inner = text.get(1..text.len().saturating_sub(1)).unwrap_or_default();
    Node::literal(Value::String(inner.to_string()), text)
}

impl<'a> AstEmitter<'a> {
    pub(crate) fn emit_jsx(&mut self, element: &JsxElement) -> Ast {
        let mut parts = Aggregate::new();
        let node = match self.options.jsx_factory.clone() {
            Some(factory) => self.jsx_call(&mut parts, element, &factory),
            None => self.jsx_node(&mut parts, element),
        };
        parts.finish(node)
    }

    fn jsx_node(&mut self, parts: &mut Aggregate, element: &JsxElement) -> Node {
        let mut children = Vec::new();
        for child in &element.children {
            children.push(match child {
                JsxChild::Text(text) => Node::JsxText {
                    value: text.clone(),
                    raw: text.clone(),
                },
                JsxChild::Expression(expression) => Node::JsxExpressionContainer {
                    expression: Box::new(parts.take(self.emit_expression(expression))),
                },
                JsxChild::Element(element) => self.jsx_node(parts, element),
            });
        }

        let name = match &element.name {
            Some(name) => name,
            None => {
                return Node::JsxFragment {
                    opening_fragment: Box::new(Node::JsxOpeningFragment),
                    closing_fragment: Box::new(Node::JsxClosingFragment),
                    children,
                }
            }
        };

        let mut attributes = Vec::new();
        for attribute in &element.attributes {
            attributes.push(match attribute {
                JsxAttribute::Named { name, value } => Node::JsxAttribute {
                    name: Box::new(Node::JsxIdentifier { name: name.clone() }),
                    value: match value {
                        None => None,
                        Some(JsxAttributeValue::String(text)) => Some(Box::new(attribute_literal(text))),
                        Some(JsxAttributeValue::Expression(expression)) => {
                            Some(Box::new(Node::JsxExpressionContainer {
                                expression: Box::new(parts.take(self.emit_expression(expression))),
                            }))
                        }
                    },
                },
                JsxAttribute::Spread(expression) => Node::JsxSpreadAttribute {
                    argument: Box::new(parts.take(self.emit_expression(expression))),
                },
            });
        }

        Node::JsxElement {
            opening_element: Box::new(Node::JsxOpeningElement {
                name: Box::new(jsx_name(name)),
                attributes,
                self_closing: element.self_closing,
            }),
            closing_element: if element.self_closing {
                None
            } else {
                Some(Box::new(Node::JsxClosingElement {
                    name: Box::new(jsx_name(name)),
                }))
            },
            children,
        }
    }

    /// `factory(tag, props, ...children)`
    fn jsx_call(&mut self, parts: &mut Aggregate, element: &JsxElement, factory: &str) -> Node {
        let tag = match &element.name {
            None => dotted(&fragment_name(factory)),
            Some(name) if is_intrinsic_tag(name) => Node::string(name),
            Some(name) => dotted(name),
        };

        let mut properties = Vec::new();
        for attribute in &element.attributes {
            properties.push(match attribute {
                JsxAttribute::Named { name, value } => {
                    let key = if is_identifier_name(name) {
                        Node::identifier(name.as_str())
                    } else {
                        Node::string(name)
                    };
                    let value = match value {
                        None => Node::literal(Value::Bool(true), "true"),
                        Some(JsxAttributeValue::String(text)) => attribute_literal(text),
                        Some(JsxAttributeValue::Expression(expression)) => {
                            parts.take(self.emit_expression(expression))
                        }
                    };
                    Node::Property {
                        key: Box::new(key),
                        value: Box::new(value),
                        kind: "init",
                        method: false,
                        shorthand: false,
                        computed: false,
                    }
                }
                JsxAttribute::Spread(expression) => Node::SpreadElement {
                    argument: Box::new(parts.take(self.emit_expression(expression))),
                },
            });
        }
        let props = if properties.is_empty() {
            Node::literal(Value::Null, "null")
        } else {
            Node::ObjectExpression { properties }
        };

        let mut arguments = vec![tag, props];
        for child in &element.children {
            match child {
                JsxChild::Text(text) => arguments.extend(jsx_text(text).map(|text| Node::string(&text))),
                JsxChild::Expression(expression) => arguments.push(parts.take(self.emit_expression(expression))),
                JsxChild::Element(element) => arguments.push(self.jsx_call(parts, element, factory)),
            }
        }
        Node::call(dotted(factory), arguments)
    }
}

#[cfg(test)]
mod tests {
    use crate::estree::AstEmitter;
    use core_types::CompileOptions;
    use serde_json::Value;

    fn view_with(source: &str, options: &CompileOptions) -> Value {
        let program = parser::parse(source).unwrap();
        let node = AstEmitter::new(options).emit_program(&program).unwrap();
        let value = serde_json::to_value(node).unwrap();
        value["body"][2]["expression"]["right"].clone()
    }

    #[test]
    fn test_markup_becomes_jsx_nodes() {
        let view = view_with("view = <p class=\"note\">Hi {@name}</p>", &CompileOptions::default());
        assert_eq!(view["type"], "JSXElement");
        let opening = &view["openingElement"];
        assert_eq!(opening["name"]["name"], "p");
        assert_eq!(opening["attributes"][0]["value"]["value"], "note");
        assert_eq!(view["children"][0]["type"], "JSXText");
        assert_eq!(view["children"][1]["expression"]["object"]["type"], "ThisExpression");
        assert_eq!(view["closingElement"]["name"]["name"], "p");
    }

    #[test]
    fn test_factory_call() {
        let options = CompileOptions::default().with_jsx_factory(Some("h".into()));
        let view = view_with("view = <App open>Hello<br /></App>", &options);
        assert_eq!(view["callee"]["name"], "h");
        assert_eq!(view["arguments"][0]["name"], "App");
        assert_eq!(view["arguments"][1]["properties"][0]["value"]["value"], true);
        assert_eq!(view["arguments"][2]["value"], "Hello");
        assert_eq!(view["arguments"][3]["arguments"][0]["value"], "br");
        assert_eq!(view["arguments"][3]["arguments"][1]["value"], Value::Null);
    }

    #[test]
    fn test_fragment_uses_factory_namespace() {
        let options = CompileOptions::default().with_jsx_factory(Some("React.createElement".into()));
        let view = view_with("view = <><b>x</b></>", &options);
        assert_eq!(view["callee"]["object"]["name"], "React");
        assert_eq!(view["arguments"][0]["property"]["name"], "Fragment");
    }
}
