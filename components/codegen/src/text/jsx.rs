//! JSX elements
//!
//! Without a factory the element is written back as JSX with its embedded
//! expressions compiled. With one, every element becomes a factory call.

use super::expressions::ASSIGNMENT;
use super::{Text, TextEmitter};
use crate::decorated::Aggregate;
use crate::lowering::{
    escape_mark, escape_mark_in_markup, fragment_name, is_identifier_name, is_intrinsic_tag, jsx_text,
    quote_text,
};
use parser::cst::{JsxAttribute, JsxAttributeValue, JsxChild, JsxElement};
use std::borrow::Cow;

impl<'a> TextEmitter<'a> {
    pub(crate) fn emit_jsx(&mut self, element: &JsxElement) -> Text {
        let mut parts = Aggregate::new();
        let output = match self.options.jsx_factory.clone() {
            Some(factory) => self.jsx_call(&mut parts, element, &factory),
            None => self.jsx_markup(&mut parts, element),
        };
        parts.finish(output)
    }

    fn jsx_markup(&mut self, parts: &mut Aggregate, element: &JsxElement) -> String {
        let name = element.name.as_deref().unwrap_or("");
        let mut output = format!("<{}", name);
        for attribute in &element.attributes {
            output.push(' ');
            match attribute {
                JsxAttribute::Named { name, value: None } => output.push_str(name),
                JsxAttribute::Named {
                    name,
                    value: Some(JsxAttributeValue::String(text)),
                } => match escape_mark(text) {
                    Cow::Borrowed(text) => output.push_str(&format!("{}={}", name, text)),
                    Cow::Owned(text) => output.push_str(&format!("{}={{{}}}", name, text)),
                },
                JsxAttribute::Named {
                    name,
                    value: Some(JsxAttributeValue::Expression(expression)),
                } => {
                    let value = parts.take(self.emit_expression(expression));
                    output.push_str(&format!("{}={{{}}}", name, value));
                }
                JsxAttribute::Spread(expression) => {
                    let value = parts.take(self.emit_expression(expression));
                    output.push_str(&format!("{{...{}}}", value));
                }
            }
        }
        if element.self_closing {
            output.push_str(" />");
            return output;
        }
        output.push('>');
        for child in &element.children {
            match child {
                JsxChild::Text(text) => output.push_str(&escape_mark_in_markup(text)),
                JsxChild::Expression(expression) => {
                    let value = parts.take(self.emit_expression(expression));
                    output.push_str(&format!("{{{}}}", value));
                }
                JsxChild::Element(element) => output.push_str(&self.jsx_markup(parts, element)),
            }
        }
        output.push_str(&format!("</{}>", name));
        output
    }

    /// `factory(tag, props, ...children)`
    fn jsx_call(&mut self, parts: &mut Aggregate, element: &JsxElement, factory: &str) -> String {
        let tag = match &element.name {
            None => fragment_name(factory),
            Some(name) if is_intrinsic_tag(name) => quote_text(name),
            Some(name) => name.clone(),
        };

        let mut props = Vec::new();
        for attribute in &element.attributes {
            props.push(match attribute {
                JsxAttribute::Named { name, value } => {
                    let key = if is_identifier_name(name) {
                        name.clone()
                    } else {
                        quote_text(name)
                    };
                    let value = match value {
                        None => "true".to_string(),
                        Some(JsxAttributeValue::String(text)) => escape_mark(text).into_owned(),
                        Some(JsxAttributeValue::Expression(expression)) => {
                            parts.take(self.emit_operand(expression, ASSIGNMENT))
                        }
                    };
                    format!("{}: {}", key, value)
                }
                JsxAttribute::Spread(expression) => {
                    format!("...{}", parts.take(self.emit_operand(expression, ASSIGNMENT)))
                }
            });
        }
        let props = if props.is_empty() {
            "null".to_string()
        } else {
            format!("{{ {} }}", props.join(", "))
        };

        let mut arguments = vec![tag, props];
        for child in &element.children {
            match child {
                JsxChild::Text(text) => arguments.extend(jsx_text(text).map(|t| quote_text(&t))),
                JsxChild::Expression(expression) => {
                    arguments.push(parts.take(self.emit_operand(expression, ASSIGNMENT)))
                }
                JsxChild::Element(element) => arguments.push(self.jsx_call(parts, element, factory)),
            }
        }
        format!("{}({})", factory, arguments.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use crate::text::TextEmitter;
    use core_types::CompileOptions;

    fn line_with(source: &str, options: &CompileOptions) -> String {
        let program = parser::parse(source).unwrap();
        let output = TextEmitter::new(options).emit_program(&program).unwrap();
        output.lines().last().unwrap().to_string()
    }

    #[test]
    fn test_markup_is_preserved() {
        assert_eq!(
            line_with("view = <p class=\"note\">Hi {@name}</p>", &CompileOptions::default()),
            "view = <p class=\"note\">Hi {this.name}</p>;"
        );
    }

    #[test]
    fn test_factory_call() {
        let options = CompileOptions::default().with_jsx_factory(Some("h".into()));
        assert_eq!(
            line_with("view = <App title=\"x\" open {...rest}>Hello {name}<br /></App>", &options),
            "view = h(App, { title: \"x\", open: true, ...rest }, \"Hello \", name, h(\"br\", null));"
        );
    }

    #[test]
    fn test_fragment_uses_factory_namespace() {
        let options = CompileOptions::default().with_jsx_factory(Some("React.createElement".into()));
        assert_eq!(
            line_with("view = <><b>x</b></>", &options),
            "view = React.createElement(React.Fragment, null, React.createElement(\"b\", null, \"x\"));"
        );
    }
}
