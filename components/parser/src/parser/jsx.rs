//! JSX element literals
//!
//! Tags, attributes and text are read character by character from the
//! lexer; embedded `{expressions}` switch back to token mode.

use super::{quoted, ParseResult, Parser};
use crate::cst::{Expression, JsxAttribute, JsxAttributeValue, JsxChild, JsxElement};
use crate::lexer::{is_identifier_start, Punctuator};

impl Parser {
    /// `<tag attr…>children</tag>`, `<tag />` or `<>children</>`
    pub(super) fn parse_jsx_element(&mut self) -> ParseResult<JsxElement> {
        self.nested(Self::parse_jsx_element_level)
    }

    fn parse_jsx_element_level(&mut self) -> ParseResult<JsxElement> {
        if self.lexer.peek_char() != Some('<') {
            return self.fail(quoted("<"));
        }
        self.lexer.advance_char();

        if self.lexer.peek_char() == Some('>') {
            self.lexer.advance_char();
            let children = self.parse_jsx_children(None)?;
            return Ok(JsxElement {
                name: None,
                attributes: Vec::new(),
                children,
                self_closing: false,
            });
        }

        let name = self.lexer.scan_jsx_name();
        if name.is_empty() {
            return self.fail("tag name");
        }

        let mut attributes = Vec::new();
        loop {
            self.lexer.skip_jsx_whitespace();
            match self.lexer.peek_char() {
                Some('/') => {
                    self.lexer.advance_char();
                    if self.lexer.peek_char() != Some('>') {
                        return self.fail(quoted(">"));
                    }
                    self.lexer.advance_char();
                    return Ok(JsxElement {
                        name: Some(name),
                        attributes,
                        children: Vec::new(),
                        self_closing: true,
                    });
                }
                Some('>') => {
                    self.lexer.advance_char();
                    break;
                }
                Some('{') => {
                    self.lexer.advance_char();
                    let argument = self.bracketed(|p| {
                        p.expect_punctuator(Punctuator::Spread)?;
                        let argument = p.parse_assignment_expression()?;
                        p.expect_punctuator(Punctuator::RBrace)?;
                        Ok(argument)
                    })?;
                    attributes.push(JsxAttribute::Spread(argument));
                }
                Some(ch) if is_identifier_start(ch) => {
                    attributes.push(self.parse_jsx_attribute()?);
                }
                _ => return self.fail(quoted(">")),
            }
        }

        let children = self.parse_jsx_children(Some(&name))?;
        Ok(JsxElement {
            name: Some(name),
            attributes,
            children,
            self_closing: false,
        })
    }

    fn parse_jsx_attribute(&mut self) -> ParseResult<JsxAttribute> {
        let name = self.lexer.scan_jsx_name();
        self.lexer.skip_jsx_whitespace();
        if self.lexer.peek_char() != Some('=') {
            return Ok(JsxAttribute::Named { name, value: None });
        }
        self.lexer.advance_char();
        self.lexer.skip_jsx_whitespace();

        let value = if self.lexer.peek_char() == Some('{') {
            self.lexer.advance_char();
            let expression = self.parse_jsx_expression_container()?;
            match expression {
                Some(expression) => JsxAttributeValue::Expression(expression),
                None => return self.fail("expression"),
            }
        } else {
            match self.lexer.scan_jsx_string() {
                Some(text) => JsxAttributeValue::String(text),
                None => return self.fail("attribute value"),
            }
        };

        Ok(JsxAttribute::Named {
            name,
            value: Some(value),
        })
    }

    /// Children up to the closing tag matching `name` (`None` for fragments)
    fn parse_jsx_children(&mut self, name: Option<&str>) -> ParseResult<Vec<JsxChild>> {
        let closing = format!("closing tag </{}>", name.unwrap_or(""));
        let mut children = Vec::new();
        loop {
            match self.lexer.peek_char() {
                None => return self.fail(closing),
                Some('<') if self.lexer.peek_char_next() == Some('/') => {
                    self.lexer.advance_char();
                    self.lexer.advance_char();
                    self.lexer.skip_jsx_whitespace();
                    let found = self.lexer.scan_jsx_name();
                    self.lexer.skip_jsx_whitespace();
                    if found != name.unwrap_or("") || self.lexer.peek_char() != Some('>') {
                        return self.fail(closing);
                    }
                    self.lexer.advance_char();
                    return Ok(children);
                }
                Some('<') => children.push(JsxChild::Element(self.parse_jsx_element()?)),
                Some('{') => {
                    self.lexer.advance_char();
                    if let Some(expression) = self.parse_jsx_expression_container()? {
                        children.push(JsxChild::Expression(expression));
                    }
                }
                Some(_) => {
                    let text = self.lexer.scan_jsx_text();
                    if !text.is_empty() {
                        children.push(JsxChild::Text(text));
                    }
                }
            }
        }
    }

    /// Expression after `{` up to the matching `}`; `{}` yields `None`
    fn parse_jsx_expression_container(&mut self) -> ParseResult<Option<Expression>> {
        self.bracketed(|p| {
            if p.check_punctuator(Punctuator::RBrace) {
                p.advance();
                return Ok(None);
            }
            let expression = p.parse_assignment_expression()?;
            p.expect_punctuator(Punctuator::RBrace)?;
            Ok(Some(expression))
        })
    }
}
