//! Type annotation productions

use super::{quoted, ParseResult, Parser};
use crate::cst::{TypeAnnotation, TypeMember, TypeParameter};
use crate::lexer::{Keyword, Punctuator, Token};

impl Parser {
    /// `: Type` if present
    pub(super) fn parse_optional_annotation(&mut self) -> ParseResult<Option<TypeAnnotation>> {
        if !self.check_punctuator(Punctuator::Colon) {
            return Ok(None);
        }
        self.advance();
        Ok(Some(self.parse_type()?))
    }

    pub(super) fn parse_type(&mut self) -> ParseResult<TypeAnnotation> {
        self.nested(Self::parse_type_level)
    }

    fn parse_type_level(&mut self) -> ParseResult<TypeAnnotation> {
        if self.check_punctuator(Punctuator::LParen) {
            if let Some(function) = self.attempt(|p| p.parse_function_type()) {
                return Ok(function);
            }
        }
        self.parse_union_type()
    }

    fn parse_function_type(&mut self) -> ParseResult<TypeAnnotation> {
        let params =
            self.parse_list(Punctuator::LParen, Punctuator::RParen, |p| p.parse_type_member())?;
        self.expect_punctuator(Punctuator::Arrow)?;
        let result = self.parse_type()?;
        Ok(TypeAnnotation::Function {
            params,
            result: Box::new(result),
        })
    }

    fn parse_union_type(&mut self) -> ParseResult<TypeAnnotation> {
        if self.check_punctuator(Punctuator::Or) {
            self.advance();
        }
        let mut members = vec![self.parse_intersection_type()?];
        while self.check_punctuator(Punctuator::Or) {
            self.advance();
            members.push(self.parse_intersection_type()?);
        }
        Ok(collapse(members, TypeAnnotation::Union))
    }

    fn parse_intersection_type(&mut self) -> ParseResult<TypeAnnotation> {
        let mut members = vec![self.parse_postfix_type()?];
        while self.check_punctuator(Punctuator::And) {
            self.advance();
            members.push(self.parse_postfix_type()?);
        }
        Ok(collapse(members, TypeAnnotation::Intersection))
    }

    fn parse_postfix_type(&mut self) -> ParseResult<TypeAnnotation> {
        let mut annotation = self.parse_primary_type()?;
        while self.check_punctuator(Punctuator::LBracket) {
            let closed = self.attempt(|p| {
                p.advance();
                p.expect_punctuator(Punctuator::RBracket)
            });
            if closed.is_none() {
                break;
            }
            annotation = TypeAnnotation::Array(Box::new(annotation));
        }
        Ok(annotation)
    }

    fn parse_primary_type(&mut self) -> ParseResult<TypeAnnotation> {
        match self.peek().clone() {
            Token::Punctuator(Punctuator::LParen) => {
                self.advance();
                let inner = self.bracketed(|p| {
                    let inner = p.parse_type()?;
                    p.expect_punctuator(Punctuator::RParen)?;
                    Ok(inner)
                })?;
                Ok(TypeAnnotation::Parenthesized(Box::new(inner)))
            }
            Token::Punctuator(Punctuator::LBracket) => {
                let members =
                    self.parse_list(Punctuator::LBracket, Punctuator::RBracket, |p| p.parse_type())?;
                Ok(TypeAnnotation::Tuple(members))
            }
            Token::Punctuator(Punctuator::LBrace) => {
                let members = self.parse_list(Punctuator::LBrace, Punctuator::RBrace, |p| {
                    p.parse_type_member()
                })?;
                Ok(TypeAnnotation::Object(members))
            }
            Token::Quote(quote) => {
                let literal = self.parse_string_literal()?;
                match literal.plain_text() {
                    Some(text) => Ok(TypeAnnotation::StringLiteral(format!(
                        "{}{}{}",
                        quote, text, quote
                    ))),
                    None => self.fail("type"),
                }
            }
            Token::Number { raw, unit: None } => {
                self.advance();
                Ok(TypeAnnotation::NumberLiteral(raw))
            }
            Token::Keyword(Keyword::Typeof) => {
                self.advance();
                Ok(TypeAnnotation::Typeof(self.parse_type_name()?))
            }
            Token::Identifier(_)
            | Token::Keyword(Keyword::Null | Keyword::Undefined | Keyword::Void | Keyword::This) => {
                let name = self.parse_type_name()?;
                let arguments = if self.check_punctuator(Punctuator::Lt) {
                    self.parse_type_arguments()?
                } else {
                    Vec::new()
                };
                Ok(TypeAnnotation::Reference { name, arguments })
            }
            _ => self.fail("type"),
        }
    }

    /// `a.b.C`
    fn parse_type_name(&mut self) -> ParseResult<String> {
        let mut name = self.expect_property_name()?;
        while self.check_punctuator(Punctuator::Dot) {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_property_name()?);
        }
        Ok(name)
    }

    fn parse_type_arguments(&mut self) -> ParseResult<Vec<TypeAnnotation>> {
        self.expect_punctuator(Punctuator::Lt)?;
        let mut arguments = vec![self.parse_type()?];
        while self.eat_punctuator(Punctuator::Comma) {
            arguments.push(self.parse_type()?);
        }
        self.expect_angle_close()?;
        Ok(arguments)
    }

    /// `name?: Type`
    fn parse_type_member(&mut self) -> ParseResult<TypeMember> {
        let name = self.expect_property_name()?;
        let optional = self.check_punctuator(Punctuator::Question);
        if optional {
            self.advance();
        }
        self.expect_punctuator(Punctuator::Colon)?;
        let annotation = self.parse_type()?;
        Ok(TypeMember {
            name,
            optional,
            annotation,
        })
    }

    /// `<T, U extends Bound>`; empty when absent
    pub(super) fn parse_type_parameters(&mut self) -> ParseResult<Vec<TypeParameter>> {
        if !self.check_punctuator(Punctuator::Lt) {
            return Ok(Vec::new());
        }
        self.advance();

        let mut params = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            let constraint = if self.check_keyword(Keyword::Extends) {
                self.advance();
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(TypeParameter { name, constraint });
            if !self.eat_punctuator(Punctuator::Comma) {
                break;
            }
        }
        self.expect_angle_close()?;
        Ok(params)
    }

    /// A single `>`, splitting `>>` and friends
    fn expect_angle_close(&mut self) -> ParseResult<()> {
        self.peek();
        if self.lexer.consume_angle_close() {
            Ok(())
        } else {
            self.fail(quoted(">"))
        }
    }
}

fn collapse(
    mut members: Vec<TypeAnnotation>,
    combine: fn(Vec<TypeAnnotation>) -> TypeAnnotation,
) -> TypeAnnotation {
    if members.len() == 1 {
        members.remove(0)
    } else {
        combine(members)
    }
}
