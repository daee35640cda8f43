//! Destructuring targets
//!
//! Array and object patterns are parsed as literals first and converted
//! afterwards, so `[a, b] = pair` needs no lookahead.

use super::{ParseResult, Parser};
use crate::cst::*;
use crate::lexer::{Punctuator, Token};

impl Parser {
    /// Pattern introduced by `let`, `const`, parameters, loops and `catch`
    pub(super) fn parse_binding_pattern(&mut self) -> ParseResult<Pattern> {
        let literal = match self.peek() {
            Token::Identifier(_) => return Ok(Pattern::Identifier(self.expect_identifier()?)),
            Token::Punctuator(Punctuator::LBracket) => self.parse_array_literal()?,
            Token::Punctuator(Punctuator::LBrace) => self.parse_object_literal()?,
            _ => return self.fail("binding pattern"),
        };
        match to_pattern(literal, true) {
            Some(pattern) => Ok(pattern),
            None => self.fail("binding pattern"),
        }
    }

    /// Reinterpret the left side of an assignment as a target
    pub(super) fn expression_to_pattern(&mut self, expression: Expression) -> ParseResult<Pattern> {
        match to_pattern(expression, false) {
            Some(pattern) => Ok(pattern),
            None => self.fail("assignable target"),
        }
    }
}

/// `binding` rejects member targets, which only assignments allow
fn to_pattern(expression: Expression, binding: bool) -> Option<Pattern> {
    match expression {
        Expression::Identifier(name) => Some(Pattern::Identifier(name)),
        Expression::Member { .. } | Expression::SelfMember(_) if !binding => {
            Some(Pattern::Expression(Box::new(expression)))
        }
        Expression::Parenthesized(inner) if !binding => to_pattern(*inner, binding),
        Expression::Array(elements) => elements
            .into_iter()
            .map(|element| element_to_pattern(element, binding))
            .collect::<Option<Vec<_>>>()
            .map(Pattern::Array),
        Expression::Object(properties) => properties
            .into_iter()
            .map(|property| property_to_pattern(property, binding))
            .collect::<Option<Vec<_>>>()
            .map(Pattern::Object),
        _ => None,
    }
}

fn element_to_pattern(element: Expression, binding: bool) -> Option<Pattern> {
    match element {
        Expression::Spread(inner) => Some(Pattern::Rest(Box::new(to_pattern(*inner, binding)?))),
        Expression::Assignment {
            operator: AssignmentOperator::Assign,
            target,
            value,
        } => {
            if binding && has_member_target(&target) {
                return None;
            }
            Some(Pattern::Default {
                target,
                default: value,
            })
        }
        other => to_pattern(other, binding),
    }
}

fn property_to_pattern(property: ObjectProperty, binding: bool) -> Option<ObjectPatternProperty> {
    match property {
        ObjectProperty::Shorthand(name) => Some(ObjectPatternProperty::Property {
            key: PropertyKey::Identifier(name.clone()),
            value: Pattern::Identifier(name),
            shorthand: true,
        }),
        ObjectProperty::KeyValue { key, value } => {
            let shorthand = match (&key, &value) {
                (
                    PropertyKey::Identifier(name),
                    Expression::Assignment {
                        operator: AssignmentOperator::Assign,
                        target,
                        ..
                    },
                ) => matches!(target.as_ref(), Pattern::Identifier(t) if t == name),
                _ => false,
            };
            Some(ObjectPatternProperty::Property {
                key,
                value: element_to_pattern(value, binding)?,
                shorthand,
            })
        }
        ObjectProperty::Spread(inner) => Some(ObjectPatternProperty::Rest(Box::new(to_pattern(
            inner, binding,
        )?))),
        ObjectProperty::Method { .. } => None,
    }
}

fn has_member_target(pattern: &Pattern) -> bool {
    match pattern {
        Pattern::Expression(_) => true,
        Pattern::Identifier(_) => false,
        Pattern::Array(elements) => elements.iter().any(has_member_target),
        Pattern::Object(properties) => properties.iter().any(|property| match property {
            ObjectPatternProperty::Property { value, .. } => has_member_target(value),
            ObjectPatternProperty::Rest(target) => has_member_target(target),
        }),
        Pattern::Default { target, .. } | Pattern::Rest(target) => has_member_target(target),
    }
}
