//! Expression productions, lowest precedence first

use super::{quoted, ParseResult, Parser};
use crate::cst::*;
use crate::lexer::{Keyword, Punctuator, SegmentEnd, Token};

impl Parser {
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_assignment_expression()
    }

    /// Assignment, yield and arrow functions
    pub(super) fn parse_assignment_expression(&mut self) -> ParseResult<Expression> {
        self.nested(Self::parse_assignment_level)
    }

    fn parse_assignment_level(&mut self) -> ParseResult<Expression> {
        if self.check_keyword(Keyword::Yield) {
            return self.parse_yield_expression();
        }

        if matches!(
            self.peek(),
            Token::Identifier(_) | Token::Punctuator(Punctuator::LParen | Punctuator::Lt)
        ) {
            if let Some(arrow) = self.attempt(|p| p.parse_arrow_function()) {
                return Ok(arrow);
            }
        }

        let left = self.parse_conditional_expression()?;
        let operator = match self.peek() {
            Token::Punctuator(punctuator) => assignment_operator(*punctuator),
            _ => None,
        };

        match operator {
            Some(operator) => {
                let target = self.expression_to_pattern(left)?;
                self.advance();
                let value = self.parse_assignment_expression()?;
                Ok(Expression::Assignment {
                    operator,
                    target: Box::new(target),
                    value: Box::new(value),
                })
            }
            None => Ok(left),
        }
    }

    fn parse_yield_expression(&mut self) -> ParseResult<Expression> {
        self.expect_keyword(Keyword::Yield)?;
        let delegate = self.check_punctuator(Punctuator::Star);
        if delegate {
            self.advance();
        }
        let argument = if !delegate && self.at_expression_end() {
            None
        } else {
            Some(Box::new(self.parse_assignment_expression()?))
        };
        Ok(Expression::Yield { argument, delegate })
    }

    /// `x => body`, `(params) => body`, `<T>(params): R => body`
    fn parse_arrow_function(&mut self) -> ParseResult<Expression> {
        let (type_params, params, return_type) = match self.peek().clone() {
            Token::Identifier(name) => {
                self.advance();
                let param = Parameter {
                    pattern: Pattern::Identifier(name),
                    annotation: None,
                };
                (Vec::new(), vec![param], None)
            }
            _ => {
                let type_params = self.parse_type_parameters()?;
                let params = self.parse_parameters()?;
                let return_type = self.parse_optional_annotation()?;
                (type_params, params, return_type)
            }
        };

        self.expect_punctuator(Punctuator::Arrow)?;
        let body = self.parse_arrow_body()?;
        Ok(Expression::Arrow(Box::new(Function {
            name: None,
            type_params,
            params,
            return_type,
            body,
        })))
    }

    fn parse_conditional_expression(&mut self) -> ParseResult<Expression> {
        let test = self.parse_nullish_expression()?;
        if !self.check_punctuator(Punctuator::Question) {
            return Ok(test);
        }
        self.advance();
        let consequent = self.parse_assignment_expression()?;
        self.expect_punctuator(Punctuator::Colon)?;
        let alternate = self.parse_assignment_expression()?;
        Ok(Expression::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn parse_nullish_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_logical_or_expression()?;
        while self.check_punctuator(Punctuator::NullishCoalesce) {
            self.advance();
            let right = self.parse_logical_or_expression()?;
            left = logical(LogicalOperator::NullishCoalescing, left, right);
        }
        Ok(left)
    }

    fn parse_logical_or_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_logical_and_expression()?;
        while self.check_punctuator(Punctuator::OrOr) || self.check_keyword(Keyword::Or) {
            self.advance();
            let right = self.parse_logical_and_expression()?;
            left = logical(LogicalOperator::Or, left, right);
        }
        Ok(left)
    }

    fn parse_logical_and_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_bitwise_or_expression()?;
        while self.check_punctuator(Punctuator::AndAnd) || self.check_keyword(Keyword::And) {
            self.advance();
            let right = self.parse_bitwise_or_expression()?;
            left = logical(LogicalOperator::And, left, right);
        }
        Ok(left)
    }

    fn parse_bitwise_or_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_bitwise_xor_expression()?;
        while self.check_punctuator(Punctuator::Or) {
            self.advance();
            let right = self.parse_bitwise_xor_expression()?;
            left = binary(BinaryOperator::BitwiseOr, left, right);
        }
        Ok(left)
    }

    fn parse_bitwise_xor_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_bitwise_and_expression()?;
        while self.check_punctuator(Punctuator::Xor) {
            self.advance();
            let right = self.parse_bitwise_and_expression()?;
            left = binary(BinaryOperator::BitwiseXor, left, right);
        }
        Ok(left)
    }

    fn parse_bitwise_and_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_equality_expression()?;
        while self.check_punctuator(Punctuator::And) {
            self.advance();
            let right = self.parse_equality_expression()?;
            left = binary(BinaryOperator::BitwiseAnd, left, right);
        }
        Ok(left)
    }

    fn parse_equality_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_relational_expression()?;
        loop {
            let operator = match self.peek() {
                Token::Punctuator(Punctuator::EqEq) => BinaryOperator::Equal,
                Token::Punctuator(Punctuator::NotEq) => BinaryOperator::NotEqual,
                Token::Punctuator(Punctuator::EqEqEq) => BinaryOperator::StrictEqual,
                Token::Punctuator(Punctuator::NotEqEq) => BinaryOperator::StrictNotEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational_expression()?;
            left = binary(operator, left, right);
        }
        Ok(left)
    }

    fn parse_relational_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_shift_expression()?;
        loop {
            if self.check_contextual("as") {
                self.advance();
                let annotation = self.parse_type()?;
                left = Expression::TypeAssertion {
                    expression: Box::new(left),
                    annotation,
                };
                continue;
            }
            let operator = match self.peek() {
                Token::Punctuator(Punctuator::Lt) => BinaryOperator::LessThan,
                Token::Punctuator(Punctuator::LtEq) => BinaryOperator::LessThanEqual,
                Token::Punctuator(Punctuator::Gt) => BinaryOperator::GreaterThan,
                Token::Punctuator(Punctuator::GtEq) => BinaryOperator::GreaterThanEqual,
                Token::Keyword(Keyword::Instanceof) => BinaryOperator::InstanceOf,
                Token::Keyword(Keyword::In) => BinaryOperator::In,
                _ => break,
            };
            self.advance();
            let right = self.parse_shift_expression()?;
            left = binary(operator, left, right);
        }
        Ok(left)
    }

    fn parse_shift_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_additive_expression()?;
        loop {
            let operator = match self.peek() {
                Token::Punctuator(Punctuator::LtLt) => BinaryOperator::LeftShift,
                Token::Punctuator(Punctuator::GtGt) => BinaryOperator::RightShift,
                Token::Punctuator(Punctuator::GtGtGt) => BinaryOperator::UnsignedRightShift,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive_expression()?;
            left = binary(operator, left, right);
        }
        Ok(left)
    }

    fn parse_additive_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_multiplicative_expression()?;
        loop {
            let operator = match self.peek() {
                Token::Punctuator(Punctuator::Plus) => BinaryOperator::Add,
                Token::Punctuator(Punctuator::Minus) => BinaryOperator::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative_expression()?;
            left = binary(operator, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_exponent_expression()?;
        loop {
            let operator = match self.peek() {
                Token::Punctuator(Punctuator::Star) => BinaryOperator::Multiply,
                Token::Punctuator(Punctuator::Slash) => BinaryOperator::Divide,
                Token::Punctuator(Punctuator::Percent) => BinaryOperator::Modulo,
                _ => break,
            };
            self.advance();
            let right = self.parse_exponent_expression()?;
            left = binary(operator, left, right);
        }
        Ok(left)
    }

    /// Right-associative `**`
    fn parse_exponent_expression(&mut self) -> ParseResult<Expression> {
        self.nested(Self::parse_exponent_level)
    }

    fn parse_exponent_level(&mut self) -> ParseResult<Expression> {
        let base = self.parse_unary_expression()?;
        if self.check_punctuator(Punctuator::StarStar) {
            self.advance();
            let exponent = self.parse_exponent_expression()?;
            return Ok(binary(BinaryOperator::Exponent, base, exponent));
        }
        Ok(base)
    }

    fn parse_unary_expression(&mut self) -> ParseResult<Expression> {
        self.nested(Self::parse_unary_level)
    }

    fn parse_unary_level(&mut self) -> ParseResult<Expression> {
        let operator = match self.peek() {
            Token::Punctuator(Punctuator::Minus) => Some(UnaryOperator::Minus),
            Token::Punctuator(Punctuator::Plus) => Some(UnaryOperator::Plus),
            Token::Punctuator(Punctuator::Not) | Token::Keyword(Keyword::Not) => {
                Some(UnaryOperator::Not)
            }
            Token::Punctuator(Punctuator::Tilde) => Some(UnaryOperator::BitwiseNot),
            Token::Keyword(Keyword::Typeof) => Some(UnaryOperator::Typeof),
            Token::Keyword(Keyword::Void) => Some(UnaryOperator::Void),
            Token::Keyword(Keyword::Delete) => Some(UnaryOperator::Delete),
            _ => None,
        };
        if let Some(operator) = operator {
            self.advance();
            let argument = self.parse_unary_expression()?;
            return Ok(Expression::Unary {
                operator,
                argument: Box::new(argument),
            });
        }

        if self.check_keyword(Keyword::Await) {
            self.advance();
            let argument = self.parse_unary_expression()?;
            return Ok(Expression::Await(Box::new(argument)));
        }

        let update = match self.peek() {
            Token::Punctuator(Punctuator::PlusPlus) => Some(UpdateOperator::Increment),
            Token::Punctuator(Punctuator::MinusMinus) => Some(UpdateOperator::Decrement),
            _ => None,
        };
        if let Some(operator) = update {
            self.advance();
            let argument = self.parse_unary_expression()?;
            if !is_update_target(&argument) {
                return self.fail("assignable target");
            }
            return Ok(Expression::Update {
                operator,
                prefix: true,
                argument: Box::new(argument),
            });
        }

        self.parse_postfix_expression()
    }

    fn parse_postfix_expression(&mut self) -> ParseResult<Expression> {
        let expression = self.parse_left_hand_side_expression()?;
        let operator = match self.peek() {
            Token::Punctuator(Punctuator::PlusPlus) => UpdateOperator::Increment,
            Token::Punctuator(Punctuator::MinusMinus) => UpdateOperator::Decrement,
            _ => return Ok(expression),
        };
        if !is_update_target(&expression) {
            return self.fail("assignable target");
        }
        self.advance();
        Ok(Expression::Update {
            operator,
            prefix: false,
            argument: Box::new(expression),
        })
    }

    /// Member access and call chains, including `new`
    pub(super) fn parse_left_hand_side_expression(&mut self) -> ParseResult<Expression> {
        let mut expression = if self.check_keyword(Keyword::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };

        loop {
            match self.peek() {
                Token::Punctuator(Punctuator::Dot) => {
                    self.advance();
                    let name = self.expect_property_name()?;
                    expression = member(expression, MemberProperty::Identifier(name), false);
                }
                Token::Punctuator(Punctuator::OptionalChain) => {
                    self.advance();
                    if self.check_punctuator(Punctuator::LParen) {
                        let arguments = self.parse_arguments()?;
                        expression = Expression::Call {
                            callee: Box::new(expression),
                            arguments,
                            optional: true,
                        };
                    } else if self.check_punctuator(Punctuator::LBracket) {
                        let property = self.parse_computed_member()?;
                        expression = member(expression, property, true);
                    } else {
                        let name = self.expect_property_name()?;
                        expression = member(expression, MemberProperty::Identifier(name), true);
                    }
                }
                Token::Punctuator(Punctuator::LBracket) => {
                    let property = self.parse_computed_member()?;
                    expression = member(expression, property, false);
                }
                Token::Punctuator(Punctuator::LParen) => {
                    let arguments = self.parse_arguments()?;
                    expression = Expression::Call {
                        callee: Box::new(expression),
                        arguments,
                        optional: false,
                    };
                }
                _ => break,
            }
        }

        Ok(expression)
    }

    fn parse_new_expression(&mut self) -> ParseResult<Expression> {
        self.expect_keyword(Keyword::New)?;
        let mut callee = if self.check_keyword(Keyword::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };

        loop {
            if self.check_punctuator(Punctuator::Dot) {
                self.advance();
                let name = self.expect_property_name()?;
                callee = member(callee, MemberProperty::Identifier(name), false);
            } else if self.check_punctuator(Punctuator::LBracket) {
                let property = self.parse_computed_member()?;
                callee = member(callee, property, false);
            } else {
                break;
            }
        }

        let arguments = if self.check_punctuator(Punctuator::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(Expression::New {
            callee: Box::new(callee),
            arguments,
        })
    }

    fn parse_computed_member(&mut self) -> ParseResult<MemberProperty> {
        self.expect_punctuator(Punctuator::LBracket)?;
        let property = self.bracketed(|p| {
            let property = p.parse_expression()?;
            p.expect_punctuator(Punctuator::RBracket)?;
            Ok(property)
        })?;
        Ok(MemberProperty::Computed(Box::new(property)))
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        self.parse_list(Punctuator::LParen, Punctuator::RParen, |p| p.parse_element())
    }

    /// Array element or call argument; may be spread
    fn parse_element(&mut self) -> ParseResult<Expression> {
        if self.check_punctuator(Punctuator::Spread) {
            self.advance();
            let argument = self.parse_assignment_expression()?;
            return Ok(Expression::Spread(Box::new(argument)));
        }
        self.parse_assignment_expression()
    }

    fn parse_primary_expression(&mut self) -> ParseResult<Expression> {
        let expression = match self.peek().clone() {
            Token::Identifier(name) => Expression::Identifier(name),
            Token::Number { raw, unit } => Expression::Number(NumberLiteral { raw, unit }),
            Token::SelfMember(name) => Expression::SelfMember(name),
            Token::WellKnownSymbol(name) => Expression::WellKnownSymbol(name),
            Token::Punctuator(Punctuator::At) => Expression::SelfRef,
            Token::Keyword(Keyword::True) => Expression::Boolean(true),
            Token::Keyword(Keyword::False) => Expression::Boolean(false),
            Token::Keyword(Keyword::Null) => Expression::Null,
            Token::Keyword(Keyword::Undefined) => Expression::Undefined,
            Token::Keyword(Keyword::This) => Expression::This,
            Token::Keyword(Keyword::Super) => Expression::Super,

            Token::Quote(_) => return Ok(Expression::String(self.parse_string_literal()?)),
            Token::Keyword(Keyword::Fn) => return self.parse_function_expression(),
            Token::Keyword(Keyword::Class) => {
                return Ok(Expression::Class(Box::new(self.parse_class(false)?)))
            }
            Token::Punctuator(Punctuator::LParen) => {
                self.advance();
                let inner = self.bracketed(|p| {
                    let inner = p.parse_expression()?;
                    p.expect_punctuator(Punctuator::RParen)?;
                    Ok(inner)
                })?;
                return Ok(Expression::Parenthesized(Box::new(inner)));
            }
            Token::Punctuator(Punctuator::LBracket) => return self.parse_array_literal(),
            Token::Punctuator(Punctuator::LBrace) => return self.parse_object_literal(),
            Token::Punctuator(Punctuator::Lt) => {
                return Ok(Expression::Jsx(Box::new(self.parse_jsx_element()?)))
            }
            Token::Punctuator(Punctuator::Slash | Punctuator::SlashEq) => {
                return match self.lexer.scan_regex() {
                    Some((pattern, flags)) => Ok(Expression::Regex { pattern, flags }),
                    None => self.fail("expression"),
                };
            }
            _ => return self.fail("expression"),
        };
        self.advance();
        Ok(expression)
    }

    fn parse_function_expression(&mut self) -> ParseResult<Expression> {
        self.expect_keyword(Keyword::Fn)?;
        let name = match self.peek() {
            Token::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        };
        let function = self.parse_function_rest(name)?;
        Ok(Expression::Function(Box::new(function)))
    }

    /// Quoted string with `#{…}` interpolation; the lexer hands over the
    /// body segment by segment
    pub(super) fn parse_string_literal(&mut self) -> ParseResult<StringLiteral> {
        let position = self.position();
        let quote = match self.peek() {
            Token::Quote(quote) => *quote,
            _ => return self.fail("string"),
        };
        self.advance();

        let mut parts = Vec::new();
        loop {
            let (text, end) = self.lexer.scan_string_segment(quote);
            if !text.is_empty() {
                parts.push(StringPart::Text(text));
            }
            match end {
                SegmentEnd::Closed => break,
                SegmentEnd::Interpolation => {
                    let expression = self.bracketed(|p| {
                        let expression = p.parse_expression()?;
                        p.expect_punctuator(Punctuator::RBrace)?;
                        Ok(expression)
                    })?;
                    parts.push(StringPart::Interpolation(Box::new(expression)));
                }
                SegmentEnd::Unterminated => {
                    return self.fail(format!("closing quote {}", quote));
                }
            }
        }

        Ok(StringLiteral {
            quote,
            parts,
            indent_cutoff: position.column,
        })
    }

    /// Array literal or comprehension
    pub(super) fn parse_array_literal(&mut self) -> ParseResult<Expression> {
        self.expect_punctuator(Punctuator::LBracket)?;
        self.bracketed(|p| {
            if p.check_punctuator(Punctuator::RBracket) {
                p.advance();
                return Ok(Expression::Array(Vec::new()));
            }

            let first = p.parse_element()?;
            if p.check_keyword(Keyword::For) {
                return p.parse_comprehension(first);
            }

            let mut elements = vec![first];
            loop {
                if !p.eat_punctuator(Punctuator::Comma) {
                    p.expect_punctuator(Punctuator::RBracket)?;
                    break;
                }
                if p.check_punctuator(Punctuator::RBracket) {
                    p.advance();
                    break;
                }
                elements.push(p.parse_element()?);
            }
            Ok(Expression::Array(elements))
        })
    }

    fn parse_comprehension(&mut self, element: Expression) -> ParseResult<Expression> {
        let mut clauses = Vec::new();
        while self.eat_keyword(Keyword::For) {
            let pattern = self.parse_binding_pattern()?;
            let keys = if self.eat_contextual("of") {
                false
            } else {
                self.expect_keyword(Keyword::In)?;
                true
            };
            let source = self.parse_conditional_expression()?;
            clauses.push(ComprehensionClause {
                pattern,
                source,
                keys,
            });
        }

        let mut conditions = Vec::new();
        while self.eat_keyword(Keyword::If) {
            conditions.push(self.parse_conditional_expression()?);
        }
        self.expect_punctuator(Punctuator::RBracket)?;

        Ok(Expression::Comprehension {
            element: Box::new(element),
            clauses,
            conditions,
        })
    }

    pub(super) fn parse_object_literal(&mut self) -> ParseResult<Expression> {
        let properties =
            self.parse_list(Punctuator::LBrace, Punctuator::RBrace, |p| p.parse_object_property())?;
        Ok(Expression::Object(properties))
    }

    fn parse_object_property(&mut self) -> ParseResult<ObjectProperty> {
        if self.check_punctuator(Punctuator::Spread) {
            self.advance();
            let argument = self.parse_assignment_expression()?;
            return Ok(ObjectProperty::Spread(argument));
        }

        if let Some((kind, key, function)) = self.attempt(|p| p.parse_accessor()) {
            return Ok(ObjectProperty::Method { key, kind, function });
        }

        let key = self.parse_property_key()?;
        if self.check_punctuator(Punctuator::LParen) || self.check_punctuator(Punctuator::Lt) {
            let function = self.parse_function_rest(None)?;
            return Ok(ObjectProperty::Method {
                key,
                kind: MethodKind::Method,
                function,
            });
        }

        if self.eat_punctuator(Punctuator::Colon) {
            let value = self.parse_assignment_expression()?;
            return Ok(ObjectProperty::KeyValue { key, value });
        }

        match key {
            // `{a = 1}` only makes sense as a destructuring target
            PropertyKey::Identifier(name) if self.check_punctuator(Punctuator::Assign) => {
                self.advance();
                let default = self.parse_assignment_expression()?;
                Ok(ObjectProperty::KeyValue {
                    key: PropertyKey::Identifier(name.clone()),
                    value: Expression::Assignment {
                        operator: AssignmentOperator::Assign,
                        target: Box::new(Pattern::Identifier(name)),
                        value: Box::new(default),
                    },
                })
            }
            PropertyKey::Identifier(name) => Ok(ObjectProperty::Shorthand(name)),
            _ => self.fail(quoted(":")),
        }
    }

    pub(super) fn parse_property_key(&mut self) -> ParseResult<PropertyKey> {
        let key = match self.peek().clone() {
            Token::Identifier(name) => PropertyKey::Identifier(name),
            Token::Keyword(keyword) => PropertyKey::Identifier(keyword.as_str().to_string()),
            Token::Number { raw, unit: None } => PropertyKey::Number(raw),
            Token::WellKnownSymbol(name) => PropertyKey::Symbol(name),
            Token::Quote(_) => return Ok(PropertyKey::String(self.parse_string_literal()?)),
            Token::Punctuator(Punctuator::LBracket) => {
                return match self.parse_computed_member()? {
                    MemberProperty::Computed(expression) => Ok(PropertyKey::Computed(expression)),
                    MemberProperty::Identifier(name) => Ok(PropertyKey::Identifier(name)),
                };
            }
            _ => return self.fail("property key"),
        };
        self.advance();
        Ok(key)
    }
}

fn assignment_operator(punctuator: Punctuator) -> Option<AssignmentOperator> {
    let operator = match punctuator {
        Punctuator::Assign => AssignmentOperator::Assign,
        Punctuator::PlusEq => AssignmentOperator::AddAssign,
        Punctuator::MinusEq => AssignmentOperator::SubtractAssign,
        Punctuator::StarEq => AssignmentOperator::MultiplyAssign,
        Punctuator::SlashEq => AssignmentOperator::DivideAssign,
        Punctuator::PercentEq => AssignmentOperator::ModuloAssign,
        Punctuator::StarStarEq => AssignmentOperator::ExponentAssign,
        Punctuator::LtLtEq => AssignmentOperator::LeftShiftAssign,
        Punctuator::GtGtEq => AssignmentOperator::RightShiftAssign,
        Punctuator::GtGtGtEq => AssignmentOperator::UnsignedRightShiftAssign,
        Punctuator::AndEq => AssignmentOperator::BitwiseAndAssign,
        Punctuator::OrEq => AssignmentOperator::BitwiseOrAssign,
        Punctuator::XorEq => AssignmentOperator::BitwiseXorAssign,
        Punctuator::AndAndEq => AssignmentOperator::AndAssign,
        Punctuator::OrOrEq => AssignmentOperator::OrAssign,
        Punctuator::NullishCoalesceEq => AssignmentOperator::NullishAssign,
        _ => return None,
    };
    Some(operator)
}

/// Operands `++` and `--` can write back to
fn is_update_target(expression: &Expression) -> bool {
    match expression {
        Expression::Identifier(_) | Expression::SelfMember(_) => true,
        Expression::Member { optional, .. } => !optional,
        Expression::Parenthesized(inner) => is_update_target(inner),
        _ => false,
    }
}

fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
    Expression::Binary {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn logical(operator: LogicalOperator, left: Expression, right: Expression) -> Expression {
    Expression::Logical {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn member(object: Expression, property: MemberProperty, optional: bool) -> Expression {
    Expression::Member {
        object: Box::new(object),
        property,
        optional,
    }
}
