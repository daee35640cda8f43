//! Expression handlers
//!
//! Operands are emitted through [`TextEmitter::emit_operand`], which adds
//! parentheses whenever the output precedence of a child is lower than its
//! position requires. The parser keeps source parentheses, so this only
//! matters where lowering changes an operator or the output grammar is
//! stricter than the source grammar (`??` mixed with `||`, unary `**` bases).

use super::{Text, TextEmitter};
use crate::decorated::{Aggregate, Decorated};
use crate::grow_stack;
use crate::lowering::{
    dedent, escape_mark, escape_string, lower_number, plain_delimiter, quote_text, NumberOutput,
};
use core_types::TargetVersion;
use parser::cst::*;

pub(crate) const ASSIGNMENT: u8 = 2;
pub(crate) const CONDITIONAL: u8 = 3;
pub(crate) const LOGICAL_OR: u8 = 4;
pub(crate) const LOGICAL_AND: u8 = 5;
pub(crate) const BITWISE_OR: u8 = 6;
pub(crate) const RELATIONAL: u8 = 10;
pub(crate) const SHIFT: u8 = 11;
pub(crate) const EXPONENT: u8 = 14;
pub(crate) const UNARY: u8 = 15;
pub(crate) const POSTFIX: u8 = 16;
pub(crate) const CALL: u8 = 18;
pub(crate) const PRIMARY: u8 = 20;

fn binary_precedence(operator: BinaryOperator) -> u8 {
    use BinaryOperator::*;
    match operator {
        BitwiseOr => BITWISE_OR,
        BitwiseXor => 7,
        BitwiseAnd => 8,
        Equal | NotEqual | StrictEqual | StrictNotEqual => 9,
        LessThan | LessThanEqual | GreaterThan | GreaterThanEqual | InstanceOf | In => RELATIONAL,
        LeftShift | RightShift | UnsignedRightShift => SHIFT,
        Add | Subtract => 12,
        Multiply | Divide | Modulo => 13,
        Exponent => EXPONENT,
    }
}

impl<'a> TextEmitter<'a> {
    /// Output precedence of an expression after lowering
    pub(crate) fn precedence(&self, expression: &Expression) -> u8 {
        match expression {
            Expression::Assignment { .. }
            | Expression::Arrow(_)
            | Expression::Yield { .. }
            | Expression::Spread(_) => ASSIGNMENT,
            Expression::Conditional { .. } => CONDITIONAL,
            Expression::Logical { operator, .. } => match operator {
                LogicalOperator::And => LOGICAL_AND,
                LogicalOperator::Or => LOGICAL_OR,
                LogicalOperator::NullishCoalescing if self.lowers_nullish() => PRIMARY,
                LogicalOperator::NullishCoalescing => LOGICAL_OR,
            },
            Expression::Binary {
                operator: BinaryOperator::Exponent,
                ..
            } if self.lowers_exponent() => CALL,
            Expression::Binary { operator, .. } => binary_precedence(*operator),
            Expression::Unary { .. } | Expression::Await(_) => UNARY,
            Expression::Update { prefix: true, .. } => UNARY,
            Expression::Update { .. } => POSTFIX,
            Expression::Member { .. }
            | Expression::Call { .. }
            | Expression::New { .. }
            | Expression::SelfMember(_)
            | Expression::WellKnownSymbol(_)
            | Expression::Comprehension { .. } => CALL,
            Expression::Jsx(_) if self.options.jsx_factory.is_some() => CALL,
            Expression::TypeAssertion { expression, .. } => {
                if self.options.emit_type_annotations {
                    RELATIONAL
                } else {
                    self.precedence(expression)
                }
            }
            _ => PRIMARY,
        }
    }

    fn lowers_nullish(&self) -> bool {
        !self.options.target.supports_nullish_coalescing()
    }

    fn lowers_exponent(&self) -> bool {
        !self.options.target.supports_exponent_operator()
    }

    /// Emit `expression`, parenthesised when its precedence is below `min`
    pub(crate) fn emit_operand(&mut self, expression: &Expression, min: u8) -> Text {
        let wrap = self.precedence(expression) < min;
        let text = self.emit_expression(expression);
        if wrap {
            text.map(|output| format!("({})", output))
        } else {
            text
        }
    }

    pub(crate) fn emit_expression(&mut self, expression: &Expression) -> Text {
        grow_stack(|| self.emit_expression_kind(expression))
    }

    fn emit_expression_kind(&mut self, expression: &Expression) -> Text {
        match expression {
            Expression::Identifier(name) => Decorated::leaf(name.clone()),
            Expression::Number(literal) => Decorated::leaf(match lower_number(literal) {
                NumberOutput::Numeric(text) => text,
                NumberOutput::Text(text) => quote_text(&text),
            }),
            Expression::String(literal) => self.emit_string(literal),
            Expression::Regex { pattern, flags } => {
                Decorated::leaf(format!("/{}/{}", escape_mark(pattern), flags))
            }
            Expression::Boolean(value) => Decorated::leaf(value.to_string()),
            Expression::Null => Decorated::leaf("null".to_string()),
            Expression::Undefined => Decorated::leaf("undefined".to_string()),
            Expression::This => Decorated::leaf("this".to_string()),
            Expression::Super => Decorated::leaf("super".to_string()),
            Expression::SelfRef => Decorated::leaf(self.receiver().to_string()),
            Expression::SelfMember(name) => {
                Decorated::leaf(format!("{}.{}", self.receiver(), name))
            }
            Expression::WellKnownSymbol(name) => Decorated::leaf(format!("Symbol.{}", name)),

            Expression::Array(elements) => {
                let mut parts = Aggregate::new();
                let elements: Vec<String> = elements
                    .iter()
                    .map(|element| parts.take(self.emit_operand(element, ASSIGNMENT)))
                    .collect();
                parts.finish(format!("[{}]", elements.join(", ")))
            }
            Expression::Comprehension {
                element,
                clauses,
                conditions,
            } => self.emit_comprehension(element, clauses, conditions),
            Expression::Object(properties) => self.emit_object(properties),

            Expression::Function(function) => self.emit_function_expression(function),
            Expression::Arrow(function) => self.emit_arrow(function),
            Expression::Class(class) => self.emit_class(class),
            Expression::Jsx(element) => self.emit_jsx(element),

            Expression::Unary { operator, argument } => {
                self.emit_operand(argument, UNARY).map(|argument| {
                    let sign_clash = matches!(
                        (operator, argument.chars().next()),
                        (UnaryOperator::Minus, Some('-')) | (UnaryOperator::Plus, Some('+'))
                    );
                    if sign_clash {
                        format!("{}({})", operator.as_str(), argument)
                    } else {
                        format!("{}{}", operator.as_str(), argument)
                    }
                })
            }
            Expression::Update {
                operator,
                prefix,
                argument,
            } => self.emit_operand(argument, CALL).map(|argument| {
                if *prefix {
                    format!("{}{}", operator.as_str(), argument)
                } else {
                    format!("{}{}", argument, operator.as_str())
                }
            }),
            Expression::Binary {
                operator,
                left,
                right,
            } => self.emit_binary(*operator, left, right),
            Expression::Logical {
                operator,
                left,
                right,
            } => self.emit_logical(*operator, left, right),
            Expression::Conditional {
                test,
                consequent,
                alternate,
            } => {
                let mut parts = Aggregate::new();
                let test = parts.take(self.emit_operand(test, LOGICAL_OR));
                let consequent = parts.take(self.emit_operand(consequent, ASSIGNMENT));
                let alternate = parts.take(self.emit_operand(alternate, ASSIGNMENT));
                parts.finish(format!("{} ? {} : {}", test, consequent, alternate))
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
                let object = parts.take(self.emit_operand(object, CALL));
                let output = match property {
                    MemberProperty::Identifier(name) if *optional => format!("{}?.{}", object, name),
                    MemberProperty::Identifier(name) => format!("{}.{}", object, name),
                    MemberProperty::Computed(index) => {
                        let index = parts.take(self.emit_expression(index));
                        let dot = if *optional { "?." } else { "" };
                        format!("{}{}[{}]", object, dot, index)
                    }
                };
                parts.finish(output)
            }
            Expression::Call {
                callee,
                arguments,
                optional,
            } => {
                let mut parts = Aggregate::new();
                let arguments = self.emit_arguments(&mut parts, arguments);
                if matches!(callee.as_ref(), Expression::Super) && self.in_derived_constructor {
                    return parts.finish(format!("($self = super({}))", arguments));
                }
                let callee = parts.take(self.emit_operand(callee, CALL));
                let dot = if *optional { "?." } else { "" };
                parts.finish(format!("{}{}({})", callee, dot, arguments))
            }
            Expression::New { callee, arguments } => {
                let mut parts = Aggregate::new();
                let callee_text = parts.take(self.emit_operand(callee, CALL));
                let callee_text = if matches!(callee.as_ref(), Expression::Call { .. }) {
                    format!("({})", callee_text)
                } else {
                    callee_text
                };
                let arguments = self.emit_arguments(&mut parts, arguments);
                parts.finish(format!("new {}({})", callee_text, arguments))
            }

            Expression::Spread(argument) => self
                .emit_operand(argument, ASSIGNMENT)
                .map(|argument| format!("...{}", argument)),
            Expression::Await(argument) => self
                .emit_operand(argument, UNARY)
                .map(|argument| format!("await {}", argument))
                .asynchronous(),
            Expression::Yield { argument, delegate } => {
                let star = if *delegate { "*" } else { "" };
                let text = match argument {
                    Some(argument) => self
                        .emit_operand(argument, ASSIGNMENT)
                        .map(|argument| format!("yield{} {}", star, argument)),
                    None => Decorated::leaf(format!("yield{}", star)),
                };
                text.generator()
            }
            Expression::TypeAssertion {
                expression,
                annotation,
            } => {
                if self.options.emit_type_annotations {
                    self.emit_operand(expression, SHIFT)
                        .map(|expression| format!("{} as {}", expression, super::type_text(annotation)))
                } else {
                    self.emit_expression(expression)
                }
            }
            Expression::Parenthesized(inner) => self
                .emit_expression(inner)
                .map(|inner| format!("({})", inner)),
        }
    }

    fn emit_arguments(&mut self, parts: &mut Aggregate, arguments: &[Expression]) -> String {
        arguments
            .iter()
            .map(|argument| parts.take(self.emit_operand(argument, ASSIGNMENT)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn emit_binary(&mut self, operator: BinaryOperator, left: &Expression, right: &Expression) -> Text {
        let mut parts = Aggregate::new();
        if operator == BinaryOperator::Exponent && self.lowers_exponent() {
            let left = parts.take(self.emit_operand(left, ASSIGNMENT));
            let right = parts.take(self.emit_operand(right, ASSIGNMENT));
            return parts.finish(format!("Math.pow({}, {})", left, right));
        }

        let own = binary_precedence(operator);
        // `-a ** b` is a syntax error, and `**` groups to the right
        let (left_min, right_min) = if operator == BinaryOperator::Exponent {
            (POSTFIX, own)
        } else {
            (own, own + 1)
        };
        let left = parts.take(self.emit_operand(left, left_min));
        let right = parts.take(self.emit_operand(right, right_min));
        parts.finish(format!("{} {} {}", left, operator.as_str(), right))
    }

    fn emit_logical(&mut self, operator: LogicalOperator, left: &Expression, right: &Expression) -> Text {
        let mut parts = Aggregate::new();
        if operator == LogicalOperator::NullishCoalescing && self.lowers_nullish() {
            let reference = self.reference();
            let left = parts.take(self.emit_operand(left, ASSIGNMENT));
            let right = parts.take(self.emit_operand(right, ASSIGNMENT));
            return parts
                .finish(format!(
                    "(({r} = {}) != null ? {r} : {})",
                    left,
                    right,
                    r = reference
                ))
                .hoisting(vec![reference]);
        }

        let own = match operator {
            LogicalOperator::And => LOGICAL_AND,
            _ => LOGICAL_OR,
        };
        let left = self.emit_logical_operand(&mut parts, operator, left, own);
        let right = self.emit_logical_operand(&mut parts, operator, right, own + 1);
        parts.finish(format!("{} {} {}", left, operator.as_str(), right))
    }

    /// `??` may not share an unparenthesised chain with `&&` or `||`
    fn emit_logical_operand(
        &mut self,
        parts: &mut Aggregate,
        operator: LogicalOperator,
        operand: &Expression,
        min: u8,
    ) -> String {
        let mixes = match operand {
            Expression::Logical { operator: inner, .. } => {
                let nullish = |op: LogicalOperator| op == LogicalOperator::NullishCoalescing;
                nullish(operator) != nullish(*inner)
                    && !(nullish(*inner) && self.lowers_nullish())
            }
            _ => false,
        };
        let text = parts.take(self.emit_operand(operand, min));
        if mixes && self.precedence(operand) >= min {
            format!("({})", text)
        } else {
            text
        }
    }

    fn emit_assignment(
        &mut self,
        operator: AssignmentOperator,
        target: &Pattern,
        value: &Expression,
    ) -> Text {
        let hoisted = if operator == AssignmentOperator::Assign {
            target.bound_names()
        } else {
            Vec::new()
        };

        let mut parts = Aggregate::new();
        let target = parts.take(self.emit_pattern(target));
        let value = parts.take(self.emit_operand(value, ASSIGNMENT));
        let target_version = self.options.target;

        let output = match operator {
            AssignmentOperator::ExponentAssign if self.lowers_exponent() => {
                format!("{t} = Math.pow({t}, {})", value, t = target)
            }
            AssignmentOperator::NullishAssign if self.lowers_nullish() => {
                let reference = self.reference();
                parts.scoped_variables.push(reference.clone());
                format!(
                    "(({r} = {t}) != null ? {r} : ({t} = {}))",
                    value,
                    r = reference,
                    t = target
                )
            }
            AssignmentOperator::AndAssign
            | AssignmentOperator::OrAssign
            | AssignmentOperator::NullishAssign
                if target_version < TargetVersion::EsNext =>
            {
                let logical = match operator {
                    AssignmentOperator::AndAssign => "&&",
                    AssignmentOperator::OrAssign => "||",
                    _ => "??",
                };
                format!("{t} {} ({t} = {})", logical, value, t = target)
            }
            _ => format!("{} {} {}", target, operator.as_str(), value),
        };
        parts.finish(output).hoisting(hoisted)
    }

    // ---- literals ----

    fn emit_string(&mut self, literal: &StringLiteral) -> Text {
        let cutoff = literal.indent_cutoff as usize;
        if !literal.is_interpolated() {
            let text = literal.plain_text().unwrap_or_default();
            let delimiter = plain_delimiter(literal.quote);
            return Decorated::leaf(format!(
                "{d}{}{d}",
                escape_string(&dedent(&text, cutoff), delimiter),
                d = delimiter
            ));
        }

        let mut parts = Aggregate::new();
        let mut output = String::from("`");
        for part in &literal.parts {
            match part {
                StringPart::Text(text) => output.push_str(&escape_string(&dedent(text, cutoff), '`')),
                StringPart::Interpolation(expression) => {
                    output.push_str("${");
                    output.push_str(&parts.take(self.emit_expression(expression)));
                    output.push('}');
                }
            }
        }
        output.push('`');
        parts.finish(output)
    }

    fn emit_object(&mut self, properties: &[ObjectProperty]) -> Text {
        if properties.is_empty() {
            return Decorated::leaf("{}".to_string());
        }
        let mut parts = Aggregate::new();
        let mut members = Vec::new();
        for property in properties {
            let member = match property {
                ObjectProperty::KeyValue { key, value } => {
                    let key = parts.take(self.emit_property_key(key));
                    let value = parts.take(self.emit_operand(value, ASSIGNMENT));
                    format!("{}: {}", key, value)
                }
                ObjectProperty::Shorthand(name) => name.clone(),
                ObjectProperty::Spread(argument) => {
                    format!("...{}", parts.take(self.emit_operand(argument, ASSIGNMENT)))
                }
                ObjectProperty::Method {
                    key,
                    kind,
                    function,
                } => parts.take(self.emit_object_method(key, *kind, function)),
            };
            members.push(member);
        }
        parts.finish(format!("{{ {} }}", members.join(", ")))
    }

    pub(crate) fn emit_property_key(&mut self, key: &PropertyKey) -> Text {
        match key {
            PropertyKey::Identifier(name) => Decorated::leaf(name.clone()),
            PropertyKey::String(literal) if literal.is_interpolated() => self
                .emit_string(literal)
                .map(|text| format!("[{}]", text)),
            PropertyKey::String(literal) => self.emit_string(literal),
            PropertyKey::Number(raw) => Decorated::leaf(raw.chars().filter(|&c| c != '_').collect()),
            PropertyKey::Computed(expression) => self
                .emit_operand(expression, ASSIGNMENT)
                .map(|text| format!("[{}]", text)),
            PropertyKey::Symbol(name) => Decorated::leaf(format!("[Symbol.{}]", name)),
        }
    }

    /// `Array.from(src).flatMap((pat) => cond ? [expr] : [])`, one level per clause
    fn emit_comprehension(
        &mut self,
        element: &Expression,
        clauses: &[ComprehensionClause],
        conditions: &[Expression],
    ) -> Text {
        let mut parts = Aggregate::new();
        let element = parts.take(self.emit_operand(element, ASSIGNMENT));
        let conditions: Vec<String> = conditions
            .iter()
            .map(|condition| parts.take(self.emit_operand(condition, BITWISE_OR)))
            .collect();

        let mut output = if conditions.is_empty() {
            format!("[{}]", element)
        } else {
            format!("{} ? [{}] : []", conditions.join(" && "), element)
        };
        for clause in clauses.iter().rev() {
            let binding = parts.take(self.emit_pattern(&clause.pattern));
            let source = parts.take(self.emit_operand(&clause.source, ASSIGNMENT));
            let source = if clause.keys {
                format!("Object.keys({})", source)
            } else {
                format!("Array.from({})", source)
            };
            output = format!("{}.flatMap(({}) => {})", source, binding, output);
        }
        parts.finish(output)
    }
}
