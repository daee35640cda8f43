//! Statement and declaration productions

use super::{ParseResult, Parser};
use crate::cst::*;
use crate::lexer::{Keyword, Punctuator, Token};
use core_types::SourcePosition;

impl Parser {
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        self.nested(Self::parse_statement_level)
    }

    fn parse_statement_level(&mut self) -> ParseResult<Statement> {
        let position = self.position();
        match self.peek().clone() {
            Token::Keyword(Keyword::Let) | Token::Keyword(Keyword::Const) => {
                self.parse_variable_declaration(position)
            }
            Token::Keyword(Keyword::Fn) => {
                if let Some(statement) = self.attempt(|p| p.parse_function_declaration(position)) {
                    return Ok(statement);
                }
                self.parse_expression_statement(position)
            }
            Token::Keyword(Keyword::Class) => {
                if let Some(statement) = self.attempt(|p| p.parse_class_declaration(position)) {
                    return Ok(statement);
                }
                self.parse_expression_statement(position)
            }
            Token::Keyword(Keyword::Enum) => self.parse_enum_declaration(position),
            Token::Identifier(word) if word == "type" => {
                if let Some(statement) = self.attempt(|p| p.parse_type_alias(position)) {
                    return Ok(statement);
                }
                self.parse_expression_statement(position)
            }
            Token::Keyword(Keyword::If) | Token::Keyword(Keyword::Unless) => {
                self.parse_if_statement(position)
            }
            Token::Keyword(Keyword::While) | Token::Keyword(Keyword::Until) => {
                self.parse_while_statement(position)
            }
            Token::Keyword(Keyword::Do) => self.parse_do_while_statement(position),
            Token::Keyword(Keyword::For) => self.parse_for_statement(position),
            Token::Keyword(Keyword::Switch) => self.parse_switch_statement(position),
            Token::Keyword(Keyword::Try) => self.parse_try_statement(position),
            Token::Keyword(Keyword::Await) => {
                if let Some(statement) = self.attempt(|p| p.parse_await_thread(position)) {
                    return Ok(statement);
                }
                self.parse_expression_statement(position)
            }
            Token::Keyword(Keyword::Return) => {
                self.advance();
                let argument = if self.at_expression_end() {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                Ok(Statement::Return { argument, position })
            }
            Token::Keyword(Keyword::Throw) => {
                self.advance();
                let argument = self.parse_expression()?;
                Ok(Statement::Throw { argument, position })
            }
            Token::Keyword(Keyword::Break) => {
                self.advance();
                Ok(Statement::Break { position })
            }
            Token::Keyword(Keyword::Continue) => {
                self.advance();
                Ok(Statement::Continue { position })
            }
            Token::Keyword(Keyword::Debugger) => {
                self.advance();
                Ok(Statement::Debugger { position })
            }
            Token::Keyword(Keyword::Pass) => {
                self.advance();
                Ok(Statement::Pass { position })
            }
            Token::Keyword(Keyword::Import) => self.parse_import(position),
            Token::Keyword(Keyword::Export) => self.parse_export(position),
            _ => self.parse_expression_statement(position),
        }
    }

    fn parse_expression_statement(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        let expression = self.parse_expression()?;
        Ok(Statement::Expression {
            expression,
            position,
        })
    }

    fn parse_variable_declaration(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        let kind = match self.advance() {
            Token::Keyword(Keyword::Const) => DeclarationKind::Const,
            _ => DeclarationKind::Let,
        };

        let mut declarations = Vec::new();
        loop {
            let pattern = self.parse_binding_pattern()?;
            let annotation = self.parse_optional_annotation()?;
            let init = if self.eat_punctuator(Punctuator::Assign) {
                Some(self.parse_assignment_expression()?)
            } else {
                None
            };
            declarations.push(VariableDeclarator {
                pattern,
                annotation,
                init,
            });
            if !self.eat_punctuator(Punctuator::Comma) {
                break;
            }
        }

        Ok(Statement::VariableDeclaration {
            kind,
            declarations,
            position,
        })
    }

    fn parse_function_declaration(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        self.expect_keyword(Keyword::Fn)?;
        let name = self.expect_identifier()?;
        let function = self.parse_function_rest(Some(name))?;
        Ok(Statement::FunctionDeclaration { function, position })
    }

    /// Everything after the name: type parameters, parameters, return type, body
    pub(super) fn parse_function_rest(&mut self, name: Option<String>) -> ParseResult<Function> {
        let type_params = self.parse_type_parameters()?;
        let params = self.parse_parameters()?;
        let return_type = self.parse_optional_annotation()?;
        let body = self.parse_function_body()?;
        Ok(Function {
            name,
            type_params,
            params,
            return_type,
            body,
        })
    }

    pub(super) fn parse_parameters(&mut self) -> ParseResult<Vec<Parameter>> {
        self.parse_list(Punctuator::LParen, Punctuator::RParen, |p| p.parse_parameter())
    }

    fn parse_parameter(&mut self) -> ParseResult<Parameter> {
        if self.check_punctuator(Punctuator::Spread) {
            self.advance();
            let target = self.parse_binding_pattern()?;
            let annotation = self.parse_optional_annotation()?;
            return Ok(Parameter {
                pattern: Pattern::Rest(Box::new(target)),
                annotation,
            });
        }

        let target = self.parse_binding_pattern()?;
        let annotation = self.parse_optional_annotation()?;
        let pattern = if self.check_punctuator(Punctuator::Assign) {
            self.advance();
            Pattern::Default {
                target: Box::new(target),
                default: Box::new(self.parse_assignment_expression()?),
            }
        } else {
            target
        };
        Ok(Parameter {
            pattern,
            annotation,
        })
    }

    fn parse_class_declaration(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        let class = self.parse_class(true)?;
        Ok(Statement::ClassDeclaration { class, position })
    }

    /// `class Name? <T>? (extends Expr)?` followed by an optional member block
    pub(super) fn parse_class(&mut self, require_name: bool) -> ParseResult<Class> {
        self.expect_keyword(Keyword::Class)?;

        let name = match self.peek() {
            Token::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ if require_name => return self.fail("class name"),
            _ => None,
        };
        let type_params = self.parse_type_parameters()?;

        let super_class = if self.eat_keyword(Keyword::Extends) {
            Some(Box::new(self.parse_left_hand_side_expression()?))
        } else {
            None
        };

        let members = if matches!(self.peek(), Token::Indent) {
            self.parse_class_body()?
        } else {
            Vec::new()
        };

        Ok(Class {
            name,
            type_params,
            super_class,
            members,
        })
    }

    fn parse_class_body(&mut self) -> ParseResult<Vec<ClassMember>> {
        self.advance();
        let mut members = Vec::new();
        loop {
            while matches!(
                self.peek(),
                Token::Newline | Token::Punctuator(Punctuator::Semicolon)
            ) {
                self.advance();
            }
            if matches!(self.peek(), Token::Dedent) {
                self.advance();
                break;
            }
            if matches!(self.peek(), Token::EOF) {
                return self.fail("end of block");
            }
            members.push(self.parse_class_member()?);
            self.expect_statement_end()?;
        }
        Ok(members)
    }

    fn parse_class_member(&mut self) -> ParseResult<ClassMember> {
        if self.check_contextual("constructor") {
            if let Some(member) = self.attempt(|p| {
                p.advance();
                let params = p.parse_parameters()?;
                let body = p.parse_function_body()?;
                Ok(ClassMember::Constructor { params, body })
            }) {
                return Ok(member);
            }
        }

        let is_static = self.check_keyword(Keyword::Static);
        if is_static {
            self.advance();
        }

        if let Some((kind, key, function)) = self.attempt(|p| p.parse_accessor()) {
            return Ok(ClassMember::Method {
                key,
                is_static,
                kind,
                function,
            });
        }

        let key = self.parse_property_key()?;
        if self.check_punctuator(Punctuator::LParen) || self.check_punctuator(Punctuator::Lt) {
            let function = self.parse_function_rest(None)?;
            return Ok(ClassMember::Method {
                key,
                is_static,
                kind: MethodKind::Method,
                function,
            });
        }

        let annotation = self.parse_optional_annotation()?;
        let value = if self.eat_punctuator(Punctuator::Assign) {
            Some(self.parse_assignment_expression()?)
        } else {
            None
        };
        Ok(ClassMember::Field {
            key,
            is_static,
            annotation,
            value,
        })
    }

    /// `get key(...) body` / `set key(...) body`
    pub(super) fn parse_accessor(&mut self) -> ParseResult<(MethodKind, PropertyKey, Function)> {
        let kind = if self.check_contextual("get") {
            MethodKind::Get
        } else if self.check_contextual("set") {
            MethodKind::Set
        } else {
            return self.fail("accessor");
        };
        self.advance();
        let key = self.parse_property_key()?;
        if !self.check_punctuator(Punctuator::LParen) {
            return self.fail(super::quoted("("));
        }
        let function = self.parse_function_rest(None)?;
        Ok((kind, key, function))
    }

    fn parse_enum_declaration(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        self.advance();
        let name = self.expect_identifier()?;

        let members = if self.check_punctuator(Punctuator::LBrace) {
            self.parse_list(Punctuator::LBrace, Punctuator::RBrace, |p| p.parse_enum_member())?
        } else {
            if !matches!(self.peek(), Token::Indent) {
                return self.fail("indented block");
            }
            self.advance();
            let mut members = Vec::new();
            loop {
                while matches!(self.peek(), Token::Newline) {
                    self.advance();
                }
                if matches!(self.peek(), Token::Dedent) {
                    self.advance();
                    break;
                }
                members.push(self.parse_enum_member()?);
                while self.eat_punctuator(Punctuator::Comma) {
                    if matches!(self.peek(), Token::Newline | Token::Dedent) {
                        break;
                    }
                    members.push(self.parse_enum_member()?);
                }
                self.expect_statement_end()?;
            }
            members
        };

        Ok(Statement::EnumDeclaration {
            name,
            members,
            position,
        })
    }

    fn parse_enum_member(&mut self) -> ParseResult<EnumMember> {
        let name = self.expect_property_name()?;
        let value = if self.eat_punctuator(Punctuator::Assign) {
            Some(self.parse_assignment_expression()?)
        } else {
            None
        };
        Ok(EnumMember { name, value })
    }

    fn parse_type_alias(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        self.expect_contextual("type")?;
        let name = self.expect_identifier()?;
        let type_params = self.parse_type_parameters()?;
        self.expect_punctuator(Punctuator::Assign)?;
        let annotation = self.parse_type()?;
        Ok(Statement::TypeAlias {
            name,
            type_params,
            annotation,
            position,
        })
    }

    fn parse_if_statement(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        let negated = matches!(self.advance(), Token::Keyword(Keyword::Unless));
        let test = self.parse_expression()?;
        let consequent = self.parse_block()?;

        let alternate = if self
            .skip_newline_before(|p| p.expect_keyword(Keyword::Else))
            .is_some()
        {
            if self.check_keyword(Keyword::If) || self.check_keyword(Keyword::Unless) {
                let position = self.position();
                Some(ElseBranch::If(Box::new(self.parse_if_statement(position)?)))
            } else {
                Some(ElseBranch::Block(self.parse_body()?))
            }
        } else {
            None
        };

        Ok(Statement::If {
            test,
            negated,
            consequent,
            alternate,
            position,
        })
    }

    fn parse_while_statement(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        let negated = matches!(self.advance(), Token::Keyword(Keyword::Until));
        let test = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Statement::While {
            test,
            negated,
            body,
            position,
        })
    }

    fn parse_do_while_statement(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        self.advance();
        let body = self.parse_body()?;

        let negated = match self.skip_newline_before(|p| {
            if p.eat_keyword(Keyword::While) {
                Ok(false)
            } else if p.eat_keyword(Keyword::Until) {
                Ok(true)
            } else {
                p.fail(super::quoted("while"))
            }
        }) {
            Some(negated) => negated,
            None => return self.fail(super::quoted("while")),
        };

        let test = self.parse_expression()?;
        Ok(Statement::DoWhile {
            body,
            test,
            negated,
            position,
        })
    }

    fn parse_for_statement(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        self.advance();

        if self.eat_keyword(Keyword::Await) {
            let pattern = self.parse_binding_pattern()?;
            self.expect_contextual("of")?;
            let iterable = self.parse_expression()?;
            let body = self.parse_block()?;
            return Ok(Statement::ForOf {
                pattern,
                iterable,
                is_await: true,
                body,
                position,
            });
        }

        if let Some(statement) = self.attempt(|p| p.parse_for_range(position)) {
            return Ok(statement);
        }

        let pattern = self.parse_binding_pattern()?;
        if self.eat_contextual("of") {
            let iterable = self.parse_expression()?;
            let body = self.parse_block()?;
            return Ok(Statement::ForOf {
                pattern,
                iterable,
                is_await: false,
                body,
                position,
            });
        }

        self.expect_keyword(Keyword::In)?;
        let object = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Statement::ForIn {
            pattern,
            object,
            body,
            position,
        })
    }

    /// `for i (from a)? (to|through|downto|downthrough) b? (by s)? Block`
    fn parse_for_range(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        let binding = self.expect_identifier()?;
        let start = if self.eat_contextual("from") {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let (descending, inclusive) = if self.eat_contextual("to") {
            (false, false)
        } else if self.eat_contextual("through") {
            (false, true)
        } else if self.eat_contextual("downto") {
            (true, false)
        } else if self.eat_contextual("downthrough") {
            (true, true)
        } else {
            return self.fail("range direction");
        };

        let bound = if self.at_expression_end()
            || self.check_contextual("by")
            || self.check_keyword(Keyword::Then)
        {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let step = if self.eat_contextual("by") {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let body = self.parse_block()?;
        Ok(Statement::ForRange {
            binding,
            start,
            bound,
            descending,
            inclusive,
            step,
            body,
            position,
        })
    }

    fn parse_switch_statement(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        self.advance();
        let discriminant = self.parse_expression()?;

        if !matches!(self.peek(), Token::Indent) {
            return self.fail("indented block");
        }
        self.advance();

        let mut cases = Vec::new();
        loop {
            while matches!(self.peek(), Token::Newline) {
                self.advance();
            }
            if matches!(self.peek(), Token::Dedent) {
                self.advance();
                break;
            }
            if self.eat_keyword(Keyword::Case) {
                let mut tests = vec![self.parse_expression()?];
                while self.eat_punctuator(Punctuator::Comma) {
                    tests.push(self.parse_expression()?);
                }
                let body = self.parse_block()?;
                cases.push(SwitchCase { tests, body });
            } else if self.eat_keyword(Keyword::Default) {
                let body = self.parse_block()?;
                cases.push(SwitchCase {
                    tests: Vec::new(),
                    body,
                });
            } else {
                return self.fail("switch clause");
            }
            self.expect_statement_end()?;
        }

        Ok(Statement::Switch {
            discriminant,
            cases,
            position,
        })
    }

    fn parse_try_statement(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        self.advance();
        let block = self.parse_body()?;

        let handler = self.skip_newline_before(|p| {
            p.expect_keyword(Keyword::Catch)?;
            let param = if matches!(p.peek(), Token::Indent) || p.check_keyword(Keyword::Then) {
                None
            } else {
                Some(p.parse_binding_pattern()?)
            };
            let body = p.parse_block()?;
            Ok(CatchClause { param, body })
        });

        let finalizer = self.skip_newline_before(|p| {
            p.expect_keyword(Keyword::Finally)?;
            p.parse_body()
        });

        Ok(Statement::Try {
            block,
            handler,
            finalizer,
            position,
        })
    }

    /// `await pattern = expression` followed by an indented continuation
    fn parse_await_thread(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        self.expect_keyword(Keyword::Await)?;
        let pattern = self.parse_binding_pattern()?;
        self.expect_punctuator(Punctuator::Assign)?;
        let argument = self.parse_expression()?;
        let body = self.parse_indented_block()?;
        Ok(Statement::AwaitThread {
            pattern,
            argument,
            body,
            position,
        })
    }

    fn parse_import(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        self.advance();

        if matches!(self.peek(), Token::Quote(_)) {
            let source = self.parse_module_source()?;
            return Ok(Statement::Import {
                declaration: ImportDeclaration {
                    default: None,
                    namespace: None,
                    named: Vec::new(),
                    source,
                },
                position,
            });
        }

        let mut default = None;
        let mut namespace = None;
        let mut named = Vec::new();

        if let Token::Identifier(name) = self.peek().clone() {
            self.advance();
            default = Some(name);
        }

        let wants_more = default.is_none() || self.eat_punctuator(Punctuator::Comma);
        if wants_more {
            if self.check_punctuator(Punctuator::Star) {
                self.advance();
                self.expect_contextual("as")?;
                namespace = Some(self.expect_identifier()?);
            } else if self.check_punctuator(Punctuator::LBrace) {
                named = self.parse_list(Punctuator::LBrace, Punctuator::RBrace, |p| {
                    p.parse_module_specifier()
                })?;
            } else {
                return self.fail("import bindings");
            }
        }

        self.expect_contextual("from")?;
        let source = self.parse_module_source()?;
        Ok(Statement::Import {
            declaration: ImportDeclaration {
                default,
                namespace,
                named,
                source,
            },
            position,
        })
    }

    fn parse_export(&mut self, position: SourcePosition) -> ParseResult<Statement> {
        self.advance();

        let declaration = if self.eat_keyword(Keyword::Default) {
            ExportDeclaration::Default(self.parse_expression()?)
        } else if self.check_punctuator(Punctuator::Star) {
            self.advance();
            self.expect_contextual("from")?;
            ExportDeclaration::All {
                source: self.parse_module_source()?,
            }
        } else if self.check_punctuator(Punctuator::LBrace) {
            let specifiers = self.parse_list(Punctuator::LBrace, Punctuator::RBrace, |p| {
                p.parse_module_specifier()
            })?;
            let source = if self.eat_contextual("from") {
                Some(self.parse_module_source()?)
            } else {
                None
            };
            ExportDeclaration::Named { specifiers, source }
        } else {
            let inner_position = self.position();
            let statement = self.parse_statement()?;
            match statement {
                Statement::VariableDeclaration { .. }
                | Statement::FunctionDeclaration { .. }
                | Statement::ClassDeclaration { .. }
                | Statement::EnumDeclaration { .. }
                | Statement::TypeAlias { .. } => ExportDeclaration::Declaration(Box::new(statement)),
                _ => {
                    return Err(crate::error::syntax_error(
                        "Only declarations can be exported by name",
                        Some(inner_position),
                    ))
                }
            }
        };

        Ok(Statement::Export {
            declaration,
            position,
        })
    }

    fn parse_module_specifier(&mut self) -> ParseResult<ModuleSpecifier> {
        let name = self.expect_property_name()?;
        let alias = if self.eat_contextual("as") {
            Some(self.expect_property_name()?)
        } else {
            None
        };
        Ok(ModuleSpecifier { name, alias })
    }

    fn parse_module_source(&mut self) -> ParseResult<String> {
        if !matches!(self.peek(), Token::Quote(_)) {
            return self.fail("module path");
        }
        let literal = self.parse_string_literal()?;
        match literal.plain_text() {
            Some(text) => Ok(text),
            None => self.fail("module path without interpolation"),
        }
    }
}
