//! Ordered-choice recursive descent parser for Sable
//!
//! Alternatives are tried in a fixed order and the first one that succeeds
//! wins. A failed alternative rewinds the lexer to a checkpoint, so nothing it
//! consumed is kept. Every failed expectation is recorded against the token
//! where it happened; when the whole parse fails, the error reports the
//! furthest such position together with everything that would have been
//! accepted there.

mod expressions;
mod jsx;
mod patterns;
mod statements;
mod types;

use crate::cst::{Block, FunctionBody, Program};
use crate::error::{expected_error, syntax_error};
use crate::layout::{self, LayoutText};
use crate::lexer::{self, Keyword, Lexer, Punctuator, Token};
use core_types::{CompileError, SourcePosition};

type ParseResult<T> = Result<T, CompileError>;

/// Deepest nesting of statements, expressions and types accepted
pub const MAX_NESTING_DEPTH: u32 = 1000;

/// Free stack required before descending another level
const STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each stack segment added when the red zone is reached
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

/// Parser state saved before trying an alternative
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    lexer: lexer::Checkpoint,
    newline_depth: u32,
}

/// Furthest point any alternative reached before failing
#[derive(Debug, Clone)]
struct Failure {
    offset: usize,
    position: SourcePosition,
    expected: Vec<String>,
}

/// Sable parser
pub struct Parser {
    lexer: Lexer,
    /// Greater than zero inside brackets and interpolations, where line
    /// breaks are insignificant
    newline_depth: u32,
    furthest: Option<Failure>,
    /// Current nesting of guarded productions
    depth: u32,
    /// Set once the nesting limit is hit; the parse cannot recover from it
    too_deep: Option<CompileError>,
}

impl Parser {
    /// Create a parser, running the indentation preprocessor over `source`
    ///
    /// # Errors
    /// Returns an `IndentationError` when the indentation is inconsistent.
    pub fn new(source: &str) -> Result<Self, CompileError> {
        let layout = layout::preprocess(source)?;
        Ok(Self::from_layout(&layout))
    }

    /// Create a parser over already preprocessed text
    pub fn from_layout(layout: &LayoutText) -> Self {
        Self {
            lexer: Lexer::new(&layout.text, layout.line_offset),
            newline_depth: 0,
            furthest: None,
            depth: 0,
            too_deep: None,
        }
    }

    /// Parse the whole input into a program
    ///
    /// # Errors
    /// Returns a `SyntaxError` positioned at the furthest point reached, with
    /// `at_end_of_input` set when more input could have completed the text.
    pub fn parse(&mut self) -> Result<Program, CompileError> {
        let parsed = self.parse_program();
        if let Some(error) = self.too_deep.take() {
            tracing::debug!(error = %error, "parse abandoned");
            return Err(error);
        }
        match parsed {
            Ok(program) => {
                tracing::debug!(statements = program.body.len(), "parsed program");
                Ok(program)
            }
            Err(_) => {
                let error = self.furthest_error();
                tracing::debug!(error = %error, "parse failed");
                Err(error)
            }
        }
    }

    fn parse_program(&mut self) -> ParseResult<Program> {
        let body = self.parse_statement_list()?;
        if !matches!(self.peek(), Token::EOF) {
            return self.fail("end of input");
        }
        Ok(Program { body })
    }

    fn furthest_error(&self) -> CompileError {
        match &self.furthest {
            Some(failure) => expected_error(
                failure.expected.clone(),
                failure.position,
                self.lexer.only_trivia_from(failure.offset),
            ),
            None => syntax_error("Unexpected input", None),
        }
    }

    // ---- token access ----

    fn peek(&mut self) -> &Token {
        if self.newline_depth > 0 {
            while matches!(self.lexer.peek_token(), Token::Newline) {
                self.lexer.next_token();
            }
        }
        self.lexer.peek_token()
    }

    fn advance(&mut self) -> Token {
        self.peek();
        self.lexer.next_token()
    }

    fn position(&mut self) -> SourcePosition {
        self.peek();
        self.lexer.token_position()
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            lexer: self.lexer.checkpoint(),
            newline_depth: self.newline_depth,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.lexer.restore(checkpoint.lexer);
        self.newline_depth = checkpoint.newline_depth;
    }

    /// Try an alternative; on failure rewind and return `None`
    fn attempt<T>(&mut self, alternative: impl FnOnce(&mut Self) -> ParseResult<T>) -> Option<T> {
        let checkpoint = self.checkpoint();
        match alternative(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.restore(checkpoint);
                None
            }
        }
    }

    /// Run `inner` with line breaks treated as whitespace
    fn bracketed<T>(&mut self, inner: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.newline_depth += 1;
        let result = inner(self);
        self.newline_depth -= 1;
        result
    }

    /// Descend one nesting level, growing the stack when it runs low
    ///
    /// Past [`MAX_NESTING_DEPTH`] every later descent fails at once, so no
    /// alternative retries the deep input.
    fn nested<T>(&mut self, inner: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if let Some(error) = &self.too_deep {
            return Err(error.clone());
        }
        if self.depth >= MAX_NESTING_DEPTH {
            let position = self.position();
            let error = syntax_error(
                format!("Nesting deeper than {} levels", MAX_NESTING_DEPTH),
                Some(position),
            );
            self.too_deep = Some(error.clone());
            return Err(error);
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || inner(self));
        self.depth -= 1;
        result
    }

    // ---- failure tracking ----

    fn record(&mut self, expected: impl Into<String>) {
        let expected = expected.into();
        self.peek();
        let offset = self.lexer.token_offset();
        match &mut self.furthest {
            Some(failure) if failure.offset > offset => {}
            Some(failure) if failure.offset == offset => {
                if !failure.expected.contains(&expected) {
                    failure.expected.push(expected);
                }
            }
            _ => {
                let position = self.lexer.token_position();
                self.furthest = Some(Failure {
                    offset,
                    position,
                    expected: vec![expected],
                });
            }
        }
    }

    fn fail<T>(&mut self, expected: impl Into<String>) -> ParseResult<T> {
        let expected = expected.into();
        self.record(expected.clone());
        let position = self.position();
        Err(syntax_error(format!("Expected {}", expected), Some(position)))
    }

    // ---- punctuators, keywords and identifiers ----

    fn check_punctuator(&mut self, punctuator: Punctuator) -> bool {
        matches!(self.peek(), Token::Punctuator(p) if *p == punctuator)
    }

    fn eat_punctuator(&mut self, punctuator: Punctuator) -> bool {
        if self.check_punctuator(punctuator) {
            self.advance();
            true
        } else {
            self.record(quoted(punctuator.as_str()));
            false
        }
    }

    fn expect_punctuator(&mut self, punctuator: Punctuator) -> ParseResult<()> {
        if self.check_punctuator(punctuator) {
            self.advance();
            Ok(())
        } else {
            self.fail(quoted(punctuator.as_str()))
        }
    }

    fn check_keyword(&mut self, keyword: Keyword) -> bool {
        matches!(self.peek(), Token::Keyword(k) if *k == keyword)
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            self.record(quoted(keyword.as_str()));
            false
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<()> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            self.fail(quoted(keyword.as_str()))
        }
    }

    /// Check for a contextual word such as `of` or `from`
    fn check_contextual(&mut self, word: &str) -> bool {
        matches!(self.peek(), Token::Identifier(name) if name == word)
    }

    fn eat_contextual(&mut self, word: &str) -> bool {
        if self.check_contextual(word) {
            self.advance();
            true
        } else {
            self.record(quoted(word));
            false
        }
    }

    fn expect_contextual(&mut self, word: &str) -> ParseResult<()> {
        if self.eat_contextual(word) {
            Ok(())
        } else {
            self.fail(quoted(word))
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        match self.peek() {
            Token::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => self.fail("identifier"),
        }
    }

    /// Identifier or reserved word (after `.`, in import lists, as keys)
    fn expect_property_name(&mut self) -> ParseResult<String> {
        let name = match self.peek() {
            Token::Identifier(name) => name.clone(),
            Token::Keyword(keyword) => keyword.as_str().to_string(),
            _ => return self.fail("property name"),
        };
        self.advance();
        Ok(name)
    }

    /// Parse `open item, item, … close`, allowing a trailing comma
    fn parse_list<T>(
        &mut self,
        open: Punctuator,
        close: Punctuator,
        mut item: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Vec<T>> {
        self.expect_punctuator(open)?;
        self.bracketed(|p| {
            let mut items = Vec::new();
            loop {
                if p.check_punctuator(close) {
                    p.advance();
                    break;
                }
                items.push(item(p)?);
                if !p.eat_punctuator(Punctuator::Comma) {
                    p.expect_punctuator(close)?;
                    break;
                }
            }
            Ok(items)
        })
    }

    // ---- statement lists and blocks ----

    /// Statements up to (not including) a DEDENT marker or end of input
    fn parse_statement_list(&mut self) -> ParseResult<Vec<crate::cst::Statement>> {
        let mut body = Vec::new();
        loop {
            while matches!(
                self.peek(),
                Token::Newline | Token::Punctuator(Punctuator::Semicolon)
            ) {
                self.advance();
            }
            if matches!(self.peek(), Token::Dedent | Token::EOF) {
                break;
            }
            body.push(self.parse_statement()?);
            self.expect_statement_end()?;
        }
        Ok(body)
    }

    fn expect_statement_end(&mut self) -> ParseResult<()> {
        match self.peek() {
            Token::Newline | Token::Punctuator(Punctuator::Semicolon) => {
                self.advance();
                Ok(())
            }
            Token::Dedent | Token::EOF => Ok(()),
            _ => self.fail("end of statement"),
        }
    }

    /// INDENT statements DEDENT
    fn parse_indented_block(&mut self) -> ParseResult<Block> {
        if !matches!(self.peek(), Token::Indent) {
            return self.fail("indented block");
        }
        self.advance();
        let body = self.parse_statement_list()?;
        if !matches!(self.peek(), Token::Dedent) {
            return self.fail("end of block");
        }
        self.advance();
        Ok(Block {
            body,
            inline: false,
        })
    }

    /// Indented block or `then statement`
    fn parse_block(&mut self) -> ParseResult<Block> {
        if self.eat_keyword(Keyword::Then) {
            let statement = self.parse_statement()?;
            return Ok(Block {
                body: vec![statement],
                inline: true,
            });
        }
        self.parse_indented_block()
    }

    /// Indented block or a statement on the same line
    fn parse_body(&mut self) -> ParseResult<Block> {
        if matches!(self.peek(), Token::Indent) {
            return self.parse_indented_block();
        }
        self.record("indented block");
        let statement = self.parse_statement()?;
        Ok(Block {
            body: vec![statement],
            inline: true,
        })
    }

    /// Indented block, or `=> expression`
    fn parse_function_body(&mut self) -> ParseResult<FunctionBody> {
        if matches!(self.peek(), Token::Indent) {
            return Ok(FunctionBody::Block(self.parse_indented_block()?));
        }
        self.record("indented block");
        self.expect_punctuator(Punctuator::Arrow)?;
        self.parse_arrow_body()
    }

    /// Body after `=>`: an indented block or an expression
    fn parse_arrow_body(&mut self) -> ParseResult<FunctionBody> {
        if matches!(self.peek(), Token::Indent) {
            return Ok(FunctionBody::Block(self.parse_indented_block()?));
        }
        let expression = self.parse_assignment_expression()?;
        Ok(FunctionBody::Expression(Box::new(expression)))
    }

    /// Skip one line break if the alternative after it matches
    fn skip_newline_before<T>(
        &mut self,
        alternative: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> Option<T> {
        self.attempt(|p| {
            if matches!(p.peek(), Token::Newline) {
                p.advance();
            }
            alternative(p)
        })
    }

    /// True when the next token cannot start an expression
    fn at_expression_end(&mut self) -> bool {
        matches!(
            self.peek(),
            Token::Newline
                | Token::Dedent
                | Token::Indent
                | Token::EOF
                | Token::Punctuator(
                    Punctuator::RParen
                        | Punctuator::RBracket
                        | Punctuator::RBrace
                        | Punctuator::Comma
                        | Punctuator::Semicolon
                        | Punctuator::Colon
                )
                | Token::Keyword(Keyword::Then | Keyword::Else | Keyword::If | Keyword::For)
        )
    }
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", text)
}
