//! Sable lexer - tokenizes preprocessed source on demand
//!
//! The lexer is driven by the parser one token at a time and can be rewound to
//! any [`Checkpoint`], which is how ordered choice backtracks. Strings, regular
//! expressions and JSX text are context dependent, so the parser switches the
//! lexer into those modes explicitly (`scan_string_segment`, `scan_regex`,
//! `scan_jsx_text`) instead of the lexer guessing.

use crate::layout::{DEDENT, INDENT};
use core_types::SourcePosition;

/// Flags a regular expression literal may carry
const REGEX_FLAGS: &str = "dgimsuvy";

/// Reserved words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// if
    If,
    /// unless
    Unless,
    /// then
    Then,
    /// else
    Else,
    /// while
    While,
    /// until
    Until,
    /// do
    Do,
    /// for
    For,
    /// in
    In,
    /// await
    Await,
    /// yield
    Yield,
    /// return
    Return,
    /// break
    Break,
    /// continue
    Continue,
    /// throw
    Throw,
    /// try
    Try,
    /// catch
    Catch,
    /// finally
    Finally,
    /// switch
    Switch,
    /// case
    Case,
    /// default
    Default,
    /// fn
    Fn,
    /// class
    Class,
    /// extends
    Extends,
    /// static
    Static,
    /// new
    New,
    /// typeof
    Typeof,
    /// instanceof
    Instanceof,
    /// delete
    Delete,
    /// void
    Void,
    /// let
    Let,
    /// const
    Const,
    /// import
    Import,
    /// export
    Export,
    /// enum
    Enum,
    /// true
    True,
    /// false
    False,
    /// null
    Null,
    /// undefined
    Undefined,
    /// this
    This,
    /// super
    Super,
    /// and
    And,
    /// or
    Or,
    /// not
    Not,
    /// debugger
    Debugger,
    /// pass
    Pass,
}

impl Keyword {
    /// Look up a reserved word
    pub fn lookup(word: &str) -> Option<Keyword> {
        let keyword = match word {
            "if" => Keyword::If,
            "unless" => Keyword::Unless,
            "then" => Keyword::Then,
            "else" => Keyword::Else,
            "while" => Keyword::While,
            "until" => Keyword::Until,
            "do" => Keyword::Do,
            "for" => Keyword::For,
            "in" => Keyword::In,
            "await" => Keyword::Await,
            "yield" => Keyword::Yield,
            "return" => Keyword::Return,
            "break" => Keyword::Break,
            "continue" => Keyword::Continue,
            "throw" => Keyword::Throw,
            "try" => Keyword::Try,
            "catch" => Keyword::Catch,
            "finally" => Keyword::Finally,
            "switch" => Keyword::Switch,
            "case" => Keyword::Case,
            "default" => Keyword::Default,
            "fn" => Keyword::Fn,
            "class" => Keyword::Class,
            "extends" => Keyword::Extends,
            "static" => Keyword::Static,
            "new" => Keyword::New,
            "typeof" => Keyword::Typeof,
            "instanceof" => Keyword::Instanceof,
            "delete" => Keyword::Delete,
            "void" => Keyword::Void,
            "let" => Keyword::Let,
            "const" => Keyword::Const,
            "import" => Keyword::Import,
            "export" => Keyword::Export,
            "enum" => Keyword::Enum,
            "true" => Keyword::True,
            "false" => Keyword::False,
            "null" => Keyword::Null,
            "undefined" => Keyword::Undefined,
            "this" => Keyword::This,
            "super" => Keyword::Super,
            "and" => Keyword::And,
            "or" => Keyword::Or,
            "not" => Keyword::Not,
            "debugger" => Keyword::Debugger,
            "pass" => Keyword::Pass,
            _ => return None,
        };
        Some(keyword)
    }

    /// Source spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::Unless => "unless",
            Keyword::Then => "then",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Until => "until",
            Keyword::Do => "do",
            Keyword::For => "for",
            Keyword::In => "in",
            Keyword::Await => "await",
            Keyword::Yield => "yield",
            Keyword::Return => "return",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
            Keyword::Throw => "throw",
            Keyword::Try => "try",
            Keyword::Catch => "catch",
            Keyword::Finally => "finally",
            Keyword::Switch => "switch",
            Keyword::Case => "case",
            Keyword::Default => "default",
            Keyword::Fn => "fn",
            Keyword::Class => "class",
            Keyword::Extends => "extends",
            Keyword::Static => "static",
            Keyword::New => "new",
            Keyword::Typeof => "typeof",
            Keyword::Instanceof => "instanceof",
            Keyword::Delete => "delete",
            Keyword::Void => "void",
            Keyword::Let => "let",
            Keyword::Const => "const",
            Keyword::Import => "import",
            Keyword::Export => "export",
            Keyword::Enum => "enum",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::Undefined => "undefined",
            Keyword::This => "this",
            Keyword::Super => "super",
            Keyword::And => "and",
            Keyword::Or => "or",
            Keyword::Not => "not",
            Keyword::Debugger => "debugger",
            Keyword::Pass => "pass",
        }
    }
}

/// Operators and delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuator {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `...`
    Spread,
    /// `?.`
    OptionalChain,
    /// `:`
    Colon,
    /// `?`
    Question,
    /// `=`
    Assign,
    /// `=>`
    Arrow,
    /// `@`
    At,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `**`
    StarStar,
    /// `==`
    EqEq,
    /// `===`
    EqEqEq,
    /// `!=`
    NotEq,
    /// `!==`
    NotEqEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `??`
    NullishCoalesce,
    /// `!`
    Not,
    /// `&`
    And,
    /// `|`
    Or,
    /// `^`
    Xor,
    /// `~`
    Tilde,
    /// `<<`
    LtLt,
    /// `>>`
    GtGt,
    /// `>>>`
    GtGtGt,
    /// `+=`
    PlusEq,
    /// `-=`
    MinusEq,
    /// `*=`
    StarEq,
    /// `/=`
    SlashEq,
    /// `%=`
    PercentEq,
    /// `**=`
    StarStarEq,
    /// `&=`
    AndEq,
    /// `|=`
    OrEq,
    /// `^=`
    XorEq,
    /// `<<=`
    LtLtEq,
    /// `>>=`
    GtGtEq,
    /// `>>>=`
    GtGtGtEq,
    /// `&&=`
    AndAndEq,
    /// `||=`
    OrOrEq,
    /// `??=`
    NullishCoalesceEq,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
}

impl Punctuator {
    /// Source spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Punctuator::LParen => "(",
            Punctuator::RParen => ")",
            Punctuator::LBrace => "{",
            Punctuator::RBrace => "}",
            Punctuator::LBracket => "[",
            Punctuator::RBracket => "]",
            Punctuator::Semicolon => ";",
            Punctuator::Comma => ",",
            Punctuator::Dot => ".",
            Punctuator::Spread => "...",
            Punctuator::OptionalChain => "?.",
            Punctuator::Colon => ":",
            Punctuator::Question => "?",
            Punctuator::Assign => "=",
            Punctuator::Arrow => "=>",
            Punctuator::At => "@",
            Punctuator::Plus => "+",
            Punctuator::Minus => "-",
            Punctuator::Star => "*",
            Punctuator::Slash => "/",
            Punctuator::Percent => "%",
            Punctuator::StarStar => "**",
            Punctuator::EqEq => "==",
            Punctuator::EqEqEq => "===",
            Punctuator::NotEq => "!=",
            Punctuator::NotEqEq => "!==",
            Punctuator::Lt => "<",
            Punctuator::LtEq => "<=",
            Punctuator::Gt => ">",
            Punctuator::GtEq => ">=",
            Punctuator::AndAnd => "&&",
            Punctuator::OrOr => "||",
            Punctuator::NullishCoalesce => "??",
            Punctuator::Not => "!",
            Punctuator::And => "&",
            Punctuator::Or => "|",
            Punctuator::Xor => "^",
            Punctuator::Tilde => "~",
            Punctuator::LtLt => "<<",
            Punctuator::GtGt => ">>",
            Punctuator::GtGtGt => ">>>",
            Punctuator::PlusEq => "+=",
            Punctuator::MinusEq => "-=",
            Punctuator::StarEq => "*=",
            Punctuator::SlashEq => "/=",
            Punctuator::PercentEq => "%=",
            Punctuator::StarStarEq => "**=",
            Punctuator::AndEq => "&=",
            Punctuator::OrEq => "|=",
            Punctuator::XorEq => "^=",
            Punctuator::LtLtEq => "<<=",
            Punctuator::GtGtEq => ">>=",
            Punctuator::GtGtGtEq => ">>>=",
            Punctuator::AndAndEq => "&&=",
            Punctuator::OrOrEq => "||=",
            Punctuator::NullishCoalesceEq => "??=",
            Punctuator::PlusPlus => "++",
            Punctuator::MinusMinus => "--",
        }
    }
}

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier, including contextual words such as `of` and `from`
    Identifier(String),
    /// Reserved word
    Keyword(Keyword),
    /// Numeric literal; `unit` holds a trailing letter suffix
    Number {
        /// Literal text
        raw: String,
        /// Unit suffix (`ms`, `px`, …)
        unit: Option<String>,
    },
    /// Opening quote of a string; the body is read with [`Lexer::scan_string_segment`]
    Quote(char),
    /// `@name`
    SelfMember(String),
    /// `@@name`
    WellKnownSymbol(String),
    /// Punctuator/operator
    Punctuator(Punctuator),
    /// One or more line breaks
    Newline,
    /// Block opening marker
    Indent,
    /// Block closing marker
    Dedent,
    /// Character that starts no token
    Invalid(char),
    /// End of file
    EOF,
}

/// How a string segment ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentEnd {
    /// The closing quote was consumed
    Closed,
    /// `#{` was consumed; an expression and `}` follow
    Interpolation,
    /// Input ran out before the closing quote
    Unterminated,
}

/// Saved lexer state for backtracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    position: usize,
    line: u32,
    column: u32,
}

/// Lexer over preprocessed Sable source
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    line: u32,
    column: u32,
    line_offset: u32,
    /// Peeked token with the state before and after it
    current_token: Option<(Token, Checkpoint, Checkpoint)>,
}

impl Lexer {
    /// Create a lexer; `line_offset` is added to every reported line
    pub fn new(source: &str, line_offset: u32) -> Self {
        Self {
            chars: source.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            line_offset,
            current_token: None,
        }
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Token {
        if let Some((token, _, after)) = self.current_token.take() {
            self.set_state(after);
            return token;
        }
        let (token, _) = self.scan_token();
        token
    }

    /// Peek at the next token without consuming it
    pub fn peek_token(&mut self) -> &Token {
        &self.peeked().0
    }

    /// Position where the next token starts
    pub fn token_position(&mut self) -> SourcePosition {
        let start = self.peeked().1;
        self.position_of(start)
    }

    /// Character offset where the next token starts
    pub fn token_offset(&mut self) -> usize {
        self.peeked().1.position
    }

    /// Save the current state (before any peeked token)
    pub fn checkpoint(&self) -> Checkpoint {
        match &self.current_token {
            Some((_, start, _)) => *start,
            None => self.state(),
        }
    }

    /// Rewind to a saved state
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.current_token = None;
        self.set_state(checkpoint);
    }

    /// True when nothing but whitespace, comments and block markers remain
    /// from `offset` onwards
    pub fn only_trivia_from(&self, offset: usize) -> bool {
        let mut i = offset;
        while i < self.chars.len() {
            let ch = self.chars[i];
            if ch == '#' {
                while i < self.chars.len() && self.chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            if !(ch.is_whitespace() || ch == INDENT || ch == DEDENT) {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Read string text up to the closing `quote` or the next `#{`
    ///
    /// Must be called right after the [`Token::Quote`] was consumed. Escapes
    /// are kept verbatim; block markers are dropped.
    pub fn scan_string_segment(&mut self, quote: char) -> (String, SegmentEnd) {
        self.rewind_peek();
        let mut text = String::new();
        while !self.is_at_end() {
            let ch = self.peek();
            if ch == quote {
                self.advance();
                return (text, SegmentEnd::Closed);
            }
            if ch == '\\' {
                text.push(self.advance());
                if !self.is_at_end() {
                    text.push(self.advance());
                }
                continue;
            }
            if quote != '\'' && ch == '#' && self.peek_next() == Some('{') {
                self.advance();
                self.advance();
                return (text, SegmentEnd::Interpolation);
            }
            let ch = self.advance();
            if ch != INDENT && ch != DEDENT {
                text.push(ch);
            }
        }
        (text, SegmentEnd::Unterminated)
    }

    /// Rescan the peeked `/` or `/=` token as a regular expression literal
    ///
    /// Returns `(pattern, flags)`, or `None` when the literal is unterminated
    /// on its line or its flags are unknown or repeated; in that case the
    /// lexer state is unchanged.
    pub fn scan_regex(&mut self) -> Option<(String, String)> {
        let saved = self.checkpoint();
        self.rewind_peek();
        self.skip_whitespace_and_comments();
        if self.is_at_end() || self.peek() != '/' {
            self.restore(saved);
            return None;
        }
        self.advance();

        let mut pattern = String::new();
        let mut in_class = false;
        loop {
            if self.is_at_end() || self.peek() == '\n' {
                self.restore(saved);
                return None;
            }
            let ch = self.advance();
            match ch {
                '\\' => {
                    pattern.push(ch);
                    if !self.is_at_end() && self.peek() != '\n' {
                        pattern.push(self.advance());
                    }
                }
                '[' => {
                    in_class = true;
                    pattern.push(ch);
                }
                ']' if in_class => {
                    in_class = false;
                    pattern.push(ch);
                }
                '/' if !in_class => break,
                _ => pattern.push(ch),
            }
        }

        let mut flags = String::new();
        while !self.is_at_end() && is_identifier_part(self.peek()) {
            let flag = self.advance();
            if !REGEX_FLAGS.contains(flag) || flags.contains(flag) {
                self.restore(saved);
                return None;
            }
            flags.push(flag);
        }
        Some((pattern, flags))
    }

    /// Split a peeked `>>`, `>>>`, `>=` or `>>=` so a single `>` is consumed
    ///
    /// Used when closing nested type argument lists. Returns false when the
    /// next token does not start with `>`.
    pub fn consume_angle_close(&mut self) -> bool {
        let starts_with_gt = matches!(
            self.peek_token(),
            Token::Punctuator(
                Punctuator::Gt
                    | Punctuator::GtGt
                    | Punctuator::GtGtGt
                    | Punctuator::GtEq
                    | Punctuator::GtGtEq
                    | Punctuator::GtGtGtEq
            )
        );
        if !starts_with_gt {
            return false;
        }
        self.rewind_peek();
        self.skip_whitespace_and_comments();
        self.advance();
        true
    }

    /// Peek at the next raw character (JSX mode)
    pub fn peek_char(&mut self) -> Option<char> {
        self.rewind_peek();
        self.chars.get(self.position).copied()
    }

    /// Peek at the raw character after the next one (JSX mode)
    pub fn peek_char_next(&mut self) -> Option<char> {
        self.rewind_peek();
        self.chars.get(self.position + 1).copied()
    }

    /// Consume one raw character (JSX mode)
    pub fn advance_char(&mut self) -> Option<char> {
        self.rewind_peek();
        if self.is_at_end() {
            None
        } else {
            Some(self.advance())
        }
    }

    /// Skip whitespace, line breaks and block markers (JSX mode)
    pub fn skip_jsx_whitespace(&mut self) {
        self.rewind_peek();
        while !self.is_at_end() {
            let ch = self.peek();
            if ch.is_whitespace() || ch == INDENT || ch == DEDENT {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read a JSX tag or attribute name
    pub fn scan_jsx_name(&mut self) -> String {
        self.rewind_peek();
        let mut name = String::new();
        while !self.is_at_end() {
            let ch = self.peek();
            if is_identifier_part(ch) || matches!(ch, '-' | '.' | ':') {
                name.push(self.advance());
            } else {
                break;
            }
        }
        name
    }

    /// Read JSX text up to the next `<` or `{`
    pub fn scan_jsx_text(&mut self) -> String {
        self.rewind_peek();
        let mut text = String::new();
        while !self.is_at_end() {
            let ch = self.peek();
            if ch == '<' || ch == '{' {
                break;
            }
            let ch = self.advance();
            if ch != INDENT && ch != DEDENT {
                text.push(ch);
            }
        }
        text
    }

    /// Read a quoted JSX attribute value, quotes included
    pub fn scan_jsx_string(&mut self) -> Option<String> {
        self.rewind_peek();
        let saved = self.state();
        let quote = match self.chars.get(self.position) {
            Some(q @ ('"' | '\'')) => *q,
            _ => return None,
        };
        let mut text = String::new();
        text.push(self.advance());
        while !self.is_at_end() {
            let ch = self.advance();
            text.push(ch);
            if ch == quote {
                return Some(text);
            }
        }
        self.set_state(saved);
        None
    }

    /// Current position in original-source coordinates
    pub fn current_position(&self) -> SourcePosition {
        self.position_of(self.state())
    }

    fn position_of(&self, state: Checkpoint) -> SourcePosition {
        SourcePosition {
            line: state.line + self.line_offset,
            column: state.column,
            offset: state.position,
        }
    }

    fn state(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn set_state(&mut self, state: Checkpoint) {
        self.position = state.position;
        self.line = state.line;
        self.column = state.column;
    }

    fn peeked(&mut self) -> &(Token, Checkpoint, Checkpoint) {
        let entry = match self.current_token.take() {
            Some(entry) => entry,
            None => {
                let (token, start) = self.scan_token();
                (token, start, self.state())
            }
        };
        self.current_token.insert(entry)
    }

    /// Drop a peeked token, moving back to where it started
    fn rewind_peek(&mut self) {
        if let Some((_, start, _)) = self.current_token.take() {
            self.set_state(start);
        }
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> char {
        self.chars[self.position]
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.position];
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else if ch != INDENT && ch != DEDENT {
            self.column += 1;
        }
        ch
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            return false;
        }
        self.advance();
        true
    }

    fn skip_whitespace_and_comments(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '#' => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Consume a run of line breaks, blank lines and comments; an INDENT
    /// marker at the start of the next line is folded into the result
    fn scan_line_breaks(&mut self) -> Token {
        loop {
            self.skip_whitespace_and_comments();
            if !self.is_at_end() && self.peek() == '\n' {
                self.advance();
                continue;
            }
            break;
        }
        if !self.is_at_end() && self.peek() == INDENT {
            self.advance();
            Token::Indent
        } else {
            Token::Newline
        }
    }

    fn scan_token(&mut self) -> (Token, Checkpoint) {
        self.skip_whitespace_and_comments();
        let start = self.state();

        if self.is_at_end() {
            return (Token::EOF, start);
        }

        let ch = self.advance();
        let token = match ch {
            '\n' => self.scan_line_breaks(),
            INDENT => Token::Indent,
            DEDENT => Token::Dedent,
            '\'' | '"' | '`' => Token::Quote(ch),
            '(' => Token::Punctuator(Punctuator::LParen),
            ')' => Token::Punctuator(Punctuator::RParen),
            '{' => Token::Punctuator(Punctuator::LBrace),
            '}' => Token::Punctuator(Punctuator::RBrace),
            '[' => Token::Punctuator(Punctuator::LBracket),
            ']' => Token::Punctuator(Punctuator::RBracket),
            ';' => Token::Punctuator(Punctuator::Semicolon),
            ',' => Token::Punctuator(Punctuator::Comma),
            ':' => Token::Punctuator(Punctuator::Colon),
            '~' => Token::Punctuator(Punctuator::Tilde),

            '@' => self.scan_receiver(),

            '.' => {
                if self.peek_is('.') && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    Token::Punctuator(Punctuator::Spread)
                } else {
                    Token::Punctuator(Punctuator::Dot)
                }
            }

            '?' => {
                if self.match_char('?') {
                    if self.match_char('=') {
                        Token::Punctuator(Punctuator::NullishCoalesceEq)
                    } else {
                        Token::Punctuator(Punctuator::NullishCoalesce)
                    }
                } else if self.peek_is('.')
                    && !self.peek_next().map_or(false, |c| c.is_ascii_digit())
                {
                    self.advance();
                    Token::Punctuator(Punctuator::OptionalChain)
                } else {
                    Token::Punctuator(Punctuator::Question)
                }
            }

            '=' => {
                if self.match_char('>') {
                    Token::Punctuator(Punctuator::Arrow)
                } else if self.match_char('=') {
                    if self.match_char('=') {
                        Token::Punctuator(Punctuator::EqEqEq)
                    } else {
                        Token::Punctuator(Punctuator::EqEq)
                    }
                } else {
                    Token::Punctuator(Punctuator::Assign)
                }
            }

            '!' => {
                if self.match_char('=') {
                    if self.match_char('=') {
                        Token::Punctuator(Punctuator::NotEqEq)
                    } else {
                        Token::Punctuator(Punctuator::NotEq)
                    }
                } else {
                    Token::Punctuator(Punctuator::Not)
                }
            }

            '+' => {
                if self.match_char('+') {
                    Token::Punctuator(Punctuator::PlusPlus)
                } else if self.match_char('=') {
                    Token::Punctuator(Punctuator::PlusEq)
                } else {
                    Token::Punctuator(Punctuator::Plus)
                }
            }

            '-' => {
                if self.match_char('-') {
                    Token::Punctuator(Punctuator::MinusMinus)
                } else if self.match_char('=') {
                    Token::Punctuator(Punctuator::MinusEq)
                } else {
                    Token::Punctuator(Punctuator::Minus)
                }
            }

            '*' => {
                if self.match_char('*') {
                    if self.match_char('=') {
                        Token::Punctuator(Punctuator::StarStarEq)
                    } else {
                        Token::Punctuator(Punctuator::StarStar)
                    }
                } else if self.match_char('=') {
                    Token::Punctuator(Punctuator::StarEq)
                } else {
                    Token::Punctuator(Punctuator::Star)
                }
            }

            '/' => {
                if self.match_char('=') {
                    Token::Punctuator(Punctuator::SlashEq)
                } else {
                    Token::Punctuator(Punctuator::Slash)
                }
            }

            '%' => {
                if self.match_char('=') {
                    Token::Punctuator(Punctuator::PercentEq)
                } else {
                    Token::Punctuator(Punctuator::Percent)
                }
            }

            '<' => {
                if self.match_char('<') {
                    if self.match_char('=') {
                        Token::Punctuator(Punctuator::LtLtEq)
                    } else {
                        Token::Punctuator(Punctuator::LtLt)
                    }
                } else if self.match_char('=') {
                    Token::Punctuator(Punctuator::LtEq)
                } else {
                    Token::Punctuator(Punctuator::Lt)
                }
            }

            '>' => {
                if self.match_char('>') {
                    if self.match_char('>') {
                        if self.match_char('=') {
                            Token::Punctuator(Punctuator::GtGtGtEq)
                        } else {
                            Token::Punctuator(Punctuator::GtGtGt)
                        }
                    } else if self.match_char('=') {
                        Token::Punctuator(Punctuator::GtGtEq)
                    } else {
                        Token::Punctuator(Punctuator::GtGt)
                    }
                } else if self.match_char('=') {
                    Token::Punctuator(Punctuator::GtEq)
                } else {
                    Token::Punctuator(Punctuator::Gt)
                }
            }

            '&' => {
                if self.match_char('&') {
                    if self.match_char('=') {
                        Token::Punctuator(Punctuator::AndAndEq)
                    } else {
                        Token::Punctuator(Punctuator::AndAnd)
                    }
                } else if self.match_char('=') {
                    Token::Punctuator(Punctuator::AndEq)
                } else {
                    Token::Punctuator(Punctuator::And)
                }
            }

            '|' => {
                if self.match_char('|') {
                    if self.match_char('=') {
                        Token::Punctuator(Punctuator::OrOrEq)
                    } else {
                        Token::Punctuator(Punctuator::OrOr)
                    }
                } else if self.match_char('=') {
                    Token::Punctuator(Punctuator::OrEq)
                } else {
                    Token::Punctuator(Punctuator::Or)
                }
            }

            '^' => {
                if self.match_char('=') {
                    Token::Punctuator(Punctuator::XorEq)
                } else {
                    Token::Punctuator(Punctuator::Xor)
                }
            }

            c if c.is_ascii_digit() => self.scan_number(c),
            c if is_identifier_start(c) => {
                let word = self.scan_identifier_rest(c);
                match Keyword::lookup(&word) {
                    Some(keyword) => Token::Keyword(keyword),
                    None => Token::Identifier(word),
                }
            }
            c => Token::Invalid(c),
        };
        (token, start)
    }

    fn peek_is(&self, expected: char) -> bool {
        !self.is_at_end() && self.peek() == expected
    }

    /// `@`, `@name` or `@@name` (the `@` is already consumed)
    fn scan_receiver(&mut self) -> Token {
        if self.peek_is('@') && self.peek_next().map_or(false, is_identifier_start) {
            self.advance();
            let first = self.advance();
            return Token::WellKnownSymbol(self.scan_identifier_rest(first));
        }
        if !self.is_at_end() && is_identifier_start(self.peek()) {
            let first = self.advance();
            return Token::SelfMember(self.scan_identifier_rest(first));
        }
        Token::Punctuator(Punctuator::At)
    }

    fn scan_identifier_rest(&mut self, first: char) -> String {
        let mut word = String::new();
        word.push(first);
        while !self.is_at_end() && is_identifier_part(self.peek()) {
            word.push(self.advance());
        }
        word
    }

    fn scan_number(&mut self, first: char) -> Token {
        let mut raw = String::new();
        raw.push(first);

        let radix = if first == '0' && !self.is_at_end() {
            match self.peek() {
                'x' | 'X' => Some(16),
                'b' | 'B' => Some(2),
                'o' | 'O' => Some(8),
                _ => None,
            }
        } else {
            None
        };

        if let Some(radix) = radix {
            let after_prefix = self.peek_next().map_or(false, |c| c.is_digit(radix));
            if after_prefix {
                raw.push(self.advance());
                while !self.is_at_end() && (self.peek().is_digit(radix) || self.peek() == '_') {
                    raw.push(self.advance());
                }
                if self.match_char('n') {
                    raw.push('n');
                }
                return Token::Number { raw, unit: None };
            }
        }

        self.scan_digits(&mut raw);

        if self.peek_is('.') && self.peek_next().map_or(false, |c| c.is_ascii_digit()) {
            raw.push(self.advance());
            self.scan_digits(&mut raw);
        }

        if self.peek_is('e') || self.peek_is('E') {
            let exponent_follows = match self.peek_next() {
                Some(c) if c.is_ascii_digit() => true,
                Some('+') | Some('-') => self
                    .chars
                    .get(self.position + 2)
                    .map_or(false, |c| c.is_ascii_digit()),
                _ => false,
            };
            if exponent_follows {
                raw.push(self.advance());
                if self.peek_is('+') || self.peek_is('-') {
                    raw.push(self.advance());
                }
                self.scan_digits(&mut raw);
            }
        }

        if self.peek_is('n')
            && !self.peek_next().map_or(false, is_identifier_part)
            && !raw.contains(['.', 'e', 'E'])
        {
            self.advance();
            raw.push('n');
            return Token::Number { raw, unit: None };
        }

        let mut unit = String::new();
        while !self.is_at_end() && self.peek().is_alphabetic() {
            unit.push(self.advance());
        }

        Token::Number {
            raw,
            unit: if unit.is_empty() { None } else { Some(unit) },
        }
    }

    fn scan_digits(&mut self, raw: &mut String) {
        while !self.is_at_end() && (self.peek().is_ascii_digit() || self.peek() == '_') {
            raw.push(self.advance());
        }
    }
}

/// True for characters that may start an identifier
pub fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

/// True for characters that may continue an identifier
pub fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source, 0);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token();
            if token == Token::EOF {
                break;
            }
            out.push(token);
        }
        out
    }

    #[test]
    fn test_keywords_and_contextual_words() {
        assert_eq!(
            tokens("unless of"),
            vec![
                Token::Keyword(Keyword::Unless),
                Token::Identifier("of".to_string())
            ]
        );
    }

    #[test]
    fn test_unit_suffixed_numbers() {
        assert_eq!(
            tokens("2.5s 10px 1e3 0xff 12n"),
            vec![
                Token::Number { raw: "2.5".into(), unit: Some("s".into()) },
                Token::Number { raw: "10".into(), unit: Some("px".into()) },
                Token::Number { raw: "1e3".into(), unit: None },
                Token::Number { raw: "0xff".into(), unit: None },
                Token::Number { raw: "12n".into(), unit: None },
            ]
        );
    }

    #[test]
    fn test_em_unit_is_not_an_exponent() {
        assert_eq!(
            tokens("3em"),
            vec![Token::Number { raw: "3".into(), unit: Some("em".into()) }]
        );
    }

    #[test]
    fn test_receiver_sugar() {
        assert_eq!(
            tokens("@ @name @@iterator"),
            vec![
                Token::Punctuator(Punctuator::At),
                Token::SelfMember("name".into()),
                Token::WellKnownSymbol("iterator".into()),
            ]
        );
    }

    #[test]
    fn test_newline_folds_indent_marker() {
        assert_eq!(
            tokens("a\n\n  # note\n  ⇨b⇦\nc"),
            vec![
                Token::Identifier("a".into()),
                Token::Indent,
                Token::Identifier("b".into()),
                Token::Dedent,
                Token::Newline,
                Token::Identifier("c".into()),
            ]
        );
    }

    #[test]
    fn test_markers_do_not_count_as_columns() {
        let mut lexer = Lexer::new("a\n  ⇨b", 0);
        lexer.next_token();
        lexer.next_token();
        let position = lexer.token_position();
        assert_eq!((position.line, position.column), (2, 3));
    }

    #[test]
    fn test_line_offset_applied() {
        let mut lexer = Lexer::new("x", 3);
        assert_eq!(lexer.token_position().line, 4);
    }

    #[test]
    fn test_string_segments_stop_at_interpolation() {
        let mut lexer = Lexer::new("\"a #{b} c\"", 0);
        assert_eq!(lexer.next_token(), Token::Quote('"'));
        assert_eq!(
            lexer.scan_string_segment('"'),
            ("a ".to_string(), SegmentEnd::Interpolation)
        );
        assert_eq!(lexer.next_token(), Token::Identifier("b".into()));
        assert_eq!(lexer.next_token(), Token::Punctuator(Punctuator::RBrace));
        assert_eq!(
            lexer.scan_string_segment('"'),
            (" c".to_string(), SegmentEnd::Closed)
        );
    }

    #[test]
    fn test_single_quoted_string_ignores_interpolation() {
        let mut lexer = Lexer::new("'#{x}'", 0);
        lexer.next_token();
        assert_eq!(
            lexer.scan_string_segment('\''),
            ("#{x}".to_string(), SegmentEnd::Closed)
        );
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("\"abc", 0);
        lexer.next_token();
        assert_eq!(lexer.scan_string_segment('"').1, SegmentEnd::Unterminated);
    }

    #[test]
    fn test_regex_rejects_unknown_or_repeated_flags() {
        for source in ["/r/gx", "/r/gg", "/r/g_"] {
            let mut lexer = Lexer::new(source, 0);
            lexer.peek_token();
            assert_eq!(lexer.scan_regex(), None, "{}", source);
        }
        let mut lexer = Lexer::new("/r/dgimsuvy", 0);
        lexer.peek_token();
        assert_eq!(lexer.scan_regex(), Some(("r".to_string(), "dgimsuvy".to_string())));
    }

    #[test]
    fn test_regex_rescan() {
        let mut lexer = Lexer::new("/a[/]b/gi + 1", 0);
        assert_eq!(lexer.peek_token(), &Token::Punctuator(Punctuator::Slash));
        assert_eq!(
            lexer.scan_regex(),
            Some(("a[/]b".to_string(), "gi".to_string()))
        );
        assert_eq!(lexer.next_token(), Token::Punctuator(Punctuator::Plus));
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut lexer = Lexer::new("a b", 0);
        let checkpoint = lexer.checkpoint();
        lexer.next_token();
        lexer.peek_token();
        lexer.restore(checkpoint);
        assert_eq!(lexer.next_token(), Token::Identifier("a".into()));
    }

    #[test]
    fn test_angle_close_splits_shift() {
        let mut lexer = Lexer::new(">> x", 0);
        assert!(lexer.consume_angle_close());
        assert_eq!(lexer.next_token(), Token::Punctuator(Punctuator::Gt));
    }

    #[test]
    fn test_only_trivia_from() {
        let lexer = Lexer::new("a ⇦ # done\n", 0);
        assert!(lexer.only_trivia_from(1));
        assert!(!lexer.only_trivia_from(0));
    }
}
