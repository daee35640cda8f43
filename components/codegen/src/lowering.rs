//! Lowering helpers shared by the text and target-AST emitters
//!
//! Pure functions over literal text: numeric units, string de-indentation and
//! escaping, range loop operators, enum counters and JSX text rules.

use crate::scope::MARK;
use parser::cst::{Expression, NumberLiteral, UnaryOperator};
use std::borrow::Cow;

// ---- numbers ----

/// Milliseconds per time unit; any other suffix keeps the literal as a string
fn unit_scale(unit: &str) -> Option<f64> {
    match unit {
        "ms" => Some(1.0),
        "s" => Some(1_000.0),
        "min" => Some(60_000.0),
        "h" => Some(3_600_000.0),
        "d" => Some(86_400_000.0),
        _ => None,
    }
}

/// Numeric value of a literal's text (separators, radix prefixes)
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let text: String = raw.chars().filter(|&c| c != '_').collect();
    if text.ends_with('n') {
        return None;
    }
    let radix = |digits: &str, base: u32| i64::from_str_radix(digits, base).ok().map(|v| v as f64);
    match text.get(..2) {
        Some("0x" | "0X") => radix(&text[2..], 16),
        Some("0b" | "0B") => radix(&text[2..], 2),
        Some("0o" | "0O") => radix(&text[2..], 8),
        _ => text.parse::<f64>().ok(),
    }
}

/// Shortest decimal text for a value; products within rounding noise of an
/// integer print as that integer
pub fn format_number(value: f64) -> String {
    let rounded = value.round();
    if value.is_finite() && (value - rounded).abs() < 1e-9 {
        format!("{}", rounded)
    } else {
        format!("{}", value)
    }
}

/// How a numeric literal appears in the output
#[derive(Debug, Clone, PartialEq)]
pub enum NumberOutput {
    /// Plain numeric text
    Numeric(String),
    /// Unit-suffixed literal that is not a time unit; the string's content
    Text(String),
}

/// Apply unit folding to a numeric literal
pub fn lower_number(literal: &NumberLiteral) -> NumberOutput {
    let plain = || literal.raw.chars().filter(|&c| c != '_').collect::<String>();
    match &literal.unit {
        None => NumberOutput::Numeric(plain()),
        Some(unit) => match (unit_scale(unit), parse_numeric(&literal.raw)) {
            (Some(scale), Some(value)) => NumberOutput::Numeric(format_number(value * scale)),
            _ => NumberOutput::Text(format!("{}{}", literal.raw, unit)),
        },
    }
}

/// Value of a numeric literal, optionally signed
pub fn numeric_value(expression: &Expression) -> Option<f64> {
    match expression {
        Expression::Number(literal) if literal.unit.is_none() => parse_numeric(&literal.raw),
        Expression::Unary {
            operator: UnaryOperator::Minus,
            argument,
        } => numeric_value(argument).map(|v| -v),
        Expression::Unary {
            operator: UnaryOperator::Plus,
            argument,
        } => numeric_value(argument),
        Expression::Parenthesized(inner) => numeric_value(inner),
        _ => None,
    }
}

// ---- strings ----

/// Strip up to `cutoff` leading spaces or tabs from every line after the first
///
/// The first line continues the source line the delimiter (or a closing
/// interpolation brace) sits on, so it is never touched.
pub fn dedent(text: &str, cutoff: usize) -> String {
    let mut lines = text.split('\n');
    let mut output = String::with_capacity(text.len());
    if let Some(first) = lines.next() {
        output.push_str(first);
    }
    for line in lines {
        output.push('\n');
        let strip = line
            .chars()
            .take(cutoff)
            .take_while(|&c| c == ' ' || c == '\t')
            .count();
        output.push_str(&line[strip..]);
    }
    output
}

/// Escape de-indented string text for an output literal delimited by `delimiter`
///
/// Existing escapes pass through; raw newlines become `\n`; a backslash before
/// a raw newline is a line continuation and disappears with it. Template
/// delimiters also escape `${`.
pub fn escape_string(text: &str, delimiter: char) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('\n') => {}
                Some(MARK) => output.push_str(MARK_ESCAPE),
                Some(next) => {
                    output.push('\\');
                    output.push(next);
                }
                None => output.push_str("\\\\"),
            },
            MARK => output.push_str(MARK_ESCAPE),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '$' if delimiter == '`' && chars.peek() == Some(&'{') => output.push_str("\\$"),
            c if c == delimiter => {
                output.push('\\');
                output.push(c);
            }
            c => output.push(c),
        }
    }
    output
}

/// Output delimiter for an uninterpolated literal
pub fn plain_delimiter(quote: char) -> char {
    if quote == '\'' {
        '\''
    } else {
        '"'
    }
}

/// Resolve escapes in emitted string text, for AST string values
pub fn unescape(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            output.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => output.push('\n'),
            Some('t') => output.push('\t'),
            Some('r') => output.push('\r'),
            Some('b') => output.push('\u{8}'),
            Some('f') => output.push('\u{c}'),
            Some('v') => output.push('\u{b}'),
            Some('0') => output.push('\0'),
            Some('x') => {
                let digits: String = chars.by_ref().take(2).collect();
                push_code_point(&mut output, &digits);
            }
            Some('u') => {
                let rest = chars.as_str();
                if let Some(braced) = rest.strip_prefix('{') {
                    let digits: String = braced.chars().take_while(|&c| c != '}').collect();
                    push_code_point(&mut output, &digits);
                    chars = braced[digits.len()..].chars();
                    chars.next();
                } else {
                    let digits: String = chars.by_ref().take(4).collect();
                    push_code_point(&mut output, &digits);
                }
            }
            Some(other) => output.push(other),
            None => output.push('\\'),
        }
    }
    output
}

fn push_code_point(output: &mut String, digits: &str) {
    if let Some(ch) = u32::from_str_radix(digits, 16).ok().and_then(char::from_u32) {
        output.push(ch);
    }
}

// ---- loops ----

/// Loop condition operator for a counting loop
pub fn range_comparison(descending: bool, inclusive: bool) -> &'static str {
    match (descending, inclusive) {
        (false, false) => "<",
        (false, true) => "<=",
        (true, false) => ">",
        (true, true) => ">=",
    }
}

/// Bound used when a counting loop has none
pub fn default_range_bound(descending: bool) -> &'static str {
    if descending {
        "-Infinity"
    } else {
        "Infinity"
    }
}

// ---- enums ----

/// Running value for enum members without an explicit value
#[derive(Debug, Default)]
pub struct EnumCounter {
    next: f64,
}

impl EnumCounter {
    /// Start counting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the next implicit member
    pub fn implicit(&mut self) -> f64 {
        let value = self.next;
        self.next += 1.0;
        value
    }

    /// Record an explicit member value; numeric literals restart the count
    pub fn explicit(&mut self, value: &Expression) {
        if let Some(number) = numeric_value(value) {
            self.next = number + 1.0;
        }
    }
}

// ---- JSX ----

/// JSX text after whitespace collapsing; `None` when nothing remains
///
/// Lines are trimmed where they meet a line break, blank lines are dropped
/// and the rest are joined with single spaces.
pub fn jsx_text(raw: &str) -> Option<String> {
    let lines: Vec<&str> = raw.split('\n').collect();
    let last = lines.len() - 1;
    let mut kept = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        let mut line = *line;
        if index > 0 {
            line = line.trim_start();
        }
        if index < last {
            line = line.trim_end();
        }
        if !line.is_empty() {
            kept.push(line);
        }
    }
    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" "))
    }
}

/// Lower-case and dashed tags are host elements passed by name
pub fn is_intrinsic_tag(name: &str) -> bool {
    if name.contains('.') {
        return false;
    }
    name.contains('-')
        || name.contains(':')
        || name.chars().next().map_or(false, |c| c.is_ascii_lowercase())
}

/// Fragment reference in the factory's namespace
pub fn fragment_name(factory: &str) -> String {
    match factory.rfind('.') {
        Some(dot) => format!("{}.Fragment", &factory[..dot]),
        None => "Fragment".to_string(),
    }
}

/// True when `name` can be written as a bare property key
pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if parser::lexer::is_identifier_start(c) => {
            chars.all(parser::lexer::is_identifier_part)
        }
        _ => false,
    }
}

/// Double-quoted string literal for arbitrary text
pub fn quote_text(text: &str) -> String {
    let quoted = serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text));
    escape_mark(&quoted).into_owned()
}

// ---- placeholder delimiter ----

const MARK_ESCAPE: &str = "\\uF8FF";

/// Rewrite the scope placeholder delimiter in already-escaped literal text
///
/// Applies to string, template, regex and type literal source. A delimiter
/// that follows a lone backslash reuses it.
pub fn escape_mark(text: &str) -> Cow<'_, str> {
    if !text.contains(MARK) {
        return Cow::Borrowed(text);
    }
    let mut output = String::with_capacity(text.len() + 8);
    let mut escaped = false;
    for ch in text.chars() {
        if ch == MARK {
            output.push_str(if escaped { &MARK_ESCAPE[1..] } else { MARK_ESCAPE });
            escaped = false;
            continue;
        }
        escaped = ch == '\\' && !escaped;
        output.push(ch);
    }
    Cow::Owned(output)
}

/// JSX markup text has no escapes, so the delimiter moves into an expression container
pub fn escape_mark_in_markup(text: &str) -> Cow<'_, str> {
    if text.contains(MARK) {
        Cow::Owned(text.replace(MARK, &format!("{{\"{}\"}}", MARK_ESCAPE)))
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(raw: &str, unit: Option<&str>) -> NumberLiteral {
        NumberLiteral {
            raw: raw.to_string(),
            unit: unit.map(str::to_string),
        }
    }

    #[test]
    fn test_time_units_fold_to_milliseconds() {
        assert_eq!(lower_number(&number("2.5", Some("s"))), NumberOutput::Numeric("2500".into()));
        assert_eq!(lower_number(&number("3", Some("min"))), NumberOutput::Numeric("180000".into()));
        assert_eq!(lower_number(&number("1", Some("d"))), NumberOutput::Numeric("86400000".into()));
        assert_eq!(lower_number(&number("1.1", Some("s"))), NumberOutput::Numeric("1100".into()));
    }

    #[test]
    fn test_placeholder_delimiter_is_escaped() {
        assert_eq!(escape_string("a\u{F8FF}b", '"'), "a\\uF8FFb");
        assert_eq!(escape_string("\\\u{F8FF}", '"'), "\\uF8FF");
        assert_eq!(escape_mark("/\\\u{F8FF}\\\\\u{F8FF}/"), "/\\uF8FF\\\\\\uF8FF/");
        assert_eq!(escape_mark_in_markup("a\u{F8FF}"), "a{\"\\uF8FF\"}");
        assert_eq!(quote_text("\u{F8FF}"), "\"\\uF8FF\"");
        assert_eq!(escape_mark("plain"), Cow::Borrowed("plain"));
    }

    #[test]
    fn test_other_units_become_text() {
        assert_eq!(lower_number(&number("10", Some("px"))), NumberOutput::Text("10px".into()));
    }

    #[test]
    fn test_separators_are_dropped() {
        assert_eq!(lower_number(&number("1_000_000", None)), NumberOutput::Numeric("1000000".into()));
        assert_eq!(parse_numeric("0xff"), Some(255.0));
        assert_eq!(parse_numeric("0b101"), Some(5.0));
        assert_eq!(parse_numeric("10n"), None);
    }

    #[test]
    fn test_dedent_strips_up_to_cutoff() {
        assert_eq!(dedent("first\n      second\n  third", 4), "first\n  second\nthird");
        assert_eq!(dedent("  keep\n\tx", 4), "  keep\nx");
    }

    #[test]
    fn test_escape_newlines_and_quotes() {
        assert_eq!(escape_string("a\nb \"c\"", '"'), "a\\nb \\\"c\\\"");
        assert_eq!(escape_string("already \\\" fine", '"'), "already \\\" fine");
        assert_eq!(escape_string("`${x}`", '`'), "\\`\\${x}\\`");
        assert_eq!(escape_string("joined \\\nhere", '"'), "joined here");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("a\\nb\\\"c"), "a\nb\"c");
        assert_eq!(unescape("\\u0041\\x42\\u{43}"), "ABC");
    }

    #[test]
    fn test_range_operators() {
        assert_eq!(range_comparison(false, false), "<");
        assert_eq!(range_comparison(false, true), "<=");
        assert_eq!(range_comparison(true, false), ">");
        assert_eq!(range_comparison(true, true), ">=");
        assert_eq!(default_range_bound(true), "-Infinity");
    }

    #[test]
    fn test_enum_counter_resets_after_explicit_number() {
        let mut counter = EnumCounter::new();
        assert_eq!(counter.implicit(), 0.0);
        counter.explicit(&Expression::Number(number("10", None)));
        assert_eq!(counter.implicit(), 11.0);
        counter.explicit(&Expression::String(parser::cst::StringLiteral {
            quote: '"',
            parts: vec![],
            indent_cutoff: 1,
        }));
        assert_eq!(counter.implicit(), 12.0);
    }

    #[test]
    fn test_jsx_text_collapses_lines() {
        assert_eq!(jsx_text("Hello "), Some("Hello ".into()));
        assert_eq!(jsx_text("\n    one\n    two  \n  "), Some("one two".into()));
        assert_eq!(jsx_text("\n   \n"), None);
    }

    #[test]
    fn test_fragment_and_intrinsic_names() {
        assert_eq!(fragment_name("React.createElement"), "React.Fragment");
        assert_eq!(fragment_name("h"), "Fragment");
        assert!(is_intrinsic_tag("div"));
        assert!(is_intrinsic_tag("my-widget"));
        assert!(!is_intrinsic_tag("App"));
        assert!(!is_intrinsic_tag("ui.Button"));
    }
}
