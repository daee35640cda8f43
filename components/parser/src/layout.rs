//! Indentation preprocessor
//!
//! The grammar only understands explicit block markers, so before parsing the
//! raw text is rewritten line by line: an [`INDENT`] marker is placed before
//! the first token of a line that is indented deeper than its predecessor, and
//! one [`DEDENT`] marker per closed block is placed after the last token of the
//! block's final line.
//!
//! Lines that start inside a string literal, inside a `#{…}` interpolation or
//! inside an open bracket continue the previous logical line and never change
//! the indentation level.

use crate::error::indentation_error;
use crate::lexer::{is_identifier_part, is_identifier_start};
use core_types::{CompileError, SourcePosition};

/// Marker opening an indented block
pub const INDENT: char = '\u{21E8}';

/// Marker closing an indented block
pub const DEDENT: char = '\u{21E6}';

/// Preprocessed text ready for the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutText {
    /// Text with block markers inserted
    pub text: String,
    /// Number of blank lines trimmed from the start of the original text
    pub line_offset: u32,
}

/// Embedding state carried across physical lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Inside a string literal opened with this quote
    Quote(char),
    /// Inside a `#{…}` interpolation; braces opened inside it are tracked separately
    Interpolation,
    /// Inside an open bracket of this kind
    Bracket(char),
    /// Inside a JSX tag, between `<` and `>`
    JsxTag {
        /// True for `</name>`
        closing: bool,
    },
    /// Inside a JSX attribute string; no escapes, no interpolation
    JsxString(char),
    /// Inside the children of a JSX element, where quotes and `#` are text
    JsxChildren,
}

/// Result of scanning one physical line
#[derive(Debug, Clone, Copy)]
struct LineScan {
    /// Index just after the last token character outside a comment
    code_end: usize,
    /// True when the line has no tokens (whitespace or comment only)
    blank: bool,
}

/// A group of physical lines forming one logical line
#[derive(Debug, Clone, Copy)]
struct LogicalLine {
    first: usize,
    last: usize,
    indent: usize,
    code_end: usize,
}

/// Insert block markers into `source`
///
/// # Errors
/// Returns an `IndentationError` when a line dedents to a column that no
/// enclosing block was opened at.
///
/// # Example
/// ```
/// use parser::layout::{preprocess, DEDENT, INDENT};
///
/// let layout = preprocess("if ready\n  go()\ndone()").unwrap();
/// assert_eq!(layout.text, format!("if ready\n  {INDENT}go(){DEDENT}\ndone()"));
/// ```
pub fn preprocess(source: &str) -> Result<LayoutText, CompileError> {
    let normalized = source.replace("\r\n", "\n");
    let all_lines: Vec<Vec<char>> = normalized.split('\n').map(|l| l.chars().collect()).collect();

    let is_whitespace_line = |line: &Vec<char>| line.iter().all(|c| c.is_whitespace());
    let leading = all_lines.iter().take_while(|l| is_whitespace_line(l)).count();
    let trailing = all_lines[leading..]
        .iter()
        .rev()
        .take_while(|l| is_whitespace_line(l))
        .count();
    let lines: Vec<Vec<char>> = all_lines[leading..all_lines.len() - trailing].to_vec();
    let line_offset = leading as u32;

    let logical = group_logical_lines(&lines);

    // Markers to insert per physical line: (index, marker text)
    let mut opens: Vec<Option<usize>> = vec![None; lines.len()];
    let mut closes: Vec<(usize, usize)> = vec![(0, 0); lines.len()];

    let mut levels: Vec<usize> = Vec::new();
    let mut previous: Option<LogicalLine> = None;

    for line in &logical {
        match levels.last().copied() {
            None => levels.push(line.indent),
            Some(top) if line.indent > top => {
                levels.push(line.indent);
                opens[line.first] = Some(line.indent);
            }
            Some(top) if line.indent < top => {
                let mut closed = 0;
                while levels.len() > 1 && levels.last().copied().unwrap_or(0) > line.indent {
                    levels.pop();
                    closed += 1;
                }
                if levels.last().copied() != Some(line.indent) {
                    return Err(indentation_error(
                        "Unindent does not match any outer indentation level",
                        SourcePosition {
                            line: line_offset + line.first as u32 + 1,
                            column: line.indent as u32 + 1,
                            offset: 0,
                        },
                    ));
                }
                if let Some(prev) = previous {
                    closes[prev.last] = (prev.code_end, closes[prev.last].1 + closed);
                }
            }
            Some(_) => {}
        }
        previous = Some(*line);
    }

    if let Some(prev) = previous {
        let remaining = levels.len().saturating_sub(1);
        if remaining > 0 {
            closes[prev.last] = (prev.code_end, closes[prev.last].1 + remaining);
        }
    }

    let mut text = String::with_capacity(normalized.len() + logical.len() * 2);
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            text.push('\n');
        }
        let (close_at, close_count) = closes[index];
        for (col, ch) in line.iter().enumerate() {
            if close_count > 0 && col == close_at {
                text.extend(std::iter::repeat(DEDENT).take(close_count));
            }
            if opens[index] == Some(col) {
                text.push(INDENT);
            }
            text.push(*ch);
        }
        if close_count > 0 && close_at >= line.len() {
            text.extend(std::iter::repeat(DEDENT).take(close_count));
        }
    }

    tracing::trace!(
        lines = lines.len(),
        logical_lines = logical.len(),
        trimmed = line_offset,
        "layout preprocessed"
    );

    Ok(LayoutText { text, line_offset })
}

/// Group physical lines into logical lines, skipping blank ones
fn group_logical_lines(lines: &[Vec<char>]) -> Vec<LogicalLine> {
    let mut frames: Vec<Frame> = Vec::new();
    let mut logical = Vec::new();
    let mut current: Option<LogicalLine> = None;

    for (index, line) in lines.iter().enumerate() {
        let continuation = !frames.is_empty();
        let scan = scan_line(line, &mut frames);

        if continuation {
            if let Some(group) = current.as_mut() {
                group.last = index;
                if !scan.blank {
                    group.code_end = scan.code_end;
                }
            }
        } else if !scan.blank {
            if let Some(group) = current.take() {
                logical.push(group);
            }
            let indent = line.iter().take_while(|c| **c == ' ' || **c == '\t').count();
            current = Some(LogicalLine {
                first: index,
                last: index,
                indent,
                code_end: scan.code_end,
            });
        }
    }

    if let Some(mut group) = current {
        // Unterminated string or bracket at end of input: close after everything
        if !frames.is_empty() {
            group.code_end = lines[group.last].len();
        }
        logical.push(group);
    }

    logical
}

/// Scan one physical line, updating the embedding stack
fn scan_line(line: &[char], frames: &mut Vec<Frame>) -> LineScan {
    let mut code_end = 0;
    let mut blank = true;
    let mut i = 0;

    while i < line.len() {
        let ch = line[i];
        match frames.last().copied() {
            Some(Frame::Quote(quote)) => {
                blank = false;
                code_end = i + 1;
                if ch == '\\' {
                    i += 1;
                    code_end = (i + 1).min(line.len());
                } else if ch == quote {
                    frames.pop();
                } else if quote != '\'' && ch == '#' && line.get(i + 1) == Some(&'{') {
                    frames.push(Frame::Interpolation);
                    i += 1;
                    code_end = i + 1;
                }
            }
            Some(Frame::JsxString(quote)) => {
                blank = false;
                code_end = i + 1;
                if ch == quote {
                    frames.pop();
                }
            }
            Some(Frame::JsxChildren) => {
                if !ch.is_whitespace() {
                    blank = false;
                    code_end = i + 1;
                }
                match ch {
                    '<' if line.get(i + 1) == Some(&'/') => {
                        frames.push(Frame::JsxTag { closing: true });
                        i += 1;
                        code_end = i + 1;
                    }
                    '<' => frames.push(Frame::JsxTag { closing: false }),
                    '{' => frames.push(Frame::Bracket(ch)),
                    _ => {}
                }
            }
            Some(Frame::JsxTag { closing }) => {
                if !ch.is_whitespace() {
                    blank = false;
                    code_end = i + 1;
                }
                match ch {
                    '\'' | '"' => frames.push(Frame::JsxString(ch)),
                    '{' => frames.push(Frame::Bracket(ch)),
                    '/' if line.get(i + 1) == Some(&'>') => {
                        frames.pop();
                        i += 1;
                        code_end = i + 1;
                    }
                    '>' => {
                        frames.pop();
                        if !closing {
                            frames.push(Frame::JsxChildren);
                        } else if frames.last() == Some(&Frame::JsxChildren) {
                            frames.pop();
                        }
                    }
                    _ => {}
                }
            }
            _ => {
                if ch == '#' {
                    break;
                }
                if !ch.is_whitespace() {
                    blank = false;
                    code_end = i + 1;
                }
                match ch {
                    '\'' | '"' | '`' => frames.push(Frame::Quote(ch)),
                    '(' | '[' | '{' => frames.push(Frame::Bracket(ch)),
                    ')' | ']' => {
                        if matches!(frames.last(), Some(Frame::Bracket(_))) {
                            frames.pop();
                        }
                    }
                    '}' => match frames.last() {
                        Some(Frame::Bracket(_)) | Some(Frame::Interpolation) => {
                            frames.pop();
                        }
                        _ => {}
                    },
                    '/' if operand_expected(line, i) => {
                        if let Some(close) = regex_end(line, i) {
                            i = close;
                            code_end = i + 1;
                        }
                    }
                    '<' if operand_expected(line, i) && opens_jsx_tag(line.get(i + 1)) => {
                        frames.push(Frame::JsxTag { closing: false })
                    }
                    _ => {}
                }
            }
        }
        i += 1;
    }

    LineScan { code_end, blank }
}

/// Words after which an operand, never an operator, follows
const OPERAND_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "delete", "void", "throw", "case", "yield",
    "await", "and", "or", "not", "new", "else", "then", "do", "if", "unless", "while", "until",
];

/// True when the character at `at` starts an operand rather than continuing one
///
/// Mirrors where the parser rescans `/` as a regular expression and `<` as a
/// JSX element: at the start of a line, after an operator or punctuator, or
/// after a keyword that takes an operand.
fn operand_expected(line: &[char], at: usize) -> bool {
    let before = &line[..at];
    let Some(end) = before.iter().rposition(|c| !c.is_whitespace()) else {
        return true;
    };
    let last = before[end];
    if is_identifier_part(last) {
        let start = before[..end]
            .iter()
            .rposition(|c| !is_identifier_part(*c))
            .map_or(0, |p| p + 1);
        let word: String = before[start..=end].iter().collect();
        return OPERAND_KEYWORDS.contains(&word.as_str());
    }
    !matches!(last, ')' | ']' | '}' | '\'' | '"' | '`')
}

fn opens_jsx_tag(next: Option<&char>) -> bool {
    matches!(next, Some(&c) if c == '>' || is_identifier_start(c))
}

/// Index of the `/` closing a regular expression opened at `open`, on the same line
fn regex_end(line: &[char], open: usize) -> Option<usize> {
    let mut in_class = false;
    let mut i = open + 1;
    while i < line.len() {
        match line[i] {
            '\\' => i += 1,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(source: &str) -> String {
        preprocess(source).unwrap().text
    }

    #[test]
    fn test_flat_text_is_unchanged() {
        assert_eq!(layout("a = 1\nb = 2"), "a = 1\nb = 2");
    }

    #[test]
    fn test_single_block() {
        assert_eq!(
            layout("if x\n  y = 1\n  z = 2\nw = 3"),
            "if x\n  ⇨y = 1\n  z = 2⇦\nw = 3"
        );
    }

    #[test]
    fn test_nested_blocks_close_together() {
        assert_eq!(
            layout("a\n  b\n    c\nd"),
            "a\n  ⇨b\n    ⇨c⇦⇦\nd"
        );
    }

    #[test]
    fn test_blocks_close_at_end_of_input() {
        assert_eq!(layout("a\n  b\n    c"), "a\n  ⇨b\n    ⇨c⇦⇦");
    }

    #[test]
    fn test_blank_and_comment_lines_do_not_change_level() {
        assert_eq!(
            layout("a\n  b\n\n# note\n  c\nd"),
            "a\n  ⇨b\n\n# note\n  c⇦\nd"
        );
    }

    #[test]
    fn test_close_marker_goes_before_trailing_comment() {
        assert_eq!(layout("a\n  b # tail\nc"), "a\n  ⇨b⇦ # tail\nc");
    }

    #[test]
    fn test_leading_and_trailing_blank_lines_trimmed() {
        let result = preprocess("\n\n  a\n    b\n\n").unwrap();
        assert_eq!(result.text, "  a\n    ⇨b⇦");
        assert_eq!(result.line_offset, 2);
    }

    #[test]
    fn test_multiline_string_lines_are_continuations() {
        let source = "x = \"one\n  two\n three\"\ny = 1";
        assert_eq!(layout(source), source);
    }

    #[test]
    fn test_line_ending_mid_interpolation_continues() {
        let source = "if a\n  s = \"v: #{f(\n1)} end\"\nb";
        assert_eq!(layout(source), "if a\n  ⇨s = \"v: #{f(\n1)} end\"⇦\nb");
    }

    #[test]
    fn test_interpolation_string_with_same_quote() {
        let source = "if a\n  s = \"x #{\"y\"} z\"\nb";
        assert_eq!(layout(source), "if a\n  ⇨s = \"x #{\"y\"} z\"⇦\nb");
    }

    #[test]
    fn test_single_quotes_do_not_interpolate() {
        let source = "if a\n  s = 'x #{ y'\nb";
        assert_eq!(layout(source), "if a\n  ⇨s = 'x #{ y'⇦\nb");
    }

    #[test]
    fn test_open_bracket_joins_lines() {
        let source = "if a\n  xs = [\n1,\n    2\n  ]\nb";
        assert_eq!(layout(source), "if a\n  ⇨xs = [\n1,\n    2\n  ]⇦\nb");
    }

    #[test]
    fn test_hash_inside_string_is_not_comment() {
        assert_eq!(layout("a\n  b = '#'\nc"), "a\n  ⇨b = '#'⇦\nc");
    }

    #[test]
    fn test_inconsistent_dedent_is_error() {
        let err = preprocess("a\n    b\n  c").unwrap_err();
        assert_eq!(err.kind, core_types::ErrorKind::IndentationError);
        assert_eq!(err.source_position.map(|p| p.line), Some(3));
    }

    #[test]
    fn test_unterminated_string_closes_after_text() {
        assert_eq!(layout("a\n  b = \"open"), "a\n  ⇨b = \"open⇦");
    }

    #[test]
    fn test_crlf_normalized() {
        assert_eq!(layout("a\r\n  b\r\nc"), "a\n  ⇨b⇦\nc");
    }

    #[test]
    fn test_quote_in_jsx_text_is_text() {
        assert_eq!(
            layout("x = <p>don't</p>\nif q\n  w()"),
            "x = <p>don't</p>\nif q\n  ⇨w()⇦"
        );
    }

    #[test]
    fn test_quote_in_regex_is_pattern() {
        assert_eq!(
            layout("r = /a\"b/\nif q\n  w()"),
            "r = /a\"b/\nif q\n  ⇨w()⇦"
        );
    }

    #[test]
    fn test_hash_in_regex_and_jsx_is_not_comment() {
        assert_eq!(
            layout("if a\n  r = /#x/g\n  v = <b title='#'>#1</b>\nc"),
            "if a\n  ⇨r = /#x/g\n  v = <b title='#'>#1</b>⇦\nc"
        );
    }

    #[test]
    fn test_division_is_not_regex() {
        assert_eq!(
            layout("if t\n  x = a /2 + \"/\"\ny()"),
            "if t\n  ⇨x = a /2 + \"/\"⇦\ny()"
        );
    }

    #[test]
    fn test_less_than_is_not_jsx() {
        assert_eq!(
            layout("if a <b\n  c()\nd"),
            "if a <b\n  ⇨c()⇦\nd"
        );
    }

    #[test]
    fn test_multiline_jsx_lines_are_continuations() {
        assert_eq!(
            layout("if a\n  v = <ul>\n    <li>{n}</li>\n  </ul>\nb"),
            "if a\n  ⇨v = <ul>\n    <li>{n}</li>\n  </ul>⇦\nb"
        );
    }
}
