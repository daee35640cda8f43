//! Sable parser component
//!
//! Turns Sable source text into a parse tree. Indentation is made explicit by
//! a line-based preprocessor before any token is read, so the grammar itself
//! only ever sees block markers.
//!
//! # Overview
//!
//! - [`layout`] - Indentation preprocessor inserting block markers
//! - [`Lexer`] - On-demand tokenizer with backtracking checkpoints
//! - [`Parser`] - Ordered-choice recursive descent parser
//! - [`cst`] - Parse tree node types
//! - [`dump_tree`] - Indented, human-readable view of a parse tree
//!
//! # Example
//!
//! ```
//! use parser::cst::Statement;
//!
//! let program = parser::parse("if ready\n  go()").unwrap();
//! assert!(matches!(program.body[0], Statement::If { .. }));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cst;
pub mod error;
pub mod layout;
pub mod lexer;
mod parser;

pub use cst::{Expression, Program, Statement};
pub use lexer::{Keyword, Lexer, Punctuator, Token};
pub use parser::{Parser, MAX_NESTING_DEPTH};

use core_types::CompileError;

/// Preprocess and parse `source` in one step
///
/// # Errors
/// Returns an `IndentationError` or a `SyntaxError` carrying the furthest
/// position reached and what was expected there.
pub fn parse(source: &str) -> Result<Program, CompileError> {
    Parser::new(source)?.parse()
}

/// Render a parse tree as an indented dump
pub fn dump_tree(program: &Program) -> String {
    format!("{:#?}", program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_tree_names_productions() {
        let program = parse("x = 1").unwrap();
        let dump = dump_tree(&program);
        assert!(dump.contains("Assignment"));
        assert!(dump.contains("Identifier"));
        assert!(dump.lines().count() > 3);
    }
}
