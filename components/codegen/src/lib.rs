//! Sable code generator
//!
//! Compiles a Sable parse tree to JavaScript, either as text or as an ESTree
//! syntax tree. Both emitters walk the tree bottom-up, composing one
//! [`Decorated`] value per node, and defer implicit `let` declarations to a
//! per-compilation [`ScopeTable`] that is resolved once the walk is done.
//!
//! # Overview
//!
//! - [`decorated`] - Per-node output plus the metadata parents aggregate
//! - [`scope`] - Scope entries, hoisting resolution and placeholder substitution
//! - [`lowering`] - Literal and operator rewrites shared by both emitters
//! - [`text`] - Text emitter
//! - [`estree`] - Target-AST emitter
//!
//! # Example
//!
//! ```
//! use core_types::CompileOptions;
//!
//! let output = codegen::compile("total = 1 + 2", &CompileOptions::default()).unwrap();
//! assert_eq!(output, "\"use strict\";\nlet total;\ntotal = 1 + 2;\n");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decorated;
pub mod estree;
pub mod lowering;
mod receiver;
pub mod scope;
pub mod text;

pub use decorated::{Aggregate, Decorated};
pub use estree::{AstEmitter, Node};
pub use scope::{ScopeTable, ScopeToken};
pub use text::TextEmitter;

use core_types::{CompileError, CompileOptions};
use parser::Program;

/// Parse Sable source into its parse tree
///
/// # Errors
/// Returns the parser's `SyntaxError` or `IndentationError`.
pub fn parse(source: &str) -> Result<Program, CompileError> {
    parser::parse(source)
}

/// Compile Sable source to JavaScript text
///
/// Every call owns its scope table, so calls are independent of each other.
///
/// # Errors
/// Returns a parse error, or an `InvariantViolation` if scope resolution
/// finds an inconsistent table.
pub fn compile(source: &str, options: &CompileOptions) -> Result<String, CompileError> {
    let program = parse(source)?;
    TextEmitter::new(options).emit_program(&program)
}

/// Compile Sable source to an ESTree `Program` node
///
/// # Errors
/// Same as [`compile`].
pub fn compile_to_ast(source: &str, options: &CompileOptions) -> Result<Node, CompileError> {
    let program = parse(source)?;
    AstEmitter::new(options).emit_program(&program)
}

/// Compile Sable source to pretty-printed ESTree JSON
///
/// # Errors
/// Same as [`compile`]; serialization failures are reported as
/// `InvariantViolation`.
pub fn compile_to_ast_json(source: &str, options: &CompileOptions) -> Result<String, CompileError> {
    let node = compile_to_ast(source, options)?;
    serde_json::to_string_pretty(&node)
        .map_err(|error| CompileError::invariant(format!("cannot serialize syntax tree: {}", error)))
}

/// Human-readable dump of the parse tree the emitters consume
///
/// # Errors
/// Returns the parse error when `source` does not parse.
pub fn dump_parse_tree(source: &str) -> Result<String, CompileError> {
    Ok(parser::dump_tree(&parse(source)?))
}

/// Run one step of a recursive emitter walk, growing the stack when it runs low
pub(crate) fn grow_stack<R>(step: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(128 * 1024, 2 * 1024 * 1024, step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ErrorKind;

    #[test]
    fn test_compile_and_ast_agree_on_hoisting() {
        let options = CompileOptions::default();
        let text = compile("if ready\n  count = 1", &options).unwrap();
        assert!(text.contains("if (ready) {\n  let count;\n  count = 1;\n}"));

        let ast = serde_json::to_value(compile_to_ast("if ready\n  count = 1", &options).unwrap()).unwrap();
        let block = &ast["body"][1]["consequent"]["body"];
        assert_eq!(block[0]["declarations"][0]["id"]["name"], "count");
    }

    #[test]
    fn test_parse_errors_surface() {
        let error = compile("x = (1", &CompileOptions::default()).unwrap_err();
        assert_eq!(error.kind, ErrorKind::SyntaxError);
        assert!(error.at_end_of_input);
    }

    #[test]
    fn test_ast_json_is_pretty() {
        let json = compile_to_ast_json("x = 1", &CompileOptions::default()).unwrap();
        assert!(json.starts_with("{\n"));
        assert!(json.contains("\"type\": \"Program\""));
    }

    #[test]
    fn test_dump_parse_tree() {
        let dump = dump_parse_tree("x = 1").unwrap();
        assert!(dump.contains("Assignment"));
    }
}
