//! Text emitter
//!
//! Walks the parse tree bottom-up and builds the output program as text. Each
//! handler returns a [`Decorated<String>`]; blocks allocate entries in the
//! [`ScopeTable`] and leave a placeholder where their `let` line goes. The
//! placeholders are filled in once the whole program has been emitted.
//!
//! Handlers never fail: anything the parser accepts can be emitted. Only the
//! final scope resolution can report an (internal) error.

mod expressions;
mod functions;
mod jsx;
mod modules;
mod patterns;
mod statements;
mod types;

use crate::decorated::{Aggregate, Decorated};
use crate::receiver::Receiver;
use crate::scope::ScopeTable;
use core_types::{CompileError, CompileOptions, ModuleKind};
use parser::cst::{Block, Program, Statement};

pub use types::type_text;

/// Text output of a node
pub type Text = Decorated<String>;

/// Replacement program for scripts that yield at the top level
pub const TOP_LEVEL_GENERATOR_STUB: &str =
    "\"use strict\";\nthrow new SyntaxError(\"yield is not allowed at the top level of a script\");\n";

/// Emitter state for one compilation
pub struct TextEmitter<'a> {
    options: &'a CompileOptions,
    scopes: ScopeTable,
    receivers: Vec<Receiver>,
    in_derived_constructor: bool,
    next_reference: u32,
}

impl<'a> TextEmitter<'a> {
    /// Create an emitter with an empty scope table
    pub fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            scopes: ScopeTable::new(),
            receivers: vec![Receiver::This],
            in_derived_constructor: false,
            next_reference: 0,
        }
    }

    /// Emit a whole program, resolve scopes and substitute placeholders
    pub fn emit_program(mut self, program: &Program) -> Result<String, CompileError> {
        let (aggregate, lines) = self.emit_statements(&program.body);

        if aggregate.is_generator {
            tracing::debug!("top-level yield; emitting throwing stub");
            return Ok(TOP_LEVEL_GENERATOR_STUB.to_string());
        }

        let token = self.scopes.allocate(
            aggregate.scoped_variables,
            aggregate.declared,
            aggregate.scopes,
        );

        let mut output = String::from("\"use strict\";\n");
        output.push_str(&ScopeTable::placeholder(token));
        for line in &lines {
            output.push_str(line);
            output.push('\n');
        }
        if aggregate.is_async && self.options.module_kind == ModuleKind::EsModule {
            output.push_str("export {};\n");
        }

        tracing::debug!(scopes = self.scopes.len(), "emitted program text");
        self.scopes.resolve()?;
        self.scopes.substitute(&output)
    }

    // ---- blocks ----

    /// Emit a statement list, dropping statements with no output
    pub(crate) fn emit_statements(&mut self, statements: &[Statement]) -> (Aggregate, Vec<String>) {
        let mut aggregate = Aggregate::new();
        let mut lines = Vec::new();
        for statement in statements {
            let text = self.emit_statement(statement);
            let output = aggregate.take(text);
            if !output.is_empty() {
                lines.push(output);
            }
        }
        (aggregate, lines)
    }

    /// Emit a block that declares `declared` (parameters, loop bindings)
    pub(crate) fn emit_block(&mut self, block: &Block, declared: Vec<String>) -> Text {
        let (aggregate, lines) = self.emit_statements(&block.body);
        self.wrap_block(aggregate, lines, declared)
    }

    /// Brace `lines` as a block with its own scope entry
    ///
    /// The block's hoisted names stay in its entry; only its token and the
    /// async/generator flags reach the parent.
    pub(crate) fn wrap_block(
        &mut self,
        aggregate: Aggregate,
        lines: Vec<String>,
        declared: Vec<String>,
    ) -> Text {
        let Aggregate {
            scoped_variables,
            declared: block_declared,
            scopes,
            is_async,
            is_generator,
        } = aggregate;

        let mut text = if lines.is_empty() && scoped_variables.is_empty() && scopes.is_empty() {
            Decorated::leaf("{}".to_string())
        } else {
            let token = self.scopes.allocate(
                scoped_variables,
                declared.into_iter().chain(block_declared),
                scopes,
            );
            let body = format!("{}{}", ScopeTable::placeholder(token), lines.join("\n"));
            let mut text = Decorated::leaf(format!("{{\n{}\n}}", indent(&body)));
            text.scopes.push(token);
            text
        };
        text.is_async = is_async;
        text.is_generator = is_generator;
        text
    }

    // ---- receiver ----

    fn receiver(&self) -> &'static str {
        self.receivers.last().copied().unwrap_or(Receiver::This).name()
    }

    fn with_receiver<T>(&mut self, receiver: Receiver, f: impl FnOnce(&mut Self) -> T) -> T {
        self.receivers.push(receiver);
        let result = f(self);
        self.receivers.pop();
        result
    }

    /// Fresh name for a lowering temporary
    fn reference(&mut self) -> String {
        self.next_reference += 1;
        format!("$ref{}", self.next_reference)
    }
}

/// Indent every non-empty line by two spaces
pub(crate) fn indent(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("  {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(source: &str) -> String {
        let program = parser::parse(source).unwrap();
        TextEmitter::new(&CompileOptions::default())
            .emit_program(&program)
            .unwrap()
    }

    #[test]
    fn test_indent_skips_empty_lines() {
        assert_eq!(indent("a\n\nb"), "  a\n\n  b");
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(emit(""), "\"use strict\";\n");
    }

    #[test]
    fn test_top_level_hoisting() {
        assert_eq!(emit("b = 1\na = 2"), "\"use strict\";\nlet a, b;\nb = 1;\na = 2;\n");
    }

    #[test]
    fn test_top_level_yield_is_stubbed() {
        assert_eq!(emit("yield 1"), TOP_LEVEL_GENERATOR_STUB);
    }

    #[test]
    fn test_top_level_await_marks_module() {
        assert_eq!(
            emit("data = await load()"),
            "\"use strict\";\nlet data;\ndata = await load();\nexport {};\n"
        );
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(emit("while go\n  pass"), "\"use strict\";\nwhile (go) {}\n");
    }
}
