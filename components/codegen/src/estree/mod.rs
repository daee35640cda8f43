//! Target-AST emitter
//!
//! Same tree walk as the text emitter, producing ESTree nodes instead of
//! text. Blocks register a [`HoistSlot`] next to their scope entry; after
//! resolution each slot receives its block's hoisted names, so no output is
//! ever scanned or rewritten.

mod expressions;
mod functions;
mod jsx;
mod modules;
mod node;
mod statements;

pub use node::{BlockBody, HoistSlot, Node, RegexLiteral, TemplateValue};

use crate::decorated::{Aggregate, Decorated};
use crate::receiver::Receiver;
use crate::scope::{ScopeTable, ScopeToken};
use core_types::{CompileError, CompileOptions, ModuleKind};
use parser::cst::{Block, Program, Statement};

/// AST output of an expression-like node
pub type Ast = Decorated<Node>;

/// AST output of a statement; lowering can produce zero or several
pub type Nodes = Decorated<Vec<Node>>;

const TOP_LEVEL_YIELD_MESSAGE: &str = "yield is not allowed at the top level of a script";

/// Emitter state for one compilation
pub struct AstEmitter<'a> {
    options: &'a CompileOptions,
    scopes: ScopeTable,
    slots: Vec<(ScopeToken, HoistSlot)>,
    receivers: Vec<Receiver>,
    in_derived_constructor: bool,
    next_reference: u32,
}

impl<'a> AstEmitter<'a> {
    /// Create an emitter with an empty scope table
    pub fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            scopes: ScopeTable::new(),
            slots: Vec::new(),
            receivers: vec![Receiver::This],
            in_derived_constructor: false,
            next_reference: 0,
        }
    }

    /// Emit a whole program and fill every hoisting slot
    pub fn emit_program(mut self, program: &Program) -> Result<Node, CompileError> {
        let (aggregate, mut statements) = self.emit_statements(&program.body);
        let directive = Node::ExpressionStatement {
            expression: Box::new(Node::string("use strict")),
            directive: Some("use strict".to_string()),
        };

        if aggregate.is_generator {
            tracing::debug!("top-level yield; emitting throwing stub");
            let stub = Node::ThrowStatement {
                argument: Box::new(Node::NewExpression {
                    callee: Box::new(Node::identifier("SyntaxError")),
                    arguments: vec![Node::string(TOP_LEVEL_YIELD_MESSAGE)],
                }),
            };
            return Ok(Node::Program {
                source_type: "script",
                body: BlockBody {
                    directives: vec![directive],
                    statements: vec![stub],
                    ..BlockBody::default()
                },
            });
        }

        let esm = self.options.module_kind == ModuleKind::EsModule;
        let mut source_type = if esm && program.body.iter().any(is_module_statement) {
            "module"
        } else {
            "script"
        };
        if aggregate.is_async && esm {
            statements.push(Node::ExportNamedDeclaration {
                declaration: None,
                specifiers: Vec::new(),
                source: None,
            });
            source_type = "module";
        }

        let token = self.scopes.allocate(
            aggregate.scoped_variables,
            aggregate.declared,
            aggregate.scopes,
        );
        let hoisted = self.register(token);

        tracing::debug!(scopes = self.scopes.len(), "emitted program tree");
        self.scopes.resolve()?;
        for (token, slot) in &self.slots {
            let entry = self
                .scopes
                .entry(*token)
                .ok_or_else(|| CompileError::invariant(format!("hoisting slot for unknown scope {}", token)))?;
            *slot.borrow_mut() = entry.vars.iter().cloned().collect();
        }

        Ok(Node::Program {
            source_type,
            body: BlockBody {
                directives: vec![directive],
                hoisted,
                statements,
            },
        })
    }

    // ---- blocks ----

    pub(crate) fn emit_statements(&mut self, statements: &[Statement]) -> (Aggregate, Vec<Node>) {
        let mut aggregate = Aggregate::new();
        let mut nodes = Vec::new();
        for statement in statements {
            let output = aggregate.take(self.emit_statement(statement));
            nodes.extend(output);
        }
        (aggregate, nodes)
    }

    pub(crate) fn emit_block(&mut self, block: &Block, declared: Vec<String>) -> Ast {
        let (aggregate, statements) = self.emit_statements(&block.body);
        self.wrap_block(aggregate, statements, declared)
    }

    /// `BlockStatement` with its own scope entry and hoisting slot
    pub(crate) fn wrap_block(
        &mut self,
        aggregate: Aggregate,
        statements: Vec<Node>,
        declared: Vec<String>,
    ) -> Ast {
        let Aggregate {
            scoped_variables,
            declared: block_declared,
            scopes,
            is_async,
            is_generator,
        } = aggregate;

        let mut ast = if statements.is_empty() && scoped_variables.is_empty() && scopes.is_empty() {
            Decorated::leaf(Node::block(Vec::new()))
        } else {
            let token = self.scopes.allocate(
                scoped_variables,
                declared.into_iter().chain(block_declared),
                scopes,
            );
            let hoisted = self.register(token);
            let mut ast = Decorated::leaf(Node::BlockStatement {
                body: BlockBody {
                    directives: Vec::new(),
                    hoisted,
                    statements,
                },
            });
            ast.scopes.push(token);
            ast
        };
        ast.is_async = is_async;
        ast.is_generator = is_generator;
        ast
    }

    fn register(&mut self, token: ScopeToken) -> HoistSlot {
        let slot = HoistSlot::default();
        self.slots.push((token, slot.clone()));
        slot
    }

    // ---- receiver ----

    fn receiver(&self) -> Node {
        match self.receivers.last() {
            Some(Receiver::SelfBinding) => Node::identifier(Receiver::SelfBinding.name()),
            _ => Node::ThisExpression,
        }
    }

    fn with_receiver<T>(&mut self, receiver: Receiver, f: impl FnOnce(&mut Self) -> T) -> T {
        self.receivers.push(receiver);
        let result = f(self);
        self.receivers.pop();
        result
    }

    fn reference(&mut self) -> String {
        self.next_reference += 1;
        format!("$ref{}", self.next_reference)
    }
}

fn is_module_statement(statement: &Statement) -> bool {
    matches!(statement, Statement::Import { .. } | Statement::Export { .. })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn program(source: &str) -> Value {
        let program = parser::parse(source).unwrap();
        let node = AstEmitter::new(&CompileOptions::default())
            .emit_program(&program)
            .unwrap();
        serde_json::to_value(node).unwrap()
    }

    #[test]
    fn test_empty_program_has_directive() {
        let value = program("");
        assert_eq!(value["type"], "Program");
        assert_eq!(value["sourceType"], "script");
        assert_eq!(value["body"][0]["directive"], "use strict");
        assert_eq!(value["body"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_hoisted_names_follow_directive() {
        let value = program("b = 1\na = 2");
        let declaration = &value["body"][1];
        assert_eq!(declaration["type"], "VariableDeclaration");
        assert_eq!(declaration["kind"], "let");
        let names: Vec<&Value> = declaration["declarations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| &d["id"]["name"])
            .collect();
        assert_eq!(names, vec![&json!("a"), &json!("b")]);
        assert_eq!(value["body"][2]["expression"]["type"], "AssignmentExpression");
    }

    #[test]
    fn test_nested_block_gets_its_own_slot() {
        let value = program("while go\n  step = next()");
        let body = &value["body"];
        assert_eq!(body.as_array().unwrap().len(), 2);
        let block = &body[1]["body"]["body"];
        assert_eq!(block[0]["declarations"][0]["id"]["name"], "step");
    }

    #[test]
    fn test_top_level_yield_is_stubbed() {
        let value = program("yield 1");
        assert_eq!(value["body"][1]["type"], "ThrowStatement");
        assert_eq!(value["body"][1]["argument"]["callee"]["name"], "SyntaxError");
    }

    #[test]
    fn test_top_level_await_makes_module() {
        let value = program("data = await load()");
        assert_eq!(value["sourceType"], "module");
        let last = value["body"].as_array().unwrap().last().unwrap().clone();
        assert_eq!(last["type"], "ExportNamedDeclaration");
        assert_eq!(last["specifiers"], json!([]));
    }
}
