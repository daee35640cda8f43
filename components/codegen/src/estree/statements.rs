//! Statement handlers

use super::{AstEmitter, Ast, Node, Nodes};
use crate::decorated::{Aggregate, Decorated};
use crate::grow_stack;
use crate::lowering::{format_number, range_comparison, EnumCounter};
use core_types::TargetVersion;
use parser::cst::*;

/// Numeric literal node for a computed value
pub(crate) fn numeral(value: f64) -> Node {
    if value < 0.0 {
        return Node::UnaryExpression {
            operator: "-",
            prefix: true,
            argument: Box::new(numeral(-value)),
        };
    }
    Node::number(value, format_number(value))
}

fn single(ast: Ast) -> Nodes {
    ast.map(|node| vec![node])
}

impl<'a> AstEmitter<'a> {
    pub(crate) fn emit_statement(&mut self, statement: &Statement) -> Nodes {
        grow_stack(|| self.emit_statement_kind(statement))
    }

    fn emit_statement_kind(&mut self, statement: &Statement) -> Nodes {
        match statement {
            Statement::VariableDeclaration {
                kind, declarations, ..
            } => single(self.emit_variable_declaration(*kind, declarations)),

            Statement::FunctionDeclaration { function, .. } => {
                let name = function.name.clone().unwrap_or_default();
                single(self.emit_function_declaration(function)).declaring(vec![name])
            }

            Statement::ClassDeclaration { class, .. } => {
                let name = class.name.clone().unwrap_or_default();
                single(self.emit_class(class, true)).declaring(vec![name])
            }

            Statement::EnumDeclaration { name, members, .. } => single(self.emit_enum(name, members)),

            Statement::TypeAlias { .. } => Decorated::leaf(Vec::new()),

            Statement::If {
                test,
                negated,
                consequent,
                alternate,
                ..
            } => {
                let mut parts = Aggregate::new();
                let test = parts.take(self.emit_condition(test, *negated));
                let consequent = parts.take(self.emit_block(consequent, Vec::new()));
                let alternate = match alternate {
                    Some(ElseBranch::If(statement)) => {
                        parts.take(self.emit_statement(statement)).into_iter().next()
                    }
                    Some(ElseBranch::Block(block)) => Some(parts.take(self.emit_block(block, Vec::new()))),
                    None => None,
                };
                parts.finish(vec![Node::IfStatement {
                    test: Box::new(test),
                    consequent: Box::new(consequent),
                    alternate: alternate.map(Box::new),
                }])
            }

            Statement::While {
                test, negated, body, ..
            } => {
                let mut parts = Aggregate::new();
                let test = parts.take(self.emit_condition(test, *negated));
                let body = parts.take(self.emit_block(body, Vec::new()));
                parts.finish(vec![Node::WhileStatement {
                    test: Box::new(test),
                    body: Box::new(body),
                }])
            }

            Statement::DoWhile {
                body, test, negated, ..
            } => {
                let mut parts = Aggregate::new();
                let body = parts.take(self.emit_block(body, Vec::new()));
                let test = parts.take(self.emit_condition(test, *negated));
                parts.finish(vec![Node::DoWhileStatement {
                    body: Box::new(body),
                    test: Box::new(test),
                }])
            }

            Statement::ForOf {
                pattern,
                iterable,
                is_await,
                body,
                ..
            } => {
                let mut parts = Aggregate::new();
                let binding = parts.take(self.emit_pattern(pattern));
                let iterable = parts.take(self.emit_expression(iterable));
                let body = parts.take(self.emit_block(body, pattern.bound_names()));
                let nodes = parts.finish(vec![Node::ForOfStatement {
                    left: Box::new(Node::declaration("let", binding, None)),
                    right: Box::new(iterable),
                    body: Box::new(body),
                    is_await: *is_await,
                }]);
                if *is_await {
                    nodes.asynchronous()
                } else {
                    nodes
                }
            }

            Statement::ForIn {
                pattern,
                object,
                body,
                ..
            } => {
                let mut parts = Aggregate::new();
                let binding = parts.take(self.emit_pattern(pattern));
                let object = parts.take(self.emit_expression(object));
                let body = parts.take(self.emit_block(body, pattern.bound_names()));
                parts.finish(vec![Node::ForInStatement {
                    left: Box::new(Node::declaration("let", binding, None)),
                    right: Box::new(object),
                    body: Box::new(body),
                }])
            }

            Statement::ForRange {
                binding,
                start,
                bound,
                descending,
                inclusive,
                step,
                body,
                ..
            } => {
                let mut parts = Aggregate::new();
                let start = match start {
                    Some(start) => parts.take(self.emit_expression(start)),
                    None => numeral(0.0),
                };
                let bound = match bound {
                    Some(bound) => parts.take(self.emit_expression(bound)),
                    None if *descending => Node::UnaryExpression {
                        operator: "-",
                        prefix: true,
                        argument: Box::new(Node::identifier("Infinity")),
                    },
                    None => Node::identifier("Infinity"),
                };
                let step = match step {
                    Some(step) => parts.take(self.emit_expression(step)),
                    None => numeral(1.0),
                };
                let body = parts.take(self.emit_block(body, vec![binding.clone()]));
                let counter = || Node::identifier(binding.as_str());
                parts.finish(vec![Node::ForStatement {
                    init: Some(Box::new(Node::declaration("let", counter(), Some(start)))),
                    test: Some(Box::new(Node::binary(
                        range_comparison(*descending, *inclusive),
                        counter(),
                        bound,
                    ))),
                    update: Some(Box::new(Node::assign(
                        if *descending { "-=" } else { "+=" },
                        counter(),
                        step,
                    ))),
                    body: Box::new(body),
                }])
            }

            Statement::Switch {
                discriminant,
                cases,
                ..
            } => self.emit_switch(discriminant, cases),

            Statement::Try {
                block,
                handler,
                finalizer,
                ..
            } => self.emit_try(block, handler.as_ref(), finalizer.as_ref()),

            Statement::AwaitThread {
                pattern,
                argument,
                body,
                ..
            } => self.emit_await_thread(pattern, argument, body),

            Statement::Return { argument, .. } => match argument {
                Some(argument) => self.emit_expression(argument).map(|argument| {
                    vec![Node::ReturnStatement {
                        argument: Some(Box::new(argument)),
                    }]
                }),
                None => Decorated::leaf(vec![Node::ReturnStatement { argument: None }]),
            },

            Statement::Throw { argument, .. } => self.emit_expression(argument).map(|argument| {
                vec![Node::ThrowStatement {
                    argument: Box::new(argument),
                }]
            }),

            Statement::Break { .. } => Decorated::leaf(vec![Node::BreakStatement { label: None }]),
            Statement::Continue { .. } => Decorated::leaf(vec![Node::ContinueStatement { label: None }]),
            Statement::Debugger { .. } => Decorated::leaf(vec![Node::DebuggerStatement]),
            Statement::Pass { .. } => Decorated::leaf(Vec::new()),

            Statement::Import { declaration, .. } => self
                .emit_import(declaration)
                .declaring(declaration.local_names()),

            Statement::Export { declaration, .. } => self.emit_export(declaration),

            Statement::Expression { expression, .. } => self
                .emit_expression(expression)
                .map(|expression| vec![Node::statement(expression)]),
        }
    }

    fn emit_variable_declaration(
        &mut self,
        kind: DeclarationKind,
        declarations: &[VariableDeclarator],
    ) -> Ast {
        let mut parts = Aggregate::new();
        let mut names = Vec::new();
        let mut declarators = Vec::new();
        for declarator in declarations {
            names.extend(declarator.pattern.bound_names());
            let id = parts.take(self.emit_pattern(&declarator.pattern));
            let init = declarator
                .init
                .as_ref()
                .map(|init| parts.take(self.emit_expression(init)));
            declarators.push(Node::VariableDeclarator {
                id: Box::new(id),
                init: init.map(Box::new),
            });
        }
        parts
            .finish(Node::VariableDeclaration {
                kind: kind.as_str(),
                declarations: declarators,
            })
            .declaring(names)
    }

    fn emit_enum(&mut self, name: &str, members: &[EnumMember]) -> Ast {
        let mut parts = Aggregate::new();
        let mut counter = EnumCounter::new();
        let mut properties = Vec::new();
        for member in members {
            let value = match &member.value {
                Some(value) => {
                    counter.explicit(value);
                    parts.take(self.emit_expression(value))
                }
                None => numeral(counter.implicit()),
            };
            properties.push(Node::Property {
                key: Box::new(Node::identifier(member.name.as_str())),
                value: Box::new(value),
                kind: "init",
                method: false,
                shorthand: false,
                computed: false,
            });
        }
        let frozen = Node::call(
            Node::member(Node::identifier("Object"), "freeze"),
            vec![Node::ObjectExpression { properties }],
        );
        parts
            .finish(Node::declaration("const", Node::identifier(name), Some(frozen)))
            .declaring(vec![name.to_string()])
    }

    fn emit_condition(&mut self, test: &Expression, negated: bool) -> Ast {
        let test = self.emit_expression(test);
        if negated {
            test.map(Node::not)
        } else {
            test
        }
    }

    /// Stacked `case` labels share the last label's body; every body breaks
    fn emit_switch(&mut self, discriminant: &Expression, cases: &[SwitchCase]) -> Nodes {
        let mut parts = Aggregate::new();
        let discriminant = parts.take(self.emit_expression(discriminant));
        let mut clauses = Vec::new();
        for case in cases {
            let mut tests: Vec<Option<Node>> = case
                .tests
                .iter()
                .map(|test| Some(parts.take(self.emit_expression(test))))
                .collect();
            if case.is_default() {
                tests.push(None);
            }

            let (body, mut statements) = self.emit_statements(&case.body.body);
            statements.push(Node::BreakStatement { label: None });
            let block = parts.take(self.wrap_block(body, statements, Vec::new()));

            let last = tests.len() - 1;
            for (index, test) in tests.into_iter().enumerate() {
                clauses.push(Node::SwitchCase {
                    test: test.map(Box::new),
                    consequent: if index == last { vec![block.clone()] } else { Vec::new() },
                });
            }
        }
        parts.finish(vec![Node::SwitchStatement {
            discriminant: Box::new(discriminant),
            cases: clauses,
        }])
    }

    fn emit_try(
        &mut self,
        block: &Block,
        handler: Option<&CatchClause>,
        finalizer: Option<&Block>,
    ) -> Nodes {
        let ignore_all = CatchClause::ignoring();
        let handler = match (handler, finalizer) {
            (None, None) => Some(&ignore_all),
            _ => handler,
        };
        let mut parts = Aggregate::new();
        let block = parts.take(self.emit_block(block, Vec::new()));
        let handler = handler.map(|handler| {
            let declared = handler
                .param
                .as_ref()
                .map(Pattern::bound_names)
                .unwrap_or_default();
            let param = match &handler.param {
                Some(param) => Some(parts.take(self.emit_pattern(param))),
                None if self.options.target < TargetVersion::Es2020 => Some(Node::identifier("$error")),
                None => None,
            };
            let body = parts.take(self.emit_block(&handler.body, declared));
            Node::CatchClause {
                param: param.map(Box::new),
                body: Box::new(body),
            }
        });
        let finalizer = finalizer.map(|finalizer| parts.take(self.emit_block(finalizer, Vec::new())));
        parts.finish(vec![Node::TryStatement {
            block: Box::new(block),
            handler: handler.map(Box::new),
            finalizer: finalizer.map(Box::new),
        }])
    }

    fn emit_await_thread(&mut self, pattern: &Pattern, argument: &Expression, body: &Block) -> Nodes {
        let mut parts = Aggregate::new();
        let argument = parts.take(self.emit_expression(argument));

        let (mut inner, statements) = self.emit_statements(&body.body);
        let binding = inner.take(self.emit_pattern(pattern));
        let awaited = Node::AwaitExpression {
            argument: Box::new(Node::identifier("$thread")),
        };
        let mut prologue = vec![Node::declaration("let", binding, Some(awaited))];
        prologue.extend(statements);
        let block = self.wrap_block(inner, prologue, pattern.bound_names());

        let continuation = Node::ArrowFunctionExpression {
            params: vec![Node::identifier("$thread")],
            body: Box::new(block.output),
            is_async: true,
            expression: false,
        };
        let mut nodes = parts.finish(vec![Node::statement(Node::call(continuation, vec![argument]))]);
        nodes.scopes.extend(block.scopes);
        nodes
    }
}

#[cfg(test)]
mod tests {
    use crate::estree::AstEmitter;
    use core_types::{CompileOptions, TargetVersion};
    use serde_json::Value;

    fn body_with(source: &str, options: &CompileOptions) -> Vec<Value> {
        let program = parser::parse(source).unwrap();
        let node = AstEmitter::new(options).emit_program(&program).unwrap();
        let value = serde_json::to_value(node).unwrap();
        value["body"].as_array().unwrap()[1..].to_vec()
    }

    fn body(source: &str) -> Vec<Value> {
        body_with(source, &CompileOptions::default())
    }

    #[test]
    fn test_if_else_chain() {
        let statements = body("if a\n  x()\nelse if b\n  y()\nelse\n  z()");
        let outer = &statements[0];
        assert_eq!(outer["type"], "IfStatement");
        assert_eq!(outer["alternate"]["type"], "IfStatement");
        assert_eq!(outer["alternate"]["alternate"]["type"], "BlockStatement");
    }

    #[test]
    fn test_unless_negates() {
        let statements = body("unless ready then wait()");
        assert_eq!(statements[0]["test"]["operator"], "!");
        assert_eq!(statements[0]["test"]["argument"]["name"], "ready");
    }

    #[test]
    fn test_for_range_defaults() {
        let statements = body("for i downto\n  tick(i)");
        let loop_ = &statements[0];
        assert_eq!(loop_["type"], "ForStatement");
        assert_eq!(loop_["init"]["declarations"][0]["init"]["value"], 0.0);
        assert_eq!(loop_["test"]["operator"], ">");
        assert_eq!(loop_["test"]["right"]["operator"], "-");
        assert_eq!(loop_["test"]["right"]["argument"]["name"], "Infinity");
        assert_eq!(loop_["update"]["operator"], "-=");
    }

    #[test]
    fn test_switch_clauses_break() {
        let statements = body("switch x\n  case 1, 2\n    a()\n  default\n    b()");
        let cases = statements[0]["cases"].as_array().unwrap();
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[0]["consequent"].as_array().unwrap().len(), 0);
        for index in [1, 2] {
            let block = &cases[index]["consequent"][0]["body"];
            let last = block.as_array().unwrap().last().unwrap();
            assert_eq!(last["type"], "BreakStatement");
        }
        assert_eq!(cases[2]["test"], Value::Null);
    }

    #[test]
    fn test_enum_counter() {
        let statements = body("enum Color\n  Red\n  Green = 5\n  Blue");
        let properties = &statements[0]["declarations"][0]["init"]["arguments"][0]["properties"];
        assert_eq!(properties[0]["value"]["value"], 0.0);
        assert_eq!(properties[2]["value"]["value"], 6.0);
    }

    #[test]
    fn test_catch_binding_on_old_targets() {
        let options = CompileOptions::default().with_target(TargetVersion::Es2015);
        let statements = body_with("try\n  risky()\ncatch\n  pass", &options);
        assert_eq!(statements[0]["handler"]["param"]["name"], "$error");
        let statements = body("try\n  risky()\ncatch\n  pass");
        assert_eq!(statements[0]["handler"]["param"], Value::Null);
    }

    #[test]
    fn test_bare_try_gets_empty_handler() {
        let statements = body("try\n  risky()");
        let handler = &statements[0]["handler"];
        assert_eq!(handler["type"], "CatchClause");
        assert_eq!(handler["param"], Value::Null);
        assert_eq!(handler["body"]["type"], "BlockStatement");
        assert_eq!(handler["body"]["body"].as_array().unwrap().len(), 0);
        assert_eq!(statements[0]["finalizer"], Value::Null);

        let options = CompileOptions::default().with_target(TargetVersion::Es2015);
        let statements = body_with("try\n  risky()", &options);
        assert_eq!(statements[0]["handler"]["param"]["name"], "$error");
    }

    #[test]
    fn test_type_alias_erased() {
        assert!(body("type Id = string").is_empty());
    }

    #[test]
    fn test_await_thread() {
        let statements = body("await user = fetchUser()\n  show(user)");
        let call = &statements[0]["expression"];
        assert_eq!(call["callee"]["type"], "ArrowFunctionExpression");
        assert_eq!(call["callee"]["async"], true);
        assert_eq!(call["arguments"][0]["callee"]["name"], "fetchUser");
        let first = &call["callee"]["body"]["body"][0];
        assert_eq!(first["declarations"][0]["init"]["type"], "AwaitExpression");
    }
}
