//! Functions, methods and classes

use super::{AstEmitter, Ast, Node};
use crate::decorated::{Aggregate, Decorated};
use crate::receiver::{FunctionKind, Prologue, Receiver};
use crate::scope::ScopeToken;
use parser::cst::*;

/// `$self` binding statements
fn prologue(kind: FunctionKind) -> Vec<Node> {
    let self_binding = |init| Node::declaration("let", Node::identifier("$self"), init);
    match kind.prologue() {
        Prologue::None => Vec::new(),
        Prologue::This => vec![self_binding(Some(Node::ThisExpression))],
        Prologue::Deferred => vec![self_binding(None)],
        Prologue::Static => {
            let getter = Node::FunctionExpression {
                id: None,
                params: Vec::new(),
                body: Box::new(Node::block(vec![Node::ReturnStatement {
                    argument: Some(Box::new(Node::identifier("$class"))),
                }])),
                is_async: false,
                generator: false,
            };
            let receiver = Node::ObjectExpression {
                properties: vec![Node::Property {
                    key: Box::new(Node::identifier("constructor")),
                    value: Box::new(getter),
                    kind: "get",
                    method: false,
                    shorthand: false,
                    computed: false,
                }],
            };
            vec![
                Node::declaration("const", Node::identifier("$class"), Some(Node::ThisExpression)),
                self_binding(Some(receiver)),
            ]
        }
    }
}

fn accessor_kind(kind: MethodKind) -> &'static str {
    match kind {
        MethodKind::Method => "method",
        MethodKind::Get => "get",
        MethodKind::Set => "set",
    }
}

/// Emitted pieces of a function
struct Callable {
    params: Vec<Node>,
    body: Node,
    concise: bool,
    is_async: bool,
    is_generator: bool,
    scopes: Vec<ScopeToken>,
}

impl Callable {
    fn function_expression(self) -> (Node, Vec<ScopeToken>) {
        let node = Node::FunctionExpression {
            id: None,
            params: self.params,
            body: Box::new(self.body),
            is_async: self.is_async,
            generator: self.is_generator,
        };
        (node, self.scopes)
    }
}

fn with_scopes(node: Node, scopes: Vec<ScopeToken>) -> Ast {
    let mut ast = Decorated::leaf(node);
    ast.scopes = scopes;
    ast
}

impl<'a> AstEmitter<'a> {
    pub(crate) fn emit_function_declaration(&mut self, function: &Function) -> Ast {
        let callable = self.emit_callable(FunctionKind::Declaration, &function.params, &function.body);
        let node = Node::FunctionDeclaration {
            id: function.name.as_deref().map(|name| Box::new(Node::identifier(name))),
            params: callable.params,
            body: Box::new(callable.body),
            is_async: callable.is_async,
            generator: callable.is_generator,
        };
        with_scopes(node, callable.scopes)
    }

    pub(crate) fn emit_function_expression(&mut self, function: &Function) -> Ast {
        let callable = self.emit_callable(FunctionKind::Expression, &function.params, &function.body);
        let node = Node::FunctionExpression {
            id: function.name.as_deref().map(|name| Box::new(Node::identifier(name))),
            params: callable.params,
            body: Box::new(callable.body),
            is_async: callable.is_async,
            generator: callable.is_generator,
        };
        with_scopes(node, callable.scopes)
    }

    /// Arrows that yield become generator function expressions
    pub(crate) fn emit_arrow(&mut self, function: &Function) -> Ast {
        let callable = self.emit_callable(FunctionKind::Arrow, &function.params, &function.body);
        if callable.is_generator {
            let (node, scopes) = callable.function_expression();
            return with_scopes(node, scopes);
        }
        let node = Node::ArrowFunctionExpression {
            params: callable.params,
            body: Box::new(callable.body),
            is_async: callable.is_async,
            expression: callable.concise,
        };
        with_scopes(node, callable.scopes)
    }

    /// Object literal method as a `Property`
    pub(crate) fn emit_object_method(&mut self, key: &PropertyKey, kind: MethodKind, function: &Function) -> Ast {
        let mut parts = Aggregate::new();
        let (key, computed) = parts.take(self.emit_property_key(key));
        let callable = self.emit_callable(FunctionKind::ObjectMethod, &function.params, &function.body);
        let (value, scopes) = callable.function_expression();
        parts.scopes.extend(scopes);
        parts.finish(Node::Property {
            key: Box::new(key),
            value: Box::new(value),
            kind: match kind {
                MethodKind::Method => "init",
                other => accessor_kind(other),
            },
            method: kind == MethodKind::Method,
            shorthand: false,
            computed,
        })
    }

    fn emit_callable(&mut self, kind: FunctionKind, params: &[Parameter], body: &FunctionBody) -> Callable {
        let receivers = self.receivers.len();
        if let Some(receiver) = kind.receiver() {
            self.receivers.push(receiver);
        }
        let derived = self.in_derived_constructor;
        self.in_derived_constructor = kind.derived_constructor(derived);

        let mut signature = Aggregate::new();
        let mut declared = Vec::new();
        let mut nodes = Vec::new();
        for param in params {
            declared.extend(param.pattern.bound_names());
            nodes.push(signature.take(self.emit_pattern(&param.pattern)));
        }

        let callable = match body {
            FunctionBody::Block(block) => {
                let (mut contents, statements) = self.emit_statements(&block.body);
                contents.take(signature.finish(()));
                let mut body = prologue(kind);
                body.extend(statements);
                self.callable_block(nodes, contents, body, declared)
            }
            FunctionBody::Expression(expression) => {
                let value = self.emit_expression(expression);
                let concise = kind == FunctionKind::Arrow
                    && !value.is_generator
                    && value.scoped_variables.is_empty()
                    && value.scopes.is_empty()
                    && signature.scoped_variables.is_empty()
                    && signature.scopes.is_empty();
                if concise {
                    Callable {
                        params: nodes,
                        is_async: value.is_async,
                        body: value.output,
                        concise: true,
                        is_generator: false,
                        scopes: Vec::new(),
                    }
                } else {
                    let mut contents = Aggregate::new();
                    let value = contents.take(value);
                    contents.take(signature.finish(()));
                    let mut body = prologue(kind);
                    body.push(Node::ReturnStatement {
                        argument: Some(Box::new(value)),
                    });
                    self.callable_block(nodes, contents, body, declared)
                }
            }
        };

        self.in_derived_constructor = derived;
        self.receivers.truncate(receivers);
        callable
    }

    fn callable_block(
        &mut self,
        params: Vec<Node>,
        contents: Aggregate,
        statements: Vec<Node>,
        declared: Vec<String>,
    ) -> Callable {
        let block = self.wrap_block(contents, statements, declared);
        Callable {
            params,
            body: block.output,
            concise: false,
            is_async: block.is_async,
            is_generator: block.is_generator,
            scopes: block.scopes,
        }
    }

    // ---- classes ----

    /// `ClassDeclaration` when `declaration`, `ClassExpression` otherwise
    pub(crate) fn emit_class(&mut self, class: &Class, declaration: bool) -> Ast {
        let mut parts = Aggregate::new();
        let super_class = class
            .super_class
            .as_ref()
            .map(|super_class| Box::new(parts.take(self.emit_expression(super_class))));
        let derived = super_class.is_some();
        let members = class
            .members
            .iter()
            .map(|member| parts.take(self.emit_class_member(member, derived)))
            .collect();

        let id = class.name.as_deref().map(|name| Box::new(Node::identifier(name)));
        let body = Box::new(Node::ClassBody { body: members });
        parts.finish(if declaration {
            Node::ClassDeclaration { id, super_class, body }
        } else {
            Node::ClassExpression { id, super_class, body }
        })
    }

    fn emit_class_member(&mut self, member: &ClassMember, derived: bool) -> Ast {
        match member {
            ClassMember::Constructor { params, body } => {
                let callable = self.emit_callable(FunctionKind::Constructor { derived }, params, body);
                let (value, scopes) = callable.function_expression();
                let node = Node::MethodDefinition {
                    key: Box::new(Node::identifier("constructor")),
                    value: Box::new(value),
                    kind: "constructor",
                    computed: false,
                    is_static: false,
                };
                with_scopes(node, scopes)
            }
            ClassMember::Method {
                key,
                is_static,
                kind,
                function,
            } => {
                let function_kind = if *is_static {
                    FunctionKind::StaticMethod
                } else {
                    FunctionKind::Method
                };
                let mut parts = Aggregate::new();
                let (key, computed) = parts.take(self.emit_property_key(key));
                let callable = self.emit_callable(function_kind, &function.params, &function.body);
                let (value, scopes) = callable.function_expression();
                parts.scopes.extend(scopes);
                parts.finish(Node::MethodDefinition {
                    key: Box::new(key),
                    value: Box::new(value),
                    kind: accessor_kind(*kind),
                    computed,
                    is_static: *is_static,
                })
            }
            ClassMember::Field {
                key,
                is_static,
                value,
                ..
            } => {
                let mut parts = Aggregate::new();
                let (key, computed) = parts.take(self.emit_property_key(key));
                let value = value.as_ref().map(|value| {
                    let value = self.with_receiver(Receiver::This, |emitter| emitter.emit_expression(value));
                    Box::new(parts.take(value))
                });
                parts.finish(Node::PropertyDefinition {
                    key: Box::new(key),
                    value,
                    computed,
                    is_static: *is_static,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::estree::{AstEmitter, Node};
    use core_types::CompileOptions;
    use serde_json::Value;

    /// Statements of a function declaration's block body
    fn body_of(node: &Node) -> Vec<Node> {
        match node {
            Node::FunctionDeclaration { body, .. } => match body.as_ref() {
                Node::BlockStatement { body } => body.nodes(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn statements(source: &str) -> Vec<Node> {
        let program = parser::parse(source).unwrap();
        match AstEmitter::new(&CompileOptions::default())
            .emit_program(&program)
            .unwrap()
        {
            Node::Program { body, .. } => body.nodes(),
            _ => unreachable!("emit_program returns a Program"),
        }
    }

    fn json(node: &Node) -> Value {
        serde_json::to_value(node).unwrap()
    }

    #[test]
    fn test_function_body_hoists_locals_after_resolution() {
        let nodes = statements("fn total(items)\n  sum = 0\n  return sum");
        let body = body_of(&nodes[1]);
        let declaration = json(&body[0]);
        assert_eq!(declaration["kind"], "let");
        assert_eq!(declaration["declarations"][0]["id"]["name"], "sum");
        assert_eq!(json(&nodes[1])["params"][0]["name"], "items");
    }

    #[test]
    fn test_async_and_generator_inference() {
        let nodes = statements("fn load()\n  await fetch()\nfn count()\n  yield 1");
        assert_eq!(json(&nodes[1])["async"], true);
        assert_eq!(json(&nodes[2])["generator"], true);
        assert_eq!(json(&nodes[2])["async"], false);
    }

    #[test]
    fn test_concise_arrow() {
        let nodes = statements("f = (a, b) => a + b");
        let arrow = &json(&nodes[2])["expression"]["right"];
        assert_eq!(arrow["type"], "ArrowFunctionExpression");
        assert_eq!(arrow["expression"], true);
        assert_eq!(arrow["body"]["type"], "BinaryExpression");
    }

    #[test]
    fn test_yielding_arrow_becomes_generator_function() {
        let nodes = statements("f = () => yield 1");
        let function = &json(&nodes[2])["expression"]["right"];
        assert_eq!(function["type"], "FunctionExpression");
        assert_eq!(function["generator"], true);
    }

    #[test]
    fn test_class_methods_bind_self() {
        let nodes = statements(
            "class Counter extends Base\n  constructor(start)\n    super(start)\n  get value()\n    return @count\n  static create() => @build()",
        );
        let class = json(&nodes[1]);
        assert_eq!(class["superClass"]["name"], "Base");
        let members = &class["body"]["body"];

        let constructor = &members[0]["value"]["body"]["body"];
        assert_eq!(constructor[0]["declarations"][0]["init"], Value::Null);
        assert_eq!(constructor[1]["expression"]["left"]["name"], "$self");
        assert_eq!(constructor[1]["expression"]["right"]["callee"]["type"], "Super");

        let getter = &members[1];
        assert_eq!(getter["kind"], "get");
        assert_eq!(getter["value"]["body"]["body"][0]["declarations"][0]["init"]["type"], "ThisExpression");
        assert_eq!(getter["value"]["body"]["body"][1]["argument"]["object"]["name"], "$self");

        let factory = &members[2];
        assert_eq!(factory["static"], true);
        let body = &factory["value"]["body"]["body"];
        assert_eq!(body[0]["declarations"][0]["id"]["name"], "$class");
        assert_eq!(body[1]["declarations"][0]["init"]["properties"][0]["kind"], "get");
        assert_eq!(body[2]["argument"]["callee"]["object"]["name"], "$self");
    }

    #[test]
    fn test_field_initializer_uses_this() {
        let nodes = statements("class Box\n  size = @initial");
        let field = &json(&nodes[1])["body"]["body"][0];
        assert_eq!(field["type"], "PropertyDefinition");
        assert_eq!(field["value"]["object"]["type"], "ThisExpression");
    }

    #[test]
    fn test_object_method_uses_this() {
        let nodes = statements("o = {greet() => @name}");
        let property = &json(&nodes[2])["expression"]["right"]["properties"][0];
        assert_eq!(property["method"], true);
        let body = &property["value"]["body"]["body"];
        assert_eq!(body[0]["argument"]["object"]["type"], "ThisExpression");
    }
}
