//! Function-like constructs: declarations, expressions, arrows, methods and
//! classes
//!
//! Every function body is a block with its own scope entry; parameters are
//! declared in it. Async and generator flags stop at the function boundary
//! and turn into `async` / `*` markers on the function itself.

use super::expressions::ASSIGNMENT;
use super::{Text, TextEmitter};
use crate::receiver::{FunctionKind, Prologue, Receiver};
use crate::decorated::{Aggregate, Decorated};
use crate::scope::ScopeToken;
use parser::cst::*;

/// Text of the `$self` binding statements
fn prologue(kind: FunctionKind) -> Vec<String> {
    match kind.prologue() {
        Prologue::None => Vec::new(),
        Prologue::This => vec!["let $self = this;".to_string()],
        Prologue::Deferred => vec!["let $self;".to_string()],
        Prologue::Static => vec![
            "const $class = this;".to_string(),
            "let $self = { get constructor() { return $class; } };".to_string(),
        ],
    }
}

/// Emitted pieces of a function, before the head is assembled
struct Callable {
    params: String,
    body: String,
    concise: bool,
    is_async: bool,
    is_generator: bool,
    scopes: Vec<ScopeToken>,
}

impl Callable {
    fn async_prefix(&self) -> &'static str {
        if self.is_async {
            "async "
        } else {
            ""
        }
    }

    fn star(&self) -> &'static str {
        if self.is_generator {
            "*"
        } else {
            ""
        }
    }

    /// Decorator for the finished function: only the body scope escapes
    fn finish(self, output: String) -> Text {
        let mut text = Decorated::leaf(output);
        text.scopes = self.scopes;
        text
    }
}

impl<'a> TextEmitter<'a> {
    pub(crate) fn emit_function_declaration(&mut self, function: &Function) -> Text {
        let callable = self.emit_callable(FunctionKind::Declaration, &function.params, &function.body);
        let output = format!(
            "{}function{} {}{}({}){} {}",
            callable.async_prefix(),
            callable.star(),
            function.name.as_deref().unwrap_or_default(),
            self.type_parameters(&function.type_params),
            callable.params,
            self.annotation(function.return_type.as_ref()),
            callable.body
        );
        callable.finish(output)
    }

    pub(crate) fn emit_function_expression(&mut self, function: &Function) -> Text {
        let callable = self.emit_callable(FunctionKind::Expression, &function.params, &function.body);
        let name = match &function.name {
            Some(name) => format!(" {}", name),
            None => " ".to_string(),
        };
        let output = format!(
            "{}function{}{}{}({}){} {}",
            callable.async_prefix(),
            callable.star(),
            name,
            self.type_parameters(&function.type_params),
            callable.params,
            self.annotation(function.return_type.as_ref()),
            callable.body
        );
        callable.finish(output)
    }

    /// Arrows that yield become generator function expressions
    pub(crate) fn emit_arrow(&mut self, function: &Function) -> Text {
        let callable = self.emit_callable(FunctionKind::Arrow, &function.params, &function.body);
        let output = if callable.is_generator {
            format!(
                "{}function* ({}){} {}",
                callable.async_prefix(),
                callable.params,
                self.annotation(function.return_type.as_ref()),
                callable.body
            )
        } else {
            let body = if callable.concise && callable.body.starts_with('{') {
                format!("({})", callable.body)
            } else {
                callable.body.clone()
            };
            format!(
                "{}{}({}){} => {}",
                callable.async_prefix(),
                self.type_parameters(&function.type_params),
                callable.params,
                self.annotation(function.return_type.as_ref()),
                body
            )
        };
        callable.finish(output)
    }

    pub(crate) fn emit_object_method(
        &mut self,
        key: &PropertyKey,
        kind: MethodKind,
        function: &Function,
    ) -> Text {
        self.emit_method(key, false, kind, function, FunctionKind::ObjectMethod)
    }

    fn emit_method(
        &mut self,
        key: &PropertyKey,
        is_static: bool,
        kind: MethodKind,
        function: &Function,
        function_kind: FunctionKind,
    ) -> Text {
        let mut parts = Aggregate::new();
        let key = parts.take(self.emit_property_key(key));
        let callable = self.emit_callable(function_kind, &function.params, &function.body);
        let accessor = match kind {
            MethodKind::Method => "",
            MethodKind::Get => "get ",
            MethodKind::Set => "set ",
        };
        let output = format!(
            "{}{}{}{}{}{}({}){} {}",
            if is_static { "static " } else { "" },
            callable.async_prefix(),
            accessor,
            callable.star(),
            key,
            self.type_parameters(&function.type_params),
            callable.params,
            self.annotation(function.return_type.as_ref()),
            callable.body
        );
        let output = parts.take(callable.finish(output));
        parts.finish(output)
    }

    /// Parameters and body of any function-like construct
    fn emit_callable(&mut self, kind: FunctionKind, params: &[Parameter], body: &FunctionBody) -> Callable {
        let receivers = self.receivers.len();
        if let Some(receiver) = kind.receiver() {
            self.receivers.push(receiver);
        }
        let derived = self.in_derived_constructor;
        self.in_derived_constructor = kind.derived_constructor(derived);

        let mut signature = Aggregate::new();
        let mut declared = Vec::new();
        let mut texts = Vec::new();
        for param in params {
            declared.extend(param.pattern.bound_names());
            texts.push(signature.take(self.emit_parameter(param)));
        }
        let prologue = prologue(kind);

        let callable = match body {
            FunctionBody::Block(block) => {
                let (mut contents, statements) = self.emit_statements(&block.body);
                contents.take(signature.finish(()));
                let mut lines = prologue;
                lines.extend(statements);
                self.callable_block(texts, contents, lines, declared)
            }
            FunctionBody::Expression(expression) => {
                let value = self.emit_operand(expression, ASSIGNMENT);
                let concise = kind == FunctionKind::Arrow
                    && !value.is_generator
                    && value.scoped_variables.is_empty()
                    && value.scopes.is_empty()
                    && signature.scoped_variables.is_empty()
                    && signature.scopes.is_empty();
                if concise {
                    Callable {
                        params: texts.join(", "),
                        body: value.output,
                        concise: true,
                        is_async: value.is_async,
                        is_generator: false,
                        scopes: Vec::new(),
                    }
                } else {
                    let mut contents = Aggregate::new();
                    let value = contents.take(value);
                    contents.take(signature.finish(()));
                    let mut lines = prologue;
                    lines.push(format!("return {};", value));
                    self.callable_block(texts, contents, lines, declared)
                }
            }
        };

        self.in_derived_constructor = derived;
        self.receivers.truncate(receivers);
        callable
    }

    fn callable_block(
        &mut self,
        params: Vec<String>,
        contents: Aggregate,
        lines: Vec<String>,
        declared: Vec<String>,
    ) -> Callable {
        let block = self.wrap_block(contents, lines, declared);
        Callable {
            params: params.join(", "),
            body: block.output,
            concise: false,
            is_async: block.is_async,
            is_generator: block.is_generator,
            scopes: block.scopes,
        }
    }

    fn emit_parameter(&mut self, param: &Parameter) -> Text {
        let annotation = self.annotation(param.annotation.as_ref());
        match &param.pattern {
            Pattern::Default { target, default } if !annotation.is_empty() => {
                let mut parts = Aggregate::new();
                let target = parts.take(self.emit_pattern(target));
                let default = parts.take(self.emit_operand(default, ASSIGNMENT));
                parts.finish(format!("{}{} = {}", target, annotation, default))
            }
            pattern => self
                .emit_pattern(pattern)
                .map(|text| format!("{}{}", text, annotation)),
        }
    }

    // ---- classes ----

    pub(crate) fn emit_class(&mut self, class: &Class) -> Text {
        let mut parts = Aggregate::new();
        let mut head = String::from("class");
        if let Some(name) = &class.name {
            head.push(' ');
            head.push_str(name);
        }
        head.push_str(&self.type_parameters(&class.type_params));
        if let Some(super_class) = &class.super_class {
            head.push_str(" extends ");
            head.push_str(&parts.take(self.emit_operand(super_class, super::expressions::CALL)));
        }

        let derived = class.super_class.is_some();
        let members: Vec<String> = class
            .members
            .iter()
            .map(|member| parts.take(self.emit_class_member(member, derived)))
            .collect();

        let body = if members.is_empty() {
            "{}".to_string()
        } else {
            format!("{{\n{}\n}}", super::indent(&members.join("\n")))
        };
        parts.finish(format!("{} {}", head, body))
    }

    fn emit_class_member(&mut self, member: &ClassMember, derived: bool) -> Text {
        match member {
            ClassMember::Constructor { params, body } => {
                let callable = self.emit_callable(FunctionKind::Constructor { derived }, params, body);
                let output = format!("constructor({}) {}", callable.params, callable.body);
                callable.finish(output)
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
                self.emit_method(key, *is_static, *kind, function, function_kind)
            }
            ClassMember::Field {
                key,
                is_static,
                annotation,
                value,
            } => {
                let mut parts = Aggregate::new();
                let key = parts.take(self.emit_property_key(key));
                let mut output = format!(
                    "{}{}{}",
                    if *is_static { "static " } else { "" },
                    key,
                    self.annotation(annotation.as_ref())
                );
                if let Some(value) = value {
                    let value = self.with_receiver(Receiver::This, |emitter| {
                        emitter.emit_operand(value, ASSIGNMENT)
                    });
                    output.push_str(" = ");
                    output.push_str(&parts.take(value));
                }
                output.push(';');
                parts.finish(output)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::text::TextEmitter;
    use core_types::CompileOptions;

    fn body_with(source: &str, options: &CompileOptions) -> String {
        let program = parser::parse(source).unwrap();
        let output = TextEmitter::new(options).emit_program(&program).unwrap();
        output.strip_prefix("\"use strict\";\n").unwrap().to_string()
    }

    fn body(source: &str) -> String {
        body_with(source, &CompileOptions::default())
    }

    #[test]
    fn test_function_declaration_with_hoisting() {
        assert_eq!(
            body("fn total(items)\n  sum = 0\n  for item of items\n    sum += item\n  return sum"),
            "function total(items) {\n  let sum;\n  sum = 0;\n  for (let item of items) {\n    sum += item;\n  }\n  return sum;\n}\n"
        );
    }

    #[test]
    fn test_expression_body_function() {
        assert_eq!(body("fn double(x) => x * 2"), "function double(x) {\n  return x * 2;\n}\n");
    }

    #[test]
    fn test_concise_arrow() {
        assert_eq!(body("f = (a, b) => a + b"), "let f;\nf = (a, b) => a + b;\n");
        assert_eq!(body("f = () => {a: 1}"), "let f;\nf = () => ({ a: 1 });\n");
    }

    #[test]
    fn test_async_and_generator_inference() {
        assert_eq!(
            body("fn load(url) => await fetch(url)"),
            "async function load(url) {\n  return await fetch(url);\n}\n"
        );
        assert_eq!(
            body("fn count()\n  yield 1\n  yield 2"),
            "function* count() {\n  yield 1;\n  yield 2;\n}\n"
        );
        assert_eq!(
            body("f = () => await go()"),
            "let f;\nf = async () => await go();\n"
        );
    }

    #[test]
    fn test_yielding_arrow_becomes_generator_function() {
        assert_eq!(
            body("f = () =>\n  yield 1"),
            "let f;\nf = function* () {\n  yield 1;\n};\n"
        );
    }

    #[test]
    fn test_parameter_defaults_rest_and_destructuring() {
        assert_eq!(
            body("fn f(a = 1, {b, c}, ...rest) => a"),
            "function f(a = 1, { b, c }, ...rest) {\n  return a;\n}\n"
        );
    }

    #[test]
    fn test_class_with_members() {
        let source = "class Counter extends Base\n  count = 0\n  static zero = 0\n  constructor(start)\n    super(start)\n    @count = start\n  get value() => @count\n  increment()\n    @count += 1";
        assert_eq!(
            body(source),
            "class Counter extends Base {\n  count = 0;\n  static zero = 0;\n  constructor(start) {\n    let $self;\n    ($self = super(start));\n    $self.count = start;\n  }\n  get value() {\n    let $self = this;\n    return $self.count;\n  }\n  increment() {\n    let $self = this;\n    $self.count += 1;\n  }\n}\n"
        );
    }

    #[test]
    fn test_static_method_self_object() {
        assert_eq!(
            body("class Registry\n  static create() => new @constructor()"),
            "class Registry {\n  static create() {\n    const $class = this;\n    let $self = { get constructor() { return $class; } };\n    return new $self.constructor();\n  }\n}\n"
        );
    }

    #[test]
    fn test_field_initializer_uses_this() {
        assert_eq!(
            body("class Box\n  size = @defaultSize"),
            "class Box {\n  size = this.defaultSize;\n}\n"
        );
    }

    #[test]
    fn test_object_method_keeps_this() {
        assert_eq!(
            body("point = {x: 1, norm() => @x}"),
            "let point;\npoint = { x: 1, norm() {\n  return this.x;\n} };\n"
        );
    }

    #[test]
    fn test_annotations_when_enabled() {
        let options = CompileOptions::default().with_type_annotations(true);
        assert_eq!(
            body_with("fn id<T>(value: T, fallback: T = value): T => value", &options),
            "function id<T>(value: T, fallback: T = value): T {\n  return value;\n}\n"
        );
    }
}
