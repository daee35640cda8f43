//! Statement handlers

use super::expressions::{POSTFIX, SHIFT};
use super::{Text, TextEmitter};
use crate::decorated::{Aggregate, Decorated};
use crate::grow_stack;
use crate::lowering::{default_range_bound, format_number, range_comparison, EnumCounter};
use core_types::TargetVersion;
use parser::cst::*;

impl<'a> TextEmitter<'a> {
    pub(crate) fn emit_statement(&mut self, statement: &Statement) -> Text {
        grow_stack(|| self.emit_statement_kind(statement))
    }

    fn emit_statement_kind(&mut self, statement: &Statement) -> Text {
        match statement {
            Statement::VariableDeclaration {
                kind, declarations, ..
            } => self.emit_variable_declaration(*kind, declarations),

            Statement::FunctionDeclaration { function, .. } => {
                let name = function.name.clone().unwrap_or_default();
                self.emit_function_declaration(function).declaring(vec![name])
            }

            Statement::ClassDeclaration { class, .. } => {
                let name = class.name.clone().unwrap_or_default();
                self.emit_class(class).declaring(vec![name])
            }

            Statement::EnumDeclaration { name, members, .. } => self.emit_enum(name, members),

            Statement::TypeAlias {
                name,
                type_params,
                annotation,
                ..
            } => {
                if self.options.emit_type_annotations {
                    Decorated::leaf(format!(
                        "type {}{} = {};",
                        name,
                        self.type_parameters(type_params),
                        super::type_text(annotation)
                    ))
                } else {
                    Decorated::leaf(String::new())
                }
            }

            Statement::If {
                test,
                negated,
                consequent,
                alternate,
                ..
            } => self.emit_if(test, *negated, consequent, alternate.as_ref()),

            Statement::While {
                test, negated, body, ..
            } => {
                let mut parts = Aggregate::new();
                let test = parts.take(self.emit_condition(test, *negated));
                let body = parts.take(self.emit_block(body, Vec::new()));
                parts.finish(format!("while ({}) {}", test, body))
            }

            Statement::DoWhile {
                body, test, negated, ..
            } => {
                let mut parts = Aggregate::new();
                let body = parts.take(self.emit_block(body, Vec::new()));
                let test = parts.take(self.emit_condition(test, *negated));
                parts.finish(format!("do {} while ({});", body, test))
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
                let iterable = parts.take(self.emit_operand(iterable, 2));
                let body = parts.take(self.emit_block(body, pattern.bound_names()));
                let text = parts.finish(format!(
                    "for {}(let {} of {}) {}",
                    if *is_await { "await " } else { "" },
                    binding,
                    iterable,
                    body
                ));
                if *is_await {
                    text.asynchronous()
                } else {
                    text
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
                parts.finish(format!("for (let {} in {}) {}", binding, object, body))
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
                    Some(start) => parts.take(self.emit_operand(start, 2)),
                    None => "0".to_string(),
                };
                let bound = match bound {
                    Some(bound) => parts.take(self.emit_operand(bound, SHIFT)),
                    None => default_range_bound(*descending).to_string(),
                };
                let step = match step {
                    Some(step) => parts.take(self.emit_operand(step, 2)),
                    None => "1".to_string(),
                };
                let body = parts.take(self.emit_block(body, vec![binding.clone()]));
                parts.finish(format!(
                    "for (let {b} = {}; {b} {} {}; {b} {} {}) {}",
                    start,
                    range_comparison(*descending, *inclusive),
                    bound,
                    if *descending { "-=" } else { "+=" },
                    step,
                    body,
                    b = binding
                ))
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
                Some(argument) => self
                    .emit_expression(argument)
                    .map(|argument| format!("return {};", argument)),
                None => Decorated::leaf("return;".to_string()),
            },

            Statement::Throw { argument, .. } => self
                .emit_expression(argument)
                .map(|argument| format!("throw {};", argument)),

            Statement::Break { .. } => Decorated::leaf("break;".to_string()),
            Statement::Continue { .. } => Decorated::leaf("continue;".to_string()),
            Statement::Debugger { .. } => Decorated::leaf("debugger;".to_string()),
            Statement::Pass { .. } => Decorated::leaf(String::new()),

            Statement::Import { declaration, .. } => self
                .emit_import(declaration)
                .declaring(declaration.local_names()),

            Statement::Export { declaration, .. } => self.emit_export(declaration),

            Statement::Expression { expression, .. } => {
                self.emit_expression(expression).map(|output| {
                    if needs_statement_parens(&output) {
                        format!("({});", output)
                    } else {
                        format!("{};", output)
                    }
                })
            }
        }
    }

    fn emit_variable_declaration(
        &mut self,
        kind: DeclarationKind,
        declarations: &[VariableDeclarator],
    ) -> Text {
        let mut parts = Aggregate::new();
        let mut names = Vec::new();
        let mut declarators = Vec::new();
        for declarator in declarations {
            names.extend(declarator.pattern.bound_names());
            let mut text = parts.take(self.emit_pattern(&declarator.pattern));
            text.push_str(&self.annotation(declarator.annotation.as_ref()));
            if let Some(init) = &declarator.init {
                text.push_str(" = ");
                text.push_str(&parts.take(self.emit_operand(init, 2)));
            }
            declarators.push(text);
        }
        parts
            .finish(format!("{} {};", kind.as_str(), declarators.join(", ")))
            .declaring(names)
    }

    fn emit_enum(&mut self, name: &str, members: &[EnumMember]) -> Text {
        let mut parts = Aggregate::new();
        let mut counter = EnumCounter::new();
        let mut entries = Vec::new();
        for member in members {
            let value = match &member.value {
                Some(value) => {
                    counter.explicit(value);
                    parts.take(self.emit_operand(value, 2))
                }
                None => format_number(counter.implicit()),
            };
            entries.push(format!("{}: {}", member.name, value));
        }
        let body = if entries.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", entries.join(", "))
        };
        parts
            .finish(format!("const {} = Object.freeze({});", name, body))
            .declaring(vec![name.to_string()])
    }

    fn emit_if(
        &mut self,
        test: &Expression,
        negated: bool,
        consequent: &Block,
        alternate: Option<&ElseBranch>,
    ) -> Text {
        let mut parts = Aggregate::new();
        let test = parts.take(self.emit_condition(test, negated));
        let consequent = parts.take(self.emit_block(consequent, Vec::new()));
        let mut output = format!("if ({}) {}", test, consequent);
        match alternate {
            Some(ElseBranch::If(statement)) => {
                output.push_str(" else ");
                output.push_str(&parts.take(self.emit_statement(statement)));
            }
            Some(ElseBranch::Block(block)) => {
                output.push_str(" else ");
                output.push_str(&parts.take(self.emit_block(block, Vec::new())));
            }
            None => {}
        }
        parts.finish(output)
    }

    /// Loop or branch condition, negated for `unless` / `until`
    fn emit_condition(&mut self, test: &Expression, negated: bool) -> Text {
        if negated {
            self.emit_operand(test, POSTFIX).map(|test| format!("!{}", test))
        } else {
            self.emit_expression(test)
        }
    }

    fn emit_switch(&mut self, discriminant: &Expression, cases: &[SwitchCase]) -> Text {
        let mut parts = Aggregate::new();
        let discriminant = parts.take(self.emit_expression(discriminant));
        let mut clauses = Vec::new();
        for case in cases {
            let mut labels = Vec::new();
            if case.is_default() {
                labels.push("default:".to_string());
            }
            for test in &case.tests {
                labels.push(format!("case {}:", parts.take(self.emit_expression(test))));
            }

            let (body, mut lines) = self.emit_statements(&case.body.body);
            lines.push("break;".to_string());
            let block = parts.take(self.wrap_block(body, lines, Vec::new()));

            let last = labels.len() - 1;
            labels[last] = format!("{} {}", labels[last], block);
            clauses.push(labels.join("\n"));
        }
        let body = if clauses.is_empty() {
            "{}".to_string()
        } else {
            format!("{{\n{}\n}}", super::indent(&clauses.join("\n")))
        };
        parts.finish(format!("switch ({}) {}", discriminant, body))
    }

    fn emit_try(
        &mut self,
        block: &Block,
        handler: Option<&CatchClause>,
        finalizer: Option<&Block>,
    ) -> Text {
        let ignore_all = CatchClause::ignoring();
        let handler = match (handler, finalizer) {
            (None, None) => Some(&ignore_all),
            _ => handler,
        };
        let mut parts = Aggregate::new();
        let mut output = format!("try {}", parts.take(self.emit_block(block, Vec::new())));
        if let Some(handler) = handler {
            let declared = handler
                .param
                .as_ref()
                .map(Pattern::bound_names)
                .unwrap_or_default();
            let param = match &handler.param {
                Some(param) => Some(parts.take(self.emit_pattern(param))),
                None if self.options.target < TargetVersion::Es2020 => Some("$error".to_string()),
                None => None,
            };
            let body = parts.take(self.emit_block(&handler.body, declared));
            match param {
                Some(param) => output.push_str(&format!(" catch ({}) {}", param, body)),
                None => output.push_str(&format!(" catch {}", body)),
            }
        }
        if let Some(finalizer) = finalizer {
            output.push_str(" finally ");
            output.push_str(&parts.take(self.emit_block(finalizer, Vec::new())));
        }
        parts.finish(output)
    }

    /// `await pat = expr` runs its continuation in a new async task
    fn emit_await_thread(&mut self, pattern: &Pattern, argument: &Expression, body: &Block) -> Text {
        let mut parts = Aggregate::new();
        let argument = parts.take(self.emit_operand(argument, 2));

        let (mut inner, statements) = self.emit_statements(&body.body);
        let binding = inner.take(self.emit_pattern(pattern));
        let mut lines = vec![format!("let {} = await $thread;", binding)];
        lines.extend(statements);
        let block = self.wrap_block(inner, lines, pattern.bound_names());

        // the continuation is its own async function: only its scope escapes
        let mut text = parts.finish(format!("(async ($thread) => {})({});", block.output, argument));
        text.scopes.extend(block.scopes);
        text
    }
}

/// Expression statements that would otherwise parse as a block or declaration
fn needs_statement_parens(output: &str) -> bool {
    output.starts_with('{')
        || output.starts_with("function")
        || output.starts_with("class ")
        || output.starts_with("async function")
}
