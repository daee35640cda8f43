//! Import and export statements for ES modules and CommonJS

use super::expressions::ASSIGNMENT;
use super::{Text, TextEmitter};
use crate::decorated::{Aggregate, Decorated};
use crate::lowering::quote_text;
use core_types::ModuleKind;
use parser::cst::{ExportDeclaration, ImportDeclaration, ModuleSpecifier, Statement};

impl<'a> TextEmitter<'a> {
    pub(crate) fn emit_import(&mut self, import: &ImportDeclaration) -> Text {
        let source = quote_text(&import.source);
        let output = match self.options.module_kind {
            ModuleKind::EsModule => esm_import(import, &source),
            ModuleKind::CommonJs => commonjs_import(import, &source),
        };
        Decorated::leaf(output)
    }

    pub(crate) fn emit_export(&mut self, export: &ExportDeclaration) -> Text {
        let commonjs = self.options.module_kind == ModuleKind::CommonJs;
        match export {
            ExportDeclaration::Declaration(statement) => {
                let text = self.emit_statement(statement);
                if text.output.is_empty() {
                    return text;
                }
                if !commonjs {
                    return text.map(|output| format!("export {}", output));
                }
                let names = exported_names(statement);
                text.map(|output| {
                    let mut lines = vec![output];
                    lines.extend(names.iter().map(|name| format!("exports.{n} = {n};", n = name)));
                    lines.join("\n")
                })
            }
            ExportDeclaration::Default(expression) => {
                let mut parts = Aggregate::new();
                let value = parts.take(self.emit_operand(expression, ASSIGNMENT));
                if commonjs {
                    parts.finish(format!("exports.default = {};", value))
                } else {
                    parts.finish(format!("export default {};", value))
                }
            }
            ExportDeclaration::Named { specifiers, source } => {
                let output = if commonjs {
                    specifiers
                        .iter()
                        .map(|specifier| {
                            let value = match source {
                                Some(source) => {
                                    format!("require({}).{}", quote_text(source), specifier.name)
                                }
                                None => specifier.name.clone(),
                            };
                            format!("exports.{} = {};", specifier.local_name(), value)
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                } else {
                    let from = source
                        .as_ref()
                        .map(|source| format!(" from {}", quote_text(source)))
                        .unwrap_or_default();
                    format!("export {}{};", specifier_list(specifiers, " as "), from)
                };
                Decorated::leaf(output)
            }
            ExportDeclaration::All { source } => Decorated::leaf(if commonjs {
                format!("Object.assign(exports, require({}));", quote_text(source))
            } else {
                format!("export * from {};", quote_text(source))
            }),
        }
    }
}

fn esm_import(import: &ImportDeclaration, source: &str) -> String {
    let mut bindings = Vec::new();
    if let Some(default) = &import.default {
        bindings.push(default.clone());
    }
    if let Some(namespace) = &import.namespace {
        bindings.push(format!("* as {}", namespace));
    }
    if !import.named.is_empty() {
        bindings.push(specifier_list(&import.named, " as "));
    }
    if bindings.is_empty() {
        format!("import {};", source)
    } else {
        format!("import {} from {};", bindings.join(", "), source)
    }
}

fn commonjs_import(import: &ImportDeclaration, source: &str) -> String {
    let mut lines = Vec::new();
    if let Some(default) = &import.default {
        lines.push(format!("const {} = require({}).default;", default, source));
    }
    if let Some(namespace) = &import.namespace {
        lines.push(format!("const {} = require({});", namespace, source));
    }
    if !import.named.is_empty() {
        lines.push(format!(
            "const {} = require({});",
            specifier_list(&import.named, ": "),
            source
        ));
    }
    if lines.is_empty() {
        lines.push(format!("require({});", source));
    }
    lines.join("\n")
}

/// `{ a, b as c }` for modules, `{ a, b: c }` for destructuring
fn specifier_list(specifiers: &[ModuleSpecifier], rename: &str) -> String {
    let names: Vec<String> = specifiers
        .iter()
        .map(|specifier| match &specifier.alias {
            Some(alias) => format!("{}{}{}", specifier.name, rename, alias),
            None => specifier.name.clone(),
        })
        .collect();
    format!("{{ {} }}", names.join(", "))
}

/// Names bound by an exported declaration
fn exported_names(statement: &Statement) -> Vec<String> {
    match statement {
        Statement::VariableDeclaration { declarations, .. } => declarations
            .iter()
            .flat_map(|declarator| declarator.pattern.bound_names())
            .collect(),
        Statement::FunctionDeclaration { function, .. } => function.name.iter().cloned().collect(),
        Statement::ClassDeclaration { class, .. } => class.name.iter().cloned().collect(),
        Statement::EnumDeclaration { name, .. } => vec![name.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use crate::text::TextEmitter;
    use core_types::{CompileOptions, ModuleKind};

    fn body_with(source: &str, options: &CompileOptions) -> String {
        let program = parser::parse(source).unwrap();
        let output = TextEmitter::new(options).emit_program(&program).unwrap();
        output.strip_prefix("\"use strict\";\n").unwrap().to_string()
    }

    fn commonjs() -> CompileOptions {
        CompileOptions::default().with_module_kind(ModuleKind::CommonJs)
    }

    #[test]
    fn test_esm_imports() {
        assert_eq!(
            body_with(
                "import React, {useState as state} from \"react\"\nimport * as fs from 'fs'\nimport \"polyfill\"",
                &CompileOptions::default()
            ),
            "import React, { useState as state } from \"react\";\nimport * as fs from \"fs\";\nimport \"polyfill\";\n"
        );
    }

    #[test]
    fn test_esm_exports() {
        assert_eq!(
            body_with(
                "export const answer = 42\nexport default answer\nexport {a, b as c} from \"m\"\nexport * from \"n\"",
                &CompileOptions::default()
            ),
            "export const answer = 42;\nexport default answer;\nexport { a, b as c } from \"m\";\nexport * from \"n\";\n"
        );
    }

    #[test]
    fn test_commonjs_imports() {
        assert_eq!(
            body_with("import x, {a, b as c} from \"m\"\nimport \"side\"", &commonjs()),
            "const x = require(\"m\").default;\nconst { a, b: c } = require(\"m\");\nrequire(\"side\");\n"
        );
    }

    #[test]
    fn test_commonjs_exports() {
        assert_eq!(
            body_with("export fn greet() => 1\nexport default greet\nexport * from \"m\"", &commonjs()),
            "function greet() {\n  return 1;\n}\nexports.greet = greet;\nexports.default = greet;\nObject.assign(exports, require(\"m\"));\n"
        );
    }

    #[test]
    fn test_commonjs_skips_async_marker() {
        let program = parser::parse("data = await load()").unwrap();
        let output = TextEmitter::new(&commonjs()).emit_program(&program).unwrap();
        assert!(!output.contains("export {}"));
    }
}
