//! Import and export statements for ES modules and CommonJS

use super::{AstEmitter, Node, Nodes};
use crate::decorated::{Aggregate, Decorated};
use core_types::ModuleKind;
use parser::cst::{ExportDeclaration, ImportDeclaration, ModuleSpecifier, Statement};

fn require(source: &str) -> Node {
    Node::call(Node::identifier("require"), vec![Node::string(source)])
}

fn exports_member(name: &str) -> Node {
    Node::member(Node::identifier("exports"), name)
}

/// `exports.name = value;`
fn export_assignment(name: &str, value: Node) -> Node {
    Node::statement(Node::assign("=", exports_member(name), value))
}

fn esm_import(import: &ImportDeclaration) -> Node {
    let mut specifiers = Vec::new();
    if let Some(default) = &import.default {
        specifiers.push(Node::ImportDefaultSpecifier {
            local: Box::new(Node::identifier(default.as_str())),
        });
    }
    if let Some(namespace) = &import.namespace {
        specifiers.push(Node::ImportNamespaceSpecifier {
            local: Box::new(Node::identifier(namespace.as_str())),
        });
    }
    specifiers.extend(import.named.iter().map(|specifier| Node::ImportSpecifier {
        imported: Box::new(Node::identifier(specifier.name.as_str())),
        local: Box::new(Node::identifier(specifier.local_name())),
    }));
    Node::ImportDeclaration {
        specifiers,
        source: Box::new(Node::string(&import.source)),
    }
}

fn commonjs_import(import: &ImportDeclaration) -> Vec<Node> {
    let mut nodes = Vec::new();
    if let Some(default) = &import.default {
        nodes.push(Node::declaration(
            "const",
            Node::identifier(default.as_str()),
            Some(Node::member(require(&import.source), "default")),
        ));
    }
    if let Some(namespace) = &import.namespace {
        nodes.push(Node::declaration(
            "const",
            Node::identifier(namespace.as_str()),
            Some(require(&import.source)),
        ));
    }
    if !import.named.is_empty() {
        let properties = import.named.iter().map(destructured).collect();
        nodes.push(Node::declaration(
            "const",
            Node::ObjectPattern { properties },
            Some(require(&import.source)),
        ));
    }
    if nodes.is_empty() {
        nodes.push(Node::statement(require(&import.source)));
    }
    nodes
}

/// `{ name: alias }` pattern property
fn destructured(specifier: &ModuleSpecifier) -> Node {
    Node::Property {
        key: Box::new(Node::identifier(specifier.name.as_str())),
        value: Box::new(Node::identifier(specifier.local_name())),
        kind: "init",
        method: false,
        shorthand: specifier.alias.is_none(),
        computed: false,
    }
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

impl<'a> AstEmitter<'a> {
    pub(crate) fn emit_import(&mut self, import: &ImportDeclaration) -> Nodes {
        Decorated::leaf(match self.options.module_kind {
            ModuleKind::EsModule => vec![esm_import(import)],
            ModuleKind::CommonJs => commonjs_import(import),
        })
    }

    pub(crate) fn emit_export(&mut self, export: &ExportDeclaration) -> Nodes {
        let commonjs = self.options.module_kind == ModuleKind::CommonJs;
        match export {
            ExportDeclaration::Declaration(statement) => {
                let nodes = self.emit_statement(statement);
                if nodes.output.is_empty() {
                    return nodes;
                }
                if commonjs {
                    let names = exported_names(statement);
                    return nodes.map(|mut nodes| {
                        nodes.extend(
                            names
                                .iter()
                                .map(|name| export_assignment(name, Node::identifier(name.as_str()))),
                        );
                        nodes
                    });
                }
                nodes.map(|nodes| {
                    nodes
                        .into_iter()
                        .map(|declaration| Node::ExportNamedDeclaration {
                            declaration: Some(Box::new(declaration)),
                            specifiers: Vec::new(),
                            source: None,
                        })
                        .collect()
                })
            }
            ExportDeclaration::Default(expression) => {
                let mut parts = Aggregate::new();
                let value = parts.take(self.emit_expression(expression));
                parts.finish(vec![if commonjs {
                    export_assignment("default", value)
                } else {
                    Node::ExportDefaultDeclaration {
                        declaration: Box::new(value),
                    }
                }])
            }
            ExportDeclaration::Named { specifiers, source } => {
                let nodes = if commonjs {
                    specifiers
                        .iter()
                        .map(|specifier| {
                            let value = match source {
                                Some(source) => Node::member(require(source), &specifier.name),
                                None => Node::identifier(specifier.name.as_str()),
                            };
                            export_assignment(specifier.local_name(), value)
                        })
                        .collect()
                } else {
                    vec![Node::ExportNamedDeclaration {
                        declaration: None,
                        specifiers: specifiers
                            .iter()
                            .map(|specifier| Node::ExportSpecifier {
                                local: Box::new(Node::identifier(specifier.name.as_str())),
                                exported: Box::new(Node::identifier(specifier.local_name())),
                            })
                            .collect(),
                        source: source.as_deref().map(|source| Box::new(Node::string(source))),
                    }]
                };
                Decorated::leaf(nodes)
            }
            ExportDeclaration::All { source } => Decorated::leaf(vec![if commonjs {
                Node::statement(Node::call(
                    Node::member(Node::identifier("Object"), "assign"),
                    vec![Node::identifier("exports"), require(source)],
                ))
            } else {
                Node::ExportAllDeclaration {
                    source: Box::new(Node::string(source)),
                    exported: None,
                }
            }]),
        }
    }
}
