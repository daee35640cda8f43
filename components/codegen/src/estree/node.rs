//! ESTree node definitions
//!
//! Nodes serialize to the JSON shape used by ESTree tooling (`type` tag,
//! camelCase fields). Block bodies carry a shared [`HoistSlot`] that is
//! filled after scope resolution and serialized as a leading `let`
//! declaration.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Names hoisted into a block, filled in after resolution
pub type HoistSlot = Rc<RefCell<Vec<String>>>;

/// Statement list of a program or block
#[derive(Debug, Clone, Default)]
pub struct BlockBody {
    /// Directive prologue (`"use strict"`)
    pub directives: Vec<Node>,
    /// Implicitly declared names of this block
    pub hoisted: HoistSlot,
    /// Statements in order
    pub statements: Vec<Node>,
}

impl BlockBody {
    /// Body without a registered scope
    pub fn new(statements: Vec<Node>) -> Self {
        Self {
            statements,
            ..Self::default()
        }
    }

    /// Statements as serialized: directives, hoisted `let`, then the rest
    pub fn nodes(&self) -> Vec<Node> {
        let mut nodes = self.directives.clone();
        let hoisted = self.hoisted.borrow();
        if !hoisted.is_empty() {
            nodes.push(Node::hoisted_declaration(&hoisted));
        }
        nodes.extend(self.statements.iter().cloned());
        nodes
    }
}

impl Serialize for BlockBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes = self.nodes();
        let mut seq = serializer.serialize_seq(Some(nodes.len()))?;
        for node in &nodes {
            seq.serialize_element(node)?;
        }
        seq.end()
    }
}

/// `regex` member of a regular expression literal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegexLiteral {
    /// Pattern text
    pub pattern: String,
    /// Flags
    pub flags: String,
}

/// `value` member of a template element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateValue {
    /// Text as written
    pub raw: String,
    /// Text with escapes resolved
    pub cooked: String,
}

/// ESTree node
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Node {
    Program {
        #[serde(rename = "sourceType")]
        source_type: &'static str,
        body: BlockBody,
    },

    // ---- statements ----
    ExpressionStatement {
        expression: Box<Node>,
        #[serde(skip_serializing_if = "Option::is_none")]
        directive: Option<String>,
    },
    BlockStatement {
        body: BlockBody,
    },
    VariableDeclaration {
        kind: &'static str,
        declarations: Vec<Node>,
    },
    VariableDeclarator {
        id: Box<Node>,
        init: Option<Box<Node>>,
    },
    FunctionDeclaration {
        id: Option<Box<Node>>,
        params: Vec<Node>,
        body: Box<Node>,
        #[serde(rename = "async")]
        is_async: bool,
        generator: bool,
    },
    ClassDeclaration {
        id: Option<Box<Node>>,
        #[serde(rename = "superClass")]
        super_class: Option<Box<Node>>,
        body: Box<Node>,
    },
    ClassBody {
        body: Vec<Node>,
    },
    MethodDefinition {
        key: Box<Node>,
        value: Box<Node>,
        kind: &'static str,
        computed: bool,
        #[serde(rename = "static")]
        is_static: bool,
    },
    PropertyDefinition {
        key: Box<Node>,
        value: Option<Box<Node>>,
        computed: bool,
        #[serde(rename = "static")]
        is_static: bool,
    },
    IfStatement {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    WhileStatement {
        test: Box<Node>,
        body: Box<Node>,
    },
    DoWhileStatement {
        body: Box<Node>,
        test: Box<Node>,
    },
    ForStatement {
        init: Option<Box<Node>>,
        test: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    ForOfStatement {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
        #[serde(rename = "await")]
        is_await: bool,
    },
    ForInStatement {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
    },
    SwitchStatement {
        discriminant: Box<Node>,
        cases: Vec<Node>,
    },
    SwitchCase {
        test: Option<Box<Node>>,
        consequent: Vec<Node>,
    },
    TryStatement {
        block: Box<Node>,
        handler: Option<Box<Node>>,
        finalizer: Option<Box<Node>>,
    },
    CatchClause {
        param: Option<Box<Node>>,
        body: Box<Node>,
    },
    ReturnStatement {
        argument: Option<Box<Node>>,
    },
    ThrowStatement {
        argument: Box<Node>,
    },
    BreakStatement {
        label: Option<Box<Node>>,
    },
    ContinueStatement {
        label: Option<Box<Node>>,
    },
    DebuggerStatement,

    // ---- modules ----
    ImportDeclaration {
        specifiers: Vec<Node>,
        source: Box<Node>,
    },
    ImportSpecifier {
        imported: Box<Node>,
        local: Box<Node>,
    },
    ImportDefaultSpecifier {
        local: Box<Node>,
    },
    ImportNamespaceSpecifier {
        local: Box<Node>,
    },
    ExportNamedDeclaration {
        declaration: Option<Box<Node>>,
        specifiers: Vec<Node>,
        source: Option<Box<Node>>,
    },
    ExportSpecifier {
        local: Box<Node>,
        exported: Box<Node>,
    },
    ExportDefaultDeclaration {
        declaration: Box<Node>,
    },
    ExportAllDeclaration {
        source: Box<Node>,
        exported: Option<Box<Node>>,
    },

    // ---- expressions ----
    Identifier {
        name: String,
    },
    Literal {
        value: Value,
        raw: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        regex: Option<RegexLiteral>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bigint: Option<String>,
    },
    TemplateLiteral {
        quasis: Vec<Node>,
        expressions: Vec<Node>,
    },
    TemplateElement {
        value: TemplateValue,
        tail: bool,
    },
    ThisExpression,
    Super,
    ArrayExpression {
        elements: Vec<Node>,
    },
    ObjectExpression {
        properties: Vec<Node>,
    },
    Property {
        key: Box<Node>,
        value: Box<Node>,
        kind: &'static str,
        method: bool,
        shorthand: bool,
        computed: bool,
    },
    SpreadElement {
        argument: Box<Node>,
    },
    FunctionExpression {
        id: Option<Box<Node>>,
        params: Vec<Node>,
        body: Box<Node>,
        #[serde(rename = "async")]
        is_async: bool,
        generator: bool,
    },
    ArrowFunctionExpression {
        params: Vec<Node>,
        body: Box<Node>,
        #[serde(rename = "async")]
        is_async: bool,
        expression: bool,
    },
    ClassExpression {
        id: Option<Box<Node>>,
        #[serde(rename = "superClass")]
        super_class: Option<Box<Node>>,
        body: Box<Node>,
    },
    UnaryExpression {
        operator: &'static str,
        prefix: bool,
        argument: Box<Node>,
    },
    UpdateExpression {
        operator: &'static str,
        prefix: bool,
        argument: Box<Node>,
    },
    BinaryExpression {
        operator: &'static str,
        left: Box<Node>,
        right: Box<Node>,
    },
    LogicalExpression {
        operator: &'static str,
        left: Box<Node>,
        right: Box<Node>,
    },
    ConditionalExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    AssignmentExpression {
        operator: &'static str,
        left: Box<Node>,
        right: Box<Node>,
    },
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        computed: bool,
        optional: bool,
    },
    CallExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
        optional: bool,
    },
    NewExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    AwaitExpression {
        argument: Box<Node>,
    },
    YieldExpression {
        argument: Option<Box<Node>>,
        delegate: bool,
    },

    // ---- patterns ----
    ArrayPattern {
        elements: Vec<Node>,
    },
    ObjectPattern {
        properties: Vec<Node>,
    },
    AssignmentPattern {
        left: Box<Node>,
        right: Box<Node>,
    },
    RestElement {
        argument: Box<Node>,
    },

    // ---- JSX ----
    #[serde(rename = "JSXElement")]
    JsxElement {
        #[serde(rename = "openingElement")]
        opening_element: Box<Node>,
        #[serde(rename = "closingElement")]
        closing_element: Option<Box<Node>>,
        children: Vec<Node>,
    },
    #[serde(rename = "JSXFragment")]
    JsxFragment {
        #[serde(rename = "openingFragment")]
        opening_fragment: Box<Node>,
        #[serde(rename = "closingFragment")]
        closing_fragment: Box<Node>,
        children: Vec<Node>,
    },
    #[serde(rename = "JSXOpeningElement")]
    JsxOpeningElement {
        name: Box<Node>,
        attributes: Vec<Node>,
        #[serde(rename = "selfClosing")]
        self_closing: bool,
    },
    #[serde(rename = "JSXClosingElement")]
    JsxClosingElement {
        name: Box<Node>,
    },
    #[serde(rename = "JSXOpeningFragment")]
    JsxOpeningFragment,
    #[serde(rename = "JSXClosingFragment")]
    JsxClosingFragment,
    #[serde(rename = "JSXAttribute")]
    JsxAttribute {
        name: Box<Node>,
        value: Option<Box<Node>>,
    },
    #[serde(rename = "JSXSpreadAttribute")]
    JsxSpreadAttribute {
        argument: Box<Node>,
    },
    #[serde(rename = "JSXIdentifier")]
    JsxIdentifier {
        name: String,
    },
    #[serde(rename = "JSXMemberExpression")]
    JsxMemberExpression {
        object: Box<Node>,
        property: Box<Node>,
    },
    #[serde(rename = "JSXExpressionContainer")]
    JsxExpressionContainer {
        expression: Box<Node>,
    },
    #[serde(rename = "JSXText")]
    JsxText {
        value: String,
        raw: String,
    },
}

impl Node {
    pub(crate) fn identifier(name: impl Into<String>) -> Node {
        Node::Identifier { name: name.into() }
    }

    pub(crate) fn string(value: &str) -> Node {
        Node::Literal {
            value: Value::String(value.to_string()),
            raw: crate::lowering::quote_text(value),
            regex: None,
            bigint: None,
        }
    }

    pub(crate) fn number(value: f64, raw: String) -> Node {
        Node::Literal {
            value: serde_json::Number::from_f64(value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            raw,
            regex: None,
            bigint: None,
        }
    }

    pub(crate) fn literal(value: Value, raw: &str) -> Node {
        Node::Literal {
            value,
            raw: raw.to_string(),
            regex: None,
            bigint: None,
        }
    }

    pub(crate) fn member(object: Node, name: &str) -> Node {
        Node::MemberExpression {
            object: Box::new(object),
            property: Box::new(Node::identifier(name)),
            computed: false,
            optional: false,
        }
    }

    pub(crate) fn call(callee: Node, arguments: Vec<Node>) -> Node {
        Node::CallExpression {
            callee: Box::new(callee),
            arguments,
            optional: false,
        }
    }

    pub(crate) fn assign(operator: &'static str, left: Node, right: Node) -> Node {
        Node::AssignmentExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub(crate) fn binary(operator: &'static str, left: Node, right: Node) -> Node {
        Node::BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub(crate) fn not(argument: Node) -> Node {
        Node::UnaryExpression {
            operator: "!",
            prefix: true,
            argument: Box::new(argument),
        }
    }

    pub(crate) fn statement(expression: Node) -> Node {
        Node::ExpressionStatement {
            expression: Box::new(expression),
            directive: None,
        }
    }

    pub(crate) fn declaration(kind: &'static str, id: Node, init: Option<Node>) -> Node {
        Node::VariableDeclaration {
            kind,
            declarations: vec![Node::VariableDeclarator {
                id: Box::new(id),
                init: init.map(Box::new),
            }],
        }
    }

    /// `let a, b;`
    pub(crate) fn hoisted_declaration(names: &[String]) -> Node {
        Node::VariableDeclaration {
            kind: "let",
            declarations: names
                .iter()
                .map(|name| Node::VariableDeclarator {
                    id: Box::new(Node::identifier(name.as_str())),
                    init: None,
                })
                .collect(),
        }
    }

    pub(crate) fn block(statements: Vec<Node>) -> Node {
        Node::BlockStatement {
            body: BlockBody::new(statements),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hoist_slot_serializes_as_leading_let() {
        let body = BlockBody::new(vec![Node::statement(Node::identifier("x"))]);
        body.hoisted.borrow_mut().extend(["a".to_string(), "b".to_string()]);
        let value = serde_json::to_value(Node::BlockStatement { body }).unwrap();
        assert_eq!(value["body"][0]["type"], "VariableDeclaration");
        assert_eq!(value["body"][0]["declarations"][1]["id"]["name"], "b");
        assert_eq!(value["body"][1]["expression"]["name"], "x");
    }

    #[test]
    fn test_empty_slot_adds_nothing() {
        let value = serde_json::to_value(Node::block(vec![])).unwrap();
        assert_eq!(value, json!({"type": "BlockStatement", "body": []}));
    }

    #[test]
    fn test_keyword_fields_are_renamed() {
        let node = Node::FunctionDeclaration {
            id: None,
            params: vec![],
            body: Box::new(Node::block(vec![])),
            is_async: true,
            generator: false,
        };
        let value = serde_json::to_value(node).unwrap();
        assert_eq!(value["async"], true);
        assert_eq!(value["type"], "FunctionDeclaration");
    }

    #[test]
    fn test_jsx_names() {
        let value = serde_json::to_value(Node::JsxIdentifier { name: "div".into() }).unwrap();
        assert_eq!(value["type"], "JSXIdentifier");
    }
}
