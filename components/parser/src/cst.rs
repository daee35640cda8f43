//! Parse tree node definitions
//!
//! One variant per grammar production. The tree is produced once by the
//! [`Parser`](crate::Parser) and read by every downstream consumer (the text
//! emitter, the target-AST emitter and the tree dump) without modification.

use core_types::SourcePosition;

/// Complete program
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Top-level statements
    pub body: Vec<Statement>,
}

/// A statement list that introduces a lexical block
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Statements in the block
    pub body: Vec<Statement>,
    /// True for the single-statement shorthand (`then stmt`, `else stmt`)
    pub inline: bool,
}

/// Source language statements
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `let` / `const` declaration
    VariableDeclaration {
        /// Declaration kind
        kind: DeclarationKind,
        /// One or more declarators
        declarations: Vec<VariableDeclarator>,
        /// Source location
        position: SourcePosition,
    },

    /// `fn name(params) body`
    FunctionDeclaration {
        /// The function (always named)
        function: Function,
        /// Source location
        position: SourcePosition,
    },

    /// `class Name extends Base` with an indented member list
    ClassDeclaration {
        /// The class (always named)
        class: Class,
        /// Source location
        position: SourcePosition,
    },

    /// `enum Name` with members
    EnumDeclaration {
        /// Enum name
        name: String,
        /// Members in declaration order
        members: Vec<EnumMember>,
        /// Source location
        position: SourcePosition,
    },

    /// `type Name<T> = Type`
    TypeAlias {
        /// Alias name
        name: String,
        /// Type parameters
        type_params: Vec<TypeParameter>,
        /// Aliased type
        annotation: TypeAnnotation,
        /// Source location
        position: SourcePosition,
    },

    /// `if` / `unless`
    If {
        /// Condition
        test: Expression,
        /// True for `unless`
        negated: bool,
        /// Taken branch
        consequent: Block,
        /// `else` branch
        alternate: Option<ElseBranch>,
        /// Source location
        position: SourcePosition,
    },

    /// `while` / `until`
    While {
        /// Condition
        test: Expression,
        /// True for `until`
        negated: bool,
        /// Loop body
        body: Block,
        /// Source location
        position: SourcePosition,
    },

    /// `do body` followed by `while` / `until cond`
    DoWhile {
        /// Loop body
        body: Block,
        /// Condition
        test: Expression,
        /// True for `until`
        negated: bool,
        /// Source location
        position: SourcePosition,
    },

    /// `for pat of expr` and `for await pat of expr`
    ForOf {
        /// Loop binding
        pattern: Pattern,
        /// Iterable
        iterable: Expression,
        /// True for `for await`
        is_await: bool,
        /// Loop body
        body: Block,
        /// Source location
        position: SourcePosition,
    },

    /// `for pat in expr`
    ForIn {
        /// Loop binding
        pattern: Pattern,
        /// Object whose keys are iterated
        object: Expression,
        /// Loop body
        body: Block,
        /// Source location
        position: SourcePosition,
    },

    /// Counting loop `for i from a to b by s`
    ForRange {
        /// Counter name
        binding: String,
        /// Start value (defaults to 0)
        start: Option<Expression>,
        /// Bound (defaults to ±Infinity)
        bound: Option<Expression>,
        /// True for `downto` / `downthrough`
        descending: bool,
        /// True for `through` / `downthrough`
        inclusive: bool,
        /// Step (defaults to 1)
        step: Option<Expression>,
        /// Loop body
        body: Block,
        /// Source location
        position: SourcePosition,
    },

    /// `switch expr` with case clauses
    Switch {
        /// Discriminant
        discriminant: Expression,
        /// Clauses in source order
        cases: Vec<SwitchCase>,
        /// Source location
        position: SourcePosition,
    },

    /// `try` / `catch` / `finally`
    Try {
        /// Protected body
        block: Block,
        /// `catch` clause
        handler: Option<CatchClause>,
        /// `finally` body
        finalizer: Option<Block>,
        /// Source location
        position: SourcePosition,
    },

    /// `await pat = expr` with an indented continuation
    AwaitThread {
        /// Binding receiving the awaited value
        pattern: Pattern,
        /// Awaited expression
        argument: Expression,
        /// Continuation
        body: Block,
        /// Source location
        position: SourcePosition,
    },

    /// `return expr?`
    Return {
        /// Return value
        argument: Option<Expression>,
        /// Source location
        position: SourcePosition,
    },

    /// `throw expr`
    Throw {
        /// Exception to throw
        argument: Expression,
        /// Source location
        position: SourcePosition,
    },

    /// `break`
    Break {
        /// Source location
        position: SourcePosition,
    },

    /// `continue`
    Continue {
        /// Source location
        position: SourcePosition,
    },

    /// `debugger`
    Debugger {
        /// Source location
        position: SourcePosition,
    },

    /// `pass`
    Pass {
        /// Source location
        position: SourcePosition,
    },

    /// `import … from "m"`
    Import {
        /// Import clause
        declaration: ImportDeclaration,
        /// Source location
        position: SourcePosition,
    },

    /// `export …`
    Export {
        /// Export clause
        declaration: ExportDeclaration,
        /// Source location
        position: SourcePosition,
    },

    /// Expression statement
    Expression {
        /// The expression
        expression: Expression,
        /// Source location
        position: SourcePosition,
    },
}

impl Statement {
    /// Source location of the statement
    pub fn position(&self) -> SourcePosition {
        match self {
            Statement::VariableDeclaration { position, .. }
            | Statement::FunctionDeclaration { position, .. }
            | Statement::ClassDeclaration { position, .. }
            | Statement::EnumDeclaration { position, .. }
            | Statement::TypeAlias { position, .. }
            | Statement::If { position, .. }
            | Statement::While { position, .. }
            | Statement::DoWhile { position, .. }
            | Statement::ForOf { position, .. }
            | Statement::ForIn { position, .. }
            | Statement::ForRange { position, .. }
            | Statement::Switch { position, .. }
            | Statement::Try { position, .. }
            | Statement::AwaitThread { position, .. }
            | Statement::Return { position, .. }
            | Statement::Throw { position, .. }
            | Statement::Break { position }
            | Statement::Continue { position }
            | Statement::Debugger { position }
            | Statement::Pass { position }
            | Statement::Import { position, .. }
            | Statement::Export { position, .. }
            | Statement::Expression { position, .. } => *position,
        }
    }
}

/// `let` or `const`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// `let`
    Let,
    /// `const`
    Const,
}

impl DeclarationKind {
    /// Keyword text
    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Let => "let",
            DeclarationKind::Const => "const",
        }
    }
}

/// Single declarator in a `let`/`const` statement
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// Binding target
    pub pattern: Pattern,
    /// Optional type annotation
    pub annotation: Option<TypeAnnotation>,
    /// Initializer
    pub init: Option<Expression>,
}

/// The branch after `else`
#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    /// `else if …` / `else unless …`
    If(Box<Statement>),
    /// Plain `else`
    Block(Block),
}

/// `case a, b` or `default` clause
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// Case values; empty for `default`
    pub tests: Vec<Expression>,
    /// Clause body
    pub body: Block,
}

impl SwitchCase {
    /// True for the `default` clause
    pub fn is_default(&self) -> bool {
        self.tests.is_empty()
    }
}

/// `catch pat? body`
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// Exception binding
    pub param: Option<Pattern>,
    /// Handler body
    pub body: Block,
}

impl CatchClause {
    /// Empty handler without a binding, standing in for a bare `try`
    pub fn ignoring() -> Self {
        Self {
            param: None,
            body: Block {
                body: Vec::new(),
                inline: false,
            },
        }
    }
}

/// Enum member `Name (= expr)?`
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    /// Member name
    pub name: String,
    /// Explicit value
    pub value: Option<Expression>,
}

/// Function-like construct shared by declarations, expressions and methods
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Function name
    pub name: Option<String>,
    /// Type parameters
    pub type_params: Vec<TypeParameter>,
    /// Parameters
    pub params: Vec<Parameter>,
    /// Return type annotation
    pub return_type: Option<TypeAnnotation>,
    /// Body
    pub body: FunctionBody,
}

/// Function body: a block or an implicitly returned expression
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    /// Indented statement list
    Block(Block),
    /// `=> expr`
    Expression(Box<Expression>),
}

/// A single parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Binding pattern (may carry a default or be a rest element)
    pub pattern: Pattern,
    /// Type annotation
    pub annotation: Option<TypeAnnotation>,
}

/// Class shared by declarations and expressions
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    /// Class name
    pub name: Option<String>,
    /// Type parameters
    pub type_params: Vec<TypeParameter>,
    /// Superclass expression
    pub super_class: Option<Box<Expression>>,
    /// Members in source order
    pub members: Vec<ClassMember>,
}

/// Class body member
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// `constructor(params) body`
    Constructor {
        /// Parameters
        params: Vec<Parameter>,
        /// Body
        body: FunctionBody,
    },
    /// Method, getter or setter
    Method {
        /// Method key
        key: PropertyKey,
        /// `static` member
        is_static: bool,
        /// Plain method, getter or setter
        kind: MethodKind,
        /// Parameters and body
        function: Function,
    },
    /// Field with optional initializer
    Field {
        /// Field key
        key: PropertyKey,
        /// `static` member
        is_static: bool,
        /// Type annotation
        annotation: Option<TypeAnnotation>,
        /// Initializer
        value: Option<Expression>,
    },
}

/// Method flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Plain method
    Method,
    /// `get` accessor
    Get,
    /// `set` accessor
    Set,
}

/// Property key in classes, object literals and object patterns
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// `name`
    Identifier(String),
    /// `"name"`
    String(StringLiteral),
    /// `42`
    Number(String),
    /// `[expr]`
    Computed(Box<Expression>),
    /// `@@iterator`
    Symbol(String),
}

/// Import clause
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclaration {
    /// Default binding (`import x from`)
    pub default: Option<String>,
    /// Namespace binding (`import * as ns from`)
    pub namespace: Option<String>,
    /// Named bindings (`import {a, b as c} from`)
    pub named: Vec<ModuleSpecifier>,
    /// Module path without quotes
    pub source: String,
}

impl ImportDeclaration {
    /// Every local name this import binds
    pub fn local_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        names.extend(self.default.iter().cloned());
        names.extend(self.namespace.iter().cloned());
        names.extend(self.named.iter().map(|s| s.local_name().to_string()));
        names
    }
}

/// `name` or `name as alias` inside braces
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleSpecifier {
    /// Name in the module (or local name for exports)
    pub name: String,
    /// Alias after `as`
    pub alias: Option<String>,
}

impl ModuleSpecifier {
    /// The alias when present, otherwise the name
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Export clause
#[derive(Debug, Clone, PartialEq)]
pub enum ExportDeclaration {
    /// `export let/const/fn/class/enum/type …`
    Declaration(Box<Statement>),
    /// `export default expr`
    Default(Expression),
    /// `export {a, b as c} (from "m")?`
    Named {
        /// Exported names
        specifiers: Vec<ModuleSpecifier>,
        /// Re-export source
        source: Option<String>,
    },
    /// `export * from "m"`
    All {
        /// Re-export source
        source: String,
    },
}

/// Source language expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Identifier reference
    Identifier(String),
    /// Numeric literal
    Number(NumberLiteral),
    /// String literal, possibly interpolated
    String(StringLiteral),
    /// `/pattern/flags`
    Regex {
        /// Pattern text
        pattern: String,
        /// Flags
        flags: String,
    },
    /// `true` / `false`
    Boolean(bool),
    /// `null`
    Null,
    /// `undefined`
    Undefined,
    /// `this`
    This,
    /// `super`
    Super,
    /// `@`
    SelfRef,
    /// `@name`
    SelfMember(String),
    /// `@@name`
    WellKnownSymbol(String),
    /// `[a, b, ...c]`
    Array(Vec<Expression>),
    /// `[expr for pat of src if cond]`
    Comprehension {
        /// Produced element
        element: Box<Expression>,
        /// `for` clauses, outermost first
        clauses: Vec<ComprehensionClause>,
        /// `if` filters applied to the innermost clause
        conditions: Vec<Expression>,
    },
    /// `{a: 1, b, ...c}`
    Object(Vec<ObjectProperty>),
    /// `fn name? (params) body`
    Function(Box<Function>),
    /// `(params) => body`
    Arrow(Box<Function>),
    /// Class expression
    Class(Box<Class>),
    /// JSX element or fragment
    Jsx(Box<JsxElement>),
    /// Prefix unary operator
    Unary {
        /// Operator
        operator: UnaryOperator,
        /// Operand
        argument: Box<Expression>,
    },
    /// `++x`, `x--`
    Update {
        /// Operator
        operator: UpdateOperator,
        /// True for the prefix form
        prefix: bool,
        /// Operand
        argument: Box<Expression>,
    },
    /// Binary operator
    Binary {
        /// Operator
        operator: BinaryOperator,
        /// Left operand
        left: Box<Expression>,
        /// Right operand
        right: Box<Expression>,
    },
    /// `&&`, `||`, `??`
    Logical {
        /// Operator
        operator: LogicalOperator,
        /// Left operand
        left: Box<Expression>,
        /// Right operand
        right: Box<Expression>,
    },
    /// `a ? b : c`
    Conditional {
        /// Condition
        test: Box<Expression>,
        /// Value when true
        consequent: Box<Expression>,
        /// Value when false
        alternate: Box<Expression>,
    },
    /// Assignment
    Assignment {
        /// Operator
        operator: AssignmentOperator,
        /// Target
        target: Box<Pattern>,
        /// Assigned value
        value: Box<Expression>,
    },
    /// `a.b`, `a?.b`, `a[b]`, `a?.[b]`
    Member {
        /// Object
        object: Box<Expression>,
        /// Accessed property
        property: MemberProperty,
        /// Optional chaining
        optional: bool,
    },
    /// `f(args)`, `f?.(args)`
    Call {
        /// Callee
        callee: Box<Expression>,
        /// Arguments
        arguments: Vec<Expression>,
        /// Optional chaining
        optional: bool,
    },
    /// `new C(args)`
    New {
        /// Constructor
        callee: Box<Expression>,
        /// Arguments
        arguments: Vec<Expression>,
    },
    /// `...expr`
    Spread(Box<Expression>),
    /// `await expr`
    Await(Box<Expression>),
    /// `yield`, `yield expr`, `yield* expr`
    Yield {
        /// Yielded value
        argument: Option<Box<Expression>>,
        /// True for `yield*`
        delegate: bool,
    },
    /// `expr as Type`
    TypeAssertion {
        /// Asserted expression
        expression: Box<Expression>,
        /// Target type
        annotation: TypeAnnotation,
    },
    /// `(expr)`
    Parenthesized(Box<Expression>),
}

/// Numeric literal with optional unit suffix
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    /// Literal text without the unit (separators and radix prefix kept)
    pub raw: String,
    /// Unit suffix such as `ms` or `px`
    pub unit: Option<String>,
}

/// String literal with interpolation segments
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    /// Opening (and closing) delimiter
    pub quote: char,
    /// Text and interpolation segments in order
    pub parts: Vec<StringPart>,
    /// Source column of the opening delimiter; continuation lines lose up to
    /// this many leading whitespace characters
    pub indent_cutoff: u32,
}

impl StringLiteral {
    /// True when the literal has at least one interpolation
    pub fn is_interpolated(&self) -> bool {
        self.parts.iter().any(|p| matches!(p, StringPart::Interpolation(_)))
    }

    /// Raw text of an uninterpolated literal
    pub fn plain_text(&self) -> Option<String> {
        if self.is_interpolated() {
            return None;
        }
        Some(
            self.parts
                .iter()
                .map(|p| match p {
                    StringPart::Text(t) => t.as_str(),
                    StringPart::Interpolation(_) => "",
                })
                .collect(),
        )
    }
}

/// Segment of a string literal
#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    /// Raw text, escapes untouched
    Text(String),
    /// `#{expr}`
    Interpolation(Box<Expression>),
}

/// `for pat of|in src` clause in a comprehension
#[derive(Debug, Clone, PartialEq)]
pub struct ComprehensionClause {
    /// Binding
    pub pattern: Pattern,
    /// Source collection
    pub source: Expression,
    /// True for `in` (iterate keys)
    pub keys: bool,
}

/// Object literal member
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectProperty {
    /// `key: value`
    KeyValue {
        /// Key
        key: PropertyKey,
        /// Value
        value: Expression,
    },
    /// `name`
    Shorthand(String),
    /// `...expr`
    Spread(Expression),
    /// `key(params) body`, `get key() body`, `set key(v) body`
    Method {
        /// Key
        key: PropertyKey,
        /// Plain method or accessor
        kind: MethodKind,
        /// Parameters and body
        function: Function,
    },
}

/// Property access
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// `.name`
    Identifier(String),
    /// `[expr]`
    Computed(Box<Expression>),
}

/// Prefix unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `!` / `not`
    Not,
    /// `~`
    BitwiseNot,
    /// `typeof`
    Typeof,
    /// `void`
    Void,
    /// `delete`
    Delete,
}

impl UnaryOperator {
    /// Output text including any trailing space
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Not => "!",
            UnaryOperator::BitwiseNot => "~",
            UnaryOperator::Typeof => "typeof ",
            UnaryOperator::Void => "void ",
            UnaryOperator::Delete => "delete ",
        }
    }
}

/// `++` / `--`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

impl UpdateOperator {
    /// Operator text
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOperator::Increment => "++",
            UpdateOperator::Decrement => "--",
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
    /// `**`
    Exponent,
    /// `==` (compiled to strict equality)
    Equal,
    /// `!=` (compiled to strict inequality)
    NotEqual,
    /// `===`
    StrictEqual,
    /// `!==`
    StrictNotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanEqual,
    /// `<<`
    LeftShift,
    /// `>>`
    RightShift,
    /// `>>>`
    UnsignedRightShift,
    /// `&`
    BitwiseAnd,
    /// `|`
    BitwiseOr,
    /// `^`
    BitwiseXor,
    /// `instanceof`
    InstanceOf,
    /// `in`
    In,
}

impl BinaryOperator {
    /// Output text
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Exponent => "**",
            BinaryOperator::Equal | BinaryOperator::StrictEqual => "===",
            BinaryOperator::NotEqual | BinaryOperator::StrictNotEqual => "!==",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanEqual => ">=",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
            BinaryOperator::UnsignedRightShift => ">>>",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseXor => "^",
            BinaryOperator::InstanceOf => "instanceof",
            BinaryOperator::In => "in",
        }
    }
}

/// Short-circuit operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    /// `&&` / `and`
    And,
    /// `||` / `or`
    Or,
    /// `??`
    NullishCoalescing,
}

impl LogicalOperator {
    /// Output text
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
            LogicalOperator::NullishCoalescing => "??",
        }
    }
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    /// `=`
    Assign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubtractAssign,
    /// `*=`
    MultiplyAssign,
    /// `/=`
    DivideAssign,
    /// `%=`
    ModuloAssign,
    /// `**=`
    ExponentAssign,
    /// `<<=`
    LeftShiftAssign,
    /// `>>=`
    RightShiftAssign,
    /// `>>>=`
    UnsignedRightShiftAssign,
    /// `&=`
    BitwiseAndAssign,
    /// `|=`
    BitwiseOrAssign,
    /// `^=`
    BitwiseXorAssign,
    /// `&&=`
    AndAssign,
    /// `||=`
    OrAssign,
    /// `??=`
    NullishAssign,
}

impl AssignmentOperator {
    /// Output text
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentOperator::Assign => "=",
            AssignmentOperator::AddAssign => "+=",
            AssignmentOperator::SubtractAssign => "-=",
            AssignmentOperator::MultiplyAssign => "*=",
            AssignmentOperator::DivideAssign => "/=",
            AssignmentOperator::ModuloAssign => "%=",
            AssignmentOperator::ExponentAssign => "**=",
            AssignmentOperator::LeftShiftAssign => "<<=",
            AssignmentOperator::RightShiftAssign => ">>=",
            AssignmentOperator::UnsignedRightShiftAssign => ">>>=",
            AssignmentOperator::BitwiseAndAssign => "&=",
            AssignmentOperator::BitwiseOrAssign => "|=",
            AssignmentOperator::BitwiseXorAssign => "^=",
            AssignmentOperator::AndAssign => "&&=",
            AssignmentOperator::OrAssign => "||=",
            AssignmentOperator::NullishAssign => "??=",
        }
    }
}

/// Binding and assignment targets
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Bare identifier
    Identifier(String),
    /// Member expression target (`a.b`, `@x`, `a[0]`)
    Expression(Box<Expression>),
    /// `[a, b, ...rest]`
    Array(Vec<Pattern>),
    /// `{a, b: c, ...rest}`
    Object(Vec<ObjectPatternProperty>),
    /// `target = default`
    Default {
        /// Target
        target: Box<Pattern>,
        /// Default value
        default: Box<Expression>,
    },
    /// `...target`
    Rest(Box<Pattern>),
}

impl Pattern {
    /// Bare identifiers this pattern binds, in source order
    pub fn bound_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_bound_names(&mut names);
        names
    }

    fn collect_bound_names(&self, names: &mut Vec<String>) {
        match self {
            Pattern::Identifier(name) => names.push(name.clone()),
            Pattern::Array(elements) => {
                for element in elements {
                    element.collect_bound_names(names);
                }
            }
            Pattern::Object(properties) => {
                for property in properties {
                    match property {
                        ObjectPatternProperty::Property { value, .. } => value.collect_bound_names(names),
                        ObjectPatternProperty::Rest(target) => target.collect_bound_names(names),
                    }
                }
            }
            Pattern::Default { target, .. } | Pattern::Rest(target) => target.collect_bound_names(names),
            Pattern::Expression(_) => {}
        }
    }
}

/// Object pattern member
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPatternProperty {
    /// `key: value` or shorthand `name` / `name = default`
    Property {
        /// Key
        key: PropertyKey,
        /// Target
        value: Pattern,
        /// True when written without `key:`
        shorthand: bool,
    },
    /// `...rest`
    Rest(Box<Pattern>),
}

/// JSX element; `name` is `None` for fragments
#[derive(Debug, Clone, PartialEq)]
pub struct JsxElement {
    /// Tag name (`div`, `Foo.Bar`); `None` for `<>…</>`
    pub name: Option<String>,
    /// Attributes
    pub attributes: Vec<JsxAttribute>,
    /// Children
    pub children: Vec<JsxChild>,
    /// `<tag />`
    pub self_closing: bool,
}

/// JSX attribute
#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttribute {
    /// `name`, `name="v"`, `name={expr}`
    Named {
        /// Attribute name
        name: String,
        /// Value; `None` means boolean `true`
        value: Option<JsxAttributeValue>,
    },
    /// `{...expr}`
    Spread(Expression),
}

/// JSX attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttributeValue {
    /// Quoted text including the quotes
    String(String),
    /// `{expr}`
    Expression(Expression),
}

/// JSX child node
#[derive(Debug, Clone, PartialEq)]
pub enum JsxChild {
    /// Raw text
    Text(String),
    /// `{expr}`
    Expression(Expression),
    /// Nested element
    Element(JsxElement),
}

/// `T` or `T extends Bound`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    /// Parameter name
    pub name: String,
    /// Constraint
    pub constraint: Option<TypeAnnotation>,
}

/// Type annotations (erased unless annotations are emitted)
#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnnotation {
    /// `Name`, `ns.Name<Args>`
    Reference {
        /// Dotted name
        name: String,
        /// Type arguments
        arguments: Vec<TypeAnnotation>,
    },
    /// `A | B`
    Union(Vec<TypeAnnotation>),
    /// `A & B`
    Intersection(Vec<TypeAnnotation>),
    /// `T[]`
    Array(Box<TypeAnnotation>),
    /// `[A, B]`
    Tuple(Vec<TypeAnnotation>),
    /// `{a: A, b?: B}`
    Object(Vec<TypeMember>),
    /// `"literal"` with its quotes
    StringLiteral(String),
    /// `42`
    NumberLiteral(String),
    /// `typeof name`
    Typeof(String),
    /// `(a: A) => R`
    Function {
        /// Parameters
        params: Vec<TypeMember>,
        /// Result type
        result: Box<TypeAnnotation>,
    },
    /// `(T)`
    Parenthesized(Box<TypeAnnotation>),
}

/// `name?: Type` in object types and function types
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMember {
    /// Member or parameter name
    pub name: String,
    /// `?` marker
    pub optional: bool,
    /// Member type
    pub annotation: TypeAnnotation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_names_walks_nested_patterns() {
        let pattern = Pattern::Array(vec![
            Pattern::Identifier("a".into()),
            Pattern::Object(vec![
                ObjectPatternProperty::Property {
                    key: PropertyKey::Identifier("b".into()),
                    value: Pattern::Default {
                        target: Box::new(Pattern::Identifier("c".into())),
                        default: Box::new(Expression::Null),
                    },
                    shorthand: false,
                },
                ObjectPatternProperty::Rest(Box::new(Pattern::Identifier("d".into()))),
            ]),
            Pattern::Rest(Box::new(Pattern::Identifier("e".into()))),
        ]);
        assert_eq!(pattern.bound_names(), vec!["a", "c", "d", "e"]);
    }

    #[test]
    fn test_member_target_binds_nothing() {
        let pattern = Pattern::Expression(Box::new(Expression::SelfMember("x".into())));
        assert!(pattern.bound_names().is_empty());
    }

    #[test]
    fn test_equality_compiles_strict() {
        assert_eq!(BinaryOperator::Equal.as_str(), "===");
        assert_eq!(BinaryOperator::NotEqual.as_str(), "!==");
    }

    #[test]
    fn test_plain_text_of_interpolated_string() {
        let literal = StringLiteral {
            quote: '"',
            parts: vec![
                StringPart::Text("a".into()),
                StringPart::Interpolation(Box::new(Expression::Identifier("b".into()))),
            ],
            indent_cutoff: 1,
        };
        assert!(literal.plain_text().is_none());
    }
}
