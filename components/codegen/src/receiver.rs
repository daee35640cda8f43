//! What `@` means at a given point, and which functions change it

/// What `@` refers to at the current position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Receiver {
    /// Plain `this`: top level, object methods and field initialisers
    This,
    /// The `$self` binding introduced by class methods and constructors
    SelfBinding,
}

impl Receiver {
    /// Output name of the receiver
    pub(crate) fn name(self) -> &'static str {
        match self {
            Receiver::This => "this",
            Receiver::SelfBinding => "$self",
        }
    }
}

/// Function flavour, deciding the receiver and the body prologue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FunctionKind {
    Declaration,
    Expression,
    Arrow,
    Method,
    StaticMethod,
    ObjectMethod,
    Constructor { derived: bool },
}

/// Shape of the `$self` binding at the top of a function body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Prologue {
    /// No binding
    None,
    /// `let $self = this;`
    This,
    /// `let $self;`, assigned by the `super(...)` call
    Deferred,
    /// `const $class = this;` plus a `$self` whose `constructor` is the class
    Static,
}

impl FunctionKind {
    /// Receiver inside the body; `None` inherits the outer one
    pub(crate) fn receiver(self) -> Option<Receiver> {
        match self {
            FunctionKind::Method | FunctionKind::StaticMethod | FunctionKind::Constructor { .. } => {
                Some(Receiver::SelfBinding)
            }
            FunctionKind::ObjectMethod => Some(Receiver::This),
            FunctionKind::Declaration | FunctionKind::Expression | FunctionKind::Arrow => None,
        }
    }

    pub(crate) fn prologue(self) -> Prologue {
        match self {
            FunctionKind::Method | FunctionKind::Constructor { derived: false } => Prologue::This,
            FunctionKind::Constructor { derived: true } => Prologue::Deferred,
            FunctionKind::StaticMethod => Prologue::Static,
            _ => Prologue::None,
        }
    }

    /// Whether `super(...)` inside the body assigns `$self`
    ///
    /// Arrows keep the enclosing constructor's setting.
    pub(crate) fn derived_constructor(self, enclosing: bool) -> bool {
        match self {
            FunctionKind::Constructor { derived } => derived,
            FunctionKind::Arrow => enclosing,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_methods_bind_self() {
        assert_eq!(FunctionKind::Method.receiver(), Some(Receiver::SelfBinding));
        assert_eq!(FunctionKind::ObjectMethod.receiver(), Some(Receiver::This));
        assert_eq!(FunctionKind::Arrow.receiver(), None);
    }

    #[test]
    fn test_prologues() {
        assert_eq!(FunctionKind::Constructor { derived: true }.prologue(), Prologue::Deferred);
        assert_eq!(FunctionKind::Constructor { derived: false }.prologue(), Prologue::This);
        assert_eq!(FunctionKind::StaticMethod.prologue(), Prologue::Static);
        assert_eq!(FunctionKind::Declaration.prologue(), Prologue::None);
    }

    #[test]
    fn test_arrows_inherit_derived_constructor() {
        assert!(FunctionKind::Arrow.derived_constructor(true));
        assert!(!FunctionKind::Expression.derived_constructor(true));
        assert!(FunctionKind::Constructor { derived: true }.derived_constructor(false));
    }
}
