//! Node decorators
//!
//! Every parse tree node is emitted into a [`Decorated`] value: the generated
//! output plus the bookkeeping its ancestors need. Parents never modify a
//! child's decorator; they fold it into an [`Aggregate`] and build a new one.

use crate::scope::ScopeToken;

/// Output of one node together with the metadata propagated to its parents
#[derive(Debug, Clone, PartialEq)]
pub struct Decorated<T> {
    /// Generated output for the node and its descendants
    pub output: T,
    /// Names implicitly declared by assignments; hoisted to the innermost block
    pub scoped_variables: Vec<String>,
    /// Names explicitly declared (`let`, `const`, `fn`, `class`, imports)
    pub declared: Vec<String>,
    /// Scope tokens of blocks nested in this node, in output order
    pub scopes: Vec<ScopeToken>,
    /// The enclosing function must be `async`
    pub is_async: bool,
    /// The enclosing function must be a generator
    pub is_generator: bool,
}

impl<T> Decorated<T> {
    /// Decorator without metadata
    pub fn leaf(output: T) -> Self {
        Self {
            output,
            scoped_variables: Vec::new(),
            declared: Vec::new(),
            scopes: Vec::new(),
            is_async: false,
            is_generator: false,
        }
    }

    /// Replace the output, keeping the metadata
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decorated<U> {
        Decorated {
            output: f(self.output),
            scoped_variables: self.scoped_variables,
            declared: self.declared,
            scopes: self.scopes,
            is_async: self.is_async,
            is_generator: self.is_generator,
        }
    }

    /// Add implicitly declared names
    pub fn hoisting(mut self, names: impl IntoIterator<Item = String>) -> Self {
        push_unique(&mut self.scoped_variables, names);
        self
    }

    /// Add explicitly declared names
    pub fn declaring(mut self, names: impl IntoIterator<Item = String>) -> Self {
        push_unique(&mut self.declared, names);
        self
    }

    /// Mark as requiring an async context
    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    /// Mark as requiring a generator context
    pub fn generator(mut self) -> Self {
        self.is_generator = true;
        self
    }
}

/// Metadata collected from children while a parent's output is assembled
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    /// Union of the children's hoisted names
    pub scoped_variables: Vec<String>,
    /// Union of the children's declared names
    pub declared: Vec<String>,
    /// Concatenated child scope tokens
    pub scopes: Vec<ScopeToken>,
    /// Any child requires `async`
    pub is_async: bool,
    /// Any child requires a generator
    pub is_generator: bool,
}

impl Aggregate {
    /// Start an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a child's metadata in and hand back its output
    pub fn take<T>(&mut self, child: Decorated<T>) -> T {
        push_unique(&mut self.scoped_variables, child.scoped_variables);
        push_unique(&mut self.declared, child.declared);
        self.scopes.extend(child.scopes);
        self.is_async |= child.is_async;
        self.is_generator |= child.is_generator;
        child.output
    }

    /// Fold in an optional child
    pub fn take_opt<T>(&mut self, child: Option<Decorated<T>>) -> Option<T> {
        child.map(|child| self.take(child))
    }

    /// Fold in a list of children, keeping their outputs in order
    pub fn take_all<T>(&mut self, children: Vec<Decorated<T>>) -> Vec<T> {
        children.into_iter().map(|child| self.take(child)).collect()
    }

    /// Build the parent's decorator
    pub fn finish<T>(self, output: T) -> Decorated<T> {
        Decorated {
            output,
            scoped_variables: self.scoped_variables,
            declared: self.declared,
            scopes: self.scopes,
            is_async: self.is_async,
            is_generator: self.is_generator,
        }
    }
}

fn push_unique(target: &mut Vec<String>, names: impl IntoIterator<Item = String>) {
    for name in names {
        if !target.contains(&name) {
            target.push(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_unions_in_order() {
        let mut aggregate = Aggregate::new();
        let a = aggregate.take(Decorated::leaf("a").hoisting(vec!["x".to_string(), "y".to_string()]));
        let b = aggregate.take(
            Decorated::leaf("b")
                .hoisting(vec!["y".to_string(), "z".to_string()])
                .asynchronous(),
        );
        let parent = aggregate.finish(format!("{}{}", a, b));
        assert_eq!(parent.output, "ab");
        assert_eq!(parent.scoped_variables, vec!["x", "y", "z"]);
        assert!(parent.is_async);
        assert!(!parent.is_generator);
    }

    #[test]
    fn test_scopes_concatenate() {
        let mut aggregate = Aggregate::new();
        let mut first = Decorated::leaf(());
        first.scopes = vec![1, 2];
        let mut second = Decorated::leaf(());
        second.scopes = vec![3];
        aggregate.take(first);
        aggregate.take(second);
        assert_eq!(aggregate.finish(()).scopes, vec![1, 2, 3]);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let decorated = Decorated::leaf(1).generator().map(|n| n + 1);
        assert_eq!(decorated.output, 2);
        assert!(decorated.is_generator);
    }
}
