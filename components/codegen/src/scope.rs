//! Scope resolution for implicitly declared variables
//!
//! Every emitted block registers an entry holding the names assigned in it
//! without a declaration keyword, the names it declares explicitly and the
//! blocks nested inside it. Text output carries a placeholder token where the
//! block's `let` line belongs; once the whole program is emitted the table is
//! resolved and every placeholder is replaced.

use core_types::CompileError;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Key of a scope entry
pub type ScopeToken = u32;

/// Private-use character delimiting placeholder tokens in text output
pub(crate) const MARK: char = '\u{F8FF}';

/// Bookkeeping for one lexical block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeEntry {
    /// Implicitly declared names, sorted
    pub vars: BTreeSet<String>,
    /// Names declared with a keyword, by parameters or by loop headers
    pub declared: BTreeSet<String>,
    /// Blocks nested directly inside this one
    pub contains: Vec<ScopeToken>,
}

/// Per-compilation table of scope entries
#[derive(Debug, Default)]
pub struct ScopeTable {
    entries: BTreeMap<ScopeToken, ScopeEntry>,
    next_token: ScopeToken,
}

impl ScopeTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block and return its token
    pub fn allocate(
        &mut self,
        vars: impl IntoIterator<Item = String>,
        declared: impl IntoIterator<Item = String>,
        contains: Vec<ScopeToken>,
    ) -> ScopeToken {
        self.next_token += 1;
        let token = self.next_token;
        self.entries.insert(
            token,
            ScopeEntry {
                vars: vars.into_iter().collect(),
                declared: declared.into_iter().collect(),
                contains,
            },
        );
        token
    }

    /// Text written where the block's declarations go
    pub fn placeholder(token: ScopeToken) -> String {
        format!("{}{}{}", MARK, token, MARK)
    }

    /// Look up an entry
    pub fn entry(&self, token: ScopeToken) -> Option<&ScopeEntry> {
        self.entries.get(&token)
    }

    /// Number of registered blocks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no block was registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every name already visible from an enclosing block
    ///
    /// A name stays declared only in the outermost block that assigns it; a
    /// name declared explicitly anywhere above (or in the block itself) is
    /// never re-declared.
    ///
    /// # Errors
    /// Returns an `InvariantViolation` when a block is nested twice or refers
    /// to a token that was never allocated.
    pub fn resolve(&mut self) -> Result<(), CompileError> {
        let nested: HashSet<ScopeToken> = self
            .entries
            .values()
            .flat_map(|entry| entry.contains.iter().copied())
            .collect();
        let roots: Vec<ScopeToken> = self
            .entries
            .keys()
            .copied()
            .filter(|token| !nested.contains(token))
            .collect();

        let mut visited = HashSet::new();
        let mut pending: Vec<(ScopeToken, BTreeSet<String>)> =
            roots.into_iter().rev().map(|root| (root, BTreeSet::new())).collect();

        while let Some((token, inherited)) = pending.pop() {
            if !visited.insert(token) {
                return Err(CompileError::invariant(format!(
                    "scope {} is nested in more than one block",
                    token
                )));
            }
            let entry = self.entries.get_mut(&token).ok_or_else(|| {
                CompileError::invariant(format!("scope {} was never allocated", token))
            })?;

            entry
                .vars
                .retain(|name| !inherited.contains(name) && !entry.declared.contains(name));

            let mut visible = inherited;
            visible.extend(entry.vars.iter().cloned());
            visible.extend(entry.declared.iter().cloned());
            for child in entry.contains.iter().rev() {
                pending.push((*child, visible.clone()));
            }
        }

        if visited.len() != self.entries.len() {
            return Err(CompileError::invariant(
                "scope table contains a nesting cycle",
            ));
        }

        tracing::debug!(scopes = self.entries.len(), "resolved scope table");
        Ok(())
    }

    /// Replace every placeholder in `text` with its block's `let` line
    ///
    /// # Errors
    /// Returns an `InvariantViolation` when a placeholder has no entry or an
    /// entry's placeholder is missing from the text.
    pub fn substitute(&self, text: &str) -> Result<String, CompileError> {
        let pattern = Regex::new(&format!("([ \\t]*){}(\\d+){}", MARK, MARK))
            .map_err(|e| CompileError::invariant(format!("placeholder pattern: {}", e)))?;

        let mut output = String::with_capacity(text.len());
        let mut seen = HashSet::new();
        let mut last = 0;

        for captures in pattern.captures_iter(text) {
            let (Some(whole), Some(indent), Some(digits)) =
                (captures.get(0), captures.get(1), captures.get(2))
            else {
                continue;
            };
            let token: ScopeToken = digits
                .as_str()
                .parse()
                .map_err(|_| CompileError::invariant("malformed scope placeholder"))?;
            let entry = self.entries.get(&token).ok_or_else(|| {
                CompileError::invariant(format!("no scope entry for placeholder {}", token))
            })?;
            seen.insert(token);

            output.push_str(&text[last..whole.start()]);
            output.push_str(indent.as_str());
            if !entry.vars.is_empty() {
                let names: Vec<&str> = entry.vars.iter().map(String::as_str).collect();
                output.push_str(&format!("let {};\n{}", names.join(", "), indent.as_str()));
            }
            last = whole.end();
        }
        output.push_str(&text[last..]);

        if let Some(missing) = self.entries.keys().find(|token| !seen.contains(*token)) {
            return Err(CompileError::invariant(format!(
                "placeholder for scope {} is missing from the output",
                missing
            )));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ErrorKind;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_outer_declaration_wins() {
        let mut table = ScopeTable::new();
        let inner = table.allocate(names(&["x", "y"]), names(&[]), vec![]);
        let outer = table.allocate(names(&["x"]), names(&[]), vec![inner]);
        table.resolve().unwrap();
        assert_eq!(table.entry(outer).unwrap().vars, names(&["x"]).into_iter().collect());
        assert_eq!(table.entry(inner).unwrap().vars, names(&["y"]).into_iter().collect());
    }

    #[test]
    fn test_removal_is_transitive() {
        let mut table = ScopeTable::new();
        let deepest = table.allocate(names(&["x"]), names(&[]), vec![]);
        let middle = table.allocate(names(&[]), names(&[]), vec![deepest]);
        table.allocate(names(&["x"]), names(&[]), vec![middle]);
        table.resolve().unwrap();
        assert!(table.entry(deepest).unwrap().vars.is_empty());
    }

    #[test]
    fn test_explicit_declarations_block_hoisting() {
        let mut table = ScopeTable::new();
        let body = table.allocate(names(&["a", "b"]), names(&["a"]), vec![]);
        let nested = table.allocate(names(&["c"]), names(&[]), vec![]);
        table.allocate(names(&[]), names(&["c"]), vec![body, nested]);
        table.resolve().unwrap();
        assert_eq!(table.entry(body).unwrap().vars, names(&["b"]).into_iter().collect());
        assert!(table.entry(nested).unwrap().vars.is_empty());
    }

    #[test]
    fn test_siblings_keep_their_own_names() {
        let mut table = ScopeTable::new();
        let first = table.allocate(names(&["x"]), names(&[]), vec![]);
        let second = table.allocate(names(&["x"]), names(&[]), vec![]);
        table.allocate(names(&[]), names(&[]), vec![first, second]);
        table.resolve().unwrap();
        assert_eq!(table.entry(first).unwrap().vars.len(), 1);
        assert_eq!(table.entry(second).unwrap().vars.len(), 1);
    }

    #[test]
    fn test_substitute_sorts_and_indents() {
        let mut table = ScopeTable::new();
        let token = table.allocate(names(&["zeta", "alpha"]), names(&[]), vec![]);
        let text = format!("{{\n  {}zeta = 1;\n}}", ScopeTable::placeholder(token));
        assert_eq!(
            table.substitute(&text).unwrap(),
            "{\n  let alpha, zeta;\n  zeta = 1;\n}"
        );
    }

    #[test]
    fn test_substitute_empty_scope_leaves_no_trace() {
        let mut table = ScopeTable::new();
        let token = table.allocate(names(&[]), names(&[]), vec![]);
        let text = format!("{{\n  {}run();\n}}", ScopeTable::placeholder(token));
        assert_eq!(table.substitute(&text).unwrap(), "{\n  run();\n}");
    }

    #[test]
    fn test_missing_placeholder_is_invariant_violation() {
        let mut table = ScopeTable::new();
        table.allocate(names(&["x"]), names(&[]), vec![]);
        let error = table.substitute("x = 1;").unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvariantViolation);
    }

    #[test]
    fn test_unknown_placeholder_is_invariant_violation() {
        let table = ScopeTable::new();
        let error = table.substitute(&ScopeTable::placeholder(7)).unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvariantViolation);
    }

    #[test]
    fn test_double_nesting_is_invariant_violation() {
        let mut table = ScopeTable::new();
        let shared = table.allocate(names(&[]), names(&[]), vec![]);
        table.allocate(names(&[]), names(&[]), vec![shared]);
        table.allocate(names(&[]), names(&[]), vec![shared]);
        assert!(table.resolve().is_err());
    }
}
