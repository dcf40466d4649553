//! Variable environment: name → bound (unevaluated) expression.

use std::collections::HashMap;

use fx_ast::Expr;

/// A set of lazy variable bindings.
///
/// Bindings hold expressions, not numbers; a bound expression may itself
/// reference other variables of the same environment and is only evaluated
/// on lookup. Child environments start as a full copy of their parent, so
/// later writes never leak back.
#[derive(Default, Debug, Clone)]
pub struct Environment {
    bindings: HashMap<String, Expr>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy-construct a child environment from `parent`.
    pub fn child_of(parent: &Environment) -> Self {
        parent.clone()
    }

    /// Set a binding (overwrites existing).
    pub fn set(&mut self, name: impl Into<String>, expr: Expr) {
        self.bindings.insert(name.into(), expr);
    }

    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.bindings.get(name)
    }

    /// Remove a binding, returns true if it existed.
    pub fn unset(&mut self, name: &str) -> bool {
        self.bindings.remove(name).is_some()
    }

    pub fn clear_all(&mut self) {
        self.bindings.clear();
    }

    /// Copy every binding of `other` into this environment, overwriting on
    /// name collisions.
    pub fn merge(&mut self, other: &Environment) {
        for (name, expr) in &other.bindings {
            self.bindings.insert(name.clone(), expr.clone());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// All bindings, sorted by name for deterministic output.
    pub fn list(&self) -> Vec<(&str, &Expr)> {
        let mut items: Vec<_> = self
            .bindings
            .iter()
            .map(|(name, expr)| (name.as_str(), expr))
            .collect();
        items.sort_by_key(|&(name, _)| name);
        items
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
