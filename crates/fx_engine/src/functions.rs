//! Source of stored named functions, referenced by `$name{...}` calls.

use fx_ast::Expr;

use crate::env::Environment;

/// A stored function: its body plus the default bindings captured when it
/// was saved.
#[derive(Debug, Clone)]
pub struct LoadedFunction {
    pub body: Expr,
    pub defaults: Environment,
}

/// Resolver for `$name` references. The CLI backs this with on-disk
/// storage; tests use in-memory maps or [`NoFunctions`].
pub trait FunctionSource {
    fn load(&self, name: &str) -> Option<LoadedFunction>;
}

/// A [`FunctionSource`] with no functions at all.
pub struct NoFunctions;

impl FunctionSource for NoFunctions {
    fn load(&self, _name: &str) -> Option<LoadedFunction> {
        None
    }
}
