//! Numeric evaluation of [`fx_ast::Expr`] trees.
//!
//! The engine is side-effect free: ambient state (constants, angle mode,
//! stored functions) travels in an explicit [`EvalContext`] and variable
//! bindings in an [`Environment`] owned by the caller.

pub mod constants;
pub mod env;
pub mod error;
pub mod eval;
pub mod free_vars;
pub mod functions;
pub mod mode;

pub use constants::Constants;
pub use env::Environment;
pub use error::EvalError;
pub use eval::{evaluate, EvalContext};
pub use free_vars::free_variables;
pub use functions::{FunctionSource, LoadedFunction, NoFunctions};
pub use mode::AngleMode;
