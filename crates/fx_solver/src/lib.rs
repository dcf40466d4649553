//! Algebraic isolation of a single variable.
//!
//! Given `placeholder = expression`, [`solve_for`] rewrites the equation so
//! the target variable stands alone: `target = <result>`. Only expressions
//! where the target occurs exactly once are supported.

pub mod error;
pub mod solve;

pub use error::SolveError;
pub use solve::{occurrences, solve_for, Solved, SolveStep};
