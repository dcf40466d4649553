pub mod expression;

pub use expression::{BinOp, Binding, Expr, UnaryFn};
