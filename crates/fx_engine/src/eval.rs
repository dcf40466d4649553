//! Recursive evaluator over expression trees.

use fx_ast::{BinOp, Expr, UnaryFn};
use tracing::debug;

use crate::constants::Constants;
use crate::env::Environment;
use crate::error::EvalError;
use crate::functions::FunctionSource;
use crate::mode::AngleMode;

/// Maximum chained resolutions through variable bindings and stored-function
/// bodies before evaluation is treated as cyclic.
const MAX_RESOLVE_DEPTH: usize = 100;

/// Ambient evaluation state, passed explicitly.
pub struct EvalContext<'a> {
    pub constants: &'a Constants,
    pub mode: AngleMode,
    pub functions: &'a dyn FunctionSource,
}

/// Evaluate `expr` against `env`.
///
/// Pure: neither the tree nor the environment is modified, so repeated calls
/// with the same inputs return the same value. Numeric edge cases follow
/// IEEE semantics: division by zero and out-of-domain transcendentals
/// produce `±inf`/`NaN`, never an error.
pub fn evaluate(expr: &Expr, env: &Environment, ctx: &EvalContext) -> Result<f64, EvalError> {
    eval_at(expr, env, ctx, 0)
}

fn eval_at(expr: &Expr, env: &Environment, ctx: &EvalContext, depth: usize) -> Result<f64, EvalError> {
    match expr {
        Expr::Number(n) => Ok(*n),

        // Constants shadow environment bindings of the same name. A bound
        // expression is evaluated against the same environment, so chained
        // definitions (y -> x*2 with x bound elsewhere) resolve.
        Expr::Variable(name) => {
            if let Some(value) = ctx.constants.get(name) {
                return Ok(value);
            }
            let bound = env
                .get(name)
                .ok_or_else(|| EvalError::UnboundVariable(name.clone()))?;
            if depth >= MAX_RESOLVE_DEPTH {
                return Err(EvalError::CyclicDefinition(name.clone()));
            }
            eval_at(bound, env, ctx, depth + 1)
        }

        Expr::Unary(func, arg) => {
            let x = eval_at(arg, env, ctx, depth)?;
            match func {
                UnaryFn::Sin => Ok(ctx.mode.convert_argument(x).sin()),
                UnaryFn::Cos => Ok(ctx.mode.convert_argument(x).cos()),
                UnaryFn::Tan => Ok(ctx.mode.convert_argument(x).tan()),
                UnaryFn::Log => Ok(x.ln()),
                UnaryFn::Asin => Ok(ctx.mode.convert_result(x.asin())),
                UnaryFn::Acos => Ok(ctx.mode.convert_result(x.acos())),
                UnaryFn::Atan => Ok(ctx.mode.convert_result(x.atan())),
                UnaryFn::Sec | UnaryFn::Csc | UnaryFn::Cot | UnaryFn::Hyp => {
                    Err(EvalError::Unsupported(func.name()))
                }
            }
        }

        // The argument is truncated; zero and negative inputs yield 1.
        Expr::Factorial(arg) => {
            let mut rem = eval_at(arg, env, ctx, depth)? as i64;
            let mut acc = 1.0;
            while rem > 0 {
                acc *= rem as f64;
                rem -= 1;
            }
            Ok(acc)
        }

        Expr::Root { radicand, index } => {
            let x = eval_at(radicand, env, ctx, depth)?;
            let n = match index {
                Some(index) => eval_at(index, env, ctx, depth)?,
                None => 2.0,
            };
            Ok(x.powf(1.0 / n))
        }

        Expr::Frac(num, den) => {
            Ok(eval_at(num, env, ctx, depth)? / eval_at(den, env, ctx, depth)?)
        }

        Expr::Binary(op, lhs, rhs) => {
            let x = eval_at(lhs, env, ctx, depth)?;
            let y = eval_at(rhs, env, ctx, depth)?;
            Ok(match op {
                BinOp::Add => x + y,
                BinOp::Sub => x - y,
                BinOp::Mul => x * y,
                BinOp::Div => x / y,
                BinOp::Mod => x % y,
                BinOp::Pow => x.powf(y),
            })
        }

        Expr::Paren(inner) => eval_at(inner, env, ctx, depth),

        // Unknown function names evaluate to NaN so callers can detect the
        // miss numerically instead of aborting a whole plot or REPL line.
        Expr::Call { name, bindings } => {
            let Some(loaded) = ctx.functions.load(name) else {
                debug!(function = %name, "call target not found, yielding NaN");
                return Ok(f64::NAN);
            };
            if depth >= MAX_RESOLVE_DEPTH {
                return Err(EvalError::CyclicDefinition(name.clone()));
            }
            // Child scope: stored defaults, then the caller's bindings,
            // then the explicit parameters. Parameters are evaluated
            // against the *caller's* environment and bound as numbers.
            let mut child = loaded.defaults.clone();
            child.merge(env);
            for binding in bindings {
                let value = eval_at(&binding.expr, env, ctx, depth)?;
                child.set(binding.name.clone(), Expr::Number(value));
            }
            debug!(function = %name, params = bindings.len(), "evaluating stored function");
            eval_at(&loaded.body, &child, ctx, depth + 1)
        }
    }
}
