//! Iterative isolation: peel the outermost operation off the expression and
//! apply its algebraic inverse to the placeholder side until only the target
//! variable remains.

use fx_ast::{BinOp, Expr, UnaryFn};
use fx_engine::{free_variables, FunctionSource};
use tracing::debug;

use crate::error::SolveError;

/// Upper bound on peel/swap iterations. Inputs where no rule makes progress
/// (a target stuck in an exponent bounces between the sides forever) hit the
/// bound and report as unsolvable.
const MAX_STEPS: usize = 256;

/// One isolation step, rendered for diagnostics and step-by-step output.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveStep {
    /// The accumulated placeholder side after this step.
    pub placeholder: String,
    /// The remaining expression still to be reduced.
    pub expression: String,
    /// The inverse operation that was applied.
    pub operation: String,
}

/// Result of an isolation: the right-hand side of `target = expr`, plus the
/// steps that led there.
#[derive(Debug, Clone, PartialEq)]
pub struct Solved {
    pub expr: Expr,
    pub steps: Vec<SolveStep>,
}

/// Count how often `target` appears free in `expr`.
pub fn occurrences(expr: &Expr, target: &str, functions: &dyn FunctionSource) -> usize {
    free_variables(expr, functions)
        .iter()
        .filter(|name| name.as_str() == target)
        .count()
}

fn contains_target(expr: &Expr, target: &str, functions: &dyn FunctionSource) -> bool {
    occurrences(expr, target, functions) > 0
}

fn unsolvable(target: &str, reason: impl Into<String>) -> SolveError {
    SolveError::Unsolvable {
        target: target.to_string(),
        reason: reason.into(),
    }
}

/// Rewrite `placeholder = expr` into `target = <result>` and return the
/// result side.
///
/// `target` must occur exactly once in `expr`. Both sides are built fresh;
/// the input tree is never modified.
pub fn solve_for(
    expr: &Expr,
    target: &str,
    placeholder: &str,
    functions: &dyn FunctionSource,
) -> Result<Solved, SolveError> {
    match occurrences(expr, target, functions) {
        0 => {
            return Err(SolveError::NoOccurrence {
                target: target.to_string(),
            })
        }
        1 => {}
        count => {
            return Err(SolveError::MultipleOccurrences {
                target: target.to_string(),
                count,
            })
        }
    }

    let mut lhs = Expr::var(placeholder);
    let mut rhs = expr.clone();
    let mut steps = Vec::new();

    for _ in 0..MAX_STEPS {
        if rhs.is_variable(target) {
            return Ok(Solved { expr: lhs, steps });
        }

        let operation;
        match rhs {
            // Parentheses carry no algebraic content.
            Expr::Paren(inner) => {
                rhs = *inner;
                operation = "unwrap parens".to_string();
            }

            // Leaf that is not the target: the target has moved onto the
            // placeholder side (a peeled denominator does this), so the
            // sides trade places and peeling continues.
            Expr::Number(_) | Expr::Variable(_) => {
                if !contains_target(&lhs, target, functions) {
                    return Err(unsolvable(target, "the variable was eliminated"));
                }
                std::mem::swap(&mut lhs, &mut rhs);
                operation = "swap sides".to_string();
            }

            Expr::Binary(op, a, b) => {
                let (a, b) = (*a, *b);
                match op {
                    BinOp::Add => {
                        let (branch, other) = if contains_target(&b, target, functions) {
                            (b, a)
                        } else {
                            (a, b)
                        };
                        operation = format!("- {}", other);
                        lhs = Expr::sub(lhs, other);
                        rhs = branch;
                    }
                    BinOp::Sub => {
                        if contains_target(&a, target, functions) {
                            operation = format!("+ {}", b);
                            lhs = Expr::add(lhs, b);
                            rhs = a;
                        } else {
                            // a - t = p  =>  t = a - p
                            operation = format!("{} - both sides", a);
                            lhs = Expr::sub(a, lhs);
                            rhs = b;
                        }
                    }
                    BinOp::Mul => {
                        let (branch, other) = if contains_target(&b, target, functions) {
                            (b, a)
                        } else {
                            (a, b)
                        };
                        operation = format!("/ {}", other);
                        lhs = Expr::div(lhs, other);
                        rhs = branch;
                    }
                    BinOp::Div => {
                        if contains_target(&b, target, functions) {
                            return Err(unsolvable(
                                target,
                                "the variable sits in the denominator of a division",
                            ));
                        }
                        operation = format!("* {}", b);
                        lhs = Expr::mul(lhs, b);
                        rhs = a;
                    }
                    BinOp::Mod => {
                        return Err(unsolvable(target, "'%' cannot be inverted"));
                    }
                    BinOp::Pow => {
                        operation = match b.to_string().as_str() {
                            "2" => "sqrt()".to_string(),
                            n => format!("root[{}]()", n),
                        };
                        lhs = Expr::root(lhs, b);
                        rhs = a;
                    }
                }
            }

            Expr::Root { radicand, index } => {
                let index = index.map(|i| *i).unwrap_or_else(|| Expr::num(2.0));
                operation = format!("^{}", index);
                lhs = Expr::pow(lhs, index);
                rhs = *radicand;
            }

            Expr::Frac(num, den) => {
                operation = format!("* {}", den);
                lhs = Expr::mul(lhs, *den);
                rhs = *num;
            }

            Expr::Unary(func, arg) => {
                let inverse = match func {
                    UnaryFn::Sin => UnaryFn::Asin,
                    UnaryFn::Cos => UnaryFn::Acos,
                    UnaryFn::Tan => UnaryFn::Atan,
                    UnaryFn::Asin => UnaryFn::Sin,
                    UnaryFn::Acos => UnaryFn::Cos,
                    UnaryFn::Atan => UnaryFn::Tan,
                    UnaryFn::Log | UnaryFn::Sec | UnaryFn::Csc | UnaryFn::Cot | UnaryFn::Hyp => {
                        return Err(SolveError::Unsupported(func.name()));
                    }
                };
                operation = format!("{}()", inverse);
                lhs = Expr::unary(inverse, lhs);
                rhs = *arg;
            }

            Expr::Factorial(_) => {
                return Err(unsolvable(target, "factorial cannot be inverted"));
            }

            Expr::Call { ref name, .. } => {
                return Err(unsolvable(
                    target,
                    format!("the stored function '{}' cannot be inverted", name),
                ));
            }
        }

        debug!(lhs = %lhs, rhs = %rhs, op = %operation, "isolation step");
        steps.push(SolveStep {
            placeholder: lhs.to_string(),
            expression: rhs.to_string(),
            operation,
        });
    }

    Err(unsolvable(target, "no progress within the step limit"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_engine::NoFunctions;
    use fx_parser::parse;

    fn solve(input: &str, target: &str, placeholder: &str) -> String {
        let expr = parse(input).unwrap();
        solve_for(&expr, target, placeholder, &NoFunctions)
            .unwrap()
            .expr
            .to_string()
    }

    #[test]
    fn square() {
        assert_eq!(solve("x^2", "x", "y"), "sqrt(y)");
    }

    #[test]
    fn cube() {
        assert_eq!(solve("x^3", "x", "y"), "root[3](y)");
    }

    #[test]
    fn pythagoras() {
        assert_eq!(solve("sqrt(a^2+b^2)", "b", "c"), "sqrt(c^2-a^2)");
    }

    #[test]
    fn arc_cosine() {
        assert_eq!(solve("acos(P/S)", "P", "p"), "cos(p)*S");
    }

    #[test]
    fn cube_under_division() {
        assert_eq!(solve("(x^3)/5", "x", "y"), "root[3](y*5)");
    }

    #[test]
    fn reactance_fraction() {
        assert_eq!(solve("frac(XL)(2*pi*f)", "f", "L"), "XL/L/2*pi");
    }

    #[test]
    fn addition_descends_the_target_branch() {
        assert_eq!(solve("a+x", "x", "y"), "y-a");
        assert_eq!(solve("x+a", "x", "y"), "y-a");
    }

    #[test]
    fn subtraction_sides() {
        assert_eq!(solve("x-a", "x", "y"), "y+a");
        // a - x = y  =>  x = a - y
        assert_eq!(solve("a-x", "x", "y"), "a-y");
    }

    #[test]
    fn root_peels_to_power() {
        assert_eq!(solve("root[3](x)", "x", "y"), "y^3");
        assert_eq!(solve("sqrt(x)", "x", "y"), "y^2");
    }

    #[test]
    fn inverse_trig_round_trips() {
        assert_eq!(solve("sin(x)", "x", "y"), "asin(y)");
        assert_eq!(solve("atan(x)", "x", "y"), "tan(y)");
    }

    #[test]
    fn missing_target_is_rejected() {
        let expr = parse("a+b").unwrap();
        assert_eq!(
            solve_for(&expr, "x", "y", &NoFunctions).unwrap_err(),
            SolveError::NoOccurrence {
                target: "x".to_string()
            }
        );
    }

    #[test]
    fn repeated_target_is_rejected() {
        let expr = parse("x+x").unwrap();
        assert_eq!(
            solve_for(&expr, "x", "y", &NoFunctions).unwrap_err(),
            SolveError::MultipleOccurrences {
                target: "x".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn denominator_target_is_rejected() {
        let expr = parse("a/x").unwrap();
        assert!(matches!(
            solve_for(&expr, "x", "y", &NoFunctions),
            Err(SolveError::Unsolvable { .. })
        ));
    }

    #[test]
    fn factorial_and_modulus_are_rejected() {
        for input in ["x!", "x%2"] {
            let expr = parse(input).unwrap();
            assert!(matches!(
                solve_for(&expr, "x", "y", &NoFunctions),
                Err(SolveError::Unsolvable { .. })
            ));
        }
    }

    #[test]
    fn log_has_no_inverse_rule() {
        let expr = parse("log(x)").unwrap();
        assert_eq!(
            solve_for(&expr, "x", "y", &NoFunctions).unwrap_err(),
            SolveError::Unsupported("log")
        );
    }

    #[test]
    fn target_in_exponent_hits_the_step_limit() {
        let expr = parse("2^x").unwrap();
        assert!(matches!(
            solve_for(&expr, "x", "y", &NoFunctions),
            Err(SolveError::Unsolvable { .. })
        ));
    }

    #[test]
    fn input_tree_is_left_untouched() {
        let expr = parse("(x^3)/5").unwrap();
        let copy = expr.clone();
        let _ = solve_for(&expr, "x", "y", &NoFunctions).unwrap();
        assert_eq!(expr, copy);
    }

    #[test]
    fn steps_narrate_the_isolation() {
        let expr = parse("x^2").unwrap();
        let solved = solve_for(&expr, "x", "y", &NoFunctions).unwrap();
        assert_eq!(solved.steps.len(), 1);
        assert_eq!(solved.steps[0].placeholder, "sqrt(y)");
        assert_eq!(solved.steps[0].expression, "x");
        assert_eq!(solved.steps[0].operation, "sqrt()");
    }

    #[test]
    fn solved_side_evaluates_consistently() {
        use fx_engine::{evaluate, AngleMode, Constants, Environment, EvalContext};

        // x - 3 = 7  =>  x = 10, checked by evaluating the rearranged side.
        let expr = parse("x-3").unwrap();
        let solved = solve_for(&expr, "x", "y", &NoFunctions).unwrap();

        let constants = Constants::new();
        let ctx = EvalContext {
            constants: &constants,
            mode: AngleMode::Deg,
            functions: &NoFunctions,
        };
        let mut env = Environment::new();
        env.set("y", Expr::num(7.0));
        assert_eq!(evaluate(&solved.expr, &env, &ctx).unwrap(), 10.0);

        // 12 - x = 9  =>  x = 3 through the right-operand rule.
        let expr = parse("12-x").unwrap();
        let solved = solve_for(&expr, "x", "y", &NoFunctions).unwrap();
        let mut env = Environment::new();
        env.set("y", Expr::num(9.0));
        assert_eq!(evaluate(&solved.expr, &env, &ctx).unwrap(), 3.0);
    }
}
