//! Free-variable analysis.

use fx_ast::Expr;

use crate::functions::FunctionSource;

/// Maximum depth of stored-function body expansion; past it the walk stops
/// descending so a cyclic function store cannot overflow the stack.
const MAX_EXPAND_DEPTH: usize = 100;

/// Collect the variable names an expression needs bound, in
/// left-to-right/depth-first order. Duplicates are retained; callers
/// de-duplicate as needed.
///
/// A `$name{...}` call contributes the free variables of the stored body
/// plus the *parameter names* of its bindings, not the free variables of
/// the bound expressions. The surrounding missing-variable detection is
/// written against exactly this output, so the asymmetry is contractual.
pub fn free_variables(expr: &Expr, functions: &dyn FunctionSource) -> Vec<String> {
    let mut names = Vec::new();
    collect(expr, functions, &mut names, 0);
    names
}

fn collect(expr: &Expr, functions: &dyn FunctionSource, names: &mut Vec<String>, depth: usize) {
    match expr {
        Expr::Number(_) => {}
        Expr::Variable(name) => names.push(name.clone()),
        Expr::Unary(_, arg) | Expr::Factorial(arg) | Expr::Paren(arg) => {
            collect(arg, functions, names, depth);
        }
        Expr::Root { radicand, index } => {
            collect(radicand, functions, names, depth);
            if let Some(index) = index {
                collect(index, functions, names, depth);
            }
        }
        Expr::Frac(lhs, rhs) | Expr::Binary(_, lhs, rhs) => {
            collect(lhs, functions, names, depth);
            collect(rhs, functions, names, depth);
        }
        Expr::Call { name, bindings } => {
            if depth < MAX_EXPAND_DEPTH {
                if let Some(loaded) = functions.load(name) {
                    collect(&loaded.body, functions, names, depth + 1);
                }
            }
            for binding in bindings {
                names.push(binding.name.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;
    use crate::functions::{LoadedFunction, NoFunctions};
    use fx_ast::Binding;

    struct OneFunction {
        name: &'static str,
        body: Expr,
    }

    impl FunctionSource for OneFunction {
        fn load(&self, name: &str) -> Option<LoadedFunction> {
            (name == self.name).then(|| LoadedFunction {
                body: self.body.clone(),
                defaults: Environment::new(),
            })
        }
    }

    #[test]
    fn variables_in_source_order_with_duplicates() {
        let e = Expr::add(
            Expr::mul(Expr::var("b"), Expr::var("a")),
            Expr::var("b"),
        );
        assert_eq!(free_variables(&e, &NoFunctions), vec!["b", "a", "b"]);
    }

    #[test]
    fn parens_are_transparent() {
        let e = Expr::add(Expr::var("x"), Expr::var("y"));
        let wrapped = Expr::paren(e.clone());
        assert_eq!(
            free_variables(&e, &NoFunctions),
            free_variables(&wrapped, &NoFunctions)
        );
    }

    #[test]
    fn root_index_contributes() {
        let e = Expr::root(Expr::var("x"), Expr::var("n"));
        assert_eq!(free_variables(&e, &NoFunctions), vec!["x", "n"]);
    }

    #[test]
    fn call_reports_body_variables_then_parameter_names() {
        let source = OneFunction {
            name: "area",
            body: Expr::mul(Expr::var("w"), Expr::var("h")),
        };
        // The binding expression's own variables (q) do not appear; the
        // parameter name (w) does.
        let e = Expr::call("area", vec![Binding::new("w", Expr::var("q"))]);
        assert_eq!(free_variables(&e, &source), vec!["w", "h", "w"]);
    }

    #[test]
    fn unknown_call_reports_only_parameter_names() {
        let e = Expr::call("nosuch", vec![Binding::new("a", Expr::num(1.0))]);
        assert_eq!(free_variables(&e, &NoFunctions), vec!["a"]);
    }

    #[test]
    fn cyclic_function_store_terminates() {
        let source = OneFunction {
            name: "loop",
            body: Expr::call("loop", vec![]),
        };
        let e = Expr::call("loop", vec![]);
        // Just has to come back.
        let _ = free_variables(&e, &source);
    }
}
