use std::fmt;

/// A unary named function applied to a single argument.
///
/// `Sec`, `Csc`, `Cot` and `Hyp` are part of the grammar but have no
/// evaluation rule; the engine rejects them at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryFn {
    Sin,
    Cos,
    Tan,
    Log,
    Sec,
    Csc,
    Cot,
    Hyp,
    Asin,
    Acos,
    Atan,
}

impl UnaryFn {
    pub fn name(self) -> &'static str {
        match self {
            UnaryFn::Sin => "sin",
            UnaryFn::Cos => "cos",
            UnaryFn::Tan => "tan",
            UnaryFn::Log => "log",
            UnaryFn::Sec => "sec",
            UnaryFn::Csc => "csc",
            UnaryFn::Cot => "cot",
            UnaryFn::Hyp => "hyp",
            UnaryFn::Asin => "asin",
            UnaryFn::Acos => "acos",
            UnaryFn::Atan => "atan",
        }
    }

    /// Classify a function name from source text.
    /// Accepts both the `asin` and `arcsin` spellings for the inverses.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(UnaryFn::Sin),
            "cos" => Some(UnaryFn::Cos),
            "tan" => Some(UnaryFn::Tan),
            "log" | "ln" => Some(UnaryFn::Log),
            "sec" => Some(UnaryFn::Sec),
            "csc" => Some(UnaryFn::Csc),
            "cot" => Some(UnaryFn::Cot),
            "hyp" => Some(UnaryFn::Hyp),
            "asin" | "arcsin" => Some(UnaryFn::Asin),
            "acos" | "arccos" => Some(UnaryFn::Acos),
            "atan" | "arctan" => Some(UnaryFn::Atan),
            _ => None,
        }
    }
}

impl fmt::Display for UnaryFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinOp {
    pub fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
            BinOp::Mod => '%',
            BinOp::Pow => '^',
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One `name = expr` parameter binding of a [`Expr::Call`].
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub expr: Expr,
}

impl Binding {
    pub fn new(name: impl Into<String>, expr: Expr) -> Self {
        Binding {
            name: name.into(),
            expr,
        }
    }
}

/// A parsed arithmetic expression.
///
/// Every node owns its children outright; rewrites (the solver in
/// particular) always build fresh nodes, so no subtree is ever referenced
/// from two places.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Unary(UnaryFn, Box<Expr>),
    Factorial(Box<Expr>),
    /// `index` absent means a square root.
    Root {
        radicand: Box<Expr>,
        index: Option<Box<Expr>>,
    },
    Frac(Box<Expr>, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Paren(Box<Expr>),
    /// Reference to a stored named function with explicit parameter bindings.
    Call {
        name: String,
        bindings: Vec<Binding>,
    },
}

impl Expr {
    pub fn num(value: f64) -> Expr {
        Expr::Number(value)
    }

    pub fn var(name: impl Into<String>) -> Expr {
        Expr::Variable(name.into())
    }

    pub fn unary(func: UnaryFn, arg: Expr) -> Expr {
        Expr::Unary(func, Box::new(arg))
    }

    pub fn factorial(arg: Expr) -> Expr {
        Expr::Factorial(Box::new(arg))
    }

    pub fn sqrt(radicand: Expr) -> Expr {
        Expr::Root {
            radicand: Box::new(radicand),
            index: None,
        }
    }

    pub fn root(radicand: Expr, index: Expr) -> Expr {
        Expr::Root {
            radicand: Box::new(radicand),
            index: Some(Box::new(index)),
        }
    }

    pub fn frac(numerator: Expr, denominator: Expr) -> Expr {
        Expr::Frac(Box::new(numerator), Box::new(denominator))
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn add(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Add, lhs, rhs)
    }

    pub fn sub(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Sub, lhs, rhs)
    }

    pub fn mul(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Mul, lhs, rhs)
    }

    pub fn div(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Div, lhs, rhs)
    }

    pub fn pow(base: Expr, exp: Expr) -> Expr {
        Expr::binary(BinOp::Pow, base, exp)
    }

    pub fn paren(inner: Expr) -> Expr {
        Expr::Paren(Box::new(inner))
    }

    pub fn call(name: impl Into<String>, bindings: Vec<Binding>) -> Expr {
        Expr::Call {
            name: name.into(),
            bindings,
        }
    }

    /// True for leaf nodes (numbers and variables).
    pub fn is_leaf(&self) -> bool {
        matches!(self, Expr::Number(_) | Expr::Variable(_))
    }

    /// True if this node is the variable `name`, optionally inside a single
    /// layer of parentheses.
    pub fn is_variable(&self, name: &str) -> bool {
        match self {
            Expr::Variable(v) => v == name,
            Expr::Paren(inner) => matches!(inner.as_ref(), Expr::Variable(v) if v == name),
            _ => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Variable(name) => f.write_str(name),
            Expr::Unary(func, arg) => write!(f, "{}({})", func, arg),
            Expr::Factorial(arg) => write!(f, "{}!", arg),
            Expr::Root { radicand, index } => {
                let n = index
                    .as_ref()
                    .map(|i| i.to_string())
                    .unwrap_or_else(|| "2".to_string());
                if n == "2" {
                    write!(f, "sqrt({})", radicand)
                } else {
                    write!(f, "root[{}]({})", n, radicand)
                }
            }
            Expr::Frac(num, den) => write!(f, "frac({})({})", num, den),
            // Operators render without grouping; parentheses only appear
            // where the source carried an explicit Paren node.
            Expr::Binary(op, lhs, rhs) => write!(f, "{}{}{}", lhs, op, rhs),
            Expr::Paren(inner) => write!(f, "({})", inner),
            Expr::Call { name, bindings } => {
                write!(f, "${}", name)?;
                if bindings.is_empty() {
                    return Ok(());
                }
                write!(f, "{{")?;
                for (i, binding) in bindings.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}={}", binding.name, binding.expr)?;
                }
                write!(f, "}}")
            }
        }
    }
}
