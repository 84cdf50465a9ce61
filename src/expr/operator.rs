use super::{Compile, Expr, Fragment};
use crate::query::{QueryError, Scope};

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithmeticOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
            ArithmeticOp::Mod => "%",
        }
    }
}

/// `(left <op> right)`
#[derive(Debug, Clone)]
pub struct Arithmetic {
    left: Box<Expr>,
    op: ArithmeticOp,
    right: Box<Expr>,
}

impl Arithmetic {
    pub fn new(left: Expr, op: ArithmeticOp, right: Expr) -> Self {
        Self {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}

impl Compile for Arithmetic {
    fn compile(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        let mut out = self.left.compile(scope)?;
        out.push_str(&format!(" {} ", self.op.as_sql()));
        out.push(self.right.compile(scope)?);
        Ok(out.wrap("(", ")"))
    }

    fn resolve(&mut self, scope: &Scope<'_>) -> Result<(), QueryError> {
        self.left.resolve(scope)?;
        self.right.resolve(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::users_scope;
    use crate::value::Value;

    #[test]
    fn test_arithmetic_nests() {
        let inner = Expr::arithmetic(Expr::column("score"), ArithmeticOp::Mul, Expr::value(2));
        let expr = Arithmetic::new(inner, ArithmeticOp::Add, Expr::value(1));
        let f = expr.compile(&users_scope()).unwrap();
        assert_eq!(f.sql, "(({users}.`score` * ?) + ?)");
        assert_eq!(f.params, vec![Value::Int(2), Value::Int(1)]);
    }
}
