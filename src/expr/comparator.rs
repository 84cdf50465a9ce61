use std::fmt;
use std::str::FromStr;

use super::{Compile, Expr, Fragment};
use crate::query::{QueryError, Scope};
use crate::value::Value;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
    In,
    NotIn,
    Is,
    IsNot,
    Regexp,
}

impl CompareOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "<>",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
            CompareOp::Like => "LIKE",
            CompareOp::NotLike => "NOT LIKE",
            CompareOp::In => "IN",
            CompareOp::NotIn => "NOT IN",
            CompareOp::Is => "IS",
            CompareOp::IsNot => "IS NOT",
            CompareOp::Regexp => "REGEXP",
        }
    }

    /// Whether the operator asserts a mismatch (`<>`, `NOT IN`, ...).
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            CompareOp::NotEq | CompareOp::NotLike | CompareOp::NotIn | CompareOp::IsNot
        )
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for CompareOp {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_lowercase();
        let op = match normalized.as_str() {
            "=" | "==" => CompareOp::Eq,
            "!=" | "<>" => CompareOp::NotEq,
            "<" => CompareOp::Lt,
            "<=" => CompareOp::LtEq,
            ">" => CompareOp::Gt,
            ">=" => CompareOp::GtEq,
            "like" => CompareOp::Like,
            "not like" => CompareOp::NotLike,
            "in" => CompareOp::In,
            "not in" => CompareOp::NotIn,
            "is" => CompareOp::Is,
            "is not" => CompareOp::IsNot,
            "regexp" => CompareOp::Regexp,
            _ => return Err(QueryError::coding(format!("unknown comparison operator '{}'", s))),
        };
        Ok(op)
    }
}

/// `left <op> right`, with the special forms for NULL, booleans, lists and patterns.
#[derive(Debug, Clone)]
pub struct Comparator {
    left: Box<Expr>,
    op: CompareOp,
    right: Box<Expr>,
}

impl Comparator {
    pub fn new(left: Expr, op: CompareOp, right: Expr) -> Self {
        Self {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }
}

impl Compile for Comparator {
    fn compile(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        let negative = self.op.is_negative();

        // Right-hand shapes that rewrite the operator
        match self.right.as_ref() {
            Expr::List(list) if list.is_empty() => return Ok(Fragment::sql("FALSE")),
            Expr::List(list) => {
                let op = if negative { CompareOp::NotIn } else { CompareOp::In };
                let mut out = self.left.compile(scope)?;
                out.push_str(&format!(" {} ", op));
                out.push(list.compile(scope)?);
                return Ok(out);
            }
            _ => {}
        }

        match self.right.literal() {
            Some(Value::Null) => {
                let keyword = if negative { " IS NOT NULL" } else { " IS NULL" };
                let mut out = self.left.compile(scope)?;
                out.push_str(keyword);
                return Ok(out);
            }
            Some(Value::Bool(b)) if matches!(self.op, CompareOp::Eq | CompareOp::NotEq | CompareOp::Is | CompareOp::IsNot) => {
                let op = if negative { CompareOp::IsNot } else { CompareOp::Is };
                let literal = if *b { "TRUE" } else { "FALSE" };
                let mut out = self.left.compile(scope)?;
                out.push_str(&format!(" {} {}", op, literal));
                return Ok(out);
            }
            _ => {}
        }

        // A bound string containing '%' is treated as a LIKE pattern
        let op = match (self.op, self.right.bound_value()) {
            (CompareOp::Eq, Some(Value::Str(s))) if s.contains('%') => CompareOp::Like,
            (CompareOp::NotEq, Some(Value::Str(s))) if s.contains('%') => CompareOp::NotLike,
            (op, _) => op,
        };

        let mut out = self.left.compile(scope)?;
        out.push_str(&format!(" {} ", op));
        out.push(self.right.compile(scope)?);
        Ok(out)
    }

    fn resolve(&mut self, scope: &Scope<'_>) -> Result<(), QueryError> {
        self.left.resolve(scope)?;
        self.right.resolve(scope)
    }
}

/// `expr IS [NOT] NULL`
#[derive(Debug, Clone)]
pub struct IsNull {
    expr: Box<Expr>,
    negated: bool,
}

impl IsNull {
    pub fn new(expr: Expr, negated: bool) -> Self {
        Self {
            expr: Box::new(expr),
            negated,
        }
    }
}

impl Compile for IsNull {
    fn compile(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        let mut out = self.expr.compile(scope)?;
        out.push_str(if self.negated { " IS NOT NULL" } else { " IS NULL" });
        Ok(out)
    }

    fn resolve(&mut self, scope: &Scope<'_>) -> Result<(), QueryError> {
        self.expr.resolve(scope)
    }
}
