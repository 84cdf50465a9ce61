//! Expression node model.
//!
//! Every node compiles to a [`Fragment`]: one SQL string plus the bind
//! parameters for the `?` placeholders it contains, in placeholder order.
//! Leaves (`NativeValue`, `Column`) emit themselves; composites compile their
//! children left to right and splice the fragments together, so parameter
//! order always follows placeholder order.
//!
//! Compilation happens against a [`Scope`], the statement context that knows the
//! sources (tables, sub-queries) and their aliases. Unvalidated column references
//! ([`PartialColumn`]) are checked against that scope in an explicit
//! [`Compile::resolve`] pass, or on the fly when compiling an unresolved tree.

mod case;
mod column;
mod comparator;
mod fulltext;
mod function;
mod native;
mod operator;
mod raw;
mod subquery;

pub use case::Case;
pub use column::{Column, ColumnOwner, ColumnState, PartialColumn};
pub use comparator::{CompareOp, Comparator, IsNull};
pub use fulltext::{MatchAgainst, SearchMode};
pub use function::Function;
pub use native::{NativeValue, ValueList};
pub use operator::{Arithmetic, ArithmeticOp};
pub use raw::RawSql;
pub use subquery::SubQuery;

use enum_dispatch::enum_dispatch;

use crate::query::{ConditionGroup, Query, QueryError, Scope};
use crate::value::Value;

/// A compiled piece of SQL and its bind parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Fragment {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// A fragment without parameters.
    pub fn sql(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }

    pub fn push_str(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append another fragment, keeping parameter order.
    pub fn push(&mut self, other: Fragment) {
        self.sql.push_str(&other.sql);
        self.params.extend(other.params);
    }

    /// Concatenate fragments with `separator` between them.
    pub fn join(parts: impl IntoIterator<Item = Fragment>, separator: &str) -> Fragment {
        let mut out = Fragment::default();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            out.push(part);
        }
        out
    }

    pub fn wrap(self, prefix: &str, suffix: &str) -> Fragment {
        Fragment {
            sql: format!("{}{}{}", prefix, self.sql, suffix),
            params: self.params,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Capability shared by every expression node.
#[enum_dispatch]
pub trait Compile {
    /// Emit SQL and bind parameters for this node within `scope`.
    fn compile(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError>;

    /// Validate column references against `scope`, caching the outcome.
    fn resolve(&mut self, _scope: &Scope<'_>) -> Result<(), QueryError> {
        Ok(())
    }
}

/// Any expression node.
#[enum_dispatch(Compile)]
#[derive(Debug, Clone)]
pub enum Expr {
    Value(NativeValue),
    List(ValueList),
    Column(Column),
    Partial(PartialColumn),
    Arithmetic(Arithmetic),
    Function(Function),
    Compare(Comparator),
    IsNull(IsNull),
    Match(MatchAgainst),
    Case(Case),
    Raw(RawSql),
    SubQuery(SubQuery),
    Group(ConditionGroup),
}

impl Expr {
    /// A column reference, validated when the statement compiles.
    pub fn column(text: impl Into<String>) -> Expr {
        Expr::Partial(PartialColumn::new(text))
    }

    /// A column reference that degrades to a literal string if it does not resolve.
    pub fn column_or_literal(text: impl Into<String>) -> Expr {
        Expr::Partial(PartialColumn::with_fallback(text))
    }

    /// A value bound as a parameter.
    pub fn value(value: impl Into<Value>) -> Expr {
        Expr::Value(NativeValue::new(value))
    }

    /// A value inlined into the SQL text.
    pub fn trusted(value: impl Into<Value>) -> Expr {
        Expr::Value(NativeValue::trusted(value))
    }

    pub fn list<I, V>(values: I) -> Expr
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Expr::List(ValueList::from_values(values))
    }

    /// Trusted SQL text without parameters, e.g. a keyword.
    pub fn raw(sql: impl Into<String>) -> Expr {
        Expr::Raw(RawSql::trusted(sql))
    }

    pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::Function(Function::new(name, args))
    }

    /// `COUNT(*)`
    pub fn count_all() -> Expr {
        Expr::func("COUNT", vec![Expr::raw("*")])
    }

    pub fn arithmetic(left: Expr, op: ArithmeticOp, right: Expr) -> Expr {
        Expr::Arithmetic(Arithmetic::new(left, op, right))
    }

    pub fn compare(left: Expr, op: CompareOp, right: Expr) -> Expr {
        Expr::Compare(Comparator::new(left, op, right))
    }

    pub fn is_null(expr: Expr) -> Expr {
        Expr::IsNull(IsNull::new(expr, false))
    }

    pub fn is_not_null(expr: Expr) -> Expr {
        Expr::IsNull(IsNull::new(expr, true))
    }

    pub fn subquery(query: Query) -> Expr {
        Expr::SubQuery(SubQuery::new(query))
    }

    /// The bound value, if this is an untrusted native value.
    pub(crate) fn bound_value(&self) -> Option<&Value> {
        match self {
            Expr::Value(v) if !v.is_trusted() => Some(v.value()),
            _ => None,
        }
    }

    /// The literal value of a native value node, trusted or not.
    pub(crate) fn literal(&self) -> Option<&Value> {
        match self {
            Expr::Value(v) => Some(v.value()),
            _ => None,
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::value(value)
    }
}

impl From<Query> for Expr {
    fn from(query: Query) -> Self {
        Expr::subquery(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_join_keeps_param_order() {
        let joined = Fragment::join(
            vec![
                Fragment::new("a = ?", vec![Value::Int(1)]),
                Fragment::sql("b IS NULL"),
                Fragment::new("c = ?", vec![Value::Int(3)]),
            ],
            " AND ",
        );
        assert_eq!(joined.sql, "a = ? AND b IS NULL AND c = ?");
        assert_eq!(joined.params, vec![Value::Int(1), Value::Int(3)]);
    }

    #[test]
    fn test_fragment_wrap() {
        let f = Fragment::new("x = ?", vec![Value::Int(1)]).wrap("NOT (", ")");
        assert_eq!(f.sql, "NOT (x = ?)");
        assert_eq!(f.params.len(), 1);
    }
}
