//! Call shapes accepted by the condition builders.
//!
//! A builder call is converted into a [`Predicate`] once, at the API boundary;
//! [`ConditionGroup`](super::ConditionGroup) then turns each predicate into
//! exactly one condition or nested group.

use std::collections::BTreeMap;

use crate::expr::{CompareOp, Expr, RawSql, ValueList};
use crate::value::Value;

use super::{ConditionGroup, Query, QueryError};

/// The right-hand side of a comparison.
#[derive(Debug, Clone)]
pub enum Operand {
    Value(Value),
    List(Vec<Value>),
    Expr(Expr),
    Query(Box<Query>),
}

impl Operand {
    pub fn is_list(&self) -> bool {
        matches!(self, Operand::List(_) | Operand::Query(_))
    }

    pub(crate) fn into_expr(self) -> Expr {
        match self {
            Operand::Value(value) => Expr::value(value),
            Operand::List(values) => Expr::List(ValueList::from_values(values)),
            Operand::Expr(expr) => expr,
            Operand::Query(query) => Expr::subquery(*query),
        }
    }
}

macro_rules! operand_from_scalar {
    ($($t:ty),* $(,)?) => {
        $(impl From<$t> for Operand {
            fn from(value: $t) -> Self {
                Operand::Value(Value::from(value))
            }
        })*
    };
}

operand_from_scalar!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, bool, &str, String, &String, Value);

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        Operand::Value(value.map(Into::into).unwrap_or(Value::Null))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(values: Vec<T>) -> Self {
        Operand::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Operand {
    fn from(values: [T; N]) -> Self {
        Operand::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<Expr> for Operand {
    fn from(expr: Expr) -> Self {
        Operand::Expr(expr)
    }
}

impl From<RawSql> for Operand {
    fn from(raw: RawSql) -> Self {
        Operand::Expr(Expr::Raw(raw))
    }
}

impl From<Query> for Operand {
    fn from(query: Query) -> Self {
        Operand::Query(Box::new(query))
    }
}

/// One normalized builder call.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `{column: value, ...}`, one equality per entry, ANDed
    Map(Vec<(String, Operand)>),
    /// `(column, value)`: equality, or membership for list-valued operands
    Binary(String, Operand),
    /// `(column, operator, value)`
    Ternary(String, CompareOp, Operand),
    /// A pre-built nested group
    Group(ConditionGroup),
    /// Any boolean expression
    Expr(Expr),
    /// Caller-written SQL
    Raw(RawSql),
    /// A call shape that could not be normalized; reported when the statement compiles
    Invalid(QueryError),
}

impl<V: Into<Operand>> From<(&str, V)> for Predicate {
    fn from((column, value): (&str, V)) -> Self {
        Predicate::Binary(column.to_string(), value.into())
    }
}

impl<V: Into<Operand>> From<(&str, &str, V)> for Predicate {
    fn from((column, op, value): (&str, &str, V)) -> Self {
        match op.parse::<CompareOp>() {
            Ok(op) => Predicate::Ternary(column.to_string(), op, value.into()),
            Err(err) => Predicate::Invalid(err),
        }
    }
}

impl<V: Into<Operand>> From<(&str, CompareOp, V)> for Predicate {
    fn from((column, op, value): (&str, CompareOp, V)) -> Self {
        Predicate::Ternary(column.to_string(), op, value.into())
    }
}

impl<V: Into<Operand>> From<Vec<(&str, V)>> for Predicate {
    fn from(entries: Vec<(&str, V)>) -> Self {
        Predicate::Map(
            entries
                .into_iter()
                .map(|(column, value)| (column.to_string(), value.into()))
                .collect(),
        )
    }
}

impl<V: Into<Operand>> From<BTreeMap<String, V>> for Predicate {
    fn from(entries: BTreeMap<String, V>) -> Self {
        Predicate::Map(entries.into_iter().map(|(column, value)| (column, value.into())).collect())
    }
}

impl From<ConditionGroup> for Predicate {
    fn from(group: ConditionGroup) -> Self {
        Predicate::Group(group)
    }
}

impl From<Expr> for Predicate {
    fn from(expr: Expr) -> Self {
        Predicate::Expr(expr)
    }
}

impl From<RawSql> for Predicate {
    fn from(raw: RawSql) -> Self {
        Predicate::Raw(raw)
    }
}

impl From<Result<RawSql, QueryError>> for Predicate {
    fn from(raw: Result<RawSql, QueryError>) -> Self {
        match raw {
            Ok(raw) => Predicate::Raw(raw),
            Err(err) => Predicate::Invalid(err),
        }
    }
}
