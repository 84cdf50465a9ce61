use std::str::FromStr;

use crate::dialect::Dialect;
use crate::expr::{Compile, Expr, Fragment};

use super::{QueryError, Scope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(QueryError::coding(format!("unknown sort direction '{}'", s))),
        }
    }
}

/// One ORDER BY entry.
#[derive(Debug, Clone)]
pub enum OrderBy {
    Expr(Expr, Direction),
    /// Dialect-specific random order
    Random,
}

impl Compile for OrderBy {
    fn compile(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        match self {
            OrderBy::Expr(expr, direction) => {
                let mut out = expr.compile(scope)?;
                out.push_str(" ");
                out.push_str(direction.as_sql());
                Ok(out)
            }
            OrderBy::Random => Ok(Fragment::sql(scope.dialect().random_order()?)),
        }
    }

    fn resolve(&mut self, scope: &Scope<'_>) -> Result<(), QueryError> {
        match self {
            OrderBy::Expr(expr, _) => expr.resolve(scope),
            OrderBy::Random => Ok(()),
        }
    }
}

/// `LIMIT from, count` (`LIMIT count OFFSET from` on Postgres); `count == 0` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limit {
    pub from: u64,
    pub count: u64,
}

impl Limit {
    pub fn is_set(&self) -> bool {
        self.from != 0 || self.count != 0
    }

    /// The clause with a leading space, or nothing when neither bound is set.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        if !self.is_set() {
            return String::new();
        }
        let count = if self.count == 0 { dialect.max_limit() } else { self.count };
        match dialect {
            Dialect::Postgres => format!(" LIMIT {} OFFSET {}", count, self.from),
            _ => format!(" LIMIT {}, {}", self.from, count),
        }
    }
}
