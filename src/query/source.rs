use std::sync::Arc;

use crate::expr::Expr;
use crate::schema::Table;

use super::{ConditionGroup, Query};

/// What a FROM or JOIN reads from.
#[derive(Debug, Clone)]
pub enum Source {
    Table(Arc<Table>),
    SubQuery(Box<Query>),
}

impl Source {
    pub fn table(&self) -> Option<&Arc<Table>> {
        match self {
            Source::Table(table) => Some(table),
            Source::SubQuery(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    /// No ON clause
    Cross,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Join {
    pub(crate) kind: JoinKind,
    pub(crate) target: Source,
    pub(crate) on: ConditionGroup,
}

/// One projected expression with its optional alias.
#[derive(Debug, Clone)]
pub struct SelectColumn {
    pub(crate) expr: Expr,
    pub(crate) alias: Option<String>,
}
