use super::{Compile, Fragment};
use crate::query::{Query, QueryError, Scope};

/// A nested SELECT used as an expression, e.g. the right side of `IN`.
///
/// The inner statement compiles with the enclosing scope as its parent, so
/// qualified references to outer aliases resolve (correlated sub-queries).
#[derive(Debug, Clone)]
pub struct SubQuery {
    query: Box<Query>,
}

impl SubQuery {
    pub fn new(query: Query) -> Self {
        Self {
            query: Box::new(query),
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }
}

impl Compile for SubQuery {
    fn compile(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        Ok(self.query.compile_select_within(Some(scope))?.wrap("(", ")"))
    }

    fn resolve(&mut self, scope: &Scope<'_>) -> Result<(), QueryError> {
        self.query.resolve_within(Some(scope))
    }
}
