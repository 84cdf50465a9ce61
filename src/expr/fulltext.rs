use super::{Compile, Expr, Fragment};
use crate::query::{QueryError, Scope};

/// Full-text search modifiers for `MATCH ... AGAINST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    NaturalLanguage,
    Boolean,
    QueryExpansion,
}

impl SearchMode {
    fn as_sql(&self) -> &'static str {
        match self {
            SearchMode::NaturalLanguage => " IN NATURAL LANGUAGE MODE",
            SearchMode::Boolean => " IN BOOLEAN MODE",
            SearchMode::QueryExpansion => " WITH QUERY EXPANSION",
        }
    }
}

/// `MATCH (col, ...) AGAINST (search [mode])`
#[derive(Debug, Clone)]
pub struct MatchAgainst {
    columns: Vec<Expr>,
    search: Box<Expr>,
    mode: SearchMode,
}

impl MatchAgainst {
    pub fn new(columns: Vec<Expr>, search: Expr, mode: SearchMode) -> Self {
        Self {
            columns,
            search: Box::new(search),
            mode,
        }
    }
}

impl Compile for MatchAgainst {
    fn compile(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        if self.columns.is_empty() {
            return Err(QueryError::coding("MATCH requires at least one column"));
        }
        let columns = self
            .columns
            .iter()
            .map(|c| c.compile(scope))
            .collect::<Result<Vec<_>, _>>()?;
        let mut out = Fragment::join(columns, ", ").wrap("MATCH (", ") AGAINST (");
        out.push(self.search.compile(scope)?);
        out.push_str(self.mode.as_sql());
        out.push_str(")");
        Ok(out)
    }

    fn resolve(&mut self, scope: &Scope<'_>) -> Result<(), QueryError> {
        self.columns.iter_mut().try_for_each(|c| c.resolve(scope))?;
        self.search.resolve(scope)
    }
}
