use std::sync::Arc;

use tracing::{trace, warn};

use super::{Compile, Fragment, NativeValue};
use crate::escape::{is_identifier, quote_identifier, table_placeholder};
use crate::query::{QueryError, Scope, SourceKind};
use crate::schema::Table;

/// What a column belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnOwner {
    /// A physical table, optionally reached through an alias
    Table { table: Arc<Table>, alias: Option<String> },
    /// A sub-query source; its projection is opaque so the column is not validated
    Derived { alias: String },
    /// A projection alias of the current statement
    Projection,
    /// Unvalidated identifier from a raw builder call
    Raw { qualifier: Option<String> },
}

/// A `table.column` reference that is known to exist.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    owner: ColumnOwner,
    name: String,
}

impl Column {
    /// Reference `name` on `table`, failing if the table has no such column.
    pub fn of(table: &Arc<Table>, name: &str) -> Result<Column, QueryError> {
        if !table.has_column(name) {
            return Err(QueryError::UnknownColumn {
                table: table.name().to_string(),
                column: name.to_string(),
            });
        }
        Ok(Column {
            owner: ColumnOwner::Table {
                table: Arc::clone(table),
                alias: None,
            },
            name: name.to_string(),
        })
    }

    pub(crate) fn new(owner: ColumnOwner, name: impl Into<String>) -> Column {
        Column {
            owner,
            name: name.into(),
        }
    }

    /// An identifier taken verbatim from a raw builder call, checked only for syntax.
    pub fn raw(text: &str) -> Result<Column, QueryError> {
        let (qualifier, name) = split_reference(text).ok_or_else(|| QueryError::InvalidIdentifier {
            name: text.to_string(),
        })?;
        Ok(Column::new(
            ColumnOwner::Raw {
                qualifier: qualifier.map(str::to_string),
            },
            name,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &ColumnOwner {
        &self.owner
    }

    /// The physical table, if the column belongs to one.
    pub fn table(&self) -> Option<&Arc<Table>> {
        match &self.owner {
            ColumnOwner::Table { table, .. } => Some(table),
            _ => None,
        }
    }
}

impl Compile for Column {
    fn compile(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        let column = quote_identifier(&self.name);
        let sql = match &self.owner {
            ColumnOwner::Table { table, alias } => match alias {
                Some(alias) if scope.alias_visible(alias) => {
                    format!("{}.{}", quote_identifier(alias), column)
                }
                _ => format!("{}.{}", table_placeholder(table.name()), column),
            },
            ColumnOwner::Derived { alias } => format!("{}.{}", quote_identifier(alias), column),
            ColumnOwner::Projection => column,
            ColumnOwner::Raw { qualifier } => match qualifier {
                Some(q) => format!("{}.{}", quote_identifier(q), column),
                None => column,
            },
        };
        Ok(Fragment::sql(sql))
    }
}

/// Resolution state of a [`PartialColumn`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnState {
    Unresolved,
    Column(Column),
    Literal(NativeValue),
}

/// A `column` or `qualifier.column` reference not yet checked against a schema.
///
/// The owning table is often only known from statement context (aliases,
/// joins, sub-query sources), so validation waits until the reference is
/// resolved within a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialColumn {
    text: String,
    fallback: bool,
    state: ColumnState,
}

impl PartialColumn {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fallback: false,
            state: ColumnState::Unresolved,
        }
    }

    /// A reference that becomes the literal string `text` when it cannot be resolved.
    ///
    /// Used where a dotted token may be either `table.column` or plain text.
    pub fn with_fallback(text: impl Into<String>) -> Self {
        Self {
            fallback: true,
            ..Self::new(text)
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> &ColumnState {
        &self.state
    }

    /// Decide what this reference means within `scope`, without caching.
    pub fn resolution(&self, scope: &Scope<'_>) -> Result<ColumnState, QueryError> {
        let Some((qualifier, name)) = split_reference(&self.text) else {
            return self.fall_back(QueryError::InvalidIdentifier {
                name: self.text.clone(),
            });
        };

        match qualifier {
            Some(qualifier) => {
                let Some(source) = scope.lookup(qualifier) else {
                    return self.fall_back(QueryError::UnknownTable {
                        table: qualifier.to_string(),
                    });
                };
                match &source.kind {
                    SourceKind::Derived => Ok(ColumnState::Column(Column::new(
                        ColumnOwner::Derived {
                            alias: source.alias.clone().unwrap_or_else(|| qualifier.to_string()),
                        },
                        name,
                    ))),
                    SourceKind::Table(table) if table.has_column(name) => Ok(ColumnState::Column(Column::new(
                        ColumnOwner::Table {
                            table: Arc::clone(table),
                            alias: source.alias.clone(),
                        },
                        name,
                    ))),
                    SourceKind::Table(table) => self.fall_back(QueryError::UnknownColumn {
                        table: table.name().to_string(),
                        column: name.to_string(),
                    }),
                }
            }
            None => {
                if let Some(primary) = scope.primary() {
                    if let SourceKind::Derived = primary.kind {
                        let alias = primary.alias.clone().unwrap_or_default();
                        return Ok(ColumnState::Column(Column::new(ColumnOwner::Derived { alias }, name)));
                    }
                }
                if let Some(source) = scope.find_column_source(name) {
                    if let SourceKind::Table(table) = &source.kind {
                        return Ok(ColumnState::Column(Column::new(
                            ColumnOwner::Table {
                                table: Arc::clone(table),
                                alias: source.alias.clone(),
                            },
                            name,
                        )));
                    }
                }
                if scope.has_projection(name) {
                    return Ok(ColumnState::Column(Column::new(ColumnOwner::Projection, name)));
                }
                let table = scope.primary_table_name().unwrap_or_default();
                self.fall_back(QueryError::UnknownColumn {
                    table,
                    column: name.to_string(),
                })
            }
        }
    }

    fn fall_back(&self, err: QueryError) -> Result<ColumnState, QueryError> {
        if self.fallback {
            warn!(text = %self.text, reason = %err, "column reference degraded to literal");
            Ok(ColumnState::Literal(NativeValue::trusted(self.text.clone())))
        } else {
            Err(err)
        }
    }
}

impl Compile for PartialColumn {
    fn compile(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        match &self.state {
            ColumnState::Column(column) => column.compile(scope),
            ColumnState::Literal(literal) => literal.compile(scope),
            ColumnState::Unresolved => match self.resolution(scope)? {
                ColumnState::Column(column) => column.compile(scope),
                ColumnState::Literal(literal) => literal.compile(scope),
                ColumnState::Unresolved => Err(QueryError::InvalidIdentifier {
                    name: self.text.clone(),
                }),
            },
        }
    }

    fn resolve(&mut self, scope: &Scope<'_>) -> Result<(), QueryError> {
        if matches!(self.state, ColumnState::Unresolved) {
            let state = self.resolution(scope)?;
            trace!(text = %self.text, state = ?state, "resolved column reference");
            self.state = state;
        }
        Ok(())
    }
}

/// Split `a.b` into `(Some("a"), "b")` and `b` into `(None, "b")`.
///
/// Returns `None` unless every part is a plain identifier.
pub(crate) fn split_reference(text: &str) -> Option<(Option<&str>, &str)> {
    let text = text.trim();
    match text.split_once('.') {
        Some((qualifier, name)) if is_identifier(qualifier) && is_identifier(name) => Some((Some(qualifier), name)),
        Some(_) => None,
        None if is_identifier(text) => Some((None, text)),
        None => None,
    }
}
