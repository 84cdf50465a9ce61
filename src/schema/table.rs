//! Memoized table catalogs.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::{ColumnInfo, ColumnMap, SchemaError, SchemaProvider};
use crate::dialect::Dialect;
use crate::escape::is_identifier;

/// A physical table and its column catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: ColumnMap,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: ColumnMap) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn column_info(&self, column: &str) -> Result<&ColumnInfo, SchemaError> {
        self.columns.get(column).ok_or_else(|| SchemaError::ColumnNotFound {
            table: self.name.clone(),
            column: column.to_string(),
        })
    }

    /// Column names ordered by their position in the table.
    pub fn column_names(&self) -> Vec<&str> {
        let mut columns: Vec<(&String, &ColumnInfo)> = self.columns.iter().collect();
        columns.sort_by(|a, b| (a.1.position, a.0).cmp(&(b.1.position, b.0)));
        columns.into_iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// Read-through cache of table catalogs, one shared `Table` per name.
pub struct Schema {
    provider: Box<dyn SchemaProvider>,
    tables: RwLock<HashMap<String, Arc<Table>>>,
    dialect: Dialect,
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("tables", &self.tables.read().keys().collect::<Vec<_>>())
            .field("dialect", &self.dialect)
            .finish()
    }
}

impl Schema {
    pub fn new(provider: impl SchemaProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            tables: RwLock::new(HashMap::new()),
            dialect: Dialect::default(),
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Return the table named `name`, loading its catalog on first use.
    pub fn table(&self, name: &str) -> Result<Arc<Table>, SchemaError> {
        if !is_identifier(name) {
            return Err(SchemaError::InvalidName {
                name: name.to_string(),
            });
        }

        if let Some(table) = self.tables.read().get(name) {
            return Ok(Arc::clone(table));
        }

        let mut tables = self.tables.write();
        if let Some(table) = tables.get(name) {
            return Ok(Arc::clone(table));
        }

        let columns = self.provider.get_columns(name)?;
        debug!(table = name, columns = columns.len(), "loaded table catalog");
        let table = Arc::new(Table::new(name, columns));
        tables.insert(name.to_string(), Arc::clone(&table));
        Ok(table)
    }

    /// Like [`Schema::table`], but on `TableNotFound` runs `provision` once and retries.
    pub fn table_or_provision<F>(&self, name: &str, provision: F) -> Result<Arc<Table>, SchemaError>
    where
        F: FnOnce(&str) -> Result<(), SchemaError>,
    {
        match self.table(name) {
            Err(SchemaError::TableNotFound { .. }) => {
                debug!(table = name, "table not found, provisioning");
                provision(name)?;
                self.table(name)
            }
            other => other,
        }
    }

    /// Drop a cached catalog so the next lookup reloads it.
    pub fn invalidate(&self, name: &str) {
        self.tables.write().remove(name);
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }
}
