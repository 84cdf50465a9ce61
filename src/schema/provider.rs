//! The schema collaborator: where table catalogs come from.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::{ColumnInfo, SchemaError};

/// Column catalog of one table, keyed by column name.
pub type ColumnMap = BTreeMap<String, ColumnInfo>;

/// Source of table catalogs.
///
/// Implementations must report an unknown table as [`SchemaError::TableNotFound`]
/// so that callers can provision the table and retry.
pub trait SchemaProvider: Send + Sync {
    /// Return the columns of `table`.
    fn get_columns(&self, table: &str) -> Result<ColumnMap, SchemaError>;
}

/// Schema provider backed by an in-memory table map.
///
/// Deserializes from `{"table": {"column": {"position": 1, "type": "int"}}}`.
/// Tables can be added after construction, which is how provisioning hooks
/// make a missing table appear.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticSchema {
    tables: RwLock<HashMap<String, ColumnMap>>,
}

impl StaticSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a table definition.
    pub fn with_table<I, S>(self, name: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = (S, ColumnInfo)>,
        S: Into<String>,
    {
        self.define_table(name, columns);
        self
    }

    /// Add (or replace) a table definition through a shared reference.
    pub fn define_table<I, S>(&self, name: &str, columns: I)
    where
        I: IntoIterator<Item = (S, ColumnInfo)>,
        S: Into<String>,
    {
        let columns = columns.into_iter().map(|(n, c)| (n.into(), c)).collect();
        self.tables.write().insert(name.to_string(), columns);
    }

    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json).map_err(|e| SchemaError::InvalidSchema {
            message: e.to_string(),
        })
    }
}

impl SchemaProvider for StaticSchema {
    fn get_columns(&self, table: &str) -> Result<ColumnMap, SchemaError> {
        self.tables
            .read()
            .get(table)
            .cloned()
            .ok_or_else(|| SchemaError::TableNotFound {
                table: table.to_string(),
            })
    }
}

impl<P: SchemaProvider + ?Sized> SchemaProvider for std::sync::Arc<P> {
    fn get_columns(&self, table: &str) -> Result<ColumnMap, SchemaError> {
        (**self).get_columns(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataType;

    #[test]
    fn test_static_schema_lookup() {
        let schema = StaticSchema::new().with_table("users", [("id", ColumnInfo::new(1, DataType::Int))]);
        let columns = schema.get_columns("users").unwrap();
        assert!(columns.contains_key("id"));
    }

    #[test]
    fn test_static_schema_missing_table() {
        let schema = StaticSchema::new();
        let err = schema.get_columns("nope").unwrap_err();
        assert!(matches!(err, SchemaError::TableNotFound { table } if table == "nope"));
    }

    #[test]
    fn test_static_schema_from_json() {
        let schema = StaticSchema::from_json_str(
            r#"{"users": {"id": {"position": 1, "type": "int"}, "name": {"position": 2, "type": "text"}}}"#,
        )
        .unwrap();
        assert_eq!(schema.table_names(), vec!["users".to_string()]);
        assert_eq!(schema.get_columns("users").unwrap().len(), 2);
    }

    #[test]
    fn test_static_schema_invalid_json() {
        let err = StaticSchema::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema { .. }));
    }
}
