//! Configuration file handling.
//!
//! This module provides loading and parsing of `.sql_compose.json` configuration files:
//! the target dialect, the physical table prefix, the table catalog, and the filter
//! column map of each table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::dialect::Dialect;
use crate::filter::FilterColumns;
use crate::schema::{Schema, SchemaError, SchemaProvider, StaticSchema};

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".sql_compose.json";

/// Top-level configuration file structure.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Target database flavor
    #[serde(default)]
    pub dialect: Dialect,

    /// Prefix prepended to every `{table}` placeholder on expansion
    #[serde(default)]
    pub table_prefix: String,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default)]
    pub log_filter: Option<String>,

    /// Table catalog: `{"table": {"column": {"position": 1, "type": "int"}}}`
    #[serde(default)]
    pub schema: StaticSchema,

    /// Filter column maps by table; `null` marks a memory-only column
    #[serde(default)]
    pub filters: BTreeMap<String, FilterColumns>,
}

impl ConfigFile {
    /// Load configuration from `.sql_compose.json` in the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file doesn't exist
    /// - The file cannot be read
    /// - The JSON is invalid
    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = PathBuf::from(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(format!(
                "Configuration file not found: {name}\n\n\
                 Please create a {name} file in the current directory or pass --config.\n\n\
                 Example:\n\
                 {{\n  \
                   \"dialect\": \"mysql\",\n  \
                   \"table_prefix\": \"app_\",\n  \
                   \"schema\": {{\n    \
                     \"users\": {{\"id\": {{\"position\": 1, \"type\": \"int\"}}}}\n  \
                   }},\n  \
                   \"filters\": {{\n    \
                     \"users\": {{\"id\": \"users.id\", \"score\": null}}\n  \
                   }}\n\
                 }}\n",
                name = CONFIG_FILE_NAME
            )
            .into());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(path).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to read {}: {}", path.display(), e),
            )) as Box<dyn Error>
        })?;

        let config: ConfigFile = serde_json::from_str(&content).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Invalid JSON in {}: {}", path.display(), e),
            )) as Box<dyn Error>
        })?;

        Ok(config)
    }

    /// Load from `path` when given, otherwise from the current directory.
    pub fn resolve(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Filter column map of `table`.
    pub fn filter_columns(&self, table: &str) -> Result<&FilterColumns, Box<dyn Error>> {
        self.filters
            .get(table)
            .ok_or_else(|| format!("No filter columns configured for table '{}'", table).into())
    }

    /// A schema cache over a copy of the configured catalog.
    pub fn schema_cache(&self) -> Result<Arc<Schema>, SchemaError> {
        let catalog = StaticSchema::new();
        for name in self.schema.table_names() {
            catalog.define_table(&name, self.schema.get_columns(&name)?);
        }
        Ok(Arc::new(Schema::new(catalog).with_dialect(self.dialect)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ColumnTarget;
    use crate::test_utils::create_temp_json_file;
    use serial_test::serial;

    const FULL_CONFIG: &str = r#"
    {
        "dialect": "sqlite",
        "table_prefix": "app_",
        "log_filter": "sql_compose=debug",
        "schema": {
            "users": {
                "id": {"position": 1, "nullable": false, "type": "int"},
                "name": {"position": 2, "type": "varchar"}
            }
        },
        "filters": {
            "users": {"name": "users.name", "score": null}
        }
    }
    "#;

    #[test]
    fn test_full_deserialization() {
        let config: ConfigFile = serde_json::from_str(FULL_CONFIG).unwrap();
        assert_eq!(config.dialect, Dialect::Sqlite);
        assert_eq!(config.table_prefix, "app_");
        assert_eq!(config.log_filter.as_deref(), Some("sql_compose=debug"));
        assert_eq!(config.schema.get_columns("users").unwrap().len(), 2);

        let columns = config.filter_columns("users").unwrap();
        assert_eq!(columns.target("name"), Some(ColumnTarget::Sql("users.name".to_string())));
        assert_eq!(columns.target("score"), Some(ColumnTarget::MemoryOnly));
    }

    #[test]
    fn test_defaults() {
        let config: ConfigFile = serde_json::from_str("{}").unwrap();
        assert_eq!(config.dialect, Dialect::Mysql);
        assert!(config.table_prefix.is_empty());
        assert!(config.log_filter.is_none());
        assert!(config.filters.is_empty());
    }

    #[test]
    fn test_unknown_dialect_rejected() {
        let result: Result<ConfigFile, _> = serde_json::from_str(r#"{"dialect": "oracle"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_filter_columns() {
        let config = ConfigFile::default();
        let err = config.filter_columns("users").unwrap_err();
        assert!(err.to_string().contains("users"));
    }

    #[test]
    fn test_schema_cache_keeps_dialect() {
        let config: ConfigFile = serde_json::from_str(FULL_CONFIG).unwrap();
        let schema = config.schema_cache().unwrap();
        assert_eq!(schema.dialect(), Dialect::Sqlite);
        assert!(schema.table("users").is_ok());
    }

    #[test]
    fn test_load_from_path() {
        let file = create_temp_json_file(FULL_CONFIG);
        let config = ConfigFile::load_from(file.path()).unwrap();
        assert_eq!(config.table_prefix, "app_");
    }

    #[test]
    fn test_load_from_invalid_json() {
        let file = create_temp_json_file("{ invalid json }");
        let err = ConfigFile::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    #[serial]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let old_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = ConfigFile::load();

        std::env::set_current_dir(old_dir).unwrap();
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    #[serial]
    fn test_load_from_current_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), FULL_CONFIG).unwrap();
        let old_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = ConfigFile::resolve(None);

        std::env::set_current_dir(old_dir).unwrap();
        assert_eq!(result.unwrap().dialect, Dialect::Sqlite);
    }
}
