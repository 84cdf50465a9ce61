//! Shared test utilities for unit tests.

use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::config::ConfigFile;
use crate::dialect::Dialect;
use crate::fixtures;
use crate::query::{Query, Scope};
use crate::schema::{Schema, StaticSchema};

/// Create a temporary file containing the given content.
pub fn create_temp_json_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

/// The fixture catalog as a schema provider.
pub fn static_schema() -> StaticSchema {
    StaticSchema::from_json_str(fixtures::SCHEMA).expect("Fixture schema should parse")
}

/// Schema cache over the fixture catalog, MySQL dialect.
pub fn test_schema() -> Arc<Schema> {
    test_schema_with_dialect(Dialect::Mysql)
}

pub fn test_schema_with_dialect(dialect: Dialect) -> Arc<Schema> {
    Arc::new(Schema::new(static_schema()).with_dialect(dialect))
}

/// Scope of a plain `SELECT ... FROM users`.
pub fn users_scope() -> Scope<'static> {
    Query::table(&test_schema(), "users")
        .expect("users table should exist")
        .scope()
}

/// Configuration over the fixture catalog with the `users` filter columns.
pub fn test_config() -> ConfigFile {
    let json = format!(
        r#"{{"dialect": "mysql", "table_prefix": "app_", "schema": {}, "filters": {{"users": {}}}}}"#,
        fixtures::SCHEMA,
        fixtures::USER_COLUMNS
    );
    serde_json::from_str(&json).expect("Fixture config should parse")
}
