//! Table catalogs and the schema cache.
//!
//! # Overview
//!
//! 1. **Metadata** (`definition.rs`): `DataType` and `ColumnInfo`, the per-column
//!    facts reported by the schema collaborator.
//! 2. **Providers** (`provider.rs`): the `SchemaProvider` trait and `StaticSchema`,
//!    a JSON-loadable in-memory provider.
//! 3. **Cache** (`table.rs`): `Schema`, a read-through cache handing out shared,
//!    immutable `Table` objects, one per table name.
//!
//! A `Schema` is owned by the application and shared with every statement via
//! `Arc`. Readers never block each other; the first load of a table name takes
//! the write lock so concurrent first loads of the same name are serialized.

mod definition;
mod provider;
mod table;

pub use definition::{ColumnInfo, DataType};
pub use provider::{ColumnMap, SchemaProvider, StaticSchema};
pub use table::{Schema, Table};

use thiserror::Error;

/// Schema lookup errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Table '{table}' not found")]
    TableNotFound { table: String },

    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    #[error("Invalid identifier '{name}'")]
    InvalidName { name: String },

    #[error("Invalid schema definition: {message}")]
    InvalidSchema { message: String },
}
