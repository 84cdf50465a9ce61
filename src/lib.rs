//! sql_compose library - Composable SQL statement builder
//!
//! Builds parameterized SQL from an expression tree resolved against a table
//! catalog, lowers declarative JSON filters into conditions or evaluates them
//! against records in memory, and hands compiled statements to an executor.

pub mod cli;
pub mod commands;
pub mod config;
pub mod dialect;
pub mod escape;
pub mod executor;
pub mod expr;
pub mod filter;
pub mod output;
pub mod query;
pub mod schema;
pub mod value;

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod fixtures;

#[cfg(test)]
pub mod test_utils;

pub use dialect::Dialect;
pub use executor::{ExecResult, Executor, Row};
pub use expr::Expr;
pub use filter::QueryFilter;
pub use query::{CompiledQuery, ConditionGroup, Conditional, Query, QueryError};
pub use schema::{Schema, StaticSchema};
pub use value::Value;
