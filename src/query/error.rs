use thiserror::Error;

use crate::schema::SchemaError;

/// Errors raised while building, compiling or running a statement.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Invalid identifier '{name}'")]
    InvalidIdentifier { name: String },

    #[error("Unknown column '{column}' in '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("Unknown table '{table}'")]
    UnknownTable { table: String },

    /// Misuse of the builder API; fix the caller, do not retry
    #[error("Coding error: {message}")]
    Coding { message: String },

    #[error("Missing value for named parameter ':{name}'")]
    MissingParameter { name: String },

    #[error("Statement has {expected} placeholders but {actual} parameters were given")]
    ParameterCountMismatch { expected: usize, actual: usize },

    #[error("'{operation}' is not supported on a sub-query source")]
    UnsupportedOnSubquery { operation: String },

    #[error("Alias '{alias}' is already in use in this statement")]
    DuplicateAlias { alias: String },

    #[error("Statement execution failed: {message}")]
    Execution { message: String },

    #[error("Schema error: {message}")]
    Schema { message: String },
}

impl QueryError {
    pub(crate) fn coding(message: impl Into<String>) -> Self {
        QueryError::Coding {
            message: message.into(),
        }
    }

    /// True for errors caused by misuse of the builder API.
    pub fn is_coding_error(&self) -> bool {
        matches!(
            self,
            QueryError::Coding { .. }
                | QueryError::UnsupportedOnSubquery { .. }
                | QueryError::DuplicateAlias { .. }
                | QueryError::MissingParameter { .. }
                | QueryError::ParameterCountMismatch { .. }
        )
    }
}

impl From<SchemaError> for QueryError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::TableNotFound { table } => QueryError::UnknownTable { table },
            SchemaError::ColumnNotFound { table, column } => QueryError::UnknownColumn { table, column },
            SchemaError::InvalidName { name } => QueryError::InvalidIdentifier { name },
            SchemaError::InvalidSchema { message } => QueryError::Schema { message },
        }
    }
}
