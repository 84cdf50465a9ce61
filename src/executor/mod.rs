//! Boundary to the database driver that runs compiled statements.
//!
//! The compiler never talks to storage. Fetch and mutate operations on
//! [`Query`](crate::query::Query) hand their compiled SQL to an [`Executor`],
//! which is responsible for expanding `{table}` placeholders, binding the
//! positional parameters and returning rows or counts.

mod memory;

pub use memory::{ExecutedStatement, RecordingExecutor};

use std::collections::BTreeMap;
use std::error::Error;

use crate::escape::{is_identifier, quote_identifier};
use crate::value::Value;

/// One result row keyed by column name.
pub type Row = BTreeMap<String, Value>;

pub type ExecutorError = Box<dyn Error + Send + Sync>;

/// What a statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecResult {
    Rows(Vec<Row>),
    Affected(u64),
    /// The generated key of an INSERT
    Inserted(Value),
}

impl ExecResult {
    pub fn kind(&self) -> &'static str {
        match self {
            ExecResult::Rows(_) => "rows",
            ExecResult::Affected(_) => "affected count",
            ExecResult::Inserted(_) => "inserted id",
        }
    }
}

/// Trait for drivers that can run compiled statements.
pub trait Executor: Send + Sync {
    /// Run `sql` with positional `params`.
    ///
    /// `offset` and `limit` repeat the statement's LIMIT window (0 when
    /// unbounded) for drivers that page natively instead of reading the SQL.
    fn execute(&self, sql: &str, params: &[Value], offset: u64, limit: u64) -> Result<ExecResult, ExecutorError>;

    /// Run a statement that has no parameters and no window.
    fn execute_no_params(&self, sql: &str) -> Result<ExecResult, ExecutorError> {
        self.execute(sql, &[], 0, 0)
    }

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str {
        "unknown"
    }
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, sql: &str, params: &[Value], offset: u64, limit: u64) -> Result<ExecResult, ExecutorError> {
        (**self).execute(sql, params, offset, limit)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

/// Replace `{table}` placeholders with quoted, prefixed physical table names.
///
/// Placeholders inside quoted strings or identifiers are left alone, as are
/// braces that do not enclose a plain identifier.
pub fn expand_table_placeholders(sql: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 16);
    let mut quote: Option<char> = None;
    let mut chars = sql.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some((_, escaped)) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                out.push(c);
            }
            '{' => {
                let rest = &sql[i + 1..];
                match rest.find('}') {
                    Some(end) if is_identifier(&rest[..end]) => {
                        out.push_str(&quote_identifier(&format!("{}{}", prefix, &rest[..end])));
                        // Skip the name and the closing brace
                        for _ in 0..=rest[..end].chars().count() {
                            chars.next();
                        }
                    }
                    _ => out.push(c),
                }
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("SELECT * FROM {users}", "", "SELECT * FROM `users`")]
    #[case("SELECT * FROM {users} AS `u`", "app_", "SELECT * FROM `app_users` AS `u`")]
    #[case(
        "SELECT {users}.`id` FROM {users} INNER JOIN {orders}",
        "p_",
        "SELECT `p_users`.`id` FROM `p_users` INNER JOIN `p_orders`"
    )]
    #[case("SELECT '{users}' FROM {users}", "x_", "SELECT '{users}' FROM `x_users`")]
    #[case("SELECT '{it''s}', 'a\\'{b}'", "x_", "SELECT '{it''s}', 'a\\'{b}'")]
    #[case("SELECT {not a table}", "x_", "SELECT {not a table}")]
    fn test_expand_table_placeholders(#[case] sql: &str, #[case] prefix: &str, #[case] expected: &str) {
        assert_eq!(expand_table_placeholders(sql, prefix), expected);
    }

    #[rstest]
    fn test_default_helpers() {
        let executor = RecordingExecutor::new();
        executor.execute_no_params("TRUNCATE TABLE {users}").unwrap();
        let call = executor.last().unwrap();
        assert!(call.params.is_empty());
        assert_eq!(call.limit, 0);
        assert_eq!(executor.backend_name(), "recording");
    }
}
