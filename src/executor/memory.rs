use std::collections::VecDeque;

use parking_lot::Mutex;

use super::{ExecResult, Executor, ExecutorError, Row};
use crate::value::Value;

/// A statement as it reached the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedStatement {
    pub sql: String,
    pub params: Vec<Value>,
    pub offset: u64,
    pub limit: u64,
}

/// An executor that records every statement and replays queued results.
///
/// Without a queued result, SELECT-like statements return no rows, INSERT
/// returns a `NULL` id and anything else reports zero affected rows.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    statements: Mutex<Vec<ExecutedStatement>>,
    responses: Mutex<VecDeque<Result<ExecResult, String>>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next statement.
    pub fn respond(&self, result: ExecResult) -> &Self {
        self.responses.lock().push_back(Ok(result));
        self
    }

    pub fn respond_rows(&self, rows: Vec<Row>) -> &Self {
        self.respond(ExecResult::Rows(rows))
    }

    /// Make the next statement fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) -> &Self {
        self.responses.lock().push_back(Err(message.into()));
        self
    }

    pub fn statements(&self) -> Vec<ExecutedStatement> {
        self.statements.lock().clone()
    }

    pub fn last(&self) -> Option<ExecutedStatement> {
        self.statements.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.statements.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.lock().is_empty()
    }
}

impl Executor for RecordingExecutor {
    fn execute(&self, sql: &str, params: &[Value], offset: u64, limit: u64) -> Result<ExecResult, ExecutorError> {
        self.statements.lock().push(ExecutedStatement {
            sql: sql.to_string(),
            params: params.to_vec(),
            offset,
            limit,
        });
        match self.responses.lock().pop_front() {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(message.into()),
            None => Ok(default_result(sql)),
        }
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

fn default_result(sql: &str) -> ExecResult {
    let verb = sql.split_whitespace().next().unwrap_or_default().to_ascii_uppercase();
    match verb.as_str() {
        "SELECT" | "WITH" | "SHOW" => ExecResult::Rows(Vec::new()),
        "INSERT" => ExecResult::Inserted(Value::Null),
        _ => ExecResult::Affected(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_and_replays() {
        let executor = RecordingExecutor::new();
        executor.respond(ExecResult::Affected(3));
        let result = executor.execute("UPDATE {users} SET `a` = ?", &[Value::Int(1)], 0, 0).unwrap();
        assert_eq!(result, ExecResult::Affected(3));
        assert_eq!(executor.len(), 1);
        assert_eq!(executor.last().unwrap().params, vec![Value::Int(1)]);
    }

    #[test]
    fn test_defaults_by_statement_verb() {
        let executor = RecordingExecutor::new();
        assert_eq!(executor.execute("SELECT 1", &[], 0, 0).unwrap(), ExecResult::Rows(vec![]));
        assert_eq!(
            executor.execute("INSERT INTO {users} (`a`) VALUES (?)", &[], 0, 0).unwrap(),
            ExecResult::Inserted(Value::Null)
        );
        assert_eq!(executor.execute("DELETE FROM {users}", &[], 0, 0).unwrap(), ExecResult::Affected(0));
    }

    #[test]
    fn test_queued_failure() {
        let executor = RecordingExecutor::new();
        executor.fail_next("connection reset");
        let err = executor.execute("SELECT 1", &[], 0, 0).unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
    }
}
