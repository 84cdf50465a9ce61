//! Fetch and mutation entry points.
//!
//! Every method here resolves the statement's column references first, then
//! compiles one statement and hands it to the [`Executor`]. Fetch shapes are
//! variations of the same SELECT that only change the projection and limit.

use tracing::{debug, warn};

use crate::executor::{ExecResult, Executor, Row};
use crate::expr::{ArithmeticOp, Compile, Expr};
use crate::value::Value;

use super::{CompiledQuery, Conditional, Limit, Operand, Predicate, Query, QueryError, Scope, Source, StatementKind};

impl Query {
    /// Validate and cache every column reference in the statement tree.
    pub fn resolve(&mut self) -> Result<(), QueryError> {
        self.resolve_within(None)
    }

    pub(crate) fn resolve_within(&mut self, parent: Option<&Scope<'_>>) -> Result<(), QueryError> {
        if let Source::SubQuery(inner) = &mut self.from {
            inner.resolve_within(parent)?;
        }
        for join in &mut self.joins {
            if let Source::SubQuery(inner) = &mut join.target {
                inner.resolve_within(parent)?;
            }
        }

        let scope = self.scope_within(parent);
        for entry in &mut self.select {
            entry.expr.resolve(&scope)?;
        }
        for join in &mut self.joins {
            join.on.resolve(&scope)?;
        }
        self.conditions.resolve(&scope)?;
        for group in &mut self.groups {
            group.resolve(&scope)?;
        }
        self.having.resolve(&scope)?;
        for order in &mut self.orders {
            order.resolve(&scope)?;
        }
        for (_, expr) in &mut self.sets {
            expr.resolve(&scope)?;
        }
        Ok(())
    }

    pub(crate) fn run(&self, executor: &dyn Executor, compiled: &CompiledQuery) -> Result<ExecResult, QueryError> {
        debug!(
            backend = executor.backend_name(),
            sql = %compiled.sql,
            params = compiled.params.len(),
            "executing statement"
        );
        executor
            .execute(&compiled.sql, &compiled.params, self.limit.from, self.limit.count)
            .map_err(|e| QueryError::Execution { message: e.to_string() })
    }

    pub(crate) fn fetch_rows(&self, executor: &dyn Executor) -> Result<Vec<Row>, QueryError> {
        let compiled = self.compile()?;
        match self.run(executor, &compiled)? {
            ExecResult::Rows(rows) => Ok(rows),
            other => Err(unexpected("rows", &other)),
        }
    }

    /// Copy of this statement for a fetch shape, with resolution done.
    fn shaped(&mut self) -> Result<Query, QueryError> {
        self.resolve()?;
        Ok(self.clone())
    }

    /// The first matching row.
    pub fn first(&mut self, executor: &dyn Executor) -> Result<Option<Row>, QueryError> {
        let mut query = self.shaped()?;
        query.limit.count = 1;
        Ok(query.fetch_rows(executor)?.into_iter().next())
    }

    pub fn all(&mut self, executor: &dyn Executor) -> Result<Vec<Row>, QueryError> {
        self.resolve()?;
        self.fetch_rows(executor)
    }

    /// Number of matching rows, or of groups when the statement groups or is DISTINCT.
    pub fn count(&mut self, executor: &dyn Executor) -> Result<u64, QueryError> {
        let mut query = self.shaped()?;
        query.orders.clear();
        let mut query = if query.groups.is_empty() && !query.distinct {
            query.clear_select();
            query.limit = Limit::default();
            query
        } else {
            Query::derived(query, Some("counted"))?
        };
        query.select_expr(Expr::count_all(), Some("count"))?;
        let rows = query.fetch_rows(executor)?;
        let count = rows
            .first()
            .and_then(|row| row.get("count"))
            .and_then(Value::as_i64)
            .unwrap_or(0);
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// `SUM(column)` over the matching rows; `NULL` when there are none.
    pub fn sum(&mut self, executor: &dyn Executor, column: &str) -> Result<Value, QueryError> {
        let mut query = self.shaped()?;
        query.orders.clear();
        query.clear_select();
        query.limit = Limit::default();
        query.select_expr(Expr::func("SUM", vec![Expr::column(column)]), Some("sum"))?;
        query.resolve()?;
        let rows = query.fetch_rows(executor)?;
        Ok(rows.first().and_then(|row| row.get("sum")).cloned().unwrap_or_default())
    }

    /// One column of every matching row.
    pub fn values(&mut self, executor: &dyn Executor, column: &str) -> Result<Vec<Value>, QueryError> {
        let mut query = self.shaped()?;
        query.clear_select();
        query.select(&[column]);
        query.resolve()?;
        let key = column.rsplit('.').next().unwrap_or(column);
        let rows = query.fetch_rows(executor)?;
        Ok(rows
            .into_iter()
            .map(|mut row| match row.remove(key) {
                Some(value) => value,
                None => row.into_values().next().unwrap_or_default(),
            })
            .collect())
    }

    /// Whether any row matches; projects a constant instead of real columns.
    pub fn exists(&mut self, executor: &dyn Executor) -> Result<bool, QueryError> {
        let mut query = self.shaped()?;
        query.clear_select();
        query.orders.clear();
        query.select_expr(Expr::trusted(1), Some("present"))?;
        query.limit.count = 1;
        Ok(!query.fetch_rows(executor)?.is_empty())
    }

    /// INSERT the `set()` values; returns the generated key, `NULL` when the driver has none.
    pub fn insert(&mut self, executor: &dyn Executor) -> Result<Value, QueryError> {
        self.primary_table("insert")?;
        self.resolve()?;
        let compiled = self.compile_statement(StatementKind::Insert)?;
        match self.run(executor, &compiled)? {
            ExecResult::Inserted(id) => Ok(id),
            ExecResult::Affected(_) => Ok(Value::Null),
            other => Err(unexpected("inserted id", &other)),
        }
    }

    /// UPDATE the matching rows with the `set()` values; returns the affected count.
    pub fn update(&mut self, executor: &dyn Executor) -> Result<u64, QueryError> {
        self.primary_table("update")?;
        self.resolve()?;
        let compiled = self.compile_statement(StatementKind::Update)?;
        affected(self.run(executor, &compiled)?)
    }

    /// `column = column + amount` on the matching rows.
    pub fn increase(&mut self, executor: &dyn Executor, column: &str, amount: impl Into<Value>) -> Result<u64, QueryError> {
        self.adjust(executor, column, ArithmeticOp::Add, amount.into())
    }

    /// `column = column - amount` on the matching rows.
    pub fn decrease(&mut self, executor: &dyn Executor, column: &str, amount: impl Into<Value>) -> Result<u64, QueryError> {
        self.adjust(executor, column, ArithmeticOp::Sub, amount.into())
    }

    fn adjust(&mut self, executor: &dyn Executor, column: &str, op: ArithmeticOp, amount: Value) -> Result<u64, QueryError> {
        self.set_expr(column, Expr::arithmetic(Expr::column(column), op, Expr::value(amount)))?;
        self.update(executor)
    }

    /// DELETE the matching rows.
    ///
    /// Returns `false` without touching the database when there are no
    /// conditions; use [`truncate`](Self::truncate) to empty a table.
    pub fn delete(&mut self, executor: &dyn Executor) -> Result<bool, QueryError> {
        let table = self.primary_table("delete")?.name().to_string();
        if self.conditions.is_empty() {
            warn!(table = %table, "refusing DELETE without conditions");
            return Ok(false);
        }
        self.resolve()?;
        let compiled = self.compile_statement(StatementKind::Delete)?;
        self.run(executor, &compiled)?;
        Ok(true)
    }

    pub fn truncate(&mut self, executor: &dyn Executor) -> Result<(), QueryError> {
        let compiled = self.compile_statement(StatementKind::Truncate)?;
        self.run(executor, &compiled)?;
        Ok(())
    }

    /// The first row matching `attributes`, inserting one when there is none.
    ///
    /// The returned row holds the attributes plus the generated `id` for new rows.
    pub fn first_or_create(&mut self, executor: &dyn Executor, attributes: &[(&str, Value)]) -> Result<Row, QueryError> {
        let table = self.primary_table("first_or_create")?.clone();
        let entries = attributes
            .iter()
            .map(|(name, value)| (name.to_string(), Operand::Value(value.clone())))
            .collect();
        let mut lookup = self.clone();
        lookup.where_(Predicate::Map(entries));
        if let Some(row) = lookup.first(executor)? {
            return Ok(row);
        }

        let mut insert = Query::table(&self.schema, table.name())?;
        for (name, value) in attributes {
            insert.set(name, value.clone())?;
        }
        let id = insert.insert(executor)?;

        let mut row: Row = attributes.iter().map(|(name, value)| (name.to_string(), value.clone())).collect();
        if !id.is_null() && table.has_column("id") {
            row.entry("id".to_string()).or_insert(id);
        }
        Ok(row)
    }
}

fn affected(result: ExecResult) -> Result<u64, QueryError> {
    match result {
        ExecResult::Affected(n) => Ok(n),
        other => Err(unexpected("affected count", &other)),
    }
}

fn unexpected(expected: &str, got: &ExecResult) -> QueryError {
    QueryError::Execution {
        message: format!("expected {} from executor, got {}", expected, got.kind()),
    }
}
