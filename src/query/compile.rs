use serde::Serialize;
use tracing::debug;

use crate::escape::{quote_identifier, table_placeholder};
use crate::expr::{Compile, Expr, Fragment};
use crate::value::Value;

use super::{AliasId, Query, QueryError, Scope, Source};

/// The statement shapes a [`Query`] can compile to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementKind {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
    Truncate,
}

/// SQL with `?` and `{table}` placeholders, and its parameters in placeholder order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl From<Fragment> for CompiledQuery {
    fn from(fragment: Fragment) -> Self {
        CompiledQuery {
            sql: fragment.sql,
            params: fragment.params,
        }
    }
}

impl Query {
    /// Compile the SELECT statement.
    pub fn compile(&self) -> Result<CompiledQuery, QueryError> {
        self.compile_statement(StatementKind::Select)
    }

    /// Compile the statement as `kind`. A raw override wins over every shape.
    pub fn compile_statement(&self, kind: StatementKind) -> Result<CompiledQuery, QueryError> {
        let fragment = match kind {
            StatementKind::Select => self.compile_select_within(None)?,
            _ if self.raw.is_some() => self.compile_raw()?,
            StatementKind::Insert => self.compile_insert()?,
            StatementKind::Update => self.compile_update()?,
            StatementKind::Delete => self.compile_delete()?,
            StatementKind::Truncate => self.compile_truncate()?,
        };
        debug!(statement = ?kind, placeholders = fragment.params.len(), "compiled statement");
        Ok(fragment.into())
    }

    fn compile_raw(&self) -> Result<Fragment, QueryError> {
        match &self.raw {
            Some(raw) => raw.compile(&self.scope()),
            None => Err(QueryError::coding("no raw statement set")),
        }
    }

    pub(crate) fn compile_select_within(&self, parent: Option<&Scope<'_>>) -> Result<Fragment, QueryError> {
        if self.raw.is_some() {
            return self.compile_raw();
        }
        let scope = self.scope_within(parent);

        let mut out = Fragment::sql(if self.distinct { "SELECT DISTINCT " } else { "SELECT " });
        out.push(self.compile_projection(&scope)?);
        out.push_str(" FROM ");
        out.push(self.compile_source(&self.from, AliasId::Source(0), &scope)?);

        for (i, join) in self.joins.iter().enumerate() {
            out.push_str(" ");
            out.push_str(join.kind.as_sql());
            out.push_str(" ");
            out.push(self.compile_source(&join.target, AliasId::Source(i + 1), &scope)?);
            if !join.on.is_empty() && join.kind != super::JoinKind::Cross {
                out.push_str(" ON ");
                out.push(join.on.compile_clause(&scope)?);
            }
        }

        self.push_where(&mut out, &scope)?;

        if !self.groups.is_empty() {
            out.push_str(" GROUP BY ");
            out.push(compile_list(&self.groups, &scope)?);
        }
        if !self.having.is_empty() {
            out.push_str(" HAVING ");
            out.push(self.having.compile_clause(&scope)?);
        }
        if !self.orders.is_empty() {
            let orders = self
                .orders
                .iter()
                .map(|o| o.compile(&scope))
                .collect::<Result<Vec<_>, _>>()?;
            out.push_str(" ORDER BY ");
            out.push(Fragment::join(orders, ", "));
        }
        out.push_str(&self.limit.to_sql(scope.dialect()));
        Ok(out)
    }

    fn compile_projection(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        if !self.select.is_empty() {
            let columns = self
                .select
                .iter()
                .map(|entry| -> Result<Fragment, QueryError> {
                    let mut f = entry.expr.compile(scope)?;
                    if let Some(alias) = &entry.alias {
                        f.push_str(" AS ");
                        f.push_str(&quote_identifier(alias));
                    }
                    Ok(f)
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Fragment::join(columns, ", "));
        }
        if let (false, Source::Table(table)) = (self.fillable.is_empty(), &self.from) {
            let columns = self
                .fillable
                .iter()
                .map(|name| self.owned_column(table, name).compile(scope))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Fragment::join(columns, ", "));
        }
        Ok(Fragment::sql("*"))
    }

    fn compile_source(&self, source: &Source, id: AliasId, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        let alias = self.aliases.alias_of(id);
        match source {
            Source::Table(table) => {
                let mut out = Fragment::sql(table_placeholder(table.name()));
                if let Some(alias) = alias.filter(|_| scope.aliases_enabled()) {
                    out.push_str(" AS ");
                    out.push_str(&quote_identifier(alias));
                }
                Ok(out)
            }
            Source::SubQuery(inner) => {
                let alias = alias.ok_or_else(|| QueryError::coding("a sub-query source needs an alias"))?;
                let inner = inner.compile_select_within(scope.parent())?;
                Ok(inner.wrap("(", &format!(") AS {}", quote_identifier(alias))))
            }
        }
    }

    fn push_where(&self, out: &mut Fragment, scope: &Scope<'_>) -> Result<(), QueryError> {
        if !self.conditions.is_empty() {
            out.push_str(" WHERE ");
            out.push(self.conditions.compile_clause(scope)?);
        }
        Ok(())
    }

    fn compile_insert(&self) -> Result<Fragment, QueryError> {
        let table = self.primary_table("insert")?;
        if self.sets.is_empty() {
            return Err(QueryError::coding("insert() requires at least one set() value"));
        }
        let scope = self.scope().without_aliases();
        let columns = self
            .sets
            .iter()
            .map(|(name, _)| quote_identifier(name))
            .collect::<Vec<_>>()
            .join(", ");
        let values = self
            .sets
            .iter()
            .map(|(_, expr)| expr.compile(&scope))
            .collect::<Result<Vec<_>, _>>()?;
        let mut out = Fragment::sql(format!(
            "INSERT INTO {} ({}) VALUES (",
            table_placeholder(table.name()),
            columns
        ));
        out.push(Fragment::join(values, ", "));
        out.push_str(")");
        Ok(out)
    }

    fn compile_update(&self) -> Result<Fragment, QueryError> {
        let table = self.primary_table("update")?;
        if self.sets.is_empty() {
            return Err(QueryError::coding("update() requires at least one set() value"));
        }
        if !self.joins.is_empty() {
            return Err(QueryError::coding("joins are not supported in UPDATE statements"));
        }
        let scope = self.scope().without_aliases();
        let assignments = self
            .sets
            .iter()
            .map(|(name, expr)| -> Result<Fragment, QueryError> {
                Ok(expr.compile(&scope)?.wrap(&format!("{} = ", quote_identifier(name)), ""))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut out = Fragment::sql(format!("UPDATE {} SET ", table_placeholder(table.name())));
        out.push(Fragment::join(assignments, ", "));
        self.push_where(&mut out, &scope)?;
        Ok(out)
    }

    fn compile_delete(&self) -> Result<Fragment, QueryError> {
        let table = self.primary_table("delete")?;
        if self.conditions.is_empty() {
            return Err(QueryError::coding("DELETE without conditions; use truncate()"));
        }
        if !self.joins.is_empty() {
            return Err(QueryError::coding("joins are not supported in DELETE statements"));
        }
        let scope = self.scope().without_aliases();
        let mut out = Fragment::sql(format!("DELETE FROM {}", table_placeholder(table.name())));
        self.push_where(&mut out, &scope)?;
        Ok(out)
    }

    fn compile_truncate(&self) -> Result<Fragment, QueryError> {
        let table = self.primary_table("truncate")?;
        Ok(Fragment::sql(format!("TRUNCATE TABLE {}", table_placeholder(table.name()))))
    }
}

fn compile_list(exprs: &[Expr], scope: &Scope<'_>) -> Result<Fragment, QueryError> {
    let parts = exprs
        .iter()
        .map(|e| e.compile(scope))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Fragment::join(parts, ", "))
}
