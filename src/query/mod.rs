//! Statement builder and compiler.
//!
//! A [`Query`] collects builder calls (sources, joins, projection, conditions,
//! grouping, ordering, limits, SET values) as expression nodes. Compiling walks
//! the tree once against a [`Scope`] and yields a [`CompiledQuery`]: SQL with
//! positional `?` placeholders and `{table}` name placeholders, plus the
//! parameters in placeholder order.
//!
//! Builder calls that need the schema or the alias registry return `Result`;
//! the others record their input and report problems when the statement compiles.

mod alias;
mod compile;
mod condition;
mod cursor;
mod error;
mod fetch;
mod order;
mod predicate;
mod scope;
mod source;

pub use alias::{AliasId, AliasRegistry};
pub use compile::{CompiledQuery, StatementKind};
pub use condition::{ConditionGroup, Conditional};
pub use cursor::Cursor;
pub use error::QueryError;
pub use order::{Direction, Limit, OrderBy};
pub use predicate::{Operand, Predicate};
pub use scope::{Scope, ScopeSource, SourceKind};
pub use source::{Join, JoinKind, SelectColumn, Source};

use std::sync::Arc;

use crate::escape::is_identifier;
use crate::expr::{Column, ColumnOwner, Expr, RawSql};
use crate::schema::{Schema, Table};

/// A statement under construction.
#[derive(Debug, Clone)]
pub struct Query {
    schema: Arc<Schema>,
    from: Source,
    joins: Vec<Join>,
    select: Vec<SelectColumn>,
    fillable: Vec<String>,
    distinct: bool,
    conditions: ConditionGroup,
    groups: Vec<Expr>,
    having: ConditionGroup,
    orders: Vec<OrderBy>,
    limit: Limit,
    sets: Vec<(String, Expr)>,
    raw: Option<RawSql>,
    aliases: AliasRegistry,
}

impl Query {
    /// A statement over the physical table `name`.
    pub fn table(schema: &Arc<Schema>, name: &str) -> Result<Query, QueryError> {
        let table = schema.table(name)?;
        Ok(Self::with_source(Arc::clone(schema), Source::Table(table)))
    }

    /// A statement reading from the result of `inner`.
    ///
    /// Derived sources always carry an alias; one is generated when `alias` is `None`.
    pub fn derived(inner: Query, alias: Option<&str>) -> Result<Query, QueryError> {
        let schema = Arc::clone(&inner.schema);
        let mut query = Self::with_source(schema, Source::SubQuery(Box::new(inner)));
        match alias {
            Some(alias) => query.aliases.register(AliasId::Source(0), alias)?,
            None => {
                query.aliases.ensure(AliasId::Source(0));
            }
        }
        Ok(query)
    }

    fn with_source(schema: Arc<Schema>, from: Source) -> Query {
        Query {
            schema,
            from,
            joins: Vec::new(),
            select: Vec::new(),
            fillable: Vec::new(),
            distinct: false,
            conditions: ConditionGroup::new(),
            groups: Vec::new(),
            having: ConditionGroup::new(),
            orders: Vec::new(),
            limit: Limit::default(),
            sets: Vec::new(),
            raw: None,
            aliases: AliasRegistry::new(),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn source(&self) -> &Source {
        &self.from
    }

    /// The FROM table, or an error naming `operation` when FROM is a sub-query.
    pub(crate) fn primary_table(&self, operation: &str) -> Result<&Arc<Table>, QueryError> {
        self.from.table().ok_or_else(|| QueryError::UnsupportedOnSubquery {
            operation: operation.to_string(),
        })
    }

    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    /// Alias the FROM source.
    pub fn alias(&mut self, alias: &str) -> Result<&mut Self, QueryError> {
        self.aliases.register(AliasId::Source(0), alias)?;
        Ok(self)
    }

    /// `INNER JOIN table ON (left = right)`.
    pub fn join(&mut self, table: &str, left: &str, right: &str) -> Result<&mut Self, QueryError> {
        self.join_on(JoinKind::Inner, table, None, |on| {
            on.on(left, right);
        })
    }

    /// `LEFT JOIN table ON (left = right)`.
    pub fn left_join(&mut self, table: &str, left: &str, right: &str) -> Result<&mut Self, QueryError> {
        self.join_on(JoinKind::Left, table, None, |on| {
            on.on(left, right);
        })
    }

    pub fn cross_join(&mut self, table: &str) -> Result<&mut Self, QueryError> {
        self.join_on(JoinKind::Cross, table, None, |_| {})
    }

    /// Join a physical table, building its ON conditions with `f`.
    pub fn join_on(
        &mut self,
        kind: JoinKind,
        table: &str,
        alias: Option<&str>,
        f: impl FnOnce(&mut ConditionGroup),
    ) -> Result<&mut Self, QueryError> {
        let table = self.schema.table(table)?;
        let id = AliasId::Source(self.joins.len() + 1);
        if let Some(alias) = alias {
            self.aliases.register(id, alias)?;
        }
        self.joins.push(Join {
            kind,
            target: Source::Table(table),
            on: ConditionGroup::build(f),
        });
        Ok(self)
    }

    /// Join the result of `inner`; like derived FROM sources it always gets an alias.
    pub fn join_subquery(
        &mut self,
        kind: JoinKind,
        inner: Query,
        alias: Option<&str>,
        f: impl FnOnce(&mut ConditionGroup),
    ) -> Result<&mut Self, QueryError> {
        let id = AliasId::Source(self.joins.len() + 1);
        match alias {
            Some(alias) => self.aliases.register(id, alias)?,
            None => {
                self.aliases.ensure(id);
            }
        }
        self.joins.push(Join {
            kind,
            target: Source::SubQuery(Box::new(inner)),
            on: ConditionGroup::build(f),
        });
        Ok(self)
    }

    /// Project columns by name; names are validated when the statement compiles.
    pub fn select(&mut self, columns: &[&str]) -> &mut Self {
        for column in columns {
            self.select.push(SelectColumn {
                expr: Expr::column(*column),
                alias: None,
            });
        }
        self
    }

    pub fn select_as(&mut self, column: &str, alias: &str) -> Result<&mut Self, QueryError> {
        self.select_expr(Expr::column(column), Some(alias))
    }

    /// Project any expression, optionally aliased.
    pub fn select_expr(&mut self, expr: Expr, alias: Option<&str>) -> Result<&mut Self, QueryError> {
        if let Some(alias) = alias {
            self.aliases.register(AliasId::Projection(self.select.len()), alias)?;
        }
        self.select.push(SelectColumn {
            expr,
            alias: alias.map(str::to_string),
        });
        Ok(self)
    }

    pub(crate) fn clear_select(&mut self) {
        self.select.clear();
        self.aliases.clear_projections();
    }

    /// Columns projected when nothing is selected explicitly.
    pub fn fillable(&mut self, columns: &[&str]) -> Result<&mut Self, QueryError> {
        let table = self.primary_table("fillable")?;
        for column in columns {
            Column::of(table, column)?;
        }
        self.fillable = columns.iter().map(|c| c.to_string()).collect();
        Ok(self)
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    pub fn group(&mut self, columns: &[&str]) -> &mut Self {
        self.groups.extend(columns.iter().map(|c| Expr::column(*c)));
        self
    }

    pub fn group_expr(&mut self, expr: Expr) -> &mut Self {
        self.groups.push(expr);
        self
    }

    /// AND a predicate into the HAVING clause.
    pub fn having(&mut self, predicate: impl Into<Predicate>) -> &mut Self {
        self.having.where_(predicate);
        self
    }

    /// The HAVING condition tree, for the full set of builder methods.
    pub fn having_conditions(&mut self) -> &mut ConditionGroup {
        &mut self.having
    }

    pub fn order(&mut self, column: &str, direction: Direction) -> &mut Self {
        self.orders.push(OrderBy::Expr(Expr::column(column), direction));
        self
    }

    pub fn order_expr(&mut self, expr: Expr, direction: Direction) -> &mut Self {
        self.orders.push(OrderBy::Expr(expr, direction));
        self
    }

    pub fn order_random(&mut self) -> &mut Self {
        self.orders.push(OrderBy::Random);
        self
    }

    pub fn limit(&mut self, from: u64, count: u64) -> &mut Self {
        self.limit = Limit { from, count };
        self
    }

    pub fn take(&mut self, count: u64) -> &mut Self {
        self.limit.count = count;
        self
    }

    pub fn skip(&mut self, from: u64) -> &mut Self {
        self.limit.from = from;
        self
    }

    pub fn get_limit(&self) -> Limit {
        self.limit
    }

    /// Set `column` to a value for INSERT or UPDATE.
    pub fn set(&mut self, column: &str, value: impl Into<Operand>) -> Result<&mut Self, QueryError> {
        self.set_expr(column, value.into().into_expr())
    }

    /// Set `column` to an expression, e.g. `score + 1`.
    pub fn set_expr(&mut self, column: &str, expr: Expr) -> Result<&mut Self, QueryError> {
        let table = self.primary_table("set")?;
        Column::of(table, column)?;
        match self.sets.iter_mut().find(|(name, _)| name == column) {
            Some(entry) => entry.1 = expr,
            None => self.sets.push((column.to_string(), expr)),
        }
        Ok(self)
    }

    /// Replace the whole statement with caller-written SQL.
    pub fn raw(&mut self, sql: RawSql) -> &mut Self {
        self.raw = Some(sql);
        self
    }

    pub fn conditions(&self) -> &ConditionGroup {
        &self.conditions
    }

    /// `table.column` of the FROM table, rendered through its alias when it has one.
    pub(crate) fn owned_column(&self, table: &Arc<Table>, name: &str) -> Column {
        Column::new(
            ColumnOwner::Table {
                table: Arc::clone(table),
                alias: self.aliases.alias_of(AliasId::Source(0)).map(str::to_string),
            },
            name,
        )
    }

    /// The compilation scope of this statement, nested in `parent`.
    pub(crate) fn scope_within<'p>(&self, parent: Option<&'p Scope<'p>>) -> Scope<'p> {
        let mut sources = Vec::with_capacity(self.joins.len() + 1);
        sources.push(self.scope_source(&self.from, AliasId::Source(0)));
        for (i, join) in self.joins.iter().enumerate() {
            sources.push(self.scope_source(&join.target, AliasId::Source(i + 1)));
        }
        let projections = self
            .select
            .iter()
            .filter_map(|s| s.alias.clone())
            .filter(|alias| is_identifier(alias))
            .collect();
        Scope::new(sources, projections, self.schema.dialect(), parent)
    }

    /// The compilation scope of this statement as a top-level statement.
    pub fn scope(&self) -> Scope<'static> {
        self.scope_within(None)
    }

    fn scope_source(&self, source: &Source, id: AliasId) -> ScopeSource {
        let alias = self.aliases.alias_of(id).map(str::to_string);
        match source {
            Source::Table(table) => ScopeSource {
                kind: SourceKind::Table(Arc::clone(table)),
                alias,
            },
            Source::SubQuery(_) => ScopeSource {
                kind: SourceKind::Derived,
                alias,
            },
        }
    }
}

impl Conditional for Query {
    fn condition_group(&mut self) -> &mut ConditionGroup {
        &mut self.conditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_schema;
    use rstest::rstest;

    #[rstest]
    fn test_unknown_table() {
        let err = Query::table(&test_schema(), "nope").unwrap_err();
        assert_eq!(err, QueryError::UnknownTable { table: "nope".into() });
    }

    #[rstest]
    fn test_alias_conflict_between_sources() {
        let mut query = Query::table(&test_schema(), "users").unwrap();
        query.alias("u").unwrap();
        let err = query
            .join_on(JoinKind::Inner, "orders", Some("u"), |_| {})
            .unwrap_err();
        assert_eq!(err, QueryError::DuplicateAlias { alias: "u".into() });
    }

    #[rstest]
    fn test_set_validates_column() {
        let mut query = Query::table(&test_schema(), "users").unwrap();
        assert!(query.set("name", "x").is_ok());
        assert!(matches!(
            query.set("nope", 1).unwrap_err(),
            QueryError::UnknownColumn { .. }
        ));
    }

    #[rstest]
    fn test_set_on_subquery_unsupported() {
        let inner = Query::table(&test_schema(), "users").unwrap();
        let mut query = Query::derived(inner, Some("t")).unwrap();
        assert!(matches!(
            query.set("name", "x").unwrap_err(),
            QueryError::UnsupportedOnSubquery { .. }
        ));
    }

    #[rstest]
    fn test_derived_source_gets_generated_alias() {
        let inner = Query::table(&test_schema(), "users").unwrap();
        let query = Query::derived(inner, None).unwrap();
        assert_eq!(query.aliases().alias_of(AliasId::Source(0)), Some("t1"));
    }

    #[rstest]
    fn test_same_source_reused_gets_independent_aliases() {
        let schema = test_schema();
        let mut a = Query::table(&schema, "users").unwrap();
        a.alias("a").unwrap();
        let mut b = a.clone();
        b.alias("b").unwrap();
        assert_eq!(a.aliases().alias_of(AliasId::Source(0)), Some("a"));
        assert_eq!(b.aliases().alias_of(AliasId::Source(0)), Some("b"));
    }
}
