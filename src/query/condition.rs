//! The boolean condition tree.

use crate::expr::{Column, CompareOp, Compile, Expr, Fragment, RawSql};
use crate::value::Value;

use super::predicate::{Operand, Predicate};
use super::{QueryError, Scope};

/// One entry of a [`ConditionGroup`].
#[derive(Debug, Clone)]
enum Node {
    Condition { expr: Expr, flip: bool, or: bool },
    Group(ConditionGroup),
    /// A builder call that failed to normalize; compiling reports the error
    Invalid(QueryError),
}

impl Node {
    fn is_or(&self) -> bool {
        match self {
            Node::Condition { or, .. } => *or,
            Node::Group(group) => group.or,
            Node::Invalid(_) => false,
        }
    }

    fn compile(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        match self {
            Node::Condition { expr, flip, .. } => {
                let prefix = if *flip { "NOT (" } else { "(" };
                Ok(expr.compile(scope)?.wrap(prefix, ")"))
            }
            Node::Group(group) => group.compile(scope),
            Node::Invalid(err) => Err(err.clone()),
        }
    }

    fn resolve(&mut self, scope: &Scope<'_>) -> Result<(), QueryError> {
        match self {
            Node::Condition { expr, .. } => expr.resolve(scope),
            Node::Group(group) => group.resolve(scope),
            Node::Invalid(err) => Err(err.clone()),
        }
    }
}

/// A nested AND / OR / NOT scope of conditions.
///
/// The `or` flag belongs to the child: it joins that child to its previous
/// sibling with `OR` instead of `AND`, so one group can mix both.
#[derive(Debug, Clone, Default)]
pub struct ConditionGroup {
    children: Vec<Node>,
    flip: bool,
    or: bool,
}

impl ConditionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a group by running `f` on a fresh one.
    pub fn build(f: impl FnOnce(&mut ConditionGroup)) -> Self {
        let mut group = Self::new();
        f(&mut group);
        group
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_flipped(&self) -> bool {
        self.flip
    }

    /// Toggle the surrounding `NOT` of this group.
    pub fn flip(&mut self) -> &mut Self {
        self.flip = !self.flip;
        self
    }

    pub(crate) fn set_or(&mut self, or: bool) -> &mut Self {
        self.or = or;
        self
    }

    /// Normalize `predicate` into one condition or nested group.
    ///
    /// `raw` skips schema validation of the left-hand column name.
    pub fn add(&mut self, predicate: Predicate, flip: bool, or: bool, raw: bool) -> &mut Self {
        match predicate {
            Predicate::Map(entries) if !flip && !or => {
                for (column, value) in entries {
                    let node = Self::comparison(&column, None, value, false, false, raw);
                    self.children.push(node);
                }
            }
            Predicate::Map(mut entries) if entries.len() == 1 => {
                if let Some((column, value)) = entries.pop() {
                    let node = Self::comparison(&column, None, value, flip, or, raw);
                    self.children.push(node);
                }
            }
            Predicate::Map(entries) => {
                let mut group = ConditionGroup::new();
                for (column, value) in entries {
                    let node = Self::comparison(&column, None, value, false, false, raw);
                    group.children.push(node);
                }
                self.push_group(group, flip, or);
            }
            Predicate::Binary(column, value) => {
                let node = Self::comparison(&column, None, value, flip, or, raw);
                self.children.push(node);
            }
            Predicate::Ternary(column, op, value) => {
                let node = Self::comparison(&column, Some(op), value, flip, or, raw);
                self.children.push(node);
            }
            Predicate::Group(group) => self.push_group(group, flip, or),
            Predicate::Expr(expr) => self.children.push(Node::Condition { expr, flip, or }),
            Predicate::Raw(raw) => self.children.push(Node::Condition {
                expr: Expr::Raw(raw),
                flip,
                or,
            }),
            Predicate::Invalid(err) => self.children.push(Node::Invalid(err)),
        }
        self
    }

    fn push_group(&mut self, mut group: ConditionGroup, flip: bool, or: bool) {
        if group.is_empty() {
            return;
        }
        // A lone condition absorbs the group's flags instead of nesting
        if group.children.len() == 1 && matches!(group.children[0], Node::Condition { .. }) {
            if let Some(Node::Condition { expr, flip: inner, .. }) = group.children.pop() {
                self.children.push(Node::Condition {
                    expr,
                    flip: inner ^ group.flip ^ flip,
                    or,
                });
            }
            return;
        }
        if flip {
            group.flip = !group.flip;
        }
        group.or = or;
        self.children.push(Node::Group(group));
    }

    fn comparison(
        column: &str,
        op: Option<CompareOp>,
        value: Operand,
        flip: bool,
        or: bool,
        raw: bool,
    ) -> Node {
        let left = if raw {
            match Column::raw(column) {
                Ok(column) => Expr::Column(column),
                Err(err) => return Node::Invalid(err),
            }
        } else {
            Expr::column(column)
        };
        let op = op.unwrap_or(if value.is_list() { CompareOp::In } else { CompareOp::Eq });
        Node::Condition {
            expr: Expr::compare(left, op, value.into_expr()),
            flip,
            or,
        }
    }

    /// `left = right` for join conditions; `right` may turn out to be a plain literal.
    pub fn on(&mut self, left: &str, right: &str) -> &mut Self {
        self.on_op(left, CompareOp::Eq, right, false)
    }

    pub fn or_on(&mut self, left: &str, right: &str) -> &mut Self {
        self.on_op(left, CompareOp::Eq, right, true)
    }

    pub fn on_op(&mut self, left: &str, op: CompareOp, right: &str, or: bool) -> &mut Self {
        self.children.push(Node::Condition {
            expr: Expr::compare(Expr::column(left), op, Expr::column_or_literal(right)),
            flip: false,
            or,
        });
        self
    }

    /// The children joined by their AND / OR flags, without surrounding parentheses.
    pub fn compile_body(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        let mut out = Fragment::default();
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                out.push_str(if child.is_or() { " OR " } else { " AND " });
            }
            out.push(child.compile(scope)?);
        }
        Ok(out)
    }

    /// The group as a top-level clause body (`WHERE`, `HAVING`, `ON`).
    pub fn compile_clause(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        let body = self.compile_body(scope)?;
        if self.flip {
            Ok(body.wrap("NOT (", ")"))
        } else {
            Ok(body)
        }
    }
}

impl Compile for ConditionGroup {
    fn compile(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        if self.children.is_empty() {
            return Ok(Fragment::sql(if self.flip { "FALSE" } else { "TRUE" }));
        }
        let body = self.compile_body(scope)?;
        if self.flip {
            Ok(body.wrap("NOT (", ")"))
        } else if self.children.len() == 1 {
            Ok(body)
        } else {
            Ok(body.wrap("(", ")"))
        }
    }

    fn resolve(&mut self, scope: &Scope<'_>) -> Result<(), QueryError> {
        self.children.iter_mut().try_for_each(|child| child.resolve(scope))
    }
}

/// Builder methods shared by everything that owns a root condition group.
pub trait Conditional {
    fn condition_group(&mut self) -> &mut ConditionGroup;

    /// AND a predicate.
    fn where_(&mut self, predicate: impl Into<Predicate>) -> &mut Self {
        self.condition_group().add(predicate.into(), false, false, false);
        self
    }

    /// AND a negated predicate.
    fn where_not(&mut self, predicate: impl Into<Predicate>) -> &mut Self {
        self.condition_group().add(predicate.into(), true, false, false);
        self
    }

    /// OR a predicate.
    fn where_or(&mut self, predicate: impl Into<Predicate>) -> &mut Self {
        self.condition_group().add(predicate.into(), false, true, false);
        self
    }

    /// OR a negated predicate.
    fn where_or_not(&mut self, predicate: impl Into<Predicate>) -> &mut Self {
        self.condition_group().add(predicate.into(), true, true, false);
        self
    }

    /// Like [`where_`](Self::where_), but column names are only checked for syntax.
    fn where_raw(&mut self, predicate: impl Into<Predicate>) -> &mut Self {
        self.condition_group().add(predicate.into(), false, false, true);
        self
    }

    fn where_raw_not(&mut self, predicate: impl Into<Predicate>) -> &mut Self {
        self.condition_group().add(predicate.into(), true, false, true);
        self
    }

    fn where_raw_or(&mut self, predicate: impl Into<Predicate>) -> &mut Self {
        self.condition_group().add(predicate.into(), false, true, true);
        self
    }

    fn where_raw_or_not(&mut self, predicate: impl Into<Predicate>) -> &mut Self {
        self.condition_group().add(predicate.into(), true, true, true);
        self
    }

    /// Open a nested group, fill it with `f`, and attach it if non-empty.
    fn where_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        let group = ConditionGroup::build(f);
        self.condition_group().add(Predicate::Group(group), false, false, false);
        self
    }

    fn where_not_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        let group = ConditionGroup::build(f);
        self.condition_group().add(Predicate::Group(group), true, false, false);
        self
    }

    fn where_or_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        let group = ConditionGroup::build(f);
        self.condition_group().add(Predicate::Group(group), false, true, false);
        self
    }

    /// AND caller-written SQL with positional `?` parameters.
    fn where_sql(&mut self, sql: &str, params: Vec<Value>) -> &mut Self {
        let predicate = Predicate::from(RawSql::positional(sql, params));
        self.condition_group().add(predicate, false, false, false);
        self
    }
}

impl Conditional for ConditionGroup {
    fn condition_group(&mut self) -> &mut ConditionGroup {
        self
    }
}
