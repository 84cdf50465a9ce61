//! Lowering a filter into condition builder calls.

use tracing::trace;

use crate::expr::{CompareOp, Expr};
use crate::query::{Conditional, ConditionGroup, Operand, Predicate};
use crate::value::Value;

use super::{ColumnTarget, FilterComparator, FilterGroup, FilterItem, FilterNode, GroupOperator, QueryFilter};

impl QueryFilter {
    /// AND the filter into `target`.
    pub fn apply<C: Conditional + ?Sized>(&self, target: &mut C) {
        self.apply_with(target.condition_group(), false, false);
    }

    /// Attach the filter to `target` under the parent's `flip` and `or` flags.
    ///
    /// The attached conditions never reject a record the full filter accepts.
    /// Memory-only items are dropped from AND groups; an OR or `andNot` group
    /// holding one anywhere below it is dropped whole. A group left empty
    /// attaches nothing.
    pub fn apply_with(&self, target: &mut ConditionGroup, flip: bool, or: bool) {
        let root = &self.root;
        if root.is_sql_only() {
            let flip = flip ^ (root.operator == GroupOperator::AndNot);
            target.add(Predicate::Group(lower_exact(root)), flip, or, false);
        } else if root.operator == GroupOperator::And {
            target.add(Predicate::Group(lower_relaxed(root)), flip, or, false);
        } else {
            trace!(operator = ?root.operator, "filter depends on memory-only items, nothing attached");
        }
    }
}

/// Lowers a group whose items are all SQL-backed.
fn lower_exact(group: &FilterGroup) -> ConditionGroup {
    let or = group.operator == GroupOperator::Or;
    let mut out = ConditionGroup::new();
    for child in &group.children {
        match child {
            FilterNode::Group(inner) => {
                let flip = inner.operator == GroupOperator::AndNot;
                out.add(Predicate::Group(lower_exact(inner)), flip, or, false);
            }
            FilterNode::Item(item) => {
                if let ColumnTarget::Sql(column) = &item.target {
                    out.add(lower_item(item, column), false, or, false);
                }
            }
        }
    }
    out
}

/// Lowers the SQL-enforceable part of an AND group.
fn lower_relaxed(group: &FilterGroup) -> ConditionGroup {
    let mut out = ConditionGroup::new();
    for child in &group.children {
        match child {
            FilterNode::Item(item) => match &item.target {
                ColumnTarget::Sql(column) => {
                    out.add(lower_item(item, column), false, false, false);
                }
                ColumnTarget::MemoryOnly => trace!(name = %item.name, "memory-only filter item skipped"),
            },
            FilterNode::Group(inner) if inner.is_sql_only() => {
                let flip = inner.operator == GroupOperator::AndNot;
                out.add(Predicate::Group(lower_exact(inner)), flip, false, false);
            }
            FilterNode::Group(inner) if inner.operator == GroupOperator::And => {
                out.add(Predicate::Group(lower_relaxed(inner)), false, false, false);
            }
            FilterNode::Group(inner) => {
                trace!(operator = ?inner.operator, "group depends on memory-only items, skipped");
            }
        }
    }
    out
}

fn lower_item(item: &FilterItem, column: &str) -> Predicate {
    let value = item.value.clone();
    match item.comparator {
        FilterComparator::IsNull => Predicate::Binary(column.to_string(), Operand::Value(Value::Null)),
        FilterComparator::IsNotNull => Predicate::Ternary(column.to_string(), CompareOp::NotEq, Operand::Value(Value::Null)),
        FilterComparator::IsTrue => Predicate::Ternary(column.to_string(), CompareOp::Eq, Operand::Expr(Expr::raw("TRUE"))),
        FilterComparator::IsFalse => Predicate::Ternary(column.to_string(), CompareOp::Eq, Operand::Expr(Expr::raw("FALSE"))),
        FilterComparator::IsEmpty => Predicate::Group(ConditionGroup::build(|g| {
            g.where_((column, Value::Null)).where_or((column, ""));
        })),
        comparator if comparator.is_date() => {
            let op = comparator.relation().unwrap_or(CompareOp::Eq);
            Predicate::Expr(Expr::compare(
                Expr::func("DATE", vec![Expr::column(column)]),
                op,
                Expr::func("DATE", vec![Expr::value(value)]),
            ))
        }
        comparator => match (comparator.pattern(), comparator.relation()) {
            (Some(pattern), _) => Predicate::Ternary(
                column.to_string(),
                CompareOp::Like,
                Operand::Value(Value::Str(pattern.like_pattern(&value.to_text()))),
            ),
            (None, Some(op)) => Predicate::Ternary(column.to_string(), op, Operand::Value(value)),
            (None, None) => Predicate::Binary(column.to_string(), Operand::Value(value)),
        },
    }
}
