//! Declarative filters.
//!
//! A filter is a tree of groups (`and`, `andNot`, `or`) and items
//! (`column comparator value`) parsed from JSON:
//!
//! ```json
//! {"operator": "and", "items": [
//!     {"name": "status", "comparator": "equal", "value": "active"},
//!     {"@type": "group", "operator": "or", "items": [...]}
//! ]}
//! ```
//!
//! The same tree can be lowered into condition builder calls ([`QueryFilter::apply`])
//! or evaluated against records already in memory ([`QueryFilter::evaluate`]).
//! Both interpreters take their comparator semantics from [`comparator`].

mod apply;
pub mod comparator;
mod evaluate;
mod fingerprint;

pub use comparator::FilterComparator;
pub use fingerprint::Fingerprint;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::QueryError;
use crate::value::Value;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid filter: {message}")]
    Parse { message: String },

    #[error("Filter column '{name}' is not in the column map")]
    UnknownColumn { name: String },

    #[error("Unknown filter comparator '{name}'")]
    UnknownComparator { name: String },

    #[error("Filter value for '{name}' must be a scalar")]
    InvalidValue { name: String },

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// How a group combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupOperator {
    #[default]
    And,
    AndNot,
    Or,
}

/// Where a filter column lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnTarget {
    /// A column reference the condition builder can resolve
    Sql(String),
    /// Only known to in-memory records; never translated to SQL
    MemoryOnly,
}

/// Maps filter item names to their targets.
///
/// In JSON a string is a column reference and `null` marks a memory-only column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterColumns(BTreeMap<String, Option<String>>);

impl FilterColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sql(mut self, name: &str, column: &str) -> Self {
        self.0.insert(name.to_string(), Some(column.to_string()));
        self
    }

    pub fn memory_only(mut self, name: &str) -> Self {
        self.0.insert(name.to_string(), None);
        self
    }

    pub fn target(&self, name: &str) -> Option<ColumnTarget> {
        self.0.get(name).map(|column| match column {
            Some(column) => ColumnTarget::Sql(column.clone()),
            None => ColumnTarget::MemoryOnly,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A group of filter nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterGroup {
    pub operator: GroupOperator,
    pub children: Vec<FilterNode>,
}

impl FilterGroup {
    /// Whether every item below this group is SQL-backed.
    pub fn is_sql_only(&self) -> bool {
        self.children.iter().all(|child| match child {
            FilterNode::Group(inner) => inner.is_sql_only(),
            FilterNode::Item(item) => matches!(item.target, ColumnTarget::Sql(_)),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Group(FilterGroup),
    Item(FilterItem),
}

/// One `name comparator value` test.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterItem {
    pub name: String,
    pub target: ColumnTarget,
    pub comparator: FilterComparator,
    pub value: Value,
}

/// A parsed filter bound to its column map.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFilter {
    root: FilterGroup,
}

impl QueryFilter {
    /// Parse `json` and check every item name against `columns`.
    pub fn from_json_str(json: &str, columns: &FilterColumns) -> Result<Self, FilterError> {
        let raw: RawGroup = serde_json::from_str(json).map_err(|e| FilterError::Parse {
            message: e.to_string(),
        })?;
        Ok(Self {
            root: raw.into_group(columns)?,
        })
    }

    pub fn from_value(value: serde_json::Value, columns: &FilterColumns) -> Result<Self, FilterError> {
        let raw: RawGroup = serde_json::from_value(value).map_err(|e| FilterError::Parse {
            message: e.to_string(),
        })?;
        Ok(Self {
            root: raw.into_group(columns)?,
        })
    }

    /// A column map treating every item name in `json` as memory-only.
    pub fn memory_columns(json: &str) -> Result<FilterColumns, FilterError> {
        let raw: RawGroup = serde_json::from_str(json).map_err(|e| FilterError::Parse {
            message: e.to_string(),
        })?;
        let mut columns = FilterColumns::new();
        raw.collect_names(&mut |name| {
            columns.0.insert(name.to_string(), None);
        });
        Ok(columns)
    }

    pub fn root(&self) -> &FilterGroup {
        &self.root
    }

    /// Every item of the tree, depth first.
    pub fn items(&self) -> Vec<&FilterItem> {
        fn walk<'a>(group: &'a FilterGroup, out: &mut Vec<&'a FilterItem>) {
            for child in &group.children {
                match child {
                    FilterNode::Item(item) => out.push(item),
                    FilterNode::Group(group) => walk(group, out),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.root, &mut out);
        out
    }
}

// Wire shapes, converted into the typed tree after parsing

#[derive(Deserialize)]
struct RawGroup {
    #[serde(default)]
    operator: GroupOperator,
    #[serde(default)]
    items: Vec<RawNode>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNode {
    Group(RawTaggedGroup),
    Item(RawItem),
}

#[derive(Deserialize)]
struct RawTaggedGroup {
    #[serde(rename = "@type")]
    #[allow(dead_code)]
    kind: GroupTag,
    #[serde(flatten)]
    group: RawGroup,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum GroupTag {
    Group,
}

#[derive(Deserialize)]
struct RawItem {
    name: String,
    comparator: String,
    #[serde(default)]
    value: serde_json::Value,
}

impl RawGroup {
    fn into_group(self, columns: &FilterColumns) -> Result<FilterGroup, FilterError> {
        let children = self
            .items
            .into_iter()
            .map(|node| match node {
                RawNode::Group(tagged) => Ok(FilterNode::Group(tagged.group.into_group(columns)?)),
                RawNode::Item(item) => Ok(FilterNode::Item(item.into_item(columns)?)),
            })
            .collect::<Result<Vec<_>, FilterError>>()?;
        Ok(FilterGroup {
            operator: self.operator,
            children,
        })
    }

    fn collect_names(&self, f: &mut impl FnMut(&str)) {
        for node in &self.items {
            match node {
                RawNode::Group(tagged) => tagged.group.collect_names(f),
                RawNode::Item(item) => f(&item.name),
            }
        }
    }
}

impl RawItem {
    fn into_item(self, columns: &FilterColumns) -> Result<FilterItem, FilterError> {
        let comparator = self.comparator.parse::<FilterComparator>()?;
        let target = columns
            .target(&self.name)
            .ok_or_else(|| FilterError::UnknownColumn { name: self.name.clone() })?;
        let value = Value::from_json(&self.value).ok_or_else(|| FilterError::InvalidValue { name: self.name.clone() })?;
        Ok(FilterItem {
            name: self.name,
            target,
            comparator,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use rstest::rstest;

    fn user_columns() -> FilterColumns {
        serde_json::from_str(fixtures::USER_COLUMNS).unwrap()
    }

    #[rstest]
    fn test_parse_nested_filter() {
        let filter = QueryFilter::from_json_str(fixtures::USER_FILTER, &user_columns()).unwrap();
        assert_eq!(filter.root().operator, GroupOperator::And);
        assert_eq!(filter.root().children.len(), 3);
        let FilterNode::Group(inner) = &filter.root().children[2] else {
            panic!("expected nested group");
        };
        assert_eq!(inner.operator, GroupOperator::Or);
        assert_eq!(filter.items().len(), 4);
        assert_eq!(filter.items()[1].target, ColumnTarget::MemoryOnly);
    }

    #[rstest]
    fn test_unknown_comparator() {
        let json = r#"{"operator": "and", "items": [{"name": "age", "comparator": "around", "value": 3}]}"#;
        let err = QueryFilter::from_json_str(json, &user_columns()).unwrap_err();
        assert_eq!(err, FilterError::UnknownComparator { name: "around".into() });
    }

    #[rstest]
    fn test_unknown_column() {
        let json = r#"{"operator": "or", "items": [{"name": "zip", "comparator": "equal", "value": 1}]}"#;
        let err = QueryFilter::from_json_str(json, &user_columns()).unwrap_err();
        assert_eq!(err, FilterError::UnknownColumn { name: "zip".into() });
    }

    #[rstest]
    fn test_non_scalar_value() {
        let json = r#"{"items": [{"name": "age", "comparator": "equal", "value": [1, 2]}]}"#;
        let err = QueryFilter::from_json_str(json, &user_columns()).unwrap_err();
        assert_eq!(err, FilterError::InvalidValue { name: "age".into() });
    }

    #[rstest]
    fn test_bad_operator_is_parse_error() {
        let json = r#"{"operator": "xor", "items": []}"#;
        assert!(matches!(
            QueryFilter::from_json_str(json, &user_columns()).unwrap_err(),
            FilterError::Parse { .. }
        ));
    }

    #[rstest]
    fn test_memory_columns_cover_every_name() {
        let columns = QueryFilter::memory_columns(fixtures::USER_FILTER).unwrap();
        for name in ["status", "score", "name", "email"] {
            assert_eq!(columns.target(name), Some(ColumnTarget::MemoryOnly));
        }
    }
}
