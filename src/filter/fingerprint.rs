use serde::Serialize;

use super::{ColumnTarget, FilterGroup, FilterNode, GroupOperator, QueryFilter};

/// Cache key of a filter, split by where its items are evaluated.
///
/// Two filters with equal `db` parts select the same rows from the database,
/// so a result set fetched for one can be re-filtered in memory for the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Fingerprint {
    pub db: String,
    pub memory: String,
}

impl Fingerprint {
    /// Whether rows fetched under `self` are still valid for `other`.
    pub fn is_reusable_for(&self, other: &Fingerprint) -> bool {
        self.db == other.db
    }
}

impl QueryFilter {
    /// The `db` part covers exactly the items [`apply`](Self::apply) turns into SQL.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut fingerprint = Fingerprint {
            db: String::new(),
            memory: String::new(),
        };
        let enforced = self.root.is_sql_only() || self.root.operator == GroupOperator::And;
        collect(&self.root, "", enforced, &mut fingerprint);
        fingerprint
    }
}

fn collect(group: &FilterGroup, path: &str, enforced: bool, out: &mut Fingerprint) {
    let path = format!("{}{:?}", path, group.operator);
    for (i, child) in group.children.iter().enumerate() {
        match child {
            FilterNode::Group(inner) => {
                let enforced = enforced && (inner.is_sql_only() || inner.operator == GroupOperator::And);
                collect(inner, &format!("{}.{}/", path, i), enforced, out);
            }
            FilterNode::Item(item) => {
                // Hex keeps separators out of the value part
                let value = hex::encode(item.value.to_json().to_string());
                let tag = format!("{{{}}}{}.{}={};", path, item.name, item.comparator, value);
                match item.target {
                    ColumnTarget::Sql(_) if enforced => out.db.push_str(&tag),
                    _ => out.memory.push_str(&tag),
                }
            }
        }
    }
}
