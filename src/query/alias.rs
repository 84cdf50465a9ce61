use std::collections::BTreeMap;

use crate::escape::is_identifier;

use super::QueryError;

/// Identity of an aliasable entry within one statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AliasId {
    /// FROM is `Source(0)`, the n-th join is `Source(n + 1)`
    Source(usize),
    /// The n-th select entry
    Projection(usize),
}

/// Bidirectional map between statement entries and their aliases.
///
/// Owned by a single [`Query`](super::Query); cloning a query clones its
/// registry, so the same source reused in another statement gets its own names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasRegistry {
    by_id: BTreeMap<AliasId, String>,
    by_alias: BTreeMap<String, AliasId>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `id` the alias `alias`, replacing any alias it had.
    pub fn register(&mut self, id: AliasId, alias: &str) -> Result<(), QueryError> {
        if !is_identifier(alias) {
            return Err(QueryError::InvalidIdentifier {
                name: alias.to_string(),
            });
        }
        match self.by_alias.get(alias) {
            Some(owner) if *owner == id => return Ok(()),
            Some(_) => {
                return Err(QueryError::DuplicateAlias {
                    alias: alias.to_string(),
                });
            }
            None => {}
        }
        if let Some(previous) = self.by_id.insert(id, alias.to_string()) {
            self.by_alias.remove(&previous);
        }
        self.by_alias.insert(alias.to_string(), id);
        Ok(())
    }

    /// Return the alias of `id`, generating `t1`, `t2`, ... when it has none.
    pub fn ensure(&mut self, id: AliasId) -> String {
        if let Some(alias) = self.by_id.get(&id) {
            return alias.clone();
        }
        let mut n = self.by_id.len() + 1;
        let alias = loop {
            let candidate = format!("t{}", n);
            if !self.by_alias.contains_key(&candidate) {
                break candidate;
            }
            n += 1;
        };
        self.by_id.insert(id, alias.clone());
        self.by_alias.insert(alias.clone(), id);
        alias
    }

    /// Forget every projection alias, keeping source aliases.
    pub(crate) fn clear_projections(&mut self) {
        self.by_id.retain(|id, _| matches!(id, AliasId::Source(_)));
        self.by_alias.retain(|_, id| matches!(id, AliasId::Source(_)));
    }

    pub fn alias_of(&self, id: AliasId) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    pub fn id_of(&self, alias: &str) -> Option<AliasId> {
        self.by_alias.get(alias).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AliasId, &str)> {
        self.by_id.iter().map(|(id, alias)| (*id, alias.as_str()))
    }
}
