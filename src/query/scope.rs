use std::sync::Arc;

use crate::dialect::Dialect;
use crate::schema::Table;

/// What a statement source is backed by.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    Table(Arc<Table>),
    /// A sub-query in FROM or JOIN; its columns are not known
    Derived,
}

/// One FROM or JOIN source as seen during compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeSource {
    pub kind: SourceKind,
    pub alias: Option<String>,
}

impl ScopeSource {
    /// Whether `qualifier` names this source, by alias or by physical table name.
    fn answers_to(&self, qualifier: &str) -> bool {
        if self.alias.as_deref() == Some(qualifier) {
            return true;
        }
        matches!(&self.kind, SourceKind::Table(table) if table.name() == qualifier)
    }
}

/// Compilation context of one statement.
///
/// A scope is a snapshot of the statement's sources, projection aliases and
/// dialect. Nested statements get a scope whose `parent` is the enclosing one,
/// so alias lookups walk outward.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    sources: Vec<ScopeSource>,
    projections: Vec<String>,
    alias_enabled: bool,
    dialect: Dialect,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(
        sources: Vec<ScopeSource>,
        projections: Vec<String>,
        dialect: Dialect,
        parent: Option<&'a Scope<'a>>,
    ) -> Self {
        Self {
            sources,
            projections,
            alias_enabled: true,
            dialect,
            parent,
        }
    }

    /// The same scope with alias rendering switched off (UPDATE / DELETE shapes).
    pub(crate) fn without_aliases(mut self) -> Self {
        self.alias_enabled = false;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn parent(&self) -> Option<&'a Scope<'a>> {
        self.parent
    }

    pub fn aliases_enabled(&self) -> bool {
        self.alias_enabled
    }

    /// The FROM source.
    pub fn primary(&self) -> Option<&ScopeSource> {
        self.sources.first()
    }

    pub fn primary_table_name(&self) -> Option<String> {
        match &self.primary()?.kind {
            SourceKind::Table(table) => Some(table.name().to_string()),
            SourceKind::Derived => self.primary()?.alias.clone(),
        }
    }

    /// Find the source named `qualifier` here or in an enclosing scope.
    pub fn lookup(&self, qualifier: &str) -> Option<&ScopeSource> {
        let by_alias = self.sources.iter().find(|s| s.alias.as_deref() == Some(qualifier));
        by_alias
            .or_else(|| self.sources.iter().find(|s| s.answers_to(qualifier)))
            .or_else(|| self.parent.and_then(|p| p.lookup(qualifier)))
    }

    /// The first local table source that has a column called `name`, primary first.
    pub fn find_column_source(&self, name: &str) -> Option<&ScopeSource> {
        self.sources
            .iter()
            .find(|s| matches!(&s.kind, SourceKind::Table(table) if table.has_column(name)))
    }

    pub fn has_projection(&self, name: &str) -> bool {
        self.projections.iter().any(|p| p == name)
    }

    /// Whether references through `alias` should render the alias.
    ///
    /// Answered by the scope that defines the alias, so an inner SELECT can
    /// still see an alias of an outer UPDATE as disabled.
    pub fn alias_visible(&self, alias: &str) -> bool {
        if self.sources.iter().any(|s| s.alias.as_deref() == Some(alias)) {
            return self.alias_enabled;
        }
        match self.parent {
            Some(parent) => parent.alias_visible(alias),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_schema;

    fn source(table: &str, alias: Option<&str>) -> ScopeSource {
        ScopeSource {
            kind: SourceKind::Table(test_schema().table(table).unwrap()),
            alias: alias.map(str::to_string),
        }
    }

    #[test]
    fn test_lookup_by_alias_and_table_name() {
        let scope = Scope::new(vec![source("users", Some("u"))], vec![], Dialect::Mysql, None);
        assert!(scope.lookup("u").is_some());
        assert!(scope.lookup("users").is_some());
        assert!(scope.lookup("orders").is_none());
    }

    #[test]
    fn test_lookup_walks_to_parent() {
        let outer = Scope::new(vec![source("users", Some("u"))], vec![], Dialect::Mysql, None);
        let inner = Scope::new(vec![source("orders", None)], vec![], Dialect::Mysql, Some(&outer));
        assert!(inner.lookup("u").is_some());
        assert!(inner.lookup("orders").is_some());
        assert!(inner.alias_visible("u"));
    }

    #[test]
    fn test_alias_visibility_follows_defining_scope() {
        let outer = Scope::new(vec![source("users", Some("u"))], vec![], Dialect::Mysql, None).without_aliases();
        let inner = Scope::new(vec![source("orders", Some("o"))], vec![], Dialect::Mysql, Some(&outer));
        assert!(!inner.alias_visible("u"));
        assert!(inner.alias_visible("o"));
        assert!(!inner.alias_visible("nobody"));
    }

    #[test]
    fn test_find_column_prefers_primary() {
        let scope = Scope::new(
            vec![source("users", None), source("orders", None)],
            vec!["total_spent".into()],
            Dialect::Mysql,
            None,
        );
        let found = scope.find_column_source("id").unwrap();
        assert!(matches!(&found.kind, SourceKind::Table(t) if t.name() == "users"));
        let found = scope.find_column_source("total").unwrap();
        assert!(matches!(&found.kind, SourceKind::Table(t) if t.name() == "orders"));
        assert!(scope.has_projection("total_spent"));
    }
}
