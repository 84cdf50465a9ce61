//! Shared setup for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use sql_compose::{Dialect, Query, Schema, StaticSchema};

pub const CATALOG: &str = r#"{
  "users": {
    "id":         {"position": 1, "nullable": false, "type": "int"},
    "name":       {"position": 2, "nullable": false, "type": "varchar"},
    "email":      {"position": 3, "type": "varchar"},
    "age":        {"position": 4, "type": "int"},
    "active":     {"position": 5, "nullable": false, "type": "bool"},
    "deleted":    {"position": 6, "type": "datetime"},
    "status":     {"position": 7, "type": "varchar"},
    "score":      {"position": 8, "type": "int"}
  },
  "orders": {
    "id":      {"position": 1, "nullable": false, "type": "int"},
    "user_id": {"position": 2, "nullable": false, "type": "int"},
    "total":   {"position": 3, "type": "decimal"}
  }
}"#;

pub fn schema() -> Arc<Schema> {
    let catalog = StaticSchema::from_json_str(CATALOG).expect("catalog should parse");
    Arc::new(Schema::new(catalog).with_dialect(Dialect::Mysql))
}

pub fn users() -> Query {
    Query::table(&schema(), "users").expect("users table should exist")
}

/// The WHERE body of a compiled SELECT, or the empty string.
pub fn where_clause(query: &Query) -> (String, Vec<sql_compose::Value>) {
    let compiled = query.compile().expect("query should compile");
    let body = compiled
        .sql
        .split_once(" WHERE ")
        .map(|(_, rest)| rest.to_string())
        .unwrap_or_default();
    (body, compiled.params)
}
