//! Shared test fixture data.

/// Catalog used by most tests: `users`, `orders` and `posts`.
pub const SCHEMA: &str = r#"{
  "users": {
    "id":         {"position": 1, "nullable": false, "type": "int"},
    "name":       {"position": 2, "nullable": false, "type": "varchar"},
    "email":      {"position": 3, "type": "varchar"},
    "age":        {"position": 4, "type": "int"},
    "active":     {"position": 5, "nullable": false, "default": true, "type": "bool"},
    "deleted_at": {"position": 6, "type": "datetime"},
    "status":     {"position": 7, "default": "pending", "type": "varchar"},
    "created_at": {"position": 8, "nullable": false, "type": "datetime"},
    "score":      {"position": 9, "default": 0, "type": "int"}
  },
  "orders": {
    "id":         {"position": 1, "nullable": false, "type": "int"},
    "user_id":    {"position": 2, "nullable": false, "type": "int"},
    "total":      {"position": 3, "type": "decimal"},
    "status":     {"position": 4, "type": "varchar"},
    "created_at": {"position": 5, "type": "datetime"}
  },
  "posts": {
    "id":        {"position": 1, "nullable": false, "type": "int"},
    "user_id":   {"position": 2, "nullable": false, "type": "int"},
    "title":     {"position": 3, "type": "varchar"},
    "body":      {"position": 4, "type": "text"},
    "published": {"position": 5, "type": "bool"}
  }
}"#;

/// Filter column map for `users`; `score` is memory-only.
pub const USER_COLUMNS: &str = r#"{
  "name": "users.name",
  "email": "users.email",
  "age": "users.age",
  "active": "users.active",
  "status": "users.status",
  "created_at": "users.created_at",
  "score": null
}"#;

/// A nested filter touching SQL-backed and memory-only columns.
pub const USER_FILTER: &str = r#"{
  "operator": "and",
  "items": [
    {"name": "status", "comparator": "equal", "value": "active"},
    {"name": "score", "comparator": "moreEq", "value": 10},
    {
      "@type": "group",
      "operator": "or",
      "items": [
        {"name": "name", "comparator": "startWith", "value": "Al"},
        {"name": "email", "comparator": "endWith", "value": "@example.com"}
      ]
    }
  ]
}"#;

/// In-memory records matching the `users` catalog.
pub const USER_RECORDS: &str = r#"[
  {"id": 1, "name": "Alice", "email": "alice@example.com", "status": "active", "score": 12, "active": true,  "created_at": "2024-03-01 10:00:00"},
  {"id": 2, "name": "Bob",   "email": "bob@example.com",   "status": "active", "score": 4,  "active": false, "created_at": "2024-05-20 08:30:00"},
  {"id": 3, "name": "Alan",  "email": "alan@corp.test",    "status": "banned", "score": 30, "active": true,  "created_at": "2023-12-31 23:59:59"},
  {"id": 4, "name": "Cara",  "email": "cara@example.com",  "status": "active", "score": 10, "active": true,  "created_at": "2024-01-15 12:00:00"}
]"#;
