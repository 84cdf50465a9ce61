//! Property tests for condition compilation.

mod common;

use common::{users, where_clause};
use proptest::prelude::*;
use sql_compose::{Conditional, Value};

const COLUMNS: [&str; 5] = ["id", "age", "score", "name", "status"];

fn scalar() -> impl Strategy<Value = Option<i64>> {
    prop_oneof![Just(None), any::<i64>().prop_map(Some)]
}

fn operator() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["=", "<>", "<", "<=", ">", ">="])
}

proptest! {
    #[test]
    fn prop_map_params_match_non_null_values(values in prop::collection::vec(scalar(), 1..=5)) {
        let entries: Vec<(&str, Value)> = COLUMNS
            .iter()
            .zip(&values)
            .map(|(column, value)| (*column, Value::from(*value)))
            .collect();
        let nulls = values.iter().filter(|v| v.is_none()).count();

        let mut query = users();
        query.where_(entries);
        let (sql, params) = where_clause(&query);

        prop_assert_eq!(params.len(), values.len() - nulls);
        prop_assert_eq!(sql.matches('?').count(), params.len());
        prop_assert_eq!(sql.matches(" IS NULL").count(), nulls);
    }

    #[test]
    fn prop_lists_compile_to_in_or_false(ids in prop::collection::vec(any::<i32>(), 0..8), negate in any::<bool>()) {
        let mut query = users();
        if negate {
            query.where_(("id", "not in", ids.clone()));
        } else {
            query.where_(("id", ids.clone()));
        }
        let (sql, params) = where_clause(&query);

        if ids.is_empty() {
            prop_assert_eq!(sql, "(FALSE)");
            prop_assert!(params.is_empty());
        } else {
            let keyword = if negate { " NOT IN (" } else { " IN (" };
            prop_assert!(sql.contains(keyword));
            prop_assert_eq!(params.len(), ids.len());
        }
    }

    #[test]
    fn prop_compile_is_idempotent(age in any::<i64>(), op in operator(), names in prop::collection::vec("[a-z]{1,8}", 0..4)) {
        let mut query = users();
        query
            .where_(("age", op, age))
            .where_or(("name", names))
            .where_not(("status", "banned"));
        query.resolve().unwrap();
        prop_assert_eq!(query.compile().unwrap(), query.compile().unwrap());
    }

    #[test]
    fn prop_where_not_only_wraps_in_not(age in any::<i64>(), op in operator(), status in "[a-z]{1,8}") {
        let mut plain = users();
        plain.where_group(|g| {
            g.where_(("age", op, age)).where_or(("status", status.as_str()));
        });
        let mut negated = users();
        negated.where_not_group(|g| {
            g.where_(("age", op, age)).where_or(("status", status.as_str()));
        });

        let (plain_sql, plain_params) = where_clause(&plain);
        let (negated_sql, negated_params) = where_clause(&negated);
        prop_assert_eq!(format!("NOT {}", plain_sql), negated_sql);
        prop_assert_eq!(plain_params, negated_params);
    }
}
