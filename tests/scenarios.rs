//! End-to-end rendering of the documented builder scenarios.

mod common;

use common::{users, where_clause};
use rstest::rstest;
use sql_compose::filter::FilterColumns;
use sql_compose::{Conditional, QueryFilter, Value};

#[rstest]
fn test_ternary_comparison() {
    let mut query = users();
    query.where_(("age", ">", 18));
    let (sql, params) = where_clause(&query);
    assert_eq!(sql, "({users}.`age` > ?)");
    assert_eq!(params, vec![Value::Int(18)]);
}

#[rstest]
fn test_map_with_null() {
    let mut query = users();
    query.where_(vec![("status", Value::from("active")), ("deleted", Value::Null)]);
    let (sql, params) = where_clause(&query);
    assert_eq!(sql, "({users}.`status` = ?) AND ({users}.`deleted` IS NULL)");
    assert_eq!(params, vec![Value::from("active")]);
}

#[rstest]
fn test_list_becomes_in() {
    let mut query = users();
    query.where_(("id", vec![1, 2, 3]));
    let (sql, params) = where_clause(&query);
    assert_eq!(sql, "({users}.`id` IN (?, ?, ?))");
    assert_eq!(params, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[rstest]
fn test_empty_list_is_false() {
    let mut query = users();
    query.where_(("id", Vec::<i64>::new()));
    let (sql, params) = where_clause(&query);
    assert_eq!(sql, "(FALSE)");
    assert!(params.is_empty());
}

#[rstest]
fn test_inner_join() {
    let mut query = users();
    query.join("orders", "users.id", "orders.user_id").unwrap();
    assert_eq!(
        query.compile().unwrap().sql,
        "SELECT * FROM {users} INNER JOIN {orders} ON ({users}.`id` = {orders}.`user_id`)"
    );
}

#[rstest]
fn test_and_not_filter_group() {
    let columns = FilterColumns::new().sql("active", "users.active");
    let filter = QueryFilter::from_json_str(
        r#"{"operator": "andNot", "items": [{"name": "active", "comparator": "isTrue"}]}"#,
        &columns,
    )
    .unwrap();

    let mut query = users();
    query.where_(("age", ">=", 21));
    filter.apply(&mut query);

    let (sql, params) = where_clause(&query);
    assert_eq!(sql, "({users}.`age` >= ?) AND NOT ({users}.`active` = TRUE)");
    assert_eq!(params, vec![Value::Int(21)]);
}

#[rstest]
fn test_correlated_subquery() {
    let schema = common::schema();
    let mut inner = sql_compose::Query::table(&schema, "orders").unwrap();
    inner.select(&["user_id"]).where_(("total", ">", 100));

    let mut query = users();
    query.where_(("id", inner));
    let (sql, params) = where_clause(&query);
    assert_eq!(
        sql,
        "({users}.`id` IN (SELECT {orders}.`user_id` FROM {orders} WHERE ({orders}.`total` > ?)))"
    );
    assert_eq!(params, vec![Value::Int(100)]);
}

#[rstest]
fn test_unknown_column_fails_to_compile() {
    let mut query = users();
    query.where_(("nickname", "bob"));
    let err = query.compile().unwrap_err();
    assert_eq!(err.to_string(), "Unknown column 'nickname' in 'users'");
}
