//! In-memory evaluation of a filter against already fetched records.

use crate::executor::Row;
use crate::value::Value;

use super::{ColumnTarget, FilterGroup, FilterItem, FilterNode, GroupOperator, QueryFilter};

impl QueryFilter {
    /// Test `record` against the filter.
    ///
    /// With `skip_query_column`, the record is assumed to come from a query the
    /// filter was [applied](Self::apply) to, and only the part the database did
    /// not enforce is checked. Inside OR and `andNot` groups that were left out
    /// of the SQL, every item is checked.
    pub fn evaluate(&self, record: &Row, skip_query_column: bool) -> bool {
        if skip_query_column {
            evaluate_residual(&self.root, record)
        } else {
            evaluate_group(&self.root, record)
        }
    }

    /// The records of `records` that pass [`evaluate`](Self::evaluate).
    pub fn retain<'r>(&self, records: &'r [Row], skip_query_column: bool) -> Vec<&'r Row> {
        records
            .iter()
            .filter(|record| self.evaluate(record, skip_query_column))
            .collect()
    }
}

/// Full evaluation; an empty group does not constrain the result.
fn evaluate_group(group: &FilterGroup, record: &Row) -> bool {
    if group.children.is_empty() {
        return true;
    }
    let mut outcomes = group.children.iter().map(|child| match child {
        FilterNode::Group(inner) => evaluate_group(inner, record),
        FilterNode::Item(item) => evaluate_item(item, record),
    });
    match group.operator {
        GroupOperator::And => outcomes.all(|outcome| outcome),
        GroupOperator::AndNot => !outcomes.all(|outcome| outcome),
        GroupOperator::Or => outcomes.any(|outcome| outcome),
    }
}

/// Evaluation of what the SQL lowering left out.
fn evaluate_residual(group: &FilterGroup, record: &Row) -> bool {
    if group.is_sql_only() {
        return true;
    }
    if group.operator != GroupOperator::And {
        return evaluate_group(group, record);
    }
    group.children.iter().all(|child| match child {
        FilterNode::Group(inner) => evaluate_residual(inner, record),
        FilterNode::Item(item) => match item.target {
            ColumnTarget::Sql(_) => true,
            ColumnTarget::MemoryOnly => evaluate_item(item, record),
        },
    })
}

fn evaluate_item(item: &FilterItem, record: &Row) -> bool {
    let actual = record.get(&item.name).unwrap_or(&Value::Null);
    item.comparator.matches(actual, &item.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterColumns;
    use crate::fixtures;
    use rstest::{fixture, rstest};

    #[fixture]
    fn records() -> Vec<Row> {
        serde_json::from_str(fixtures::USER_RECORDS).unwrap()
    }

    #[fixture]
    fn columns() -> FilterColumns {
        serde_json::from_str(fixtures::USER_COLUMNS).unwrap()
    }

    fn ids(rows: Vec<&Row>) -> Vec<i64> {
        rows.iter().filter_map(|row| row.get("id").and_then(Value::as_i64)).collect()
    }

    #[rstest]
    fn test_full_evaluation(records: Vec<Row>, columns: FilterColumns) {
        let filter = QueryFilter::from_json_str(fixtures::USER_FILTER, &columns).unwrap();
        assert_eq!(ids(filter.retain(&records, false)), vec![1, 4]);
    }

    #[rstest]
    fn test_skip_query_columns_checks_memory_only(records: Vec<Row>, columns: FilterColumns) {
        let filter = QueryFilter::from_json_str(fixtures::USER_FILTER, &columns).unwrap();
        assert_eq!(ids(filter.retain(&records, true)), vec![1, 3, 4]);
    }

    #[rstest]
    fn test_and_not_negates(records: Vec<Row>, columns: FilterColumns) {
        let json = r#"{"operator": "andNot", "items": [{"name": "active", "comparator": "isTrue"}]}"#;
        let filter = QueryFilter::from_json_str(json, &columns).unwrap();
        assert_eq!(ids(filter.retain(&records, false)), vec![2]);
    }

    #[rstest]
    fn test_fully_skipped_filter_keeps_everything(records: Vec<Row>, columns: FilterColumns) {
        let json = r#"{"operator": "andNot", "items": [{"name": "status", "comparator": "equal", "value": "x"}]}"#;
        let filter = QueryFilter::from_json_str(json, &columns).unwrap();
        assert_eq!(filter.retain(&records, true).len(), records.len());
    }

    #[rstest]
    fn test_missing_field_is_null(columns: FilterColumns) {
        let json = r#"{"items": [{"name": "age", "comparator": "isNull"}]}"#;
        let filter = QueryFilter::from_json_str(json, &columns).unwrap();
        assert!(filter.evaluate(&Row::new(), false));
    }

    #[rstest]
    fn test_date_comparators(records: Vec<Row>, columns: FilterColumns) {
        let json = r#"{"items": [{"name": "created_at", "comparator": "dateAfterEq", "value": "2024-03-01"}]}"#;
        let filter = QueryFilter::from_json_str(json, &columns).unwrap();
        assert_eq!(ids(filter.retain(&records, false)), vec![1, 2]);
    }

    fn mixed(operator: &str, prefix: &str, columns: &FilterColumns) -> QueryFilter {
        let json = format!(
            r#"{{"operator": "{}", "items": [
                {{"name": "name", "comparator": "startWith", "value": "{}"}},
                {{"name": "score", "comparator": "more", "value": 10}}]}}"#,
            operator, prefix
        );
        QueryFilter::from_json_str(&json, columns).unwrap()
    }

    #[rstest]
    #[case("or", "Bo", vec![1, 2, 3])]
    #[case("andNot", "Al", vec![2, 4])]
    fn test_mixed_groups_check_every_item(
        records: Vec<Row>,
        columns: FilterColumns,
        #[case] operator: &str,
        #[case] prefix: &str,
        #[case] expected: Vec<i64>,
    ) {
        let filter = mixed(operator, prefix, &columns);
        assert_eq!(ids(filter.retain(&records, false)), expected);
        // Nothing reached the SQL, so the skipping pass must check the SQL items too
        assert_eq!(ids(filter.retain(&records, true)), expected);
    }

    #[rstest]
    fn test_database_then_memory_equals_full_filter(records: Vec<Row>, columns: FilterColumns) {
        let json = r#"{"operator": "and", "items": [
            {"name": "status", "comparator": "equal", "value": "active"},
            {"@type": "group", "operator": "or", "items": [
                {"name": "name", "comparator": "startWith", "value": "Bo"},
                {"name": "score", "comparator": "more", "value": 10}]}]}"#;
        let filter = QueryFilter::from_json_str(json, &columns).unwrap();

        // The lowered SQL keeps only the status test
        let fetched: Vec<Row> = records
            .iter()
            .filter(|row| row.get("status") == Some(&Value::from("active")))
            .cloned()
            .collect();
        assert_eq!(ids(filter.retain(&fetched, true)), vec![1, 2]);
        assert_eq!(ids(filter.retain(&records, false)), vec![1, 2]);
    }

    #[rstest]
    fn test_not_equal_skips_null_fields_like_sql(columns: FilterColumns) {
        let json = r#"{"items": [{"name": "status", "comparator": "notEqual", "value": "banned"}]}"#;
        let filter = QueryFilter::from_json_str(json, &columns).unwrap();

        let mut group = crate::query::ConditionGroup::new();
        filter.apply(&mut group);
        let sql = group.compile_clause(&crate::test_utils::users_scope()).unwrap().sql;
        assert_eq!(sql, "({users}.`status` <> ?)");

        let null_status: Row = [("status".to_string(), Value::Null)].into_iter().collect();
        assert!(!filter.evaluate(&null_status, false));
        assert!(!filter.evaluate(&Row::new(), false));
    }
}
