//! Output formatting tests for evaluate command.

#[cfg(test)]
mod tests {
    use super::super::execute::EvaluateResult;
    use crate::executor::Row;
    use crate::value::Value;
    use rstest::{fixture, rstest};

    const TABLE_OUTPUT: &str = "\
Evaluate: users (1 of 3 matched)

  {\"id\":1,\"name\":\"Alice\"}";

    const EMPTY_TABLE_OUTPUT: &str = "\
Evaluate: users (0 of 3 matched)

No matching records.";

    const EMPTY_JSON_OUTPUT: &str = r#"{
  "table": "users",
  "total": 3,
  "matched": 0,
  "records": []
}"#;

    #[fixture]
    fn matched() -> EvaluateResult {
        let record = Row::from([
            ("id".to_string(), Value::Int(1)),
            ("name".to_string(), Value::from("Alice")),
        ]);
        EvaluateResult {
            table: "users".to_string(),
            total: 3,
            matched: 1,
            records: vec![record],
        }
    }

    #[fixture]
    fn none_matched() -> EvaluateResult {
        EvaluateResult {
            table: "users".to_string(),
            total: 3,
            matched: 0,
            records: vec![],
        }
    }

    crate::output_table_test! {
        test_name: test_to_table,
        fixture: matched,
        fixture_type: EvaluateResult,
        expected: TABLE_OUTPUT,
    }

    crate::output_table_test! {
        test_name: test_to_table_empty,
        fixture: none_matched,
        fixture_type: EvaluateResult,
        expected: EMPTY_TABLE_OUTPUT,
    }

    crate::output_table_test! {
        test_name: test_format_json_empty,
        fixture: none_matched,
        fixture_type: EvaluateResult,
        expected: EMPTY_JSON_OUTPUT,
        format: Json,
    }

    crate::output_json_test! {
        test_name: test_format_json,
        fixture: matched,
        fixture_type: EvaluateResult,
        assertions: {
            "matched": 1,
            "total": 3,
        },
    }
}
