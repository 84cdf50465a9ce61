//! Execute tests for evaluate command.

#[cfg(test)]
mod tests {
    use super::super::EvaluateCmd;
    use crate::commands::{Execute, FilterArgs};
    use crate::config::ConfigFile;
    use crate::fixtures;
    use crate::test_utils::{create_temp_json_file, test_config};
    use crate::value::Value;
    use rstest::{fixture, rstest};
    use tempfile::NamedTempFile;

    #[fixture]
    fn records() -> NamedTempFile {
        create_temp_json_file(fixtures::USER_RECORDS)
    }

    fn cmd(table: &str, filter: &NamedTempFile, records: &NamedTempFile, skip: bool) -> EvaluateCmd {
        EvaluateCmd {
            filter: FilterArgs {
                table: table.to_string(),
                filter: filter.path().to_path_buf(),
            },
            records: records.path().to_path_buf(),
            skip_query_columns: skip,
        }
    }

    fn ids(result: &super::super::execute::EvaluateResult) -> Vec<Value> {
        result.records.iter().map(|r| r["id"].clone()).collect()
    }

    #[rstest]
    fn test_evaluate_all_items(records: NamedTempFile) {
        let filter = create_temp_json_file(fixtures::USER_FILTER);
        let result = cmd("users", &filter, &records, false).execute(&test_config()).unwrap();
        assert_eq!(result.total, 4);
        assert_eq!(result.matched, 2);
        assert_eq!(ids(&result), vec![Value::Int(1), Value::Int(4)]);
    }

    #[rstest]
    fn test_evaluate_memory_items_only(records: NamedTempFile) {
        let filter = create_temp_json_file(fixtures::USER_FILTER);
        let result = cmd("users", &filter, &records, true).execute(&test_config()).unwrap();
        assert_eq!(ids(&result), vec![Value::Int(1), Value::Int(3), Value::Int(4)]);
    }

    #[rstest]
    fn test_evaluate_without_column_map(records: NamedTempFile) {
        let filter = create_temp_json_file(fixtures::USER_FILTER);
        // Every item is memory-only, so skipping query columns skips nothing
        let result = cmd("people", &filter, &records, true).execute(&ConfigFile::default()).unwrap();
        assert_eq!(result.matched, 2);
    }

    #[rstest]
    fn test_evaluate_rejects_non_array_records() {
        let filter = create_temp_json_file(fixtures::USER_FILTER);
        let records = create_temp_json_file(r#"{"id": 1}"#);
        let err = cmd("users", &filter, &records, false).execute(&test_config()).unwrap_err();
        assert!(err.to_string().contains("Invalid records"));
    }
}
