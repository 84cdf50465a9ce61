//! CLI parsing tests for evaluate command.

#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use crate::commands::Command;
    use clap::Parser;
    use rstest::{fixture, rstest};
    use tempfile::NamedTempFile;

    #[fixture]
    fn json_file() -> NamedTempFile {
        crate::test_utils::create_temp_json_file("[]")
    }

    crate::cli_required_arg_test! {
        command: "evaluate",
        test_name: test_evaluate_requires_records,
        required_arg: "--records",
    }

    #[rstest]
    fn test_evaluate_arguments(json_file: NamedTempFile) {
        let path = json_file.path().to_str().unwrap();
        let args = Args::try_parse_from([
            "sql_compose", "evaluate", "-t", "users", "-f", path, "-r", path, "--skip-query-columns",
        ])
        .unwrap();
        match args.command {
            Command::Evaluate(cmd) => {
                assert_eq!(cmd.filter.table, "users");
                assert_eq!(cmd.records, json_file.path());
                assert!(cmd.skip_query_columns);
            }
            _ => panic!("Expected Evaluate command"),
        }
    }

    #[rstest]
    fn test_evaluate_records_must_exist(json_file: NamedTempFile) {
        let path = json_file.path().to_str().unwrap();
        let result = Args::try_parse_from([
            "sql_compose", "evaluate", "-t", "users", "-f", path, "-r", "missing_records.json",
        ]);
        assert!(result.unwrap_err().to_string().contains("File not found"));
    }
}
