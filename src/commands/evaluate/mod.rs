mod cli_tests;
mod execute;
mod execute_tests;
mod output;
mod output_tests;

use std::path::PathBuf;

use clap::Args;

use super::{validate_file_exists, FilterArgs};

/// Run a filter against records from a JSON file
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  sql_compose evaluate -t users -f active.json -r users.json
  sql_compose evaluate -t users -f active.json -r page.json --skip-query-columns

Without a configured column map for the table, every filter item is evaluated in memory.")]
pub struct EvaluateCmd {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Path to a JSON array of records
    #[arg(short, long, value_parser = validate_file_exists)]
    pub records: PathBuf,

    /// Ignore SQL-backed items, assuming the database already applied them
    #[arg(long, default_value_t = false)]
    pub skip_query_columns: bool,
}
