mod execute;
mod output;

use clap::Args;

use super::FilterArgs;

/// Compile a filter into a SELECT statement with bound parameters
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  sql_compose compile -t users -f active.json              # SELECT * with the filter's WHERE
  sql_compose compile -t users -f active.json -s id,name   # Project two columns
  sql_compose compile -t users -f active.json -l 20 --expand")]
pub struct CompileCmd {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Columns to select, comma separated (all columns when omitted)
    #[arg(short, long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Maximum number of rows (0 for no limit)
    #[arg(short, long, default_value_t = 0)]
    pub limit: u64,

    /// Number of rows to skip
    #[arg(long, default_value_t = 0)]
    pub offset: u64,

    /// Expand {table} placeholders with the configured table prefix
    #[arg(long, default_value_t = false)]
    pub expand: bool,
}
