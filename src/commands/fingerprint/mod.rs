mod execute;
mod output;

use std::path::PathBuf;

use clap::Args;

use super::{validate_file_exists, FilterArgs};

/// Print the database and memory fingerprints of a filter
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  sql_compose fingerprint -t users -f active.json
  sql_compose fingerprint -t users -f active.json --against cached.json   # Can cached rows be reused?")]
pub struct FingerprintCmd {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// A second filter whose fetched rows might be reused for this one
    #[arg(long, value_parser = validate_file_exists)]
    pub against: Option<PathBuf>,
}
