//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - `execute.rs`: the result type and the [`Execute`] implementation
//! - `output.rs`: table formatting of the result

mod compile;
mod evaluate;
mod fingerprint;

pub use compile::CompileCmd;
pub use evaluate::EvaluateCmd;
pub use fingerprint::FingerprintCmd;

use clap::{Args, Subcommand};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use crate::config::ConfigFile;
use crate::filter::QueryFilter;
use crate::output::{OutputFormat, Outputable};

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>>;
}

pub(crate) fn validate_file_exists(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("File not found: {}", path.display()))
    }
}

/// Arguments shared by every command that reads a filter.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Table the filter applies to
    #[arg(short, long)]
    pub table: String,

    /// Path to the filter JSON file
    #[arg(short, long, value_parser = validate_file_exists)]
    pub filter: PathBuf,
}

impl FilterArgs {
    pub fn read_json(&self) -> Result<String, Box<dyn Error>> {
        fs::read_to_string(&self.filter)
            .map_err(|e| format!("Failed to read {}: {}", self.filter.display(), e).into())
    }

    /// Parse the filter against the table's configured column map.
    pub fn load(&self, config: &ConfigFile) -> Result<QueryFilter, Box<dyn Error>> {
        let json = self.read_json()?;
        let columns = config.filter_columns(&self.table)?;
        Ok(QueryFilter::from_json_str(&json, columns)?)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a filter into a SELECT statement with bound parameters
    Compile(CompileCmd),

    /// Run a filter against records from a JSON file
    Evaluate(EvaluateCmd),

    /// Print the database and memory fingerprints of a filter
    Fingerprint(FingerprintCmd),

    /// Catch-all for unknown commands
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

impl Command {
    /// Execute the command and return formatted output
    pub fn run(self, config: &ConfigFile, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        match self {
            Command::Compile(cmd) => {
                let result = cmd.execute(config)?;
                Ok(result.format(format))
            }
            Command::Evaluate(cmd) => {
                let result = cmd.execute(config)?;
                Ok(result.format(format))
            }
            Command::Fingerprint(cmd) => {
                let result = cmd.execute(config)?;
                Ok(result.format(format))
            }
            Command::Unknown(args) => {
                Err(format!("Unknown command: {}", args.first().unwrap_or(&String::new())).into())
            }
        }
    }
}
