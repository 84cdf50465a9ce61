use std::error::Error;

use serde::Serialize;

use super::FingerprintCmd;
use crate::commands::{Execute, FilterArgs};
use crate::config::ConfigFile;

/// Result of the fingerprint command execution
#[derive(Debug, Serialize)]
pub struct FingerprintResult {
    pub table: String,
    pub db: String,
    pub memory: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reusable: Option<bool>,
}

impl Execute for FingerprintCmd {
    type Output = FingerprintResult;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>> {
        let fingerprint = self.filter.load(config)?.fingerprint();

        let reusable = match self.against {
            Some(path) => {
                let other = FilterArgs {
                    table: self.filter.table.clone(),
                    filter: path,
                };
                Some(other.load(config)?.fingerprint().is_reusable_for(&fingerprint))
            }
            None => None,
        };

        Ok(FingerprintResult {
            table: self.filter.table,
            db: fingerprint.db,
            memory: fingerprint.memory,
            reusable,
        })
    }
}
