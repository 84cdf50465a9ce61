use std::error::Error;
use std::fs;

use serde::Serialize;

use super::EvaluateCmd;
use crate::commands::Execute;
use crate::config::ConfigFile;
use crate::executor::Row;
use crate::filter::QueryFilter;

/// Result of the evaluate command execution
#[derive(Debug, Serialize)]
pub struct EvaluateResult {
    pub table: String,
    pub total: usize,
    pub matched: usize,
    pub records: Vec<Row>,
}

impl Execute for EvaluateCmd {
    type Output = EvaluateResult;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>> {
        let json = self.filter.read_json()?;
        let filter = match config.filters.get(&self.filter.table) {
            Some(columns) => QueryFilter::from_json_str(&json, columns)?,
            None => QueryFilter::from_json_str(&json, &QueryFilter::memory_columns(&json)?)?,
        };

        let content = fs::read_to_string(&self.records)
            .map_err(|e| format!("Failed to read {}: {}", self.records.display(), e))?;
        let records: Vec<Row> = serde_json::from_str(&content)
            .map_err(|e| format!("Invalid records in {}: {}", self.records.display(), e))?;

        let total = records.len();
        let records: Vec<Row> = records
            .into_iter()
            .filter(|record| filter.evaluate(record, self.skip_query_columns))
            .collect();

        Ok(EvaluateResult {
            table: self.filter.table,
            total,
            matched: records.len(),
            records,
        })
    }
}
