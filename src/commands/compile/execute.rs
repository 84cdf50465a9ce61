use std::error::Error;

use serde::Serialize;
use tracing::debug;

use super::CompileCmd;
use crate::commands::Execute;
use crate::config::ConfigFile;
use crate::executor::expand_table_placeholders;
use crate::filter::Fingerprint;
use crate::query::Query;
use crate::value::Value;

/// Result of the compile command execution
#[derive(Debug, Serialize)]
pub struct CompileResult {
    pub table: String,
    pub sql: String,
    pub params: Vec<Value>,
    pub fingerprint: Fingerprint,
}

impl Execute for CompileCmd {
    type Output = CompileResult;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>> {
        let filter = self.filter.load(config)?;
        let schema = config.schema_cache()?;

        let mut query = Query::table(&schema, &self.filter.table)?;
        if !self.select.is_empty() {
            let columns: Vec<&str> = self.select.iter().map(String::as_str).collect();
            query.select(&columns);
        }
        filter.apply(&mut query);
        query.limit(self.offset, self.limit);

        let compiled = query.compile()?;
        debug!(table = %self.filter.table, params = compiled.params.len(), "compiled filter");

        let sql = if self.expand {
            expand_table_placeholders(&compiled.sql, &config.table_prefix)
        } else {
            compiled.sql
        };

        Ok(CompileResult {
            table: self.filter.table,
            sql,
            params: compiled.params,
            fingerprint: filter.fingerprint(),
        })
    }
}
