//! Output formatting for compile command results.

use super::execute::CompileResult;
use crate::output::{format_params, Outputable};

impl Outputable for CompileResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Table: {}", self.table));
        lines.push(String::new());
        lines.push(self.sql.clone());
        lines.push(String::new());

        if self.params.is_empty() {
            lines.push("Params: none".to_string());
        } else {
            lines.push(format!("Params ({}):", self.params.len()));
            lines.extend(format_params(&self.params));
        }

        lines.join("\n")
    }
}
