//! Output formatting for evaluate command results.

use super::execute::EvaluateResult;
use crate::output::Outputable;

impl Outputable for EvaluateResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Evaluate: {} ({} of {} matched)", self.table, self.matched, self.total));
        lines.push(String::new());

        if self.records.is_empty() {
            lines.push("No matching records.".to_string());
        }
        for record in &self.records {
            lines.push(format!("  {}", serde_json::to_string(record).unwrap_or_default()));
        }

        lines.join("\n")
    }
}
