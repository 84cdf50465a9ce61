//! Output formatting for fingerprint command results.

use super::execute::FingerprintResult;
use crate::output::Outputable;

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

impl Outputable for FingerprintResult {
    fn to_table(&self) -> String {
        let mut lines = vec![
            format!("Fingerprint: {}", self.table),
            String::new(),
            format!("  db:     {}", or_dash(&self.db)),
            format!("  memory: {}", or_dash(&self.memory)),
        ];
        if let Some(reusable) = self.reusable {
            lines.push(String::new());
            lines.push(format!("Cached rows reusable: {}", if reusable { "yes" } else { "no" }));
        }
        lines.join("\n")
    }
}
