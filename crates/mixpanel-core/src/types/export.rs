//! Raw event records from the export endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// A single exported event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub event: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl ExportRecord {
    /// The event's `distinct_id` property, when it is a string.
    pub fn distinct_id(&self) -> Option<&str> {
        self.properties.get("distinct_id").and_then(Value::as_str)
    }

    /// The event's `time` property in Unix seconds.
    pub fn time(&self) -> Option<i64> {
        self.properties.get("time").and_then(Value::as_i64)
    }
}

/// Decode a newline-delimited export body.
///
/// Blank lines are ignored. A line that fails to decode is logged with its raw
/// content and skipped; the remaining records are still returned.
pub fn parse_export_lines(body: &[u8]) -> Vec<ExportRecord> {
    let text = String::from_utf8_lossy(body);
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for line in text.split('\n') {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ExportRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                warn!(error = %e, line = %line, "Skipping malformed export record");
            }
        }
    }

    debug!(records = records.len(), skipped, "Decoded export body");
    records
}
