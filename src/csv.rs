//! Decoding for the published tabular files.
//!
//! The dataset is plain comma-separated text: a header line naming the
//! columns, then one record per line. There is no quoting or escaping, so
//! decoding is a straight split. A line counts as a data row only when its
//! field count matches the header and at least one field is non-empty;
//! anything else is skipped, never fatal.

use std::collections::HashMap;

use tracing::warn;

/// One decoded record: column name to cell value.
pub type Row = HashMap<String, String>;

/// Decode raw tabular text into rows. Empty input yields no rows.
pub fn decode(text: &str) -> Vec<Row> {
    let mut lines = text.trim().lines();

    let headers: Vec<String> = match lines.next() {
        Some(line) if !line.trim().is_empty() => {
            line.split(',').map(|h| h.trim().to_string()).collect()
        }
        _ => return Vec::new(),
    };

    let mut rows = Vec::new();
    for line in lines {
        let values: Vec<&str> = line.split(',').map(|v| v.trim()).collect();
        let has_content = values.iter().any(|v| !v.is_empty());

        if values.len() == headers.len() && has_content {
            rows.push(
                headers
                    .iter()
                    .cloned()
                    .zip(values.iter().map(|v| v.to_string()))
                    .collect(),
            );
        } else if has_content {
            warn!(line = %line, "skipping malformed row");
        }
    }

    rows
}
