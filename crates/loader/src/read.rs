//! CSV reading with per-row leniency.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use tally_records::TableData;

/// Reads one raw table, returning `None` when the file is absent or
/// unreadable.
///
/// The `required` columns are advisory: their absence is logged and the
/// dependent metrics degrade, the load itself continues. Rows that fail
/// to deserialize are dropped individually, not per-table.
pub fn read_table<T: DeserializeOwned>(
    dir: &Path,
    file_name: &'static str,
    required: &[&str],
) -> Option<TableData<T>> {
    let path = dir.join(file_name);
    let mut reader = match csv::Reader::from_path(&path) {
        Ok(reader) => reader,
        Err(err) if is_not_found(&err) => {
            warn!(file = file_name, "raw table not found, skipping");
            return None;
        }
        Err(err) => {
            warn!(file = file_name, error = %err, "raw table could not be opened, skipping");
            return None;
        }
    };

    let columns: Vec<String> = match reader.headers() {
        Ok(headers) => headers.iter().map(str::to_string).collect(),
        Err(err) => {
            warn!(file = file_name, error = %err, "raw table has no readable header, skipping");
            return None;
        }
    };

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| !columns.iter().any(|c| c == name))
        .collect();
    if !missing.is_empty() {
        warn!(
            file = file_name,
            columns = %missing.join(", "),
            "expected columns missing, dependent metrics will be defaulted"
        );
    }

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for record in reader.deserialize() {
        match record {
            Ok(row) => rows.push(row),
            Err(err) => {
                dropped += 1;
                debug!(file = file_name, error = %err, "dropping malformed row");
            }
        }
    }
    if dropped > 0 {
        warn!(file = file_name, dropped, "malformed rows dropped");
    }

    info!(file = file_name, rows = rows.len(), "loaded raw table");
    Some(TableData::new(rows, columns))
}

fn is_not_found(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound)
}

#[cfg(test)]
#[path = "read_test.rs"]
mod read_test;
