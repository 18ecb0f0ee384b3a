//! Atomic CSV writes for aggregated tables.

use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{error, info, warn};

use tally_records::{DateStyle, SummaryTable};

use crate::error::ExportError;

/// Outcome of a write-all pass over the aggregated tables.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    /// Files successfully written
    pub written: usize,
    /// Total data rows across written files
    pub rows: usize,
    /// Files that failed to write
    pub failed: usize,
}

/// Writes one table to `<dir>/<file name>`, returning the row count.
///
/// The CSV goes to a temporary file in the destination directory and is
/// renamed over the target once complete, an interrupted run never
/// leaves a half-written file visible. Empty tables are skipped, so
/// output from an earlier run stays in place rather than turning into a
/// bare header.
pub fn write_table(
    dir: &Path,
    table: &dyn SummaryTable,
    dates: &DateStyle,
) -> Result<usize, ExportError> {
    if table.is_empty() {
        warn!(file = table.file_name(), "no rows to write, skipping");
        return Ok(0);
    }

    let target = dir.join(table.file_name());
    let rendered = table.render(dates);

    let tmp = NamedTempFile::new_in(dir).map_err(|e| ExportError::io(dir, e))?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file());
        writer
            .write_record(table.header())
            .map_err(|e| ExportError::csv(&target, e))?;
        for row in &rendered {
            writer
                .write_record(row)
                .map_err(|e| ExportError::csv(&target, e))?;
        }
        writer
            .flush()
            .map_err(|e| ExportError::csv(&target, e.into()))?;
    }
    tmp.persist(&target)
        .map_err(|e| ExportError::persist(&target, e.error))?;

    info!(
        file = table.file_name(),
        rows = rendered.len(),
        "saved aggregated table"
    );
    Ok(rendered.len())
}

/// Writes every table, isolating failures so one bad file does not stop
/// the remaining writes.
pub fn write_all(dir: &Path, tables: &[&dyn SummaryTable], dates: &DateStyle) -> WriteSummary {
    let mut summary = WriteSummary::default();
    for table in tables {
        match write_table(dir, *table, dates) {
            Ok(0) => {}
            Ok(rows) => {
                summary.written += 1;
                summary.rows += rows;
            }
            Err(err) => {
                error!(
                    file = table.file_name(),
                    error = %err,
                    "failed to write aggregated table"
                );
                summary.failed += 1;
            }
        }
    }
    summary
}

#[cfg(test)]
#[path = "write_test.rs"]
mod write_test;
