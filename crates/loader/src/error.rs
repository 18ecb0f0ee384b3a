//! Loader error types

use std::path::Path;

use thiserror::Error;

/// Errors that abort a pipeline run during loading
#[derive(Debug, Error)]
pub enum LoadError {
    /// A mandatory raw table is missing or unreadable
    #[error("mandatory table '{table}' could not be loaded from {path}")]
    MissingTable {
        /// File name of the table
        table: &'static str,
        /// Directory that was searched
        path: String,
    },
}

impl LoadError {
    /// Create a MissingTable error
    pub fn missing_table(table: &'static str, dir: &Path) -> Self {
        Self::MissingTable {
            table,
            path: dir.display().to_string(),
        }
    }
}
