//! Directory layout configuration

use std::path::PathBuf;

use serde::Deserialize;

/// Input, output and log directories
///
/// Missing directories are created on startup, not treated as errors.
///
/// # Example
///
/// ```toml
/// [paths]
/// raw_data_dir = "data/raw"
/// aggregated_data_dir = "data/aggregated"
/// log_dir = "data/logs"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the raw event CSVs
    /// Default: raw_data
    pub raw_data_dir: PathBuf,

    /// Directory the aggregated tables are written to
    /// Default: aggregated_data
    pub aggregated_data_dir: PathBuf,

    /// Directory for the run log file
    /// Default: logs
    pub log_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_data_dir: PathBuf::from("raw_data"),
            aggregated_data_dir: PathBuf::from("aggregated_data"),
            log_dir: PathBuf::from("logs"),
        }
    }
}
