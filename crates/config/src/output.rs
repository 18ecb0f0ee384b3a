//! Output rendering configuration

use serde::Deserialize;
use tally_records::{DEFAULT_DATE_FORMAT, DateStyle};

use crate::error::{ConfigError, Result};

/// Rendering of the aggregated tables
///
/// # Example
///
/// ```toml
/// [output]
/// date_format = "%Y-%m-%d"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// strftime-style format for date columns in the output tables.
    /// Dashboards re-parse these strings, so the format must round-trip.
    /// Default: %d/%m/%Y
    pub date_format: String,
}

impl OutputConfig {
    /// Build the validated date style, rejecting formats that do not
    /// render or re-parse.
    pub fn date_style(&self) -> Result<DateStyle> {
        DateStyle::new(&self.date_format)
            .map_err(|e| ConfigError::invalid_value("output", "date_format", e.to_string()))
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format() {
        let config = OutputConfig::default();
        assert_eq!(config.date_format, "%d/%m/%Y");
        assert!(config.date_style().is_ok());
    }

    #[test]
    fn test_iso_format_accepted() {
        let config: OutputConfig = toml::from_str("date_format = \"%Y-%m-%d\"").unwrap();
        assert!(config.date_style().is_ok());
    }

    #[test]
    fn test_lossy_format_rejected() {
        let config: OutputConfig = toml::from_str("date_format = \"%m/%Y\"").unwrap();
        let err = config.date_style().unwrap_err();
        assert!(err.to_string().contains("date_format"));
    }
}
