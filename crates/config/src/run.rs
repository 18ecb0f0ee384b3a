//! Run window configuration

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Optional inclusive date window applied to date-keyed aggregations
///
/// Lifetime metrics always cover the full order history regardless of
/// the window. Both bounds default to unset, which processes all data.
///
/// # Example
///
/// ```toml
/// [run]
/// start_date = "2024-01-01"
/// end_date = "2024-06-30"
/// ```
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// First date included in the run
    /// Default: unset (no lower bound)
    pub start_date: Option<NaiveDate>,

    /// Last date included in the run
    /// Default: unset (no upper bound)
    pub end_date: Option<NaiveDate>,
}

impl RunConfig {
    /// Reject windows whose start falls after their end
    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && start > end
        {
            return Err(ConfigError::invalid_value(
                "run",
                "start_date",
                format!("start {start} is after end {end}"),
            ));
        }
        Ok(())
    }
}
