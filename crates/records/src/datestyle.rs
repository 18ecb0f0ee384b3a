//! Configurable rendering of date columns in the aggregated tables.

use std::fmt::Write as _;

use chrono::NaiveDate;
use thiserror::Error;

/// Default output format, day first.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Error)]
pub enum DateStyleError {
    #[error("invalid date format '{format}': {reason}")]
    InvalidFormat { format: String, reason: String },
}

impl DateStyleError {
    fn invalid(format: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            format: format.to_string(),
            reason: reason.into(),
        }
    }
}

/// A validated strftime-style format applied to every output date column.
///
/// Construction proves the format renders and parses back to the same
/// calendar date, so downstream consumers can re-parse what we write.
#[derive(Debug, Clone)]
pub struct DateStyle {
    format: String,
}

impl DateStyle {
    pub fn new(format: &str) -> Result<Self, DateStyleError> {
        let probe = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default();
        let mut rendered = String::new();
        if write!(rendered, "{}", probe.format(format)).is_err() {
            return Err(DateStyleError::invalid(format, "unrecognized specifier"));
        }
        match NaiveDate::parse_from_str(&rendered, format) {
            Ok(parsed) if parsed == probe => Ok(Self {
                format: format.to_string(),
            }),
            Ok(_) => Err(DateStyleError::invalid(format, "does not round-trip")),
            Err(err) => Err(DateStyleError::invalid(format, err.to_string())),
        }
    }

    pub fn format(&self, date: NaiveDate) -> String {
        date.format(&self.format).to_string()
    }

    /// Renders a possibly-null date, nulls become the empty string.
    pub fn format_opt(&self, date: Option<NaiveDate>) -> String {
        date.map(|d| self.format(d)).unwrap_or_default()
    }

    pub fn parse(&self, value: &str) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(value, &self.format)
    }

    pub fn as_str(&self) -> &str {
        &self.format
    }
}

impl Default for DateStyle {
    fn default() -> Self {
        Self {
            format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "datestyle_test.rs"]
mod datestyle_test;
