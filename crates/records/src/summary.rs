//! Trait implemented by every aggregated output table.

use crate::datestyle::DateStyle;

/// An aggregated table ready to be rendered to CSV.
///
/// Implementations own their computed rows. Rendering is deferred so the
/// writer can apply the configured [`DateStyle`] uniformly across tables.
pub trait SummaryTable {
    /// File name the table is written under, without directory.
    fn file_name(&self) -> &'static str;

    fn header(&self) -> Vec<String>;

    /// Data rows, dates rendered with the given style.
    fn render(&self, dates: &DateStyle) -> Vec<Vec<String>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rounds to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Renders a monetary or percentage value with two decimals.
pub fn fixed2(value: f64) -> String {
    format!("{value:.2}")
}

/// Renders a possibly-null value with two decimals, nulls become blank.
pub fn fixed2_opt(value: Option<f64>) -> String {
    value.map(fixed2).unwrap_or_default()
}

/// Renders a possibly-null count, nulls become blank.
pub fn count_opt(value: Option<usize>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Renders a boolean flag column as 1 or 0.
pub fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}
