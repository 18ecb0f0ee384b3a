//! Run window filtering.

use chrono::NaiveDate;

/// Inclusive date window restricting the date-keyed aggregations.
///
/// Unset bounds are open. Rows without a parseable date pass an
/// unbounded filter and render a blank date; once either bound is set
/// they are excluded, since they cannot be placed in the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateFilter {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateFilter {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether a dated row falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }

    /// Whether a possibly-undated row is kept.
    pub fn admits(&self, date: Option<NaiveDate>) -> bool {
        match date {
            Some(date) => self.contains(date),
            None => self.is_unbounded(),
        }
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;
