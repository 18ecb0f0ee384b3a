//! Shared record types for the aggregation pipeline.
//!
//! This crate defines the typed rows read from the raw event CSVs, the
//! [`TableData`] container that pairs parsed rows with the header actually
//! found in the file, the configurable [`DateStyle`] used when rendering
//! date columns, and the [`SummaryTable`] trait every aggregated output
//! table implements.

pub mod datestyle;
pub mod rows;
pub mod summary;
pub mod table;

pub use datestyle::{DEFAULT_DATE_FORMAT, DateStyle, DateStyleError};
pub use rows::{
    CartAddRow, ClickRow, OrderItemRow, OrderRow, PageViewRow, ScrollRow, SessionRow, UserRow,
};
pub use summary::SummaryTable;
pub use table::TableData;
