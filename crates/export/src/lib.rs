//! CSV export for the aggregated summary tables.
//!
//! Every output file is overwritten wholesale each run via a
//! write-to-temp-then-rename, and a failure on one file never blocks
//! the rest.

mod error;
mod write;

pub use error::ExportError;
pub use write::{WriteSummary, write_all, write_table};
