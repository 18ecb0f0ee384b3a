//! The seven aggregations over the raw tables.
//!
//! Each aggregation is a pure function of its input tables plus the run
//! window; none depends on another's output, so the binary runs them as
//! independent tasks over a shared read-only snapshot. Every builder
//! logs a per-stage summary, which is how operators verify a run.

mod filter;
mod group;

pub mod attribution;
pub mod coupon;
pub mod daily;
pub mod engagement;
pub mod funnel;
pub mod lifetime;
pub mod product;

pub use attribution::SessionAttribution;
pub use coupon::CouponDayMetrics;
pub use daily::DailyBusinessMetrics;
pub use engagement::PageDayMetrics;
pub use filter::DateFilter;
pub use funnel::SessionFunnel;
pub use lifetime::UserLifetimeMetrics;
pub use product::ProductDayMetrics;
