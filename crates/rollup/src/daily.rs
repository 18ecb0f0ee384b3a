//! Per-day business rollup.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use tracing::info;

use tally_records::summary::{count_opt, fixed2, fixed2_opt, round2};
use tally_records::{DateStyle, OrderRow, SessionRow, SummaryTable, TableData, UserRow};

use crate::filter::DateFilter;
use crate::group::{distinct_count, group_by};

/// One output row of `daily_business_metrics.csv`.
///
/// A date seen in only one input table leaves the other side's values
/// null, rendered as blank cells. The rates are always present, with a
/// zero substituted when their denominator is missing or zero.
#[derive(Debug, Clone)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub total_revenue: Option<f64>,
    pub total_orders: Option<usize>,
    pub total_sessions: Option<usize>,
    pub total_users: Option<usize>,
    pub conversion_rate: f64,
    pub avg_order_value: f64,
    pub new_customers: Option<usize>,
    pub repeat_customers: Option<usize>,
}

/// Per-day revenue, traffic and conversion metrics.
#[derive(Debug, Clone)]
pub struct DailyBusinessMetrics {
    rows: Vec<DailyRow>,
    has_customer_split: bool,
}

impl DailyBusinessMetrics {
    pub fn rows(&self) -> &[DailyRow] {
        &self.rows
    }

    /// Whether the new/repeat customer columns are emitted.
    pub fn has_customer_split(&self) -> bool {
        self.has_customer_split
    }
}

/// Builds the per-day business rollup from orders and sessions.
///
/// Output covers the union of dates seen in either table. The
/// new/repeat split is emitted only when the user table is loaded and
/// carries the `has_purchase_last_year` flag; absent data drops the
/// columns entirely so consumers read "unknown" rather than zero.
pub fn build(
    orders: &TableData<OrderRow>,
    sessions: &TableData<SessionRow>,
    users: Option<&TableData<UserRow>>,
    filter: &DateFilter,
) -> DailyBusinessMetrics {
    let orders_by_date = group_by(orders.rows(), |o| {
        o.time.map(|t| t.date()).filter(|d| filter.contains(*d))
    });
    let sessions_by_date = group_by(sessions.rows(), |s| {
        s.time.map(|t| t.date()).filter(|d| filter.contains(*d))
    });

    let has_customer_split = users.is_some_and(|u| u.has_column("has_purchase_last_year"));
    let purchase_flags: HashMap<&str, u8> = users
        .filter(|_| has_customer_split)
        .map(|u| {
            u.rows()
                .iter()
                .filter_map(|user| user.has_purchase_last_year.map(|f| (user.user_id.as_str(), f)))
                .collect()
        })
        .unwrap_or_default();

    let mut dates: BTreeSet<NaiveDate> = orders_by_date.keys().copied().collect();
    dates.extend(sessions_by_date.keys().copied());

    let mut rows = Vec::with_capacity(dates.len());
    for date in dates {
        let day_orders = orders_by_date.get(&date);
        let day_sessions = sessions_by_date.get(&date);

        let total_revenue = day_orders
            .map(|group| round2(group.iter().filter_map(|o| o.total_price).sum::<f64>()));
        let total_orders = day_orders.map(|group| distinct_count(group, |o| o.order_id.as_str()));
        let total_sessions =
            day_sessions.map(|group| distinct_count(group, |s| s.session_id.as_str()));
        let total_users = day_sessions.map(|group| distinct_count(group, |s| s.user_id.as_str()));

        let conversion_rate = match (total_orders, total_sessions) {
            (Some(orders), Some(sessions)) if sessions > 0 => {
                round2(orders as f64 / sessions as f64 * 100.0)
            }
            _ => 0.0,
        };
        let avg_order_value = match (total_revenue, total_orders) {
            (Some(revenue), Some(orders)) if orders > 0 => round2(revenue / orders as f64),
            _ => 0.0,
        };

        let (new_customers, repeat_customers) = if has_customer_split {
            (
                day_orders.and_then(|group| flagged_purchasers(group, &purchase_flags, 0)),
                day_orders.and_then(|group| flagged_purchasers(group, &purchase_flags, 1)),
            )
        } else {
            (None, None)
        };

        rows.push(DailyRow {
            date,
            total_revenue,
            total_orders,
            total_sessions,
            total_users,
            conversion_rate,
            avg_order_value,
            new_customers,
            repeat_customers,
        });
    }

    info!(
        days = rows.len(),
        orders = orders.len(),
        sessions = sessions.len(),
        customer_split = has_customer_split,
        "daily business metrics aggregated"
    );

    DailyBusinessMetrics {
        rows,
        has_customer_split,
    }
}

/// Distinct purchasing users carrying the given flag value, `None` when
/// no purchaser qualifies.
fn flagged_purchasers(
    orders: &[&OrderRow],
    flags: &HashMap<&str, u8>,
    want: u8,
) -> Option<usize> {
    let count = orders
        .iter()
        .map(|o| o.user_id.as_str())
        .filter(|id| !id.is_empty() && flags.get(id) == Some(&want))
        .collect::<BTreeSet<_>>()
        .len();
    (count > 0).then_some(count)
}

impl SummaryTable for DailyBusinessMetrics {
    fn file_name(&self) -> &'static str {
        "daily_business_metrics.csv"
    }

    fn header(&self) -> Vec<String> {
        let mut header: Vec<String> = [
            "date",
            "total_revenue",
            "total_orders",
            "total_sessions",
            "total_users",
            "conversion_rate",
            "avg_order_value",
        ]
        .map(String::from)
        .into();
        if self.has_customer_split {
            header.push("new_customers".to_string());
            header.push("repeat_customers".to_string());
        }
        header
    }

    fn render(&self, dates: &DateStyle) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut out = vec![
                    dates.format(row.date),
                    fixed2_opt(row.total_revenue),
                    count_opt(row.total_orders),
                    count_opt(row.total_sessions),
                    count_opt(row.total_users),
                    fixed2(row.conversion_rate),
                    fixed2(row.avg_order_value),
                ];
                if self.has_customer_split {
                    out.push(count_opt(row.new_customers));
                    out.push(count_opt(row.repeat_customers));
                }
                out
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
#[path = "daily_test.rs"]
mod daily_test;
