//! Per-day coupon performance.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use tally_records::summary::{fixed2, fixed2_opt, round2};
use tally_records::{DateStyle, OrderRow, SummaryTable, TableData};

use crate::filter::DateFilter;
use crate::group::group_by;

/// Aggregate label for orders placed without a coupon.
const NO_COUPON: &str = "NO_COUPON";

/// One output row of `coupon_performance.csv`.
#[derive(Debug, Clone)]
pub struct CouponDayRow {
    pub date: NaiveDate,
    pub code: String,
    pub usage_count: usize,
    pub total_discount_given: f64,
    pub total_revenue: f64,
    pub avg_order_value: Option<f64>,
    pub discount_percentage: Option<f64>,
}

/// Per-day usage, discount spend and revenue per coupon code.
#[derive(Debug, Clone)]
pub struct CouponDayMetrics {
    rows: Vec<CouponDayRow>,
}

impl CouponDayMetrics {
    pub fn rows(&self) -> &[CouponDayRow] {
        &self.rows
    }
}

/// Builds the per-day coupon rollup from orders.
///
/// Returns `None` when the order file carries no coupon column at all.
/// Orders without a code are kept under the `NO_COUPON` label so the
/// uncouponed baseline stays visible next to each campaign.
pub fn build(orders: &TableData<OrderRow>, filter: &DateFilter) -> Option<CouponDayMetrics> {
    if !orders.has_column("discount_coupon_code") {
        warn!("order table has no discount_coupon_code column, skipping coupon performance");
        return None;
    }

    let by_coupon = group_by(orders.rows(), |o| {
        let date = o.time?.date();
        filter.contains(date).then(|| {
            (
                date,
                o.discount_coupon_code
                    .as_deref()
                    .filter(|code| !code.is_empty())
                    .unwrap_or(NO_COUPON),
            )
        })
    });

    let mut rows: Vec<CouponDayRow> = by_coupon
        .into_iter()
        .map(|((date, code), group)| {
            let usage_count = group.iter().filter(|o| !o.order_id.is_empty()).count();
            let total_discount_given =
                round2(group.iter().filter_map(|o| o.discount).sum::<f64>());
            let spent: f64 = group.iter().filter_map(|o| o.total_price).sum();
            let priced = group.iter().filter(|o| o.total_price.is_some()).count();

            let total_revenue = round2(spent);
            let avg_order_value = (priced > 0).then(|| round2(spent / priced as f64));
            let discount_percentage = (total_revenue > 0.0)
                .then(|| round2(total_discount_given / total_revenue * 100.0));

            CouponDayRow {
                date,
                code: code.to_string(),
                usage_count,
                total_discount_given,
                total_revenue,
                avg_order_value,
                discount_percentage,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| b.usage_count.cmp(&a.usage_count))
    });

    let mut by_code: BTreeMap<&str, usize> = BTreeMap::new();
    for row in &rows {
        *by_code.entry(row.code.as_str()).or_default() += row.usage_count;
    }
    let mut ranked: Vec<(&str, usize)> = by_code.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    for &(coupon, uses) in ranked.iter().take(5) {
        debug!(coupon, uses, "top coupon by usage");
    }

    info!(
        rows = rows.len(),
        coupons = ranked.len(),
        orders = orders.len(),
        "coupon performance aggregated"
    );

    Some(CouponDayMetrics { rows })
}

impl SummaryTable for CouponDayMetrics {
    fn file_name(&self) -> &'static str {
        "coupon_performance.csv"
    }

    fn header(&self) -> Vec<String> {
        [
            "date",
            "discount_coupon_code",
            "usage_count",
            "total_discount_given",
            "total_revenue",
            "avg_order_value",
            "discount_percentage",
        ]
        .map(String::from)
        .into()
    }

    fn render(&self, dates: &DateStyle) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                vec![
                    dates.format(row.date),
                    row.code.clone(),
                    row.usage_count.to_string(),
                    fixed2(row.total_discount_given),
                    fixed2(row.total_revenue),
                    fixed2_opt(row.avg_order_value),
                    fixed2_opt(row.discount_percentage),
                ]
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
#[path = "coupon_test.rs"]
mod coupon_test;
