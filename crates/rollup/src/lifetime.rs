//! Per-user lifetime value and RFM segmentation.
//!
//! Always works over the full order history. The date window applied to
//! the dated rollups does not touch this table, recency would otherwise
//! be meaningless.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info, warn};

use tally_records::summary::{fixed2, fixed2_opt, round2};
use tally_records::{DateStyle, OrderRow, SummaryTable, TableData, UserRow};

use crate::group::{distinct_count, group_by};

/// One output row of `user_lifetime_metrics.csv`.
#[derive(Debug, Clone)]
pub struct LifetimeRow {
    pub user_id: String,
    pub first_order_date: Option<NaiveDate>,
    pub last_order_date: Option<NaiveDate>,
    pub total_orders: usize,
    pub total_revenue: f64,
    pub avg_order_value: Option<f64>,
    pub days_since_last_order: Option<i64>,
    pub recency_score: u8,
    pub frequency_score: u8,
    pub monetary_score: u8,
    pub segment: &'static str,
    pub has_purchase_last_year: Option<u8>,
    pub has_purchase_last_qtr: Option<u8>,
}

/// Per-user lifetime stats with RFM scores, sorted by revenue.
#[derive(Debug, Clone)]
pub struct UserLifetimeMetrics {
    rows: Vec<LifetimeRow>,
    has_year_flag: bool,
    has_qtr_flag: bool,
}

impl UserLifetimeMetrics {
    pub fn rows(&self) -> &[LifetimeRow] {
        &self.rows
    }
}

/// Builds per-user lifetime metrics from the full order history.
///
/// Returns `None` when the user table is not loaded. `today` anchors
/// the recency computation; callers pass the current local date.
pub fn build(
    users: Option<&TableData<UserRow>>,
    orders: &TableData<OrderRow>,
    today: NaiveDate,
) -> Option<UserLifetimeMetrics> {
    let Some(users) = users else {
        warn!("user table not loaded, skipping user lifetime metrics");
        return None;
    };

    let has_year_flag = users.has_column("has_purchase_last_year");
    let has_qtr_flag = has_year_flag && users.has_column("has_purchase_last_qtr");
    let flags: HashMap<&str, (Option<u8>, Option<u8>)> = users
        .rows()
        .iter()
        .map(|user| {
            (
                user.user_id.as_str(),
                (user.has_purchase_last_year, user.has_purchase_last_qtr),
            )
        })
        .collect();

    let by_user = group_by(orders.rows(), |o| {
        (!o.user_id.is_empty()).then(|| o.user_id.as_str())
    });

    let midnight = today.and_time(NaiveTime::MIN);
    let mut rows = Vec::with_capacity(by_user.len());
    for (user_id, group) in by_user {
        let first = group.iter().filter_map(|o| o.time).min();
        let last = group.iter().filter_map(|o| o.time).max();
        let total_orders = distinct_count(&group, |o| o.order_id.as_str());
        let spent: f64 = group.iter().filter_map(|o| o.total_price).sum();
        let priced = group.iter().filter(|o| o.total_price.is_some()).count();

        let total_revenue = round2(spent);
        let avg_order_value = (priced > 0).then(|| round2(spent / priced as f64));
        let days_since_last_order = last.map(|t| (midnight - t).num_days());

        let recency_score = score_recency(days_since_last_order);
        let frequency_score = score_frequency(total_orders);
        let monetary_score = score_monetary(total_revenue);
        let (year_flag, qtr_flag) = flags.get(user_id).copied().unwrap_or_default();

        rows.push(LifetimeRow {
            user_id: user_id.to_string(),
            first_order_date: first.map(|t| t.date()),
            last_order_date: last.map(|t| t.date()),
            total_orders,
            total_revenue,
            avg_order_value,
            days_since_last_order,
            recency_score,
            frequency_score,
            monetary_score,
            segment: segment_for(recency_score, frequency_score, monetary_score),
            has_purchase_last_year: has_year_flag.then_some(year_flag).flatten(),
            has_purchase_last_qtr: has_qtr_flag.then_some(qtr_flag).flatten(),
        });
    }

    rows.sort_by(|a, b| {
        b.total_revenue
            .partial_cmp(&a.total_revenue)
            .unwrap_or(Ordering::Equal)
    });

    let mut segments: BTreeMap<&str, usize> = BTreeMap::new();
    for row in &rows {
        *segments.entry(row.segment).or_default() += 1;
    }
    for (&segment, &customers) in &segments {
        debug!(segment, customers, "rfm segment size");
    }

    info!(
        customers = rows.len(),
        orders = orders.len(),
        year_flag = has_year_flag,
        qtr_flag = has_qtr_flag,
        "user lifetime metrics aggregated"
    );

    Some(UserLifetimeMetrics {
        rows,
        has_year_flag,
        has_qtr_flag,
    })
}

/// Recency bucket, higher is more recent. Unknown recency scores lowest.
fn score_recency(days: Option<i64>) -> u8 {
    match days {
        Some(d) if d <= 30 => 5,
        Some(d) if d <= 90 => 4,
        Some(d) if d <= 180 => 3,
        Some(d) if d <= 365 => 2,
        Some(_) => 1,
        None => 1,
    }
}

/// Frequency bucket over distinct order count.
fn score_frequency(orders: usize) -> u8 {
    match orders {
        0 | 1 => 1,
        2 => 2,
        3 | 4 => 3,
        5..=9 => 4,
        _ => 5,
    }
}

/// Monetary bucket over lifetime revenue, upper bounds inclusive.
fn score_monetary(revenue: f64) -> u8 {
    if revenue > 1000.0 {
        5
    } else if revenue > 500.0 {
        4
    } else if revenue > 200.0 {
        3
    } else if revenue >= 50.0 {
        2
    } else {
        1
    }
}

/// Decision table over the (r, f, m) triple. First matching rule wins,
/// the rule order is load-bearing.
fn segment_for(r: u8, f: u8, m: u8) -> &'static str {
    if r >= 4 && f >= 4 && m >= 4 {
        "Champion"
    } else if r >= 3 && f >= 4 {
        "Loyal Customer"
    } else if r >= 3 && f >= 2 {
        "Potential Loyalist"
    } else if r <= 2 && f >= 3 {
        "At Risk"
    } else if r == 1 && f <= 2 {
        "Lost"
    } else if r <= 2 && f <= 2 {
        "Needs Attention"
    } else if f <= 2 {
        "New Customer"
    } else {
        "Regular"
    }
}

impl SummaryTable for UserLifetimeMetrics {
    fn file_name(&self) -> &'static str {
        "user_lifetime_metrics.csv"
    }

    fn header(&self) -> Vec<String> {
        let mut header: Vec<String> = [
            "user_id",
            "first_order_date",
            "last_order_date",
            "total_orders",
            "total_revenue",
            "avg_order_value",
            "days_since_last_order",
            "rfm_recency_score",
            "rfm_frequency_score",
            "rfm_monetary_score",
            "rfm_score",
            "rfm_segment",
        ]
        .map(String::from)
        .into();
        if self.has_year_flag {
            header.push("has_purchase_last_year".to_string());
        }
        if self.has_qtr_flag {
            header.push("has_purchase_last_qtr".to_string());
        }
        header
    }

    fn render(&self, dates: &DateStyle) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut out = vec![
                    row.user_id.clone(),
                    dates.format_opt(row.first_order_date),
                    dates.format_opt(row.last_order_date),
                    row.total_orders.to_string(),
                    fixed2(row.total_revenue),
                    fixed2_opt(row.avg_order_value),
                    row.days_since_last_order
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    row.recency_score.to_string(),
                    row.frequency_score.to_string(),
                    row.monetary_score.to_string(),
                    format!(
                        "{}{}{}",
                        row.recency_score, row.frequency_score, row.monetary_score
                    ),
                    row.segment.to_string(),
                ];
                if self.has_year_flag {
                    out.push(flag_cell(row.has_purchase_last_year));
                }
                if self.has_qtr_flag {
                    out.push(flag_cell(row.has_purchase_last_qtr));
                }
                out
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

fn flag_cell(flag: Option<u8>) -> String {
    flag.map(|f| f.to_string()).unwrap_or_default()
}

#[cfg(test)]
#[path = "lifetime_test.rs"]
mod lifetime_test;
