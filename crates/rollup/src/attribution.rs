//! Per-session conversion attribution.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::info;

use tally_records::summary::{fixed2, flag, round2};
use tally_records::{DateStyle, OrderRow, SessionRow, SummaryTable, TableData};

use crate::filter::DateFilter;

/// Sentinel channel for sessions without UTM tagging.
const DIRECT: &str = "direct";

/// One output row of `session_attribution.csv`.
#[derive(Debug, Clone)]
pub struct AttributionRow {
    pub session_id: String,
    pub user_id: String,
    pub date: Option<NaiveDate>,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub country: String,
    pub device_type: String,
    pub platform: String,
    pub converted: bool,
    pub revenue: f64,
    pub order_id: Option<String>,
}

/// Session outcomes joined back to their marketing channel.
#[derive(Debug, Clone)]
pub struct SessionAttribution {
    rows: Vec<AttributionRow>,
}

impl SessionAttribution {
    pub fn rows(&self) -> &[AttributionRow] {
        &self.rows
    }
}

/// Left-joins sessions to their orders.
///
/// Every session is kept. A session with several orders produces one
/// row per order, so per-session counts can exceed the session count
/// on messy data; this is surfaced rather than deduplicated. Missing
/// UTM fields are labeled `direct`.
pub fn build(
    sessions: &TableData<SessionRow>,
    orders: Option<&TableData<OrderRow>>,
    filter: &DateFilter,
) -> SessionAttribution {
    let mut orders_by_session: HashMap<&str, Vec<&OrderRow>> = HashMap::new();
    if let Some(orders) = orders {
        for order in orders.rows() {
            if !order.session_id.is_empty() {
                orders_by_session
                    .entry(order.session_id.as_str())
                    .or_default()
                    .push(order);
            }
        }
    }

    let mut rows = Vec::with_capacity(sessions.len());
    for session in sessions.rows() {
        let date = session.time.map(|t| t.date());
        if !filter.admits(date) {
            continue;
        }
        match orders_by_session.get(session.session_id.as_str()) {
            Some(matched) => {
                for &order in matched {
                    rows.push(attribution_row(session, date, Some(order)));
                }
            }
            None => rows.push(attribution_row(session, date, None)),
        }
    }

    let converted = rows.iter().filter(|r| r.converted).count();
    let conversion_rate = if rows.is_empty() {
        0.0
    } else {
        converted as f64 / rows.len() as f64 * 100.0
    };
    let total_revenue: f64 = rows.iter().map(|r| r.revenue).sum();
    info!(
        sessions = rows.len(),
        converted,
        conversion_rate = %format!("{conversion_rate:.2}%"),
        total_revenue = %format!("{total_revenue:.2}"),
        "session attribution built"
    );

    SessionAttribution { rows }
}

fn attribution_row(
    session: &SessionRow,
    date: Option<NaiveDate>,
    order: Option<&OrderRow>,
) -> AttributionRow {
    // a matched order with a blank id carries revenue but is not a conversion
    let converted = order.is_some_and(|o| !o.order_id.is_empty());
    let revenue = round2(order.and_then(|o| o.total_price).unwrap_or(0.0));
    let order_id = order
        .map(|o| o.order_id.clone())
        .filter(|id| !id.is_empty());

    AttributionRow {
        session_id: session.session_id.clone(),
        user_id: session.user_id.clone(),
        date,
        utm_source: labeled(&session.utm_source),
        utm_medium: labeled(&session.utm_medium),
        utm_campaign: labeled(&session.utm_campaign),
        country: session.country.clone().unwrap_or_default(),
        device_type: session.device_type.clone().unwrap_or_default(),
        platform: session.platform.clone().unwrap_or_default(),
        converted,
        revenue,
        order_id,
    }
}

fn labeled(utm: &Option<String>) -> String {
    utm.clone().unwrap_or_else(|| DIRECT.to_string())
}

impl SummaryTable for SessionAttribution {
    fn file_name(&self) -> &'static str {
        "session_attribution.csv"
    }

    fn header(&self) -> Vec<String> {
        [
            "session_id",
            "user_id",
            "date",
            "utm_source",
            "utm_medium",
            "utm_campaign",
            "country",
            "device_type",
            "platform",
            "converted",
            "revenue",
            "order_id",
        ]
        .map(String::from)
        .into()
    }

    fn render(&self, dates: &DateStyle) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                vec![
                    row.session_id.clone(),
                    row.user_id.clone(),
                    dates.format_opt(row.date),
                    row.utm_source.clone(),
                    row.utm_medium.clone(),
                    row.utm_campaign.clone(),
                    row.country.clone(),
                    row.device_type.clone(),
                    row.platform.clone(),
                    flag(row.converted),
                    fixed2(row.revenue),
                    row.order_id.clone().unwrap_or_default(),
                ]
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
#[path = "attribution_test.rs"]
mod attribution_test;
