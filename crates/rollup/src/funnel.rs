//! Per-session funnel stages.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use tally_records::summary::{fixed2_opt, flag, round2};
use tally_records::{
    CartAddRow, DateStyle, OrderRow, PageViewRow, SessionRow, SummaryTable, TableData,
};

use crate::filter::DateFilter;

/// Substring of a pageview path that marks a product detail view.
const PRODUCT_PATH: &str = "/product/";

/// One output row of `session_funnel.csv`.
///
/// `had_pageview` is true by construction: a recorded session implies at
/// least one pageview upstream. Time-to-event values stay null when the
/// event never happened, distinguishing "never" from "instantly", and go
/// negative when an event precedes the recorded session start.
#[derive(Debug, Clone)]
pub struct FunnelRow {
    pub session_id: String,
    pub user_id: String,
    pub date: Option<NaiveDate>,
    pub had_pageview: bool,
    pub had_product_view: bool,
    pub had_add_to_cart: bool,
    pub had_order: bool,
    pub time_to_cart_minutes: Option<f64>,
    pub time_to_order_minutes: Option<f64>,
}

/// Funnel stage flags and time-to-event deltas per session.
#[derive(Debug, Clone)]
pub struct SessionFunnel {
    rows: Vec<FunnelRow>,
}

impl SessionFunnel {
    pub fn rows(&self) -> &[FunnelRow] {
        &self.rows
    }
}

/// Builds the funnel record for every session.
///
/// Stage membership is by session id: any pageview row whose path
/// contains `/product/` marks a product view, any cart or order row
/// marks its stage. Deltas run from the session start to the earliest
/// qualifying event.
pub fn build(
    sessions: &TableData<SessionRow>,
    pageviews: Option<&TableData<PageViewRow>>,
    cart_adds: Option<&TableData<CartAddRow>>,
    orders: Option<&TableData<OrderRow>>,
    filter: &DateFilter,
) -> SessionFunnel {
    let product_view_sessions: HashSet<&str> = pageviews
        .map(|table| {
            table
                .rows()
                .iter()
                .filter(|view| !view.session_id.is_empty() && view.path.contains(PRODUCT_PATH))
                .map(|view| view.session_id.as_str())
                .collect()
        })
        .unwrap_or_default();

    let cart_sessions = session_ids(cart_adds, |add| add.session_id.as_str());
    let order_sessions = session_ids(orders, |order| order.session_id.as_str());

    let first_cart = first_times(cart_adds, |add| (add.session_id.as_str(), add.time));
    let first_order = first_times(orders, |order| (order.session_id.as_str(), order.time));

    let mut rows = Vec::with_capacity(sessions.len());
    for session in sessions.rows() {
        let date = session.time.map(|t| t.date());
        if !filter.admits(date) {
            continue;
        }
        let id = session.session_id.as_str();

        rows.push(FunnelRow {
            session_id: session.session_id.clone(),
            user_id: session.user_id.clone(),
            date,
            had_pageview: true,
            had_product_view: product_view_sessions.contains(id),
            had_add_to_cart: cart_sessions.contains(id),
            had_order: order_sessions.contains(id),
            time_to_cart_minutes: delta_minutes(session.time, first_cart.get(id)),
            time_to_order_minutes: delta_minutes(session.time, first_order.get(id)),
        });
    }

    let total = rows.len();
    let product_views = rows.iter().filter(|r| r.had_product_view).count();
    let cart_adds_reached = rows.iter().filter(|r| r.had_add_to_cart).count();
    let orders_reached = rows.iter().filter(|r| r.had_order).count();
    info!(
        sessions = total,
        product_views,
        product_view_rate = %pct(product_views, total),
        cart_adds = cart_adds_reached,
        cart_rate = %pct(cart_adds_reached, total),
        orders = orders_reached,
        order_rate = %pct(orders_reached, total),
        "session funnel built"
    );

    SessionFunnel { rows }
}

/// Non-blank session ids present in an optional event table.
fn session_ids<'a, T, F>(table: Option<&'a TableData<T>>, id: F) -> HashSet<&'a str>
where
    F: Fn(&'a T) -> &'a str,
{
    table
        .map(|table| {
            table
                .rows()
                .iter()
                .map(|row| id(row))
                .filter(|id| !id.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Earliest event time per session, skipping undated rows.
fn first_times<'a, T, F>(table: Option<&'a TableData<T>>, key: F) -> HashMap<&'a str, NaiveDateTime>
where
    F: Fn(&'a T) -> (&'a str, Option<NaiveDateTime>),
{
    let mut first: HashMap<&str, NaiveDateTime> = HashMap::new();
    if let Some(table) = table {
        for row in table.rows() {
            let (id, time) = key(row);
            if id.is_empty() {
                continue;
            }
            let Some(time) = time else { continue };
            first
                .entry(id)
                .and_modify(|earliest| {
                    if time < *earliest {
                        *earliest = time;
                    }
                })
                .or_insert(time);
        }
    }
    first
}

fn delta_minutes(start: Option<NaiveDateTime>, event: Option<&NaiveDateTime>) -> Option<f64> {
    match (start, event) {
        (Some(start), Some(&event)) => {
            Some(round2((event - start).num_milliseconds() as f64 / 60_000.0))
        }
        _ => None,
    }
}

fn pct(part: usize, total: usize) -> String {
    if total == 0 {
        "0.0%".to_string()
    } else {
        format!("{:.1}%", part as f64 / total as f64 * 100.0)
    }
}

impl SummaryTable for SessionFunnel {
    fn file_name(&self) -> &'static str {
        "session_funnel.csv"
    }

    fn header(&self) -> Vec<String> {
        [
            "session_id",
            "user_id",
            "date",
            "had_pageview",
            "had_product_view",
            "had_add_to_cart",
            "had_order",
            "time_to_cart_minutes",
            "time_to_order_minutes",
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
                    flag(row.had_pageview),
                    flag(row.had_product_view),
                    flag(row.had_add_to_cart),
                    flag(row.had_order),
                    fixed2_opt(row.time_to_cart_minutes),
                    fixed2_opt(row.time_to_order_minutes),
                ]
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
#[path = "funnel_test.rs"]
mod funnel_test;
