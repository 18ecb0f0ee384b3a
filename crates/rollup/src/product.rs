//! Per-day product performance.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use tally_records::summary::{fixed2, round2};
use tally_records::{CartAddRow, DateStyle, OrderItemRow, SummaryTable, TableData};

use crate::filter::DateFilter;
use crate::group::group_by;

/// One output row of `product_performance_daily.csv`.
#[derive(Debug, Clone)]
pub struct ProductDayRow {
    pub date: NaiveDate,
    pub product_name: String,
    pub times_purchased: usize,
    pub total_quantity_sold: u64,
    pub total_revenue: f64,
    pub times_added_to_cart: usize,
    pub cart_to_purchase_rate: f64,
}

/// Per-day sales and cart interest per product.
#[derive(Debug, Clone)]
pub struct ProductDayMetrics {
    rows: Vec<ProductDayRow>,
}

impl ProductDayMetrics {
    pub fn rows(&self) -> &[ProductDayRow] {
        &self.rows
    }
}

/// Builds the per-day product rollup from order line items.
///
/// Returns `None` when the line item table is not loaded. A missing
/// cart table leaves the cart columns at zero rather than suppressing
/// the report.
pub fn build(
    order_items: Option<&TableData<OrderItemRow>>,
    cart_adds: Option<&TableData<CartAddRow>>,
    filter: &DateFilter,
) -> Option<ProductDayMetrics> {
    let Some(order_items) = order_items else {
        warn!("order line item table not loaded, skipping product performance");
        return None;
    };

    let purchases = group_by(order_items.rows(), |item| {
        let date = item.time?.date();
        (filter.contains(date) && !item.product_name.is_empty())
            .then(|| (date, item.product_name.as_str()))
    });

    let mut cart_counts: HashMap<(NaiveDate, &str), usize> = HashMap::new();
    if let Some(cart_adds) = cart_adds {
        for add in cart_adds.rows() {
            let Some(time) = add.time else { continue };
            let date = time.date();
            if add.product_name.is_empty() || !filter.contains(date) {
                continue;
            }
            *cart_counts
                .entry((date, add.product_name.as_str()))
                .or_default() += 1;
        }
    }

    let mut rows: Vec<ProductDayRow> = purchases
        .into_iter()
        .map(|((date, name), items)| {
            let times_purchased = items.len();
            let total_quantity_sold = items
                .iter()
                .filter_map(|item| item.product_qty)
                .map(u64::from)
                .sum();
            let total_revenue = round2(
                items
                    .iter()
                    .filter_map(|item| Some(item.product_price? * f64::from(item.product_qty?)))
                    .sum(),
            );
            let times_added_to_cart = cart_counts.get(&(date, name)).copied().unwrap_or(0);
            let cart_to_purchase_rate = if times_added_to_cart > 0 {
                round2(times_purchased as f64 / times_added_to_cart as f64 * 100.0)
            } else {
                0.0
            };
            ProductDayRow {
                date,
                product_name: name.to_string(),
                times_purchased,
                total_quantity_sold,
                total_revenue,
                times_added_to_cart,
                cart_to_purchase_rate,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.date.cmp(&b.date).then_with(|| {
            b.total_revenue
                .partial_cmp(&a.total_revenue)
                .unwrap_or(Ordering::Equal)
        })
    });

    let mut by_product: BTreeMap<&str, f64> = BTreeMap::new();
    for row in &rows {
        *by_product.entry(row.product_name.as_str()).or_default() += row.total_revenue;
    }
    let mut ranked: Vec<(&str, f64)> = by_product.into_iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    for &(product, revenue) in ranked.iter().take(5) {
        debug!(product, revenue = round2(revenue), "top product by revenue");
    }

    info!(
        rows = rows.len(),
        products = ranked.len(),
        line_items = order_items.len(),
        "product performance aggregated"
    );

    Some(ProductDayMetrics { rows })
}

impl SummaryTable for ProductDayMetrics {
    fn file_name(&self) -> &'static str {
        "product_performance_daily.csv"
    }

    fn header(&self) -> Vec<String> {
        [
            "date",
            "product_name",
            "times_purchased",
            "total_quantity_sold",
            "total_revenue",
            "times_added_to_cart",
            "cart_to_purchase_rate",
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
                    row.product_name.clone(),
                    row.times_purchased.to_string(),
                    row.total_quantity_sold.to_string(),
                    fixed2(row.total_revenue),
                    row.times_added_to_cart.to_string(),
                    fixed2(row.cart_to_purchase_rate),
                ]
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
#[path = "product_test.rs"]
mod product_test;
