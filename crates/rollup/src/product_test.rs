//! Tests for product performance.

use chrono::{NaiveDate, NaiveDateTime};

use tally_records::{CartAddRow, DateStyle, OrderItemRow, SummaryTable, TableData};

use crate::filter::DateFilter;
use crate::product::build;

fn ts(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()
}

fn item(name: &str, time: &str, price: Option<f64>, qty: Option<u32>) -> OrderItemRow {
    OrderItemRow {
        order_id: "o1".to_string(),
        time: ts(time),
        product_name: name.to_string(),
        product_price: price,
        product_qty: qty,
    }
}

fn cart(name: &str, time: &str) -> CartAddRow {
    CartAddRow {
        session_id: "s1".to_string(),
        time: ts(time),
        product_name: name.to_string(),
    }
}

fn items_table(rows: Vec<OrderItemRow>) -> TableData<OrderItemRow> {
    TableData::new(
        rows,
        ["order_id", "time", "product_name", "product_price", "product_qty"],
    )
}

fn carts_table(rows: Vec<CartAddRow>) -> TableData<CartAddRow> {
    TableData::new(rows, ["session_id", "time", "product_name"])
}

// ====== grouping ======

#[test]
fn test_grouping_and_revenue() {
    let items = items_table(vec![
        item("widget", "2024-03-01 10:00:00", Some(10.0), Some(2)),
        item("widget", "2024-03-01 14:00:00", Some(5.0), Some(1)),
        item("gadget", "2024-03-01 15:00:00", Some(99.99), Some(1)),
    ]);

    let metrics = build(Some(&items), None, &DateFilter::default()).unwrap();
    assert_eq!(metrics.rows().len(), 2);

    let widget = metrics
        .rows()
        .iter()
        .find(|r| r.product_name == "widget")
        .unwrap();
    assert_eq!(widget.times_purchased, 2);
    assert_eq!(widget.total_quantity_sold, 3);
    assert_eq!(widget.total_revenue, 25.0);
}

#[test]
fn test_partial_line_items() {
    // revenue needs both price and quantity, quantity stands alone
    let items = items_table(vec![
        item("widget", "2024-03-01 10:00:00", Some(10.0), Some(2)),
        item("widget", "2024-03-01 11:00:00", None, Some(3)),
        item("widget", "2024-03-01 12:00:00", Some(4.0), None),
    ]);

    let metrics = build(Some(&items), None, &DateFilter::default()).unwrap();
    let row = &metrics.rows()[0];
    assert_eq!(row.times_purchased, 3);
    assert_eq!(row.total_quantity_sold, 5);
    assert_eq!(row.total_revenue, 20.0);
}

#[test]
fn test_blank_or_undated_items_dropped() {
    let items = items_table(vec![
        item("widget", "2024-03-01 10:00:00", Some(10.0), Some(1)),
        item("", "2024-03-01 10:00:00", Some(10.0), Some(1)),
        OrderItemRow {
            product_name: "gadget".to_string(),
            ..Default::default()
        },
    ]);

    let metrics = build(Some(&items), None, &DateFilter::default()).unwrap();
    assert_eq!(metrics.rows().len(), 1);
    assert_eq!(metrics.rows()[0].product_name, "widget");
}

// ====== cart interest ======

#[test]
fn test_cart_to_purchase_rate() {
    let items = items_table(vec![
        item("widget", "2024-03-01 10:00:00", Some(10.0), Some(1)),
        item("widget", "2024-03-01 11:00:00", Some(10.0), Some(1)),
    ]);
    let carts = carts_table(vec![
        cart("widget", "2024-03-01 09:00:00"),
        cart("widget", "2024-03-01 09:05:00"),
        cart("widget", "2024-03-01 09:10:00"),
        cart("widget", "2024-03-01 09:15:00"),
    ]);

    let metrics = build(Some(&items), Some(&carts), &DateFilter::default()).unwrap();
    let row = &metrics.rows()[0];
    assert_eq!(row.times_added_to_cart, 4);
    assert_eq!(row.cart_to_purchase_rate, 50.0);
}

#[test]
fn test_cart_counts_stay_on_their_day() {
    let items = items_table(vec![item("widget", "2024-03-02 10:00:00", Some(10.0), Some(1))]);
    let carts = carts_table(vec![cart("widget", "2024-03-01 09:00:00")]);

    let metrics = build(Some(&items), Some(&carts), &DateFilter::default()).unwrap();
    let row = &metrics.rows()[0];
    assert_eq!(row.times_added_to_cart, 0);
    assert_eq!(row.cart_to_purchase_rate, 0.0);
}

#[test]
fn test_missing_cart_table_zeroes_interest() {
    let items = items_table(vec![item("widget", "2024-03-01 10:00:00", Some(10.0), Some(1))]);

    let metrics = build(Some(&items), None, &DateFilter::default()).unwrap();
    let row = &metrics.rows()[0];
    assert_eq!(row.times_added_to_cart, 0);
    assert_eq!(row.cart_to_purchase_rate, 0.0);
}

#[test]
fn test_missing_line_items_skips_report() {
    let carts = carts_table(vec![cart("widget", "2024-03-01 09:00:00")]);
    assert!(build(None, Some(&carts), &DateFilter::default()).is_none());
}

// ====== ordering and output ======

#[test]
fn test_sorted_by_date_then_revenue() {
    let items = items_table(vec![
        item("cheap", "2024-03-02 10:00:00", Some(1.0), Some(1)),
        item("dear", "2024-03-02 10:00:00", Some(100.0), Some(1)),
        item("widget", "2024-03-01 10:00:00", Some(10.0), Some(1)),
    ]);

    let metrics = build(Some(&items), None, &DateFilter::default()).unwrap();
    let order: Vec<&str> = metrics
        .rows()
        .iter()
        .map(|r| r.product_name.as_str())
        .collect();
    assert_eq!(order, vec!["widget", "dear", "cheap"]);
}

#[test]
fn test_window_excludes_items() {
    let items = items_table(vec![
        item("widget", "2024-03-01 10:00:00", Some(10.0), Some(1)),
        item("widget", "2024-05-01 10:00:00", Some(10.0), Some(1)),
    ]);
    let filter = DateFilter::new(
        NaiveDate::from_ymd_opt(2024, 3, 1),
        NaiveDate::from_ymd_opt(2024, 3, 31),
    );

    let metrics = build(Some(&items), None, &filter).unwrap();
    assert_eq!(metrics.rows().len(), 1);
    assert_eq!(
        metrics.rows()[0].date,
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    );
}

#[test]
fn test_rendered_rows() {
    let items = items_table(vec![item("widget", "2024-03-01 10:00:00", Some(12.5), Some(2))]);
    let carts = carts_table(vec![
        cart("widget", "2024-03-01 09:00:00"),
        cart("widget", "2024-03-01 09:30:00"),
    ]);

    let metrics = build(Some(&items), Some(&carts), &DateFilter::default()).unwrap();
    let rendered = metrics.render(&DateStyle::default());
    assert_eq!(
        rendered[0],
        vec!["01/03/2024", "widget", "1", "2", "25.00", "2", "50.00"]
    );
}
