//! Tests for lenient CSV reading.

use std::fs;

use tempfile::TempDir;

use crate::read::read_table;
use tally_records::{ClickRow, OrderRow, SessionRow};

fn dir_with(name: &str, contents: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(name), contents).unwrap();
    dir
}

#[test]
fn test_absent_file_is_none() {
    let dir = TempDir::new().unwrap();
    let table = read_table::<SessionRow>(dir.path(), "session_table.csv", &[]);
    assert!(table.is_none());
}

#[test]
fn test_rows_and_columns() {
    let dir = dir_with(
        "session_table.csv",
        "session_id,user_id,time,utm_source\n\
         s1,u1,2024-03-01 10:00:00,google\n\
         s2,u2,2024-03-01 11:00:00,\n",
    );
    let table = read_table::<SessionRow>(dir.path(), "session_table.csv", &["session_id"]).unwrap();
    assert_eq!(table.len(), 2);
    assert!(table.has_column("utm_source"));
    assert!(!table.has_column("country"));
    assert_eq!(table.rows()[0].utm_source.as_deref(), Some("google"));
    assert!(table.rows()[1].utm_source.is_none());
}

#[test]
fn test_missing_required_column_still_loads() {
    let dir = dir_with("order_table.csv", "session_id,time\ns1,2024-03-01 09:00:00\n");
    let table = read_table::<OrderRow>(dir.path(), "order_table.csv", &["order_id"]).unwrap();
    assert_eq!(table.len(), 1);
    assert!(!table.has_column("order_id"));
    assert_eq!(table.rows()[0].order_id, "");
}

#[test]
fn test_malformed_row_dropped() {
    // second data row has more fields than the header
    let dir = dir_with(
        "order_table.csv",
        "order_id,session_id,time\n\
         o1,s1,2024-03-01 09:00:00\n\
         o2,s2,2024-03-01 10:00:00,extra,fields\n\
         o3,s3,2024-03-01 11:00:00\n",
    );
    let table = read_table::<OrderRow>(dir.path(), "order_table.csv", &[]).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[1].order_id, "o3");
}

#[test]
fn test_header_only_file_is_empty_table() {
    let dir = dir_with("click_table.csv", "time,path\n");
    let table = read_table::<ClickRow>(dir.path(), "click_table.csv", &[]).unwrap();
    assert!(table.is_empty());
    assert!(table.has_column("path"));
}
