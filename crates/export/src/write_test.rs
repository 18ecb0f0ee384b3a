//! Tests for the atomic CSV writer.

use std::fs;

use tempfile::TempDir;

use tally_records::{DateStyle, SummaryTable};

use crate::write::{WriteSummary, write_all, write_table};

struct Fixture {
    name: &'static str,
    rows: Vec<Vec<String>>,
}

fn fixture(name: &'static str, rows: &[&[&str]]) -> Fixture {
    Fixture {
        name,
        rows: rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    }
}

impl SummaryTable for Fixture {
    fn file_name(&self) -> &'static str {
        self.name
    }

    fn header(&self) -> Vec<String> {
        ["a", "b"].map(String::from).into()
    }

    fn render(&self, _dates: &DateStyle) -> Vec<Vec<String>> {
        self.rows.clone()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

#[test]
fn test_write_table() {
    let dir = TempDir::new().unwrap();
    let table = fixture("fixture.csv", &[&["1", "2"], &["3", "x,y"]]);

    let rows = write_table(dir.path(), &table, &DateStyle::default()).unwrap();
    assert_eq!(rows, 2);

    let written = fs::read_to_string(dir.path().join("fixture.csv")).unwrap();
    assert_eq!(written, "a,b\n1,2\n3,\"x,y\"\n");
}

#[test]
fn test_existing_file_replaced() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("fixture.csv"), "stale").unwrap();
    let table = fixture("fixture.csv", &[&["1", "2"]]);

    write_table(dir.path(), &table, &DateStyle::default()).unwrap();
    let written = fs::read_to_string(dir.path().join("fixture.csv")).unwrap();
    assert_eq!(written, "a,b\n1,2\n");
}

#[test]
fn test_empty_table_leaves_prior_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("fixture.csv"), "stale").unwrap();
    let table = fixture("fixture.csv", &[]);

    let rows = write_table(dir.path(), &table, &DateStyle::default()).unwrap();
    assert_eq!(rows, 0);
    let kept = fs::read_to_string(dir.path().join("fixture.csv")).unwrap();
    assert_eq!(kept, "stale");
}

#[test]
fn test_no_temp_files_left_behind() {
    let dir = TempDir::new().unwrap();
    let table = fixture("fixture.csv", &[&["1", "2"]]);

    write_table(dir.path(), &table, &DateStyle::default()).unwrap();
    let entries: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["fixture.csv"]);
}

#[test]
fn test_write_all_counts() {
    let dir = TempDir::new().unwrap();
    let one = fixture("one.csv", &[&["1", "2"]]);
    let two = fixture("two.csv", &[&["3", "4"], &["5", "6"]]);
    let empty = fixture("empty.csv", &[]);

    let summary = write_all(dir.path(), &[&one, &two, &empty], &DateStyle::default());
    assert_eq!(
        summary,
        WriteSummary {
            written: 2,
            rows: 3,
            failed: 0
        }
    );
    assert!(!dir.path().join("empty.csv").exists());
}

#[test]
fn test_write_all_keeps_going_on_failure() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");
    let one = fixture("one.csv", &[&["1", "2"]]);
    let two = fixture("two.csv", &[&["3", "4"]]);

    let summary = write_all(&missing, &[&one, &two], &DateStyle::default());
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.written, 0);
}
