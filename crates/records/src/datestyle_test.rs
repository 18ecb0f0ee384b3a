//! Tests for date format validation and rendering.

use chrono::NaiveDate;

use crate::datestyle::{DEFAULT_DATE_FORMAT, DateStyle};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_default_day_first() {
    let style = DateStyle::default();
    assert_eq!(style.as_str(), DEFAULT_DATE_FORMAT);
    assert_eq!(style.format(date(2024, 3, 9)), "09/03/2024");
}

#[test]
fn test_custom_formats_accepted() {
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"] {
        assert!(DateStyle::new(format).is_ok(), "{format} should be accepted");
    }
}

#[test]
fn test_lossy_format_rejected() {
    // A consumer could not re-parse these back into a calendar date.
    assert!(DateStyle::new("%Y").is_err());
    assert!(DateStyle::new("%d/%m").is_err());
}

#[test]
fn test_unknown_specifier_rejected() {
    assert!(DateStyle::new("%Q-%d-%m-%Y").is_err());
}

#[test]
fn test_round_trip() {
    let style = DateStyle::new("%Y-%m-%d").unwrap();
    let rendered = style.format(date(2024, 12, 31));
    assert_eq!(style.parse(&rendered).unwrap(), date(2024, 12, 31));
}

#[test]
fn test_format_opt_null_is_blank() {
    let style = DateStyle::default();
    assert_eq!(style.format_opt(None), "");
    assert_eq!(style.format_opt(Some(date(2024, 1, 2))), "02/01/2024");
}
