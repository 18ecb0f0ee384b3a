//! Typed rows for the raw event tables.
//!
//! Exports from different tracker versions disagree on which columns they
//! carry, so every field tolerates absence: missing columns fall back to
//! defaults, and malformed values null the field for that row instead of
//! failing the whole file.

use chrono::NaiveDateTime;
use serde::Deserialize;

/// One row of the user table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRow {
    #[serde(default)]
    pub user_id: String,
    #[serde(default, deserialize_with = "de::opt_flag")]
    pub has_purchase_last_year: Option<u8>,
    #[serde(default, deserialize_with = "de::opt_flag")]
    pub has_purchase_last_qtr: Option<u8>,
}

/// One row of the session table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionRow {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub utm_source: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub utm_medium: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub utm_campaign: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub device_type: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub platform: Option<String>,
}

/// One row of the order table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderRow {
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub total_price: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub discount: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub discount_coupon_code: Option<String>,
}

/// One row of the order line item table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderItemRow {
    #[serde(default)]
    pub order_id: String,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub time: Option<NaiveDateTime>,
    #[serde(default)]
    pub product_name: String,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub product_price: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub product_qty: Option<u32>,
}

/// One row of the add-to-cart table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartAddRow {
    #[serde(default)]
    pub session_id: String,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub time: Option<NaiveDateTime>,
    #[serde(default)]
    pub product_name: String,
}

/// One row of the pageview table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageViewRow {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub time: Option<NaiveDateTime>,
    #[serde(default)]
    pub path: String,
}

/// One row of the scroll table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrollRow {
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub time: Option<NaiveDateTime>,
    #[serde(default)]
    pub path: String,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub scroll_percent: Option<f64>,
}

/// One row of the click table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClickRow {
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub time: Option<NaiveDateTime>,
    #[serde(default)]
    pub path: String,
}

mod de {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    /// Timestamp layouts seen across exports, most common first.
    const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    /// Blank strings become `None` instead of `Some("")`.
    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
    }

    /// Lenient float: blank or malformed values become `None`.
    pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.and_then(|s| s.trim().parse().ok()))
    }

    /// Lenient unsigned int: blank or malformed values become `None`.
    pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.and_then(|s| s.trim().parse().ok()))
    }

    /// Indicator column, blank or non-numeric values become `None`.
    pub fn opt_flag<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.and_then(|s| s.trim().parse().ok()))
    }

    /// Tries the known timestamp layouts, then a bare date at midnight.
    pub fn opt_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        for format in TIMESTAMP_FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(Some(ts));
            }
        }
        Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0)))
    }
}

#[cfg(test)]
#[path = "rows_test.rs"]
mod rows_test;
