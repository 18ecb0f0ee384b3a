//! Raw table loading.
//!
//! Reads the eight raw event CSVs from the raw-data directory. Only the
//! session and order tables are mandatory; every other table may be
//! absent, in which case the aggregations that need it are skipped.

mod error;
mod read;

pub use error::LoadError;
pub use read::read_table;

use std::path::Path;

use tally_records::{
    CartAddRow, ClickRow, OrderItemRow, OrderRow, PageViewRow, ScrollRow, SessionRow, TableData,
    UserRow,
};

pub const USER_TABLE: &str = "user_table.csv";
pub const SESSION_TABLE: &str = "session_table.csv";
pub const ORDER_TABLE: &str = "order_table.csv";
pub const ORDER_ITEM_TABLE: &str = "order_line_item_table.csv";
pub const CART_ADD_TABLE: &str = "add_to_cart_table.csv";
pub const PAGEVIEW_TABLE: &str = "pageview_table.csv";
pub const SCROLL_TABLE: &str = "scroll_table.csv";
pub const CLICK_TABLE: &str = "click_table.csv";

/// All raw tables of one run.
#[derive(Debug, Clone)]
pub struct RawTables {
    pub users: Option<TableData<UserRow>>,
    pub sessions: TableData<SessionRow>,
    pub orders: TableData<OrderRow>,
    pub order_items: Option<TableData<OrderItemRow>>,
    pub cart_adds: Option<TableData<CartAddRow>>,
    pub pageviews: Option<TableData<PageViewRow>>,
    pub scrolls: Option<TableData<ScrollRow>>,
    pub clicks: Option<TableData<ClickRow>>,
}

/// Load every raw table from `raw_dir`.
///
/// Optional tables that are missing or unreadable come back as `None`.
/// A missing session or order table aborts the run.
pub fn load_all(raw_dir: &Path) -> Result<RawTables, LoadError> {
    let users = read_table::<UserRow>(raw_dir, USER_TABLE, &["user_id"]);
    let sessions =
        read_table::<SessionRow>(raw_dir, SESSION_TABLE, &["user_id", "session_id", "time"])
            .ok_or_else(|| LoadError::missing_table(SESSION_TABLE, raw_dir))?;
    let orders = read_table::<OrderRow>(
        raw_dir,
        ORDER_TABLE,
        &["order_id", "user_id", "session_id", "time"],
    )
    .ok_or_else(|| LoadError::missing_table(ORDER_TABLE, raw_dir))?;
    let order_items =
        read_table::<OrderItemRow>(raw_dir, ORDER_ITEM_TABLE, &["order_id", "product_name"]);
    let cart_adds =
        read_table::<CartAddRow>(raw_dir, CART_ADD_TABLE, &["session_id", "product_name"]);
    let pageviews = read_table::<PageViewRow>(raw_dir, PAGEVIEW_TABLE, &["session_id", "path"]);
    let scrolls = read_table::<ScrollRow>(raw_dir, SCROLL_TABLE, &["session_id", "scroll_percent"]);
    let clicks = read_table::<ClickRow>(raw_dir, CLICK_TABLE, &["session_id"]);

    Ok(RawTables {
        users,
        sessions,
        orders,
        order_items,
        cart_adds,
        pageviews,
        scrolls,
        clicks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    fn mandatory_tables(dir: &TempDir) {
        write_file(
            dir,
            SESSION_TABLE,
            "session_id,user_id,time\ns1,u1,2024-03-01 10:00:00\n",
        );
        write_file(
            dir,
            ORDER_TABLE,
            "order_id,user_id,session_id,time,total_price\no1,u1,s1,2024-03-01 10:30:00,50\n",
        );
    }

    #[test]
    fn test_mandatory_only() {
        let dir = TempDir::new().unwrap();
        mandatory_tables(&dir);

        let tables = load_all(dir.path()).unwrap();
        assert_eq!(tables.sessions.len(), 1);
        assert_eq!(tables.orders.len(), 1);
        assert!(tables.users.is_none());
        assert!(tables.pageviews.is_none());
        assert!(tables.scrolls.is_none());
    }

    #[test]
    fn test_missing_sessions_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            ORDER_TABLE,
            "order_id,user_id,session_id,time\no1,u1,s1,2024-03-01 10:30:00\n",
        );

        let err = load_all(dir.path()).unwrap_err();
        assert!(err.to_string().contains(SESSION_TABLE));
    }

    #[test]
    fn test_missing_orders_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            SESSION_TABLE,
            "session_id,user_id,time\ns1,u1,2024-03-01 10:00:00\n",
        );

        let err = load_all(dir.path()).unwrap_err();
        assert!(err.to_string().contains(ORDER_TABLE));
    }

    #[test]
    fn test_optional_tables_loaded_when_present() {
        let dir = TempDir::new().unwrap();
        mandatory_tables(&dir);
        write_file(&dir, USER_TABLE, "user_id,has_purchase_last_year\nu1,0\n");
        write_file(
            &dir,
            PAGEVIEW_TABLE,
            "session_id,user_id,time,path\ns1,u1,2024-03-01 10:05:00,/home\n",
        );

        let tables = load_all(dir.path()).unwrap();
        assert_eq!(tables.users.as_ref().map(|t| t.len()), Some(1));
        assert_eq!(tables.pageviews.as_ref().map(|t| t.len()), Some(1));
    }
}
