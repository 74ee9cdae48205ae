//! SQLite store for regular hourly series.
//!
//! Finished hydrographs are kept as a catalog row per pathname plus one
//! row per value. The store can live in memory (tests, one-off runs) or in
//! a database file shared between runs.
//!
//! # Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use hydro_db::Database;
//! use hydro_series::output::TimeSeriesRecord;
//!
//! let db = Database::new().unwrap();
//! let record = TimeSeriesRecord {
//!     pathname: "/CVHS/DEER/FLOW//1hour/SYNTHETIC/".to_string(),
//!     start: NaiveDate::from_ymd_opt(1997, 1, 1).unwrap().and_hms_opt(1, 0, 0).unwrap(),
//!     interval_minutes: 60,
//!     units: "CFS".to_string(),
//!     data_type: "PER-AVER".to_string(),
//!     values: vec![10.0, 12.5, 11.0],
//! };
//! db.put_series(&record).unwrap();
//!
//! let catalog = db.query_catalog().unwrap();
//! assert_eq!(catalog.len(), 1);
//! assert_eq!(db.query_series(&record.pathname).unwrap(), Some(record));
//! ```

mod loader;
pub use loader::read_csv_series;
pub mod models;
mod queries;
pub mod schema;

use rusqlite::Connection;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Timestamp format of the `start_time` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Handle to the series store.
///
/// Cloning is cheap; clones share one connection.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create an empty in-memory store.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Open (or create) a store backed by a database file.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        log::info!("Opening series store {}", path.display());
        Self::with_connection(Connection::open(path)?)
    }

    fn with_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}
