//! Query result structs.

use serde::Serialize;

/// One row of the store's catalog.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogEntry {
    pub pathname: String,
    /// First value's timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub start: String,
    /// Last value's timestamp.
    pub end: String,
    pub interval_minutes: i64,
    pub units: String,
    pub data_type: String,
    pub value_count: i64,
}

/// A single timestamped value.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimestampValue {
    pub timestamp: String,
    pub value: f64,
}
