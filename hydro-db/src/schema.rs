//! SQL schema for the series store.

/// Returns the full SQL schema as a single batch string.
///
/// - `series` - one catalog row per pathname: start timestamp, interval,
///   units, aggregation type and value count
/// - `series_values` - the values of every series, keyed by position
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS series (
        pathname TEXT PRIMARY KEY,
        start_time TEXT NOT NULL,
        interval_minutes INTEGER NOT NULL,
        units TEXT NOT NULL,
        data_type TEXT NOT NULL,
        value_count INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS series_values (
        pathname TEXT NOT NULL,
        ordinal INTEGER NOT NULL,
        value REAL NOT NULL,
        PRIMARY KEY (pathname, ordinal)
    );
    CREATE INDEX IF NOT EXISTS idx_values_pathname ON series_values(pathname);
    "#
}
