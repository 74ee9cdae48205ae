//! Writing series into the store.
//!
//! # CSV Format
//!
//! [`Database::import_csv`] accepts the hourly CSV written by the smoother
//! (with headers): `timestamp,flow_cfs`, timestamps as `YYYY-MM-DD HH:MM`.

use crate::{Database, TIMESTAMP_FORMAT};
use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use hydro_series::output::{TimeSeriesRecord, AGGREGATION_TYPE, CSV_TIMESTAMP_FORMAT, OUTPUT_UNITS};
use rusqlite::params;

const DEFAULT_INTERVAL_MINUTES: i64 = 60;

impl Database {
    /// Store a series, replacing any series already stored under the same
    /// pathname.
    pub fn put_series(&self, record: &TimeSeriesRecord) -> anyhow::Result<()> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        let replaced = tx.execute(
            "DELETE FROM series_values WHERE pathname = ?1",
            params![record.pathname],
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO series (pathname, start_time, interval_minutes, units, data_type, value_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.pathname,
                record.start.format(TIMESTAMP_FORMAT).to_string(),
                record.interval_minutes,
                record.units,
                record.data_type,
                record.values.len() as i64
            ],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO series_values (pathname, ordinal, value) VALUES (?1, ?2, ?3)",
            )?;
            for (ordinal, value) in record.values.iter().enumerate() {
                stmt.execute(params![record.pathname, ordinal as i64, value])?;
            }
        }
        tx.commit()?;

        if replaced > 0 {
            log::info!(
                "loader: Replaced {} ({} old values) with {} values",
                record.pathname,
                replaced,
                record.values.len()
            );
        } else {
            log::info!(
                "loader: Stored {} with {} values",
                record.pathname,
                record.values.len()
            );
        }
        Ok(())
    }

    /// Load an hourly CSV export and store it under `pathname`.
    pub fn import_csv(&self, pathname: &str, csv_data: &str) -> anyhow::Result<TimeSeriesRecord> {
        let record = read_csv_series(pathname, csv_data)?;
        self.put_series(&record)?;
        Ok(record)
    }
}

/// Parse an hourly CSV export into a record named `pathname`.
///
/// The interval is taken from the first two rows; a single-row file is
/// assumed hourly. Every later step must match it.
pub fn read_csv_series(pathname: &str, csv_data: &str) -> anyhow::Result<TimeSeriesRecord> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let mut timestamps = Vec::new();
    let mut values = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let r = result?;
        let line = index + 2;
        let timestamp = r.get(0).unwrap_or("").trim();
        let timestamp = NaiveDateTime::parse_from_str(timestamp, CSV_TIMESTAMP_FORMAT)
            .with_context(|| format!("line {line}: bad timestamp {timestamp:?}"))?;
        let value: f64 = r
            .get(1)
            .unwrap_or("")
            .trim()
            .parse()
            .with_context(|| format!("line {line}: bad value"))?;
        timestamps.push(timestamp);
        values.push(value);
    }

    let Some(start) = timestamps.first().copied() else {
        bail!("{pathname}: CSV has no rows");
    };
    let interval_minutes = match timestamps.get(1) {
        Some(next) => (*next - start).num_minutes(),
        None => DEFAULT_INTERVAL_MINUTES,
    };
    if interval_minutes <= 0 {
        bail!("{pathname}: timestamps must increase");
    }
    if let Some(w) = timestamps
        .windows(2)
        .find(|w| (w[1] - w[0]).num_minutes() != interval_minutes)
    {
        bail!("{pathname}: irregular interval at {}", w[1]);
    }

    Ok(TimeSeriesRecord {
        pathname: pathname.to_string(),
        start,
        interval_minutes,
        units: OUTPUT_UNITS.to_string(),
        data_type: AGGREGATION_TYPE.to_string(),
        values,
    })
}
