//! Typed reads from the series store.

use crate::models::{CatalogEntry, TimestampValue};
use crate::{Database, TIMESTAMP_FORMAT};
use anyhow::Context;
use chrono::{Duration, NaiveDateTime};
use hydro_series::output::TimeSeriesRecord;
use rusqlite::{params, OptionalExtension};

struct SeriesRow {
    start: NaiveDateTime,
    interval_minutes: i64,
    units: String,
    data_type: String,
}

fn parse_timestamp(text: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .with_context(|| format!("bad stored timestamp {text:?}"))
}

impl Database {
    fn series_row(&self, pathname: &str) -> anyhow::Result<Option<SeriesRow>> {
        let conn = self.conn.borrow();
        let row = conn
            .query_row(
                "SELECT start_time, interval_minutes, units, data_type FROM series WHERE pathname = ?1",
                params![pathname],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;
        row.map(
            |(start, interval_minutes, units, data_type)| -> anyhow::Result<SeriesRow> {
                Ok(SeriesRow {
                    start: parse_timestamp(&start)?,
                    interval_minutes,
                    units,
                    data_type,
                })
            },
        )
        .transpose()
    }

    fn values_between(
        &self,
        pathname: &str,
        first: i64,
        last: i64,
    ) -> anyhow::Result<Vec<(i64, f64)>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT ordinal, value FROM series_values
             WHERE pathname = ?1 AND ordinal >= ?2 AND ordinal <= ?3
             ORDER BY ordinal",
        )?;
        let rows: Vec<(i64, f64)> = stmt
            .query_map(params![pathname, first, last], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Read a whole series back, or `None` if the pathname is not stored.
    pub fn query_series(&self, pathname: &str) -> anyhow::Result<Option<TimeSeriesRecord>> {
        let Some(row) = self.series_row(pathname)? else {
            return Ok(None);
        };
        let values: Vec<f64> = self
            .values_between(pathname, 0, i64::MAX)?
            .into_iter()
            .map(|(_, value)| value)
            .collect();
        log::info!(
            "query: query_series {} returned {} values",
            pathname,
            values.len()
        );
        Ok(Some(TimeSeriesRecord {
            pathname: pathname.to_string(),
            start: row.start,
            interval_minutes: row.interval_minutes,
            units: row.units,
            data_type: row.data_type,
            values,
        }))
    }

    /// Values of one series whose timestamps fall within `[from, to]`.
    pub fn query_window(
        &self,
        pathname: &str,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> anyhow::Result<Vec<TimestampValue>> {
        let Some(row) = self.series_row(pathname)? else {
            return Ok(Vec::new());
        };
        let interval = row.interval_minutes.max(1);
        // ceiling for the lower bound, floor for the upper
        let first = ((from - row.start).num_minutes() + interval - 1).div_euclid(interval);
        let last = (to - row.start).num_minutes().div_euclid(interval);
        if last < first.max(0) {
            return Ok(Vec::new());
        }

        let rows = self
            .values_between(pathname, first.max(0), last)?
            .into_iter()
            .map(|(ordinal, value)| TimestampValue {
                timestamp: (row.start + Duration::minutes(ordinal * interval))
                    .format(TIMESTAMP_FORMAT)
                    .to_string(),
                value,
            })
            .collect::<Vec<_>>();
        log::info!(
            "query: query_window {} returned {} values",
            pathname,
            rows.len()
        );
        Ok(rows)
    }

    /// Every stored series, ordered by pathname.
    pub fn query_catalog(&self) -> anyhow::Result<Vec<CatalogEntry>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT pathname, start_time, interval_minutes, units, data_type, value_count
             FROM series ORDER BY pathname",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(
                |(pathname, start, interval_minutes, units, data_type, value_count)| -> anyhow::Result<CatalogEntry> {
                    let first = parse_timestamp(&start)?;
                    let steps = (value_count - 1).max(0);
                    let end = first + Duration::minutes(interval_minutes * steps);
                    Ok(CatalogEntry {
                        pathname,
                        start,
                        end: end.format(TIMESTAMP_FORMAT).to_string(),
                        interval_minutes,
                        units,
                        data_type,
                        value_count,
                    })
                },
            )
            .collect()
    }
}
