//! Writers for the hourly result and a reader for the DSS text layout.
//!
//! # DSS text layout
//!
//! ```text
//! /A/B/C//1hour/SYNTHETIC/
//! CFS
//! PER-AVER
//! 01Jan1997 0100
//! 10.00
//! ...
//! END
//! FINISH
//! ```
//!
//! Values start at the first hour ending after the series start and are
//! clamped to zero. There is no newline after `FINISH`.

use crate::error::SeriesError;
use crate::header::SeriesHeader;
use crate::hydrograph::{clamp_flow, HourlyHydrograph};
use chrono::{Duration, NaiveDateTime};
use hydro_utils::dates::{format_dss_timestamp, parse_dss_timestamp};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// F part written into every generated pathname.
pub const SYNTHETIC_F_PART: &str = "SYNTHETIC";
pub const OUTPUT_UNITS: &str = "CFS";
pub const AGGREGATION_TYPE: &str = "PER-AVER";
pub const END_MARKER: &str = "END";
pub const FINISH_MARKER: &str = "FINISH";

/// Timestamp format for the CSV output.
pub const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render the hydrograph in DSS text form.
pub fn format_dss_text(header: &SeriesHeader, hydrograph: &HourlyHydrograph) -> String {
    let mut out = String::new();
    out.push_str(&header.hourly_pathname(SYNTHETIC_F_PART));
    out.push('\n');
    out.push_str(OUTPUT_UNITS);
    out.push('\n');
    out.push_str(AGGREGATION_TYPE);
    out.push('\n');
    out.push_str(&format_dss_timestamp(&hydrograph.timestamp(1)));
    out.push('\n');
    for flow in hydrograph.output_flows() {
        out.push_str(&format!("{:.2}\n", clamp_flow(*flow)));
    }
    out.push_str(END_MARKER);
    out.push('\n');
    out.push_str(FINISH_MARKER);
    out
}

pub fn write_dss_text<W: Write>(
    mut writer: W,
    header: &SeriesHeader,
    hydrograph: &HourlyHydrograph,
) -> Result<(), SeriesError> {
    writer.write_all(format_dss_text(header, hydrograph).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Write `timestamp,flow_cfs` rows, one per output hour.
pub fn write_csv<W: Write>(writer: W, hydrograph: &HourlyHydrograph) -> Result<(), SeriesError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["timestamp", "flow_cfs"])?;
    for (offset, flow) in hydrograph.output_flows().iter().enumerate() {
        let timestamp = hydrograph.timestamp(offset + 1);
        wtr.write_record([
            timestamp.format(CSV_TIMESTAMP_FORMAT).to_string(),
            format!("{:.2}", clamp_flow(*flow)),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// A regular-interval series ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRecord {
    pub pathname: String,
    pub start: NaiveDateTime,
    pub interval_minutes: i64,
    pub units: String,
    pub data_type: String,
    pub values: Vec<f64>,
}

impl TimeSeriesRecord {
    /// Read a file produced by [`format_dss_text`] back.
    pub fn from_dss_text(text: &str) -> Result<TimeSeriesRecord, SeriesError> {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        if lines.len() < 4 {
            return Err(SeriesError::OutputRow {
                line: lines.len() + 1,
                message: "expected pathname, units, type and start lines".to_string(),
            });
        }
        let start = parse_dss_timestamp(lines[3])?;

        let mut values = Vec::new();
        let mut terminated = false;
        for (index, line) in lines.iter().enumerate().skip(4) {
            if *line == END_MARKER {
                terminated = true;
                break;
            }
            let value = line.parse::<f64>().map_err(|e| SeriesError::OutputRow {
                line: index + 1,
                message: format!("{line:?}: {e}"),
            })?;
            values.push(value);
        }
        if !terminated {
            return Err(SeriesError::OutputRow {
                line: lines.len(),
                message: format!("missing {END_MARKER} marker"),
            });
        }

        Ok(TimeSeriesRecord {
            pathname: lines[0].to_string(),
            start,
            interval_minutes: 60,
            units: lines[1].to_string(),
            data_type: lines[2].to_string(),
            values,
        })
    }

    /// Shift the start time by whole days.
    pub fn offset_days(mut self, days: i64) -> TimeSeriesRecord {
        self.start += Duration::days(days);
        self
    }

    /// Timestamp of the last value.
    pub fn end(&self) -> NaiveDateTime {
        let steps = self.values.len().saturating_sub(1) as i64;
        self.start + Duration::minutes(self.interval_minutes * steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn header() -> SeriesHeader {
        SeriesHeader {
            a_part: "CVHS".to_string(),
            b_part: "DEER".to_string(),
            c_part: "FLOW".to_string(),
            e_part: "1DAY".to_string(),
            f_part: "USBC".to_string(),
            units: "CFS".to_string(),
            data_type: "PER-AVER".to_string(),
        }
    }

    fn hydrograph() -> HourlyHydrograph {
        let start = NaiveDate::from_ymd_opt(1997, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        HourlyHydrograph::new(start, vec![0.0, 12.346, -0.2, 3.0])
    }

    #[test]
    fn dss_text_layout() {
        let text = format_dss_text(&header(), &hydrograph());
        assert_eq!(
            text,
            "/CVHS/DEER/FLOW//1hour/SYNTHETIC/\nCFS\nPER-AVER\n01Jan1997 0100\n12.35\n0.00\n3.00\nEND\nFINISH"
        );
    }

    #[test]
    fn formatting_is_deterministic() {
        let h = hydrograph();
        assert_eq!(format_dss_text(&header(), &h), format_dss_text(&header(), &h));
        assert_eq!(
            format_dss_text(&header(), &h),
            format_dss_text(&header(), &h.clamped())
        );
    }

    #[test]
    fn csv_layout() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &hydrograph()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "timestamp,flow_cfs");
        assert_eq!(lines[1], "1997-01-01 01:00,12.35");
        assert_eq!(lines[2], "1997-01-01 02:00,0.00");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn read_back_written_text() {
        let text = format_dss_text(&header(), &hydrograph());
        let record = TimeSeriesRecord::from_dss_text(&text).unwrap();
        assert_eq!(record.pathname, "/CVHS/DEER/FLOW//1hour/SYNTHETIC/");
        assert_eq!(record.units, "CFS");
        assert_eq!(record.data_type, "PER-AVER");
        assert_eq!(record.values, vec![12.35, 0.0, 3.0]);
        assert_eq!(
            record.start,
            NaiveDate::from_ymd_opt(1997, 1, 1)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap()
        );
        assert_eq!(
            record.end(),
            NaiveDate::from_ymd_opt(1997, 1, 1)
                .unwrap()
                .and_hms_opt(3, 0, 0)
                .unwrap()
        );
        let shifted = record.offset_days(-1);
        assert_eq!(
            shifted.start.date(),
            NaiveDate::from_ymd_opt(1996, 12, 31).unwrap()
        );
    }

    #[test]
    fn read_back_requires_end_marker() {
        let text = "/A/B/C//1hour/SYNTHETIC/\nCFS\nPER-AVER\n01Jan1997 0100\n1.00\n";
        assert!(matches!(
            TimeSeriesRecord::from_dss_text(text),
            Err(SeriesError::OutputRow { .. })
        ));
    }
}
