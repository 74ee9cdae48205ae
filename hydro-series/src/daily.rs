use crate::diagnostics::{Channel, Diagnostic, DiagnosticSink};
use crate::error::SeriesError;
use crate::header::{SeriesHeader, HEADER_LINES};
use chrono::NaiveDate;
use hydro_utils::dates::{format_dss_date, parse_dss_date};
use serde::{Deserialize, Serialize};

/// Column (zero-based, whitespace separated) holding the record date.
pub const DATE_COLUMN: usize = 1;

/// Column holding the daily average flow.
pub const FLOW_COLUMN: usize = 2;

/// One daily average flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyValue {
    pub date: NaiveDate,
    pub flow: f64,
}

impl DailyValue {
    pub fn new(date: NaiveDate, flow: f64) -> Self {
        Self { date, flow }
    }
}

/// A daily series read from DSS text.
///
/// Values are in strictly increasing date order. Calendar days without a
/// record are simply absent; the accumulation curve bridges them.
#[derive(Debug, Clone)]
pub struct DailySeries {
    pub header: SeriesHeader,
    pub values: Vec<DailyValue>,
}

impl DailySeries {
    /// Parse a daily flow file.
    ///
    /// A record whose flow field is missing or not numeric keeps its date
    /// with a flow of 0.0. A record without a readable date cannot be placed
    /// and is skipped. Every such line is reported on [`Channel::Input`] as
    /// `Error: <location> \t line: <line>`.
    pub fn parse(
        text: &str,
        location: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<DailySeries, SeriesError> {
        let lines: Vec<&str> = text.lines().collect();
        let header = SeriesHeader::parse(&lines)?;

        let mut values: Vec<DailyValue> = Vec::new();
        for line in lines.iter().skip(HEADER_LINES) {
            if line.trim().is_empty() {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let date = match tokens.get(DATE_COLUMN).map(|t| parse_dss_date(t)) {
                Some(Ok(date)) => date,
                _ => {
                    sink.emit(malformed(location, line));
                    continue;
                }
            };
            let flow = match tokens.get(FLOW_COLUMN).map(|t| t.parse::<f64>()) {
                Some(Ok(flow)) if flow.is_finite() => flow,
                _ => {
                    sink.emit(malformed(location, line));
                    0.0
                }
            };

            if let Some(previous) = values.last() {
                if date <= previous.date {
                    sink.emit(Diagnostic::warn(
                        Channel::Input,
                        format!(
                            "Error: {location} \t line: {line}, date is not after {}, skipping line",
                            format_dss_date(&previous.date)
                        ),
                    ));
                    continue;
                }
                report_missing_days(location, previous.date, date, sink);
            }
            values.push(DailyValue::new(date, flow));
        }

        if values.is_empty() {
            return Err(SeriesError::EmptyData {
                source_name: location.to_string(),
            });
        }
        log::info!(
            "Read {} daily values for {} ({} to {})",
            values.len(),
            location,
            values[0].date,
            values[values.len() - 1].date
        );
        Ok(DailySeries { header, values })
    }
}

fn malformed(location: &str, line: &str) -> Diagnostic {
    Diagnostic::warn(Channel::Input, format!("Error: {location} \t line: {line}"))
}

fn report_missing_days(
    location: &str,
    previous: NaiveDate,
    next: NaiveDate,
    sink: &mut dyn DiagnosticSink,
) {
    for day in previous.iter_days().skip(1).take_while(|day| *day < next) {
        sink.emit(Diagnostic::warn(
            Channel::Input,
            format!("Missing: {location} \t date: {}", format_dss_date(&day)),
        ));
    }
}
