//! Shared utility functions for the hydro crates.

/// Date utility functions for the DSS text conventions
pub mod dates {
    use crate::error::DateError;
    use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

    /// DSS calendar date, e.g. "01Jan2000"
    pub const DSS_DATE_FORMAT: &str = "%d%b%Y";

    /// DSS timestamp, e.g. "01Jan2000 0100"
    pub const DSS_TIMESTAMP_FORMAT: &str = "%d%b%Y %H%M";

    /// Format a NaiveDate as "DDMonYYYY"
    pub fn format_dss_date(date: &NaiveDate) -> String {
        date.format(DSS_DATE_FORMAT).to_string()
    }

    /// Parse a date string in "DDMonYYYY" format
    pub fn parse_dss_date(s: &str) -> Result<NaiveDate, DateError> {
        let s = s.trim();
        // chrono is lenient about the day width; the DSS token is not
        if s.len() != 9 {
            return Err(DateError(format!("expected DDMonYYYY, got {s:?}")));
        }
        NaiveDate::parse_from_str(s, DSS_DATE_FORMAT)
            .map_err(|e| DateError(format!("{s:?}: {e}")))
    }

    /// Format a NaiveDateTime as "DDMonYYYY HHMM"
    pub fn format_dss_timestamp(timestamp: &NaiveDateTime) -> String {
        timestamp.format(DSS_TIMESTAMP_FORMAT).to_string()
    }

    /// Parse a timestamp string in "DDMonYYYY HHMM" format.
    ///
    /// DSS writes midnight as hour 2400 of the previous day; that form is
    /// accepted and normalized to 0000 of the following day.
    pub fn parse_dss_timestamp(s: &str) -> Result<NaiveDateTime, DateError> {
        let mut parts = s.split_whitespace();
        let (Some(date), Some(time), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(DateError(format!("expected DDMonYYYY HHMM, got {s:?}")));
        };
        let date = parse_dss_date(date)?;
        if time == "2400" {
            return (date + Duration::days(1))
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| DateError(format!("{s:?}: midnight out of range")));
        }
        let time = NaiveTime::parse_from_str(time, "%H%M")
            .map_err(|e| DateError(format!("{time:?}: {e}")))?;
        Ok(date.and_time(time))
    }

}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug, Clone, PartialEq)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
