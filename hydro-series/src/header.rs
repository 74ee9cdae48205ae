use crate::error::SeriesError;
use serde::{Deserialize, Serialize};

/// Number of header lines preceding the records in DSS text input.
pub const HEADER_LINES: usize = 7;

/// Interval part written into the hourly output pathname.
pub const HOURLY_E_PART: &str = "1hour";

/// Pathname parts and metadata carried by the 7-line header.
///
/// Line layout (each line is `<label> <value>`):
///
/// ```text
/// A  <a part>
/// B  <b part>
/// C  <c part>
/// E  <ignored, daily input is always 1DAY>
/// F  <f part>
/// UNITS <units>
/// TYPE  <type>
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesHeader {
    pub a_part: String,
    pub b_part: String,
    pub c_part: String,
    pub e_part: String,
    pub f_part: String,
    pub units: String,
    pub data_type: String,
}

impl SeriesHeader {
    /// Parse the first [`HEADER_LINES`] lines.
    ///
    /// The A part is frequently blank in exported files and becomes a single
    /// space; every other value is required.
    pub fn parse(lines: &[&str]) -> Result<Self, SeriesError> {
        if lines.len() < HEADER_LINES {
            return Err(SeriesError::ShortHeader {
                found: lines.len(),
                expected: HEADER_LINES,
            });
        }
        let value = |line: usize| lines[line].split_whitespace().nth(1).map(str::to_string);
        let required = |line: usize, field: &'static str| {
            value(line).ok_or(SeriesError::HeaderField {
                line: line + 1,
                field,
            })
        };

        Ok(SeriesHeader {
            a_part: value(0).unwrap_or_else(|| " ".to_string()),
            b_part: required(1, "B part")?,
            c_part: required(2, "C part")?,
            e_part: "1DAY".to_string(),
            f_part: required(4, "F part")?,
            units: required(5, "units")?,
            data_type: required(6, "type")?,
        })
    }

    /// Pathname of the hourly series derived from this daily header, with
    /// the F part replaced by `f_part`.
    pub fn hourly_pathname(&self, f_part: &str) -> String {
        format!(
            "/{}/{}/{}//{}/{}/",
            self.a_part, self.b_part, self.c_part, HOURLY_E_PART, f_part
        )
    }
}
