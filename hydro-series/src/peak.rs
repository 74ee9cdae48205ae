use crate::diagnostics::{Channel, Diagnostic, DiagnosticSink};
use crate::error::SeriesError;
use crate::header::{SeriesHeader, HEADER_LINES};
use chrono::NaiveDate;
use hydro_utils::dates::parse_dss_date;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where within its day an instantaneous peak is placed.
///
/// The numeric codes are the ones used in peaks files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimingProfile {
    /// Code 0, peak hour 01:00-02:00.
    OneAm,
    /// Code 1, peak hour 00:00-01:00.
    TwelveAm,
    /// Code 2, peak hour 11:00-12:00.
    ElevenAm,
    /// Code 3, peak hour 23:00-24:00.
    ElevenPm,
    /// Code 4, peak hour 22:00-23:00.
    TenPm,
}

impl TimingProfile {
    pub const ALL: [TimingProfile; 5] = [
        TimingProfile::OneAm,
        TimingProfile::TwelveAm,
        TimingProfile::ElevenAm,
        TimingProfile::ElevenPm,
        TimingProfile::TenPm,
    ];

    pub fn from_code(code: u8) -> Option<TimingProfile> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn code(&self) -> u8 {
        match self {
            TimingProfile::OneAm => 0,
            TimingProfile::TwelveAm => 1,
            TimingProfile::ElevenAm => 2,
            TimingProfile::ElevenPm => 3,
            TimingProfile::TenPm => 4,
        }
    }
}

impl fmt::Display for TimingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimingProfile::OneAm => "1 AM",
            TimingProfile::TwelveAm => "12 AM",
            TimingProfile::ElevenAm => "11 AM",
            TimingProfile::ElevenPm => "11 PM",
            TimingProfile::TenPm => "10 PM",
        };
        f.write_str(label)
    }
}

/// A known instantaneous peak flow for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakSpec {
    pub date: NaiveDate,
    pub magnitude: f64,
    pub profile: TimingProfile,
}

#[derive(Debug, Clone)]
pub struct PeakSeries {
    pub header: SeriesHeader,
    pub peaks: Vec<PeakSpec>,
}

impl PeakSeries {
    /// Parse a peaks file: `<index> <DDMonYYYY> <magnitude> <profile code>`.
    ///
    /// Lines that do not yield all three values, or that carry a negative
    /// magnitude or an unknown profile code, are reported on
    /// [`Channel::Peaks`] and skipped. A file with a header and no usable
    /// peaks is not an error.
    pub fn parse(
        text: &str,
        source_name: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<PeakSeries, SeriesError> {
        let lines: Vec<&str> = text.lines().collect();
        let header = SeriesHeader::parse(&lines)?;

        let peaks = lines
            .iter()
            .skip(HEADER_LINES)
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match parse_peak_line(line) {
                Some(peak) => Some(peak),
                None => {
                    sink.emit(Diagnostic::warn(
                        Channel::Peaks,
                        format!(
                            "Peaksfile: {source_name} \t line: {line}, does not contain a valid peak value, skipping line"
                        ),
                    ));
                    None
                }
            })
            .collect::<Vec<PeakSpec>>();

        log::info!("Read {} peaks from {}", peaks.len(), source_name);
        Ok(PeakSeries { header, peaks })
    }
}

fn parse_peak_line(line: &str) -> Option<PeakSpec> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let date = parse_dss_date(tokens.get(1)?).ok()?;
    let magnitude = tokens.get(2)?.parse::<f64>().ok()?;
    if !magnitude.is_finite() || magnitude < 0.0 {
        return None;
    }
    let profile = TimingProfile::from_code(tokens.get(3)?.parse::<u8>().ok()?)?;
    Some(PeakSpec {
        date,
        magnitude,
        profile,
    })
}
