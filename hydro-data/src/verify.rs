use crate::peaks::InjectedPeak;
use chrono::NaiveDate;
use hydro_series::diagnostics::{Channel, Diagnostic, DiagnosticSink};
use hydro_series::hydrograph::{HourlyHydrograph, HOURS_PER_DAY};
use serde::Serialize;

pub const DEFAULT_PEAK_TOLERANCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeakCheck {
    pub date: NaiveDate,
    pub magnitude: f64,
    /// Largest hourly flow seen while scanning the day.
    pub max_flow: f64,
    pub overestimated: bool,
}

/// Compare every applied peak with the hydrograph around its day. Only
/// reports; the hydrograph is not changed.
pub fn verify_peaks(
    hydrograph: &HourlyHydrograph,
    peaks: &[InjectedPeak],
    tolerance: f64,
    sink: &mut dyn DiagnosticSink,
) -> Vec<PeakCheck> {
    let flows = hydrograph.flows();
    peaks
        .iter()
        .map(|peak| {
            let first = peak.day_start;
            let last = (first + HOURS_PER_DAY).min(flows.len().saturating_sub(1));
            let max_flow = flows
                .get(first..=last)
                .unwrap_or_default()
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            let overestimated = max_flow > peak.magnitude + tolerance;
            if overestimated {
                sink.emit(Diagnostic::warn(
                    Channel::Peaks,
                    format!(
                        "Peak on Date: {} is being overestimated",
                        peak.date.format("%Y-%m-%d")
                    ),
                ));
            }
            PeakCheck {
                date: peak.date,
                magnitude: peak.magnitude,
                max_flow,
                overestimated,
            }
        })
        .collect()
}
