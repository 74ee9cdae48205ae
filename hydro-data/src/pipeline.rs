//! End-to-end disaggregation of one daily series.

use crate::accumulation::{build_accumulation, AccumulationCurve};
use crate::config::SplineConfig;
use crate::correction::CorrectionOutcome;
use crate::error::DisaggregationError;
use crate::peaks::{inject_peaks, InjectedPeak};
use crate::spline::SplineMethod;
use crate::verify::{verify_peaks, PeakCheck};
use hydro_series::daily::DailyValue;
use hydro_series::diagnostics::{Channel, Diagnostic, DiagnosticSink};
use hydro_series::hydrograph::HourlyHydrograph;
use hydro_series::peak::PeakSpec;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Disaggregation {
    /// Corrected but not clamped.
    pub hydrograph: HourlyHydrograph,
    pub curve: AccumulationCurve,
    pub peaks: Vec<InjectedPeak>,
    pub correction: CorrectionOutcome,
    pub checks: Vec<PeakCheck>,
}

/// Daily volumes to an hourly hydrograph.
///
/// `peaks` is `None` when no peaks file was given at all, which is noted on
/// the peaks channel.
pub fn disaggregate(
    daily: &[DailyValue],
    peaks: Option<&[PeakSpec]>,
    config: &SplineConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<Disaggregation, DisaggregationError> {
    let mut curve = build_accumulation(daily)?;

    let injected = match peaks {
        Some(peaks) => inject_peaks(&mut curve, peaks, sink),
        None => {
            sink.emit(Diagnostic::info(Channel::Peaks, "No peaks specified"));
            Vec::new()
        }
    };

    let engine = config.engine();
    let (hydrograph, correction) = config.corrector().correct(&engine, &mut curve, sink)?;
    log::info!(
        "{} fit: {} hours, {} correction passes, min flow {:.3}",
        engine.method(),
        hydrograph.len(),
        correction.iterations,
        correction.final_min_flow
    );

    let checks = verify_peaks(&hydrograph, &injected, config.peak_tolerance, sink);

    Ok(Disaggregation {
        hydrograph,
        curve,
        peaks: injected,
        correction,
        checks,
    })
}

/// Summary of one run, written as JSON by the command layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub location: String,
    pub method: SplineMethod,
    pub days: usize,
    pub hours: usize,
    pub peaks_applied: usize,
    pub peaks_overestimated: usize,
    pub iterations: usize,
    pub converged: bool,
    pub corrected_points: usize,
    pub min_flow: f64,
    pub elapsed_seconds: f64,
}

impl RunReport {
    pub fn new(
        location: &str,
        config: &SplineConfig,
        result: &Disaggregation,
        elapsed: Duration,
    ) -> Self {
        RunReport {
            location: location.to_string(),
            method: config.method,
            days: result.curve.day_count(),
            hours: result.hydrograph.output_flows().len(),
            peaks_applied: result.peaks.len(),
            peaks_overestimated: result.checks.iter().filter(|c| c.overestimated).count(),
            iterations: result.correction.iterations,
            converged: result.correction.converged,
            corrected_points: result.correction.corrected_points,
            min_flow: result.correction.final_min_flow,
            elapsed_seconds: elapsed.as_secs_f64(),
        }
    }
}
