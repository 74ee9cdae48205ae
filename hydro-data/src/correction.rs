//! Negative-flow correction.
//!
//! Overshoot between control points can push the interpolated accumulation
//! downhill, which shows up as negative hourly flows. Each pass pins the
//! hours around every negative flow to a straight line through the
//! control points known before correction and refits.

use crate::accumulation::{AccumulationCurve, PointOrigin};
use crate::error::InterpolationError;
use crate::interpolation::{Interpolant, LinearInterpolant};
use crate::spline::SplineEngine;
use hydro_series::diagnostics::{Channel, Diagnostic, DiagnosticSink};
use hydro_series::hydrograph::HourlyHydrograph;
use serde::Serialize;

pub const DEFAULT_MAX_ITERATIONS: usize = 15;
/// Flows at or below this are still treated as negative.
pub const DEFAULT_NEGATIVE_TOLERANCE: f64 = -0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrectionOutcome {
    pub iterations: usize,
    /// False when the iteration cap was reached with negatives left.
    pub converged: bool,
    pub corrected_points: usize,
    pub initial_min_flow: f64,
    pub final_min_flow: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct NegativeFlowCorrector {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for NegativeFlowCorrector {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_NEGATIVE_TOLERANCE,
        }
    }
}

impl NegativeFlowCorrector {
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    /// Fit `curve`, then correct until the minimum flow is above the
    /// tolerance or the iteration cap is hit. Day-boundary and peak points
    /// are never touched.
    pub fn correct(
        &self,
        engine: &SplineEngine,
        curve: &mut AccumulationCurve,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(HourlyHydrograph, CorrectionOutcome), InterpolationError> {
        let (hours, values) = curve.known();
        let linear = LinearInterpolant::new(hours, values)?;

        let mut hydrograph = engine.hydrograph(curve)?;
        let initial_min_flow = hydrograph.min_flow();
        let mut iterations = 0;

        while hydrograph.min_flow() <= self.tolerance && iterations < self.max_iterations {
            for hour in flag_negative_hours(hydrograph.flows()) {
                if !curve.is_protected(hour) {
                    curve.set(hour, linear.value(hour as f64), PointOrigin::Correction);
                }
            }
            hydrograph = engine.hydrograph(curve)?;
            iterations += 1;
            sink.emit(Diagnostic::info(
                Channel::Correction,
                format!(
                    "{} iterations completed; min flow = {}",
                    iterations,
                    hydrograph.min_flow()
                ),
            ));
        }

        let final_min_flow = hydrograph.min_flow();
        let converged = final_min_flow > self.tolerance;
        if !converged {
            sink.emit(Diagnostic::warn(
                Channel::Correction,
                format!(
                    "Negative flows remain after {iterations} iterations; min flow = {final_min_flow}"
                ),
            ));
        }

        Ok((
            hydrograph,
            CorrectionOutcome {
                iterations,
                converged,
                corrected_points: curve.count(PointOrigin::Correction),
                initial_min_flow,
                final_min_flow,
            },
        ))
    }
}

/// Grid hours adjacent to a negative flow: hour `i` is flagged when the
/// flow into it or out of it is negative.
pub fn flag_negative_hours(flows: &[f64]) -> Vec<usize> {
    (0..flows.len())
        .filter(|&i| flows[i] < 0.0 || flows.get(i + 1).is_some_and(|f| *f < 0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulation::build_accumulation;
    use crate::spline::SplineMethod;
    use chrono::NaiveDate;
    use hydro_series::daily::DailyValue;
    use hydro_series::diagnostics::count;
    use log::Level;

    fn curve(flows: &[f64]) -> AccumulationCurve {
        let first = NaiveDate::from_ymd_opt(1997, 1, 1).unwrap();
        let values: Vec<DailyValue> = flows
            .iter()
            .enumerate()
            .map(|(i, f)| DailyValue::new(first + chrono::Duration::days(i as i64), *f))
            .collect();
        build_accumulation(&values).unwrap()
    }

    #[test]
    fn flags_both_ends_of_a_negative_hour() {
        assert_eq!(flag_negative_hours(&[0.0, 3.0, -1.0, 2.0]), vec![1, 2]);
        assert_eq!(flag_negative_hours(&[0.0, -1.0, -1.0]), vec![0, 1, 2]);
        assert!(flag_negative_hours(&[0.0, 1.0]).is_empty());
    }

    #[test]
    fn nothing_to_do_for_positive_flows() {
        let mut c = curve(&[12.0, 12.0, 12.0]);
        let mut sink = Vec::new();
        let (h, outcome) = NegativeFlowCorrector::default()
            .correct(&SplineEngine::default(), &mut c, &mut sink)
            .unwrap();
        assert_eq!(outcome.iterations, 0);
        assert!(outcome.converged);
        assert_eq!(outcome.corrected_points, 0);
        assert_eq!(h.len(), c.len());
        assert!(sink.is_empty());
    }

    #[test]
    fn cubic_dip_is_corrected() {
        let mut c = curve(&[10.0, 20.0, 10.0]);
        let before = c.clone();
        let mut sink = Vec::new();
        let (h, outcome) = NegativeFlowCorrector::default()
            .correct(&SplineEngine::new(SplineMethod::Cubic), &mut c, &mut sink)
            .unwrap();
        assert!(outcome.initial_min_flow < 0.0);
        assert!(outcome.iterations >= 1);
        assert!(outcome.iterations <= DEFAULT_MAX_ITERATIONS);
        assert!(outcome.converged || outcome.iterations == DEFAULT_MAX_ITERATIONS);
        if outcome.converged {
            assert!(h.min_flow() > DEFAULT_NEGATIVE_TOLERANCE);
        }
        for hour in [0, 24, 48, 72] {
            assert_eq!(c.get(hour), before.get(hour));
        }
        assert_eq!(
            count(&sink, Channel::Correction, Level::Info),
            outcome.iterations
        );
        assert!(sink[0].message.starts_with("1 iterations completed; min flow = "));
    }

    #[test]
    fn iteration_cap_is_respected() {
        let mut c = curve(&[0.0, 0.0, 500.0, 0.0, 0.0, 400.0, 0.0]);
        let mut sink = Vec::new();
        let corrector = NegativeFlowCorrector::new(2, DEFAULT_NEGATIVE_TOLERANCE);
        let (_, outcome) = corrector
            .correct(&SplineEngine::new(SplineMethod::Cubic), &mut c, &mut sink)
            .unwrap();
        assert!(outcome.iterations <= 2);
        assert!(outcome.converged || outcome.iterations == 2);
        assert_eq!(c.count(PointOrigin::DayBoundary), 8);
    }

    #[test]
    fn peak_points_are_protected() {
        let mut c = curve(&[0.0, 100.0, 0.0]);
        c.set(36, 99.0, PointOrigin::Peak);
        let mut sink = Vec::new();
        NegativeFlowCorrector::default()
            .correct(&SplineEngine::new(SplineMethod::Cubic), &mut c, &mut sink)
            .unwrap();
        assert_eq!(c.get(36), Some(99.0));
        assert_eq!(c.point(36).unwrap().origin, PointOrigin::Peak);
    }
}
