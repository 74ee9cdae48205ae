use crate::accumulation::AccumulationCurve;
use crate::error::InterpolationError;
use crate::interpolation::{HermiteSpline, Interpolant};
use hydro_series::hydrograph::{HourlyHydrograph, HOURS_PER_DAY};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interpolation strategy used through the accumulation control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplineMethod {
    /// Exact-interpolating cubic spline; smooth but may overshoot.
    #[default]
    Cubic,
    /// Shape-preserving piecewise cubic.
    Pchip,
}

impl fmt::Display for SplineMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplineMethod::Cubic => f.write_str("cubic"),
            SplineMethod::Pchip => f.write_str("pchip"),
        }
    }
}

impl FromStr for SplineMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cubic" | "spline" => Ok(SplineMethod::Cubic),
            "pchip" => Ok(SplineMethod::Pchip),
            other => Err(format!("unknown spline method {other:?}")),
        }
    }
}

/// Turns an accumulation curve into an hourly hydrograph.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplineEngine {
    method: SplineMethod,
}

impl SplineEngine {
    pub fn new(method: SplineMethod) -> Self {
        Self { method }
    }

    pub fn method(&self) -> SplineMethod {
        self.method
    }

    /// Fit the configured interpolant through the known points.
    pub fn fit(&self, curve: &AccumulationCurve) -> Result<HermiteSpline, InterpolationError> {
        let (hours, values) = curve.known();
        match self.method {
            SplineMethod::Cubic => HermiteSpline::cubic(hours, values),
            SplineMethod::Pchip => HermiteSpline::pchip(hours, values),
        }
    }

    /// Fit, sample every grid hour and differentiate.
    pub fn hydrograph(
        &self,
        curve: &AccumulationCurve,
    ) -> Result<HourlyHydrograph, InterpolationError> {
        let spline = self.fit(curve)?;
        let accumulation = spline.sample(curve.len());
        Ok(HourlyHydrograph::new(
            curve.start(),
            flows_from_accumulation(&accumulation),
        ))
    }
}

/// First difference of an hourly accumulation (flow-days) times 24 gives
/// the hourly flow rate. The first hour has no predecessor and is 0.
pub fn flows_from_accumulation(accumulation: &[f64]) -> Vec<f64> {
    let mut flows = Vec::with_capacity(accumulation.len());
    if accumulation.is_empty() {
        return flows;
    }
    flows.push(0.0);
    flows.extend(
        accumulation
            .windows(2)
            .map(|w| (w[1] - w[0]) * HOURS_PER_DAY as f64),
    );
    flows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulation::build_accumulation;
    use chrono::NaiveDate;
    use hydro_series::daily::DailyValue;

    fn series(flows: &[f64]) -> Vec<DailyValue> {
        let first = NaiveDate::from_ymd_opt(2010, 6, 1).unwrap();
        flows
            .iter()
            .enumerate()
            .map(|(i, f)| DailyValue::new(first + chrono::Duration::days(i as i64), *f))
            .collect()
    }

    #[test]
    fn method_parsing() {
        assert_eq!("PCHIP".parse::<SplineMethod>(), Ok(SplineMethod::Pchip));
        assert_eq!("cubic".parse::<SplineMethod>(), Ok(SplineMethod::Cubic));
        assert!("akima".parse::<SplineMethod>().is_err());
        assert_eq!(SplineMethod::default(), SplineMethod::Cubic);
    }

    #[test]
    fn first_hour_is_zero() {
        assert_eq!(flows_from_accumulation(&[5.0, 6.0, 8.0]), vec![0.0, 24.0, 48.0]);
        assert!(flows_from_accumulation(&[]).is_empty());
    }

    #[test]
    fn constant_flow_is_reproduced() {
        for method in [SplineMethod::Cubic, SplineMethod::Pchip] {
            let curve = build_accumulation(&series(&[12.0, 12.0, 12.0, 12.0])).unwrap();
            let h = SplineEngine::new(method).hydrograph(&curve).unwrap();
            assert_eq!(h.len(), curve.len());
            assert_eq!(h.flows()[0], 0.0);
            for flow in h.output_flows() {
                assert!((flow - 12.0).abs() < 1e-9, "{method}: {flow}");
            }
        }
    }

    #[test]
    fn daily_volumes_are_conserved() {
        let flows = [10.0, 20.0, 10.0, 55.0, 3.0, 7.0];
        for method in [SplineMethod::Cubic, SplineMethod::Pchip] {
            let curve = build_accumulation(&series(&flows)).unwrap();
            let h = SplineEngine::new(method).hydrograph(&curve).unwrap();
            for (mean, expected) in h.daily_means().iter().zip(flows) {
                assert!((mean - expected).abs() < 1e-9, "{method}: {mean} vs {expected}");
            }
        }
    }

    #[test]
    fn ten_twenty_ten_pchip_stays_positive() {
        let curve = build_accumulation(&series(&[10.0, 20.0, 10.0])).unwrap();
        let h = SplineEngine::new(SplineMethod::Pchip).hydrograph(&curve).unwrap();
        assert!(h.min_flow() >= 0.0);
        let means = h.daily_means();
        assert!((means[0] - 10.0).abs() < 1e-9);
        assert!((means[1] - 20.0).abs() < 1e-9);
        assert!((means[2] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn ten_twenty_ten_cubic_dips_at_the_start() {
        // four knots make a single cubic whose slope at hour 0 is negative
        let curve = build_accumulation(&series(&[10.0, 20.0, 10.0])).unwrap();
        let h = SplineEngine::new(SplineMethod::Cubic).hydrograph(&curve).unwrap();
        assert!(h.flows()[1] < 0.0);
        assert!(h.flows()[1] > -1.1);
    }

    #[test]
    fn hydrograph_starts_at_first_day_midnight() {
        let curve = build_accumulation(&series(&[1.0, 2.0])).unwrap();
        let h = SplineEngine::default().hydrograph(&curve).unwrap();
        assert_eq!(h.start(), curve.start());
        assert_eq!(
            h.timestamp(1),
            NaiveDate::from_ymd_opt(2010, 6, 1)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap()
        );
    }
}
