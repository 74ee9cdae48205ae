use crate::correction::{NegativeFlowCorrector, DEFAULT_MAX_ITERATIONS, DEFAULT_NEGATIVE_TOLERANCE};
use crate::spline::{SplineEngine, SplineMethod};
use crate::verify::DEFAULT_PEAK_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Tunables for one disaggregation run. Every field is optional in JSON.
///
/// ```
/// use hydro_data::config::SplineConfig;
/// use hydro_data::spline::SplineMethod;
///
/// let config = SplineConfig::from_json(r#"{ "method": "pchip" }"#).unwrap();
/// assert_eq!(config.method, SplineMethod::Pchip);
/// assert_eq!(config.max_iterations, 15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplineConfig {
    pub method: SplineMethod,
    pub max_iterations: usize,
    pub negative_tolerance: f64,
    pub peak_tolerance: f64,
}

impl Default for SplineConfig {
    fn default() -> Self {
        Self {
            method: SplineMethod::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            negative_tolerance: DEFAULT_NEGATIVE_TOLERANCE,
            peak_tolerance: DEFAULT_PEAK_TOLERANCE,
        }
    }
}

impl SplineConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn engine(&self) -> SplineEngine {
        SplineEngine::new(self.method)
    }

    pub fn corrector(&self) -> NegativeFlowCorrector {
        NegativeFlowCorrector::new(self.max_iterations, self.negative_tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SplineConfig::default();
        assert_eq!(config.method, SplineMethod::Cubic);
        assert_eq!(config.max_iterations, 15);
        assert_eq!(config.negative_tolerance, -0.01);
        assert_eq!(config.peak_tolerance, 1.0);
        assert_eq!(SplineConfig::from_json("{}").unwrap(), config);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config =
            SplineConfig::from_json(r#"{"max_iterations": 40, "peak_tolerance": 5.0}"#).unwrap();
        assert_eq!(config.max_iterations, 40);
        assert_eq!(config.peak_tolerance, 5.0);
        assert_eq!(config.method, SplineMethod::Cubic);
        assert_eq!(config.corrector().max_iterations, 40);
    }

    #[test]
    fn unknown_method_is_rejected() {
        assert!(SplineConfig::from_json(r#"{"method": "akima"}"#).is_err());
    }
}
