//! Disaggregation of daily flow volumes into hourly hydrographs.
//!
//! Daily volumes are summed into an accumulation curve, known peaks are
//! added as extra control points, a spline is fitted through the curve and
//! its hourly differences become the hydrograph. Overshoot that produces
//! negative flow is corrected iteratively.
//!
//! ```
//! use chrono::NaiveDate;
//! use hydro_data::config::SplineConfig;
//! use hydro_data::pipeline::disaggregate;
//! use hydro_series::daily::DailyValue;
//!
//! let first = NaiveDate::from_ymd_opt(2019, 3, 1).unwrap();
//! let daily: Vec<DailyValue> = [40.0, 40.0, 40.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, f)| DailyValue::new(first + chrono::Duration::days(i as i64), *f))
//!     .collect();
//!
//! let result = disaggregate(&daily, None, &SplineConfig::default(), &mut Vec::new()).unwrap();
//! assert_eq!(result.hydrograph.output_flows().len(), 72);
//! ```

pub mod accumulation;
pub mod config;
pub mod correction;
pub mod error;
pub mod interpolation;
pub mod peaks;
pub mod pipeline;
pub mod spline;
pub mod verify;
