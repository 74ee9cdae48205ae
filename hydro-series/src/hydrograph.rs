use chrono::{Duration, NaiveDateTime};

/// Hours per day; also the factor converting a one-hour accumulation delta
/// (in flow-days) into an hourly flow rate.
pub const HOURS_PER_DAY: usize = 24;

/// Output value for one hour: negative flows (and NaN) become 0.
pub fn clamp_flow(flow: f64) -> f64 {
    if flow > 0.0 {
        flow
    } else {
        0.0
    }
}

/// A dense hourly flow series.
///
/// Index 0 sits at `start` and is always 0: it has no preceding hour.
/// Index `i >= 1` is the average flow over the hour ending at
/// `start + i` hours.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyHydrograph {
    start: NaiveDateTime,
    flows: Vec<f64>,
}

impl HourlyHydrograph {
    pub fn new(start: NaiveDateTime, flows: Vec<f64>) -> Self {
        Self { start, flows }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn flows(&self) -> &[f64] {
        &self.flows
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Timestamp of grid index `index`.
    pub fn timestamp(&self, index: usize) -> NaiveDateTime {
        self.start + Duration::hours(index as i64)
    }

    /// The values written to output: everything after index 0.
    pub fn output_flows(&self) -> &[f64] {
        self.flows.get(1..).unwrap_or(&[])
    }

    /// Smallest flow in the series, `f64::INFINITY` when empty.
    pub fn min_flow(&self) -> f64 {
        self.flows.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_flow(&self) -> f64 {
        self.flows.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// A copy with every value passed through [`clamp_flow`].
    pub fn clamped(&self) -> HourlyHydrograph {
        HourlyHydrograph {
            start: self.start,
            flows: self.flows.iter().copied().map(clamp_flow).collect(),
        }
    }

    /// Average flow of each complete day, in the daily input's units.
    ///
    /// Day `k` covers indices `24k + 1 ..= 24k + 24`.
    pub fn daily_means(&self) -> Vec<f64> {
        self.output_flows()
            .chunks_exact(HOURS_PER_DAY)
            .map(|day| day.iter().sum::<f64>() / HOURS_PER_DAY as f64)
            .collect()
    }
}
