//! The sparse hourly accumulation curve.
//!
//! Grid index 0 is 00:00 of the first day; index `24k` is 00:00 of day `k`,
//! which carries the volume of the first `k` days (in flow-days). Hours
//! between boundaries stay unknown until a peak or a correction sets them.

use crate::error::DisaggregationError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use hydro_series::daily::DailyValue;
use hydro_series::hydrograph::HOURS_PER_DAY;
use serde::Serialize;

/// Why a control point exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PointOrigin {
    DayBoundary,
    Peak,
    Correction,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub value: f64,
    pub origin: PointOrigin,
}

#[derive(Debug, Clone)]
pub struct AccumulationCurve {
    first_day: NaiveDate,
    points: Vec<Option<ControlPoint>>,
}

impl AccumulationCurve {
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Timestamp of grid index 0.
    pub fn start(&self) -> NaiveDateTime {
        self.first_day.and_time(NaiveTime::default())
    }

    /// Number of grid hours, including index 0.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn day_count(&self) -> usize {
        self.points.len().saturating_sub(1) / HOURS_PER_DAY
    }

    pub fn get(&self, hour: usize) -> Option<f64> {
        self.point(hour).map(|p| p.value)
    }

    pub fn point(&self, hour: usize) -> Option<ControlPoint> {
        self.points.get(hour).copied().flatten()
    }

    /// Set a control point. Hours outside the grid are ignored.
    pub fn set(&mut self, hour: usize, value: f64, origin: PointOrigin) {
        if let Some(slot) = self.points.get_mut(hour) {
            *slot = Some(ControlPoint { value, origin });
        }
    }

    /// Day-boundary and peak points are the data; only correction points
    /// may be rewritten.
    pub fn is_protected(&self, hour: usize) -> bool {
        matches!(
            self.point(hour),
            Some(ControlPoint {
                origin: PointOrigin::DayBoundary | PointOrigin::Peak,
                ..
            })
        )
    }

    /// Grid index of 00:00 on `date`, if that instant is on the grid.
    pub fn day_start(&self, date: NaiveDate) -> Option<usize> {
        let days = (date - self.first_day).num_days();
        if days < 0 || days as usize > self.day_count() {
            return None;
        }
        Some(days as usize * HOURS_PER_DAY)
    }

    /// Known points as (hour, value) columns, ordered by hour.
    pub fn known(&self) -> (Vec<f64>, Vec<f64>) {
        self.points
            .iter()
            .enumerate()
            .filter_map(|(hour, p)| p.map(|p| (hour as f64, p.value)))
            .unzip()
    }

    pub fn count(&self, origin: PointOrigin) -> usize {
        self.points
            .iter()
            .flatten()
            .filter(|p| p.origin == origin)
            .count()
    }

    /// True when the known values never decrease.
    pub fn is_monotonic(&self) -> bool {
        let (_, values) = self.known();
        values.windows(2).all(|w| w[1] >= w[0])
    }
}

/// Build the accumulation curve from ordered daily values.
///
/// Negative flows are clamped to zero before summing, so the boundaries
/// never decrease. The grid runs from 00:00 of the first day to 00:00 of
/// the day after the last one. That final hour is the last day boundary and
/// so already holds the largest accumulated volume; nothing is fitted past
/// it.
pub fn build_accumulation(
    values: &[DailyValue],
) -> Result<AccumulationCurve, DisaggregationError> {
    let (first, last) = match (values.first(), values.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => return Err(DisaggregationError::EmptySeries),
    };
    if let Some(w) = values.windows(2).find(|w| w[1].date <= w[0].date) {
        return Err(DisaggregationError::UnorderedDates {
            previous: w[0].date,
            next: w[1].date,
        });
    }

    let days = (last - first).num_days() as usize + 1;
    let mut curve = AccumulationCurve {
        first_day: first,
        points: vec![None; days * HOURS_PER_DAY + 1],
    };
    curve.set(0, 0.0, PointOrigin::DayBoundary);

    let mut running = 0.0;
    for value in values {
        let day = (value.date - first).num_days() as usize;
        running += if value.flow > 0.0 { value.flow } else { 0.0 };
        curve.set((day + 1) * HOURS_PER_DAY, running, PointOrigin::DayBoundary);
    }

    log::debug!(
        "Accumulation curve: {} days, {} hours, total volume {:.2}",
        days,
        curve.len(),
        running
    );
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2001, 3, d).unwrap()
    }

    #[test]
    fn boundaries_carry_running_sums() {
        let values = [
            DailyValue::new(day(1), 10.0),
            DailyValue::new(day(2), 20.0),
            DailyValue::new(day(3), 10.0),
        ];
        let curve = build_accumulation(&values).unwrap();
        assert_eq!(curve.len(), 73);
        assert_eq!(curve.day_count(), 3);
        assert_eq!(curve.get(0), Some(0.0));
        assert_eq!(curve.get(24), Some(10.0));
        assert_eq!(curve.get(48), Some(30.0));
        assert_eq!(curve.get(72), Some(40.0));
        assert_eq!(curve.get(12), None);
        assert_eq!(curve.count(PointOrigin::DayBoundary), 4);
        assert!(curve.is_monotonic());
    }

    #[test]
    fn daily_volume_is_conserved() {
        let flows = [3.5, 0.0, 17.25, 8.0, 120.0];
        let values: Vec<DailyValue> = flows
            .iter()
            .enumerate()
            .map(|(i, f)| DailyValue::new(day(i as u32 + 1), *f))
            .collect();
        let curve = build_accumulation(&values).unwrap();
        for (i, flow) in flows.iter().enumerate() {
            let start = curve.get(i * 24).unwrap();
            let end = curve.get((i + 1) * 24).unwrap();
            assert_eq!(end - start, *flow);
        }
    }

    #[test]
    fn curve_ends_at_total_volume() {
        let values = [
            DailyValue::new(day(1), 5.0),
            DailyValue::new(day(2), 12.0),
            DailyValue::new(day(4), -8.0),
        ];
        let curve = build_accumulation(&values).unwrap();
        assert_eq!(curve.len(), 4 * 24 + 1);
        assert_eq!(curve.get(curve.len() - 1), Some(17.0));
        let (_, known) = curve.known();
        assert!(known.iter().all(|v| *v <= 17.0));
        assert_eq!(
            curve.point(curve.len() - 1).unwrap().origin,
            PointOrigin::DayBoundary
        );
    }

    #[test]
    fn negative_flows_are_clamped() {
        let values = [
            DailyValue::new(day(1), 5.0),
            DailyValue::new(day(2), -3.0),
            DailyValue::new(day(3), 5.0),
        ];
        let curve = build_accumulation(&values).unwrap();
        assert_eq!(curve.get(48), Some(5.0));
        assert_eq!(curve.get(72), Some(10.0));
        assert!(curve.is_monotonic());
    }

    #[test]
    fn missing_days_leave_boundaries_unknown() {
        let values = [DailyValue::new(day(1), 5.0), DailyValue::new(day(4), 5.0)];
        let curve = build_accumulation(&values).unwrap();
        assert_eq!(curve.len(), 97);
        assert_eq!(curve.get(24), Some(5.0));
        assert_eq!(curve.get(48), None);
        assert_eq!(curve.get(72), None);
        assert_eq!(curve.get(96), Some(10.0));
        assert_eq!(curve.day_start(day(4)), Some(72));
        assert_eq!(curve.day_start(day(5)), Some(96));
        assert_eq!(curve.day_start(day(6)), None);
    }

    #[test]
    fn rejects_empty_and_unordered() {
        assert!(matches!(
            build_accumulation(&[]),
            Err(DisaggregationError::EmptySeries)
        ));
        let values = [DailyValue::new(day(2), 1.0), DailyValue::new(day(1), 1.0)];
        assert!(matches!(
            build_accumulation(&values),
            Err(DisaggregationError::UnorderedDates { .. })
        ));
    }

    #[test]
    fn protected_points() {
        let values = [DailyValue::new(day(1), 5.0)];
        let mut curve = build_accumulation(&values).unwrap();
        curve.set(5, 1.0, PointOrigin::Correction);
        curve.set(6, 2.0, PointOrigin::Peak);
        assert!(curve.is_protected(0));
        assert!(!curve.is_protected(5));
        assert!(curve.is_protected(6));
        assert!(!curve.is_protected(7));
        curve.set(500, 1.0, PointOrigin::Correction);
        assert_eq!(curve.len(), 25);
    }
}
