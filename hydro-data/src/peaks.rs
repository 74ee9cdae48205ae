//! Peak control points.
//!
//! A known peak of magnitude `v` contributes `v/24` flow-days during its
//! peak hour. Each timing profile fixes the peak hour and how far into the
//! day's volume the peak hour begins; the peak hour always ends `v/24`
//! later, and the day's boundary values are left alone so the daily volume
//! is unchanged. The 11 PM hour ends on the next day boundary, so it begins
//! `v/24` short of the day's total.

use crate::accumulation::{AccumulationCurve, PointOrigin};
use chrono::NaiveDate;
use hydro_series::diagnostics::{Channel, Diagnostic, DiagnosticSink};
use hydro_series::hydrograph::HOURS_PER_DAY;
use hydro_series::peak::{PeakSpec, TimingProfile};
use hydro_utils::dates::format_dss_date;
use serde::Serialize;
use std::collections::HashSet;

/// Placement of the peak hour within its day.
#[derive(Debug, Clone, Copy)]
pub struct ProfileRule {
    pub start_hour: usize,
    pub end_hour: usize,
    /// Beginning-of-peak accumulation relative to the day start, from
    /// `(daily_flow, peak_volume)`.
    pub offset: fn(f64, f64) -> f64,
}

fn one_am(_daily_flow: f64, peak_volume: f64) -> f64 {
    peak_volume * 0.9
}

fn twelve_am(_daily_flow: f64, _peak_volume: f64) -> f64 {
    0.0
}

fn eleven_am(daily_flow: f64, peak_volume: f64) -> f64 {
    (daily_flow - peak_volume) * 11.0 / 23.0
}

fn eleven_pm(daily_flow: f64, peak_volume: f64) -> f64 {
    daily_flow - peak_volume
}

fn ten_pm(daily_flow: f64, peak_volume: f64) -> f64 {
    daily_flow - peak_volume - peak_volume * 0.9
}

/// Rounding allowed when a peak point lands on a day boundary, in flow-days.
const FIT_SLACK: f64 = 1e-6;

/// Indexed by profile code.
const PROFILE_RULES: [ProfileRule; 5] = [
    ProfileRule {
        start_hour: 1,
        end_hour: 2,
        offset: one_am,
    },
    ProfileRule {
        start_hour: 0,
        end_hour: 1,
        offset: twelve_am,
    },
    ProfileRule {
        start_hour: 11,
        end_hour: 12,
        offset: eleven_am,
    },
    ProfileRule {
        start_hour: 23,
        end_hour: 24,
        offset: eleven_pm,
    },
    ProfileRule {
        start_hour: 22,
        end_hour: 23,
        offset: ten_pm,
    },
];

pub fn profile_rule(profile: TimingProfile) -> ProfileRule {
    PROFILE_RULES[profile.code() as usize]
}

/// Beginning and ending peak accumulation for one day.
pub fn peak_sums(beginning_daily_sum: f64, daily_flow: f64, peak: &PeakSpec) -> (f64, f64) {
    let peak_volume = peak.magnitude / HOURS_PER_DAY as f64;
    let rule = profile_rule(peak.profile);
    let beginning_peak_sum = beginning_daily_sum + (rule.offset)(daily_flow, peak_volume);
    (beginning_peak_sum, beginning_peak_sum + peak_volume)
}

/// A peak that made it into the accumulation curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InjectedPeak {
    pub date: NaiveDate,
    pub magnitude: f64,
    pub profile: TimingProfile,
    /// Grid index of 00:00 on `date`.
    pub day_start: usize,
    pub beginning_daily_sum: f64,
    pub ending_daily_sum: f64,
    pub beginning_peak_sum: f64,
    pub ending_peak_sum: f64,
}

/// Insert each peak's two control points.
///
/// Skipped with a warning on [`Channel::Peaks`]:
/// - a second peak on a date that already has one (the first is kept),
/// - a peak outside the series or on a day whose boundaries are unknown,
/// - a peak whose points would leave the day's accumulation range and so
///   break the non-decreasing curve.
///
/// A peak point that coincides with a day boundary (the 12 AM start or the
/// 11 PM end) already holds the boundary value and is not rewritten.
pub fn inject_peaks(
    curve: &mut AccumulationCurve,
    peaks: &[PeakSpec],
    sink: &mut dyn DiagnosticSink,
) -> Vec<InjectedPeak> {
    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let mut injected = Vec::with_capacity(peaks.len());

    for peak in peaks {
        let date = format_dss_date(&peak.date);
        if !seen.insert(peak.date) {
            sink.emit(Diagnostic::warn(
                Channel::Peaks,
                format!("Second peak on {date} ignored, keeping the first"),
            ));
            continue;
        }

        let bounds = curve.day_start(peak.date).and_then(|start| {
            let end = start + HOURS_PER_DAY;
            Some((start, curve.get(start)?, curve.get(end)?))
        });
        let Some((day_start, beginning_daily_sum, ending_daily_sum)) = bounds else {
            sink.emit(Diagnostic::warn(
                Channel::Peaks,
                format!("Peak on {date} has no daily volume to anchor to, skipping"),
            ));
            continue;
        };

        let daily_flow = ending_daily_sum - beginning_daily_sum;
        let (beginning_peak_sum, ending_peak_sum) =
            peak_sums(beginning_daily_sum, daily_flow, peak);
        if beginning_peak_sum < beginning_daily_sum - FIT_SLACK
            || ending_peak_sum > ending_daily_sum + FIT_SLACK
        {
            sink.emit(Diagnostic::warn(
                Channel::Peaks,
                format!(
                    "Peak of {:.2} on {date} at {} does not fit a daily volume of {:.2}, skipping",
                    peak.magnitude, peak.profile, daily_flow
                ),
            ));
            continue;
        }

        let rule = profile_rule(peak.profile);
        for (hour, value) in [
            (day_start + rule.start_hour, beginning_peak_sum),
            (day_start + rule.end_hour, ending_peak_sum),
        ] {
            let on_boundary = curve
                .point(hour)
                .is_some_and(|p| p.origin == PointOrigin::DayBoundary);
            if !on_boundary {
                curve.set(hour, value, PointOrigin::Peak);
            }
        }

        sink.emit(Diagnostic::info(
            Channel::Peaks,
            format!(
                "Inserting peak of {:.2} on {date} at {}",
                peak.magnitude, peak.profile
            ),
        ));
        injected.push(InjectedPeak {
            date: peak.date,
            magnitude: peak.magnitude,
            profile: peak.profile,
            day_start,
            beginning_daily_sum,
            ending_daily_sum,
            beginning_peak_sum,
            ending_peak_sum,
        });
    }

    injected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulation::build_accumulation;
    use hydro_series::daily::DailyValue;
    use hydro_series::diagnostics::count;
    use log::Level;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(1986, 2, d).unwrap()
    }

    fn curve(flows: &[f64]) -> AccumulationCurve {
        let values: Vec<DailyValue> = flows
            .iter()
            .enumerate()
            .map(|(i, f)| DailyValue::new(day(i as u32 + 1), *f))
            .collect();
        build_accumulation(&values).unwrap()
    }

    fn peak(d: u32, magnitude: f64, profile: TimingProfile) -> PeakSpec {
        PeakSpec {
            date: day(d),
            magnitude,
            profile,
        }
    }

    #[test]
    fn twelve_am_peak_scenario() {
        let mut c = curve(&[5.0, 20.0, 5.0]);
        let mut sink = Vec::new();
        let injected = inject_peaks(&mut c, &[peak(2, 48.0, TimingProfile::TwelveAm)], &mut sink);
        assert_eq!(injected.len(), 1);
        let p = injected[0];
        assert_eq!(p.beginning_daily_sum, 5.0);
        assert_eq!(p.beginning_peak_sum, p.beginning_daily_sum);
        assert_eq!(p.ending_peak_sum, p.beginning_daily_sum + 2.0);
        assert_eq!(c.point(24).unwrap().origin, PointOrigin::DayBoundary);
        assert_eq!(c.get(25), Some(7.0));
        assert_eq!(c.point(25).unwrap().origin, PointOrigin::Peak);
        assert_eq!(count(&sink, Channel::Peaks, Level::Info), 1);
    }

    #[test]
    fn every_profile_conserves_peak_and_day_volume() {
        for profile in TimingProfile::ALL {
            let mut c = curve(&[30.0, 90.0, 30.0]);
            let before = c.get(48).unwrap() - c.get(24).unwrap();
            let mut sink = Vec::new();
            let injected = inject_peaks(&mut c, &[peak(2, 240.0, profile)], &mut sink);
            assert_eq!(injected.len(), 1, "{profile}");
            let p = injected[0];
            assert!(
                (p.ending_peak_sum - p.beginning_peak_sum - 10.0).abs() < 1e-9,
                "{profile}"
            );

            let rule = profile_rule(profile);
            let start = c.get(p.day_start + rule.start_hour).unwrap();
            let end = c.get(p.day_start + rule.end_hour).unwrap();
            assert_eq!(start, p.beginning_peak_sum, "{profile}");
            assert_eq!(end, p.ending_peak_sum, "{profile}");
            assert!((end - start - 10.0).abs() < 1e-9, "{profile}");

            assert_eq!(c.get(48).unwrap() - c.get(24).unwrap(), before, "{profile}");
            assert!(c.is_monotonic(), "{profile}");
        }
    }

    fn assert_sums(actual: (f64, f64), expected: (f64, f64)) {
        assert!((actual.0 - expected.0).abs() < 1e-9, "{actual:?} vs {expected:?}");
        assert!((actual.1 - expected.1).abs() < 1e-9, "{actual:?} vs {expected:?}");
    }

    #[test]
    fn profile_offsets() {
        let p = |profile| peak(1, 48.0, profile);
        // daily flow 20, peak volume 2
        assert_sums(peak_sums(100.0, 20.0, &p(TimingProfile::OneAm)), (101.8, 103.8));
        assert_sums(peak_sums(100.0, 20.0, &p(TimingProfile::TwelveAm)), (100.0, 102.0));
        let eleven = 100.0 + 18.0 * 11.0 / 23.0;
        assert_sums(
            peak_sums(100.0, 20.0, &p(TimingProfile::ElevenAm)),
            (eleven, eleven + 2.0),
        );
        assert_sums(peak_sums(100.0, 20.0, &p(TimingProfile::ElevenPm)), (118.0, 120.0));
        assert_sums(peak_sums(100.0, 20.0, &p(TimingProfile::TenPm)), (116.2, 118.2));
    }

    #[test]
    fn profile_hours() {
        assert_eq!(profile_rule(TimingProfile::OneAm).start_hour, 1);
        assert_eq!(profile_rule(TimingProfile::TwelveAm).start_hour, 0);
        assert_eq!(profile_rule(TimingProfile::ElevenAm).end_hour, 12);
        assert_eq!(profile_rule(TimingProfile::ElevenPm).end_hour, 24);
        assert_eq!(profile_rule(TimingProfile::TenPm).start_hour, 22);
    }

    #[test]
    fn eleven_pm_end_keeps_the_boundary() {
        let mut c = curve(&[30.0, 90.0, 30.0]);
        inject_peaks(&mut c, &[peak(2, 240.0, TimingProfile::ElevenPm)], &mut Vec::new());
        assert_eq!(c.get(48), Some(120.0));
        assert_eq!(c.point(48).unwrap().origin, PointOrigin::DayBoundary);
        assert_eq!(c.get(47), Some(30.0 + 90.0 - 10.0));
        assert_eq!(c.count(PointOrigin::Peak), 1);
    }

    #[test]
    fn duplicate_and_out_of_range_peaks_are_skipped() {
        let mut c = curve(&[30.0, 90.0, 30.0]);
        let mut sink = Vec::new();
        let injected = inject_peaks(
            &mut c,
            &[
                peak(2, 100.0, TimingProfile::ElevenAm),
                peak(2, 500.0, TimingProfile::OneAm),
                peak(9, 100.0, TimingProfile::OneAm),
            ],
            &mut sink,
        );
        assert_eq!(injected.len(), 1);
        assert_eq!(injected[0].magnitude, 100.0);
        assert_eq!(count(&sink, Channel::Peaks, Level::Warn), 2);
    }

    #[test]
    fn oversized_peak_is_skipped() {
        let mut c = curve(&[1.0, 1.0]);
        let mut sink = Vec::new();
        let injected = inject_peaks(&mut c, &[peak(1, 480.0, TimingProfile::OneAm)], &mut sink);
        assert!(injected.is_empty());
        assert_eq!(c.count(PointOrigin::Peak), 0);
        assert!(sink[0].message.contains("does not fit"));
    }
}
