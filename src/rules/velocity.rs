//! Annualised rate of change between two points of a series.
//!
//! The baseline is the earlier point whose distance from the latest point is
//! closest to the preferred window, among points at least the minimum window
//! away.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::SeriesRecord;

const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityOptions {
    pub preferred_window_days: f64,
    pub minimum_window_days: f64,
}

impl Default for VelocityOptions {
    fn default() -> Self {
        Self {
            preferred_window_days: 180.0,
            minimum_window_days: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityResult {
    pub per_year: f64,
    pub delta: f64,
    pub elapsed_days: i64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub from_value: f64,
    pub to_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// Fewer than two records with a valid date and value.
    InsufficientPoints,
    /// The only earlier point is too close to the latest one.
    WindowTooShort,
    /// Baseline and latest point fall on the same day.
    NoElapsedTime,
}

/// Velocity outcome; "unavailable" is distinct from a zero rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Velocity {
    Available(VelocityResult),
    Unavailable { reason: UnavailableReason },
}

impl Velocity {
    pub fn result(&self) -> Option<&VelocityResult> {
        match self {
            Self::Available(result) => Some(result),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.result().is_some()
    }
}

#[derive(Debug, Clone, Copy)]
struct Point {
    at: NaiveDateTime,
    value: f64,
}

/// Calendar days between two points; time of day is ignored.
fn elapsed_days(from: &Point, to: &Point) -> i64 {
    (to.at.date() - from.at.date()).num_days()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn unavailable(reason: UnavailableReason) -> Velocity {
    tracing::debug!(?reason, "Velocity unavailable");
    Velocity::Unavailable { reason }
}

/// Compute the annualised change of `field` over `series`.
pub fn compute_velocity<R: SeriesRecord>(
    series: &[R],
    field: &str,
    options: &VelocityOptions,
) -> Velocity {
    let mut points: Vec<Point> = series
        .iter()
        .filter_map(|r| {
            Some(Point {
                at: r.parsed_timestamp()?,
                value: r.numeric_field(field)?,
            })
        })
        .collect();
    points.sort_by_key(|p| p.at);

    let Some((last, earlier)) = points.split_last() else {
        return unavailable(UnavailableReason::InsufficientPoints);
    };
    if earlier.is_empty() {
        return unavailable(UnavailableReason::InsufficientPoints);
    }

    // Strict comparison keeps the earliest point on equal distance.
    let mut baseline: Option<(&Point, f64)> = None;
    for point in earlier {
        let elapsed = elapsed_days(point, last) as f64;
        if elapsed < options.minimum_window_days {
            continue;
        }
        let distance = (elapsed - options.preferred_window_days).abs();
        if baseline.map_or(true, |(_, best)| distance < best) {
            baseline = Some((point, distance));
        }
    }

    // Nothing far enough back: fall back to the second-to-last point, unless
    // it is the only earlier one.
    let chosen = match baseline {
        Some((point, _)) => point,
        None => match earlier {
            [_, .., previous] => previous,
            _ => return unavailable(UnavailableReason::WindowTooShort),
        },
    };

    let elapsed = elapsed_days(chosen, last);
    if elapsed <= 0 {
        return unavailable(UnavailableReason::NoElapsedTime);
    }

    let delta = last.value - chosen.value;
    Velocity::Available(VelocityResult {
        per_year: round1(delta / elapsed as f64 * DAYS_PER_YEAR),
        delta: round1(delta),
        elapsed_days: elapsed,
        from_date: chosen.at.date(),
        to_date: last.at.date(),
        from_value: chosen.value,
        to_value: last.value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HeightRecord;

    fn height(date: &str, cm: f64) -> HeightRecord {
        HeightRecord {
            recorded_at: date.into(),
            cm: Some(cm),
            ..Default::default()
        }
    }

    fn day(offset: i64) -> String {
        let base = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        (base + chrono::Duration::days(offset))
            .format("%Y-%m-%d")
            .to_string()
    }

    #[test]
    fn two_points_two_hundred_days() {
        let series = vec![height(&day(0), 10.0), height(&day(200), 16.0)];
        let v = compute_velocity(&series, "cm", &VelocityOptions::default());
        let r = v.result().unwrap();
        assert_eq!(r.per_year, 11.0);
        assert_eq!(r.delta, 6.0);
        assert_eq!(r.elapsed_days, 200);
        assert_eq!(r.from_value, 10.0);
        assert_eq!(r.to_value, 16.0);
        assert_eq!(r.to_date.format("%Y-%m-%d").to_string(), day(200));
    }

    #[test]
    fn picks_point_closest_to_preferred_window() {
        // Latest at day 400; candidates 400, 220 and 40 days back.
        let series = vec![
            height(&day(360), 130.0),
            height(&day(0), 120.0),
            height(&day(180), 125.0),
            height(&day(400), 131.0),
        ];
        let v = compute_velocity(&series, "cm", &VelocityOptions::default());
        let r = v.result().unwrap();
        assert_eq!(r.from_value, 125.0);
        assert_eq!(r.elapsed_days, 220);
        assert_eq!(r.per_year, round1(6.0 / 220.0 * 365.25));
    }

    #[test]
    fn equidistant_candidates_keep_earliest() {
        // 200 and 160 days back are both 20 days from 180.
        let series = vec![
            height(&day(0), 100.0),
            height(&day(40), 102.0),
            height(&day(200), 110.0),
        ];
        let r = compute_velocity(&series, "cm", &VelocityOptions::default());
        assert_eq!(r.result().unwrap().from_value, 100.0);
    }

    #[test]
    fn single_point_unavailable() {
        let series = vec![height(&day(0), 100.0)];
        assert_eq!(
            compute_velocity(&series, "cm", &VelocityOptions::default()),
            Velocity::Unavailable {
                reason: UnavailableReason::InsufficientPoints
            }
        );
        let empty: Vec<HeightRecord> = Vec::new();
        assert!(!compute_velocity(&empty, "cm", &VelocityOptions::default()).is_available());
    }

    #[test]
    fn only_recent_earlier_point_unavailable() {
        let series = vec![height(&day(0), 100.0), height(&day(10), 101.0)];
        assert_eq!(
            compute_velocity(&series, "cm", &VelocityOptions::default()),
            Velocity::Unavailable {
                reason: UnavailableReason::WindowTooShort
            }
        );
    }

    #[test]
    fn all_recent_points_fall_back_to_second_to_last() {
        let series = vec![
            height(&day(0), 100.0),
            height(&day(10), 101.0),
            height(&day(20), 102.0),
        ];
        let r = compute_velocity(&series, "cm", &VelocityOptions::default());
        let r = r.result().unwrap();
        assert_eq!(r.from_value, 101.0);
        assert_eq!(r.elapsed_days, 10);
        assert_eq!(r.per_year, round1(1.0 / 10.0 * 365.25));
    }

    #[test]
    fn minimum_window_counts_calendar_days() {
        let series = vec![
            height("2026-01-01T20:00", 100.0),
            height("2026-01-31T08:00", 101.0),
        ];
        let r = compute_velocity(&series, "cm", &VelocityOptions::default());
        let r = r.result().unwrap();
        assert_eq!(r.elapsed_days, 30);
        assert_eq!(r.from_value, 100.0);

        let series = vec![
            height("2026-01-02T06:00", 100.0),
            height("2026-01-31T23:00", 101.0),
        ];
        assert_eq!(
            compute_velocity(&series, "cm", &VelocityOptions::default()),
            Velocity::Unavailable {
                reason: UnavailableReason::WindowTooShort
            }
        );
    }

    #[test]
    fn same_day_fallback_unavailable() {
        let series = vec![
            height("2026-03-05T07:00", 100.0),
            height("2026-03-05T12:00", 100.5),
            height("2026-03-05T19:00", 101.0),
        ];
        assert_eq!(
            compute_velocity(&series, "cm", &VelocityOptions::default()),
            Velocity::Unavailable {
                reason: UnavailableReason::NoElapsedTime
            }
        );
    }

    #[test]
    fn invalid_points_are_discarded() {
        let mut bad_value = height(&day(100), 0.0);
        bad_value.cm = None;
        let series = vec![
            height("not a date", 50.0),
            bad_value,
            height(&day(0), 100.0),
            height(&day(200), 106.0),
        ];
        let r = compute_velocity(&series, "cm", &VelocityOptions::default());
        assert_eq!(r.result().unwrap().from_value, 100.0);
    }

    #[test]
    fn negative_change_is_reported() {
        let series = vec![height(&day(0), 80.0), height(&day(365), 78.5)];
        let r = compute_velocity(&series, "cm", &VelocityOptions::default());
        assert_eq!(r.result().unwrap().delta, -1.5);
        assert!(r.result().unwrap().per_year < 0.0);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let o: VelocityOptions = serde_json::from_str(r#"{"preferred_window_days": 90}"#).unwrap();
        assert_eq!(o.preferred_window_days, 90.0);
        assert_eq!(o.minimum_window_days, 30.0);
    }
}
