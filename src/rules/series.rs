//! Latest-value and windowed lookups over unordered record series.
//!
//! Records with an unparseable timestamp are skipped everywhere.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{HistoryFilter, SeriesRecord};

/// Records with a parseable timestamp, ascending. Equal timestamps keep input order.
pub fn sorted<R: SeriesRecord>(series: &[R]) -> Vec<(NaiveDateTime, &R)> {
    let mut points: Vec<(NaiveDateTime, &R)> = series
        .iter()
        .filter_map(|r| r.parsed_timestamp().map(|ts| (ts, r)))
        .collect();
    points.sort_by_key(|(ts, _)| *ts);
    points
}

/// Most recent record. On a timestamp tie the later element of `series` wins.
pub fn latest<R: SeriesRecord>(series: &[R]) -> Option<&R> {
    let mut best: Option<(NaiveDateTime, &R)> = None;
    for record in series {
        let Some(ts) = record.parsed_timestamp() else {
            continue;
        };
        match best {
            Some((best_ts, _)) if ts < best_ts => {}
            _ => best = Some((ts, record)),
        }
    }
    best.map(|(_, record)| record)
}

/// Field value of the most recent record.
pub fn latest_value<R: SeriesRecord>(series: &[R], field: &str) -> Option<f64> {
    latest(series)?.numeric_field(field)
}

/// Records whose timestamp falls on `date_key` (`YYYY-MM-DD`), time of day ignored.
pub fn count_on_date<R: SeriesRecord>(series: &[R], date_key: &str) -> usize {
    count_on_date_matching(series, date_key, |_| true)
}

/// Same-day count restricted by a predicate.
pub fn count_on_date_matching<R, F>(series: &[R], date_key: &str, predicate: F) -> usize
where
    R: SeriesRecord,
    F: Fn(&R) -> bool,
{
    series
        .iter()
        .filter(|r| r.timestamp().trim_start().starts_with(date_key))
        .filter(|r| r.parsed_timestamp().is_some())
        .filter(|r| predicate(r))
        .count()
}

/// Records inside the history window ending on `today`, ascending.
/// Future-dated entries are left out.
pub fn within_window<R: SeriesRecord>(
    series: &[R],
    filter: HistoryFilter,
    today: NaiveDate,
) -> Vec<&R> {
    let earliest = filter
        .days()
        .map(|days| today - chrono::Duration::days(days - 1));
    sorted(series)
        .into_iter()
        .filter(|(ts, _)| ts.date() <= today)
        .filter(|(ts, _)| earliest.map_or(true, |start| ts.date() >= start))
        .map(|(_, record)| record)
        .collect()
}

/// Whole days from the latest record strictly before `today`.
pub fn days_since_latest_before<R: SeriesRecord>(series: &[R], today: NaiveDate) -> Option<i64> {
    series
        .iter()
        .filter_map(|r| r.date())
        .filter(|d| *d < today)
        .max()
        .map(|d| (today - d).num_days())
}
