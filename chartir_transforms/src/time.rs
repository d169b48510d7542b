// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-series detection and sampling-cadence classification.
//!
//! Category axes frequently carry dates in one of a handful of textual shapes. This module
//! decides whether a category sequence is a time series and, if so, how finely it is sampled,
//! so axis and tooltip labels can drop the parts of a timestamp that carry no information.
//!
//! Cadence is taken from the **minimum** positive gap between distinct timestamps, not the
//! average: any two adjacent samples at the finest observed cadence determine the granularity,
//! which keeps sparse or irregular series classified correctly.

extern crate alloc;

use alloc::format;
use alloc::vec::Vec;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::Serialize;
use serde_json::Value;

/// Number of leading values inspected by [`analyze_time`].
pub const SAMPLE_LIMIT: usize = 30;

const DAY_MS: i64 = 86_400_000;
const YEAR_MS: i64 = (365 - 30) * DAY_MS;
const MONTH_MS: i64 = 28 * DAY_MS;
const WEEK_MS: i64 = 6 * DAY_MS;

/// Detected sampling cadence of a category axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    /// Finer than one day.
    SubDaily,
    /// One day.
    Daily,
    /// About one week.
    Weekly,
    /// About one month.
    Monthly,
    /// About one year.
    Yearly,
    /// Not a time series.
    Unknown,
}

/// Result of [`analyze_time`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAnalysis {
    /// Detected cadence.
    pub granularity: Granularity,
    /// Whether labels should omit the time of day.
    pub should_remove_time: bool,
    /// Whether any sampled value parsed as a timestamp.
    pub is_time_series: bool,
}

impl TimeAnalysis {
    /// The analysis of a non-temporal axis.
    pub const NOT_TIME: Self = Self {
        granularity: Granularity::Unknown,
        should_remove_time: false,
        is_time_series: false,
    };

    fn time_series(granularity: Granularity) -> Self {
        Self {
            granularity,
            should_remove_time: granularity != Granularity::SubDaily,
            is_time_series: true,
        }
    }
}

/// Classifies the first [`SAMPLE_LIMIT`] values of a category sequence.
pub fn analyze_time<'a>(values: impl IntoIterator<Item = &'a Value>) -> TimeAnalysis {
    let mut stamps: Vec<i64> = Vec::new();
    let mut any_explicit_time = false;
    for value in values.into_iter().take(SAMPLE_LIMIT) {
        let Some(ts) = parse_timestamp(value) else {
            continue;
        };
        any_explicit_time |= has_explicit_time(value, ts);
        stamps.push(ts.timestamp_millis());
    }

    match stamps.len() {
        0 => return TimeAnalysis::NOT_TIME,
        1 => return TimeAnalysis::time_series(single_sample(any_explicit_time)),
        _ => {}
    }

    stamps.sort_unstable();
    stamps.dedup();
    let min_gap = stamps
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|gap| *gap > 0)
        .min();

    let granularity = match min_gap {
        None => single_sample(any_explicit_time),
        Some(gap) if gap < DAY_MS => Granularity::SubDaily,
        Some(gap) if gap >= YEAR_MS => Granularity::Yearly,
        Some(gap) if gap >= MONTH_MS => Granularity::Monthly,
        Some(gap) if gap >= WEEK_MS => Granularity::Weekly,
        Some(_) => Granularity::Daily,
    };
    TimeAnalysis::time_series(granularity)
}

fn single_sample(explicit_time: bool) -> Granularity {
    if explicit_time {
        Granularity::SubDaily
    } else {
        Granularity::Daily
    }
}

/// Parses a cell as a UTC timestamp.
///
/// Accepted shapes: `YYYY-MM-DD`, `YYYY-MM`, combined date-time (space or `T` separated,
/// optional seconds, fraction and offset), and 10/13-digit epoch seconds/milliseconds given
/// either as numbers or digit strings.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let raw = n.as_i64().or_else(|| {
                let f = n.as_f64()?;
                if f.abs() >= 1e15 {
                    return None;
                }
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "bounded by the 1e15 guard; fractional epochs are rejected below"
                )]
                let i = f as i64;
                (i as f64 == f).then_some(i)
            })?;
            let digits = raw
                .unsigned_abs()
                .checked_ilog10()
                .map_or(1, |d| d as usize + 1);
            parse_epoch(raw, digits)
        }
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

/// String form of [`parse_timestamp`].
pub fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        let raw = s.parse::<i64>().ok()?;
        return parse_epoch(raw, s.len());
    }
    match s.len() {
        7 => {
            let date = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok()?;
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
        10 => {
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
        _ => {}
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = s.strip_suffix('Z').unwrap_or(s);
    const FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|dt| dt.and_utc())
}

fn parse_epoch(raw: i64, digits: usize) -> Option<DateTime<Utc>> {
    match digits {
        10 => DateTime::from_timestamp(raw, 0),
        13 => DateTime::from_timestamp_millis(raw),
        _ => None,
    }
}

/// Whether a parsed cell carries a meaningful time of day.
///
/// Strings must spell a `HH:MM` component; a component that is exactly midnight is treated
/// as a date that was serialized with a zero time, not as an explicit time.
fn has_explicit_time(value: &Value, ts: DateTime<Utc>) -> bool {
    let spelled = match value {
        Value::String(s) => has_clock_pattern(s),
        _ => true,
    };
    spelled && (ts.hour(), ts.minute(), ts.second()) != (0, 0, 0)
}

fn has_clock_pattern(s: &str) -> bool {
    let b = s.as_bytes();
    b.windows(4).any(|w| {
        w[0].is_ascii_digit() && w[1] == b':' && w[2].is_ascii_digit() && w[3].is_ascii_digit()
    })
}
