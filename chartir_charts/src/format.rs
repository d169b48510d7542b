// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis, tooltip and date label formatting.
//!
//! Axis labels favor brevity (`$1.5M`), tooltips favor precision (`$1,500,000.00`). Date
//! labels drop whatever the detected granularity makes redundant and are always rendered in
//! UTC, so axis and tooltip labels agree regardless of the viewer's locale.

extern crate alloc;

use alloc::format;
use alloc::string::String;

use chartir_transforms::{Granularity, TimeAnalysis, parse_timestamp};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde_json::Value;

use crate::ChartConfig;
#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Default absolute value at which axis labels switch to K/M/B.
pub const DEFAULT_COMPACT_THRESHOLD: f64 = 1000.0;

/// Compact units, smallest first.
const UNITS: [(f64, &str); 4] = [(1.0, ""), (1e3, "K"), (1e6, "M"), (1e9, "B")];

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Unit affix family selected by the config's `format` name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValueFormat {
    /// Plain number.
    #[default]
    Number,
    /// US dollars, `$` prefix.
    Currency,
    /// xDAI, ` xDAI` suffix.
    XDai,
    /// Percentage, `%` suffix.
    Percentage,
}

impl ValueFormat {
    /// Parses a format name. Unknown names format as plain numbers.
    pub fn from_name(name: Option<&str>) -> Self {
        let Some(name) = name else {
            return Self::Number;
        };
        let name = name.trim().trim_start_matches("format");
        if name.eq_ignore_ascii_case("currency") || name.eq_ignore_ascii_case("usd") {
            Self::Currency
        } else if name.eq_ignore_ascii_case("xdai") {
            Self::XDai
        } else if name.eq_ignore_ascii_case("percentage") || name.eq_ignore_ascii_case("percent")
        {
            Self::Percentage
        } else {
            Self::Number
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::Currency => "$",
            _ => "",
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::XDai => " xDAI",
            Self::Percentage => "%",
            _ => "",
        }
    }

    fn affix(self, negative: bool, body: &str) -> String {
        let sign = if negative { "-" } else { "" };
        format!("{sign}{}{body}{}", self.prefix(), self.suffix())
    }
}

/// Number formatting resolved from a chart config.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueFormatter {
    /// Unit affix family.
    pub format: ValueFormat,
    /// Decimal places for tooltip values.
    pub decimals: u8,
    /// Absolute value at which axis labels compact.
    pub compact_threshold: f64,
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self {
            format: ValueFormat::Number,
            decimals: 2,
            compact_threshold: DEFAULT_COMPACT_THRESHOLD,
        }
    }
}

impl ValueFormatter {
    /// Resolves formatting from `config`.
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            format: ValueFormat::from_name(config.format.as_deref()),
            decimals: config.decimals.unwrap_or(2).min(8),
            compact_threshold: config
                .compact_threshold
                .filter(|t| t.is_finite() && *t > 0.0)
                .unwrap_or(DEFAULT_COMPACT_THRESHOLD),
        }
    }

    /// Short axis label. See [`format_axis_value`].
    pub fn axis(&self, value: f64) -> String {
        if !value.is_finite() {
            return String::new();
        }
        let magnitude = value.abs();
        if magnitude < self.compact_threshold {
            return self.format.affix(value < 0.0, &format_number(magnitude, 2));
        }
        let mut unit = UNITS
            .iter()
            .rposition(|&(size, _)| magnitude >= size)
            .unwrap_or(0);
        // The unit and decimals are picked from the rounded value, so 999,950 reads 1.0M.
        let (rounded, decimals) = loop {
            let scaled = magnitude / UNITS[unit].0;
            let rounded = if scaled >= 10.0 {
                scaled.round()
            } else {
                (scaled * 10.0).round() / 10.0
            };
            if rounded >= 1000.0 && unit + 1 < UNITS.len() {
                unit += 1;
                continue;
            }
            break (rounded, usize::from(rounded < 10.0));
        };
        let body = format!("{rounded:.decimals$}{}", UNITS[unit].1);
        self.format.affix(value < 0.0, &body)
    }

    /// Full-precision tooltip value with grouping and unit affix.
    pub fn tooltip(&self, value: f64) -> String {
        if !value.is_finite() {
            return String::from("-");
        }
        self.format
            .affix(value < 0.0, &format_number(value.abs(), self.decimals))
    }
}

/// Formats an axis value with compact K/M/B suffixes at or above the compact threshold.
///
/// Below the threshold the plain grouped number is used. At or above it the magnitude is
/// scaled to K/M/B with one decimal place when the scaled value is below 10 and none
/// otherwise; the sign is kept in front of the unit affix.
pub fn format_axis_value(value: f64, config: &ChartConfig) -> String {
    ValueFormatter::from_config(config).axis(value)
}

/// Formats a number with thousands separators and at most `max_decimals` decimals.
///
/// Trailing zeros in the fraction are dropped.
pub fn format_number(value: f64, max_decimals: u8) -> String {
    if !value.is_finite() {
        return String::from("-");
    }
    let fixed = format!("{:.*}", usize::from(max_decimals), value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    let lead = int_part.len() % 3;
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Formats a timestamp for an axis (`for_tooltip = false`) or tooltip label.
///
/// | granularity            | axis          | tooltip              |
/// |------------------------|---------------|----------------------|
/// | sub-daily              | `Jan 5 09:30` | `Jan 5, 2025 09:30`  |
/// | daily, weekly, unknown | `Jan 5`       | `Jan 5, 2025`        |
/// | monthly                | `Jan 2025`    | `Jan 2025`           |
/// | yearly                 | `2025`        | `2025`               |
pub fn format_date_by_granularity(
    date: DateTime<Utc>,
    granularity: Granularity,
    for_tooltip: bool,
) -> String {
    let month = MONTHS[date.month0() as usize % 12];
    let (year, day) = (date.year(), date.day());
    match granularity {
        Granularity::Yearly => format!("{year}"),
        Granularity::Monthly => format!("{month} {year}"),
        Granularity::SubDaily => {
            let (h, m) = (date.hour(), date.minute());
            if for_tooltip {
                format!("{month} {day}, {year} {h:02}:{m:02}")
            } else {
                format!("{month} {day} {h:02}:{m:02}")
            }
        }
        Granularity::Daily | Granularity::Weekly | Granularity::Unknown => {
            if for_tooltip {
                format!("{month} {day}, {year}")
            } else {
                format!("{month} {day}")
            }
        }
    }
}

/// Label for a category cell: a granularity-aware date for time series, `fallback` otherwise.
pub fn category_label(
    raw: &Value,
    fallback: &str,
    analysis: &TimeAnalysis,
    for_tooltip: bool,
) -> String {
    if analysis.is_time_series
        && let Some(ts) = parse_timestamp(raw)
    {
        return format_date_by_granularity(ts, analysis.granularity, for_tooltip);
    }
    String::from(fallback)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use chartir_transforms::parse_timestamp_str;
    use serde_json::json;

    use super::*;

    #[test]
    fn compact_millions_use_one_decimal_below_ten() {
        let label = format_axis_value(1_500_000.0, &ChartConfig::default());
        assert_eq!(label, "1.5M");
        assert_eq!(format_axis_value(25_000.0, &ChartConfig::default()), "25K");
        assert_eq!(format_axis_value(3.2e9, &ChartConfig::default()), "3.2B");
    }

    #[test]
    fn units_are_chosen_after_rounding() {
        let config = ChartConfig::default();
        assert_eq!(format_axis_value(999_950.0, &config), "1.0M");
        assert_eq!(format_axis_value(9_960_000.0, &config), "10M");
        assert_eq!(format_axis_value(9_940_000.0, &config), "9.9M");
        assert_eq!(format_axis_value(999_499.0, &config), "999K");
        assert_eq!(format_axis_value(2.5e12, &config), "2500B");
    }

    #[test]
    fn below_threshold_delegates_to_plain_numbers() {
        assert_eq!(format_axis_value(500.0, &ChartConfig::default()), "500");
        assert_eq!(format_axis_value(12.5, &ChartConfig::default()), "12.5");
    }

    #[test]
    fn affixes_follow_format_name() {
        let currency = ChartConfig {
            format: Some("currency".into()),
            ..ChartConfig::default()
        };
        assert_eq!(format_axis_value(-1_500_000.0, &currency), "-$1.5M");
        let xdai = ChartConfig {
            format: Some("formatXDAI".into()),
            ..ChartConfig::default()
        };
        assert_eq!(format_axis_value(2_000.0, &xdai), "2.0K xDAI");
        assert_eq!(
            ValueFormatter::from_config(&xdai).tooltip(1234.5),
            "1,234.5 xDAI"
        );
    }

    #[test]
    fn configurable_threshold() {
        let c = ChartConfig {
            compact_threshold: Some(1e6),
            ..ChartConfig::default()
        };
        assert_eq!(format_axis_value(250_000.0, &c), "250,000");
    }

    #[test]
    fn grouping_and_trimming() {
        assert_eq!(format_number(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(format_number(100.0, 2), "100");
        assert_eq!(format_number(-0.001, 2), "0");
        assert_eq!(format_number(999.999, 2), "1,000");
    }

    #[test]
    fn dates_by_granularity() {
        let ts = parse_timestamp_str("2025-01-05 09:30").unwrap();
        assert_eq!(format_date_by_granularity(ts, Granularity::SubDaily, false), "Jan 5 09:30");
        assert_eq!(
            format_date_by_granularity(ts, Granularity::SubDaily, true),
            "Jan 5, 2025 09:30"
        );
        assert_eq!(format_date_by_granularity(ts, Granularity::Daily, false), "Jan 5");
        assert_eq!(format_date_by_granularity(ts, Granularity::Weekly, true), "Jan 5, 2025");
        assert_eq!(format_date_by_granularity(ts, Granularity::Monthly, false), "Jan 2025");
        assert_eq!(format_date_by_granularity(ts, Granularity::Yearly, true), "2025");
    }

    #[test]
    fn category_labels_only_reformat_time_series() {
        let daily = TimeAnalysis {
            granularity: Granularity::Daily,
            should_remove_time: true,
            is_time_series: true,
        };
        assert_eq!(category_label(&json!("2025-02-03"), "x", &daily, false), "Feb 3");
        assert_eq!(category_label(&json!("Safe"), "Safe", &daily, false), "Safe");
        assert_eq!(
            category_label(&json!("2025-02-03"), "2025-02-03", &TimeAnalysis::NOT_TIME, false),
            "2025-02-03"
        );
    }
}
