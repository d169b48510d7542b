// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box plots from pre-aggregated quantiles.
//!
//! Each row already carries the five summary statistics for its category; no raw samples
//! are read. Rows missing any of the five are skipped.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chartir_core::{FieldCandidates, Row, number};
use chartir_transforms::Extent;
use serde_json::{Value, json};

use crate::ChartConfig;
use crate::axis::{CATEGORY_FALLBACKS, CategoryIndex, axis_tooltip, category_axis, value_axis};
use crate::format::ValueFormatter;
use crate::layout::{LayoutPolicy, ZoomAxis};
use crate::legend::Legend;
use crate::palette::resolve_colors;
use crate::processor::{ChartKind, ChartProcessor, ChartSpec};
use crate::tooltip::TooltipComposer;

const MIN_FALLBACKS: &[&str] = &["min", "low", "lower", "p0"];
const Q1_FALLBACKS: &[&str] = &["q1", "p25", "lower_quartile"];
const MEDIAN_FALLBACKS: &[&str] = &["median", "p50", "q2"];
const Q3_FALLBACKS: &[&str] = &["q3", "p75", "upper_quartile"];
const MAX_FALLBACKS: &[&str] = &["max", "high", "upper", "p100"];

/// Box summaries in display order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoxplotData {
    /// Axis labels.
    pub labels: Vec<String>,
    /// Tooltip titles.
    pub titles: Vec<String>,
    /// `[min, q1, median, q3, max]` per category, ascending within each box.
    pub boxes: Vec<[f64; 5]>,
}

/// Box plot processor.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoxplotProcessor;

impl ChartProcessor for BoxplotProcessor {
    type Processed = BoxplotData;

    fn kind(&self) -> ChartKind {
        ChartKind::Boxplot
    }

    fn process_data(&self, rows: &[&Row], config: &ChartConfig) -> BoxplotData {
        let opts = &config.boxplot;
        let fields = [
            (opts.min_field.as_deref(), MIN_FALLBACKS),
            (opts.q1_field.as_deref(), Q1_FALLBACKS),
            (opts.median_field.as_deref(), MEDIAN_FALLBACKS),
            (opts.q3_field.as_deref(), Q3_FALLBACKS),
            (opts.max_field.as_deref(), MAX_FALLBACKS),
        ]
        .map(|(preferred, fallbacks)| FieldCandidates::new(preferred, fallbacks).resolve_in(rows));
        let (Some(category), [Some(min), Some(q1), Some(median), Some(q3), Some(max)]) = (
            FieldCandidates::new(config.x_field.as_deref(), CATEGORY_FALLBACKS).resolve_in(rows),
            fields,
        ) else {
            log::debug!("boxplot: quantile fields not found");
            return BoxplotData::default();
        };

        let mut categories = CategoryIndex::default();
        let mut boxes: Vec<[f64; 5]> = Vec::new();
        for row in rows {
            let stats = [min, q1, median, q3, max].map(|f| row.get(f).and_then(number));
            let [Some(a), Some(b), Some(c), Some(d), Some(e)] = stats else {
                log::trace!("boxplot: skipping row with missing quantiles");
                continue;
            };
            let Some(ci) = row.get(category).and_then(|raw| categories.insert(raw)) else {
                continue;
            };
            let mut summary = [a, b, c, d, e];
            summary.sort_by(f64::total_cmp);
            if ci == boxes.len() {
                boxes.push(summary);
            } else {
                boxes[ci] = summary;
            }
        }

        let axis = categories.into_axis();
        BoxplotData {
            boxes: axis.order.iter().map(|&i| boxes[i]).collect(),
            labels: axis.labels,
            titles: axis.titles,
        }
    }

    fn build(&self, data: BoxplotData, config: &ChartConfig, dark: bool) -> Option<ChartSpec> {
        if data.boxes.is_empty() {
            return None;
        }
        let formatter = ValueFormatter::from_config(config);
        let composer = TooltipComposer::new(formatter, dark);
        let color = resolve_colors(config, 1, dark)
            .into_iter()
            .next()
            .unwrap_or_default();
        let layout = LayoutPolicy::from_config(config, false);

        let tooltips: Vec<String> = data
            .titles
            .iter()
            .zip(&data.boxes)
            .map(|(title, [min, q1, median, q3, max])| {
                composer.details(
                    title,
                    Some(color.as_str()),
                    &[
                        ("Max", formatter.tooltip(*max)),
                        ("Q3", formatter.tooltip(*q3)),
                        ("Median", formatter.tooltip(*median)),
                        ("Q1", formatter.tooltip(*q1)),
                        ("Min", formatter.tooltip(*min)),
                    ],
                )
            })
            .collect();
        let extent = Extent::of(data.boxes.iter().flatten().copied());

        let option = json!({
            "backgroundColor": "transparent",
            "color": [color],
            "grid": layout.grid_value(),
            "legend": Legend::default().to_value(dark),
            "tooltip": axis_tooltip(tooltips, true, dark),
            "xAxis": category_axis(&data.labels, true, dark),
            "yAxis": value_axis(extent, formatter, dark),
            "dataZoom": layout.data_zoom(dark, ZoomAxis::X),
            "series": [{
                "type": "boxplot",
                "data": data.boxes,
                "boxWidth": ["20%", "60%"],
                "itemStyle": { "color": Value::Null, "borderColor": color, "borderWidth": 1.5 },
            }],
        });
        Some(ChartSpec::new(option))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn rows(v: &Value) -> Vec<&Row> {
        v.as_array().unwrap().iter().filter_map(Value::as_object).collect()
    }

    #[test]
    fn rows_need_all_five_quantiles() {
        let data = json!([
            {"category": "a", "min": 1, "q1": 2, "median": 3, "q3": 4, "max": 5},
            {"category": "b", "min": 1, "q1": 2, "median": 3, "q3": 4},
            {"category": "c", "min": 9, "q1": 2, "median": 3, "q3": 4, "max": 5},
        ]);
        let b = BoxplotProcessor.process_data(&rows(&data), &ChartConfig::default());
        assert_eq!(b.labels, ["a", "c"]);
        assert_eq!(b.boxes[0], [1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(b.boxes[1], [2.0, 3.0, 4.0, 5.0, 9.0]);
    }

    #[test]
    fn configured_fields_and_axis_tooltips() {
        let data = json!([{"day": "2025-01-01", "lo": 0, "a": 1, "m": 2, "b": 3, "hi": 4}]);
        let config = ChartConfig::from_value(&json!({
            "minField": "lo", "q1Field": "a", "medianField": "m", "q3Field": "b", "maxField": "hi"
        }));
        let spec = BoxplotProcessor.options(&data, &config, false);
        assert_eq!(spec.option["series"][0]["data"], json!([[0.0, 1.0, 2.0, 3.0, 4.0]]));
        let tip = spec.option["tooltip"]["axisContent"][0].as_str().unwrap();
        assert!(tip.contains("Median"));
        assert!(tip.contains("Jan 1, 2025"));
    }

    #[test]
    fn missing_quantile_fields_give_the_empty_spec() {
        let spec = BoxplotProcessor.options(&json!([{"category": "a", "value": 1}]), &ChartConfig::default(), false);
        assert!(spec.is_empty());
    }
}
