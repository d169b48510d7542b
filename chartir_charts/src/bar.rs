// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar charts: grouped or stacked, vertical or horizontal.

extern crate alloc;

use alloc::vec::Vec;

use chartir_core::Row;
use serde_json::{Value, json};

use crate::ChartConfig;
use crate::axis::{AxisData, AxisFrame, value_axis};
use crate::format::ValueFormatter;
use crate::palette::resolve_colors;
use crate::processor::{ChartKind, ChartProcessor, ChartSpec};

/// Widest bar, in pixels.
const BAR_MAX_WIDTH: f64 = 48.0;

/// Bar chart processor.
#[derive(Clone, Copy, Debug, Default)]
pub struct BarProcessor;

impl ChartProcessor for BarProcessor {
    type Processed = Option<AxisData>;

    fn kind(&self) -> ChartKind {
        ChartKind::Bar
    }

    fn process_data(&self, rows: &[&Row], config: &ChartConfig) -> Self::Processed {
        AxisData::from_rows(rows, config)
    }

    fn build(&self, data: Self::Processed, config: &ChartConfig, dark: bool) -> Option<ChartSpec> {
        let data = data?;
        let formatter = ValueFormatter::from_config(config);
        let colors = resolve_colors(config, data.pivot.series.len(), dark);
        let last = data.pivot.series.len().saturating_sub(1);

        let series: Vec<Value> = data
            .pivot
            .series
            .iter()
            .enumerate()
            .map(|(i, name)| {
                // Only the outermost segment of a stack gets rounded corners.
                let radius = if config.stacked && i != last {
                    json!(0)
                } else if config.horizontal {
                    json!([0, 4, 4, 0])
                } else {
                    json!([4, 4, 0, 0])
                };
                let position = if config.stacked {
                    "inside"
                } else if config.horizontal {
                    "right"
                } else {
                    "top"
                };
                let mut s = json!({
                    "name": name,
                    "type": "bar",
                    "data": data.labelled_series_data(i, formatter, config.show_labels),
                    "barMaxWidth": BAR_MAX_WIDTH,
                    "itemStyle": { "color": colors[i], "borderRadius": radius },
                    "label": { "show": config.show_labels, "position": position },
                    "emphasis": { "focus": "series" },
                });
                if config.stacked {
                    s["stack"] = json!("total");
                }
                s
            })
            .collect();

        let option = AxisFrame {
            data: &data,
            config,
            colors: &colors,
            series,
            value_axis: value_axis(data.value_extent(config.stacked, true), formatter, dark),
            boundary_gap: true,
            shadow_pointer: true,
            horizontal: config.horizontal,
        }
        .into_option(dark);
        Some(ChartSpec::new(option))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn data() -> Value {
        json!([
            {"day": "2025-01-01", "chain": "gnosis", "value": 10},
            {"day": "2025-01-01", "chain": "base", "value": 5},
            {"day": "2025-01-02", "chain": "gnosis", "value": 12},
        ])
    }

    #[test]
    fn one_series_per_series_value() {
        let config = ChartConfig {
            series_field: Some("chain".into()),
            stacked: true,
            ..ChartConfig::default()
        };
        let spec = BarProcessor.options(&data(), &config, false);
        let series = spec.option["series"].as_array().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0]["stack"], "total");
        assert_eq!(series[1]["data"], json!([5.0, null]));
        assert_eq!(spec.option["xAxis"]["data"], json!(["Jan 1", "Jan 2"]));
        assert_eq!(spec.option["legend"]["show"], true);
        let tooltips = spec.option["tooltip"]["axisContent"].as_array().unwrap();
        assert_eq!(tooltips.len(), 2);
        assert!(tooltips[0].as_str().unwrap().contains("Total"));
    }

    #[test]
    fn horizontal_bars_swap_axes() {
        let config = ChartConfig {
            horizontal: true,
            enable_zoom: true,
            ..ChartConfig::default()
        };
        let spec = BarProcessor.options(&data(), &config, true);
        assert_eq!(spec.option["yAxis"]["type"], "category");
        assert_eq!(spec.option["xAxis"]["type"], "value");
        assert_eq!(spec.option["dataZoom"][0]["yAxisIndex"], 0);
        assert_eq!(spec.option["legend"]["show"], false);
    }

    #[test]
    fn labels_are_preformatted() {
        let config = ChartConfig {
            show_labels: true,
            format: Some("currency".into()),
            ..ChartConfig::default()
        };
        let spec = BarProcessor.options(&json!([{"category": "a", "value": 1500}]), &config, false);
        assert_eq!(spec.option["series"][0]["data"][0]["label"]["formatter"], "$1.5K");
    }

    #[test]
    fn overrides_win() {
        let config = ChartConfig {
            overrides: Some(json!({"grid": {"left": 0}})),
            ..ChartConfig::default()
        };
        let spec = BarProcessor.options(&data(), &config, false);
        assert_eq!(spec.option["grid"]["left"], 0);
        assert_eq!(spec.option["grid"]["containLabel"], true);
    }

    #[test]
    fn rows_missing_the_category_are_skipped() {
        let rows = json!([
            {"value": 3},
            {"date": "2025-01-01", "value": 1},
            {"date": "2025-01-02", "value": 2},
        ]);
        let spec = BarProcessor.options(&rows, &ChartConfig::default(), false);
        assert!(!spec.is_empty());
        assert_eq!(spec.option["xAxis"]["data"], json!(["Jan 1", "Jan 2"]));
        assert_eq!(spec.option["series"][0]["data"], json!([1.0, 2.0]));
    }

    #[test]
    fn invalid_rows_give_the_empty_spec() {
        let config = ChartConfig::default();
        assert!(BarProcessor.options(&json!([]), &config, false).is_empty());
        assert!(BarProcessor.options(&json!("x"), &config, false).is_empty());
        assert!(BarProcessor.options(&json!([{"note": "no fields"}]), &config, false).is_empty());
    }
}
