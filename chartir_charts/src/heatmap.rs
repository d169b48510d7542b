// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Category × category heatmaps.
//!
//! The color scale is bounded by percentiles (5th/95th by default) rather than the true
//! extent so a single extreme cell does not wash out the rest. A configured
//! `visualMapCenter` takes precedence: the scale becomes diverging and symmetric around
//! the center, spanning the full extent of the data.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use chartir_core::{FieldCandidates, Row, Theme, css_color};
use chartir_transforms::{Extent, Pivot, PivotFields, analyze_time, quantile_bounds};
use serde_json::{Value, json};

use crate::ChartConfig;
use crate::axis::{
    CATEGORY_FALLBACKS, VALUE_FALLBACKS, category_axis, item_tooltip, label_categories,
};
use crate::config::HeatmapOptions;
use crate::format::ValueFormatter;
use crate::layout::LayoutPolicy;
use crate::palette::resolve_colors;
use crate::processor::{ChartKind, ChartProcessor, ChartSpec};
use crate::tooltip::TooltipComposer;

/// Conventional names for the y-category field.
const ROW_FALLBACKS: &[&str] = &["series", "group", "weekday", "hour", "row"];

/// Low, middle and high stops of the diverging scale.
const DIVERGING: [&str; 3] = ["#2563EB", "#F3F4F6", "#DC2626"];

/// Pivoted cells plus color-scale bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatmapData {
    /// Cells, indexed `[row][column]`.
    pub pivot: Pivot,
    /// Column axis labels.
    pub columns: Vec<String>,
    /// Column tooltip titles.
    pub column_titles: Vec<String>,
    /// Color-scale bounds.
    pub bounds: Extent,
    /// Whether the scale diverges around a configured center.
    pub diverging: bool,
}

/// Color-scale bounds for `values` under `options`.
///
/// An explicit center wins over percentile bounds. Returns `None` when there are no finite
/// values.
pub fn color_bounds(values: &[f64], options: &HeatmapOptions) -> Option<Extent> {
    let extent = Extent::of(values.iter().copied())?;
    if let Some(center) = options.visual_map_center.filter(|c| c.is_finite()) {
        return Some(extent.centered_on(center));
    }
    if !options.use_percentile_bounds {
        return Some(extent);
    }
    let (lo, hi) = (options.lower_percentile, options.upper_percentile);
    if lo.is_nan() || hi.is_nan() || lo >= hi {
        log::warn!("heatmap: ignoring percentile bounds {lo}..{hi}");
        return Some(extent);
    }
    quantile_bounds(values.iter().copied(), lo, hi)
}

/// Heatmap processor.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeatmapProcessor;

impl ChartProcessor for HeatmapProcessor {
    type Processed = Option<HeatmapData>;

    fn kind(&self) -> ChartKind {
        ChartKind::Heatmap
    }

    fn process_data(&self, rows: &[&Row], config: &ChartConfig) -> Option<HeatmapData> {
        let column = FieldCandidates::new(config.x_field.as_deref(), CATEGORY_FALLBACKS)
            .resolve_in(rows)?;
        let row = FieldCandidates::new(config.series_field.as_deref(), ROW_FALLBACKS)
            .resolve_in(rows)
            .filter(|r| *r != column)?;
        let value_pref = config.value_field.as_deref().or(config.y_field.as_deref());
        let value = FieldCandidates::new(value_pref, VALUE_FALLBACKS).resolve_in(rows)?;

        let mut pivot = Pivot::build(
            rows,
            PivotFields {
                category: column,
                value,
                series: Some(row),
            },
            config.aggregation,
        );
        if pivot.is_empty() {
            return None;
        }
        let time = analyze_time(&pivot.category_values);
        if time.is_time_series {
            pivot.sort_chronologically();
        }
        let values: Vec<f64> = pivot.cells.iter().flatten().flatten().copied().collect();
        let bounds = color_bounds(&values, &config.heatmap)?;
        Some(HeatmapData {
            columns: label_categories(&pivot, &time, false),
            column_titles: label_categories(&pivot, &time, true),
            diverging: config.heatmap.visual_map_center.is_some(),
            pivot,
            bounds,
        })
    }

    fn build(&self, data: Self::Processed, config: &ChartConfig, dark: bool) -> Option<ChartSpec> {
        let data = data?;
        let theme = Theme::for_mode(dark);
        let formatter = ValueFormatter::from_config(config);
        let composer = TooltipComposer::new(formatter, dark);
        let layout = LayoutPolicy::from_config(config, false);

        let mut items: Vec<Value> = Vec::new();
        for (ri, cells) in data.pivot.cells.iter().enumerate() {
            for (ci, cell) in cells.iter().enumerate() {
                let Some(v) = cell else {
                    continue;
                };
                let title = format!("{} · {}", data.column_titles[ci], data.pivot.series[ri]);
                items.push(json!({
                    "value": [ci, ri, v],
                    "label": { "formatter": formatter.axis(*v) },
                    "tooltip": {
                        "formatter": composer.details(&title, None, &[("Value", formatter.tooltip(*v))]),
                    },
                }));
            }
        }

        let in_range = if data.diverging {
            json!(DIVERGING)
        } else {
            let accent = resolve_colors(config, 1, dark);
            json!([css_color(theme.split_line), accent.first()])
        };

        let mut grid = layout.grid_value();
        grid["bottom"] = json!(56);
        let option = json!({
            "backgroundColor": "transparent",
            "grid": grid,
            "tooltip": item_tooltip(dark),
            "xAxis": category_axis(&data.columns, true, dark),
            "yAxis": category_axis(&data.pivot.series, true, dark),
            "visualMap": {
                "type": "continuous",
                "min": data.bounds.min,
                "max": data.bounds.max,
                "calculable": true,
                "orient": "horizontal",
                "left": "center",
                "bottom": 4,
                "itemHeight": 120,
                "text": [formatter.axis(data.bounds.max), formatter.axis(data.bounds.min)],
                "textStyle": { "color": css_color(theme.muted_text) },
                "inRange": { "color": in_range },
            },
            "series": [{
                "type": "heatmap",
                "data": items,
                "label": { "show": config.show_labels, "color": css_color(theme.text) },
                "itemStyle": { "borderWidth": 1, "borderColor": css_color(theme.split_line) },
                "emphasis": { "itemStyle": { "borderColor": css_color(theme.text) } },
            }],
        });
        Some(ChartSpec::new(option))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn one_to_hundred() -> Vec<f64> {
        (1..=100).map(f64::from).collect()
    }

    #[test]
    fn percentile_bounds_are_strictly_inside_the_extent() {
        let b = color_bounds(&one_to_hundred(), &HeatmapOptions::default()).unwrap();
        assert!(b.min > 1.0, "{b:?}");
        assert!(b.max < 100.0, "{b:?}");
    }

    #[test]
    fn explicit_center_overrides_percentiles() {
        let options = HeatmapOptions {
            visual_map_center: Some(0.0),
            ..HeatmapOptions::default()
        };
        let b = color_bounds(&one_to_hundred(), &options).unwrap();
        assert_eq!(b, Extent { min: -100.0, max: 100.0 });
        assert_eq!(b.max - 0.0, 0.0 - b.min);
    }

    #[test]
    fn true_extent_when_percentiles_disabled() {
        let options = HeatmapOptions {
            use_percentile_bounds: false,
            ..HeatmapOptions::default()
        };
        let b = color_bounds(&one_to_hundred(), &options).unwrap();
        assert_eq!(b, Extent { min: 1.0, max: 100.0 });
    }

    #[test]
    fn cells_carry_axis_indices() {
        let data = json!([
            {"category": "mon", "hour": "09", "value": 3},
            {"category": "tue", "hour": "09", "value": 5},
            {"category": "mon", "hour": "10", "value": 1},
        ]);
        let spec = HeatmapProcessor.options(&data, &ChartConfig::default(), false);
        let items = spec.option["series"][0]["data"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["value"], json!([0, 0, 3.0]));
        assert_eq!(items[2]["value"], json!([0, 1, 1.0]));
        assert_eq!(spec.option["yAxis"]["data"], json!(["09", "10"]));
    }

    #[test]
    fn missing_row_field_gives_the_empty_spec() {
        let spec = HeatmapProcessor.options(&json!([{"category": "a", "value": 1}]), &ChartConfig::default(), false);
        assert!(spec.is_empty());
    }
}
