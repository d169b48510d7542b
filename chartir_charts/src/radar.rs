// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Radar charts: one indicator per category, one polygon per series.

extern crate alloc;

use alloc::vec::Vec;

use chartir_core::{Row, Theme, css_color};
use serde_json::{Value, json};

use crate::ChartConfig;
use crate::axis::{AxisData, item_tooltip, series_legend};
use crate::format::ValueFormatter;
use crate::palette::resolve_colors;
use crate::processor::{ChartKind, ChartProcessor, ChartSpec};
use crate::tooltip::{TooltipComposer, TooltipEntry};

/// Indicator maximum relative to the largest value seen for it.
const HEADROOM: f64 = 1.1;

/// Radar chart processor.
#[derive(Clone, Copy, Debug, Default)]
pub struct RadarProcessor;

impl ChartProcessor for RadarProcessor {
    type Processed = Option<AxisData>;

    fn kind(&self) -> ChartKind {
        ChartKind::Radar
    }

    fn process_data(&self, rows: &[&Row], config: &ChartConfig) -> Self::Processed {
        AxisData::from_rows(rows, config)
    }

    fn build(&self, data: Self::Processed, config: &ChartConfig, dark: bool) -> Option<ChartSpec> {
        let data = data?;
        let theme = Theme::for_mode(dark);
        let formatter = ValueFormatter::from_config(config);
        let composer = TooltipComposer::new(formatter, dark);
        let colors = resolve_colors(config, data.pivot.series.len(), dark);

        let indicators: Vec<Value> = data
            .labels
            .iter()
            .enumerate()
            .map(|(ci, name)| json!({ "name": name, "max": indicator_max(&data, ci) }))
            .collect();

        let items: Vec<Value> = data
            .pivot
            .series
            .iter()
            .enumerate()
            .map(|(si, name)| {
                let entries: Vec<TooltipEntry> = data
                    .labels
                    .iter()
                    .zip(&data.pivot.cells[si])
                    .map(|(label, v)| TooltipEntry::new(label.as_str(), None, *v))
                    .collect();
                json!({
                    "name": name,
                    "value": data.series_data(si),
                    "lineStyle": { "color": colors[si], "width": 2 },
                    "itemStyle": { "color": colors[si] },
                    "areaStyle": { "color": colors[si], "opacity": 0.15 },
                    "tooltip": { "formatter": composer.compose(name, &entries) },
                })
            })
            .collect();

        let option = json!({
            "backgroundColor": "transparent",
            "color": colors,
            "legend": series_legend(&data.pivot.series, &colors).to_value(dark),
            "tooltip": item_tooltip(dark),
            "radar": {
                "indicator": indicators,
                "radius": if config.is_expanded { "70%" } else { "62%" },
                "center": ["50%", "55%"],
                "axisName": { "color": css_color(theme.muted_text) },
                "splitLine": { "lineStyle": { "color": css_color(theme.split_line) } },
                "axisLine": { "lineStyle": { "color": css_color(theme.axis_line) } },
                "splitArea": { "show": false },
            },
            "series": [{ "type": "radar", "symbolSize": 4, "data": items }],
        });
        Some(ChartSpec::new(option))
    }
}

fn indicator_max(data: &AxisData, category: usize) -> f64 {
    let largest = data
        .pivot
        .cells
        .iter()
        .filter_map(|s| s[category])
        .fold(0.0_f64, f64::max);
    if largest > 0.0 { largest * HEADROOM } else { 1.0 }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn indicator_max_has_headroom() {
        let data = json!([
            {"category": "speed", "team": "a", "value": 50},
            {"category": "speed", "team": "b", "value": 100},
            {"category": "cost", "team": "a", "value": 0},
        ]);
        let config = ChartConfig {
            series_field: Some("team".into()),
            ..ChartConfig::default()
        };
        let spec = RadarProcessor.options(&data, &config, false);
        let indicators = &spec.option["radar"]["indicator"];
        assert_eq!(indicators[0]["name"], "speed");
        assert!((indicators[0]["max"].as_f64().unwrap() - 110.0).abs() < 1e-9);
        assert_eq!(indicators[1]["max"], 1.0);
        assert_eq!(spec.option["series"][0]["data"][1]["value"], json!([100.0, null]));
    }
}
