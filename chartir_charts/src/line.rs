// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line and area charts.
//!
//! Both share one processor; an area chart is a line chart with a filled region down to
//! the baseline (or to the series below it when stacked). Missing values break the line
//! rather than dropping it to zero.

extern crate alloc;

use alloc::vec::Vec;

use chartir_core::Row;
use serde_json::{Value, json};

use crate::ChartConfig;
use crate::axis::{AxisData, AxisFrame, value_axis};
use crate::format::ValueFormatter;
use crate::palette::resolve_colors;
use crate::processor::{ChartKind, ChartProcessor, ChartSpec};

/// Point markers are hidden once a series has more points than this.
const SYMBOL_LIMIT: usize = 30;

/// Line (or area) chart processor.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineProcessor {
    area: bool,
}

impl LineProcessor {
    /// A plain line chart.
    pub fn line() -> Self {
        Self { area: false }
    }

    /// A filled area chart.
    pub fn area() -> Self {
        Self { area: true }
    }
}

impl ChartProcessor for LineProcessor {
    type Processed = Option<AxisData>;

    fn kind(&self) -> ChartKind {
        if self.area {
            ChartKind::Area
        } else {
            ChartKind::Line
        }
    }

    fn process_data(&self, rows: &[&Row], config: &ChartConfig) -> Self::Processed {
        AxisData::from_rows(rows, config)
    }

    fn build(&self, data: Self::Processed, config: &ChartConfig, dark: bool) -> Option<ChartSpec> {
        let data = data?;
        let formatter = ValueFormatter::from_config(config);
        let colors = resolve_colors(config, data.pivot.series.len(), dark);
        let show_symbol = data.pivot.categories.len() <= SYMBOL_LIMIT;
        let fill_opacity = if config.stacked { 0.55 } else { 0.2 };

        let series: Vec<Value> = data
            .pivot
            .series
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut s = json!({
                    "name": name,
                    "type": "line",
                    "data": data.labelled_series_data(i, formatter, config.show_labels),
                    "smooth": config.smooth,
                    "showSymbol": show_symbol,
                    "symbolSize": 6,
                    "connectNulls": false,
                    "lineStyle": { "width": 2, "color": colors[i] },
                    "itemStyle": { "color": colors[i] },
                    "label": { "show": config.show_labels, "position": "top" },
                    "emphasis": { "focus": "series" },
                });
                if self.area {
                    s["areaStyle"] = json!({ "color": colors[i], "opacity": fill_opacity });
                }
                if config.stacked {
                    s["stack"] = json!("total");
                }
                s
            })
            .collect();

        let extent = data.value_extent(config.stacked, self.area);
        let option = AxisFrame {
            data: &data,
            config,
            colors: &colors,
            series,
            value_axis: value_axis(extent, formatter, dark),
            boundary_gap: false,
            shadow_pointer: false,
            horizontal: false,
        }
        .into_option(dark);
        Some(ChartSpec::new(option))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn hourly() -> Value {
        json!([
            {"timestamp": "2025-03-01 10:00", "value": 2},
            {"timestamp": "2025-03-01 09:00", "value": 1},
            {"timestamp": "2025-03-01 11:00", "value": null},
        ])
    }

    #[test]
    fn sub_daily_axis_keeps_times_and_gaps() {
        let spec = LineProcessor::line().options(&hourly(), &ChartConfig::default(), false);
        assert_eq!(
            spec.option["xAxis"]["data"],
            json!(["Mar 1 09:00", "Mar 1 10:00", "Mar 1 11:00"])
        );
        assert_eq!(spec.option["series"][0]["data"], json!([1.0, 2.0, null]));
        assert_eq!(spec.option["xAxis"]["boundaryGap"], false);
        assert!(spec.option["series"][0].get("areaStyle").is_none());
    }

    #[test]
    fn area_fills_and_includes_zero() {
        let config = ChartConfig {
            smooth: true,
            ..ChartConfig::default()
        };
        let spec = LineProcessor::area().options(
            &json!([{"category": "a", "value": 50}, {"category": "b", "value": 80}]),
            &config,
            false,
        );
        assert_eq!(ChartProcessor::kind(&LineProcessor::area()), ChartKind::Area);
        assert_eq!(spec.option["series"][0]["smooth"], true);
        assert!(spec.option["series"][0].get("areaStyle").is_some());
        assert_eq!(spec.option["yAxis"]["min"], 0.0);
    }
}
