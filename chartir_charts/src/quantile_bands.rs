// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested percentile bands around a median line.
//!
//! Each category carries five quantiles (p05, p25, p50, p75, p95 by default). The bands are
//! drawn as stacked areas: an invisible base at the lowest quantile, then the lower outer,
//! inner and upper outer slices. The median is a separate line on top.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chartir_core::{FieldCandidates, Row, number};
use chartir_transforms::Extent;
use serde_json::{Value, json};

use crate::ChartConfig;
use crate::config::QuantileOptions;
use crate::axis::{CATEGORY_FALLBACKS, CategoryIndex, axis_tooltip, category_axis, value_axis};
use crate::format::ValueFormatter;
use crate::layout::{LayoutPolicy, ZoomAxis};
use crate::legend::{Legend, LegendItem};
use crate::palette::resolve_colors;
use crate::processor::{ChartKind, ChartProcessor, ChartSpec};
use crate::tooltip::TooltipComposer;

const STACK: &str = "bands";
const OUTER_OPACITY: f64 = 0.15;
const INNER_OPACITY: f64 = 0.35;

/// Five quantiles per category, in display order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuantileBandsData {
    /// Axis labels.
    pub labels: Vec<String>,
    /// Tooltip titles.
    pub titles: Vec<String>,
    /// Names of the five quantile fields, lowest first.
    pub names: Vec<String>,
    /// Quantiles per category, ascending within each entry.
    pub quantiles: Vec<[f64; 5]>,
}

impl QuantileBandsData {
    /// Stacked slice heights: base, lower outer, inner, upper outer.
    fn slices(&self) -> [Vec<f64>; 4] {
        let mut out: [Vec<f64>; 4] = Default::default();
        for q in &self.quantiles {
            out[0].push(q[0]);
            out[1].push(q[1] - q[0]);
            out[2].push(q[3] - q[1]);
            out[3].push(q[4] - q[3]);
        }
        out
    }
}

/// Quantile band processor.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuantileBandsProcessor;

impl ChartProcessor for QuantileBandsProcessor {
    type Processed = QuantileBandsData;

    fn kind(&self) -> ChartKind {
        ChartKind::QuantileBands
    }

    fn process_data(&self, rows: &[&Row], config: &ChartConfig) -> QuantileBandsData {
        let fallback;
        let mut names = &config.quantile.quantile_fields;
        if names.len() != 5 {
            log::warn!(
                "quantileBands: expected 5 quantile fields, got {}; using the defaults",
                names.len()
            );
            fallback = QuantileOptions::default().quantile_fields;
            names = &fallback;
        }
        let resolved: Option<Vec<&str>> = names
            .iter()
            .map(|name| FieldCandidates::new(Some(name.as_str()), &[]).resolve_in(rows))
            .collect();
        let (Some(category), Some(fields)) = (
            FieldCandidates::new(config.x_field.as_deref(), CATEGORY_FALLBACKS).resolve_in(rows),
            resolved,
        ) else {
            log::debug!("quantileBands: quantile fields not found");
            return QuantileBandsData::default();
        };

        let mut categories = CategoryIndex::default();
        let mut quantiles: Vec<[f64; 5]> = Vec::new();
        for row in rows {
            let mut q = [0.0; 5];
            let mut complete = true;
            for (slot, field) in q.iter_mut().zip(&fields) {
                match row.get(*field).and_then(number) {
                    Some(v) => *slot = v,
                    None => complete = false,
                }
            }
            if !complete {
                log::trace!("quantileBands: skipping row with missing quantiles");
                continue;
            }
            let Some(ci) = row.get(category).and_then(|raw| categories.insert(raw)) else {
                continue;
            };
            q.sort_by(f64::total_cmp);
            if ci == quantiles.len() {
                quantiles.push(q);
            } else {
                quantiles[ci] = q;
            }
        }

        let axis = categories.into_axis();
        QuantileBandsData {
            quantiles: axis.order.iter().map(|&i| quantiles[i]).collect(),
            labels: axis.labels,
            titles: axis.titles,
            names: names.clone(),
        }
    }

    fn build(&self, data: QuantileBandsData, config: &ChartConfig, dark: bool) -> Option<ChartSpec> {
        if data.quantiles.is_empty() {
            return None;
        }
        let formatter = ValueFormatter::from_config(config);
        let composer = TooltipComposer::new(formatter, dark);
        let color = resolve_colors(config, 1, dark)
            .into_iter()
            .next()
            .unwrap_or_default();
        let layout = LayoutPolicy::from_config(config, true);
        let n = &data.names;
        let outer = alloc::format!("{}–{}", n[0], n[4]);
        let inner = alloc::format!("{}–{}", n[1], n[3]);

        let [base, lower, middle, upper] = data.slices();
        let band = |name: &str, values: Vec<f64>, opacity: f64| {
            json!({
                "name": name,
                "type": "line",
                "stack": STACK,
                "stackStrategy": "all",
                "symbol": "none",
                "silent": true,
                "lineStyle": { "opacity": 0 },
                "areaStyle": { "color": color, "opacity": opacity },
                "data": values,
            })
        };
        let series = json!([
            {
                "name": "base",
                "type": "line",
                "stack": STACK,
                "stackStrategy": "all",
                "symbol": "none",
                "silent": true,
                "lineStyle": { "opacity": 0 },
                "data": base,
            },
            band(&outer, lower, OUTER_OPACITY),
            band(&inner, middle, INNER_OPACITY),
            band(&outer, upper, OUTER_OPACITY),
            {
                "name": "Median",
                "type": "line",
                "symbol": "none",
                "smooth": config.smooth,
                "lineStyle": { "color": color, "width": 2 },
                "data": data.quantiles.iter().map(|q| q[2]).collect::<Vec<_>>(),
            },
        ]);

        let tooltips: Vec<String> = data
            .titles
            .iter()
            .zip(&data.quantiles)
            .map(|(title, q)| {
                let lines: Vec<(&str, String)> = n
                    .iter()
                    .zip(q)
                    .rev()
                    .map(|(name, v)| (name.as_str(), formatter.tooltip(*v)))
                    .collect();
                composer.details(title, Some(color.as_str()), &lines)
            })
            .collect();

        let legend = Legend::new(alloc::vec![
            LegendItem::solid(outer.as_str(), color.as_str()),
            LegendItem::solid(inner.as_str(), color.as_str()),
            LegendItem::solid("Median", color.as_str()),
        ]);
        let extent = Extent::of(data.quantiles.iter().flatten().copied());
        let option = json!({
            "backgroundColor": "transparent",
            "color": [color],
            "grid": layout.grid_value(),
            "legend": legend.to_value(dark),
            "tooltip": axis_tooltip(tooltips, false, dark),
            "xAxis": category_axis(&data.labels, false, dark),
            "yAxis": value_axis(extent, formatter, dark),
            "dataZoom": layout.data_zoom(dark, ZoomAxis::X),
            "series": series,
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
    fn bands_stack_to_the_quantiles() {
        let data = json!([
            {"date": "2025-01-02", "p05": 1, "p25": 2, "p50": 3, "p75": 5, "p95": 9},
            {"date": "2025-01-01", "p05": 0, "p25": 1, "p50": 2, "p75": 3, "p95": 4},
            {"date": "2025-01-03", "p05": 0, "p25": 1, "p50": 2, "p75": 3},
        ]);
        let spec = QuantileBandsProcessor.options(&data, &ChartConfig::default(), false);
        let series = spec.option["series"].as_array().unwrap();
        assert_eq!(series.len(), 5);
        assert_eq!(spec.option["xAxis"]["data"], json!(["Jan 1", "Jan 2"]));
        assert_eq!(series[0]["data"], json!([0.0, 1.0]));
        assert_eq!(series[1]["data"], json!([1.0, 1.0]));
        assert_eq!(series[2]["data"], json!([2.0, 3.0]));
        assert_eq!(series[3]["data"], json!([1.0, 4.0]));
        assert_eq!(series[4]["data"], json!([2.0, 3.0]));
        assert_eq!(series[1]["name"], "p05–p95");
        assert_eq!(series[2]["name"], "p25–p75");
    }

    #[test]
    fn custom_fields_are_honoured() {
        let data = json!([{"category": "a", "lo": 1, "q1": 2, "mid": 3, "q3": 4, "hi": 5}]);
        let config = ChartConfig::from_value(&json!({"quantileFields": ["lo", "q1", "mid", "q3", "hi"]}));
        let spec = QuantileBandsProcessor.options(&data, &config, false);
        let tip = spec.option["tooltip"]["axisContent"][0].as_str().unwrap();
        assert!(tip.find(">hi<").unwrap() < tip.find(">lo<").unwrap());
    }

    #[test]
    fn wrong_field_count_uses_the_default_fields() {
        let config = ChartConfig::from_value(&json!({"quantileFields": ["lo", "hi"]}));
        let data = json!([
            {"category": "a", "lo": 0, "hi": 9, "p05": 1, "p25": 2, "p50": 3, "p75": 4, "p95": 5},
        ]);
        let processed = QuantileBandsProcessor.process_data(&rows(&data), &config);
        assert_eq!(processed.names, ["p05", "p25", "p50", "p75", "p95"]);
        assert_eq!(processed.quantiles, [[1.0, 2.0, 3.0, 4.0, 5.0]]);

        let partial = json!([{"category": "a", "p05": 1, "p95": 2}]);
        assert!(QuantileBandsProcessor.options(&partial, &config, false).is_empty());
    }

    #[test]
    fn sparse_first_row_is_skipped() {
        let data = json!([
            {"note": "partial"},
            {"date": "2025-01-01", "p05": 0, "p25": 1, "p50": 2, "p75": 3, "p95": 4},
        ]);
        let processed = QuantileBandsProcessor.process_data(&rows(&data), &ChartConfig::default());
        assert_eq!(processed.quantiles.len(), 1);
        assert_eq!(processed.labels, ["Jan 1"]);
    }
}
