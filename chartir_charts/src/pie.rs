// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie and donut charts.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use chartir_core::{FieldCandidates, Row, label, number};
use hashbrown::HashMap;
use serde_json::{Value, json};

use crate::ChartConfig;
use crate::axis::{CATEGORY_FALLBACKS, VALUE_FALLBACKS, item_tooltip};
use crate::format::{ValueFormatter, format_number};
use crate::legend::{Legend, LegendItem};
use crate::palette::resolve_colors;
use crate::processor::{ChartKind, ChartProcessor, ChartSpec};
use crate::tooltip::TooltipComposer;

/// Label of the slice collecting everything past `maxSlices`.
pub const OTHER_LABEL: &str = "Other";

/// One slice.
#[derive(Clone, Debug, PartialEq)]
pub struct PieSlice {
    /// Slice label.
    pub name: String,
    /// Summed value.
    pub value: f64,
}

/// Slices in descending order, plus their total.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PieData {
    /// Slices, largest first; a trailing `Other` slice when folded.
    pub slices: Vec<PieSlice>,
    /// Sum of every slice.
    pub total: f64,
}

/// Pie chart processor.
#[derive(Clone, Copy, Debug, Default)]
pub struct PieProcessor;

impl ChartProcessor for PieProcessor {
    type Processed = PieData;

    fn kind(&self) -> ChartKind {
        ChartKind::Pie
    }

    /// Sums values per name, drops non-positive slices, sorts descending and folds the tail
    /// into [`OTHER_LABEL`] so at most `maxSlices` slices remain.
    fn process_data(&self, rows: &[&Row], config: &ChartConfig) -> PieData {
        let name_pref = config.name_field.as_deref().or(config.x_field.as_deref());
        let value_pref = config.value_field.as_deref().or(config.y_field.as_deref());
        let (Some(name_field), Some(value_field)) = (
            FieldCandidates::new(name_pref, CATEGORY_FALLBACKS).resolve_in(rows),
            FieldCandidates::new(value_pref, VALUE_FALLBACKS).resolve_in(rows),
        ) else {
            return PieData::default();
        };

        let mut slices: Vec<PieSlice> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for row in rows {
            let Some(name) = row.get(name_field).and_then(label) else {
                continue;
            };
            let value = row.get(value_field).and_then(number).unwrap_or(0.0);
            let i = *index.entry(name.clone()).or_insert_with(|| {
                slices.push(PieSlice { name, value: 0.0 });
                slices.len() - 1
            });
            slices[i].value += value;
        }
        slices.retain(|s| s.value > 0.0);
        slices.sort_by(|a, b| b.value.total_cmp(&a.value));

        if let Some(max) = config.pie.max_slices.filter(|m| *m > 0)
            && slices.len() > max
        {
            let tail: f64 = slices.drain(max - 1..).map(|s| s.value).sum();
            slices.push(PieSlice {
                name: String::from(OTHER_LABEL),
                value: tail,
            });
        }
        let total = slices.iter().map(|s| s.value).sum();
        PieData { slices, total }
    }

    fn build(&self, data: PieData, config: &ChartConfig, dark: bool) -> Option<ChartSpec> {
        if data.slices.is_empty() || data.total <= 0.0 {
            return None;
        }
        let formatter = ValueFormatter::from_config(config);
        let composer = TooltipComposer::new(formatter, dark);
        let colors = resolve_colors(config, data.slices.len(), dark);

        let items: Vec<Value> = data
            .slices
            .iter()
            .zip(&colors)
            .map(|(slice, color)| {
                let share = format!("{}%", format_number(slice.value / data.total * 100.0, 1));
                let tooltip = composer.details(
                    &slice.name,
                    Some(color.as_str()),
                    &[("Value", formatter.tooltip(slice.value)), ("Share", share)],
                );
                json!({
                    "name": slice.name,
                    "value": slice.value,
                    "itemStyle": { "color": color },
                    "tooltip": { "formatter": tooltip },
                })
            })
            .collect();

        let legend = Legend::new(
            data.slices
                .iter()
                .zip(&colors)
                .map(|(s, c)| LegendItem::solid(s.name.as_str(), c.as_str()))
                .collect(),
        );
        let radius = if config.pie.donut {
            json!(["45%", "70%"])
        } else {
            json!([0, "70%"])
        };
        let option = json!({
            "backgroundColor": "transparent",
            "color": colors,
            "legend": legend.to_value(dark),
            "tooltip": item_tooltip(dark),
            "series": [{
                "type": "pie",
                "radius": radius,
                "center": ["50%", "55%"],
                "avoidLabelOverlap": true,
                "label": { "show": config.show_labels, "formatter": "{b}: {d}%" },
                "itemStyle": { "borderWidth": 1, "borderColor": if dark { "#111827" } else { "#ffffff" } },
                "data": items,
            }],
        });
        Some(ChartSpec::new(option))
    }
}
