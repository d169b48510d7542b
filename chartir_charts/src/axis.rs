// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared lowering for category-axis charts.
//!
//! Bar, line, area and radar charts read the same shape: a category field, a value field
//! and an optional series field pivoted into a dense table. This module resolves those
//! fields, pivots and time-sorts the rows, and builds the axis, tooltip, legend and zoom
//! fragments every category-axis option shares.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chartir_core::{FieldCandidates, Row, Theme, css_color, label, number};
use chartir_transforms::{
    Extent, Pivot, PivotFields, TimeAnalysis, analyze_time, parse_timestamp,
};
use hashbrown::HashMap;
use serde_json::{Value, json};

use crate::ChartConfig;
use crate::format::{ValueFormatter, category_label};
use crate::layout::{LayoutPolicy, ZoomAxis};
use crate::legend::{Legend, LegendItem};
use crate::scale::nice_ticks;
use crate::tooltip::{TooltipComposer, TooltipEntry};

/// Conventional names for the category field.
pub(crate) const CATEGORY_FALLBACKS: &[&str] = &[
    "date", "day", "week", "month", "time", "timestamp", "period", "category", "label", "name",
];

/// Conventional names for the value field.
pub(crate) const VALUE_FALLBACKS: &[&str] = &["value", "count", "total", "amount", "volume"];

/// Conventional names for the series field.
pub(crate) const SERIES_FALLBACKS: &[&str] = &[];

/// Target number of value-axis intervals.
const VALUE_TICKS: usize = 5;

/// Field names resolved across the records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AxisFields {
    /// Category field.
    pub category: String,
    /// Value field.
    pub value: String,
    /// Series field, when configured and present.
    pub series: Option<String>,
}

impl AxisFields {
    /// Resolves fields for `config` against `rows`, which need not share one shape.
    ///
    /// The value field falls back to the first numeric column that is not the category or
    /// series field. Returns `None` when no category or value field can be found.
    pub fn resolve(rows: &[&Row], config: &ChartConfig) -> Option<Self> {
        let category =
            FieldCandidates::new(config.x_field.as_deref(), CATEGORY_FALLBACKS).resolve_in(rows)?;
        let series = FieldCandidates::new(config.series_field.as_deref(), SERIES_FALLBACKS)
            .resolve_in(rows)
            .filter(|s| *s != category);
        let value = FieldCandidates::new(config.y_field.as_deref(), VALUE_FALLBACKS)
            .resolve_in(rows)
            .or_else(|| {
                rows.iter().find_map(|&row| {
                    row.iter()
                        .find(|(key, value)| {
                            key.as_str() != category
                                && Some(key.as_str()) != series
                                && number(value).is_some()
                        })
                        .map(|(key, _)| key.as_str())
                })
            })?;
        Some(Self {
            category: String::from(category),
            value: String::from(value),
            series: series.map(String::from),
        })
    }
}

/// Pivoted, time-aware data for a category-axis chart.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisData {
    /// Fields the pivot was built from.
    pub fields: AxisFields,
    /// The category × series table.
    pub pivot: Pivot,
    /// Time analysis of the category axis.
    pub time: TimeAnalysis,
    /// Axis labels, aligned with `pivot.categories`.
    pub labels: Vec<String>,
    /// Tooltip titles, aligned with `pivot.categories`.
    pub titles: Vec<String>,
}

impl AxisData {
    /// Pivots `rows` under `config`.
    ///
    /// Time-series categories are sorted chronologically and labelled by granularity;
    /// other categories keep first-seen order. Returns `None` when nothing is plottable.
    pub fn from_rows(rows: &[&Row], config: &ChartConfig) -> Option<Self> {
        let fields = AxisFields::resolve(rows, config)?;
        let mut pivot = Pivot::build(
            rows,
            PivotFields {
                category: &fields.category,
                value: &fields.value,
                series: fields.series.as_deref(),
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
        let labels = label_categories(&pivot, &time, false);
        let titles = label_categories(&pivot, &time, true);
        log::trace!(
            "pivoted {} rows into {} categories x {} series ({:?})",
            rows.len(),
            pivot.categories.len(),
            pivot.series.len(),
            time.granularity
        );
        Some(Self {
            fields,
            pivot,
            time,
            labels,
            titles,
        })
    }

    /// One tooltip per category listing every series.
    ///
    /// Stacked multi-series charts order entries by value and add a total row.
    pub fn axis_tooltips(
        &self,
        colors: &[String],
        formatter: ValueFormatter,
        stacked: bool,
        dark: bool,
    ) -> Vec<String> {
        let multi = stacked && self.pivot.series.len() > 1;
        let composer = TooltipComposer::new(formatter, dark)
            .with_sorting(multi)
            .with_total(multi);
        self.titles
            .iter()
            .enumerate()
            .map(|(ci, title)| {
                let entries: Vec<TooltipEntry> = self
                    .pivot
                    .series
                    .iter()
                    .enumerate()
                    .map(|(si, name)| {
                        let color = colors.get(si).cloned();
                        TooltipEntry::new(name.as_str(), color, self.pivot.cells[si][ci])
                    })
                    .collect();
                composer.compose(title, &entries)
            })
            .collect()
    }

    /// Extent the value axis must cover.
    pub fn value_extent(&self, stacked: bool, include_zero: bool) -> Option<Extent> {
        let extent = if stacked {
            let categories = 0..self.pivot.categories.len();
            let sums = categories.flat_map(|ci| {
                let (mut pos, mut neg) = (0.0, 0.0);
                for v in self.pivot.cells.iter().filter_map(|s| s[ci]) {
                    if v >= 0.0 {
                        pos += v;
                    } else {
                        neg += v;
                    }
                }
                [pos, neg]
            });
            Extent::of(sums)
        } else {
            Extent::of(self.pivot.cells.iter().flatten().flatten().copied())
        };
        let extent = extent?;
        Some(if include_zero {
            Extent {
                min: extent.min.min(0.0),
                max: extent.max.max(0.0),
            }
        } else {
            extent
        })
    }

    /// Series values as option data; gaps are `null`.
    pub fn series_data(&self, series: usize) -> Vec<Value> {
        self.pivot.cells[series]
            .iter()
            .map(|v| v.map_or(Value::Null, |v| json!(v)))
            .collect()
    }

    /// Series values with each point carrying its own formatted label.
    ///
    /// Without `show_labels` this is [`series_data`](Self::series_data).
    pub fn labelled_series_data(
        &self,
        series: usize,
        formatter: ValueFormatter,
        show_labels: bool,
    ) -> Vec<Value> {
        if !show_labels {
            return self.series_data(series);
        }
        self.pivot.cells[series]
            .iter()
            .map(|v| match v {
                Some(v) => json!({ "value": v, "label": { "formatter": formatter.axis(*v) } }),
                None => Value::Null,
            })
            .collect()
    }

    /// The category axis.
    pub fn category_axis(&self, boundary_gap: bool, dark: bool) -> Value {
        category_axis(&self.labels, boundary_gap, dark)
    }
}

/// A themed category axis over `labels`.
pub(crate) fn category_axis(labels: &[String], boundary_gap: bool, dark: bool) -> Value {
    let theme = Theme::for_mode(dark);
    json!({
        "type": "category",
        "data": labels,
        "boundaryGap": boundary_gap,
        "axisLine": { "lineStyle": { "color": css_color(theme.axis_line) } },
        "axisTick": { "show": false },
        "axisLabel": { "color": css_color(theme.muted_text), "hideOverlap": true },
    })
}

/// First-seen category keys for processors that do not pivot.
#[derive(Clone, Debug, Default)]
pub(crate) struct CategoryIndex {
    names: Vec<String>,
    raw: Vec<Value>,
    index: HashMap<String, usize>,
}

impl CategoryIndex {
    /// Index of the category labelled by `raw`, inserting it on first sight.
    pub(crate) fn insert(&mut self, raw: &Value) -> Option<usize> {
        let name = label(raw)?;
        let names = &mut self.names;
        let values = &mut self.raw;
        Some(*self.index.entry(name.clone()).or_insert_with(|| {
            names.push(name);
            values.push(raw.clone());
            names.len() - 1
        }))
    }

    /// Analyzes the categories as a time axis and fixes their display order.
    pub(crate) fn into_axis(self) -> CategoryAxis {
        let time = analyze_time(&self.raw);
        let mut order: Vec<usize> = (0..self.names.len()).collect();
        if time.is_time_series {
            let keys: Vec<Option<i64>> = self
                .raw
                .iter()
                .map(|v| parse_timestamp(v).map(|t| t.timestamp_millis()))
                .collect();
            order.sort_by_key(|&i| (keys[i].is_none(), keys[i].unwrap_or(0)));
        }
        let label_at = |i: usize, for_tooltip: bool| {
            category_label(&self.raw[i], &self.names[i], &time, for_tooltip)
        };
        let labels = order.iter().map(|&i| label_at(i, false)).collect();
        let titles = order.iter().map(|&i| label_at(i, true)).collect();
        CategoryAxis {
            order,
            labels,
            titles,
        }
    }
}

/// Display order and labels of a category axis.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CategoryAxis {
    /// Insertion indices in display order.
    pub(crate) order: Vec<usize>,
    /// Axis labels in display order.
    pub(crate) labels: Vec<String>,
    /// Tooltip titles in display order.
    pub(crate) titles: Vec<String>,
}

/// Axis or tooltip labels for the pivot's categories.
pub(crate) fn label_categories(pivot: &Pivot, time: &TimeAnalysis, for_tooltip: bool) -> Vec<String> {
    pivot
        .category_values
        .iter()
        .zip(&pivot.categories)
        .map(|(raw, fallback)| category_label(raw, fallback, time, for_tooltip))
        .collect()
}

/// A value axis with precomputed labels.
///
/// The axis range is snapped to round ticks; `axisLabel.customValues` lists the ticks and
/// `axisLabel.labels` the formatted label for each.
pub(crate) fn value_axis(extent: Option<Extent>, formatter: ValueFormatter, dark: bool) -> Value {
    let theme = Theme::for_mode(dark);
    let ticks = extent.map_or_else(Vec::new, |e| nice_ticks(e.min, e.max, VALUE_TICKS));
    let labels: Vec<String> = ticks.iter().map(|t| formatter.axis(*t)).collect();
    let mut axis = json!({
        "type": "value",
        "axisLine": { "show": false },
        "splitLine": { "lineStyle": { "color": css_color(theme.split_line) } },
        "axisLabel": {
            "color": css_color(theme.muted_text),
            "customValues": ticks,
            "labels": labels,
        },
    });
    if let (Some(first), Some(last)) = (ticks.first(), ticks.last()) {
        axis["min"] = json!(first);
        axis["max"] = json!(last);
    }
    axis
}

/// Themed tooltip block for an axis-triggered chart.
pub(crate) fn axis_tooltip(axis_content: Vec<String>, shadow: bool, dark: bool) -> Value {
    let mut tooltip = item_tooltip(dark);
    tooltip["trigger"] = json!("axis");
    tooltip["axisPointer"] = json!({ "type": if shadow { "shadow" } else { "line" } });
    tooltip["axisContent"] = json!(axis_content);
    tooltip
}

/// Themed tooltip block for an item-triggered chart.
pub(crate) fn item_tooltip(dark: bool) -> Value {
    let theme = Theme::for_mode(dark);
    json!({
        "trigger": "item",
        "confine": true,
        "backgroundColor": css_color(theme.tooltip_background),
        "borderColor": css_color(theme.tooltip_border),
        "textStyle": { "color": css_color(theme.text) },
    })
}

/// Series legend; hidden for single-series charts.
pub(crate) fn series_legend(names: &[String], colors: &[String]) -> Legend {
    if names.len() < 2 {
        return Legend::default();
    }
    Legend::new(
        names
            .iter()
            .zip(colors)
            .map(|(name, color)| LegendItem::solid(name.as_str(), color.as_str()))
            .collect(),
    )
}

/// Assembles a category-axis option.
pub(crate) struct AxisFrame<'a> {
    pub(crate) data: &'a AxisData,
    pub(crate) config: &'a ChartConfig,
    pub(crate) colors: &'a [String],
    pub(crate) series: Vec<Value>,
    pub(crate) value_axis: Value,
    pub(crate) boundary_gap: bool,
    pub(crate) shadow_pointer: bool,
    pub(crate) horizontal: bool,
}

impl AxisFrame<'_> {
    pub(crate) fn into_option(self, dark: bool) -> Value {
        let formatter = ValueFormatter::from_config(self.config);
        let legend = series_legend(&self.data.pivot.series, self.colors);
        let layout = LayoutPolicy::from_config(self.config, !legend.items.is_empty());
        let category_axis = self.data.category_axis(self.boundary_gap, dark);
        let (x_axis, y_axis, zoom_axis) = if self.horizontal {
            (self.value_axis, category_axis, ZoomAxis::Y)
        } else {
            (category_axis, self.value_axis, ZoomAxis::X)
        };
        let tooltips = self
            .data
            .axis_tooltips(self.colors, formatter, self.config.stacked, dark);
        json!({
            "backgroundColor": "transparent",
            "color": self.colors,
            "grid": layout.grid_value(),
            "legend": legend.to_value(dark),
            "tooltip": axis_tooltip(tooltips, self.shadow_pointer, dark),
            "xAxis": x_axis,
            "yAxis": y_axis,
            "dataZoom": layout.data_zoom(dark, zoom_axis),
            "series": self.series,
        })
    }
}
