// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge-style colors, line patterns and the legend/edge binding.
//!
//! An edge-style legend must filter edges without touching the node-category legend. The
//! renderer can only toggle whole series from a legend, so the style legend is backed by
//! empty proxy series, and the live edge list is re-supplied from [`EdgeStyleBinding`]
//! whenever the renderer reports a legend selection change.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use serde_json::{Map, Value, json};

use crate::legend::{Legend, LegendItem, LegendPlacement, LineType};
use crate::palette::resolve_from;

/// Color and pattern assigned to one edge-style value.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EdgeStyle {
    pub(crate) name: String,
    pub(crate) color: String,
    pub(crate) line_type: LineType,
}

/// Assigns colors and patterns to sorted style values.
pub(crate) fn resolve_styles(
    styles: &[&str],
    explicit: &[String],
    theme: &[String],
) -> Vec<EdgeStyle> {
    resolve_from(explicit, theme, styles.len())
        .into_iter()
        .zip(styles)
        .enumerate()
        .map(|(i, (color, name))| EdgeStyle {
            name: String::from(*name),
            color,
            line_type: LineType::nth(i),
        })
        .collect()
}

/// The style legend, placed below the plot.
pub(crate) fn style_legend(styles: &[EdgeStyle]) -> Legend {
    Legend::new(
        styles
            .iter()
            .map(|s| LegendItem::stroke(s.name.as_str(), s.color.as_str(), s.line_type))
            .collect(),
    )
    .with_placement(LegendPlacement::Bottom)
}

/// Empty series that exist only to carry style legend entries.
pub(crate) fn proxy_series(styles: &[EdgeStyle]) -> Vec<Value> {
    styles
        .iter()
        .map(|s| {
            json!({
                "name": s.name,
                "type": "graph",
                "silent": true,
                "data": [],
                "links": [],
                "itemStyle": { "color": s.color },
                "lineStyle": { "color": s.color, "type": s.line_type.as_str() },
            })
        })
        .collect()
}

/// Binds edge-style legend selection to the live edge series.
///
/// Wire the renderer's legend-selection-change event to
/// [`edges_for_selection`](Self::edges_for_selection) and replace the `links` of series
/// `edge_series_index` with the result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeStyleBinding {
    /// Index of the live edge series in `option.series`.
    pub edge_series_index: usize,
    /// Every edge, tagged with its style value.
    pub edges: Vec<(Option<String>, Value)>,
}

impl EdgeStyleBinding {
    /// Edges whose style is selected in `selection` (legend name → shown).
    ///
    /// Styles missing from `selection` count as shown, as do edges without a style.
    pub fn edges_for_selection(&self, selection: &Map<String, Value>) -> Vec<Value> {
        self.edges
            .iter()
            .filter(|(style, _)| {
                style
                    .as_ref()
                    .and_then(|s| selection.get(s))
                    .and_then(Value::as_bool)
                    .unwrap_or(true)
            })
            .map(|(_, edge)| edge.clone())
            .collect()
    }

    /// Style values in first-seen order.
    pub fn styles(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for s in self.edges.iter().filter_map(|(s, _)| s.as_deref()) {
            if !out.contains(&s) {
                out.push(s);
            }
        }
        out
    }
}
