// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sunburst charts from separator-delimited paths.
//!
//! Each row names one node by its full path (`l1/Bridges/xDAI`). Missing ancestors are
//! created on the way down, and every node's value is its own value plus its children's.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use chartir_core::{FieldCandidates, Row, Theme, css_color, label, number};
use hashbrown::HashMap;
use serde_json::{Value, json};

use crate::ChartConfig;
use crate::axis::{VALUE_FALLBACKS, item_tooltip};
use crate::format::{ValueFormatter, format_number};
use crate::palette::resolve_colors;
use crate::processor::{ChartKind, ChartProcessor, ChartSpec};
use crate::tooltip::TooltipComposer;

const PATH_FALLBACKS: &[&str] = &["path", "category", "label", "name"];
const DEFAULT_SEPARATOR: &str = "/";

/// One node of the hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct SunburstNode {
    /// Last path segment.
    pub name: String,
    /// Full path, joined with the separator.
    pub path: String,
    /// Own value plus the values of every descendant.
    pub value: f64,
    /// Child indices into [`SunburstData::nodes`], in first-seen order.
    pub children: Vec<usize>,
}

/// A forest stored as an arena.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SunburstData {
    /// Every node.
    pub nodes: Vec<SunburstNode>,
    /// Top-level node indices, in first-seen order.
    pub roots: Vec<usize>,
}

impl SunburstData {
    /// Adds `value` at `segments`, creating missing ancestors.
    fn insert(
        &mut self,
        index: &mut HashMap<String, usize>,
        segments: &[&str],
        separator: &str,
        value: f64,
    ) {
        let mut parent: Option<usize> = None;
        let mut path = String::new();
        for segment in segments {
            if !path.is_empty() {
                path.push_str(separator);
            }
            path.push_str(segment);
            let id = match index.get(&path) {
                Some(&id) => id,
                None => {
                    let id = self.nodes.len();
                    self.nodes.push(SunburstNode {
                        name: String::from(*segment),
                        path: path.clone(),
                        value: 0.0,
                        children: Vec::new(),
                    });
                    index.insert(path.clone(), id);
                    match parent {
                        Some(p) => self.nodes[p].children.push(id),
                        None => self.roots.push(id),
                    }
                    id
                }
            };
            self.nodes[id].value += value;
            parent = Some(id);
        }
    }

    fn to_value(
        &self,
        id: usize,
        parent_value: f64,
        color: Option<&str>,
        composer: &TooltipComposer,
        formatter: ValueFormatter,
    ) -> Value {
        let node = &self.nodes[id];
        let share = if parent_value > 0.0 {
            format!("{}%", format_number(node.value / parent_value * 100.0, 1))
        } else {
            String::from("-")
        };
        let tooltip = composer.details(
            &node.path,
            color,
            &[("Value", formatter.tooltip(node.value)), ("Share", share)],
        );
        let mut out = json!({
            "name": node.name,
            "value": node.value,
            "tooltip": { "formatter": tooltip },
        });
        if let Some(color) = color.filter(|_| self.roots.contains(&id)) {
            out["itemStyle"] = json!({ "color": color });
        }
        if !node.children.is_empty() {
            out["children"] = node
                .children
                .iter()
                .map(|&c| self.to_value(c, node.value, color, composer, formatter))
                .collect();
        }
        out
    }
}

/// Sunburst processor.
#[derive(Clone, Copy, Debug, Default)]
pub struct SunburstProcessor;

impl ChartProcessor for SunburstProcessor {
    type Processed = SunburstData;

    fn kind(&self) -> ChartKind {
        ChartKind::Sunburst
    }

    fn process_data(&self, rows: &[&Row], config: &ChartConfig) -> SunburstData {
        let mut data = SunburstData::default();
        let path_pref = config
            .sunburst
            .path_field
            .as_deref()
            .or(config.x_field.as_deref());
        let value_pref = config.value_field.as_deref().or(config.y_field.as_deref());
        let (Some(path_field), Some(value_field)) = (
            FieldCandidates::new(path_pref, PATH_FALLBACKS).resolve_in(rows),
            FieldCandidates::new(value_pref, VALUE_FALLBACKS).resolve_in(rows),
        ) else {
            return data;
        };
        let separator = config
            .sunburst
            .path_separator
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SEPARATOR);

        let mut index = HashMap::new();
        for row in rows {
            let Some(path) = row.get(path_field).and_then(label) else {
                continue;
            };
            let value = row.get(value_field).and_then(number).unwrap_or(0.0);
            if value <= 0.0 {
                continue;
            }
            let segments: Vec<&str> = path
                .split(separator)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if !segments.is_empty() {
                data.insert(&mut index, &segments, separator, value);
            }
        }
        data
    }

    fn build(&self, data: SunburstData, config: &ChartConfig, dark: bool) -> Option<ChartSpec> {
        if data.roots.is_empty() {
            return None;
        }
        let theme = Theme::for_mode(dark);
        let formatter = ValueFormatter::from_config(config);
        let composer = TooltipComposer::new(formatter, dark);
        let colors = resolve_colors(config, data.roots.len(), dark);
        let total: f64 = data.roots.iter().map(|&r| data.nodes[r].value).sum();

        let tree: Vec<Value> = data
            .roots
            .iter()
            .zip(&colors)
            .map(|(&r, color)| data.to_value(r, total, Some(color), &composer, formatter))
            .collect();

        let option = json!({
            "backgroundColor": "transparent",
            "color": colors,
            "tooltip": item_tooltip(dark),
            "series": [{
                "type": "sunburst",
                "radius": [0, if config.is_expanded { "92%" } else { "88%" }],
                "center": ["50%", "50%"],
                "sort": Value::Null,
                "emphasis": { "focus": "ancestor" },
                "itemStyle": { "borderWidth": 1, "borderColor": css_color(theme.split_line) },
                "label": { "show": config.show_labels, "rotate": "radial", "color": css_color(theme.text) },
                "data": tree,
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
    fn parents_sum_their_children() {
        let data = json!([
            {"path": "defi/dex", "value": 3},
            {"path": "defi/lending", "value": 2},
            {"path": "nft", "value": 4},
            {"path": "defi/dex/amm", "value": 1},
        ]);
        let s = SunburstProcessor.process_data(&rows(&data), &ChartConfig::default());
        let names: Vec<&str> = s.roots.iter().map(|&r| s.nodes[r].name.as_str()).collect();
        assert_eq!(names, ["defi", "nft"]);
        assert_eq!(s.nodes[s.roots[0]].value, 6.0);
        let dex = s.nodes[s.roots[0]].children[0];
        assert_eq!(s.nodes[dex].value, 4.0);
        assert_eq!(s.nodes[dex].path, "defi/dex");
    }

    #[test]
    fn custom_separator_and_nested_output() {
        let data = json!([{"route": "a > b", "value": 2}]);
        let config = ChartConfig::from_value(&json!({"pathField": "route", "pathSeparator": ">"}));
        let spec = SunburstProcessor.options(&data, &config, false);
        let root = &spec.option["series"][0]["data"][0];
        assert_eq!(root["name"], "a");
        assert_eq!(root["children"][0]["name"], "b");
        assert_eq!(root["children"][0]["value"], 2.0);
        assert!(root.get("itemStyle").is_some());
        assert!(root["children"][0].get("itemStyle").is_none());
    }
}
