// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Network graphs.
//!
//! The graph compiler runs in stages:
//! 1. ingestion: rows into nodes (deduplicated by id) and edges (merged by
//!    `(source, target, style)`),
//! 2. node sizing, linear in each node's share of the largest node value,
//! 3. seed placement on a circle, pulled inward by link count,
//! 4. edge widths on a square-root scale,
//! 5. curvature separating parallel and anti-parallel edges,
//! 6. optional boundary anchors fanning out edges that leave hub nodes,
//! 7. category and edge-style legends.
//!
//! The output is a force-layout seed: the renderer runs the simulation.

extern crate alloc;

mod anchor;
mod curvature;
mod geometry;
mod model;
mod styles;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use chartir_core::{Row, Theme, css_color};
use serde_json::{Value, json};

use crate::ChartConfig;
use crate::axis::item_tooltip;
use crate::format::{ValueFormatter, format_number};
use crate::legend::{Legend, LegendItem};
use crate::palette::resolve_colors;
use crate::processor::{ChartKind, ChartProcessor, ChartSpec};
use crate::tooltip::TooltipComposer;

use anchor::place_anchors;
use curvature::edge_curvatures;
use geometry::{edge_widths, node_size, seed_positions};
pub use model::{GraphData, GraphEdge, GraphNode};
use styles::{proxy_series, resolve_styles, style_legend};
pub use styles::EdgeStyleBinding;

/// Network graph processor.
#[derive(Clone, Copy, Debug, Default)]
pub struct NetworkProcessor;

impl ChartProcessor for NetworkProcessor {
    type Processed = GraphData;

    fn kind(&self) -> ChartKind {
        ChartKind::Network
    }

    fn process_data(&self, rows: &[&Row], config: &ChartConfig) -> GraphData {
        GraphData::ingest(rows, config)
    }

    fn build(&self, graph: GraphData, config: &ChartConfig, dark: bool) -> Option<ChartSpec> {
        if graph.edges.is_empty() {
            return None;
        }
        let g = &config.graph;
        let theme = Theme::for_mode(dark);
        let formatter = ValueFormatter::from_config(config);
        let composer = TooltipComposer::new(formatter, dark);

        let categories = graph.categories();
        let colors = resolve_colors(config, categories.len().max(1), dark);
        let seeds = seed_positions(&graph.nodes, g);
        let max_value = graph.max_node_value();
        let weights: Vec<f64> = graph.edges.iter().map(|e| e.value).collect();
        let widths = edge_widths(&weights, g);
        let curvatures = edge_curvatures(&graph.edges, g);
        let anchoring = place_anchors(&graph.nodes, &graph.edges, &seeds, g);
        let theme_palette: &[String] = config
            .palette
            .as_ref()
            .map(|p| p.for_mode(dark))
            .unwrap_or_default();
        let styles = resolve_styles(&graph.styles(), &g.edge_style_colors, theme_palette);

        let mut nodes: Vec<Value> = graph
            .nodes
            .iter()
            .zip(&seeds)
            .enumerate()
            .map(|(i, (node, seed))| {
                let category = node
                    .category
                    .as_deref()
                    .and_then(|c| categories.iter().position(|k| *k == c));
                let color = &colors[category.unwrap_or(0)];
                let tooltip = composer.details(
                    &node.name,
                    Some(color.as_str()),
                    &[
                        ("Inflow", formatter.tooltip(node.in_value)),
                        ("Outflow", formatter.tooltip(node.out_value)),
                        ("Net", formatter.tooltip(node.in_value - node.out_value)),
                    ],
                );
                let mut out = json!({
                    "id": node.id,
                    "name": node.name,
                    "value": node.value,
                    "symbolSize": node_size(node.value, max_value, g),
                    "x": seed.x,
                    "y": seed.y,
                    "itemStyle": { "color": color },
                    "tooltip": { "formatter": tooltip },
                });
                if let Some(category) = category {
                    out["category"] = json!(category);
                }
                if anchoring.pinned[i] {
                    out["fixed"] = json!(true);
                }
                out
            })
            .collect();

        let anchor_id =
            |k: usize| format!("{}::anchor::{k}", graph.nodes[anchoring.anchors[k].hub].id);
        for (k, anchor) in anchoring.anchors.iter().enumerate() {
            nodes.push(json!({
                "id": anchor_id(k),
                "name": "",
                "symbolSize": 0,
                "x": anchor.position.x,
                "y": anchor.position.y,
                "fixed": true,
                "silent": true,
                "label": { "show": false },
                "tooltip": { "show": false },
            }));
        }

        let default_edge_color = css_color(theme.muted_text);
        let edges: Vec<(Option<String>, Value)> = graph
            .edges
            .iter()
            .enumerate()
            .map(|(e, edge)| {
                let style = edge
                    .style
                    .as_deref()
                    .and_then(|s| styles.iter().find(|st| st.name == s));
                let color = style.map_or(default_edge_color.as_str(), |s| s.color.as_str());
                let (source, curveness) = match anchoring.rerouted[e] {
                    Some(k) => (anchor_id(k), 0.0),
                    None => (graph.nodes[edge.source].id.clone(), curvatures[e]),
                };
                let title = format!(
                    "{} → {}",
                    graph.nodes[edge.source].name, graph.nodes[edge.target].name
                );
                let value = json!({
                    "source": source,
                    "target": graph.nodes[edge.target].id,
                    "value": edge.value,
                    "lineStyle": {
                        "width": widths[e],
                        "curveness": curveness,
                        "color": color,
                        "type": style.map_or("solid", |s| s.line_type.as_str()),
                        "opacity": 0.7,
                    },
                    "tooltip": {
                        "formatter": composer.details(&title, Some(color), &edge_lines(edge, formatter)),
                    },
                });
                (edge.style.clone(), value)
            })
            .collect();

        let category_legend = Legend::new(
            categories
                .iter()
                .zip(&colors)
                .map(|(name, color)| LegendItem::solid(*name, color.as_str()))
                .collect(),
        );
        let legend = if styles.is_empty() {
            category_legend.to_value(dark)
        } else {
            json!([category_legend.to_value(dark), style_legend(&styles).to_value(dark)])
        };

        let mut series = alloc::vec![json!({
            "type": "graph",
            "layout": "force",
            "roam": true,
            "draggable": true,
            "force": {
                "repulsion": if config.is_expanded { 260 } else { 180 },
                "edgeLength": [60, 180],
                "gravity": 0.08,
            },
            "edgeSymbol": ["none", "arrow"],
            "edgeSymbolSize": [0, 6],
            "categories": categories.iter().map(|c| json!({ "name": c })).collect::<Vec<_>>(),
            "label": {
                "show": config.show_labels,
                "position": "right",
                "color": css_color(theme.text),
                "fontSize": 11,
            },
            "emphasis": { "focus": "adjacency", "lineStyle": { "opacity": 1 } },
            "data": nodes,
            "links": edges.iter().map(|(_, v)| v.clone()).collect::<Vec<_>>(),
        })];
        series.extend(proxy_series(&styles));

        let option = json!({
            "backgroundColor": "transparent",
            "color": colors,
            "tooltip": item_tooltip(dark),
            "legend": legend,
            "series": series,
        });
        Some(ChartSpec {
            option,
            edge_styles: (!styles.is_empty()).then(|| EdgeStyleBinding {
                edge_series_index: 0,
                edges,
            }),
        })
    }
}

/// Tooltip lines for an edge: its weight plus whichever attributes it carries.
fn edge_lines(edge: &GraphEdge, formatter: ValueFormatter) -> Vec<(&'static str, String)> {
    let mut lines = alloc::vec![("Value", formatter.tooltip(edge.value))];
    if let Some(amount) = edge.amount {
        lines.push(("Amount", formatter.tooltip(amount)));
    }
    if let Some(count) = edge.count {
        lines.push(("Transfers", format_number(count, 0)));
    }
    if let Some(token) = &edge.token {
        lines.push(("Token", token.clone()));
    }
    if let Some(date) = &edge.date {
        lines.push(("Date", date.clone()));
    }
    lines
}

#[cfg(test)]
mod tests {
    extern crate std;

    use serde_json::Map;

    use super::*;

    fn links(spec: &ChartSpec) -> &Vec<Value> {
        spec.option["series"][0]["links"].as_array().unwrap()
    }

    #[test]
    fn anti_parallel_edges_bend_apart() {
        let data = json!([
            {"source": "A", "target": "B", "value": 5},
            {"source": "B", "target": "A", "value": 7},
        ]);
        let spec = NetworkProcessor.options(&data, &ChartConfig::default(), false);
        let l = links(&spec);
        assert_eq!(l.len(), 2);
        // Equal curvature in each edge's own direction puts them on opposite sides.
        assert_eq!(l[0]["lineStyle"]["curveness"], 0.15);
        assert_eq!(l[1]["lineStyle"]["curveness"], 0.15);
        let nodes = spec.option["series"][0]["data"].as_array().unwrap();
        assert_eq!(nodes[0]["value"], 12.0);
        assert!(nodes[0]["tooltip"]["formatter"].as_str().unwrap().contains("Net"));
    }

    #[test]
    fn sparse_first_row_is_skipped() {
        let data = json!([
            {"note": "partial"},
            {"source": "A", "target": "B", "value": 5},
            {"source": "B", "target": "A", "value": 7},
        ]);
        let spec = NetworkProcessor.options(&data, &ChartConfig::default(), false);
        assert!(!spec.is_empty());
        assert_eq!(links(&spec).len(), 2);
        assert_eq!(spec.option["series"][0]["data"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn duplicate_rows_merge_into_one_link() {
        let data = json!([
            {"source": "A", "target": "B", "value": 5},
            {"source": "A", "target": "B", "value": 7},
        ]);
        let spec = NetworkProcessor.options(&data, &ChartConfig::default(), false);
        let l = links(&spec);
        assert_eq!(l.len(), 1);
        assert_eq!(l[0]["value"], 12.0);
        assert_eq!(l[0]["lineStyle"]["curveness"], 0.0);
        assert!(spec.edge_styles.is_none());
    }

    #[test]
    fn edge_styles_get_a_second_legend_and_a_binding() {
        let data = json!([
            {"source": "A", "target": "B", "kind": "swap", "value": 1},
            {"source": "B", "target": "C", "kind": "bridge", "value": 1},
        ]);
        let config = ChartConfig::from_value(&json!({"edgeStyleField": "kind"}));
        let spec = NetworkProcessor.options(&data, &config, false);
        let series = spec.option["series"].as_array().unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[1]["name"], "bridge");
        assert_eq!(spec.option["legend"][1]["data"][1]["lineStyle"]["type"], "dashed");
        assert_eq!(links(&spec)[0]["lineStyle"]["type"], "dashed");

        let binding = spec.edge_styles.as_ref().unwrap();
        let mut selection = Map::new();
        selection.insert(String::from("bridge"), Value::Bool(false));
        let shown = binding.edges_for_selection(&selection);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0]["target"], "B");
    }

    #[test]
    fn hub_edges_leave_through_pinned_anchors() {
        let data = json!([
            {"source": "hub", "target": "a", "value": 1},
            {"source": "hub", "target": "b", "value": 1},
            {"source": "a", "target": "b", "value": 1},
        ]);
        let config = ChartConfig::from_value(&json!({"boundaryAnchorSources": ["hub"]}));
        let spec = NetworkProcessor.options(&data, &config, false);
        let nodes = spec.option["series"][0]["data"].as_array().unwrap();
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0]["fixed"], true);
        assert_eq!(nodes[3]["symbolSize"], 0);
        assert_eq!(nodes[3]["fixed"], true);
        let l = links(&spec);
        assert_eq!(l[0]["source"], "hub::anchor::0");
        assert_eq!(l[2]["source"], "a");
    }

    #[test]
    fn rows_without_endpoints_give_the_empty_spec() {
        let spec = NetworkProcessor.options(&json!([{"value": 1}]), &ChartConfig::default(), true);
        assert!(spec.is_empty());
    }
}
