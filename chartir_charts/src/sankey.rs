// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sankey flow diagrams.
//!
//! The layered layout needs an acyclic graph, so self-loops and links that would close a
//! cycle are dropped. A single depth-first pass visits nodes in first-seen order and each
//! node's links in arrival order; the links it finds pointing back into the current path
//! are the ones dropped.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use chartir_core::{FieldCandidates, Row, Theme, css_color, label, number};
use hashbrown::HashMap;
use serde_json::{Value, json};

use crate::ChartConfig;
use crate::axis::{VALUE_FALLBACKS, item_tooltip};
use crate::format::ValueFormatter;
use crate::palette::resolve_colors;
use crate::processor::{ChartKind, ChartProcessor, ChartSpec};
use crate::tooltip::TooltipComposer;

pub(crate) const SOURCE_FALLBACKS: &[&str] = &["source", "from", "sender", "origin"];
pub(crate) const TARGET_FALLBACKS: &[&str] = &["target", "to", "receiver", "destination"];

/// One aggregated flow.
#[derive(Clone, Debug, PartialEq)]
pub struct SankeyLink {
    /// Index into [`SankeyData::nodes`].
    pub source: usize,
    /// Index into [`SankeyData::nodes`].
    pub target: usize,
    /// Summed weight.
    pub value: f64,
}

/// Acyclic flows between named nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SankeyData {
    /// Node names in first-seen order.
    pub nodes: Vec<String>,
    /// Links in first-seen order.
    pub links: Vec<SankeyLink>,
    /// Links dropped as self-loops or cycle closers.
    pub dropped: usize,
}

impl SankeyData {
    /// `(inflow, outflow)` per node.
    fn flows(&self) -> Vec<(f64, f64)> {
        let mut flows = vec![(0.0, 0.0); self.nodes.len()];
        for l in &self.links {
            flows[l.target].0 += l.value;
            flows[l.source].1 += l.value;
        }
        flows
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Visit {
    New,
    OnPath,
    Done,
}

/// Flags every link of `pairs` that points back into the depth-first path.
///
/// Runs in `O(nodes + links)`. Removing the flagged links leaves the graph acyclic.
fn back_links(node_count: usize, pairs: &[(usize, usize, f64)]) -> Vec<bool> {
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for (i, &(s, _, _)) in pairs.iter().enumerate() {
        outgoing[s].push(i);
    }
    let mut visit = vec![Visit::New; node_count];
    let mut back = vec![false; pairs.len()];
    // (node, position of the next outgoing link to follow)
    let mut path: Vec<(usize, usize)> = Vec::new();
    for root in 0..node_count {
        if visit[root] != Visit::New {
            continue;
        }
        visit[root] = Visit::OnPath;
        path.push((root, 0));
        while let Some(top) = path.last_mut() {
            let (node, next) = *top;
            let Some(&link) = outgoing[node].get(next) else {
                visit[node] = Visit::Done;
                path.pop();
                continue;
            };
            top.1 += 1;
            let target = pairs[link].1;
            match visit[target] {
                Visit::OnPath => back[link] = true,
                Visit::New => {
                    visit[target] = Visit::OnPath;
                    path.push((target, 0));
                }
                Visit::Done => {}
            }
        }
    }
    back
}

/// Sankey processor.
#[derive(Clone, Copy, Debug, Default)]
pub struct SankeyProcessor;

impl ChartProcessor for SankeyProcessor {
    type Processed = SankeyData;

    fn kind(&self) -> ChartKind {
        ChartKind::Sankey
    }

    fn process_data(&self, rows: &[&Row], config: &ChartConfig) -> SankeyData {
        let g = &config.graph;
        let value_pref = config
            .value_field
            .as_deref()
            .or(g.weight_field.as_deref());
        let (Some(source), Some(target)) = (
            FieldCandidates::new(g.source_field.as_deref(), SOURCE_FALLBACKS).resolve_in(rows),
            FieldCandidates::new(g.target_field.as_deref(), TARGET_FALLBACKS).resolve_in(rows),
        ) else {
            return SankeyData::default();
        };
        let value = FieldCandidates::new(value_pref, VALUE_FALLBACKS).resolve_in(rows);

        // Aggregate by (source, target) in first-seen order.
        let mut names: Vec<String> = Vec::new();
        let mut node_index: HashMap<String, usize> = HashMap::new();
        let mut pairs: Vec<(usize, usize, f64)> = Vec::new();
        let mut pair_index: HashMap<(usize, usize), usize> = HashMap::new();
        for row in rows {
            let (Some(s), Some(t)) = (
                row.get(source).and_then(label),
                row.get(target).and_then(label),
            ) else {
                continue;
            };
            let weight = value
                .and_then(|f| row.get(f))
                .and_then(number)
                .unwrap_or(0.0);
            let mut intern = |name: String| {
                *node_index.entry(name.clone()).or_insert_with(|| {
                    names.push(name);
                    names.len() - 1
                })
            };
            let (si, ti) = (intern(s), intern(t));
            let pi = *pair_index.entry((si, ti)).or_insert_with(|| {
                pairs.push((si, ti, 0.0));
                pairs.len() - 1
            });
            pairs[pi].2 += weight;
        }

        pairs.retain(|&(_, _, value)| value > 0.0);
        let back = back_links(names.len(), &pairs);
        let mut links = Vec::new();
        let mut dropped = 0;
        for ((s, t, value), closes_cycle) in pairs.into_iter().zip(back) {
            if closes_cycle {
                log::warn!(
                    "sankey: dropping link {} -> {} that would form a cycle",
                    names[s],
                    names[t]
                );
                dropped += 1;
                continue;
            }
            links.push(SankeyLink {
                source: s,
                target: t,
                value,
            });
        }

        // Keep only nodes that still carry a link.
        let mut used = vec![false; names.len()];
        for l in &links {
            used[l.source] = true;
            used[l.target] = true;
        }
        let mut remap = vec![usize::MAX; names.len()];
        let mut nodes = Vec::new();
        for (i, name) in names.into_iter().enumerate() {
            if used[i] {
                remap[i] = nodes.len();
                nodes.push(name);
            }
        }
        for l in &mut links {
            l.source = remap[l.source];
            l.target = remap[l.target];
        }
        SankeyData {
            nodes,
            links,
            dropped,
        }
    }

    fn build(&self, data: SankeyData, config: &ChartConfig, dark: bool) -> Option<ChartSpec> {
        if data.links.is_empty() {
            return None;
        }
        let theme = Theme::for_mode(dark);
        let formatter = ValueFormatter::from_config(config);
        let composer = TooltipComposer::new(formatter, dark);
        let colors = resolve_colors(config, data.nodes.len(), dark);
        let flows = data.flows();

        let nodes: Vec<Value> = data
            .nodes
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let (inflow, outflow) = flows[i];
                let tooltip = composer.details(
                    name,
                    Some(colors[i].as_str()),
                    &[
                        ("Inflow", formatter.tooltip(inflow)),
                        ("Outflow", formatter.tooltip(outflow)),
                    ],
                );
                json!({
                    "name": name,
                    "itemStyle": { "color": colors[i] },
                    "tooltip": { "formatter": tooltip },
                })
            })
            .collect();

        let links: Vec<Value> = data
            .links
            .iter()
            .map(|l| {
                let (s, t) = (&data.nodes[l.source], &data.nodes[l.target]);
                let title = alloc::format!("{s} → {t}");
                json!({
                    "source": s,
                    "target": t,
                    "value": l.value,
                    "tooltip": {
                        "formatter": composer.details(&title, None, &[("Value", formatter.tooltip(l.value))]),
                    },
                })
            })
            .collect();

        let option = json!({
            "backgroundColor": "transparent",
            "tooltip": item_tooltip(dark),
            "series": [{
                "type": "sankey",
                "left": 8,
                "right": if config.is_expanded { 120 } else { 80 },
                "top": 16,
                "bottom": 16,
                "nodeGap": 10,
                "nodeWidth": 14,
                "draggable": false,
                "emphasis": { "focus": "adjacency" },
                "label": { "color": css_color(theme.text), "fontSize": 11 },
                "lineStyle": { "color": "gradient", "opacity": 0.35, "curveness": 0.5 },
                "data": nodes,
                "links": links,
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
    fn links_aggregate_per_pair() {
        let data = json!([
            {"source": "a", "target": "b", "value": 2},
            {"source": "a", "target": "b", "value": "3"},
            {"source": "b", "target": "c", "value": 1},
        ]);
        let s = SankeyProcessor.process_data(&rows(&data), &ChartConfig::default());
        assert_eq!(s.nodes, ["a", "b", "c"]);
        assert_eq!(
            s.links[0],
            SankeyLink {
                source: 0,
                target: 1,
                value: 5.0
            }
        );
        assert_eq!(s.dropped, 0);
    }

    #[test]
    fn self_loops_and_cycle_closers_are_dropped() {
        let data = json!([
            {"from": "a", "to": "b", "value": 1},
            {"from": "b", "to": "c", "value": 1},
            {"from": "c", "to": "a", "value": 1},
            {"from": "d", "to": "d", "value": 1},
        ]);
        let s = SankeyProcessor.process_data(&rows(&data), &ChartConfig::default());
        assert_eq!(s.links.len(), 2);
        assert_eq!(s.dropped, 2);
        assert_eq!(s.nodes, ["a", "b", "c"]);
    }

    #[test]
    fn converging_paths_are_not_cycles() {
        let data = json!([
            {"source": "a", "target": "b", "value": 1},
            {"source": "a", "target": "c", "value": 1},
            {"source": "b", "target": "d", "value": 1},
            {"source": "c", "target": "d", "value": 1},
            {"source": "d", "target": "b", "value": 1},
        ]);
        let s = SankeyProcessor.process_data(&rows(&data), &ChartConfig::default());
        assert_eq!(s.links.len(), 4);
        assert_eq!(s.dropped, 1);
        assert!(!s.links.iter().any(|l| s.nodes[l.source] == "d"));
        let flows = s.flows();
        assert_eq!(flows[3], (2.0, 0.0));
        assert_eq!(flows[0], (0.0, 2.0));
    }

    #[test]
    fn sparse_first_row_is_skipped() {
        let data = json!([
            {"note": "partial"},
            {"source": "a", "target": "b", "value": 2},
        ]);
        let s = SankeyProcessor.process_data(&rows(&data), &ChartConfig::default());
        assert_eq!(s.nodes, ["a", "b"]);
        assert_eq!(s.links.len(), 1);
    }

    #[test]
    fn node_tooltips_show_flows() {
        let data = json!([{"source": "a", "target": "b", "value": 1500}]);
        let spec = SankeyProcessor.options(&data, &ChartConfig::default(), false);
        let a = spec.option["series"][0]["data"][0]["tooltip"]["formatter"]
            .as_str()
            .unwrap();
        assert!(a.contains("Outflow") && a.contains("1,500"));
        assert_eq!(spec.option["series"][0]["links"][0]["value"], 1500.0);
    }
}
