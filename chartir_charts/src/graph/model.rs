// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graph ingestion: rows into deduplicated nodes and merged edges.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chartir_core::{FieldCandidates, Row, label, number};
use hashbrown::HashMap;

use crate::ChartConfig;
use crate::axis::VALUE_FALLBACKS;
use crate::sankey::{SOURCE_FALLBACKS, TARGET_FALLBACKS};

const WEIGHT_FALLBACKS: &[&str] = &["weight", "value", "count", "total", "amount", "volume"];
const SOURCE_NAME_FALLBACKS: &[&str] = &["source_name", "sourceName", "from_name"];
const TARGET_NAME_FALLBACKS: &[&str] = &["target_name", "targetName", "to_name"];
const SOURCE_GROUP_FALLBACKS: &[&str] = &["source_group", "sourceGroup", "source_category"];
const TARGET_GROUP_FALLBACKS: &[&str] = &["target_group", "targetGroup", "target_category"];

/// A deduplicated node.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
    /// Identity.
    pub id: String,
    /// Display name; the id when no name field is present.
    pub name: String,
    /// Category, from the first row that names one.
    pub category: Option<String>,
    /// Sum of the weights of every edge touching the node.
    pub value: f64,
    /// Sum of incoming weights.
    pub in_value: f64,
    /// Sum of outgoing weights.
    pub out_value: f64,
    /// Number of merged edges touching the node.
    pub links: usize,
}

impl GraphNode {
    fn new(id: String) -> Self {
        Self {
            name: id.clone(),
            id,
            category: None,
            value: 0.0,
            in_value: 0.0,
            out_value: 0.0,
            links: 0,
        }
    }

    /// Returns `true` when `label` names this node by id or display name.
    pub fn is_labelled(&self, label: &str) -> bool {
        self.id == label || self.name == label
    }
}

/// A merged edge, keyed by `(source, target, style)`.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
    /// Index into [`GraphData::nodes`].
    pub source: usize,
    /// Index into [`GraphData::nodes`].
    pub target: usize,
    /// Edge-style value, when an edge-style field is configured.
    pub style: Option<String>,
    /// Summed weight; rows without a parseable weight count as zero.
    pub value: f64,
    /// Summed amount attribute.
    pub amount: Option<f64>,
    /// Summed transfer-count attribute.
    pub count: Option<f64>,
    /// Latest date attribute.
    pub date: Option<String>,
    /// First token attribute seen.
    pub token: Option<String>,
}

/// Nodes and edges in first-seen order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
    /// Nodes.
    pub nodes: Vec<GraphNode>,
    /// Edges.
    pub edges: Vec<GraphEdge>,
}

/// Resolved field names for one graph.
struct GraphFields<'r> {
    source: &'r str,
    target: &'r str,
    source_name: Option<&'r str>,
    target_name: Option<&'r str>,
    source_group: Option<&'r str>,
    target_group: Option<&'r str>,
    weight: Option<&'r str>,
    style: Option<&'r str>,
    date: Option<&'r str>,
    amount: Option<&'r str>,
    count: Option<&'r str>,
    token: Option<&'r str>,
}

impl<'r> GraphFields<'r> {
    fn resolve(rows: &[&'r Row], config: &ChartConfig) -> Option<Self> {
        let g = &config.graph;
        let optional = |preferred: &Option<String>, fallbacks: &'static [&'static str]| {
            FieldCandidates::new(preferred.as_deref(), fallbacks).resolve_in(rows)
        };
        let weight_pref = g.weight_field.as_deref().or(config.value_field.as_deref());
        let weight = FieldCandidates::new(weight_pref, WEIGHT_FALLBACKS)
            .resolve_in(rows)
            .or_else(|| FieldCandidates::new(None, VALUE_FALLBACKS).resolve_in(rows));
        Some(Self {
            source: optional(&g.source_field, SOURCE_FALLBACKS)?,
            target: optional(&g.target_field, TARGET_FALLBACKS)?,
            source_name: optional(&g.source_name_field, SOURCE_NAME_FALLBACKS),
            target_name: optional(&g.target_name_field, TARGET_NAME_FALLBACKS),
            source_group: optional(&g.source_group_field, SOURCE_GROUP_FALLBACKS),
            target_group: optional(&g.target_group_field, TARGET_GROUP_FALLBACKS),
            weight,
            style: optional(&g.edge_style_field, &[]),
            date: optional(&g.date_field, &[]),
            amount: optional(&g.amount_field, &[]),
            count: optional(&g.count_field, &[]),
            token: optional(&g.token_field, &[]),
        })
    }
}

fn text(row: &Row, field: Option<&str>) -> Option<String> {
    field
        .and_then(|f| row.get(f))
        .and_then(label)
        .filter(|s| !s.trim().is_empty())
}

fn add(total: &mut Option<f64>, value: Option<f64>) {
    if let Some(v) = value {
        *total = Some(total.unwrap_or(0.0) + v);
    }
}

impl GraphData {
    /// Builds the graph from rows.
    ///
    /// Rows without both a source and a target id are skipped.
    pub fn ingest(rows: &[&Row], config: &ChartConfig) -> Self {
        let mut graph = Self::default();
        let Some(fields) = GraphFields::resolve(rows, config) else {
            log::debug!("network: source/target fields not found");
            return graph;
        };

        let mut node_index: HashMap<String, usize> = HashMap::new();
        let mut edge_index: HashMap<(usize, usize, Option<String>), usize> = HashMap::new();
        for row in rows {
            let (Some(source), Some(target)) = (
                text(row, Some(fields.source)),
                text(row, Some(fields.target)),
            ) else {
                log::trace!("network: skipping row without source/target");
                continue;
            };
            let weight = fields
                .weight
                .and_then(|f| row.get(f))
                .and_then(number)
                .unwrap_or(0.0);

            let s = graph.intern(
                &mut node_index,
                source,
                text(row, fields.source_name),
                text(row, fields.source_group),
            );
            let t = graph.intern(
                &mut node_index,
                target,
                text(row, fields.target_name),
                text(row, fields.target_group),
            );

            let style = text(row, fields.style);
            let key = (s, t, style.clone());
            let e = match edge_index.get(&key) {
                Some(&e) => e,
                None => {
                    graph.edges.push(GraphEdge {
                        source: s,
                        target: t,
                        style,
                        value: 0.0,
                        amount: None,
                        count: None,
                        date: None,
                        token: None,
                    });
                    graph.nodes[s].links += 1;
                    if s != t {
                        graph.nodes[t].links += 1;
                    }
                    edge_index.insert(key, graph.edges.len() - 1);
                    graph.edges.len() - 1
                }
            };

            let edge = &mut graph.edges[e];
            edge.value += weight;
            add(&mut edge.amount, fields.amount.and_then(|f| row.get(f)).and_then(number));
            add(&mut edge.count, fields.count.and_then(|f| row.get(f)).and_then(number));
            if let Some(date) = text(row, fields.date)
                && edge.date.as_ref().is_none_or(|d| *d < date)
            {
                edge.date = Some(date);
            }
            if edge.token.is_none() {
                edge.token = text(row, fields.token);
            }

            graph.nodes[s].out_value += weight;
            graph.nodes[t].in_value += weight;
            graph.nodes[s].value += weight;
            if s != t {
                graph.nodes[t].value += weight;
            }
        }
        log::trace!(
            "network: {} nodes, {} edges from {} rows",
            graph.nodes.len(),
            graph.edges.len(),
            rows.len()
        );
        graph
    }

    fn intern(
        &mut self,
        index: &mut HashMap<String, usize>,
        id: String,
        name: Option<String>,
        category: Option<String>,
    ) -> usize {
        let i = match index.get(&id) {
            Some(&i) => i,
            None => {
                index.insert(id.clone(), self.nodes.len());
                self.nodes.push(GraphNode::new(id));
                self.nodes.len() - 1
            }
        };
        let node = &mut self.nodes[i];
        if let Some(name) = name.filter(|_| node.name == node.id) {
            node.name = name;
        }
        if node.category.is_none() {
            node.category = category;
        }
        i
    }

    /// Largest node value, or zero for an empty graph.
    pub fn max_node_value(&self) -> f64 {
        self.nodes.iter().map(|n| n.value).fold(0.0, f64::max)
    }

    /// Distinct node categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for c in self.nodes.iter().filter_map(|n| n.category.as_deref()) {
            if !out.contains(&c) {
                out.push(c);
            }
        }
        out
    }

    /// Distinct edge styles, sorted.
    pub fn styles(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.edges.iter().filter_map(|e| e.style.as_deref()).collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use serde_json::{Value, json};

    use super::*;

    fn rows(v: &Value) -> Vec<&Row> {
        v.as_array().unwrap().iter().filter_map(Value::as_object).collect()
    }

    #[test]
    fn identical_triples_merge() {
        let data = json!([
            {"source": "a", "target": "b", "kind": "swap", "value": 2, "amount": 10},
            {"source": "a", "target": "b", "kind": "swap", "value": 3, "amount": 5},
            {"source": "a", "target": "b", "kind": "bridge", "value": 1},
        ]);
        let config = ChartConfig::from_value(&json!({"edgeStyleField": "kind", "amountField": "amount"}));
        let g = GraphData::ingest(&rows(&data), &config);
        assert_eq!(g.nodes.len(), 2);
        assert_eq!(g.edges.len(), 2);
        assert_eq!(g.edges[0].value, 5.0);
        assert_eq!(g.edges[0].amount, Some(15.0));
        assert_eq!(g.edges[1].amount, None);
        assert_eq!(g.styles(), ["bridge", "swap"]);
    }

    #[test]
    fn node_flows_accumulate() {
        let data = json!([
            {"from": "a", "to": "b", "weight": 5},
            {"from": "b", "to": "a", "weight": 7},
            {"from": "b", "to": "c", "weight": "oops"},
            {"from": "", "to": "c", "weight": 1},
        ]);
        let g = GraphData::ingest(&rows(&data), &ChartConfig::default());
        let b = &g.nodes[1];
        assert_eq!((b.in_value, b.out_value, b.value), (5.0, 7.0, 12.0));
        assert_eq!(b.links, 3);
        assert_eq!(g.edges[2].value, 0.0);
        assert_eq!(g.edges.len(), 3);
    }

    #[test]
    fn names_and_groups_come_from_configured_fields() {
        let data = json!([
            {"src": "0x1", "dst": "0x2", "src_label": "Bridge", "src_kind": "contract", "value": 1},
        ]);
        let config = ChartConfig::from_value(&json!({
            "sourceField": "src", "targetField": "dst",
            "sourceNameField": "src_label", "sourceGroupField": "src_kind",
        }));
        let g = GraphData::ingest(&rows(&data), &config);
        assert_eq!(g.nodes[0].name, "Bridge");
        assert!(g.nodes[0].is_labelled("0x1"));
        assert_eq!(g.categories(), ["contract"]);
        assert_eq!(g.nodes[1].name, "0x2");
    }
}
