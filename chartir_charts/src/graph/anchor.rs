// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary anchors for hub fan-out.
//!
//! Every edge leaving a hub is rerouted through its own pinned, invisible anchor placed at
//! `anchor_radius` from the hub, in the direction of the edge's target. Edges sharing a
//! target are spread by `anchor_angle_separation` around that direction, so a hub with
//! many parallel outgoing edges fans them out instead of drawing one thick bundle. Hubs are
//! pinned at their seed position since their anchors are.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use super::model::{GraphEdge, GraphNode};
use crate::config::GraphOptions;

/// A synthetic node standing in for a hub as the source of one edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Anchor {
    /// Hub node index.
    pub(crate) hub: usize,
    /// Rerouted edge index.
    pub(crate) edge: usize,
    /// Pinned position.
    pub(crate) position: Point,
}

/// Result of anchoring.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Anchoring {
    /// Anchors in creation order.
    pub(crate) anchors: Vec<Anchor>,
    /// Anchor index per edge, for rerouted edges.
    pub(crate) rerouted: Vec<Option<usize>>,
    /// Whether each node is a pinned hub.
    pub(crate) pinned: Vec<bool>,
}

/// Places anchors for every hub named in `options.boundary_anchor_sources`.
pub(crate) fn place_anchors(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    seeds: &[Point],
    options: &GraphOptions,
) -> Anchoring {
    let mut out = Anchoring {
        anchors: Vec::new(),
        rerouted: vec![None; edges.len()],
        pinned: vec![false; nodes.len()],
    };
    if options.boundary_anchor_sources.is_empty() {
        return out;
    }
    for (hub, node) in nodes.iter().enumerate() {
        if !options
            .boundary_anchor_sources
            .iter()
            .any(|label| node.is_labelled(label))
        {
            continue;
        }
        out.pinned[hub] = true;

        let mut outgoing: Vec<usize> = (0..edges.len())
            .filter(|&e| edges[e].source == hub && edges[e].target != hub)
            .collect();
        outgoing.sort_by(|&a, &b| {
            let (ea, eb) = (&edges[a], &edges[b]);
            nodes[ea.target]
                .id
                .cmp(&nodes[eb.target].id)
                .then_with(|| ea.style.cmp(&eb.style))
                .then(a.cmp(&b))
        });

        for lanes in outgoing.chunk_by(|&a, &b| edges[a].target == edges[b].target) {
            let toward = seeds[edges[lanes[0]].target] - seeds[hub];
            let unit = if toward.hypot() > 0.0 {
                toward.normalize()
            } else {
                Vec2::new(1.0, 0.0)
            };
            #[allow(clippy::cast_precision_loss, reason = "lane counts are small")]
            let mid = (lanes.len() - 1) as f64 / 2.0;
            for (lane, &edge) in lanes.iter().enumerate() {
                #[allow(clippy::cast_precision_loss, reason = "lane counts are small")]
                let turn = Vec2::from_angle((lane as f64 - mid) * options.anchor_angle_separation);
                let direction = Vec2::new(
                    unit.x * turn.x - unit.y * turn.y,
                    unit.x * turn.y + unit.y * turn.x,
                );
                out.rerouted[edge] = Some(out.anchors.len());
                out.anchors.push(Anchor {
                    hub,
                    edge,
                    position: seeds[hub] + direction * options.anchor_radius,
                });
            }
        }
    }
    log::trace!("network: placed {} boundary anchors", out.anchors.len());
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::String;

    use super::*;

    fn node(id: &str) -> GraphNode {
        GraphNode {
            id: String::from(id),
            name: String::from(id),
            category: None,
            value: 0.0,
            in_value: 0.0,
            out_value: 0.0,
            links: 0,
        }
    }

    fn edge(source: usize, target: usize, style: &str) -> GraphEdge {
        GraphEdge {
            source,
            target,
            style: Some(String::from(style)),
            value: 1.0,
            amount: None,
            count: None,
            date: None,
            token: None,
        }
    }

    fn hub_options() -> GraphOptions {
        GraphOptions {
            boundary_anchor_sources: vec![String::from("hub")],
            ..GraphOptions::default()
        }
    }

    #[test]
    fn anchors_fan_out_toward_targets() {
        let nodes = [node("hub"), node("a"), node("b")];
        let seeds = [Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(0.0, 100.0)];
        let edges = [edge(0, 1, "y"), edge(0, 2, "x"), edge(0, 1, "x"), edge(1, 0, "x")];
        let o = hub_options();
        let a = place_anchors(&nodes, &edges, &seeds, &o);

        assert_eq!(a.pinned, [true, false, false]);
        assert_eq!(a.anchors.len(), 3);
        assert_eq!(a.rerouted[3], None);
        // Ordered by target id, then style: a/x, a/y, b/x.
        let order: Vec<usize> = a.anchors.iter().map(|x| x.edge).collect();
        assert_eq!(order, [2, 0, 1]);
        for anchor in &a.anchors {
            assert!((anchor.position.distance(seeds[0]) - o.anchor_radius).abs() < 1e-9);
        }
        // Two lanes toward `a` straddle the x axis.
        assert!(a.anchors[0].position.y < 0.0 && a.anchors[1].position.y > 0.0);
        // The single lane toward `b` points straight at it.
        assert!(a.anchors[2].position.x.abs() < 1e-9);
    }

    #[test]
    fn no_hubs_no_anchors() {
        let nodes = [node("a"), node("b")];
        let seeds = [Point::ORIGIN, Point::new(1.0, 1.0)];
        let a = place_anchors(&nodes, &[edge(0, 1, "x")], &seeds, &GraphOptions::default());
        assert!(a.anchors.is_empty());
        assert_eq!(a.rerouted, [None]);
    }
}
