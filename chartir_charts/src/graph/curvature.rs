// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Curvature for parallel and anti-parallel edges.
//!
//! Edges are grouped by unordered node pair, then by direction. Offsets are computed in the
//! pair's canonical frame (lower node index to higher): the forward group bends to the
//! positive side and the reverse group to the negative side, each spread into lanes
//! `sep` apart around its base. The renderer measures curvature relative to each edge's
//! own direction, so reverse edges have their canonical offset negated on output.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

use super::model::GraphEdge;
use crate::config::GraphOptions;

/// Edges of one pair in one direction, in lane order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DirectionGroup {
    /// `true` when edges run from the lower to the higher node index.
    pub(crate) forward: bool,
    /// Base offset in the canonical frame.
    pub(crate) base: f64,
    /// Edge indices, ordered by style then insertion.
    pub(crate) edges: SmallVec<[usize; 4]>,
}

/// Direction groups for every node pair, in first-seen pair order.
pub(crate) fn direction_groups(
    edges: &[GraphEdge],
    options: &GraphOptions,
) -> Vec<SmallVec<[DirectionGroup; 2]>> {
    let mut pairs: Vec<SmallVec<[DirectionGroup; 2]>> = Vec::new();
    let mut index: HashMap<(usize, usize), usize> = HashMap::new();
    for (i, edge) in edges.iter().enumerate() {
        let forward = edge.source <= edge.target;
        let key = if forward {
            (edge.source, edge.target)
        } else {
            (edge.target, edge.source)
        };
        let p = *index.entry(key).or_insert_with(|| {
            pairs.push(SmallVec::new());
            pairs.len() - 1
        });
        let groups = &mut pairs[p];
        match groups.iter_mut().find(|g| g.forward == forward) {
            Some(group) => group.edges.push(i),
            None => groups.push(DirectionGroup {
                forward,
                base: 0.0,
                edges: smallvec::smallvec![i],
            }),
        }
    }

    let sep = options.curve_separation;
    for groups in &mut pairs {
        // Forward first, so direction index 0 is always the positive side.
        groups.sort_by_key(|g| !g.forward);
        let both = groups.len() > 1;
        for (d, group) in groups.iter_mut().enumerate() {
            group
                .edges
                .sort_by(|a, b| edges[*a].style.cmp(&edges[*b].style).then(a.cmp(b)));
            if both {
                #[allow(clippy::cast_precision_loss, reason = "lane counts are small")]
                let half_span = (group.edges.len() - 1) as f64 * sep / 2.0;
                let sign = if d == 0 { 1.0 } else { -1.0 };
                group.base = sign * (options.direction_offset + half_span);
            }
        }
    }
    pairs
}

/// Curvature for every edge, in each edge's own direction.
pub(crate) fn edge_curvatures(edges: &[GraphEdge], options: &GraphOptions) -> Vec<f64> {
    let mut out = vec![0.0; edges.len()];
    let limit = options.max_curvature.abs();
    let sep = options.curve_separation;
    for groups in direction_groups(edges, options) {
        for group in groups {
            #[allow(clippy::cast_precision_loss, reason = "lane counts are small")]
            let mid = (group.edges.len() - 1) as f64 / 2.0;
            for (lane, &e) in group.edges.iter().enumerate() {
                #[allow(clippy::cast_precision_loss, reason = "lane counts are small")]
                let offset = group.base + (lane as f64 - mid) * sep;
                let canonical = offset.clamp(-limit, limit);
                out[e] = if group.forward { canonical } else { -canonical };
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::String;

    use super::*;

    fn edge(source: usize, target: usize, style: Option<&str>) -> GraphEdge {
        GraphEdge {
            source,
            target,
            style: style.map(String::from),
            value: 1.0,
            amount: None,
            count: None,
            date: None,
            token: None,
        }
    }

    #[test]
    fn opposite_directions_get_opposite_bases() {
        let edges = [edge(0, 1, None), edge(1, 0, None)];
        let groups = direction_groups(&edges, &GraphOptions::default());
        assert_eq!(groups.len(), 1);
        let [a, b] = [&groups[0][0], &groups[0][1]];
        assert!(a.base > 0.0 && b.base < 0.0);
        assert_eq!(a.base, -b.base);
    }

    #[test]
    fn reverse_group_comes_second_regardless_of_arrival() {
        let edges = [edge(1, 0, None), edge(0, 1, None)];
        let groups = direction_groups(&edges, &GraphOptions::default());
        assert!(groups[0][0].forward);
        assert!(groups[0][0].base > 0.0);
        let c = edge_curvatures(&edges, &GraphOptions::default());
        assert_eq!(c, [0.15, 0.15]);
    }

    #[test]
    fn parallel_lanes_are_symmetric() {
        let edges = [
            edge(0, 1, Some("c")),
            edge(0, 1, Some("a")),
            edge(0, 1, Some("b")),
        ];
        let c = edge_curvatures(&edges, &GraphOptions::default());
        assert!((c[1] + 0.15).abs() < 1e-12);
        assert!(c[2].abs() < 1e-12);
        assert!((c[0] - 0.15).abs() < 1e-12);
    }

    #[test]
    fn curvature_is_clamped() {
        let edges: Vec<GraphEdge> = (0..12).map(|_| edge(0, 1, None)).collect();
        let mut with_reverse = edges.clone();
        with_reverse.push(edge(1, 0, None));
        let o = GraphOptions::default();
        for c in edge_curvatures(&with_reverse, &o) {
            assert!(c.abs() <= o.max_curvature);
        }
    }

    #[test]
    fn single_edges_are_straight() {
        let c = edge_curvatures(&[edge(0, 1, None), edge(1, 2, None)], &GraphOptions::default());
        assert_eq!(c, [0.0, 0.0]);
    }
}
