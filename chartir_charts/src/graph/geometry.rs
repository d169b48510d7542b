// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node sizes, seed positions and edge widths.

extern crate alloc;

use alloc::vec::Vec;

use chartir_transforms::{Extent, percentile, sorted_finite};
use core::f64::consts::TAU;
use kurbo::{Point, Vec2};

use super::model::GraphNode;
use crate::config::{EdgeWidthNormalization, GraphOptions};
use crate::scale::{ScaleLinear, ScaleSqrt};

/// Center of the seed circle, in renderer coordinates.
pub(crate) const SEED_CENTER: Point = Point::ORIGIN;

/// Percentile edge weights are normalized against by default.
const EDGE_WIDTH_PERCENTILE: f64 = 90.0;

/// Symbol size for a node, linear in its share of the largest node value.
pub(crate) fn node_size(value: f64, max_value: f64, options: &GraphOptions) -> f64 {
    ScaleLinear::new(
        (0.0, max_value),
        (options.min_node_size, options.max_node_size),
    )
    .map(value)
}

/// Initial positions for the renderer's force layout.
///
/// Nodes sit evenly on a circle of `seed_radius`, then move toward the center by
/// `seed_centrality_blend × min(links / seed_centrality_cap, 1)` of the radius, so the
/// best-connected nodes start nearest the middle.
pub(crate) fn seed_positions(nodes: &[GraphNode], options: &GraphOptions) -> Vec<Point> {
    #[allow(clippy::cast_precision_loss, reason = "node counts are small")]
    let n = nodes.len() as f64;
    let blend = options.seed_centrality_blend.clamp(0.0, 1.0);
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            #[allow(clippy::cast_precision_loss, reason = "node counts are small")]
            let (index, links) = (i as f64, node.links as f64);
            let on_circle = SEED_CENTER + Vec2::from_angle(TAU * index / n) * options.seed_radius;
            let centrality = if options.seed_centrality_cap > 0.0 {
                (links / options.seed_centrality_cap).min(1.0)
            } else {
                0.0
            };
            on_circle.lerp(SEED_CENTER, blend * centrality)
        })
        .collect()
}

/// Stroke width per edge weight.
///
/// Widths follow a square-root scale so stroke area tracks weight. In the default mode the
/// domain is `0..=p90`, and heavier edges saturate at the maximum width; otherwise the
/// domain is the true weight extent.
pub(crate) fn edge_widths(weights: &[f64], options: &GraphOptions) -> Vec<f64> {
    let range = (options.min_edge_width, options.max_edge_width);
    let domain = match options.edge_width_normalization() {
        EdgeWidthNormalization::Percentile90 => {
            let sorted = sorted_finite(weights.iter().copied());
            percentile(&sorted, EDGE_WIDTH_PERCENTILE)
                .filter(|p| *p > 0.0)
                .or_else(|| sorted.last().copied())
                .map(|p| (0.0, p))
        }
        EdgeWidthNormalization::MinMax => {
            Extent::of(weights.iter().copied()).map(|e| (e.min, e.max))
        }
    };
    let Some(domain) = domain.filter(|(lo, hi)| hi > lo) else {
        // All weights equal (or none positive): one width for everything.
        let uniform = if weights.iter().any(|w| *w > 0.0) {
            range.1
        } else {
            range.0
        };
        return weights.iter().map(|_| uniform).collect();
    };
    let scale = ScaleSqrt::new(domain, range);
    weights.iter().map(|w| scale.map(*w)).collect()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::String;
    use alloc::vec;

    use super::*;

    fn node(links: usize) -> GraphNode {
        GraphNode {
            id: String::from("n"),
            name: String::from("n"),
            category: None,
            value: 0.0,
            in_value: 0.0,
            out_value: 0.0,
            links,
        }
    }

    #[test]
    fn node_size_is_linear_in_share() {
        let o = GraphOptions::default();
        assert_eq!(node_size(0.0, 100.0, &o), 10.0);
        assert_eq!(node_size(50.0, 100.0, &o), 30.0);
        assert_eq!(node_size(100.0, 100.0, &o), 50.0);
        assert_eq!(node_size(0.0, 0.0, &o), 10.0);
    }

    #[test]
    fn outlier_does_not_flatten_the_rest() {
        let mut weights = vec![1.0; 9];
        weights.push(100.0);
        let o = GraphOptions::default();
        let w = edge_widths(&weights, &o);
        assert!(w[0] > o.min_edge_width + 1.0, "{w:?}");
        assert_eq!(w[9], o.max_edge_width);
    }

    #[test]
    fn min_max_mode_spans_the_range() {
        let o = GraphOptions {
            normalize_edge_width_to_max: false,
            ..GraphOptions::default()
        };
        let w = edge_widths(&[1.0, 4.0, 9.0], &o);
        assert_eq!(w[0], 1.0);
        assert_eq!(w[2], 8.0);
        assert!((w[1] - 4.5).abs() < 1e-9);
    }

    #[test]
    fn connected_nodes_seed_closer_to_the_center() {
        let o = GraphOptions::default();
        let p = seed_positions(&[node(0), node(10), node(5)], &o);
        let d: Vec<f64> = p.iter().map(|p| p.distance(SEED_CENTER)).collect();
        assert!((d[0] - 200.0).abs() < 1e-9);
        assert!((d[1] - 100.0).abs() < 1e-9);
        assert!((d[2] - 150.0).abs() < 1e-9);
    }
}
