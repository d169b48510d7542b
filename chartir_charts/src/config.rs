// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-chart configuration.
//!
//! Configuration arrives as a loosely specified JSON object from the dashboard's metric
//! definitions. Every key is optional; unrecognized keys are ignored and absent keys take
//! the defaults documented on each field. Per-type option groups are flattened into the
//! same object so a single config shape serves every processor.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chartir_transforms::AggregateOp;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Light/dark palette pair referenced by a chart.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemePalette {
    /// Colors used in light mode.
    pub light: Vec<String>,
    /// Colors used in dark mode.
    pub dark: Vec<String>,
}

impl ThemePalette {
    /// The list for the current theme.
    pub fn for_mode(&self, dark: bool) -> &[String] {
        if dark { &self.dark } else { &self.light }
    }
}

/// Configuration shared by every chart type.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    /// Category (x) field.
    pub x_field: Option<String>,
    /// Value (y) field.
    pub y_field: Option<String>,
    /// Series field splitting rows into multiple series.
    pub series_field: Option<String>,
    /// Generic value field (pie, heatmap, sankey, word cloud, sunburst).
    pub value_field: Option<String>,
    /// Generic name field (pie slices, radar indicators).
    pub name_field: Option<String>,
    /// Smooth line interpolation.
    pub smooth: bool,
    /// Stack series on top of each other.
    pub stacked: bool,
    /// Draw bars horizontally.
    pub horizontal: bool,
    /// Add inside + slider zoom.
    pub enable_zoom: bool,
    /// Show value labels on marks.
    pub show_labels: bool,
    /// Card is displayed expanded (larger insets).
    pub is_expanded: bool,
    /// Explicit per-series colors, highest priority.
    pub colors: Vec<String>,
    /// Theme-scoped palette, used after explicit colors.
    pub palette: Option<ThemePalette>,
    /// Value format name: `currency`, `xdai`, `percentage` or `number`.
    pub format: Option<String>,
    /// Decimal places for tooltip values (default 2).
    pub decimals: Option<u8>,
    /// Absolute value at which axis labels switch to K/M/B (default 1000).
    pub compact_threshold: Option<f64>,
    /// Aggregation for duplicate `(category, series)` pairs.
    pub aggregation: AggregateOp,
    /// Option fragment deep-merged over the emitted option.
    pub overrides: Option<Value>,
    /// Network graph options.
    #[serde(flatten)]
    pub graph: GraphOptions,
    /// Heatmap options.
    #[serde(flatten)]
    pub heatmap: HeatmapOptions,
    /// Boxplot options.
    #[serde(flatten)]
    pub boxplot: BoxplotOptions,
    /// Sunburst options.
    #[serde(flatten)]
    pub sunburst: SunburstOptions,
    /// Word-cloud options.
    #[serde(flatten)]
    pub word_cloud: WordCloudOptions,
    /// Pie options.
    #[serde(flatten)]
    pub pie: PieOptions,
    /// Quantile-band options.
    #[serde(flatten)]
    pub quantile: QuantileOptions,
}

impl ChartConfig {
    /// Builds a config from a JSON object.
    ///
    /// Keys holding a value of the wrong JSON type (including `null` for a flag or number)
    /// are dropped with a warning and take their defaults; every other key is kept. Anything
    /// other than an object yields the defaults.
    pub fn from_value(value: &Value) -> Self {
        let fields = match value {
            Value::Null => return Self::default(),
            Value::Object(fields) => fields,
            _ => {
                log::warn!("ignoring chart config that is not an object");
                return Self::default();
            }
        };
        if let Ok(config) = Self::deserialize(value) {
            return config;
        }
        let valid: Map<String, Value> = fields
            .iter()
            .filter(|(key, field)| {
                let mut single = Map::new();
                single.insert((*key).clone(), (*field).clone());
                match Self::deserialize(&Value::Object(single)) {
                    Ok(_) => true,
                    Err(err) => {
                        log::warn!("ignoring chart config key `{key}`: {err}");
                        false
                    }
                }
            })
            .map(|(key, field)| (key.clone(), field.clone()))
            .collect();
        Self::deserialize(&Value::Object(valid)).unwrap_or_default()
    }
}

/// How edge widths are normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeWidthNormalization {
    /// Against the 90th-percentile edge weight; outliers saturate at the max width.
    Percentile90,
    /// Against the true min/max edge weight.
    MinMax,
}

/// Network graph options.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphOptions {
    /// Source id field.
    pub source_field: Option<String>,
    /// Target id field.
    pub target_field: Option<String>,
    /// Source display-name field.
    pub source_name_field: Option<String>,
    /// Target display-name field.
    pub target_name_field: Option<String>,
    /// Source category field.
    pub source_group_field: Option<String>,
    /// Target category field.
    pub target_group_field: Option<String>,
    /// Edge weight field.
    pub weight_field: Option<String>,
    /// Edge style field; enables the edge-style legend.
    pub edge_style_field: Option<String>,
    /// Optional edge date attribute.
    pub date_field: Option<String>,
    /// Optional edge amount attribute.
    pub amount_field: Option<String>,
    /// Optional edge transfer-count attribute.
    pub count_field: Option<String>,
    /// Optional edge token attribute.
    pub token_field: Option<String>,
    /// Smallest node symbol size.
    pub min_node_size: f64,
    /// Largest node symbol size.
    pub max_node_size: f64,
    /// Thinnest edge.
    pub min_edge_width: f64,
    /// Thickest edge.
    pub max_edge_width: f64,
    /// `true` (default) normalizes edge widths against the 90th-percentile weight;
    /// `false` against the true min/max.
    pub normalize_edge_width_to_max: bool,
    /// Curvature between parallel edges in one direction.
    pub curve_separation: f64,
    /// Base curvature separating opposite directions of a node pair.
    pub direction_offset: f64,
    /// Absolute curvature limit.
    pub max_curvature: f64,
    /// Labels (node name or id) of hub nodes whose outgoing edges fan out via anchors.
    pub boundary_anchor_sources: Vec<String>,
    /// Distance from a hub to its anchors.
    pub anchor_radius: f64,
    /// Angle between anchors of edges sharing a target, in radians.
    pub anchor_angle_separation: f64,
    /// Radius of the seed circle.
    pub seed_radius: f64,
    /// How far fully central nodes are pulled toward the center (`0..=1`).
    pub seed_centrality_blend: f64,
    /// Link count at which a node counts as fully central.
    pub seed_centrality_cap: f64,
    /// Explicit colors for edge styles, in sorted style order.
    pub edge_style_colors: Vec<String>,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            source_field: None,
            target_field: None,
            source_name_field: None,
            target_name_field: None,
            source_group_field: None,
            target_group_field: None,
            weight_field: None,
            edge_style_field: None,
            date_field: None,
            amount_field: None,
            count_field: None,
            token_field: None,
            min_node_size: 10.0,
            max_node_size: 50.0,
            min_edge_width: 1.0,
            max_edge_width: 8.0,
            normalize_edge_width_to_max: true,
            curve_separation: 0.15,
            direction_offset: 0.15,
            max_curvature: 0.6,
            boundary_anchor_sources: Vec::new(),
            anchor_radius: 18.0,
            anchor_angle_separation: 0.12,
            seed_radius: 200.0,
            seed_centrality_blend: 0.5,
            seed_centrality_cap: 10.0,
            edge_style_colors: Vec::new(),
        }
    }
}

impl GraphOptions {
    /// The configured edge-width normalization mode.
    pub fn edge_width_normalization(&self) -> EdgeWidthNormalization {
        if self.normalize_edge_width_to_max {
            EdgeWidthNormalization::Percentile90
        } else {
            EdgeWidthNormalization::MinMax
        }
    }
}

/// Heatmap options.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeatmapOptions {
    /// Center of a diverging color scale; overrides percentile bounds.
    pub visual_map_center: Option<f64>,
    /// Use percentile bounds instead of the true extent.
    pub use_percentile_bounds: bool,
    /// Lower percentile for bounds.
    pub lower_percentile: f64,
    /// Upper percentile for bounds.
    pub upper_percentile: f64,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            visual_map_center: None,
            use_percentile_bounds: true,
            lower_percentile: 5.0,
            upper_percentile: 95.0,
        }
    }
}

/// Boxplot quantile fields.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxplotOptions {
    /// Lower whisker field.
    pub min_field: Option<String>,
    /// First quartile field.
    pub q1_field: Option<String>,
    /// Median field.
    pub median_field: Option<String>,
    /// Third quartile field.
    pub q3_field: Option<String>,
    /// Upper whisker field.
    pub max_field: Option<String>,
}

/// Sunburst options.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SunburstOptions {
    /// Field holding the separator-delimited path.
    pub path_field: Option<String>,
    /// Path separator (default `/`).
    pub path_separator: Option<String>,
}

/// Word-cloud options.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WordCloudOptions {
    /// Field holding the word.
    pub word_field: Option<String>,
    /// Maximum number of words kept.
    pub max_words: usize,
    /// Words shorter than this are dropped.
    pub min_word_length: usize,
    /// Font size of the smallest word.
    pub min_font_size: f64,
    /// Font size of the largest word.
    pub max_font_size: f64,
}

impl Default for WordCloudOptions {
    fn default() -> Self {
        Self {
            word_field: None,
            max_words: 100,
            min_word_length: 2,
            min_font_size: 12.0,
            max_font_size: 60.0,
        }
    }
}

/// Pie options.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PieOptions {
    /// Keep at most this many slices; the rest fold into `Other`.
    pub max_slices: Option<usize>,
    /// Draw as a donut.
    pub donut: bool,
}

/// Quantile-band options.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuantileOptions {
    /// Fields holding the p05, p25, p50, p75 and p95 values, in that order.
    pub quantile_fields: Vec<String>,
}

impl Default for QuantileOptions {
    fn default() -> Self {
        Self {
            quantile_fields: ["p05", "p25", "p50", "p75", "p95"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_apply_to_absent_keys() {
        let c = ChartConfig::from_value(&json!({"xField": "day", "unknownKey": 3}));
        assert_eq!(c.x_field.as_deref(), Some("day"));
        assert_eq!(c.graph.max_node_size, 50.0);
        assert!(c.graph.normalize_edge_width_to_max);
        assert_eq!(
            c.graph.edge_width_normalization(),
            EdgeWidthNormalization::Percentile90
        );
        assert_eq!(c.heatmap.upper_percentile, 95.0);
        assert_eq!(c.word_cloud.max_words, 100);
        assert_eq!(c.aggregation, AggregateOp::Sum);
    }

    #[test]
    fn flattened_groups_read_from_the_same_object() {
        let c = ChartConfig::from_value(&json!({
            "sourceField": "from",
            "normalizeEdgeWidthToMax": false,
            "visualMapCenter": 0,
            "maxWords": 5,
            "aggregation": "mean",
            "palette": {"light": ["#111111"]},
        }));
        assert_eq!(c.graph.source_field.as_deref(), Some("from"));
        assert_eq!(
            c.graph.edge_width_normalization(),
            EdgeWidthNormalization::MinMax
        );
        assert_eq!(c.heatmap.visual_map_center, Some(0.0));
        assert_eq!(c.word_cloud.max_words, 5);
        assert_eq!(c.aggregation, AggregateOp::Mean);
        let palette = c.palette.unwrap();
        assert_eq!(palette.for_mode(false), ["#111111"]);
        assert!(palette.for_mode(true).is_empty());
    }

    #[test]
    fn malformed_keys_fall_back_one_by_one() {
        let c = ChartConfig::from_value(&json!({
            "xField": "day",
            "seriesField": "chain",
            "smooth": null,
            "maxWords": "many",
            "minWordLength": 3,
            "palette": {"light": "#111111"},
        }));
        assert_eq!(c.x_field.as_deref(), Some("day"));
        assert_eq!(c.series_field.as_deref(), Some("chain"));
        assert!(!c.smooth);
        assert_eq!(c.word_cloud.max_words, 100);
        assert_eq!(c.word_cloud.min_word_length, 3);
        assert_eq!(c.palette, None);
    }

    #[test]
    fn non_objects_fall_back_to_defaults() {
        assert_eq!(ChartConfig::from_value(&json!({"smooth": "yes"})), ChartConfig::default());
        assert_eq!(ChartConfig::from_value(&json!([1, 2])), ChartConfig::default());
        assert_eq!(ChartConfig::from_value(&json!("bar")), ChartConfig::default());
        assert_eq!(ChartConfig::from_value(&Value::Null), ChartConfig::default());
    }
}
