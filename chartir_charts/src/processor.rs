// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The processor contract shared by every chart type.
//!
//! A processor is three pure steps:
//! 1. [`ChartProcessor::validate`]: is the input a non-empty array of records?
//! 2. [`ChartProcessor::process_data`]: rows + config into a type-specific intermediate shape.
//! 3. [`ChartProcessor::build`]: the intermediate shape into a [`ChartSpec`].
//!
//! [`ChartProcessor::options`] chains the three, answers invalid input with the canonical
//! empty spec and applies the config's `overrides` last.

extern crate alloc;

use alloc::string::String;

use chartir_core::{InputError, Row, empty_option, merge_options, records};
use core::fmt;
use core::str::FromStr;
use serde_json::Value;

use crate::ChartConfig;
use crate::graph::EdgeStyleBinding;

/// A compiled chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    /// The declarative, renderer-agnostic option.
    pub option: Value,
    /// Legend-to-edge binding, for graphs with an edge-style legend.
    pub edge_styles: Option<EdgeStyleBinding>,
}

impl ChartSpec {
    /// A spec with no edge-style binding.
    pub fn new(option: Value) -> Self {
        Self {
            option,
            edge_styles: None,
        }
    }

    /// The canonical "no data" spec.
    pub fn empty(dark: bool) -> Self {
        Self::new(empty_option(dark))
    }

    /// Returns `true` for the "no data" spec of either theme.
    pub fn is_empty(&self) -> bool {
        self.option == empty_option(false) || self.option == empty_option(true)
    }

    /// The serializable option.
    pub fn to_json(&self) -> Value {
        self.option.clone()
    }
}

/// Chart-type keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartKind {
    /// Vertical or horizontal bars.
    Bar,
    /// Lines.
    Line,
    /// Filled lines.
    Area,
    /// Pie or donut.
    Pie,
    /// Radar polygons.
    Radar,
    /// Pre-aggregated box plots.
    Boxplot,
    /// Category × category heatmap.
    Heatmap,
    /// Layered flow diagram.
    Sankey,
    /// Radial hierarchy.
    Sunburst,
    /// Word cloud.
    WordCloud,
    /// Nested percentile bands.
    QuantileBands,
    /// Node-link network.
    Network,
}

impl ChartKind {
    /// Every kind, in registration order.
    pub const ALL: [Self; 12] = [
        Self::Bar,
        Self::Line,
        Self::Area,
        Self::Pie,
        Self::Radar,
        Self::Boxplot,
        Self::Heatmap,
        Self::Sankey,
        Self::Sunburst,
        Self::WordCloud,
        Self::QuantileBands,
        Self::Network,
    ];

    /// The lookup key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Area => "area",
            Self::Pie => "pie",
            Self::Radar => "radar",
            Self::Boxplot => "boxplot",
            Self::Heatmap => "heatmap",
            Self::Sankey => "sankey",
            Self::Sunburst => "sunburst",
            Self::WordCloud => "wordcloud",
            Self::QuantileBands => "quantileBands",
            Self::Network => "network",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error for a chart-type key that names no processor.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown chart type `{0}`")]
pub struct UnknownChartKind(pub String);

impl FromStr for ChartKind {
    type Err = UnknownChartKind;

    /// Parses a key, ignoring ASCII case. `graph` is accepted for [`ChartKind::Network`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if key.eq_ignore_ascii_case("graph") {
            return Ok(Self::Network);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| UnknownChartKind(String::from(s)))
    }
}

/// A chart-type processor.
pub trait ChartProcessor {
    /// Intermediate shape produced by [`process_data`](Self::process_data).
    type Processed;

    /// The key this processor is registered under.
    fn kind(&self) -> ChartKind;

    /// Returns `true` when `rows` is a non-empty array whose first element is a record.
    fn validate(&self, rows: &Value) -> bool {
        records(rows).is_ok()
    }

    /// Shapes validated rows for this chart type.
    fn process_data(&self, rows: &[&Row], config: &ChartConfig) -> Self::Processed;

    /// Lowers the processed shape to a spec. `None` means nothing is plottable.
    fn build(&self, processed: Self::Processed, config: &ChartConfig, dark: bool)
    -> Option<ChartSpec>;

    /// Compiles `rows` under `config`.
    ///
    /// Never fails: invalid input and unplottable data both yield [`ChartSpec::empty`].
    fn options(&self, rows: &Value, config: &ChartConfig, dark: bool) -> ChartSpec {
        let rows = match records(rows) {
            Ok(rows) => rows,
            Err(err) => return reject(Self::kind(self), err, dark),
        };
        let processed = self.process_data(&rows, config);
        let Some(mut spec) = self.build(processed, config, dark) else {
            log::debug!("{}: no plottable data in {} rows", Self::kind(self), rows.len());
            return ChartSpec::empty(dark);
        };
        if let Some(overrides) = &config.overrides {
            spec.option = merge_options(&spec.option, overrides);
        }
        spec
    }
}

fn reject(kind: ChartKind, err: InputError, dark: bool) -> ChartSpec {
    log::debug!("{kind}: {err}");
    ChartSpec::empty(dark)
}

/// Object-safe view of a [`ChartProcessor`], used by the lookup table.
pub trait CompileChart {
    /// The key this processor is registered under.
    fn kind(&self) -> ChartKind;

    /// See [`ChartProcessor::validate`].
    fn validate(&self, rows: &Value) -> bool;

    /// See [`ChartProcessor::options`].
    fn compile(&self, rows: &Value, config: &ChartConfig, dark: bool) -> ChartSpec;
}

impl<P: ChartProcessor> CompileChart for P {
    fn kind(&self) -> ChartKind {
        ChartProcessor::kind(self)
    }

    fn validate(&self, rows: &Value) -> bool {
        ChartProcessor::validate(self, rows)
    }

    fn compile(&self, rows: &Value, config: &ChartConfig, dark: bool) -> ChartSpec {
        self.options(rows, config, dark)
    }
}
