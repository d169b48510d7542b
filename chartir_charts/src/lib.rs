// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart processors for ChartIR.
//!
//! Each processor is a pure function from `(rows, config, dark_mode)` to a declarative,
//! renderer-agnostic chart option (see [`ChartProcessor`]). Processors share a small set of
//! guide primitives so every chart type gets the same axis, tooltip, legend and zoom
//! behavior:
//! - **Formatting**: [`ValueFormatter`] for compact axis labels and tooltip values.
//! - **Colors**: [`resolve_colors`] picks explicit, theme and standard palette colors.
//! - **Layout**: [`LayoutPolicy`] computes grid insets and data-zoom controls.
//! - **Tooltips**: [`TooltipComposer`] renders multi-column tooltip markup.
//!
//! Look processors up by chart-type key through a [`ProcessorTable`].

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod axis;
mod bar;
mod boxplot;
mod config;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod graph;
mod heatmap;
mod layout;
mod legend;
mod line;
mod palette;
mod pie;
mod processor;
mod quantile_bands;
mod radar;
mod sankey;
mod scale;
mod sunburst;
mod table;
mod tooltip;
mod word_cloud;

pub use axis::{AxisData, AxisFields};
pub use bar::BarProcessor;
pub use boxplot::{BoxplotData, BoxplotProcessor};
pub use config::{
    BoxplotOptions, ChartConfig, EdgeWidthNormalization, GraphOptions, HeatmapOptions,
    PieOptions, QuantileOptions, SunburstOptions, ThemePalette, WordCloudOptions,
};
pub use format::{
    DEFAULT_COMPACT_THRESHOLD, ValueFormat, ValueFormatter, category_label, format_axis_value,
    format_date_by_granularity, format_number,
};
pub use graph::{EdgeStyleBinding, GraphData, GraphEdge, GraphNode, NetworkProcessor};
pub use heatmap::{HeatmapData, HeatmapProcessor, color_bounds};
pub use layout::{GridInsets, Inset, LayoutPolicy, ZoomAxis};
pub use legend::{Legend, LegendItem, LegendPlacement, LineType, SCROLL_THRESHOLD};
pub use line::LineProcessor;
pub use palette::{STANDARD_PALETTE, resolve_colors, resolve_from};
pub use pie::{OTHER_LABEL, PieData, PieProcessor, PieSlice};
pub use processor::{ChartKind, ChartProcessor, ChartSpec, CompileChart, UnknownChartKind};
pub use quantile_bands::{QuantileBandsData, QuantileBandsProcessor};
pub use radar::RadarProcessor;
pub use sankey::{SankeyData, SankeyLink, SankeyProcessor};
pub use scale::{ScaleLinear, ScaleSqrt, nice_ticks};
pub use sunburst::{SunburstData, SunburstNode, SunburstProcessor};
pub use table::ProcessorTable;
pub use tooltip::{COLUMN_THRESHOLD, MAX_COLUMNS, TooltipComposer, TooltipEntry, escape_html};
pub use word_cloud::{Word, WordCloudData, WordCloudProcessor};
