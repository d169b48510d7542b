// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared grid insets and zoom configuration.
//!
//! Every axis chart asks the same policy for its plot insets and zoom controls, so cards of
//! the same size line up regardless of chart type. Inputs are deliberately coarse: whether
//! the card is expanded, whether zoom is enabled and whether a legend sits above the plot.

extern crate alloc;

use alloc::format;
use alloc::vec::Vec;

use chartir_core::{Theme, css_color};
use peniko::Color;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};

use crate::ChartConfig;

/// Accent used for the zoom slider's selected window.
const ZOOM_ACCENT: Color = Color::from_rgba8(0x4F, 0x46, 0xE5, 0xFF);

/// One grid inset: pixels or a percentage of the card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Inset {
    /// Absolute pixels.
    Px(f64),
    /// Percentage of the container.
    Percent(f64),
}

impl Serialize for Inset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Px(px) => serializer.serialize_f64(px),
            Self::Percent(p) => serializer.serialize_str(&format!("{p}%")),
        }
    }
}

/// Axis a zoom control is attached to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZoomAxis {
    /// The horizontal axis.
    #[default]
    X,
    /// The vertical axis (horizontal bar charts).
    Y,
}

impl ZoomAxis {
    fn index_key(self) -> &'static str {
        match self {
            Self::X => "xAxisIndex",
            Self::Y => "yAxisIndex",
        }
    }
}

/// Plot insets inside the card.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridInsets {
    /// Left inset.
    pub left: Inset,
    /// Right inset.
    pub right: Inset,
    /// Top inset.
    pub top: Inset,
    /// Bottom inset.
    pub bottom: Inset,
    /// Whether axis labels are contained in the insets.
    pub contain_label: bool,
}

/// Layout inputs shared by all processors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutPolicy {
    /// Card is shown expanded.
    pub is_expanded: bool,
    /// Zoom controls are enabled.
    pub zoom_enabled: bool,
    /// A legend occupies the top of the card.
    pub has_legend: bool,
}

impl LayoutPolicy {
    /// Policy for a chart config.
    pub fn from_config(config: &ChartConfig, has_legend: bool) -> Self {
        Self {
            is_expanded: config.is_expanded,
            zoom_enabled: config.enable_zoom,
            has_legend,
        }
    }

    /// Grid insets.
    ///
    /// The bottom inset grows to make room for the zoom slider; the top inset grows when a
    /// legend is shown. Expanded cards get proportionally more breathing room.
    pub fn grid(&self) -> GridInsets {
        let (side, base) = if self.is_expanded {
            (2.0, 32.0)
        } else {
            (3.0, 16.0)
        };
        let top = if self.has_legend { base + 32.0 } else { base + 8.0 };
        let bottom = if self.zoom_enabled {
            base + self.slider_height() + 24.0
        } else {
            base
        };
        GridInsets {
            left: Inset::Percent(side),
            right: Inset::Percent(side + 1.0),
            top: Inset::Px(top),
            bottom: Inset::Px(bottom),
            contain_label: true,
        }
    }

    fn slider_height(&self) -> f64 {
        if self.is_expanded { 24.0 } else { 18.0 }
    }

    /// `dataZoom` entries: empty when zoom is disabled, otherwise an `inside` zoom plus a
    /// themed `slider` on `axis`.
    pub fn data_zoom(&self, dark: bool, axis: ZoomAxis) -> Vec<Value> {
        if !self.zoom_enabled {
            return Vec::new();
        }
        let theme = Theme::for_mode(dark);
        let offset = if self.is_expanded { 16.0 } else { 8.0 };
        let mut inside = json!({
            "type": "inside",
            "start": 0,
            "end": 100,
            "zoomOnMouseWheel": "shift",
        });
        let mut slider = json!({
            "type": "slider",
            "start": 0,
            "end": 100,
            "borderColor": css_color(theme.axis_line),
            "fillerColor": css_color(ZOOM_ACCENT.with_alpha(0.15)),
            "handleStyle": { "color": css_color(ZOOM_ACCENT) },
            "textStyle": { "color": css_color(theme.muted_text) },
        });
        inside[axis.index_key()] = json!(0);
        slider[axis.index_key()] = json!(0);
        match axis {
            ZoomAxis::X => {
                slider["height"] = json!(self.slider_height());
                slider["bottom"] = json!(offset);
            }
            ZoomAxis::Y => {
                slider["orient"] = json!("vertical");
                slider["width"] = json!(self.slider_height());
                slider["right"] = json!(offset);
            }
        }
        alloc::vec![inside, slider]
    }

    /// Grid insets as an option value.
    pub fn grid_value(&self) -> Value {
        serde_json::to_value(self.grid()).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn zoom_reserves_bottom_space() {
        let plain = LayoutPolicy::default().grid();
        let zoomed = LayoutPolicy {
            zoom_enabled: true,
            ..LayoutPolicy::default()
        }
        .grid();
        let (Inset::Px(a), Inset::Px(b)) = (plain.bottom, zoomed.bottom) else {
            panic!("bottom insets are pixel values");
        };
        assert!(b > a);
    }

    #[test]
    fn legend_reserves_top_space() {
        let with = LayoutPolicy {
            has_legend: true,
            ..LayoutPolicy::default()
        }
        .grid();
        assert_eq!(with.top, Inset::Px(48.0));
        assert_eq!(LayoutPolicy::default().grid().top, Inset::Px(24.0));
    }

    #[test]
    fn data_zoom_is_empty_unless_enabled() {
        assert!(LayoutPolicy::default().data_zoom(false, ZoomAxis::X).is_empty());
        let zoom = LayoutPolicy {
            zoom_enabled: true,
            is_expanded: true,
            has_legend: false,
        }
        .data_zoom(true, ZoomAxis::X);
        assert_eq!(zoom.len(), 2);
        assert_eq!(zoom[1]["type"], "slider");
        assert_eq!(zoom[1]["height"], 24.0);
        assert_eq!(zoom[0]["xAxisIndex"], 0);
    }

    #[test]
    fn vertical_zoom_for_category_y_axis() {
        let zoom = LayoutPolicy {
            zoom_enabled: true,
            ..LayoutPolicy::default()
        }
        .data_zoom(false, ZoomAxis::Y);
        assert_eq!(zoom[1]["orient"], "vertical");
        assert_eq!(zoom[1]["yAxisIndex"], 0);
        assert!(zoom[1].get("xAxisIndex").is_none());
    }

    #[test]
    fn percent_insets_serialize_as_strings() {
        let v = LayoutPolicy::default().grid_value();
        assert_eq!(v["left"], "3%");
        assert_eq!(v["right"], "4%");
        assert_eq!(v["containLabel"], true);
    }
}
