// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend generation.
//!
//! A legend is a list of named swatches. Series legends use plain color swatches; the graph
//! processor's edge-style legend also carries a line pattern per entry. Long legends switch
//! to the renderer's scrollable legend instead of wrapping over the plot.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chartir_core::{Theme, css_color};
use serde::Serialize;
use serde_json::{Value, json};

/// Legends with more entries than this scroll.
pub const SCROLL_THRESHOLD: usize = 8;

/// Stroke pattern of a line-like mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    /// Continuous stroke.
    Solid,
    /// Long dashes.
    Dashed,
    /// Dots.
    Dotted,
}

impl LineType {
    /// Patterns in assignment order.
    pub const CYCLE: [Self; 3] = [Self::Solid, Self::Dashed, Self::Dotted];

    /// The `index`-th pattern, cycling.
    pub fn nth(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }

    /// Renderer name of the pattern.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
        }
    }
}

/// A single legend entry.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    /// The label shown next to the swatch.
    pub label: String,
    /// Swatch color as a CSS color string.
    pub color: String,
    /// Line pattern, for legends describing strokes.
    pub line_type: Option<LineType>,
}

impl LegendItem {
    /// Convenience constructor for a solid-color swatch.
    pub fn solid(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            line_type: None,
        }
    }

    /// Convenience constructor for a stroke swatch.
    pub fn stroke(label: impl Into<String>, color: impl Into<String>, line_type: LineType) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            line_type: Some(line_type),
        }
    }

    fn to_value(&self) -> Value {
        let mut entry = json!({
            "name": self.label,
            "itemStyle": { "color": self.color },
        });
        if let Some(line_type) = self.line_type {
            entry["icon"] = json!("path://M0,5 L30,5");
            entry["lineStyle"] = json!({
                "color": self.color,
                "type": line_type.as_str(),
                "width": 2,
            });
        }
        entry
    }
}

/// Where a legend sits relative to the plot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LegendPlacement {
    /// Above the plot, centered.
    #[default]
    Top,
    /// Below the plot, centered.
    Bottom,
}

/// A legend block: items plus placement.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Legend {
    /// Entries in display order.
    pub items: Vec<LegendItem>,
    /// Placement.
    pub placement: LegendPlacement,
}

impl Legend {
    /// A top legend with `items`.
    pub fn new(items: Vec<LegendItem>) -> Self {
        Self {
            items,
            placement: LegendPlacement::Top,
        }
    }

    /// Returns `self` placed at `placement`.
    pub fn with_placement(mut self, placement: LegendPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Returns `true` when the legend scrolls instead of wrapping.
    pub fn scrolls(&self) -> bool {
        self.items.len() > SCROLL_THRESHOLD
    }

    /// Lowers the legend to an option fragment.
    pub fn to_value(&self, dark: bool) -> Value {
        let theme = Theme::for_mode(dark);
        let text = css_color(theme.text);
        let mut legend = json!({
            "show": !self.items.is_empty(),
            "type": if self.scrolls() { "scroll" } else { "plain" },
            "left": "center",
            "itemWidth": 14,
            "itemHeight": 10,
            "textStyle": { "color": text },
            "data": self.items.iter().map(LegendItem::to_value).collect::<Vec<_>>(),
        });
        match self.placement {
            LegendPlacement::Top => legend["top"] = json!(4),
            LegendPlacement::Bottom => legend["bottom"] = json!(4),
        }
        if self.scrolls() {
            legend["pageIconColor"] = json!(text);
            legend["pageIconInactiveColor"] = json!(css_color(theme.muted_text));
            legend["pageTextStyle"] = json!({ "color": text });
        }
        legend
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::format;

    use super::*;

    fn items(n: usize) -> Vec<LegendItem> {
        (0..n)
            .map(|i| LegendItem::solid(format!("s{i}"), "#000000"))
            .collect()
    }

    #[test]
    fn line_types_cycle() {
        let got: Vec<_> = (0..5).map(LineType::nth).collect();
        assert_eq!(
            got,
            [
                LineType::Solid,
                LineType::Dashed,
                LineType::Dotted,
                LineType::Solid,
                LineType::Dashed
            ]
        );
    }

    #[test]
    fn long_legends_scroll() {
        assert_eq!(Legend::new(items(8)).to_value(false)["type"], "plain");
        let long = Legend::new(items(9)).to_value(true);
        assert_eq!(long["type"], "scroll");
        assert!(long.get("pageIconColor").is_some());
    }

    #[test]
    fn stroke_items_carry_a_pattern() {
        let legend = Legend::new(alloc::vec![LegendItem::stroke(
            "bridge",
            "#ff0000",
            LineType::Dotted
        )])
        .with_placement(LegendPlacement::Bottom)
        .to_value(false);
        assert_eq!(legend["bottom"], 4);
        assert_eq!(legend["data"][0]["lineStyle"]["type"], "dotted");
    }

    #[test]
    fn empty_legend_is_hidden() {
        assert_eq!(Legend::default().to_value(false)["show"], false);
    }
}
