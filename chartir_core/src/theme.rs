// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Light/dark guide colors.

extern crate alloc;

use alloc::format;
use alloc::string::String;

use peniko::Color;

/// Guide and text colors for one theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    /// Whether this is the dark theme.
    pub dark: bool,
    /// Primary text (titles, labels).
    pub text: Color,
    /// Secondary text (axis labels, legend entries).
    pub muted_text: Color,
    /// Axis domain lines.
    pub axis_line: Color,
    /// Gridlines.
    pub split_line: Color,
    /// Tooltip panel fill.
    pub tooltip_background: Color,
    /// Tooltip panel border.
    pub tooltip_border: Color,
    /// Chart background.
    pub background: Color,
}

impl Theme {
    /// The light theme.
    pub const LIGHT: Self = Self {
        dark: false,
        text: Color::from_rgba8(0x1F, 0x29, 0x37, 0xFF),
        muted_text: Color::from_rgba8(0x6B, 0x72, 0x80, 0xFF),
        axis_line: Color::from_rgba8(0xD1, 0xD5, 0xDB, 0xFF),
        split_line: Color::from_rgba8(0xE5, 0xE7, 0xEB, 0xFF),
        tooltip_background: Color::from_rgba8(0xFF, 0xFF, 0xFF, 0xF2),
        tooltip_border: Color::from_rgba8(0xE5, 0xE7, 0xEB, 0xFF),
        background: Color::TRANSPARENT,
    };

    /// The dark theme.
    pub const DARK: Self = Self {
        dark: true,
        text: Color::from_rgba8(0xF3, 0xF4, 0xF6, 0xFF),
        muted_text: Color::from_rgba8(0x9C, 0xA3, 0xAF, 0xFF),
        axis_line: Color::from_rgba8(0x4B, 0x55, 0x63, 0xFF),
        split_line: Color::from_rgba8(0x37, 0x41, 0x51, 0xFF),
        tooltip_background: Color::from_rgba8(0x1F, 0x29, 0x37, 0xF2),
        tooltip_border: Color::from_rgba8(0x37, 0x41, 0x51, 0xFF),
        background: Color::TRANSPARENT,
    };

    /// Selects the theme for a dark-mode flag.
    pub fn for_mode(dark: bool) -> Self {
        if dark { Self::DARK } else { Self::LIGHT }
    }
}

/// Renders a color as CSS: `#rrggbb` when opaque, `rgba(...)` otherwise.
pub fn css_color(color: Color) -> String {
    let c = color.to_rgba8();
    match c.a {
        0xFF => format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b),
        0 => String::from("transparent"),
        a => {
            let alpha = f64::from(a) / 255.0;
            format!("rgba({}, {}, {}, {:.2})", c.r, c.g, c.b, alpha)
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn opaque_colors_render_as_hex() {
        assert_eq!(css_color(Theme::LIGHT.text), "#1f2937");
    }

    #[test]
    fn transparent_and_translucent_colors() {
        assert_eq!(css_color(Color::TRANSPARENT), "transparent");
        let c = css_color(Theme::DARK.tooltip_background);
        assert!(c.starts_with("rgba(31, 41, 55, 0.95"), "{c}");
    }

    #[test]
    fn mode_selects_theme() {
        assert!(Theme::for_mode(true).dark);
        assert!(!Theme::for_mode(false).dark);
    }
}
