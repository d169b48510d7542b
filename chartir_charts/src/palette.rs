// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Series color resolution.
//!
//! Colors come from up to three sources, in priority order:
//! 1. explicit per-series colors from the chart config,
//! 2. the chart's theme-scoped palette for the current mode,
//! 3. [`STANDARD_PALETTE`].
//!
//! When a source runs out, the next slots are drawn from the **next** source rather than by
//! repeating the current one. Only after every source is exhausted does the combined
//! sequence cycle from its start.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::ChartConfig;

/// The built-in categorical palette.
pub const STANDARD_PALETTE: [&str; 24] = [
    "#4F46E5", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#06B6D4", "#EC4899", "#84CC16",
    "#F97316", "#6366F1", "#14B8A6", "#EAB308", "#DC2626", "#A855F7", "#0EA5E9", "#D946EF",
    "#22C55E", "#FB923C", "#3B82F6", "#E11D48", "#65A30D", "#0891B2", "#C026D3", "#CA8A04",
];

/// Resolves exactly `count` colors for `config` in the current theme.
pub fn resolve_colors(config: &ChartConfig, count: usize, dark: bool) -> Vec<String> {
    let theme: &[String] = config
        .palette
        .as_ref()
        .map(|palette| palette.for_mode(dark))
        .unwrap_or_default();
    resolve_from(&config.colors, theme, count)
}

/// Source-level form of [`resolve_colors`].
pub fn resolve_from(explicit: &[String], theme: &[String], count: usize) -> Vec<String> {
    explicit
        .iter()
        .chain(theme)
        .map(String::as_str)
        .chain(STANDARD_PALETTE.iter().copied())
        .filter(|c| !c.trim().is_empty())
        .cycle()
        .take(count)
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::ThemePalette;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().copied().map(String::from).collect()
    }

    #[test]
    fn explicit_colors_are_padded_from_the_next_source() {
        let got = resolve_from(&strings(&["#101010"]), &[], 3);
        assert_eq!(got, ["#101010", "#4F46E5", "#10B981"]);
    }

    #[test]
    fn theme_palette_sits_between_explicit_and_standard() {
        let config = ChartConfig {
            colors: strings(&["#000001"]),
            palette: Some(ThemePalette {
                light: strings(&["#aaaaaa"]),
                dark: strings(&["#bbbbbb", "#cccccc"]),
            }),
            ..ChartConfig::default()
        };
        assert_eq!(
            resolve_colors(&config, 4, true),
            ["#000001", "#bbbbbb", "#cccccc", "#4F46E5"]
        );
        assert_eq!(
            resolve_colors(&config, 3, false),
            ["#000001", "#aaaaaa", "#4F46E5"]
        );
    }

    #[test]
    fn explicit_list_is_truncated() {
        let got = resolve_from(&strings(&["#1", "#2", "#3"]), &[], 2);
        assert_eq!(got, ["#1", "#2"]);
    }

    #[test]
    fn cycles_only_after_every_source_is_exhausted() {
        let total = 1 + STANDARD_PALETTE.len();
        let got = resolve_from(&strings(&["#101010"]), &[], total + 2);
        assert_eq!(got.len(), total + 2);
        assert_eq!(got[total], "#101010");
        assert_eq!(got[total + 1], STANDARD_PALETTE[0]);
        assert_eq!(resolve_from(&[], &[], 0), vec![] as Vec<String>);
    }
}
