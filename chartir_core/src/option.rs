// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Option-level helpers: the "no data" placeholder and override merging.

extern crate alloc;

use serde_json::{Value, json};

use crate::{Theme, css_color};

/// Text shown by the placeholder option.
pub const NO_DATA_LABEL: &str = "No data available";

/// The canonical option returned whenever input validation fails.
///
/// A centered placeholder label in the theme's muted text color over a transparent
/// background, with both axes hidden and no series.
pub fn empty_option(dark: bool) -> Value {
    let theme = Theme::for_mode(dark);
    json!({
        "backgroundColor": css_color(theme.background),
        "title": {
            "text": NO_DATA_LABEL,
            "left": "center",
            "top": "middle",
            "textStyle": {
                "color": css_color(theme.muted_text),
                "fontSize": 14,
                "fontWeight": "normal",
            },
        },
        "xAxis": { "show": false },
        "yAxis": { "show": false },
        "series": [],
    })
}

/// Deep-merges `overlay` over `base`, returning a new value.
///
/// Objects merge key by key, recursively. Any other overlay value, arrays included,
/// replaces the base value outright. The more specific fragment (`overlay`) always wins.
pub fn merge_options(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(b), Value::Object(o)) => {
            let mut out = b.clone();
            for (key, value) in o {
                let merged = match b.get(key) {
                    Some(existing) => merge_options(existing, value),
                    None => value.clone(),
                };
                out.insert(key.clone(), merged);
            }
            Value::Object(out)
        }
        _ => overlay.clone(),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn empty_option_is_themed_and_transparent() {
        let light = empty_option(false);
        let dark = empty_option(true);
        assert_eq!(light["backgroundColor"], "transparent");
        assert_eq!(light["title"]["text"], NO_DATA_LABEL);
        assert_ne!(
            light["title"]["textStyle"]["color"],
            dark["title"]["textStyle"]["color"]
        );
        assert_eq!(light["series"], json!([]));
    }

    #[test]
    fn merge_recurses_into_objects() {
        let base = json!({"grid": {"left": 10, "right": 10}, "series": [1, 2]});
        let overlay = json!({"grid": {"left": 40}, "series": [3]});
        let merged = merge_options(&base, &overlay);
        assert_eq!(
            merged,
            json!({"grid": {"left": 40, "right": 10}, "series": [3]})
        );
        // Inputs are untouched.
        assert_eq!(base["grid"]["left"], 10);
    }

    #[test]
    fn scalar_overlay_replaces_object() {
        let merged = merge_options(&json!({"a": {"b": 1}}), &json!({"a": null}));
        assert_eq!(merged, json!({"a": null}));
    }
}
