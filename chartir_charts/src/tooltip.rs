// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip markup.
//!
//! Options are plain data, so tooltips are precomputed HTML strings: axis charts get one
//! string per category (`tooltip.axisContent`), item charts one string per data item.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use chartir_core::{Theme, css_color};

use crate::format::ValueFormatter;

/// Tooltips with more entries than this are laid out in several columns.
pub const COLUMN_THRESHOLD: usize = 10;

/// Upper bound on tooltip columns.
pub const MAX_COLUMNS: usize = 3;

/// One series line of an axis tooltip.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipEntry {
    /// Series label.
    pub label: String,
    /// Marker color.
    pub color: Option<String>,
    /// Value; `None` renders as a dash.
    pub value: Option<f64>,
}

impl TooltipEntry {
    /// Creates an entry.
    pub fn new(label: impl Into<String>, color: Option<String>, value: Option<f64>) -> Self {
        Self {
            label: label.into(),
            color,
            value,
        }
    }
}

/// Builds tooltip markup for any axis-based chart.
#[derive(Clone, Copy, Debug)]
pub struct TooltipComposer {
    formatter: ValueFormatter,
    theme: Theme,
    sort_descending: bool,
    show_total: bool,
}

impl TooltipComposer {
    /// A composer using `formatter` for values.
    pub fn new(formatter: ValueFormatter, dark: bool) -> Self {
        Self {
            formatter,
            theme: Theme::for_mode(dark),
            sort_descending: false,
            show_total: false,
        }
    }

    /// Orders entries by descending value; missing values go last.
    pub fn with_sorting(mut self, sort_descending: bool) -> Self {
        self.sort_descending = sort_descending;
        self
    }

    /// Appends a total of the present values.
    pub fn with_total(mut self, show_total: bool) -> Self {
        self.show_total = show_total;
        self
    }

    /// Number of columns used for `entries` entries.
    pub fn columns_for(entries: usize) -> usize {
        if entries <= COLUMN_THRESHOLD {
            1
        } else {
            entries.div_ceil(COLUMN_THRESHOLD).min(MAX_COLUMNS)
        }
    }

    /// Composes the tooltip for one category.
    pub fn compose(&self, title: &str, entries: &[TooltipEntry]) -> String {
        let mut order: Vec<&TooltipEntry> = entries.iter().collect();
        if self.sort_descending {
            order.sort_by(|a, b| match (a.value, b.value) {
                (Some(x), Some(y)) => y.total_cmp(&x),
                (Some(_), None) => core::cmp::Ordering::Less,
                (None, Some(_)) => core::cmp::Ordering::Greater,
                (None, None) => core::cmp::Ordering::Equal,
            });
        }

        let mut html = self.title(title);
        html.push_str(&format!(
            "<div style=\"display:grid;grid-template-columns:repeat({},minmax(0,auto));gap:2px 16px\">",
            Self::columns_for(order.len())
        ));
        for entry in order {
            let value = entry
                .value
                .map_or_else(|| String::from("-"), |v| self.formatter.tooltip(v));
            html.push_str(&self.line(&entry.label, entry.color.as_deref(), &value));
        }
        html.push_str("</div>");

        if self.show_total {
            let total: f64 = entries.iter().filter_map(|e| e.value).sum();
            html.push_str(&format!(
                "<div style=\"display:flex;gap:12px;margin-top:4px;padding-top:4px;border-top:1px solid {}\"><span>Total</span><span style=\"margin-left:auto;font-weight:600\">{}</span></div>",
                css_color(self.theme.split_line),
                self.formatter.tooltip(total)
            ));
        }
        html
    }

    /// Composes an item tooltip from preformatted `(label, value)` lines.
    pub fn details(&self, title: &str, color: Option<&str>, lines: &[(&str, String)]) -> String {
        let mut html = self.title(title);
        for (label, value) in lines {
            html.push_str(&self.line(label, color, value));
        }
        html
    }

    fn title(&self, title: &str) -> String {
        format!(
            "<div style=\"font-weight:600;margin-bottom:4px;color:{}\">{}</div>",
            css_color(self.theme.text),
            escape_html(title)
        )
    }

    fn line(&self, label: &str, color: Option<&str>, value: &str) -> String {
        let marker = color.map_or_else(String::new, |c| {
            format!(
                "<span style=\"display:inline-block;width:8px;height:8px;border-radius:50%;background:{}\"></span>",
                escape_html(c)
            )
        });
        format!(
            "<div style=\"display:flex;align-items:center;gap:6px\">{marker}<span style=\"color:{}\">{}</span><span style=\"margin-left:auto;font-weight:600\">{}</span></div>",
            css_color(self.theme.muted_text),
            escape_html(label),
            escape_html(value)
        )
    }
}

/// Escapes text for inclusion in tooltip markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
