// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Word clouds.
//!
//! Words are deduplicated case-insensitively (the first spelling seen is kept and values
//! are summed), filtered by length and sign, then truncated to the largest `maxWords`.
//! Shares are relative to every word that survived filtering, including truncated ones.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use chartir_core::{FieldCandidates, Row, label, number};
use hashbrown::HashMap;
use serde_json::{Value, json};

use crate::ChartConfig;
use crate::axis::{VALUE_FALLBACKS, item_tooltip};
use crate::format::{ValueFormatter, format_number};
use crate::palette::resolve_colors;
use crate::processor::{ChartKind, ChartProcessor, ChartSpec};
use crate::scale::ScaleLinear;
use crate::tooltip::TooltipComposer;

const WORD_FALLBACKS: &[&str] = &["word", "text", "token", "term", "name", "label"];

/// One word with its weight.
#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    /// First spelling seen.
    pub text: String,
    /// Summed value.
    pub value: f64,
    /// Percentage of the filtered total.
    pub share: f64,
}

/// Words in descending value order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WordCloudData {
    /// Kept words.
    pub words: Vec<Word>,
    /// Sum over every word that passed the filters.
    pub total: f64,
}

/// Word cloud processor.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordCloudProcessor;

impl ChartProcessor for WordCloudProcessor {
    type Processed = WordCloudData;

    fn kind(&self) -> ChartKind {
        ChartKind::WordCloud
    }

    fn process_data(&self, rows: &[&Row], config: &ChartConfig) -> WordCloudData {
        let opts = &config.word_cloud;
        let word_pref = opts.word_field.as_deref().or(config.x_field.as_deref());
        let value_pref = config.value_field.as_deref().or(config.y_field.as_deref());
        let Some(word_field) = FieldCandidates::new(word_pref, WORD_FALLBACKS).resolve_in(rows)
        else {
            return WordCloudData::default();
        };
        let value_field = FieldCandidates::new(value_pref, VALUE_FALLBACKS).resolve_in(rows);

        let mut words: Vec<Word> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for row in rows {
            let Some(text) = row.get(word_field).and_then(label) else {
                continue;
            };
            if text.chars().count() < opts.min_word_length {
                continue;
            }
            // Without a value column every row counts as one occurrence.
            let value = match value_field {
                Some(f) => row.get(f).and_then(number).unwrap_or(0.0),
                None => 1.0,
            };
            let i = *index.entry(text.to_lowercase()).or_insert_with(|| {
                words.push(Word {
                    text,
                    value: 0.0,
                    share: 0.0,
                });
                words.len() - 1
            });
            words[i].value += value;
        }

        words.retain(|w| w.value > 0.0);
        let total: f64 = words.iter().map(|w| w.value).sum();
        words.sort_by(|a, b| b.value.total_cmp(&a.value));
        words.truncate(opts.max_words);
        for w in &mut words {
            w.share = w.value / total * 100.0;
        }
        log::trace!("wordcloud: kept {} words", words.len());
        WordCloudData { words, total }
    }

    fn build(&self, data: WordCloudData, config: &ChartConfig, dark: bool) -> Option<ChartSpec> {
        let (Some(largest), Some(smallest)) = (data.words.first(), data.words.last()) else {
            return None;
        };
        let opts = &config.word_cloud;
        let formatter = ValueFormatter::from_config(config);
        let composer = TooltipComposer::new(formatter, dark);
        let colors = resolve_colors(config, data.words.len().min(24), dark);
        let font = ScaleLinear::new(
            (smallest.value, largest.value),
            (opts.min_font_size, opts.max_font_size),
        );

        let items: Vec<Value> = data
            .words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let color = &colors[i % colors.len()];
                let tooltip = composer.details(
                    &w.text,
                    Some(color.as_str()),
                    &[
                        ("Value", formatter.tooltip(w.value)),
                        ("Share", format!("{}%", format_number(w.share, 1))),
                    ],
                );
                // A single word (or all-equal weights) gets the largest size.
                let size = if largest.value > smallest.value {
                    font.map(w.value)
                } else {
                    opts.max_font_size
                };
                json!({
                    "name": w.text,
                    "value": w.value,
                    "textStyle": { "color": color, "fontSize": size },
                    "tooltip": { "formatter": tooltip },
                })
            })
            .collect();

        let option = json!({
            "backgroundColor": "transparent",
            "tooltip": item_tooltip(dark),
            "series": [{
                "type": "wordCloud",
                "shape": "circle",
                "left": "center",
                "top": "center",
                "width": "95%",
                "height": "95%",
                "sizeRange": [opts.min_font_size, opts.max_font_size],
                "rotationRange": [0, 0],
                "gridSize": if config.is_expanded { 10 } else { 6 },
                "drawOutOfBound": false,
                "data": items,
            }],
        });
        Some(ChartSpec::new(option))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn rows(v: &Value) -> Vec<&Row> {
        v.as_array().unwrap().iter().filter_map(Value::as_object).collect()
    }

    #[test]
    fn words_merge_case_insensitively() {
        let data = json!([
            {"word": "Gnosis", "value": 3},
            {"word": "gnosis", "value": 2},
            {"word": "a", "value": 50},
            {"word": "safe", "value": 5},
            {"word": "zero", "value": 0},
        ]);
        let w = WordCloudProcessor.process_data(&rows(&data), &ChartConfig::default());
        let texts: Vec<&str> = w.words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, ["Gnosis", "safe"]);
        assert_eq!(w.words[0].value, 5.0);
        assert_eq!(w.total, 10.0);
        assert_eq!(w.words[0].share, 50.0);
    }

    #[test]
    fn truncation_keeps_shares_of_the_filtered_total() {
        let data = json!([
            {"word": "one", "value": 6},
            {"word": "two", "value": 3},
            {"word": "three", "value": 1},
        ]);
        let config = ChartConfig::from_value(&json!({"maxWords": 2}));
        let w = WordCloudProcessor.process_data(&rows(&data), &config);
        assert_eq!(w.words.len(), 2);
        assert_eq!(w.words[0].share, 60.0);
        assert_eq!(w.words[1].share, 30.0);
    }

    #[test]
    fn font_sizes_span_the_configured_range() {
        let data = json!([
            {"word": "big", "value": 10},
            {"word": "mid", "value": 5.5},
            {"word": "small", "value": 1},
        ]);
        let spec = WordCloudProcessor.options(&data, &ChartConfig::default(), false);
        let items = spec.option["series"][0]["data"].as_array().unwrap();
        assert_eq!(items[0]["textStyle"]["fontSize"], 60.0);
        assert_eq!(items[1]["textStyle"]["fontSize"], 36.0);
        assert_eq!(items[2]["textStyle"]["fontSize"], 12.0);
    }

    #[test]
    fn no_surviving_words_give_the_empty_spec() {
        let spec = WordCloudProcessor.options(&json!([{"word": "x", "value": 3}]), &ChartConfig::default(), false);
        assert!(spec.is_empty());
    }
}
