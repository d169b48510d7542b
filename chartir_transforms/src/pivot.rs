// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Category × series pivot with aggregation.
//!
//! Axis charts (bar, line, area, radar) all start from the same shape: rows grouped by a
//! category key and an optional series key, with duplicate `(category, series)` pairs
//! collapsed by an [`AggregateOp`]. Cells that never received a parseable value stay `None`
//! so the renderer draws a gap instead of a synthetic zero.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use chartir_core::{Row, label, number};
use hashbrown::HashMap;
use serde::Deserialize;
use serde_json::Value;

use crate::time::parse_timestamp;

/// Aggregation applied to duplicate `(category, series)` pairs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOp {
    /// Sum of values.
    #[default]
    Sum,
    /// Mean of values.
    Mean,
    /// Number of rows.
    Count,
    /// Minimum value.
    Min,
    /// Maximum value.
    Max,
    /// Last value in row order.
    Last,
}

/// Field names a pivot reads from each row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PivotFields<'a> {
    /// Category (x) field.
    pub category: &'a str,
    /// Value (y) field.
    pub value: &'a str,
    /// Optional series field; without it every row belongs to one series named after `value`.
    pub series: Option<&'a str>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Cell {
    rows: u32,
    values: u32,
    sum: f64,
    min: f64,
    max: f64,
    last: f64,
}

impl Cell {
    fn push(&mut self, v: Option<f64>) {
        self.rows += 1;
        let Some(v) = v else {
            return;
        };
        if self.values == 0 {
            self.min = v;
            self.max = v;
        } else {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
        self.values += 1;
        self.sum += v;
        self.last = v;
    }

    fn finish(&self, op: AggregateOp) -> Option<f64> {
        if op == AggregateOp::Count {
            return (self.rows > 0).then_some(f64::from(self.rows));
        }
        if self.values == 0 {
            return None;
        }
        Some(match op {
            AggregateOp::Sum => self.sum,
            AggregateOp::Mean => self.sum / f64::from(self.values),
            AggregateOp::Min => self.min,
            AggregateOp::Max => self.max,
            AggregateOp::Last => self.last,
            AggregateOp::Count => f64::from(self.rows),
        })
    }
}

/// A dense category × series table.
#[derive(Clone, Debug, PartialEq)]
pub struct Pivot {
    /// Category labels in axis order.
    pub categories: Vec<String>,
    /// The raw cell each category was first seen as, aligned with `categories`.
    pub category_values: Vec<Value>,
    /// Series labels in first-seen order.
    pub series: Vec<String>,
    /// Aggregated values, indexed `[series][category]`.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl Pivot {
    /// Groups `rows` by category and series.
    ///
    /// Rows without a category label (or without a series label when a series field is
    /// configured) are skipped.
    pub fn build(rows: &[&Row], fields: PivotFields<'_>, op: AggregateOp) -> Self {
        let mut categories: Vec<String> = Vec::new();
        let mut category_values: Vec<Value> = Vec::new();
        let mut category_index: HashMap<String, usize> = HashMap::new();
        let mut series: Vec<String> = Vec::new();
        let mut series_index: HashMap<String, usize> = HashMap::new();
        let mut acc: Vec<Vec<Cell>> = Vec::new();
        let mut skipped = 0_usize;

        for row in rows {
            let Some(raw_cat) = row.get(fields.category) else {
                skipped += 1;
                continue;
            };
            let Some(cat) = label(raw_cat) else {
                skipped += 1;
                continue;
            };
            let series_name = match fields.series {
                Some(f) => match row.get(f).and_then(label) {
                    Some(s) => s,
                    None => {
                        skipped += 1;
                        continue;
                    }
                },
                None => String::from(fields.value),
            };

            let ci = *category_index.entry(cat.clone()).or_insert_with(|| {
                categories.push(cat);
                category_values.push(raw_cat.clone());
                for cells in &mut acc {
                    cells.push(Cell::default());
                }
                categories.len() - 1
            });
            let si = *series_index.entry(series_name.clone()).or_insert_with(|| {
                series.push(series_name);
                acc.push(vec![Cell::default(); categories.len()]);
                series.len() - 1
            });

            acc[si][ci].push(row.get(fields.value).and_then(number));
        }

        if skipped > 0 {
            log::trace!("pivot skipped {skipped} rows without category/series labels");
        }

        let cells = acc
            .iter()
            .map(|cells| cells.iter().map(|c| c.finish(op)).collect())
            .collect();
        Self {
            categories,
            category_values,
            series,
            cells,
        }
    }

    /// Returns `true` when no category was collected.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Reorders categories by parsed timestamp.
    ///
    /// Categories that do not parse keep their relative order after all parsed ones.
    pub fn sort_chronologically(&mut self) {
        let mut order: Vec<usize> = (0..self.categories.len()).collect();
        let keys: Vec<Option<i64>> = self
            .category_values
            .iter()
            .map(|v| parse_timestamp(v).map(|t| t.timestamp_millis()))
            .collect();
        order.sort_by_key(|&i| (keys[i].is_none(), keys[i].unwrap_or(0)));
        self.reorder(&order);
    }

    fn reorder(&mut self, order: &[usize]) {
        self.categories = order.iter().map(|&i| self.categories[i].clone()).collect();
        self.category_values = order
            .iter()
            .map(|&i| self.category_values[i].clone())
            .collect();
        for cells in &mut self.cells {
            *cells = order.iter().map(|&i| cells[i]).collect();
        }
    }

    /// Sum of present values per category, across series.
    pub fn category_totals(&self) -> Vec<f64> {
        (0..self.categories.len())
            .map(|ci| self.cells.iter().filter_map(|s| s[ci]).sum::<f64>())
            .collect()
    }

    /// Largest present value in the table.
    pub fn max_value(&self) -> Option<f64> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .copied()
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use serde_json::json;

    use super::*;

    fn rows(v: &Value) -> Vec<&Row> {
        v.as_array().unwrap().iter().filter_map(Value::as_object).collect()
    }

    const FIELDS: PivotFields<'static> = PivotFields {
        category: "date",
        value: "value",
        series: Some("chain"),
    };

    #[test]
    fn duplicates_are_summed_and_gaps_stay_empty() {
        let data = json!([
            {"date": "2025-01-02", "chain": "a", "value": 1},
            {"date": "2025-01-01", "chain": "a", "value": 2},
            {"date": "2025-01-01", "chain": "a", "value": "3"},
            {"date": "2025-01-01", "chain": "b", "value": 4},
        ]);
        let p = Pivot::build(&rows(&data), FIELDS, AggregateOp::Sum);
        assert_eq!(p.categories, ["2025-01-02", "2025-01-01"]);
        assert_eq!(p.series, ["a", "b"]);
        assert_eq!(p.cells[0], [Some(1.0), Some(5.0)]);
        assert_eq!(p.cells[1], [None, Some(4.0)]);
    }

    #[test]
    fn chronological_sort_moves_every_series() {
        let data = json!([
            {"date": "2025-01-02", "chain": "a", "value": 1},
            {"date": "2025-01-01", "chain": "a", "value": 2},
            {"date": "2025-01-01", "chain": "b", "value": 4},
        ]);
        let mut p = Pivot::build(&rows(&data), FIELDS, AggregateOp::Sum);
        p.sort_chronologically();
        assert_eq!(p.categories, ["2025-01-01", "2025-01-02"]);
        assert_eq!(p.cells[0], [Some(2.0), Some(1.0)]);
        assert_eq!(p.cells[1], [Some(4.0), None]);
        assert_eq!(p.category_totals(), [6.0, 1.0]);
    }

    #[test]
    fn ops_and_unparseable_values() {
        let data = json!([
            {"date": "x", "value": 2},
            {"date": "x", "value": "n/a"},
            {"date": "x", "value": 6},
        ]);
        let fields = PivotFields {
            series: None,
            ..FIELDS
        };
        let r = rows(&data);
        let get = |op| Pivot::build(&r, fields, op).cells[0][0];
        assert_eq!(get(AggregateOp::Mean), Some(4.0));
        assert_eq!(get(AggregateOp::Count), Some(3.0));
        assert_eq!(get(AggregateOp::Min), Some(2.0));
        assert_eq!(get(AggregateOp::Max), Some(6.0));
        assert_eq!(get(AggregateOp::Last), Some(6.0));
        assert_eq!(Pivot::build(&r, fields, AggregateOp::Sum).series, ["value"]);
    }

    #[test]
    fn rows_without_labels_are_skipped() {
        let data = json!([
            {"chain": "a", "value": 1},
            {"date": "", "chain": "a", "value": 1},
            {"date": "d", "value": 1},
        ]);
        assert!(Pivot::build(&rows(&data), FIELDS, AggregateOp::Sum).is_empty());
    }
}
