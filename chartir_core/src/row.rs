// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row access and lenient value coercion.
//!
//! Rows arrive as whatever the data layer produced: numbers may be strings, dates may be
//! strings or epoch numbers, and fields may be missing entirely. The helpers here never
//! fail loudly; they return `None` and let the caller decide whether that means "skip the
//! row", "treat as zero" or "plot a gap".

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::{Map, Value};

use crate::InputError;

/// A single data record: field name to primitive value.
pub type Row = Map<String, Value>;

/// Validates a row payload and borrows its records.
///
/// The payload must be a non-empty array whose first element is an object. Later elements
/// that are not objects are skipped rather than failing the whole payload.
pub fn records(rows: &Value) -> Result<Vec<&Row>, InputError> {
    let Value::Array(items) = rows else {
        return Err(InputError::NotAnArray);
    };
    let Some(first) = items.first() else {
        return Err(InputError::Empty);
    };
    if !first.is_object() {
        return Err(InputError::NotARecord { index: 0 });
    }
    Ok(items.iter().filter_map(Value::as_object).collect())
}

/// Coerces a cell to a finite number.
///
/// Numeric strings (optionally with thousands separators) are accepted; everything else,
/// including non-finite results, yields `None`.
pub fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed.contains(',') {
                trimmed.replace(',', "").parse::<f64>().ok()?
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Coerces a cell to a display label.
///
/// Blank strings and nulls yield `None`; numbers and booleans use their JSON spelling.
pub fn label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| String::from(trimmed))
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Returns `true` for nulls and whitespace-only strings.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
