// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input validation errors.

/// Reasons a row payload cannot be compiled.
///
/// Processors never surface these to their callers; they map every variant to the
/// canonical empty option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// The payload is not a JSON array.
    #[error("rows must be an array")]
    NotAnArray,
    /// The payload is an empty array.
    #[error("rows are empty")]
    Empty,
    /// The first row is not a JSON object.
    #[error("row {index} is not a record")]
    NotARecord {
        /// Position of the offending row.
        index: usize,
    },
}
