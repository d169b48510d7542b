// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row analysis passes for ChartIR.
//!
//! These are the "middle-end" of the option compiler. Each pass reads rows or values and
//! returns a plain summary that chart processors lower into options:
//! - **Time**: is a category axis temporal, and at what cadence is it sampled?
//! - **Stats**: percentile bounds for outlier-resistant color scales and widths.
//! - **Pivot**: category × series tables with duplicate aggregation.
//!
//! Every pass is a pure function of its input.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(not(feature = "std"))]
mod float;
mod pivot;
mod stats;
mod time;

pub use pivot::{AggregateOp, Pivot, PivotFields};
pub use stats::{Extent, percentile, quantile_bounds, sorted_finite};
pub use time::{
    Granularity, SAMPLE_LIMIT, TimeAnalysis, analyze_time, parse_timestamp, parse_timestamp_str,
};
