// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tiny scale utilities.
//!
//! Visual channels that encode magnitude (node size, edge width, word font size) map data
//! values through one of these scales. Both scales clamp to their range: an outlier beyond
//! the domain saturates instead of producing an oversized mark.
//!
//! Value axes use [`nice_ticks`] so precomputed axis labels land on round numbers.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// A clamped linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    ///
    /// A degenerate domain maps everything to the start of the range.
    pub fn map(&self, x: f64) -> f64 {
        let (r0, r1) = self.range;
        r0 + self.normalize(x) * (r1 - r0)
    }

    /// Position of `x` within the domain, clamped to `0..=1`.
    pub fn normalize(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let denom = d1 - d0;
        if denom == 0.0 || !denom.is_finite() || !x.is_finite() {
            return 0.0;
        }
        ((x - d0) / denom).clamp(0.0, 1.0)
    }
}

/// A clamped square-root mapping.
///
/// Interpolates between `sqrt(d0)` and `sqrt(d1)`, so the mark's *area* rather than its
/// linear extent tracks the value. Negative inputs are treated as zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleSqrt {
    inner: ScaleLinear,
}

impl ScaleSqrt {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new((root(domain.0), root(domain.1)), range),
        }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        self.inner.map(root(x))
    }

    /// Position of `sqrt(x)` within the rooted domain, clamped to `0..=1`.
    pub fn normalize(&self, x: f64) -> f64 {
        self.inner.normalize(root(x))
    }
}

fn root(x: f64) -> f64 {
    x.max(0.0).sqrt()
}

/// Returns round tick values covering `min..=max` with roughly `count` intervals.
///
/// The first and last ticks enclose the input range.
pub fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let step = nice_step((max - min) / count as f64);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;

    let n_f = ((stop - start) / step).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        0
    };
    (0..=n).map(|i| start + step * i as f64).collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn linear_maps_and_clamps() {
        let s = ScaleLinear::new((0.0, 10.0), (100.0, 200.0));
        assert_eq!(s.map(5.0), 150.0);
        assert_eq!(s.map(-5.0), 100.0);
        assert_eq!(s.map(50.0), 200.0);
    }

    #[test]
    fn degenerate_domain_maps_to_range_start() {
        let s = ScaleLinear::new((3.0, 3.0), (1.0, 8.0));
        assert_eq!(s.map(3.0), 1.0);
        assert_eq!(s.map(f64::NAN), 1.0);
    }

    #[test]
    fn sqrt_compresses_large_values() {
        let s = ScaleSqrt::new((0.0, 100.0), (0.0, 10.0));
        assert_eq!(s.map(25.0), 5.0);
        assert_eq!(s.map(100.0), 10.0);
        assert_eq!(s.map(400.0), 10.0);
        assert_eq!(s.map(-4.0), 0.0);
    }

    #[test]
    fn ticks_enclose_the_range() {
        assert_eq!(nice_ticks(0.0, 95.0, 5), [0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(nice_ticks(3.0, 3.0, 5), [3.0]);
        assert!(nice_ticks(0.0, f64::NAN, 5).is_empty());
    }
}
