// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Order statistics used for outlier-resistant bounds.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Closed numeric range of a value set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

impl Extent {
    /// Computes the extent of the finite values in `values`.
    ///
    /// Returns `None` when there are no finite values.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Self>, v| {
                Some(match acc {
                    None => Self { min: v, max: v },
                    Some(e) => Self {
                        min: e.min.min(v),
                        max: e.max.max(v),
                    },
                })
            })
    }

    /// Width of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Widens the range symmetrically around `center` so both ends are equidistant from it.
    pub fn centered_on(&self, center: f64) -> Self {
        let spread = (self.max - center).abs().max((center - self.min).abs());
        Self {
            min: center - spread,
            max: center + spread,
        }
    }
}

/// Returns the `p`-th percentile (`0..=100`) of an ascending slice.
///
/// Uses linear interpolation between closest ranks. Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let (first, last) = (sorted.first()?, sorted.last()?);
    if sorted.len() == 1 {
        return Some(*first);
    }
    let p = p.clamp(0.0, 100.0) / 100.0;
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor();
    let hi = rank.ceil();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "rank is within 0..len by construction"
    )]
    let (lo_i, hi_i) = (lo as usize, hi as usize);
    let (Some(a), Some(b)) = (sorted.get(lo_i), sorted.get(hi_i)) else {
        return Some(*last);
    };
    Some(a + (b - a) * (rank - lo))
}

/// Sorts the finite values of `values` ascending.
pub fn sorted_finite(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    out.sort_by(f64::total_cmp);
    out
}

/// Lower/upper percentile bounds of a value set.
///
/// Falls back to the true extent when the percentiles collapse onto a single value (for
/// example when most values are identical), so the result always has a usable width when
/// the data does.
pub fn quantile_bounds(
    values: impl IntoIterator<Item = f64>,
    lower: f64,
    upper: f64,
) -> Option<Extent> {
    let sorted = sorted_finite(values);
    let lo = percentile(&sorted, lower)?;
    let hi = percentile(&sorted, upper)?;
    if hi > lo {
        return Some(Extent { min: lo, max: hi });
    }
    Extent::of(sorted.iter().copied())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn percentile_interpolates_between_ranks() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&v, 0.0), Some(1.0));
        assert_eq!(percentile(&v, 100.0), Some(4.0));
        assert_eq!(percentile(&v, 50.0), Some(2.5));
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[7.0], 90.0), Some(7.0));
    }

    #[test]
    fn bounds_are_inside_extent_for_spread_data() {
        let values = (1..=100).map(f64::from);
        let b = quantile_bounds(values, 5.0, 95.0).unwrap();
        assert!(b.min > 1.0 && b.max < 100.0, "{b:?}");
    }

    #[test]
    fn collapsed_bounds_fall_back_to_extent() {
        let mut values = std::vec![5.0; 50];
        values.push(1.0);
        values.push(9.0);
        let b = quantile_bounds(values, 5.0, 95.0).unwrap();
        assert_eq!(b, Extent { min: 1.0, max: 9.0 });
    }

    #[test]
    fn centering_is_symmetric() {
        let e = Extent { min: -2.0, max: 10.0 }.centered_on(0.0);
        assert_eq!(e, Extent { min: -10.0, max: 10.0 });
    }

    #[test]
    fn extent_skips_non_finite() {
        let e = Extent::of([f64::NAN, 3.0, -1.0, f64::INFINITY]).unwrap();
        assert_eq!(e, Extent { min: -1.0, max: 3.0 });
        assert!(Extent::of([f64::NAN]).is_none());
    }
}
