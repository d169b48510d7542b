// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field resolution against loosely specified configuration.
//!
//! Dashboard configs name fields by convention (`value`, `date`, `category`) and those names
//! drift from what queries actually return. Resolution tries, in order:
//! 1. the configured field, exactly;
//! 2. the configured field, ignoring ASCII case;
//! 3. each fallback, exactly, then ignoring ASCII case.
//!
//! Rows need not share one shape, so [`resolve_field_in`] looks each candidate up across
//! every record before moving on to the next candidate.

use crate::Row;

/// A preferred field name plus ordered fallbacks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldCandidates<'a> {
    /// Field named by configuration, if any.
    pub preferred: Option<&'a str>,
    /// Conventional names tried when the preferred field is absent.
    pub fallbacks: &'a [&'a str],
}

impl<'a> FieldCandidates<'a> {
    /// Creates candidates from an optional configured name and fallbacks.
    pub fn new(preferred: Option<&'a str>, fallbacks: &'a [&'a str]) -> Self {
        Self {
            preferred,
            fallbacks,
        }
    }

    /// Resolves against a row shape. See [`resolve_field`].
    pub fn resolve<'r>(&self, row: &'r Row) -> Option<&'r str> {
        resolve_field(row, self.preferred, self.fallbacks)
    }

    /// Resolves against a set of records. See [`resolve_field_in`].
    pub fn resolve_in<'r>(&self, rows: &[&'r Row]) -> Option<&'r str> {
        resolve_field_in(rows, self.preferred, self.fallbacks)
    }
}

/// Picks the field actually present in `row`.
///
/// Returns the row's own spelling of the key, so the result can be used for lookups even
/// when it matched case-insensitively. Returns `None` when nothing matches.
pub fn resolve_field<'r>(
    row: &'r Row,
    preferred: Option<&str>,
    fallbacks: &[&str],
) -> Option<&'r str> {
    preferred
        .into_iter()
        .chain(fallbacks.iter().copied())
        .filter(|name| !name.is_empty())
        .find_map(|name| lookup(row, name))
}

/// Picks the field for records whose shapes may differ.
///
/// Candidates keep their priority across rows: the preferred name wins when any record
/// carries it, even if an earlier record only carries a fallback. The spelling returned is
/// the one used by the first record carrying the winning candidate.
pub fn resolve_field_in<'r>(
    rows: &[&'r Row],
    preferred: Option<&str>,
    fallbacks: &[&str],
) -> Option<&'r str> {
    preferred
        .into_iter()
        .chain(fallbacks.iter().copied())
        .filter(|name| !name.is_empty())
        .find_map(|name| rows.iter().find_map(|&row| lookup(row, name)))
}

fn lookup<'r>(row: &'r Row, name: &str) -> Option<&'r str> {
    if let Some((key, _)) = row.get_key_value(name) {
        return Some(key.as_str());
    }
    row.keys()
        .find(|key| key.eq_ignore_ascii_case(name))
        .map(|key| key.as_str())
}
