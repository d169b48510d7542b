// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data model shared by the ChartIR option compiler.
//!
//! The compiler is a pure function from `(rows, config, dark_mode)` to a declarative chart
//! option. This crate holds the pieces every stage of that pipeline needs:
//! - **Rows**: loosely typed records (`serde_json` objects) plus lenient coercions.
//! - **Field resolution**: picking the field actually present in the data.
//! - **Themes**: light/dark text and guide colors.
//! - **Options**: the canonical "no data" option and an immutable deep merge.
//!
//! Nothing here renders or fetches anything.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod error;
mod field;
mod option;
mod row;
mod theme;

pub use error::InputError;
pub use field::{FieldCandidates, resolve_field, resolve_field_in};
pub use option::{NO_DATA_LABEL, empty_option, merge_options};
pub use row::{Row, is_blank, label, number, records};
pub use theme::{Theme, css_color};
