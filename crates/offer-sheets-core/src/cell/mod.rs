//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellAddress`], [`CellReference`] and [`CellRange`] - the reference codec
//! - [`CellKey`] - the `"row-col"` key formulas are indexed by
//! - [`RawValue`] - host-owned cell content
//! - [`CellError`] - the user-visible error taxonomy

mod address;
mod key;
mod value;

pub use address::{format_reference, CellAddress, CellRange, CellRangeIterator, CellReference};
pub use key::CellKey;
pub use value::{format_number, parse_number, CellError, RawValue};
