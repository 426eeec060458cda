//! # offer-sheets-core
//!
//! Core data structures for the offer-sheets data-table engine.
//!
//! This crate provides the fundamental types used throughout offer-sheets:
//! - [`CellAddress`], [`CellReference`] and [`CellRange`] - Cell addressing
//!   and the `A1` / `$A$1` / `A1:B5` reference codec
//! - [`CellKey`] - The `"row-col"` key used to index formulas
//! - [`RawValue`] - Host-owned cell content (`string | number | null`)
//! - [`CellError`] - `#ERROR!`, `#CIRCULAR!` and `#N/A`
//! - [`CellStyle`] - Per-cell formatting stored alongside content
//! - [`CellSource`], [`HostGrid`] and [`DataGrid`] - The host grid interface
//!
//! ## Example
//!
//! ```rust
//! use offer_sheets_core::{CellRange, CellReference};
//!
//! let r = CellReference::parse("$C7").unwrap();
//! assert_eq!((r.row(), r.col()), (6, 2));
//! assert_eq!(r.to_string(), "$C7");
//!
//! let range = CellRange::parse("B5:A1").unwrap();
//! assert_eq!(range.to_string(), "A1:B5");
//! ```

pub mod cell;
pub mod error;
pub mod grid;
pub mod style;

// Re-exports for convenience
pub use cell::{
    format_number, format_reference, parse_number, CellAddress, CellError, CellKey, CellRange,
    CellRangeIterator, CellReference, RawValue,
};
pub use error::{Error, Result};
pub use grid::{CellSource, DataGrid, HostGrid};
pub use style::{CellStyle, Color, HorizontalAlignment};
