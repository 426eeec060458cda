//! # offer-sheets
//!
//! The spreadsheet engine behind the offer-management data table.
//!
//! The grid widget owns the raw cell content and reports edits, pastes
//! and selection changes. [`Sheet`] keeps the formula engine in step with
//! those reports and answers what each cell should display.
//!
//! ## Features
//!
//! - `A1` / `$A$1` / `A1:B5` references with relative and absolute parts
//! - SUM, AVERAGE, MIN, MAX, COUNT, ROUND, IF, VLOOKUP, CONCATENATE, LEN,
//!   TRIM, UPPER and LOWER
//! - Sandboxed arithmetic (no general-purpose `eval`)
//! - Dependency tracking with `#CIRCULAR!` detection
//! - Copy/paste with formula reference adjustment
//! - Per-cell styles stored alongside content
//!
//! ## Example
//!
//! ```rust
//! use offer_sheets::prelude::*;
//!
//! // D1:E3 holds a lookup table
//! let mut grid = DataGrid::new();
//! for (row, (id, name)) in [(1.0, "a"), (2.0, "b"), (3.0, "c")].into_iter().enumerate() {
//!     grid.set_value(row as u32, 3, RawValue::from(id));
//!     grid.set_value(row as u32, 4, RawValue::from(name));
//! }
//! grid.set_value(0, 0, RawValue::from("=VLOOKUP(2, D1:E3, 2, FALSE)"));
//!
//! let sheet = Sheet::new(grid);
//! assert_eq!(sheet.display_text(0, 0), "b");
//! ```

pub mod events;
pub mod prelude;
pub mod sheet;

pub use events::{CellChange, Selection, SelectionSummary};
pub use sheet::{ChangeListener, Sheet};

// Re-export core types
pub use offer_sheets_core::{
    format_reference, CellAddress, CellError, CellKey, CellRange, CellReference, CellSource,
    CellStyle, Color, DataGrid, Error, HorizontalAlignment, HostGrid, RawValue, Result,
};

// Re-export formula types
pub use offer_sheets_formula::{
    adjust_formula, evaluate_expression, registry, CircularSet, DependencyGraph, EngineOptions,
    EvaluationContext, ExprValue, FormulaEngine, FormulaError, FormulaMap, FormulaResult,
    FormulaValue, RebuildStats,
};
