//! Prelude module - common imports for offer-sheets users
//!
//! ```rust
//! use offer_sheets::prelude::*;
//! ```

pub use crate::{
    // Host interface
    CellChange,
    CellSource,
    DataGrid,
    HostGrid,
    Selection,
    SelectionSummary,
    Sheet,

    // Cell types
    CellAddress,
    CellError,
    CellKey,
    CellRange,
    CellReference,
    RawValue,

    // Style types
    CellStyle,
    Color,
    HorizontalAlignment,

    // Formula types
    adjust_formula,
    EngineOptions,
    FormulaEngine,
    FormulaValue,

    // Error types
    Error,
    Result,
};
