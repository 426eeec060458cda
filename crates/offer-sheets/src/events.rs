//! Notifications exchanged with the host grid

use offer_sheets_core::{CellAddress, CellKey, CellRange, RawValue};

/// One cell edit reported by the host grid
///
/// The host has already stored `new_value` by the time it reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct CellChange {
    pub row: u32,
    pub col: u32,
    pub old_value: RawValue,
    pub new_value: RawValue,
}

impl CellChange {
    /// Create a change record
    pub fn new(row: u32, col: u32, old_value: impl Into<RawValue>, new_value: impl Into<RawValue>) -> Self {
        Self {
            row,
            col,
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }

    pub fn key(&self) -> CellKey {
        CellKey::new(self.row, self.col)
    }
}

/// A rectangular selection as reported by the host
///
/// The start corner is the anchor (the cell the selection began at); it
/// may lie below or right of the end corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl Selection {
    /// Create a selection from its two corners
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    /// A single-cell selection
    pub fn cell(row: u32, col: u32) -> Self {
        Self::new(row, col, row, col)
    }

    /// The cell the selection started at
    pub fn anchor(&self) -> CellAddress {
        CellAddress::new(self.start_row, self.start_col)
    }

    /// The normalized range covered
    pub fn range(&self) -> CellRange {
        CellRange::from_indices(self.start_row, self.start_col, self.end_row, self.end_col)
    }
}

impl From<[u32; 4]> for Selection {
    fn from([start_row, start_col, end_row, end_col]: [u32; 4]) -> Self {
        Self::new(start_row, start_col, end_row, end_col)
    }
}

/// What a formula bar and status bar show for a selection
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSummary {
    pub anchor: CellAddress,
    /// Raw content of the anchor cell
    pub raw: RawValue,
    /// Formula text of the anchor cell, if it holds one
    pub formula: Option<String>,
    /// Number of cells whose displayed value is numeric
    pub numeric_count: usize,
    /// Sum of the numeric displayed values
    pub sum: f64,
    /// `sum / numeric_count`, when anything was numeric
    pub average: Option<f64>,
}
