//! Host grid interface
//!
//! The grid widget owns the raw cell data. The engine reads it through
//! [`CellSource`] and writes pasted content back through [`HostGrid`].

use crate::cell::{CellAddress, CellRange, RawValue};

/// Read access to raw cell content
pub trait CellSource {
    /// Underlying stored content at `(row, col)`, formulas included as text
    fn raw_value(&self, row: u32, col: u32) -> RawValue;

    /// Number of rows and columns currently holding data
    fn dimensions(&self) -> (u32, u32);

    /// Raw content at an address
    fn raw_value_at(&self, addr: CellAddress) -> RawValue {
        self.raw_value(addr.row, addr.col)
    }

    /// Range covering every populated row and column, if any
    fn used_range(&self) -> Option<CellRange> {
        let (rows, cols) = self.dimensions();
        if rows == 0 || cols == 0 {
            return None;
        }
        Some(CellRange::from_indices(0, 0, rows - 1, cols - 1))
    }
}

/// A grid that also accepts writes (used when applying pasted formulas)
pub trait HostGrid: CellSource {
    /// Write raw content back to `(row, col)`
    fn set_value(&mut self, row: u32, col: u32, value: RawValue);
}

impl<T: CellSource + ?Sized> CellSource for &T {
    fn raw_value(&self, row: u32, col: u32) -> RawValue {
        (**self).raw_value(row, col)
    }

    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }
}

impl<T: CellSource + ?Sized> CellSource for &mut T {
    fn raw_value(&self, row: u32, col: u32) -> RawValue {
        (**self).raw_value(row, col)
    }

    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }
}

impl<T: HostGrid + ?Sized> HostGrid for &mut T {
    fn set_value(&mut self, row: u32, col: u32, value: RawValue) {
        (**self).set_value(row, col, value)
    }
}

/// Row-major in-memory grid that grows on write
///
/// # Example
/// ```
/// use offer_sheets_core::{CellSource, DataGrid, RawValue};
///
/// let grid = DataGrid::from_rows(vec![
///     vec![RawValue::from(5.0), RawValue::from("=A1*2")],
/// ]);
/// assert_eq!(grid.dimensions(), (1, 2));
/// assert_eq!(grid.raw_value(0, 1), RawValue::from("=A1*2"));
/// assert_eq!(grid.raw_value(7, 7), RawValue::Empty);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataGrid {
    rows: Vec<Vec<RawValue>>,
    cols: u32,
}

impl DataGrid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid from rows of values (ragged rows are allowed)
    pub fn from_rows(rows: Vec<Vec<RawValue>>) -> Self {
        let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        Self { rows, cols }
    }

    /// Borrow the underlying rows
    pub fn rows(&self) -> &[Vec<RawValue>] {
        &self.rows
    }
}

impl CellSource for DataGrid {
    fn raw_value(&self, row: u32, col: u32) -> RawValue {
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .cloned()
            .unwrap_or_default()
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.rows.len() as u32, self.cols)
    }
}

impl HostGrid for DataGrid {
    fn set_value(&mut self, row: u32, col: u32, value: RawValue) {
        let (row, col) = (row as usize, col as usize);
        if row >= self.rows.len() {
            if value == RawValue::Empty {
                return;
            }
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if col >= cells.len() {
            if value == RawValue::Empty {
                return;
            }
            cells.resize(col + 1, RawValue::Empty);
        }
        cells[col] = value;
        self.cols = self.cols.max(col as u32 + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_grid_grows_on_write() {
        let mut grid = DataGrid::new();
        assert_eq!(grid.used_range(), None);

        grid.set_value(2, 3, RawValue::from(1.5));
        assert_eq!(grid.dimensions(), (3, 4));
        assert_eq!(grid.raw_value(2, 3), RawValue::Number(1.5));
        assert_eq!(grid.raw_value(0, 0), RawValue::Empty);
        assert_eq!(grid.used_range(), Some(CellRange::from_indices(0, 0, 2, 3)));
    }

    #[test]
    fn test_clearing_outside_bounds_is_a_no_op() {
        let mut grid = DataGrid::new();
        grid.set_value(10, 10, RawValue::Empty);
        assert_eq!(grid.dimensions(), (0, 0));
    }
}
