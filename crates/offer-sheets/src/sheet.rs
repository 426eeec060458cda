//! Host grid integration
//!
//! [`Sheet`] sits between the grid widget and the formula engine. The
//! grid keeps owning the raw cell content; the sheet keeps the engine in
//! step with it, answers display requests and tells subscribers which
//! cells to re-render.
//!
//! # Example
//!
//! ```rust
//! use offer_sheets::prelude::*;
//!
//! let grid = DataGrid::from_rows(vec![
//!     vec![RawValue::from(5.0), RawValue::from("=A1*2")],
//! ]);
//! let mut sheet = Sheet::new(grid);
//! assert_eq!(sheet.display_value(0, 1), FormulaValue::Number(10.0));
//!
//! let changed = sheet.set_value(0, 0, RawValue::from(7.0));
//! assert_eq!(changed, vec![CellKey::new(0, 0), CellKey::new(0, 1)]);
//! assert_eq!(sheet.display_value(0, 1), FormulaValue::Number(14.0));
//! ```

use crate::events::{CellChange, Selection, SelectionSummary};
use ahash::AHashMap;
use offer_sheets_core::{
    CellAddress, CellKey, CellRange, CellStyle, Error, HostGrid, RawValue, Result,
};
use offer_sheets_formula::{adjust_formula, EngineOptions, FormulaEngine, FormulaValue};

/// Callback receiving the keys of cells that need re-rendering
pub type ChangeListener = Box<dyn FnMut(&[CellKey])>;

/// A host grid wired to a formula engine
pub struct Sheet<G: HostGrid> {
    grid: G,
    engine: FormulaEngine,
    styles: AHashMap<CellKey, CellStyle>,
    listeners: Vec<ChangeListener>,
}

impl<G: HostGrid> Sheet<G> {
    /// Wrap a grid, recording every formula it already holds
    pub fn new(grid: G) -> Self {
        Self::with_options(grid, EngineOptions::default())
    }

    /// Wrap a grid with custom engine options
    pub fn with_options(grid: G, options: EngineOptions) -> Self {
        let mut engine = FormulaEngine::with_options(options);
        engine.load(&grid);
        Self {
            grid,
            engine,
            styles: AHashMap::new(),
            listeners: Vec::new(),
        }
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn engine(&self) -> &FormulaEngine {
        &self.engine
    }

    /// Unwrap the grid
    pub fn into_grid(self) -> G {
        self.grid
    }

    /// Register a callback for changed-cell notifications
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&[CellKey]) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, keys: &[CellKey]) {
        if keys.is_empty() {
            return;
        }
        for listener in &mut self.listeners {
            listener(keys);
        }
    }

    /// Handle an edit the host grid has already stored
    ///
    /// Returns the edited cell and its transitive dependents in the order
    /// they should be re-rendered; subscribers receive the same list.
    pub fn on_edit(&mut self, change: &CellChange) -> Vec<CellKey> {
        self.on_edits(std::slice::from_ref(change))
    }

    /// Handle several stored edits with one rebuild and one notification
    pub fn on_edits(&mut self, changes: &[CellChange]) -> Vec<CellKey> {
        let keys = self
            .engine
            .update_many(changes.iter().map(|c| (c.key(), &c.new_value)));
        self.notify(&keys);
        keys
    }

    /// Handle content the host grid pasted on its own
    pub fn on_paste(&mut self, changes: &[CellChange]) -> Vec<CellKey> {
        self.on_edits(changes)
    }

    /// Write content through the grid and process it as an edit
    pub fn set_value(&mut self, row: u32, col: u32, value: RawValue) -> Vec<CellKey> {
        let old_value = self.grid.raw_value(row, col);
        self.grid.set_value(row, col, value.clone());
        self.on_edit(&CellChange {
            row,
            col,
            old_value,
            new_value: value,
        })
    }

    /// Copy `source` so that its top-left cell lands on `dest`
    ///
    /// Formulas are adjusted for the move, keeping `$` components fixed.
    /// Everything is read before anything is written, so overlapping
    /// source and destination are fine.
    pub fn paste(&mut self, source: CellRange, dest: CellAddress) -> Result<Vec<CellKey>> {
        let max = self.engine.options().max_range_cells;
        if source.cell_count() > max {
            return Err(Error::other(format!(
                "Cannot paste {}: more than {} cells",
                source, max
            )));
        }

        let row_offset = dest.row as i64 - source.start.row as i64;
        let col_offset = dest.col as i64 - source.start.col as i64;

        let mut writes = Vec::with_capacity(source.cell_count() as usize);
        for addr in source.cells() {
            let target = addr.offset(row_offset, col_offset).ok_or_else(|| {
                Error::other(format!("Pasting {} at {} leaves the grid", source, dest))
            })?;
            let content = match self.grid.raw_value_at(addr) {
                RawValue::Text(formula) if formula.starts_with('=') => RawValue::Text(
                    adjust_formula(&formula, addr.row, addr.col, target.row, target.col),
                ),
                other => other,
            };
            writes.push((CellKey::from(target), content));
        }

        for (key, content) in &writes {
            self.grid.set_value(key.row, key.col, content.clone());
        }
        log::debug!(
            "pasted {} at {} ({} cells, offset {},{})",
            source,
            dest,
            writes.len(),
            row_offset,
            col_offset
        );

        let keys = self
            .engine
            .update_many(writes.iter().map(|(key, content)| (*key, content)));
        self.notify(&keys);
        Ok(keys)
    }

    /// Summarize a selection for the formula bar and status bar
    pub fn on_selection_change(&self, selection: Selection) -> SelectionSummary {
        let anchor = selection.anchor();
        let raw = self.grid.raw_value_at(anchor);
        let formula = raw.formula_text().map(str::to_string);

        let mut numeric_count = 0;
        let mut sum = 0.0;
        let range = selection.range();
        if range.cell_count() <= self.engine.options().max_range_cells {
            let ctx = self.engine.context(&self.grid);
            for addr in range.cells() {
                if let Some(n) = ctx.value_at(addr).as_number() {
                    numeric_count += 1;
                    sum += n;
                }
            }
        } else {
            log::debug!("selection {} too large to summarize", range);
        }

        SelectionSummary {
            anchor,
            raw,
            formula,
            numeric_count,
            sum,
            average: (numeric_count > 0).then(|| sum / numeric_count as f64),
        }
    }

    /// The value to render at a cell
    pub fn display_value(&self, row: u32, col: u32) -> FormulaValue {
        self.engine.display_value(&self.grid, row, col)
    }

    /// The rendered text of a cell
    pub fn display_text(&self, row: u32, col: u32) -> String {
        self.display_value(row, col).as_text()
    }

    /// Every displayed value in the grid's used range, row by row
    pub fn display_values(&self) -> Vec<Vec<FormulaValue>> {
        let Some(used) = self.grid.used_range() else {
            return Vec::new();
        };

        let ctx = self.engine.context(&self.grid);
        (used.start.row..=used.end.row)
            .map(|row| {
                (used.start.col..=used.end.col)
                    .map(|col| ctx.cell_value(row, col))
                    .collect()
            })
            .collect()
    }

    /// Style of a cell (the default style if none was set)
    pub fn style_at(&self, row: u32, col: u32) -> CellStyle {
        self.styles
            .get(&CellKey::new(row, col))
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the style of a cell
    pub fn set_style(&mut self, row: u32, col: u32, style: CellStyle) {
        let key = CellKey::new(row, col);
        if style.is_default() {
            self.styles.remove(&key);
        } else {
            self.styles.insert(key, style);
        }
    }

    /// Apply a style change to every cell of a range
    ///
    /// # Example
    /// ```rust
    /// use offer_sheets::prelude::*;
    ///
    /// let mut sheet = Sheet::new(DataGrid::new());
    /// sheet.apply_style(CellRange::parse("A1:B2").unwrap(), |s| s.bold = true);
    /// assert!(sheet.style_at(1, 1).bold);
    /// assert!(!sheet.style_at(2, 2).bold);
    /// ```
    pub fn apply_style<F>(&mut self, range: CellRange, mut f: F)
    where
        F: FnMut(&mut CellStyle),
    {
        for addr in range.cells() {
            let mut style = self.style_at(addr.row, addr.col);
            f(&mut style);
            self.set_style(addr.row, addr.col, style);
        }
    }

    /// Number of cells carrying a non-default style
    pub fn styled_cell_count(&self) -> usize {
        self.styles.len()
    }
}
