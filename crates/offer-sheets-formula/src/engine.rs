//! Sheet-level formula engine
//!
//! Owns the formula map for one sheet and keeps the dependency graph and
//! circular set derived from it. Every structural change is followed by a
//! full rebuild before any dependent cell is evaluated again.
//!
//! # Example
//!
//! ```rust
//! use offer_sheets_core::{CellKey, DataGrid, RawValue};
//! use offer_sheets_formula::{FormulaEngine, FormulaValue};
//!
//! let grid = DataGrid::from_rows(vec![vec![
//!     RawValue::from(10.0),
//!     RawValue::from("=A1*2"),
//!     RawValue::from("=B1+1"),
//! ]]);
//!
//! let mut engine = FormulaEngine::new();
//! engine.load(&grid);
//!
//! assert_eq!(engine.display_value(&grid, 0, 2), FormulaValue::Number(21.0));
//! assert_eq!(
//!     engine.affected_cells(&[CellKey::new(0, 0)]),
//!     vec![CellKey::new(0, 0), CellKey::new(0, 1), CellKey::new(0, 2)]
//! );
//! ```

use crate::dependency::{CircularSet, DependencyGraph};
use crate::evaluator::{EvaluationContext, FormulaValue};
use crate::formula_map::FormulaMap;
use crate::options::EngineOptions;
use ahash::AHashSet;
use offer_sheets_core::{CellKey, CellSource, RawValue};

/// Statistics from a dependency rebuild
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildStats {
    /// Total number of formula cells
    pub formula_count: usize,
    /// Number of dependency edges
    pub edge_count: usize,
    /// Number of cells on a cycle
    pub circular_references: usize,
    /// Whether a range was too large to track
    pub partial: bool,
}

/// The formula engine for one sheet
#[derive(Debug, Clone, Default)]
pub struct FormulaEngine {
    options: EngineOptions,
    formulas: FormulaMap,
    graph: DependencyGraph,
    circular: CircularSet,
}

impl FormulaEngine {
    /// Create an empty engine with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty engine with custom options
    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Replace the options and rebuild
    pub fn set_options(&mut self, options: EngineOptions) -> RebuildStats {
        self.options = options;
        self.rebuild()
    }

    /// Scan a whole grid, record every formula cell and rebuild
    pub fn load(&mut self, grid: &dyn CellSource) -> RebuildStats {
        self.formulas.clear();
        if let Some(used) = grid.used_range() {
            for addr in used.cells() {
                self.formulas.record(CellKey::from(addr), &grid.raw_value_at(addr));
            }
        }
        self.rebuild()
    }

    /// Record a cell's new raw content without rebuilding
    ///
    /// Returns `true` if the formula map changed. Callers batching edits
    /// must call [`FormulaEngine::rebuild`] before evaluating again.
    pub fn record(&mut self, key: CellKey, content: &RawValue) -> bool {
        self.formulas.record(key, content)
    }

    /// Recompute the dependency graph and circular set from the formula map
    pub fn rebuild(&mut self) -> RebuildStats {
        self.graph = DependencyGraph::build(&self.formulas, self.options.max_range_cells);
        self.circular = self.graph.detect_circular();

        let stats = RebuildStats {
            formula_count: self.formulas.len(),
            edge_count: self.graph.edge_count(),
            circular_references: self.circular.len(),
            partial: self.graph.is_partial(),
        };
        log::debug!(
            "rebuilt dependencies: {} formulas, {} edges, {} circular",
            stats.formula_count,
            stats.edge_count,
            stats.circular_references
        );
        stats
    }

    /// Apply one cell edit
    ///
    /// Returns the cells needing re-render: the edited cell and its
    /// transitive dependents, in dependency order.
    pub fn update(&mut self, key: CellKey, content: &RawValue) -> Vec<CellKey> {
        self.update_many(std::iter::once((key, content)))
    }

    /// Apply several edits with a single rebuild
    pub fn update_many<'v, I>(&mut self, edits: I) -> Vec<CellKey>
    where
        I: IntoIterator<Item = (CellKey, &'v RawValue)>,
    {
        let mut changed = Vec::new();
        let mut structural = false;
        for (key, content) in edits {
            structural |= self.record(key, content);
            changed.push(key);
        }

        if structural {
            self.rebuild();
        }
        self.affected_cells(&changed)
    }

    /// Cells to re-render after `changed` were edited
    ///
    /// When the graph is partial every formula cell is included.
    pub fn affected_cells(&self, changed: &[CellKey]) -> Vec<CellKey> {
        if !self.graph.is_partial() {
            return self.graph.recalc_order(changed);
        }

        let mut seen = AHashSet::new();
        changed
            .iter()
            .copied()
            .chain(self.formulas.keys_sorted())
            .filter(|key| seen.insert(*key))
            .collect()
    }

    /// Whether a cell lies on a dependency cycle
    pub fn is_circular(&self, key: CellKey) -> bool {
        self.circular.contains(key)
    }

    pub fn circular(&self) -> &CircularSet {
        &self.circular
    }

    pub fn formulas(&self) -> &FormulaMap {
        &self.formulas
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Evaluation context over a grid
    pub fn context<'a>(&'a self, grid: &'a dyn CellSource) -> EvaluationContext<'a> {
        EvaluationContext::new(grid, &self.formulas, &self.circular, &self.options)
    }

    /// Evaluate formula text as if stored at `(row, col)`
    pub fn evaluate(&self, grid: &dyn CellSource, formula: &str, row: u32, col: u32) -> FormulaValue {
        self.context(grid).evaluate_formula(formula, row, col)
    }

    /// The value to display at a cell: its formula result, or its raw content
    pub fn display_value(&self, grid: &dyn CellSource, row: u32, col: u32) -> FormulaValue {
        self.context(grid).cell_value(row, col)
    }
}
