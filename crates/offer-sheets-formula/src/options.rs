//! Engine configuration

/// Options controlling formula evaluation and dependency tracking
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineOptions {
    /// Numeric tolerance for VLOOKUP approximate matching (default: 1e-4)
    pub approximate_match_tolerance: f64,
    /// Ranges with more cells than this are left out of the dependency
    /// graph, which then falls back to full recalculation (default: 1,000,000)
    pub max_range_cells: u64,
    /// Maximum nesting of formula cells read during one evaluation (default: 256)
    pub max_evaluation_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            approximate_match_tolerance: 1e-4,
            max_range_cells: 1_000_000,
            max_evaluation_depth: 256,
        }
    }
}

impl EngineOptions {
    /// Set the VLOOKUP approximate-match tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.approximate_match_tolerance = tolerance.abs();
        self
    }

    /// Set the largest range expanded into the dependency graph
    pub fn with_max_range_cells(mut self, cells: u64) -> Self {
        self.max_range_cells = cells;
        self
    }

    /// Set the maximum formula nesting depth
    pub fn with_max_evaluation_depth(mut self, depth: usize) -> Self {
        self.max_evaluation_depth = depth;
        self
    }
}
