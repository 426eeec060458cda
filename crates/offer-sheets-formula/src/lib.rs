//! # offer-sheets-formula
//!
//! Formula engine for the offer-sheets data table.
//!
//! This crate provides:
//! - Reference scanning over formula text (`A1`, `$A$1`, `A1:B5`)
//! - A sandboxed expression evaluator (tokenizer, recursive-descent
//!   parser, tree walker) with a fixed set of math helpers
//! - The function library: SUM, AVERAGE, MIN, MAX, COUNT, ROUND, IF,
//!   VLOOKUP, CONCATENATE, LEN, TRIM, UPPER and LOWER
//! - Dependency tracking with circular reference detection
//! - Reference adjustment for copied formulas
//!
//! ## Example
//!
//! ```rust
//! use offer_sheets_core::{DataGrid, RawValue};
//! use offer_sheets_formula::{adjust_formula, FormulaEngine, FormulaValue};
//!
//! let grid = DataGrid::from_rows(vec![
//!     vec![RawValue::from(15.0)],
//!     vec![RawValue::from("=IF(A1>10,\"High\",\"Low\")")],
//! ]);
//!
//! let mut engine = FormulaEngine::new();
//! engine.load(&grid);
//! assert_eq!(engine.display_value(&grid, 1, 0), FormulaValue::Text("High".into()));
//!
//! assert_eq!(adjust_formula("=A1+$B$2", 0, 0, 1, 1), "=B2+$B$2");
//! ```

pub mod adjust;
pub mod arguments;
pub mod ast;
pub mod dependency;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod formula_map;
pub mod functions;
pub mod options;
pub mod parser;
pub mod references;

pub use adjust::{adjust_formula, shift_formula};
pub use ast::{BinaryOperator, Expr, MathFunction, UnaryOperator};
pub use dependency::{CircularSet, DependencyGraph};
pub use engine::{FormulaEngine, RebuildStats};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{Argument, ArgumentKind, EvaluationContext, FormulaValue};
pub use expression::{evaluate_expression, ExprValue};
pub use formula_map::FormulaMap;
pub use functions::{registry, FunctionRegistry};
pub use options::EngineOptions;
pub use parser::parse_expression;
pub use references::{scan_references, ReferenceMatch, ReferenceToken};
