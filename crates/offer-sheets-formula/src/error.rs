//! Formula error types

use offer_sheets_core::CellError;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
///
/// These never reach the renderer: the engine converts each one into the
/// [`CellError`] shown in the cell (see [`FormulaError::to_cell_error`]).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Formula or expression parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Formula evaluation error
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Identifier outside the expression whitelist
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Circular reference
    #[error("Circular reference detected")]
    CircularReference,

    /// Reference that cannot be used here
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Result was NaN or infinite
    #[error("Result is not a finite number")]
    NonFinite,

    /// An error value read from another cell
    #[error("Referenced cell shows {0}")]
    Propagated(CellError),
}

impl FormulaError {
    /// The error value displayed for this failure
    pub fn to_cell_error(&self) -> CellError {
        match self {
            FormulaError::CircularReference => CellError::Circular,
            FormulaError::Propagated(e) => *e,
            _ => CellError::Error,
        }
    }
}

impl From<FormulaError> for CellError {
    fn from(e: FormulaError) -> Self {
        e.to_cell_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cell_error() {
        assert_eq!(
            FormulaError::Parse("x".into()).to_cell_error(),
            CellError::Error
        );
        assert_eq!(
            FormulaError::CircularReference.to_cell_error(),
            CellError::Circular
        );
        assert_eq!(
            FormulaError::Propagated(CellError::NotAvailable).to_cell_error(),
            CellError::NotAvailable
        );
    }

    #[test]
    fn test_argument_count_message() {
        let err = FormulaError::ArgumentCount {
            function: "ROUND".into(),
            expected: "1 to 2".into(),
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Wrong number of arguments for ROUND: expected 1 to 2, got 3"
        );
    }
}
