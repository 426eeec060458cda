//! Expression syntax tree
//!
//! The tree produced for plain arithmetic expressions once every cell
//! reference has been replaced by its value. Only numbers, booleans and a
//! fixed set of math helpers can be represented.

use std::fmt;

/// Expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal (also `PI` and `E`)
    Number(f64),
    /// Boolean literal
    Boolean(bool),
    /// Unary operation
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    /// Binary operation
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Call to a whitelisted math helper
    Call { function: MathFunction, args: Vec<Expr> },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        !matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Power
        )
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Plus,
}

/// Math helpers callable from an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathFunction {
    Abs,
    Ceil,
    Floor,
    Round,
    Max,
    Min,
    Pow,
    Sqrt,
    Sin,
    Cos,
    Tan,
}

impl MathFunction {
    /// Resolve a helper name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let f = match name.to_ascii_lowercase().as_str() {
            "abs" => MathFunction::Abs,
            "ceil" => MathFunction::Ceil,
            "floor" => MathFunction::Floor,
            "round" => MathFunction::Round,
            "max" => MathFunction::Max,
            "min" => MathFunction::Min,
            "pow" => MathFunction::Pow,
            "sqrt" => MathFunction::Sqrt,
            "sin" => MathFunction::Sin,
            "cos" => MathFunction::Cos,
            "tan" => MathFunction::Tan,
            _ => return None,
        };
        Some(f)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MathFunction::Abs => "abs",
            MathFunction::Ceil => "ceil",
            MathFunction::Floor => "floor",
            MathFunction::Round => "round",
            MathFunction::Max => "max",
            MathFunction::Min => "min",
            MathFunction::Pow => "pow",
            MathFunction::Sqrt => "sqrt",
            MathFunction::Sin => "sin",
            MathFunction::Cos => "cos",
            MathFunction::Tan => "tan",
        }
    }

    /// Accepted argument counts as `(min, max)`; `None` = unlimited
    pub fn arity(&self) -> (usize, Option<usize>) {
        match self {
            MathFunction::Max | MathFunction::Min => (0, None),
            MathFunction::Pow => (2, Some(2)),
            _ => (1, Some(1)),
        }
    }
}

impl fmt::Display for MathFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a named constant (case-insensitive)
pub fn constant(name: &str) -> Option<f64> {
    match name.to_ascii_uppercase().as_str() {
        "PI" => Some(std::f64::consts::PI),
        "E" => Some(std::f64::consts::E),
        _ => None,
    }
}
