//! Sandboxed expression evaluation
//!
//! Evaluates the arithmetic left over once references have been replaced
//! by numbers. The only inputs are the parsed tree and the fixed helper
//! set in [`MathFunction`]; there is no access to cells, names or any
//! other state.

use crate::ast::{BinaryOperator, Expr, MathFunction, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::parser::parse_expression;
use offer_sheets_core::format_number;
use std::fmt;

/// Result of an expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExprValue {
    Number(f64),
    Boolean(bool),
}

impl ExprValue {
    /// Numeric view; booleans count as 1 and 0
    pub fn as_number(&self) -> f64 {
        match self {
            ExprValue::Number(n) => *n,
            ExprValue::Boolean(true) => 1.0,
            ExprValue::Boolean(false) => 0.0,
        }
    }

    /// Truthiness: non-zero numbers and `TRUE`
    pub fn is_truthy(&self) -> bool {
        match self {
            ExprValue::Number(n) => *n != 0.0 && !n.is_nan(),
            ExprValue::Boolean(b) => *b,
        }
    }
}

impl fmt::Display for ExprValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprValue::Number(n) => f.write_str(&format_number(*n)),
            ExprValue::Boolean(true) => f.write_str("TRUE"),
            ExprValue::Boolean(false) => f.write_str("FALSE"),
        }
    }
}

/// Parse and evaluate an expression
///
/// A result that is NaN or infinite is an error.
///
/// # Example
/// ```
/// use offer_sheets_formula::{evaluate_expression, ExprValue};
///
/// assert_eq!(evaluate_expression("2 + 3 * 4").unwrap(), ExprValue::Number(14.0));
/// assert_eq!(evaluate_expression("(-5) < 2").unwrap(), ExprValue::Boolean(true));
/// assert!(evaluate_expression("1/0").is_err());
/// assert!(evaluate_expression("process.exit(1)").is_err());
/// ```
pub fn evaluate_expression(text: &str) -> FormulaResult<ExprValue> {
    let expr = parse_expression(text)?;
    let value = evaluate(&expr);

    match value {
        ExprValue::Number(n) if !n.is_finite() => Err(FormulaError::NonFinite),
        value => Ok(value),
    }
}

/// Evaluate a parsed expression
///
/// Intermediate infinities are allowed (`1/0 > 5` is `TRUE`); only
/// [`evaluate_expression`] rejects a non-finite final result.
pub fn evaluate(expr: &Expr) -> ExprValue {
    match expr {
        Expr::Number(n) => ExprValue::Number(*n),
        Expr::Boolean(b) => ExprValue::Boolean(*b),

        Expr::Unary { op, operand } => {
            let value = evaluate(operand).as_number();
            match op {
                UnaryOperator::Negate => ExprValue::Number(-value),
                UnaryOperator::Plus => ExprValue::Number(value),
            }
        }

        Expr::Binary { op, left, right } => {
            let left = evaluate(left);
            let right = evaluate(right);
            evaluate_binary(*op, left, right)
        }

        Expr::Call { function, args } => {
            let args: Vec<f64> = args.iter().map(|a| evaluate(a).as_number()).collect();
            ExprValue::Number(call_math(*function, &args))
        }
    }
}

fn evaluate_binary(op: BinaryOperator, left: ExprValue, right: ExprValue) -> ExprValue {
    if op.is_comparison() {
        return ExprValue::Boolean(compare(op, left, right));
    }

    let (l, r) = (left.as_number(), right.as_number());
    let n = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => l / r,
        BinaryOperator::Power => l.powf(r),
        _ => f64::NAN,
    };
    ExprValue::Number(n)
}

fn compare(op: BinaryOperator, left: ExprValue, right: ExprValue) -> bool {
    if let (ExprValue::Boolean(l), ExprValue::Boolean(r)) = (left, right) {
        return match op {
            BinaryOperator::Equal => l == r,
            BinaryOperator::NotEqual => l != r,
            BinaryOperator::LessThan => !l & r,
            BinaryOperator::LessEqual => l <= r,
            BinaryOperator::GreaterThan => l & !r,
            BinaryOperator::GreaterEqual => l >= r,
            _ => false,
        };
    }

    let (l, r) = (left.as_number(), right.as_number());
    match op {
        BinaryOperator::Equal => l == r,
        BinaryOperator::NotEqual => l != r,
        BinaryOperator::LessThan => l < r,
        BinaryOperator::LessEqual => l <= r,
        BinaryOperator::GreaterThan => l > r,
        BinaryOperator::GreaterEqual => l >= r,
        _ => false,
    }
}

fn call_math(function: MathFunction, args: &[f64]) -> f64 {
    let first = args.first().copied().unwrap_or(f64::NAN);
    match function {
        MathFunction::Abs => first.abs(),
        MathFunction::Ceil => first.ceil(),
        MathFunction::Floor => first.floor(),
        // Halves round toward positive infinity
        MathFunction::Round => (first + 0.5).floor(),
        MathFunction::Max => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        MathFunction::Min => args.iter().copied().fold(f64::INFINITY, f64::min),
        MathFunction::Pow => first.powf(args.get(1).copied().unwrap_or(f64::NAN)),
        MathFunction::Sqrt => first.sqrt(),
        MathFunction::Sin => first.sin(),
        MathFunction::Cos => first.cos(),
        MathFunction::Tan => first.tan(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eval(text: &str) -> FormulaResult<ExprValue> {
        evaluate_expression(text)
    }

    fn number(text: &str) -> f64 {
        match eval(text) {
            Ok(ExprValue::Number(n)) => n,
            other => panic!("{text}: expected a number, got {other:?}"),
        }
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(number("1+2*3"), 7.0);
        assert_eq!(number("(1+2)*3"), 9.0);
        assert_eq!(number("10/4"), 2.5);
        assert_eq!(number("2^3^2"), 512.0);
        assert_eq!(number("-2^2"), 4.0);
        assert_eq!(number("5-(-3)"), 8.0);
        assert_eq!(number("1e2+.5"), 100.5);
    }

    #[test]
    fn test_comparisons_yield_booleans() {
        assert_eq!(eval("3 > 2"), Ok(ExprValue::Boolean(true)));
        assert_eq!(eval("3 <= 2"), Ok(ExprValue::Boolean(false)));
        assert_eq!(eval("2 == 2"), Ok(ExprValue::Boolean(true)));
        assert_eq!(eval("2 != 2"), Ok(ExprValue::Boolean(false)));
        assert_eq!(eval("TRUE = (1 < 2)"), Ok(ExprValue::Boolean(true)));
        assert_eq!(eval("1/0 > 5"), Ok(ExprValue::Boolean(true)));
        assert_eq!(ExprValue::Boolean(true).to_string(), "TRUE");
    }

    #[test]
    fn test_booleans_coerce_in_arithmetic() {
        assert_eq!(number("TRUE + TRUE"), 2.0);
        assert_eq!(number("(2 > 1) * 10"), 10.0);
    }

    #[test]
    fn test_math_helpers() {
        assert_eq!(number("abs(-4)"), 4.0);
        assert_eq!(number("ceil(1.2)"), 2.0);
        assert_eq!(number("floor(-1.2)"), -2.0);
        assert_eq!(number("round(2.5)"), 3.0);
        assert_eq!(number("round(-2.5)"), -2.0);
        assert_eq!(number("max(1, 7, 3)"), 7.0);
        assert_eq!(number("min(4, -1)"), -1.0);
        assert_eq!(number("pow(2, 10)"), 1024.0);
        assert_eq!(number("sqrt(81)"), 9.0);
        assert_eq!(number("sin(0) + cos(0) + tan(0)"), 1.0);
        assert!((number("PI") - std::f64::consts::PI).abs() < 1e-12);
        assert!((number("e") - std::f64::consts::E).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_results_are_errors() {
        assert_eq!(eval("1/0"), Err(FormulaError::NonFinite));
        assert_eq!(eval("0/0"), Err(FormulaError::NonFinite));
        assert_eq!(eval("sqrt(-1)"), Err(FormulaError::NonFinite));
        assert_eq!(eval("max()"), Err(FormulaError::NonFinite));
    }

    proptest! {
        #[test]
        fn unknown_identifiers_never_evaluate(
            name in "[a-zA-Z_][a-zA-Z0-9_]{0,12}",
            call in any::<bool>(),
        ) {
            let known = MathFunction::from_name(&name).is_some()
                || crate::ast::constant(&name).is_some()
                || name.eq_ignore_ascii_case("true")
                || name.eq_ignore_ascii_case("false");
            prop_assume!(!known);

            let text = if call { format!("1 + {}(2)", name) } else { format!("{} * 3", name) };
            prop_assert_eq!(eval(&text), Err(FormulaError::UnknownIdentifier(name)));
        }

        #[test]
        fn non_expression_characters_are_rejected(
            prefix in "[0-9+*/() -]{0,8}",
            c in prop::sample::select(vec!['"', '\'', ';', '[', ']', '{', '}', '`', '$', '#', '@', '\\', '?', ':']),
        ) {
            let text = format!("{}{}1", prefix, c);
            prop_assert!(eval(&text).is_err());
        }
    }
}
