//! Logical functions

use crate::arguments::find_top_level;
use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::{Argument, EvaluationContext, FormulaValue};
use offer_sheets_core::parse_number;
use std::cmp::Ordering;

/// Comparison operators recognized in an IF condition, longest first
const CONDITION_OPERATORS: [&str; 7] = [">=", "<=", "<>", "!=", "=", ">", "<"];

/// IF(condition, value_if_true, [value_if_false])
///
/// A condition with one top-level comparison has each side resolved on
/// its own and compared numerically when both sides are numbers, as text
/// otherwise. Anything else is evaluated as a boolean expression.
pub fn fn_if(args: &[Argument<'_>], ctx: &EvaluationContext<'_>) -> FormulaResult<FormulaValue> {
    let condition = match evaluate_condition(args[0].text, ctx)? {
        Ok(b) => b,
        Err(error) => return Ok(error),
    };

    match (condition, args.get(2)) {
        (true, _) => ctx.value_of(&args[1]),
        (false, Some(branch)) => ctx.value_of(branch),
        (false, None) => Ok(FormulaValue::Boolean(false)),
    }
}

/// Evaluate a condition to a boolean, or to the error value it ran into
fn evaluate_condition(
    condition: &str,
    ctx: &EvaluationContext<'_>,
) -> FormulaResult<Result<bool, FormulaValue>> {
    let Some((pos, op)) = find_top_level(condition, &CONDITION_OPERATORS) else {
        return match ctx.value_of(&Argument::parse(condition))? {
            error @ FormulaValue::Error(_) => Ok(Err(error)),
            value => value.as_bool().map(Ok).ok_or_else(|| {
                FormulaError::Argument(format!("Condition '{}' is not a boolean", condition))
            }),
        };
    };

    let left = ctx.value_of(&Argument::parse(&condition[..pos]))?;
    let right = ctx.value_of(&Argument::parse(&condition[pos + op.len()..]))?;
    for side in [&left, &right] {
        if side.is_error() {
            return Ok(Err(side.clone()));
        }
    }

    let ordering = compare(&left, &right);
    let result = match op {
        ">=" => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        "<=" => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        "<>" | "!=" => ordering != Some(Ordering::Equal),
        "=" => ordering == Some(Ordering::Equal),
        ">" => ordering == Some(Ordering::Greater),
        "<" => ordering == Some(Ordering::Less),
        _ => false,
    };
    Ok(Ok(result))
}

/// Numeric view of a comparison operand
fn comparable_number(value: &FormulaValue) -> Option<f64> {
    match value {
        FormulaValue::Empty => Some(0.0),
        FormulaValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        FormulaValue::Number(n) => Some(*n),
        FormulaValue::Text(s) => parse_number(s),
        FormulaValue::Error(_) => None,
    }
}

fn compare(left: &FormulaValue, right: &FormulaValue) -> Option<Ordering> {
    match (comparable_number(left), comparable_number(right)) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => Some(left.as_text().cmp(&right.as_text())),
    }
}

#[cfg(test)]
mod tests {
    use crate::evaluator::FormulaValue;
    use crate::functions::test_support::{raw, Sheet};
    use offer_sheets_core::CellError;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> FormulaValue {
        FormulaValue::Text(s.to_string())
    }

    #[test]
    fn test_if_high_low() {
        let high = Sheet::new(vec![vec![raw(15.0)]]);
        let low = Sheet::new(vec![vec![raw(5.0)]]);
        let formula = "=IF(A1>10,\"High\",\"Low\")";

        assert_eq!(high.eval(formula), text("High"));
        assert_eq!(low.eval(formula), text("Low"));
    }

    #[test]
    fn test_if_operators() {
        let sheet = Sheet::new(vec![vec![raw(10.0), raw("10"), raw("pending")]]);

        assert_eq!(sheet.eval("=IF(A1>=10, 1, 0)"), FormulaValue::Number(1.0));
        assert_eq!(sheet.eval("=IF(A1<=9, 1, 0)"), FormulaValue::Number(0.0));
        assert_eq!(sheet.eval("=IF(A1=B1, \"same\", \"diff\")"), text("same"));
        assert_eq!(sheet.eval("=IF(A1<>B1, \"diff\", \"same\")"), text("same"));
        assert_eq!(sheet.eval("=IF(C1!=\"sold\", 1, 0)"), FormulaValue::Number(1.0));
        assert_eq!(sheet.eval("=IF(C1=\"pending\", 1, 0)"), FormulaValue::Number(1.0));
        assert_eq!(sheet.eval("=IF(A1<5, 1)"), FormulaValue::Boolean(false));
    }

    #[test]
    fn test_if_operator_inside_literal() {
        let sheet = Sheet::new(vec![vec![raw("a>b")]]);
        assert_eq!(sheet.eval("=IF(A1=\"a>b\",\"x\",\"y\")"), text("x"));
    }

    #[test]
    fn test_if_branches_are_resolved() {
        let sheet = Sheet::new(vec![vec![raw(2.0)], vec![raw(3.0)], vec![raw("note")]]);

        assert_eq!(
            sheet.eval("=IF(A1>1, SUM(A1:A2), 0)"),
            FormulaValue::Number(5.0)
        );
        assert_eq!(sheet.eval("=IF(A1>1, A3, 0)"), text("note"));
        assert_eq!(sheet.eval("=IF(A1>1, A1*10, 0)"), FormulaValue::Number(20.0));
        assert_eq!(sheet.eval("=IF(A1>1, no quotes, 0)"), text("no quotes"));
        assert_eq!(
            sheet.eval("=IF(MAX(A1:A2)>2, \"big\", \"small\")"),
            text("big")
        );
    }

    #[test]
    fn test_if_without_comparison() {
        let sheet = Sheet::new(vec![vec![raw(0.0), raw(4.0), raw("words")]]);

        assert_eq!(sheet.eval("=IF(A1, \"yes\", \"no\")"), text("no"));
        assert_eq!(sheet.eval("=IF(B1, \"yes\", \"no\")"), text("yes"));
        assert_eq!(sheet.eval("=IF(TRUE, 1, 2)"), FormulaValue::Number(1.0));
        assert_eq!(sheet.eval("=IF(C1, 1, 2)"), FormulaValue::Error(CellError::Error));
    }

    #[test]
    fn test_if_propagates_errors() {
        let sheet = Sheet::new(vec![vec![raw("=1/0"), raw("=B1")]]);

        assert_eq!(sheet.eval("=IF(A1>1, 1, 2)"), FormulaValue::Error(CellError::Error));
        assert_eq!(sheet.eval("=IF(B1=1, 1, 2)"), FormulaValue::Error(CellError::Circular));
        assert_eq!(sheet.eval("=IF(1)"), FormulaValue::Error(CellError::Error));
    }
}
