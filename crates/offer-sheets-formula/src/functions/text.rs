//! Text functions
//!
//! These read the raw content of referenced cells, so a formula cell
//! contributes its formula text rather than its result.

use crate::error::FormulaResult;
use crate::evaluator::{Argument, EvaluationContext, FormulaValue};

/// CONCATENATE(text1, [text2], ...)
pub fn fn_concatenate(
    args: &[Argument<'_>],
    ctx: &EvaluationContext<'_>,
) -> FormulaResult<FormulaValue> {
    let mut result = String::new();
    for arg in args {
        ctx.for_each_raw(arg, |raw| result.push_str(&raw.to_text()))?;
    }
    Ok(FormulaValue::Text(result))
}

/// LEN(text)
pub fn fn_len(args: &[Argument<'_>], ctx: &EvaluationContext<'_>) -> FormulaResult<FormulaValue> {
    let s = ctx.raw_text_of(&args[0])?;
    Ok(FormulaValue::Number(s.chars().count() as f64))
}

/// TRIM(text)
///
/// Strips leading and trailing whitespace only.
pub fn fn_trim(args: &[Argument<'_>], ctx: &EvaluationContext<'_>) -> FormulaResult<FormulaValue> {
    let s = ctx.raw_text_of(&args[0])?;
    Ok(FormulaValue::Text(s.trim().to_string()))
}

/// UPPER(text)
pub fn fn_upper(args: &[Argument<'_>], ctx: &EvaluationContext<'_>) -> FormulaResult<FormulaValue> {
    let s = ctx.raw_text_of(&args[0])?;
    Ok(FormulaValue::Text(s.to_uppercase()))
}

/// LOWER(text)
pub fn fn_lower(args: &[Argument<'_>], ctx: &EvaluationContext<'_>) -> FormulaResult<FormulaValue> {
    let s = ctx.raw_text_of(&args[0])?;
    Ok(FormulaValue::Text(s.to_lowercase()))
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

    fn sheet() -> Sheet {
        Sheet::new(vec![
            vec![raw("  Main St  "), raw(42.0), raw("=B1*2")],
            vec![raw("Offer"), raw(""), raw("Accepted")],
        ])
    }

    #[test]
    fn test_len() {
        let sheet = sheet();
        assert_eq!(sheet.eval("=LEN(A1)"), FormulaValue::Number(11.0));
        assert_eq!(sheet.eval("=LEN(\"héllo\")"), FormulaValue::Number(5.0));
        assert_eq!(sheet.eval("=LEN(B2)"), FormulaValue::Number(0.0));
        // Raw formula text, not the result
        assert_eq!(sheet.eval("=LEN(C1)"), FormulaValue::Number(5.0));
    }

    #[test]
    fn test_trim_upper_lower() {
        let sheet = sheet();
        assert_eq!(sheet.eval("=TRIM(A1)"), text("Main St"));
        assert_eq!(sheet.eval("=UPPER(A2)"), text("OFFER"));
        assert_eq!(sheet.eval("=lower(C2)"), text("accepted"));
        assert_eq!(sheet.eval("=UPPER(\"mixed Case\")"), text("MIXED CASE"));
        assert_eq!(sheet.eval("=UPPER(B1)"), text("42"));
    }

    #[test]
    fn test_concatenate() {
        let sheet = sheet();
        assert_eq!(
            sheet.eval("=CONCATENATE(A2, \" #\", B1, \": \", C2)"),
            text("Offer #42: Accepted")
        );
        assert_eq!(sheet.eval("=CONCATENATE(A2:C2)"), text("OfferAccepted"));
        assert_eq!(
            sheet.eval("=CONCATENATE(\"a,b\", \"(c)\")"),
            text("a,b(c)")
        );
    }

    #[test]
    fn test_single_argument_functions_reject_ranges() {
        let sheet = sheet();
        assert_eq!(sheet.eval("=LEN(A1:A2)"), FormulaValue::Error(CellError::Error));
        assert_eq!(sheet.eval("=TRIM()"), FormulaValue::Error(CellError::Error));
        assert_eq!(sheet.eval("=UPPER(A1, A2)"), FormulaValue::Error(CellError::Error));
    }
}
