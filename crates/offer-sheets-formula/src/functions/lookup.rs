//! Lookup functions

use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::{Argument, ArgumentKind, EvaluationContext, FormulaValue};
use offer_sheets_core::{parse_number, CellError};

/// How lookup keys are compared against the first column
#[derive(Debug, Clone, Copy, PartialEq)]
enum MatchMode {
    /// Numbers equal, text equal byte for byte
    Exact,
    /// Numbers within a tolerance, text equal ignoring case
    Approximate { tolerance: f64 },
}

impl MatchMode {
    fn matches(&self, needle: &FormulaValue, candidate: &FormulaValue) -> bool {
        match (lookup_number(needle), lookup_number(candidate)) {
            (Some(a), Some(b)) => match self {
                MatchMode::Exact => a == b,
                MatchMode::Approximate { tolerance } => (a - b).abs() <= *tolerance,
            },
            (None, None) => {
                let (a, b) = (needle.as_text(), candidate.as_text());
                match self {
                    MatchMode::Exact => a == b,
                    MatchMode::Approximate { .. } => a.trim().eq_ignore_ascii_case(b.trim()),
                }
            }
            _ => false,
        }
    }
}

/// Numeric view of a lookup key; blanks never match zero
fn lookup_number(value: &FormulaValue) -> Option<f64> {
    match value {
        FormulaValue::Number(n) if n.is_finite() => Some(*n),
        FormulaValue::Text(s) => parse_number(s),
        _ => None,
    }
}

/// VLOOKUP(lookup_value, table_range, col_index, [exact])
///
/// Scans the first column of `table_range` top to bottom and returns the
/// raw content `col_index` columns into the first matching row. The
/// fourth argument selects exact matching when it is `FALSE` or `0`;
/// otherwise numbers match within the configured tolerance and text
/// matches ignoring case. No match gives `#N/A`.
pub fn fn_vlookup(
    args: &[Argument<'_>],
    ctx: &EvaluationContext<'_>,
) -> FormulaResult<FormulaValue> {
    let needle = ctx.value_of(&args[0])?;
    if needle.is_error() {
        return Ok(needle);
    }

    let table = match args[1].kind {
        ArgumentKind::Range(range) => range,
        _ => {
            return Err(FormulaError::InvalidReference(format!(
                "VLOOKUP table '{}' is not a range",
                args[1].text
            )))
        }
    };
    ctx.check_range_size(&table)?;

    let col_index = match ctx.value_of(&args[2])? {
        FormulaValue::Error(e) => return Ok(FormulaValue::Error(e)),
        value => value.as_number().map(f64::trunc).ok_or_else(|| {
            FormulaError::Argument(format!("VLOOKUP column '{}' is not a number", args[2].text))
        })?,
    };
    let width = table.col_count();
    if col_index < 1.0 || col_index > width as f64 {
        return Err(FormulaError::Argument(format!(
            "VLOOKUP column {} outside 1..={}",
            col_index, width
        )));
    }

    let mode = match args.get(3) {
        Some(arg) if is_exact_flag(&ctx.value_of(arg)?) => MatchMode::Exact,
        _ => MatchMode::Approximate {
            tolerance: ctx.options().approximate_match_tolerance,
        },
    };

    let first_col = table.start.col;
    let result_col = first_col + col_index as u32 - 1;
    for row in table.start.row..=table.end.row {
        let candidate = ctx.cell_value(row, first_col);
        if mode.matches(&needle, &candidate) {
            return Ok(FormulaValue::from_raw(&ctx.raw_value(row, result_col)));
        }
    }

    Ok(FormulaValue::Error(CellError::NotAvailable))
}

fn is_exact_flag(value: &FormulaValue) -> bool {
    match value {
        FormulaValue::Boolean(b) => !b,
        FormulaValue::Number(n) => *n == 0.0,
        FormulaValue::Text(s) => s.trim().eq_ignore_ascii_case("FALSE"),
        _ => false,
    }
}
