//! Math functions

use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::{Argument, EvaluationContext, FormulaValue};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Visit every value covered by the arguments, ranges expanded
fn each_value<F>(args: &[Argument<'_>], ctx: &EvaluationContext<'_>, mut visit: F) -> FormulaResult<()>
where
    F: FnMut(FormulaValue),
{
    for arg in args {
        ctx.for_each_value(arg, &mut visit)?;
    }
    Ok(())
}

/// SUM function
///
/// Non-numeric and blank cells count as 0.
pub fn fn_sum(args: &[Argument<'_>], ctx: &EvaluationContext<'_>) -> FormulaResult<FormulaValue> {
    let mut sum = 0.0;
    each_value(args, ctx, |v| sum += v.as_number().unwrap_or(0.0))?;
    Ok(FormulaValue::Number(sum))
}

/// AVERAGE function
///
/// Every visited cell is counted, blank ones as 0.
pub fn fn_average(
    args: &[Argument<'_>],
    ctx: &EvaluationContext<'_>,
) -> FormulaResult<FormulaValue> {
    let mut sum = 0.0;
    let mut count = 0usize;

    each_value(args, ctx, |v| {
        sum += v.as_number().unwrap_or(0.0);
        count += 1;
    })?;

    if count == 0 {
        return Err(FormulaError::Evaluation("AVERAGE of no values".into()));
    }
    Ok(FormulaValue::Number(sum / count as f64))
}

fn fold_numbers(
    args: &[Argument<'_>],
    ctx: &EvaluationContext<'_>,
    pick: fn(f64, f64) -> f64,
) -> FormulaResult<FormulaValue> {
    let mut acc: Option<f64> = None;

    each_value(args, ctx, |v| {
        if let Some(n) = v.as_number() {
            acc = Some(acc.map_or(n, |a| pick(a, n)));
        }
    })?;

    Ok(FormulaValue::Number(acc.unwrap_or(0.0)))
}

/// MIN function
pub fn fn_min(args: &[Argument<'_>], ctx: &EvaluationContext<'_>) -> FormulaResult<FormulaValue> {
    fold_numbers(args, ctx, f64::min)
}

/// MAX function
pub fn fn_max(args: &[Argument<'_>], ctx: &EvaluationContext<'_>) -> FormulaResult<FormulaValue> {
    fold_numbers(args, ctx, f64::max)
}

/// COUNT function
///
/// Counts cells whose raw content is not blank.
pub fn fn_count(args: &[Argument<'_>], ctx: &EvaluationContext<'_>) -> FormulaResult<FormulaValue> {
    let mut count = 0usize;
    for arg in args {
        ctx.for_each_raw(arg, |raw| {
            if !raw.is_blank() {
                count += 1;
            }
        })?;
    }
    Ok(FormulaValue::Number(count as f64))
}

/// ROUND(number, [digits])
pub fn fn_round(args: &[Argument<'_>], ctx: &EvaluationContext<'_>) -> FormulaResult<FormulaValue> {
    let number = number_arg(&args[0], ctx)?;
    let digits = match args.get(1) {
        Some(arg) => number_arg(arg, ctx)?.trunc(),
        None => 0.0,
    };

    Ok(FormulaValue::Number(round_half_away(number, digits as i32)))
}

fn number_arg(arg: &Argument<'_>, ctx: &EvaluationContext<'_>) -> FormulaResult<f64> {
    match ctx.value_of(arg)? {
        FormulaValue::Error(e) => Err(FormulaError::Propagated(e)),
        FormulaValue::Empty => Ok(0.0),
        value => value.as_number().ok_or_else(|| {
            FormulaError::Argument(format!("Expected a number, got '{}'", arg.text))
        }),
    }
}

/// Round to `digits` decimal places, halves away from zero
pub fn round_half_away(number: f64, digits: i32) -> f64 {
    if digits < 0 {
        // 10^308 is the largest finite power of ten
        let factor = 10f64.powi(digits.saturating_neg().min(308));
        return (number / factor).round() * factor;
    }

    let dp = digits.min(28) as u32;
    Decimal::from_f64(number)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        // Via text, so the result is the f64 nearest the rounded decimal
        .and_then(|d| d.to_string().parse::<f64>().ok())
        .unwrap_or_else(|| {
            let factor = 10f64.powi(digits.min(300));
            (number * factor).round() / factor
        })
}
