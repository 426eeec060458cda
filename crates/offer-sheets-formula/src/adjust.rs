//! Reference adjustment for copied formulas

use crate::references::{replace_references, ReferenceToken};
use offer_sheets_core::CellReference;

/// Rewrite a formula copied from `(src_row, src_col)` to
/// `(dest_row, dest_col)`
///
/// Relative row and column components move by the copy offset; `$`
/// components stay fixed. Range endpoints are adjusted independently.
/// Text inside string literals is never touched, and a token whose
/// shifted position would fall above row 1 or left of column A is left
/// as it was.
///
/// # Example
/// ```
/// use offer_sheets_formula::adjust_formula;
///
/// assert_eq!(adjust_formula("=A1+$B$2", 0, 0, 1, 1), "=B2+$B$2");
/// assert_eq!(adjust_formula("=SUM(A1:A3)*$C1", 0, 1, 2, 1), "=SUM(A3:A5)*$C3");
/// ```
pub fn adjust_formula(
    formula: &str,
    src_row: u32,
    src_col: u32,
    dest_row: u32,
    dest_col: u32,
) -> String {
    let row_offset = dest_row as i64 - src_row as i64;
    let col_offset = dest_col as i64 - src_col as i64;
    shift_formula(formula, row_offset, col_offset)
}

/// Shift every relative reference in a formula by a signed offset
pub fn shift_formula(formula: &str, row_offset: i64, col_offset: i64) -> String {
    if row_offset == 0 && col_offset == 0 {
        return formula.to_string();
    }

    replace_references(formula, |m| match m.token {
        ReferenceToken::Cell(r) => shift(&r, row_offset, col_offset).map(|r| r.to_string()),
        ReferenceToken::Range { start, end } => {
            let start = shift(&start, row_offset, col_offset)?;
            let end = shift(&end, row_offset, col_offset)?;
            Some(format!("{}:{}", start, end))
        }
    })
}

fn shift(reference: &CellReference, row_offset: i64, col_offset: i64) -> Option<CellReference> {
    reference.shifted(row_offset, col_offset)
}
