//! Property tests over whole sheets

use offer_sheets::prelude::*;
use offer_sheets::registry;
use proptest::prelude::*;

const MATH_NAMES: [&str; 15] = [
    "abs", "ceil", "floor", "round", "max", "min", "pow", "sqrt", "sin", "cos", "tan", "pi", "e",
    "true", "false",
];

proptest! {
    #[test]
    fn sum_matches_column_total(values in prop::collection::vec(-1e6f64..1e6, 1..40)) {
        let rows = values.iter().map(|n| vec![RawValue::from(*n)]).collect();
        let mut sheet = Sheet::new(DataGrid::from_rows(rows));
        let formula = format!("=SUM(A1:A{})", values.len());
        sheet.set_value(0, 1, RawValue::from(formula));

        let expected: f64 = values.iter().sum();
        prop_assert_eq!(sheet.display_value(0, 1), FormulaValue::Number(expected));
    }

    #[test]
    fn pasted_formula_reads_its_own_row(row in 1u32..60) {
        let mut rows: Vec<Vec<RawValue>> = (0..60)
            .map(|r| vec![RawValue::from(r as f64 * 3.0)])
            .collect();
        rows[0].push(RawValue::from("=A1+$A$2"));
        let mut sheet = Sheet::new(DataGrid::from_rows(rows));

        sheet
            .paste(CellRange::from_indices(0, 1, 0, 1), CellAddress::new(row, 1))
            .unwrap();

        // A(row+1) + A2
        prop_assert_eq!(
            sheet.display_value(row, 1),
            FormulaValue::Number(row as f64 * 3.0 + 3.0)
        );
    }

    #[test]
    fn unknown_identifiers_are_errors(name in "[a-z]{1,8}") {
        prop_assume!(!MATH_NAMES.contains(&name.as_str()));
        prop_assume!(!registry().contains(&name));

        let sheet = Sheet::new(DataGrid::from_rows(vec![vec![RawValue::from(1.0)]]));
        for formula in [format!("={}(1)", name), format!("={}", name), format!("=A1+{}", name)] {
            let value = sheet.engine().evaluate(sheet.grid(), &formula, 5, 5);
            prop_assert_eq!(value, FormulaValue::Error(CellError::Error));
        }
    }
}
