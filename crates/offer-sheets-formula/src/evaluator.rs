//! Formula evaluation
//!
//! A formula is either a single library call spanning the whole text
//! (`=SUM(A1:A3)`) or a plain expression (`=A1*2+SUM(B1:B3)`). Calls get
//! their argument text split and dispatched to a handler; expressions have
//! nested library calls and then cell references replaced by values
//! before the sandboxed expression evaluator sees them.

use crate::arguments::{is_quoted, matching_paren, split_arguments, unquote};
use crate::dependency::CircularSet;
use crate::error::{FormulaError, FormulaResult};
use crate::expression::{evaluate_expression, ExprValue};
use crate::formula_map::FormulaMap;
use crate::functions::registry;
use crate::options::EngineOptions;
use crate::references::{mask_string_literals, replace_references, ReferenceToken};
use ahash::AHashMap;
use lazy_regex::regex;
use offer_sheets_core::{
    format_number, parse_number, CellAddress, CellError, CellKey, CellRange, CellReference,
    CellSource, RawValue,
};
use std::cell::RefCell;
use std::fmt;

/// A computed cell value
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormulaValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(CellError),
}

impl FormulaValue {
    /// Convert to a finite number, if possible
    ///
    /// Text is parsed; empty cells, booleans and errors are not numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FormulaValue::Number(n) if n.is_finite() => Some(*n),
            FormulaValue::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Convert to display text
    pub fn as_text(&self) -> String {
        match self {
            FormulaValue::Empty => String::new(),
            FormulaValue::Number(n) => format_number(*n),
            FormulaValue::Text(s) => s.clone(),
            FormulaValue::Boolean(true) => "TRUE".to_string(),
            FormulaValue::Boolean(false) => "FALSE".to_string(),
            FormulaValue::Error(e) => e.as_str().to_string(),
        }
    }

    /// Convert to boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FormulaValue::Boolean(b) => Some(*b),
            FormulaValue::Number(n) => Some(*n != 0.0),
            FormulaValue::Empty => Some(false),
            FormulaValue::Text(s) => {
                if s.eq_ignore_ascii_case("TRUE") {
                    Some(true)
                } else if s.eq_ignore_ascii_case("FALSE") {
                    Some(false)
                } else {
                    parse_number(s).map(|n| n != 0.0)
                }
            }
            FormulaValue::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FormulaValue::Error(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FormulaValue::Empty)
    }

    /// Convert host content into a value (formula text stays text)
    pub fn from_raw(raw: &RawValue) -> Self {
        match raw {
            RawValue::Empty => FormulaValue::Empty,
            RawValue::Number(n) => FormulaValue::Number(*n),
            RawValue::Text(s) => FormulaValue::Text(s.clone()),
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FormulaValue::Empty => "empty",
            FormulaValue::Number(_) => "number",
            FormulaValue::Text(_) => "text",
            FormulaValue::Boolean(_) => "boolean",
            FormulaValue::Error(_) => "error",
        }
    }
}

impl fmt::Display for FormulaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<f64> for FormulaValue {
    fn from(n: f64) -> Self {
        FormulaValue::Number(n)
    }
}

impl From<bool> for FormulaValue {
    fn from(b: bool) -> Self {
        FormulaValue::Boolean(b)
    }
}

impl From<&str> for FormulaValue {
    fn from(s: &str) -> Self {
        FormulaValue::Text(s.to_string())
    }
}

impl From<String> for FormulaValue {
    fn from(s: String) -> Self {
        FormulaValue::Text(s)
    }
}

impl From<CellError> for FormulaValue {
    fn from(e: CellError) -> Self {
        FormulaValue::Error(e)
    }
}

impl From<ExprValue> for FormulaValue {
    fn from(v: ExprValue) -> Self {
        match v {
            ExprValue::Number(n) => FormulaValue::Number(n),
            ExprValue::Boolean(b) => FormulaValue::Boolean(b),
        }
    }
}

impl From<&RawValue> for FormulaValue {
    fn from(raw: &RawValue) -> Self {
        FormulaValue::from_raw(raw)
    }
}

/// How a function argument was written
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArgumentKind {
    /// Nothing between the commas
    Empty,
    /// `A1:B5`
    Range(CellRange),
    /// `A1`, `$A$1`
    Reference(CellReference),
    /// `"text"`
    Quoted,
    /// `42`, `-1.5`
    Number(f64),
    /// Anything else: evaluated as a nested formula
    Expression,
}

/// One argument of a library call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Argument<'a> {
    /// Trimmed argument text
    pub text: &'a str,
    pub kind: ArgumentKind,
}

impl<'a> Argument<'a> {
    /// Classify argument text
    pub fn parse(text: &'a str) -> Self {
        let text = text.trim();
        let kind = if text.is_empty() {
            ArgumentKind::Empty
        } else if let Some(range) = CellRange::parse(text) {
            ArgumentKind::Range(range)
        } else if let Some(reference) = CellReference::parse(text) {
            ArgumentKind::Reference(reference)
        } else if is_quoted(text) {
            ArgumentKind::Quoted
        } else if let Some(n) = parse_number(text) {
            ArgumentKind::Number(n)
        } else {
            ArgumentKind::Expression
        };
        Self { text, kind }
    }

    pub fn is_range(&self) -> bool {
        matches!(self.kind, ArgumentKind::Range(_))
    }
}

/// Evaluation context for one request
///
/// Reads raw content from the host grid and formula text from the
/// [`FormulaMap`]. Formula cells reached while evaluating are memoized
/// for the lifetime of the context only.
pub struct EvaluationContext<'a> {
    grid: &'a dyn CellSource,
    formulas: &'a FormulaMap,
    circular: &'a CircularSet,
    options: &'a EngineOptions,
    memo: RefCell<AHashMap<CellKey, FormulaValue>>,
    in_progress: RefCell<Vec<CellKey>>,
}

impl<'a> EvaluationContext<'a> {
    /// Create a new evaluation context
    pub fn new(
        grid: &'a dyn CellSource,
        formulas: &'a FormulaMap,
        circular: &'a CircularSet,
        options: &'a EngineOptions,
    ) -> Self {
        Self {
            grid,
            formulas,
            circular,
            options,
            memo: RefCell::new(AHashMap::new()),
            in_progress: RefCell::new(Vec::new()),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        self.options
    }

    /// Raw host content at a cell
    pub fn raw_value(&self, row: u32, col: u32) -> RawValue {
        self.grid.raw_value(row, col)
    }

    /// Computed value of a cell: its formula result, or its raw content
    pub fn cell_value(&self, row: u32, col: u32) -> FormulaValue {
        let key = CellKey::new(row, col);
        let formula = match self.formulas.get(key) {
            Some(formula) => formula,
            None => return FormulaValue::from_raw(&self.grid.raw_value(row, col)),
        };

        if let Some(value) = self.memo.borrow().get(&key) {
            return value.clone();
        }

        let value = self.evaluate_cell(key, formula);
        self.memo.borrow_mut().insert(key, value.clone());
        value
    }

    /// Computed value at an address
    pub fn value_at(&self, addr: CellAddress) -> FormulaValue {
        self.cell_value(addr.row, addr.col)
    }

    fn evaluate_cell(&self, key: CellKey, formula: &str) -> FormulaValue {
        {
            let in_progress = self.in_progress.borrow();
            if in_progress.contains(&key) {
                return FormulaValue::Error(CellError::Circular);
            }
            if in_progress.len() >= self.options.max_evaluation_depth {
                log::trace!("evaluation of {} exceeds the maximum depth", key);
                return FormulaValue::Error(CellError::Error);
            }
        }

        self.in_progress.borrow_mut().push(key);
        let value = self.evaluate_formula(formula, key.row, key.col);
        self.in_progress.borrow_mut().pop();
        value
    }

    /// Evaluate formula text as if it were stored at `(row, col)`
    ///
    /// Never fails: any error becomes a [`FormulaValue::Error`].
    pub fn evaluate_formula(&self, formula: &str, row: u32, col: u32) -> FormulaValue {
        let key = CellKey::new(row, col);
        if self.circular.contains(key) {
            return FormulaValue::Error(CellError::Circular);
        }

        let body = formula.trim();
        let body = body.strip_prefix('=').unwrap_or(body);

        match self.evaluate_body(body) {
            Ok(value) => value,
            Err(err) => {
                log::trace!("{} at {} failed: {}", formula, key, err);
                FormulaValue::Error(err.to_cell_error())
            }
        }
    }

    /// Evaluate formula text without the leading `=`
    pub fn evaluate_body(&self, body: &str) -> FormulaResult<FormulaValue> {
        let body = body.trim();
        if body.is_empty() {
            return Err(FormulaError::Parse("Empty formula".into()));
        }

        if let Some((name, args)) = whole_call(body) {
            if registry().contains(name) {
                return self.call_function(name, args);
            }
        }

        self.evaluate_plain(body)
    }

    /// Dispatch a library call with its unsplit argument text
    pub fn call_function(&self, name: &str, args: &str) -> FormulaResult<FormulaValue> {
        let def = registry()
            .get(name)
            .ok_or_else(|| FormulaError::UnknownIdentifier(name.to_string()))?;

        let args: Vec<Argument<'_>> = split_arguments(args)
            .into_iter()
            .map(Argument::parse)
            .collect();
        def.check_arity(args.len())?;

        match (def.implementation)(&args, self)? {
            FormulaValue::Number(n) if !n.is_finite() => Err(FormulaError::NonFinite),
            value => Ok(value),
        }
    }

    fn evaluate_plain(&self, body: &str) -> FormulaResult<FormulaValue> {
        if let Some(r) = CellReference::parse(body) {
            return Ok(self.cell_value(r.row(), r.col()));
        }
        if is_quoted(body) {
            return Ok(FormulaValue::Text(unquote(body)));
        }
        if CellRange::parse(body).is_some() {
            return Err(FormulaError::InvalidReference(format!(
                "Range {} used as a value",
                body
            )));
        }

        let expanded = self.expand_calls(body)?;
        let substituted = self.substitute_references(&expanded)?;
        evaluate_expression(&substituted).map(FormulaValue::from)
    }

    /// Replace every upper-case library call with its numeric result
    fn expand_calls(&self, text: &str) -> FormulaResult<String> {
        let masked = mask_string_literals(text);
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for caps in regex!(r"\b([A-Z][A-Z0-9]*)\(").captures_iter(&masked) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            // Nested inside a call that was already expanded
            if whole.start() < last || !registry().contains(name.as_str()) {
                continue;
            }

            let open = whole.end() - 1;
            let close = matching_paren(&masked, open).ok_or_else(|| {
                FormulaError::Parse(format!("Unbalanced parentheses after {}", name.as_str()))
            })?;

            let value = self.call_function(name.as_str(), &text[open + 1..close])?;
            out.push_str(&text[last..whole.start()]);
            out.push_str(&call_literal(&value)?);
            last = close + 1;
        }

        out.push_str(&text[last..]);
        Ok(out)
    }

    /// Replace every cell reference with its value as expression text
    fn substitute_references(&self, text: &str) -> FormulaResult<String> {
        let mut failure = None;

        let substituted = replace_references(text, |m| {
            if failure.is_some() {
                return None;
            }
            let literal = match m.token {
                ReferenceToken::Range { .. } => Err(FormulaError::InvalidReference(format!(
                    "Range {} used in an expression",
                    m.text
                ))),
                ReferenceToken::Cell(r) => reference_literal(&self.cell_value(r.row(), r.col())),
            };
            match literal {
                Ok(literal) => Some(literal),
                Err(err) => {
                    failure = Some(err);
                    None
                }
            }
        });

        match failure {
            Some(err) => Err(err),
            None => Ok(substituted),
        }
    }

    /// Resolve an argument to a single value
    ///
    /// Nested expressions that fail to evaluate are taken as literal text,
    /// except when the failure is an error read from another cell.
    pub fn value_of(&self, arg: &Argument<'_>) -> FormulaResult<FormulaValue> {
        match arg.kind {
            ArgumentKind::Empty => Ok(FormulaValue::Empty),
            ArgumentKind::Range(range) => Err(FormulaError::InvalidReference(format!(
                "Range {} where a single value is expected",
                range
            ))),
            ArgumentKind::Reference(r) => Ok(self.cell_value(r.row(), r.col())),
            ArgumentKind::Quoted => Ok(FormulaValue::Text(unquote(arg.text))),
            ArgumentKind::Number(n) => Ok(FormulaValue::Number(n)),
            ArgumentKind::Expression => match self.evaluate_body(arg.text) {
                Ok(value) => Ok(value),
                Err(err @ (FormulaError::Propagated(_) | FormulaError::CircularReference)) => {
                    Ok(FormulaValue::Error(err.to_cell_error()))
                }
                Err(_) => Ok(FormulaValue::Text(arg.text.to_string())),
            },
        }
    }

    /// Visit the computed value of every cell an argument covers
    ///
    /// Ranges visit each contained cell; any other argument visits its
    /// single resolved value.
    pub fn for_each_value<F>(&self, arg: &Argument<'_>, mut visit: F) -> FormulaResult<()>
    where
        F: FnMut(FormulaValue),
    {
        match arg.kind {
            ArgumentKind::Range(range) => {
                self.check_range_size(&range)?;
                for addr in range.cells() {
                    visit(self.value_at(addr));
                }
            }
            _ => visit(self.value_of(arg)?),
        }
        Ok(())
    }

    /// Visit the raw host content of every cell an argument covers
    ///
    /// Literals are visited as their own text.
    pub fn for_each_raw<F>(&self, arg: &Argument<'_>, mut visit: F) -> FormulaResult<()>
    where
        F: FnMut(RawValue),
    {
        match arg.kind {
            ArgumentKind::Range(range) => {
                self.check_range_size(&range)?;
                for addr in range.cells() {
                    visit(self.grid.raw_value_at(addr));
                }
            }
            ArgumentKind::Reference(r) => visit(self.grid.raw_value(r.row(), r.col())),
            ArgumentKind::Empty => visit(RawValue::Empty),
            _ => visit(RawValue::text(self.raw_text_of(arg)?)),
        }
        Ok(())
    }

    /// Raw (uncalculated) text of an argument
    ///
    /// References read the host content as stored; quoted literals are
    /// unquoted; nested expressions are evaluated.
    pub fn raw_text_of(&self, arg: &Argument<'_>) -> FormulaResult<String> {
        match arg.kind {
            ArgumentKind::Empty => Ok(String::new()),
            ArgumentKind::Range(range) => Err(FormulaError::InvalidReference(format!(
                "Range {} where a single value is expected",
                range
            ))),
            ArgumentKind::Reference(r) => Ok(self.grid.raw_value(r.row(), r.col()).to_text()),
            ArgumentKind::Quoted => Ok(unquote(arg.text)),
            ArgumentKind::Number(_) => Ok(arg.text.to_string()),
            ArgumentKind::Expression => match self.value_of(arg)? {
                FormulaValue::Error(e) => Err(FormulaError::Propagated(e)),
                value => Ok(value.as_text()),
            },
        }
    }

    /// Reject ranges too large to walk
    pub fn check_range_size(&self, range: &CellRange) -> FormulaResult<()> {
        if range.cell_count() > self.options.max_range_cells {
            return Err(FormulaError::Argument(format!(
                "Range {} has more than {} cells",
                range, self.options.max_range_cells
            )));
        }
        Ok(())
    }
}

/// Split `NAME(args)` when the call spans the whole text
fn whole_call(body: &str) -> Option<(&str, &str)> {
    let open = body.find('(')?;
    let name = &body[..open];
    let mut chars = name.chars();
    if !chars.next().map_or(false, |c| c.is_ascii_alphabetic())
        || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return None;
    }

    let close = matching_paren(body, open)?;
    (close == body.len() - 1).then(|| (name, &body[open + 1..close]))
}

fn number_literal(n: f64) -> String {
    if n < 0.0 {
        format!("({})", n)
    } else {
        format!("{}", n)
    }
}

/// Expression text for a referenced cell's value
///
/// Blank and non-numeric text count as 0; errors propagate.
fn reference_literal(value: &FormulaValue) -> FormulaResult<String> {
    match value {
        FormulaValue::Error(e) => Err(FormulaError::Propagated(*e)),
        FormulaValue::Boolean(b) => Ok(if *b { "TRUE" } else { "FALSE" }.to_string()),
        other => Ok(number_literal(other.as_number().unwrap_or(0.0))),
    }
}

/// Expression text for a nested call's result; only numbers are allowed
fn call_literal(value: &FormulaValue) -> FormulaResult<String> {
    match value {
        FormulaValue::Error(e) => Err(FormulaError::Propagated(*e)),
        FormulaValue::Boolean(b) => Ok(if *b { "TRUE" } else { "FALSE" }.to_string()),
        other => other.as_number().map(number_literal).ok_or_else(|| {
            FormulaError::Argument(format!(
                "Expected a number in an expression, got {}",
                other.type_name()
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::test_support::{raw as v, Sheet as Fixture};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_argument_classification() {
        assert!(matches!(Argument::parse(" A1:B2 ").kind, ArgumentKind::Range(_)));
        assert!(matches!(Argument::parse("$C$3").kind, ArgumentKind::Reference(_)));
        assert_eq!(Argument::parse("\"x\"").kind, ArgumentKind::Quoted);
        assert_eq!(Argument::parse("-2.5").kind, ArgumentKind::Number(-2.5));
        assert_eq!(Argument::parse("SUM(A1)").kind, ArgumentKind::Expression);
        assert_eq!(Argument::parse("  ").kind, ArgumentKind::Empty);
        assert_eq!(Argument::parse(" A1 ").text, "A1");
    }

    #[test]
    fn test_whole_call() {
        assert_eq!(whole_call("SUM(A1:A3)"), Some(("SUM", "A1:A3")));
        assert_eq!(whole_call("SUM(A1)+SUM(A2)"), None);
        assert_eq!(whole_call("(1+2)"), None);
        assert_eq!(whole_call("IF(A1>0,\")\",1)"), Some(("IF", "A1>0,\")\",1")));
    }

    #[test]
    fn test_plain_expressions_substitute_references() {
        let f = Fixture::new(vec![vec![v(5.0), v(-3.0), v("7"), v("abc"), v("")]]);

        assert_eq!(f.eval("=A1*2+1"), FormulaValue::Number(11.0));
        assert_eq!(f.eval("=A1-B1"), FormulaValue::Number(8.0));
        assert_eq!(f.eval("=B1^2"), FormulaValue::Number(9.0));
        assert_eq!(f.eval("=C1+1"), FormulaValue::Number(8.0));
        assert_eq!(f.eval("=D1+E1+1"), FormulaValue::Number(1.0));
        assert_eq!(f.eval("=A1>B1"), FormulaValue::Boolean(true));
        assert_eq!(f.eval("=max(A1, 9)"), FormulaValue::Number(9.0));
    }

    #[test]
    fn test_single_reference_and_literal_formulas() {
        let f = Fixture::new(vec![vec![v("hello"), v(2.5)]]);

        assert_eq!(f.eval("=A1"), FormulaValue::Text("hello".into()));
        assert_eq!(f.eval("=B1"), FormulaValue::Number(2.5));
        assert_eq!(f.eval("=\"text\""), FormulaValue::Text("text".into()));
        assert_eq!(f.eval("=Z99"), FormulaValue::Empty);
    }

    #[test]
    fn test_malformed_formulas_are_errors() {
        let f = Fixture::new(vec![vec![v(1.0)]]);

        for formula in ["=", "=1+", "=foo(1)", "=A1:A3", "=window.alert(1)", "=1/0", "=SUM(A1"] {
            assert_eq!(
                f.eval(formula),
                FormulaValue::Error(CellError::Error),
                "{formula}"
            );
        }
    }

    #[test]
    fn test_nested_calls_in_expressions() {
        let f = Fixture::new(vec![vec![v(1.0)], vec![v(2.0)], vec![v(3.0)], vec![v("x")]]);

        assert_eq!(f.eval("=SUM(A1:A3)*2"), FormulaValue::Number(12.0));
        assert_eq!(f.eval("=MAX(A1:A3)-MIN(A1:A3)"), FormulaValue::Number(2.0));
        assert_eq!(f.eval("=ROUND(SUM(A1:A3)/4, 1)+1"), FormulaValue::Number(2.5));
        assert_eq!(f.eval("=1+UPPER(A4)"), FormulaValue::Error(CellError::Error));
    }

    #[test]
    fn test_formula_cells_are_evaluated_through_references() {
        let f = Fixture::new(vec![vec![v(2.0), v("=A1*10"), v("=B1+1"), v("=C1>20")]]);

        assert_eq!(f.cell(0, 1), FormulaValue::Number(20.0));
        assert_eq!(f.cell(0, 2), FormulaValue::Number(21.0));
        assert_eq!(f.cell(0, 3), FormulaValue::Boolean(true));
        assert_eq!(f.eval("=D1*2"), FormulaValue::Number(2.0));
    }

    #[test]
    fn test_circular_cells_short_circuit() {
        let f = Fixture::new(vec![vec![v("=B1+1"), v("=A1+1"), v("=A1*2")]]);

        assert_eq!(f.cell(0, 0), FormulaValue::Error(CellError::Circular));
        assert_eq!(f.cell(0, 1), FormulaValue::Error(CellError::Circular));
        // Reads the cycle without being part of it
        assert!(!f.circular.contains(CellKey::new(0, 2)));
        assert_eq!(f.cell(0, 2), FormulaValue::Error(CellError::Circular));
    }

    #[test]
    fn test_untracked_cycle_is_caught_during_evaluation() {
        let f = Fixture::new(vec![vec![v("=B1"), v("=A1")]]);
        let empty = CircularSet::default();
        let ctx = EvaluationContext::new(&f.grid, &f.formulas, &empty, &f.options);

        assert_eq!(ctx.cell_value(0, 0), FormulaValue::Error(CellError::Circular));
    }

    #[test]
    fn test_depth_limit() {
        let mut rows = vec![vec![v(1.0)]];
        for row in 1..40u32 {
            rows.push(vec![v(format!("=A{}+1", row))]);
        }
        let mut f = Fixture::new(rows);

        assert_eq!(f.cell(39, 0), FormulaValue::Number(40.0));

        f.options = EngineOptions::default().with_max_evaluation_depth(10);
        assert_eq!(f.cell(39, 0), FormulaValue::Error(CellError::Error));
    }

    #[test]
    fn test_value_of_falls_back_to_literal_text() {
        let f = Fixture::new(vec![vec![v(4.0)]]);
        let ctx = f.context();

        assert_eq!(
            ctx.value_of(&Argument::parse("SUM(A1, 1)")).unwrap(),
            FormulaValue::Number(5.0)
        );
        assert_eq!(
            ctx.value_of(&Argument::parse("pending review")).unwrap(),
            FormulaValue::Text("pending review".into())
        );
        assert_eq!(
            ctx.value_of(&Argument::parse("TRUE")).unwrap(),
            FormulaValue::Boolean(true)
        );
        assert!(ctx.value_of(&Argument::parse("A1:A2")).is_err());
    }

    #[test]
    fn test_raw_text_reads_uncalculated_content() {
        let f = Fixture::new(vec![vec![v("  padded "), v("=1+2"), v(12.5)]]);
        let ctx = f.context();

        assert_eq!(ctx.raw_text_of(&Argument::parse("A1")).unwrap(), "  padded ");
        assert_eq!(ctx.raw_text_of(&Argument::parse("B1")).unwrap(), "=1+2");
        assert_eq!(ctx.raw_text_of(&Argument::parse("C1")).unwrap(), "12.5");
        assert_eq!(ctx.raw_text_of(&Argument::parse("\"q\"")).unwrap(), "q");
    }

    #[test]
    fn test_memo_is_per_context() {
        let mut f = Fixture::new(vec![vec![v(1.0), v("=A1+1")]]);
        assert_eq!(f.cell(0, 1), FormulaValue::Number(2.0));

        offer_sheets_core::HostGrid::set_value(&mut f.grid, 0, 0, v(10.0));
        assert_eq!(f.cell(0, 1), FormulaValue::Number(11.0));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(FormulaValue::Number(15.0).to_string(), "15");
        assert_eq!(FormulaValue::Boolean(false).to_string(), "FALSE");
        assert_eq!(FormulaValue::Error(CellError::NotAvailable).to_string(), "#N/A");
        assert_eq!(FormulaValue::Empty.to_string(), "");
    }
}
