//! Cell value types

use std::fmt;

/// Raw cell content as stored by the host grid (`string | number | null`)
///
/// Formula cells hold their formula text (starting with `=`) here; the
/// computed value lives elsewhere.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RawValue {
    /// Empty cell (no value)
    #[default]
    Empty,
    /// Numeric value
    Number(f64),
    /// Text value, including formula text
    Text(String),
}

impl RawValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        RawValue::Text(s.into())
    }

    /// Check if the cell is empty or holds only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Number(_) => false,
            RawValue::Text(s) => s.trim().is_empty(),
        }
    }

    /// Get the formula text if the content starts with `=`
    pub fn formula_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) if s.starts_with('=') => Some(s),
            _ => None,
        }
    }

    /// Try to interpret the value as a finite number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) if n.is_finite() => Some(*n),
            RawValue::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Get the value as display text (numbers formatted, empty as "")
    pub fn to_text(&self) -> String {
        match self {
            RawValue::Empty => String::new(),
            RawValue::Number(n) => format_number(*n),
            RawValue::Text(s) => s.clone(),
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Empty => "empty",
            RawValue::Number(_) => "number",
            RawValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::text(s)
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Empty, Into::into)
    }
}

/// Parse decimal text into a finite number
///
/// Accepts an optional sign, digits, a decimal point and an exponent.
/// Words such as `inf` or `NaN` are rejected even though `f64::from_str`
/// accepts them.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-' | b'e' | b'E'))
    {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Format a number for display: integers without a fraction, everything
/// else with the shortest round-tripping representation
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Error values shown in place of a computed result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellError {
    /// #ERROR! - Malformed formula, bad arguments or failed evaluation
    Error,
    /// #CIRCULAR! - The cell is part of a dependency cycle
    Circular,
    /// #N/A - A lookup found no match
    NotAvailable,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Error => "#ERROR!",
            CellError::Circular => "#CIRCULAR!",
            CellError::NotAvailable => "#N/A",
        }
    }

    /// Parse an error string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "#ERROR!" => Some(CellError::Error),
            "#CIRCULAR!" => Some(CellError::Circular),
            "#N/A" => Some(CellError::NotAvailable),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
