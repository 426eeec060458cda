//! Cell address, reference and range types
//!
//! This is the reference codec: it converts between zero-based
//! `(row, col)` coordinates and spreadsheet-style tokens such as `B3`,
//! `$B$3`, `$B3`, `B$3` and `A1:B5`.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A cell location (0-based row and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., AA=26)
    pub col: u32,
}

impl CellAddress {
    /// Create a new cell address
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col as u64 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert upper-case column letters to an index (A = 0, Z = 25, AA = 26, etc.)
    ///
    /// Returns `None` for empty input, non `A-Z` characters, or a column
    /// that does not fit in a `u32`.
    pub fn letters_to_column(letters: &str) -> Option<u32> {
        if letters.is_empty() {
            return None;
        }

        let mut col: u64 = 0;
        for b in letters.bytes() {
            if !b.is_ascii_uppercase() {
                return None;
            }
            col = col
                .checked_mul(26)?
                .checked_add((b - b'A') as u64 + 1)?;
            if col > u32::MAX as u64 + 1 {
                return None;
            }
        }

        u32::try_from(col - 1).ok()
    }

    /// Format as a relative A1-style string
    pub fn to_a1_string(&self) -> String {
        format_reference(self.row, self.col, false, false)
    }

    /// Return the address moved by a signed offset, or `None` if it would
    /// leave the grid
    pub fn offset(&self, row_offset: i64, col_offset: i64) -> Option<CellAddress> {
        let row = u32::try_from(self.row as i64 + row_offset).ok()?;
        let col = u32::try_from(self.col as i64 + col_offset).ok()?;
        Some(CellAddress::new(row, col))
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

/// Format a reference as column letters followed by the 1-based row,
/// with `$` markers for absolute components.
///
/// # Examples
/// ```
/// use offer_sheets_core::format_reference;
///
/// assert_eq!(format_reference(2, 1, false, false), "B3");
/// assert_eq!(format_reference(2, 1, true, true), "$B$3");
/// assert_eq!(format_reference(2, 1, false, true), "$B3");
/// assert_eq!(format_reference(2, 1, true, false), "B$3");
/// ```
pub fn format_reference(row: u32, col: u32, absolute_row: bool, absolute_col: bool) -> String {
    let mut result = String::new();

    if absolute_col {
        result.push('$');
    }
    result.push_str(&CellAddress::column_to_letters(col));

    if absolute_row {
        result.push('$');
    }
    result.push_str(&(row as u64 + 1).to_string());

    result
}

/// A parsed reference token: an address plus its absolute markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellReference {
    pub address: CellAddress,
    /// Whether the row component is anchored with `$`
    pub absolute_row: bool,
    /// Whether the column component is anchored with `$`
    pub absolute_col: bool,
}

impl CellReference {
    /// Create a relative reference
    pub fn relative(row: u32, col: u32) -> Self {
        Self::with_absolute(row, col, false, false)
    }

    /// Create a reference with explicit absolute flags
    pub fn with_absolute(row: u32, col: u32, absolute_row: bool, absolute_col: bool) -> Self {
        Self {
            address: CellAddress::new(row, col),
            absolute_row,
            absolute_col,
        }
    }

    /// Parse a token of the form `[$]LETTERS[$]DIGITS`
    ///
    /// Returns `None` for anything else, including lower-case letters,
    /// row `0`, and coordinates that overflow.
    ///
    /// # Examples
    /// ```
    /// use offer_sheets_core::CellReference;
    ///
    /// let r = CellReference::parse("$B3").unwrap();
    /// assert_eq!((r.address.row, r.address.col), (2, 1));
    /// assert!(r.absolute_col);
    /// assert!(!r.absolute_row);
    ///
    /// assert!(CellReference::parse("B").is_none());
    /// assert!(CellReference::parse("3B").is_none());
    /// ```
    pub fn parse(token: &str) -> Option<Self> {
        let bytes = token.as_bytes();
        let mut pos = 0;

        // Check for column absolute marker
        let absolute_col = if bytes.first() == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        // Parse column letters
        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_uppercase() {
            pos += 1;
        }
        let col = CellAddress::letters_to_column(&token[col_start..pos])?;

        // Check for row absolute marker
        let absolute_row = if bytes.get(pos) == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        // Parse row number
        let row_str = &token[pos..];
        if row_str.is_empty() || !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let row: u64 = row_str.parse().ok()?;

        // Rows are 1-based in the token, 0-based internally
        let row = u32::try_from(row.checked_sub(1)?).ok()?;

        Some(Self {
            address: CellAddress::new(row, col),
            absolute_row,
            absolute_col,
        })
    }

    pub fn row(&self) -> u32 {
        self.address.row
    }

    pub fn col(&self) -> u32 {
        self.address.col
    }

    /// Shift the relative components by an offset; absolute components
    /// stay put. Returns `None` if a shifted component leaves the grid.
    pub fn shifted(&self, row_offset: i64, col_offset: i64) -> Option<CellReference> {
        let row_offset = if self.absolute_row { 0 } else { row_offset };
        let col_offset = if self.absolute_col { 0 } else { col_offset };
        let address = self.address.offset(row_offset, col_offset)?;
        Some(CellReference { address, ..*self })
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_reference(
            self.address.row,
            self.address.col,
            self.absolute_row,
            self.absolute_col,
        ))
    }
}

impl FromStr for CellReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::InvalidReference(s.to_string()))
    }
}

/// A rectangular range of cells, normalized so `start` is top-left and
/// `end` is bottom-right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    /// Start address (top-left)
    pub start: CellAddress,
    /// End address (bottom-right)
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new cell range from any two corners
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        Self {
            start: CellAddress::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellAddress::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Create a range from row/column indices
    pub fn from_indices(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self::new(
            CellAddress::new(start_row, start_col),
            CellAddress::new(end_row, end_col),
        )
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse a range token like `A1:B5` (either endpoint may carry `$`)
    ///
    /// Returns `None` unless the token has exactly one `:` and both
    /// endpoints parse.
    pub fn parse(token: &str) -> Option<Self> {
        let (start, end) = token.split_once(':')?;
        let start = CellReference::parse(start)?;
        let end = CellReference::parse(end)?;
        Some(Self::new(start.address, end.address))
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u64 {
        (self.end.row - self.start.row) as u64 + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u64 {
        (self.end.col - self.start.col) as u64 + 1
    }

    /// Get the total number of cells in the range
    ///
    /// Saturates at `u64::MAX` for a range spanning every row and column.
    pub fn cell_count(&self) -> u64 {
        self.row_count().saturating_mul(self.col_count())
    }

    /// Iterate over all cell addresses in the range (row by row)
    pub fn cells(&self) -> CellRangeIterator {
        CellRangeIterator {
            range: *self,
            current_row: self.start.row as u64,
            current_col: self.start.col as u64,
        }
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        format!("{}:{}", self.start, self.end)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::InvalidRange(s.to_string()))
    }
}

/// Iterator over cells in a range
pub struct CellRangeIterator {
    range: CellRange,
    current_row: u64,
    current_col: u64,
}

impl Iterator for CellRangeIterator {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row > self.range.end.row as u64 {
            return None;
        }

        let addr = CellAddress::new(self.current_row as u32, self.current_col as u32);

        // Move to next cell
        self.current_col += 1;
        if self.current_col > self.range.end.col as u64 {
            self.current_col = self.range.start.col as u64;
            self.current_row += 1;
        }

        Some(addr)
    }
}
