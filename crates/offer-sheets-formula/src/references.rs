//! Reference token scanning
//!
//! Finds `A1`, `$A$1` and `A1:B5` tokens inside formula text. String
//! literals are skipped, and a token only counts when it stands on its
//! own: `LOG10(`, `x2A1` or `2E5` do not yield references.

use lazy_regex::regex;
use offer_sheets_core::{CellAddress, CellRange, CellReference};

/// A reference token found in formula text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceToken {
    /// Single cell reference
    Cell(CellReference),
    /// Range reference; endpoints keep their own absolute markers
    Range {
        start: CellReference,
        end: CellReference,
    },
}

impl ReferenceToken {
    /// The normalized range covered by this token
    pub fn range(&self) -> CellRange {
        match self {
            ReferenceToken::Cell(r) => CellRange::single(r.address),
            ReferenceToken::Range { start, end } => CellRange::new(start.address, end.address),
        }
    }

    /// Whether this is a range token
    pub fn is_range(&self) -> bool {
        matches!(self, ReferenceToken::Range { .. })
    }

    /// Every cell the token covers
    pub fn addresses(&self) -> impl Iterator<Item = CellAddress> {
        self.range().cells()
    }
}

/// A reference token together with its position in the formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceMatch<'a> {
    /// Matched text
    pub text: &'a str,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    pub token: ReferenceToken,
}

/// Replace the contents of every `"..."` literal with spaces
///
/// Byte offsets are preserved, so spans found in the masked text index
/// the original text. An unterminated literal masks to the end.
pub fn mask_string_literals(formula: &str) -> String {
    let mut masked = String::with_capacity(formula.len());
    let mut in_string = false;

    for c in formula.chars() {
        if c == '"' {
            in_string = !in_string;
            masked.push('"');
        } else if in_string {
            masked.extend(std::iter::repeat(' ').take(c.len_utf8()));
        } else {
            masked.push(c);
        }
    }

    masked
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn boundary_before(masked: &str, start: usize) -> bool {
    match masked[..start].chars().next_back() {
        Some(c) => !is_word_char(c) && c != '$',
        None => true,
    }
}

fn boundary_after(masked: &str, end: usize) -> bool {
    match masked[end..].chars().next() {
        Some(c) => !is_word_char(c) && c != '$' && c != '(',
        None => true,
    }
}

/// Find every standalone reference and range token in a formula
///
/// # Example
/// ```
/// use offer_sheets_formula::references::scan_references;
///
/// let found = scan_references("=SUM(A1:A3)+$B$2&\"C9\"");
/// let texts: Vec<_> = found.iter().map(|m| m.text).collect();
/// assert_eq!(texts, vec!["A1:A3", "$B$2"]);
/// ```
pub fn scan_references(formula: &str) -> Vec<ReferenceMatch<'_>> {
    let masked = mask_string_literals(formula);
    let mut found = Vec::new();

    for m in regex!(r"\$?[A-Z]+\$?[0-9]+(?::\$?[A-Z]+\$?[0-9]+)?").find_iter(&masked) {
        let (start, end) = (m.start(), m.end());
        if !boundary_before(&masked, start) {
            continue;
        }

        let text = &formula[start..end];
        let token = match text.split_once(':') {
            Some((first, second)) => {
                if boundary_after(&masked, end) {
                    match (CellReference::parse(first), CellReference::parse(second)) {
                        (Some(a), Some(b)) => Some((end, ReferenceToken::Range { start: a, end: b })),
                        _ => None,
                    }
                } else {
                    // Trailing junk on the second endpoint; the first one
                    // still stands alone before the ':'
                    CellReference::parse(first)
                        .map(|r| (start + first.len(), ReferenceToken::Cell(r)))
                }
            }
            None if boundary_after(&masked, end) => {
                CellReference::parse(text).map(|r| (end, ReferenceToken::Cell(r)))
            }
            None => None,
        };

        if let Some((end, token)) = token {
            found.push(ReferenceMatch {
                text: &formula[start..end],
                start,
                end,
                token,
            });
        }
    }

    found
}

/// Rebuild a formula, replacing reference tokens
///
/// `replace` returns the new text for a token, or `None` to keep it.
pub fn replace_references<F>(formula: &str, mut replace: F) -> String
where
    F: FnMut(&ReferenceMatch<'_>) -> Option<String>,
{
    let mut result = String::with_capacity(formula.len());
    let mut last = 0;

    for m in scan_references(formula) {
        result.push_str(&formula[last..m.start]);
        match replace(&m) {
            Some(text) => result.push_str(&text),
            None => result.push_str(m.text),
        }
        last = m.end;
    }

    result.push_str(&formula[last..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(formula: &str) -> Vec<&str> {
        scan_references(formula).into_iter().map(|m| m.text).collect()
    }

    #[test]
    fn test_scan_cells_and_ranges() {
        assert_eq!(texts("=A1+$B$2*C$3"), vec!["A1", "$B$2", "C$3"]);
        assert_eq!(texts("=SUM(A1:B5, $D$1:D4)"), vec!["A1:B5", "$D$1:D4"]);

        let found = scan_references("=SUM(B5:A1)");
        assert_eq!(found[0].token.range(), CellRange::from_indices(0, 0, 4, 1));
        assert!(found[0].token.is_range());
        assert_eq!((found[0].start, found[0].end), (5, 10));
    }

    #[test]
    fn test_scan_skips_string_literals() {
        assert_eq!(texts("=CONCATENATE(\"A1\", B2)"), vec!["B2"]);
        assert_eq!(texts("=IF(A1=\"say \"\"B2\"\"\",1,0)"), vec!["A1"]);
    }

    #[test]
    fn test_scan_requires_token_boundaries() {
        assert_eq!(texts("=LOG10(4)"), Vec::<&str>::new());
        assert_eq!(texts("=2E5+x2A1+A1_"), Vec::<&str>::new());
        assert_eq!(texts("=a1+A1"), vec!["A1"]);
        assert_eq!(texts("=A1:B2C+1"), vec!["A1"]);
    }

    #[test]
    fn test_scan_ignores_row_zero() {
        assert_eq!(texts("=A0+B1"), vec!["B1"]);
    }

    #[test]
    fn test_mask_preserves_offsets() {
        let formula = "=\"héllo\"&A1";
        let masked = mask_string_literals(formula);
        assert_eq!(masked.len(), formula.len());
        assert!(masked.ends_with("&A1"));
        assert_eq!(texts(formula), vec!["A1"]);
    }

    #[test]
    fn test_replace_references() {
        let out = replace_references("=A1+B2*A1", |m| {
            (m.text == "A1").then(|| "7".to_string())
        });
        assert_eq!(out, "=7+B2*7");
    }
}
