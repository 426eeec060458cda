//! Cell keys used to index formulas and the dependency graph

use super::address::CellAddress;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Unique key for a cell, rendered as `"row-col"` (both 0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellKey {
    pub row: u32,
    pub col: u32,
}

impl CellKey {
    /// Create a new cell key
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse the `"row-col"` form
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidCellKey(s.to_string());
        let (row, col) = s.split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            row: row.parse().map_err(|_| invalid())?,
            col: col.parse().map_err(|_| invalid())?,
        })
    }

    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }
}

impl From<CellAddress> for CellKey {
    fn from(addr: CellAddress) -> Self {
        Self::new(addr.row, addr.col)
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

impl FromStr for CellKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_key_round_trip() {
        let key = CellKey::new(3, 12);
        assert_eq!(key.to_string(), "3-12");
        assert_eq!("3-12".parse::<CellKey>().unwrap(), key);
        assert_eq!(key.address().to_string(), "M4");
    }

    #[test]
    fn test_cell_key_parse_errors() {
        assert!(CellKey::parse("3").is_err());
        assert!(CellKey::parse("a-1").is_err());
        assert!(CellKey::parse("-1-2").is_err());
    }
}
