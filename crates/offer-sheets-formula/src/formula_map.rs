//! Formula storage keyed by cell

use ahash::AHashMap;
use offer_sheets_core::{CellKey, RawValue};

/// Formula text for every formula cell
///
/// Only strings beginning with `=` are stored. Recording any other
/// content for a cell removes its entry.
#[derive(Debug, Clone, Default)]
pub struct FormulaMap {
    formulas: AHashMap<CellKey, String>,
}

impl FormulaMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cell's new raw content
    ///
    /// Returns `true` if the map changed.
    pub fn record(&mut self, key: CellKey, content: &RawValue) -> bool {
        match content.formula_text() {
            Some(formula) => self.insert(key, formula),
            None => self.remove(key).is_some(),
        }
    }

    /// Store formula text for a cell
    ///
    /// Text not starting with `=` removes the entry instead. Returns
    /// `true` if the map changed.
    pub fn insert(&mut self, key: CellKey, formula: &str) -> bool {
        if !formula.starts_with('=') {
            return self.remove(key).is_some();
        }
        match self.formulas.get(&key) {
            Some(existing) if existing == formula => false,
            _ => {
                self.formulas.insert(key, formula.to_string());
                true
            }
        }
    }

    /// Remove a cell's formula
    pub fn remove(&mut self, key: CellKey) -> Option<String> {
        self.formulas.remove(&key)
    }

    /// Formula text at a cell
    pub fn get(&self, key: CellKey) -> Option<&str> {
        self.formulas.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: CellKey) -> bool {
        self.formulas.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    /// Remove every formula
    pub fn clear(&mut self) {
        self.formulas.clear();
    }

    /// Iterate over `(key, formula)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (CellKey, &str)> {
        self.formulas.iter().map(|(k, f)| (*k, f.as_str()))
    }

    /// All formula cell keys, sorted by row then column
    pub fn keys_sorted(&self) -> Vec<CellKey> {
        let mut keys: Vec<CellKey> = self.formulas.keys().copied().collect();
        keys.sort();
        keys
    }
}

impl FromIterator<(CellKey, String)> for FormulaMap {
    fn from_iter<I: IntoIterator<Item = (CellKey, String)>>(iter: I) -> Self {
        let mut map = FormulaMap::new();
        for (key, formula) in iter {
            map.insert(key, &formula);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_only_formulas() {
        let mut map = FormulaMap::new();
        let key = CellKey::new(0, 0);

        assert!(map.record(key, &RawValue::text("=B1+1")));
        assert_eq!(map.get(key), Some("=B1+1"));
        assert!(!map.record(key, &RawValue::text("=B1+1")));

        assert!(map.record(key, &RawValue::text("B1+1")));
        assert_eq!(map.get(key), None);

        assert!(map.record(key, &RawValue::text("=1")));
        assert!(map.record(key, &RawValue::Empty));
        assert!(map.is_empty());
        assert!(!map.record(key, &RawValue::Number(3.0)));
    }

    #[test]
    fn test_keys_sorted() {
        let map: FormulaMap = [
            (CellKey::new(2, 0), "=1".to_string()),
            (CellKey::new(0, 5), "=2".to_string()),
            (CellKey::new(0, 1), "not a formula".to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.len(), 2);
        assert_eq!(map.keys_sorted(), vec![CellKey::new(0, 5), CellKey::new(2, 0)]);
    }
}
