//! Built-in spreadsheet functions

pub mod logical;
pub mod lookup;
pub mod math;
pub mod text;

use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::{Argument, EvaluationContext, FormulaValue};
use ahash::AHashMap;
use once_cell::sync::Lazy;

/// Function implementation signature
///
/// Handlers receive the classified argument text, not values, so each one
/// decides whether it wants computed values, raw content or whole ranges.
pub type FunctionImpl =
    fn(&[Argument<'_>], &EvaluationContext<'_>) -> FormulaResult<FormulaValue>;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

impl FunctionDef {
    /// Check an argument count against this function's bounds
    pub fn check_arity(&self, count: usize) -> FormulaResult<()> {
        let too_few = count < self.min_args;
        let too_many = self.max_args.map_or(false, |max| count > max);
        if !too_few && !too_many {
            return Ok(());
        }

        let expected = match self.max_args {
            Some(max) if max == self.min_args => max.to_string(),
            Some(max) => format!("{} to {}", self.min_args, max),
            None => format!("at least {}", self.min_args),
        };
        Err(FormulaError::ArgumentCount {
            function: self.name.to_string(),
            expected,
            actual: count,
        })
    }
}

/// Function registry
pub struct FunctionRegistry {
    functions: AHashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: AHashMap::new(),
        };

        registry.register_math_functions();
        registry.register_logical_functions();
        registry.register_text_functions();
        registry.register_lookup_functions();

        registry
    }

    /// Look up a function by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_ascii_uppercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Register a function
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_ascii_uppercase(), def);
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.functions.values().map(|d| d.name).collect();
        names.sort_unstable();
        names
    }

    fn register_math_functions(&mut self) {
        // SUM
        self.register(FunctionDef {
            name: "SUM",
            min_args: 1,
            max_args: None,
            implementation: math::fn_sum,
        });

        // AVERAGE
        self.register(FunctionDef {
            name: "AVERAGE",
            min_args: 1,
            max_args: None,
            implementation: math::fn_average,
        });

        // MIN
        self.register(FunctionDef {
            name: "MIN",
            min_args: 1,
            max_args: None,
            implementation: math::fn_min,
        });

        // MAX
        self.register(FunctionDef {
            name: "MAX",
            min_args: 1,
            max_args: None,
            implementation: math::fn_max,
        });

        // COUNT
        self.register(FunctionDef {
            name: "COUNT",
            min_args: 1,
            max_args: None,
            implementation: math::fn_count,
        });

        // ROUND
        self.register(FunctionDef {
            name: "ROUND",
            min_args: 1,
            max_args: Some(2),
            implementation: math::fn_round,
        });
    }

    fn register_logical_functions(&mut self) {
        // IF
        self.register(FunctionDef {
            name: "IF",
            min_args: 2,
            max_args: Some(3),
            implementation: logical::fn_if,
        });
    }

    fn register_text_functions(&mut self) {
        // CONCATENATE
        self.register(FunctionDef {
            name: "CONCATENATE",
            min_args: 1,
            max_args: None,
            implementation: text::fn_concatenate,
        });

        // LEN
        self.register(FunctionDef {
            name: "LEN",
            min_args: 1,
            max_args: Some(1),
            implementation: text::fn_len,
        });

        // TRIM
        self.register(FunctionDef {
            name: "TRIM",
            min_args: 1,
            max_args: Some(1),
            implementation: text::fn_trim,
        });

        // UPPER
        self.register(FunctionDef {
            name: "UPPER",
            min_args: 1,
            max_args: Some(1),
            implementation: text::fn_upper,
        });

        // LOWER
        self.register(FunctionDef {
            name: "LOWER",
            min_args: 1,
            max_args: Some(1),
            implementation: text::fn_lower,
        });
    }

    fn register_lookup_functions(&mut self) {
        // VLOOKUP
        self.register(FunctionDef {
            name: "VLOOKUP",
            min_args: 3,
            max_args: Some(4),
            implementation: lookup::fn_vlookup,
        });
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static REGISTRY: Lazy<FunctionRegistry> = Lazy::new(FunctionRegistry::new);

/// The built-in function registry
pub fn registry() -> &'static FunctionRegistry {
    &REGISTRY
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup_is_case_insensitive() {
        let reg = registry();
        assert!(reg.contains("SUM"));
        assert!(reg.contains("vlookup"));
        assert!(!reg.contains("EVAL"));
        assert_eq!(
            reg.names(),
            vec![
                "AVERAGE",
                "CONCATENATE",
                "COUNT",
                "IF",
                "LEN",
                "LOWER",
                "MAX",
                "MIN",
                "ROUND",
                "SUM",
                "TRIM",
                "UPPER",
                "VLOOKUP"
            ]
        );
    }

    #[test]
    fn test_check_arity() {
        let def = registry().get("ROUND").unwrap();
        assert!(def.check_arity(1).is_ok());
        assert!(def.check_arity(2).is_ok());
        assert_eq!(
            def.check_arity(3),
            Err(FormulaError::ArgumentCount {
                function: "ROUND".into(),
                expected: "1 to 2".into(),
                actual: 3,
            })
        );
        assert!(registry().get("IF").unwrap().check_arity(1).is_err());
    }
}
