//! Name resolution for the expression grammar.

use crate::{
    expr::{Constant, Variable},
    function::{library, Builtin, Function, Operator},
};
use levenshtein::levenshtein;
use std::collections::HashMap;
use thiserror::Error;

/// The maximum edit distance between a misspelled name and a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// The maximum number of suggestions attached to a lookup error.
const MAX_SUGGESTIONS: usize = 3;

/// A name could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("unknown variable `{name}`")]
    UnknownVariable {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("unknown function `{name}`")]
    UnknownFunction {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("unknown constant `{name}`")]
    UnknownConstant {
        name: String,
        suggestions: Vec<String>,
    },
}

impl LookupError {
    /// The name that could not be resolved.
    pub fn name(&self) -> &str {
        match self {
            Self::UnknownVariable { name, .. }
            | Self::UnknownFunction { name, .. }
            | Self::UnknownConstant { name, .. } => name,
        }
    }

    /// Registered names close to the one that could not be resolved, closest first.
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::UnknownVariable { suggestions, .. }
            | Self::UnknownFunction { suggestions, .. }
            | Self::UnknownConstant { suggestions, .. } => suggestions,
        }
    }
}

/// Returns the keys closest to `name`, at most [`MAX_SUGGESTIONS`] of them.
fn similar<'a>(keys: impl Iterator<Item = &'a String>, name: &str) -> Vec<String> {
    let mut candidates = keys
        .map(|key| (levenshtein(key, name), key))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .collect::<Vec<_>>();
    candidates.sort();
    candidates.into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, key)| key.clone())
        .collect()
}

/// Maps identifiers to the variables, functions and constants they name.
///
/// Variables are looked up by their exact [id](Variable::id). Function names are
/// case-insensitive: they are stored and looked up in lower case. Constants are looked up by
/// their render name, such as `pi`.
///
/// The [`Default`] registry contains every operator (under its id, such as `@add`), every
/// builtin function, the [standard library](crate::function::library) and every constant, but no
/// variables.
#[derive(Debug, Clone)]
pub struct Registry {
    variables: HashMap<String, Variable>,
    functions: HashMap<String, Function>,
    constants: HashMap<String, Constant>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for operator in Operator::ALL {
            registry.add_function(Function::Operator(operator));
        }
        for builtin in Builtin::ALL {
            registry.add_function(builtin.function());
        }
        for function in library() {
            registry.add_function(function);
        }
        for constant in Constant::ALL {
            registry.add_constant(constant);
        }
        registry
    }
}

impl Registry {
    /// Creates an empty registry.
    ///
    /// The empty registry cannot resolve any function, not even `sqrt`. Consider using the
    /// [`Default`] implementation instead.
    pub fn empty() -> Self {
        Self {
            variables: HashMap::new(),
            functions: HashMap::new(),
            constants: HashMap::new(),
        }
    }

    /// Adds a variable, replacing any variable with the same id.
    pub fn add_variable(&mut self, variable: Variable) {
        self.variables.insert(variable.id().to_string(), variable);
    }

    /// Adds a function, replacing any function with the same name in any case.
    pub fn add_function(&mut self, function: Function) {
        self.functions.insert(function.name().to_lowercase(), function);
    }

    pub fn add_constant(&mut self, constant: Constant) {
        self.constants.insert(constant.name().to_string(), constant);
    }

    pub fn variable(&self, name: &str) -> Result<&Variable, LookupError> {
        self.variables
            .get(name)
            .ok_or_else(|| LookupError::UnknownVariable {
                name: name.to_string(),
                suggestions: similar(self.variables.keys(), name),
            })
    }

    pub fn function(&self, name: &str) -> Result<&Function, LookupError> {
        let key = name.to_lowercase();
        self.functions
            .get(&key)
            .ok_or_else(|| LookupError::UnknownFunction {
                name: name.to_string(),
                suggestions: similar(self.functions.keys(), &key),
            })
    }

    pub fn constant(&self, name: &str) -> Result<Constant, LookupError> {
        self.constants
            .get(name)
            .copied()
            .ok_or_else(|| LookupError::UnknownConstant {
                name: name.to_string(),
                suggestions: similar(self.constants.keys(), name),
            })
    }

    /// Returns the registered variables, in no particular order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_contents() {
        let registry = Registry::default();
        assert_eq!(registry.function("sqrt").map(Function::builtin), Ok(Some(Builtin::Sqrt)));
        assert_eq!(registry.function("@add").map(Function::as_operator), Ok(Some(Operator::Add)));
        assert_eq!(registry.function("cosh").map(Function::name), Ok("cosh"));
        assert_eq!(registry.constant("pi"), Ok(Constant::Pi));
        assert_eq!(registry.variables().count(), 0);
        assert!(Registry::empty().function("sqrt").is_err());
    }

    #[test]
    fn case_sensitivity() {
        let mut registry = Registry::default();
        registry.add_variable(Variable::new("x").unwrap());

        assert!(registry.function("SIN").is_ok());
        assert!(registry.function("Sin").is_ok());
        assert!(registry.variable("x").is_ok());
        assert_eq!(
            registry.variable("X"),
            Err(LookupError::UnknownVariable {
                name: "X".to_string(),
                suggestions: vec!["x".to_string()],
            }),
        );
    }

    #[test]
    fn suggestions_are_closest_first() {
        let registry = Registry::default();
        let error = registry.function("sinn").unwrap_err();
        assert_eq!(error.name(), "sinn");
        assert_eq!(error.suggestions(), ["sin", "sinh"]);

        let error = registry.function("totally_unknown").unwrap_err();
        assert!(error.suggestions().is_empty());
    }
}
