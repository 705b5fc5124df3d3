use crate::{consts, primitive::float};
use levenshtein::levenshtein;
use rug::{Assign, Float};
use std::collections::HashMap;
use super::builtin::BUILTINS;

/// A context to use when evaluating an expression, containing the values of the variables that
/// can be used within the expression.
///
/// The default context defines the constants `pi` and `e`. Use [`Ctxt::empty`] for a context
/// without them.
#[derive(Debug, Clone)]
pub struct Ctxt {
    /// The variables in the context.
    vars: HashMap<String, Float>,
}

impl Default for Ctxt {
    fn default() -> Self {
        let mut ctxt = Self::empty();
        ctxt.add_var("pi", &*consts::PI);
        ctxt.add_var("e", &*consts::E);
        ctxt
    }
}

impl Ctxt {
    /// Creates a context with the default constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with no variables at all.
    pub fn empty() -> Self {
        Self { vars: HashMap::new() }
    }

    /// Adds a variable to the context, replacing any previous value.
    pub fn add_var<T>(&mut self, name: &str, value: T)
    where
        Float: Assign<T>,
    {
        self.vars.insert(name.to_owned(), float(value));
    }

    /// Builder-style version of [`Ctxt::add_var`].
    pub fn with_var<T>(mut self, name: &str, value: T) -> Self
    where
        Float: Assign<T>,
    {
        self.add_var(name, value);
        self
    }

    /// Returns the value of the variable, if it is defined.
    pub fn get_var(&self, name: &str) -> Option<&Float> {
        self.vars.get(name)
    }

    /// Returns all builtin functions with a name similar to the given name.
    pub fn get_similar_funcs(&self, name: &str) -> Vec<String> {
        BUILTINS
            .iter()
            .filter(|(n, _)| levenshtein(n, name) < 2)
            .map(|(n, _)| n.to_string())
            .collect()
    }
}
