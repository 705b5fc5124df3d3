use std::collections::HashSet;

/// Returns true if `name` is a valid symbol name: a letter or `_`, followed by letters, digits, or
/// `_`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// An endless stream of numbered names, `prefix0`, `prefix1`, and so on.
///
/// Names in the exclusion set are skipped, which is how generated variables avoid capturing the
/// symbols of the expressions they are generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbols {
    prefix: String,
    next: usize,
    exclude: HashSet<String>,
}

impl Symbols {
    /// Creates a stream of names with the given prefix, starting at `0`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
            exclude: HashSet::new(),
        }
    }

    /// Set the number of the next name. Returns an updated [`Symbols`] for chaining.
    pub fn start(mut self, start: usize) -> Self {
        self.next = start;
        self
    }

    /// Never produce any of the given names. Returns an updated [`Symbols`] for chaining.
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_exclusions(names);
        self
    }

    /// Never produce any of the given names from now on.
    pub fn add_exclusions<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(names.into_iter().map(Into::into));
    }

    /// The prefix of every produced name.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Produces the next name.
    pub fn next_name(&mut self) -> String {
        loop {
            let name = format!("{}{}", self.prefix, self.next);
            self.next += 1;
            if !self.exclude.contains(&name) {
                return name;
            }
        }
    }
}

impl Iterator for Symbols {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_name())
    }
}
