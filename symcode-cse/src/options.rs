use crate::{
    error::{InvalidIvarsName, UnknownCollectMode},
    symbols::{is_identifier, Symbols},
    transform::Optimization,
};
use std::{fmt, str::FromStr};
use symcode_error::Error;

/// How the collector decomposes the expressions it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectMode {
    /// Every distinct compound node gets its own intermediate variable, so that equal
    /// subexpressions are shared.
    #[default]
    UniqueOps,

    /// Every whole expression gets one intermediate variable, without looking inside it.
    WholeExpr,
}

impl FromStr for CollectMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unique-ops" | "cse" => Ok(Self::UniqueOps),
            "whole-expr" | "none" => Ok(Self::WholeExpr),
            _ => Err(Error::without_spans(UnknownCollectMode { mode: s.to_owned() })),
        }
    }
}

impl fmt::Display for CollectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UniqueOps => write!(f, "unique-ops"),
            Self::WholeExpr => write!(f, "whole-expr"),
        }
    }
}

/// Options to use when collecting subexpressions.
#[derive(Debug, Clone)]
pub struct CseOptions {
    /// The prefix of the emitted temporaries, which are named `ivars_name0`, `ivars_name1`, and
    /// so on.
    ///
    /// The default value is `"tmp"`.
    pub ivars_name: String,

    /// Whether to look for sums and products that share some, but not all, of their operands, and
    /// factor the shared part out. When `false`, only structurally equal subexpressions are
    /// shared.
    ///
    /// The default value is `true`.
    pub opt_muladd: bool,

    /// How expressions are decomposed.
    ///
    /// The default value is [`CollectMode::UniqueOps`].
    pub mode: CollectMode,

    /// Rewrites applied to the inputs before collection, and undone on the outputs afterwards.
    ///
    /// The default value is empty.
    pub optimizations: Vec<Optimization>,

    /// Overrides the names given to emitted temporaries. When set, [`CseOptions::ivars_name`] is
    /// ignored for naming.
    ///
    /// The default value is [`None`].
    pub symbols: Option<Symbols>,
}

/// The default options. Returns a [`CseOptions`] with the following values:
///
/// - [`ivars_name`](CseOptions::ivars_name): `"tmp"`
/// - [`opt_muladd`](CseOptions::opt_muladd): `true`
/// - [`mode`](CseOptions::mode): [`CollectMode::UniqueOps`]
/// - [`optimizations`](CseOptions::optimizations): empty
/// - [`symbols`](CseOptions::symbols): [`None`]
impl Default for CseOptions {
    fn default() -> Self {
        Self {
            ivars_name: "tmp".to_string(),
            opt_muladd: true,
            mode: CollectMode::UniqueOps,
            optimizations: Vec::new(),
            symbols: None,
        }
    }
}

impl CseOptions {
    /// Set the prefix of emitted temporaries. Returns an updated [`CseOptions`] for chaining.
    pub fn ivars_name(mut self, name: impl Into<String>) -> Self {
        self.ivars_name = name.into();
        self
    }

    /// Enable or disable sum / product factoring. Returns an updated [`CseOptions`] for chaining.
    pub fn opt_muladd(mut self, enabled: bool) -> Self {
        self.opt_muladd = enabled;
        self
    }

    /// Set the collection mode. Returns an updated [`CseOptions`] for chaining.
    pub fn mode(mut self, mode: CollectMode) -> Self {
        self.mode = mode;
        self
    }

    /// Add a rewrite pair after the existing ones. Returns an updated [`CseOptions`] for chaining.
    pub fn optimization(mut self, optimization: Optimization) -> Self {
        self.optimizations.push(optimization);
        self
    }

    /// Set the stream of names for emitted temporaries. Returns an updated [`CseOptions`] for
    /// chaining.
    pub fn symbols(mut self, symbols: Symbols) -> Self {
        self.symbols = Some(symbols);
        self
    }

    /// Checks that the names the options would generate are valid symbol names.
    pub fn validate(&self) -> Result<(), Error> {
        let prefix = self.symbols.as_ref().map_or(self.ivars_name.as_str(), Symbols::prefix);
        if is_identifier(prefix) {
            Ok(())
        } else {
            Err(Error::without_spans(InvalidIvarsName { name: prefix.to_owned() }))
        }
    }

    /// Returns the stream of names for emitted temporaries.
    pub(crate) fn emitted_names(&self) -> Symbols {
        self.symbols.clone().unwrap_or_else(|| Symbols::new(self.ivars_name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modes() {
        assert_eq!("unique-ops".parse::<CollectMode>().unwrap(), CollectMode::UniqueOps);
        assert_eq!("cse".parse::<CollectMode>().unwrap(), CollectMode::UniqueOps);
        assert_eq!("whole-expr".parse::<CollectMode>().unwrap(), CollectMode::WholeExpr);
        assert_eq!(CollectMode::WholeExpr.to_string().parse::<CollectMode>().unwrap(), CollectMode::WholeExpr);
    }

    #[test]
    fn unknown_mode() {
        let err = "deep".parse::<CollectMode>().unwrap_err();
        assert_eq!(err.kind_as::<UnknownCollectMode>(), Some(&UnknownCollectMode { mode: "deep".to_string() }));
        assert_eq!(err.to_string(), "unknown collection mode `deep`");
    }

    #[test]
    fn validate_prefix() {
        assert!(CseOptions::default().validate().is_ok());
        assert!(CseOptions::default().ivars_name("x y").validate().unwrap_err().is::<InvalidIvarsName>());
        assert!(CseOptions::default()
            .ivars_name("x y")
            .symbols(Symbols::new("t"))
            .validate()
            .is_ok());
    }
}
