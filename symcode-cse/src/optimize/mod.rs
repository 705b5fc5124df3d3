//! Passes that rewrite [`Code`] into equivalent, cheaper code.
//!
//! Every pass takes the code by reference and returns new code with the same reconstructed
//! outputs. [`fully_optimize`] chains them in a fixed order.

pub mod constant_fold;
pub mod copy_prop;
pub mod cse;
pub mod dead_code;
pub mod inline;
pub mod output;
pub mod rename;

pub use constant_fold::constant_fold;
pub use copy_prop::copy_propagate;
pub use cse::common_subexpr_elim;
pub use dead_code::dead_code_elim;
pub use inline::inline;
pub use output::materialize_outputs;
pub use rename::rename;

use crate::{code::Code, options::CseOptions};
use log::*;
use symcode_error::Error;

/// Options for [`fully_optimize`].
#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    /// Options for the common subexpression elimination pass.
    ///
    /// The default value is [`CseOptions::default`], with new variables prefixed by `"cse"`.
    pub cse: CseOptions,

    /// If set, every assignment is renamed to this prefix followed by a dense index, after all
    /// other passes have run.
    ///
    /// The default value is [`None`].
    pub ivars_name: Option<String>,

    /// Whether every output that is not a single symbol or number should be moved into its own
    /// assignment.
    ///
    /// The default value is `false`.
    pub single_var_output: bool,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            cse: CseOptions::default().ivars_name("cse"),
            ivars_name: None,
            single_var_output: false,
        }
    }
}

impl OptimizeOptions {
    /// Set the options for the common subexpression elimination pass. Returns an updated
    /// [`OptimizeOptions`] for chaining.
    pub fn cse(mut self, cse: CseOptions) -> Self {
        self.cse = cse;
        self
    }

    /// Rename all assignments with the given prefix. Returns an updated [`OptimizeOptions`] for
    /// chaining.
    pub fn ivars_name(mut self, name: impl Into<String>) -> Self {
        self.ivars_name = Some(name.into());
        self
    }

    /// Enable or disable output materialization. Returns an updated [`OptimizeOptions`] for
    /// chaining.
    pub fn single_var_output(mut self, enabled: bool) -> Self {
        self.single_var_output = enabled;
        self
    }
}

fn log_pass(name: &str, code: &Code) {
    debug!("{}: {} assignments, {} operations", name, code.assignments.len(), code.op_count());
}

/// Runs every pass over the code:
///
/// 1. [`inline`] and [`copy_propagate`], to expose the whole expressions
/// 2. [`common_subexpr_elim`]
/// 3. [`inline`] and [`copy_propagate`] again, to undo sharing that did not pay off
/// 4. [`constant_fold`]
/// 5. [`rename`], if [`OptimizeOptions::ivars_name`] is set
/// 6. [`materialize_outputs`], if [`OptimizeOptions::single_var_output`] is set
///
/// Returns an error if the input code is malformed.
pub fn fully_optimize(code: &Code, options: &OptimizeOptions) -> Result<Code, Error> {
    code.validate()?;
    log_pass("input", code);

    let code = copy_propagate(&inline(code));
    log_pass("inline", &code);

    let code = common_subexpr_elim(&code, &options.cse)?;
    log_pass("cse", &code);

    let code = copy_propagate(&inline(&code));
    log_pass("inline", &code);

    let code = constant_fold(&code);
    log_pass("constant fold", &code);

    finalize(&code, options)
}

/// Applies the naming options to optimized code: [`rename`] if [`OptimizeOptions::ivars_name`]
/// is set, then [`materialize_outputs`] if [`OptimizeOptions::single_var_output`] is set.
pub fn finalize(code: &Code, options: &OptimizeOptions) -> Result<Code, Error> {
    let mut code = match &options.ivars_name {
        Some(prefix) => rename(code, prefix)?,
        None => code.clone(),
    };
    if options.single_var_output {
        code = materialize_outputs(&code, None)?;
        log_pass("outputs", &code);
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use crate::code::Assignment;
    use pretty_assertions::assert_eq;
    use symcode_compute::SymExpr;
    use super::*;

    fn parse(input: &str) -> SymExpr {
        input.parse().unwrap()
    }

    #[test]
    fn pipeline_preserves_outputs() {
        let code = Code::new(
            vec![
                Assignment::new("u", parse("x + y")),
                Assignment::new("v", parse("u")),
                Assignment::new("w", parse("2 * v")),
            ],
            vec![parse("sin(w) + cos(x + y)"), parse("w^2")],
        );
        let options = OptimizeOptions::default();
        let optimized = fully_optimize(&code, &options).unwrap();
        assert!(optimized.validate().is_ok());
        assert!(optimized.op_count() <= code.op_count());
        assert_eq!(optimized.reconstruct(), code.reconstruct());
    }

    #[test]
    fn renames_and_materializes() {
        let code = Code::new(vec![], vec![parse("sin(a*b) * cos(a*b)"), parse("a")]);
        let options = OptimizeOptions::default()
            .ivars_name("t")
            .single_var_output(true);
        let optimized = fully_optimize(&code, &options).unwrap();
        assert_eq!(optimized.assignments, vec![
            Assignment::new("t0", parse("a*b")),
            Assignment::new("t1", parse("sin(t0) * cos(t0)")),
        ]);
        assert_eq!(optimized.outputs, vec![parse("t1"), parse("a")]);
    }

    #[test]
    fn finalize_after_elimination() {
        let exprs = [parse("sin(a*b) * cos(a*b)"), parse("a")];
        let code = crate::cse(&exprs, &CseOptions::default()).unwrap();
        let options = OptimizeOptions::default()
            .ivars_name("t")
            .single_var_output(true);
        let finished = finalize(&code, &options).unwrap();
        assert_eq!(finished.assignments, vec![
            Assignment::new("t0", parse("a*b")),
            Assignment::new("t1", parse("sin(t0) * cos(t0)")),
        ]);
        assert_eq!(finished.outputs, vec![parse("t1"), parse("a")]);
        assert_eq!(finished.reconstruct(), exprs);

        let unchanged = finalize(&code, &OptimizeOptions::default()).unwrap();
        assert_eq!(unchanged, code);
    }

    #[test]
    fn rejects_malformed_code() {
        let code = Code::new(
            vec![Assignment::new("a", parse("b + 1")), Assignment::new("b", parse("c"))],
            vec![parse("a")],
        );
        assert!(fully_optimize(&code, &OptimizeOptions::default()).is_err());
    }
}
