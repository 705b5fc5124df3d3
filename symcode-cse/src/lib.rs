//! Common subexpression elimination and code optimization for symbolic expressions.
//!
//! Given a list of [`SymExpr`]s, [`cse`] produces [`Code`]: a sequence of assignments to
//! temporary variables, followed by output expressions that use them. Every subexpression that
//! appears more than once is computed once. Sums and products that share some of their operands
//! are split so that the shared part is also computed once:
//!
//! ```
//! use symcode_cse::{cse, CseOptions};
//! use symcode_compute::SymExpr;
//!
//! let exprs = ["a + b + c", "a + b + d"]
//!     .into_iter()
//!     .map(|src| src.parse::<SymExpr>().unwrap())
//!     .collect::<Vec<_>>();
//! let code = cse(&exprs, &CseOptions::default()).unwrap();
//!
//! assert_eq!(code.assignments.len(), 1);
//! assert_eq!(code.assignments[0].expr, "a + b".parse::<SymExpr>().unwrap());
//! assert_eq!(code.reconstruct(), exprs);
//! ```
//!
//! The lower-level pieces are available too: [`Collector`] builds the table of intermediate
//! variables, [`Collector::get`] extracts code from it, and the passes in [`optimize`] rewrite
//! existing code.

pub mod code;
pub mod collect;
pub mod error;
pub mod extract;
pub mod optimize;
pub mod options;
pub mod symbols;
pub mod transform;

pub use code::{Assignment, Code, Shape};
pub use collect::Collector;
pub use optimize::{finalize, fully_optimize, OptimizeOptions};
pub use options::{CollectMode, CseOptions};
pub use symbols::Symbols;
pub use transform::{Optimization, NEGATION};

use log::*;
use symcode_compute::{symbolic::Matrix, SymExpr};
use symcode_error::Error;

/// Eliminates the common subexpressions of the given expressions.
///
/// The returned code has one output per expression, in the same order. Temporaries are named by
/// the options, skipping any name that is a symbol of the expressions.
pub fn cse(exprs: &[SymExpr], options: &CseOptions) -> Result<Code, Error> {
    let roots = exprs
        .iter()
        .map(|expr| transform::preprocess(expr, &options.optimizations))
        .collect::<Vec<_>>();

    let mut collector = Collector::new(options.clone())?;
    let collected = collector.collect(&roots)?;
    let code = collector.get(&collected);
    info!(
        "eliminated common subexpressions of {} expressions: {} assignments",
        exprs.len(),
        code.assignments.len(),
    );

    Ok(code.map(|expr| transform::postprocess(expr, &options.optimizations)))
}

/// Eliminates the common subexpressions of the entries of a matrix. The outputs of the returned
/// code are the entries in row-major order, and [`Code::output_matrix`] rebuilds the matrix.
pub fn cse_matrix(matrix: &Matrix, options: &CseOptions) -> Result<Code, Error> {
    let code = cse(matrix.entries(), options)?;
    Ok(code.with_shape(Shape::Matrix { rows: matrix.rows(), cols: matrix.cols() }))
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{afe_abs, afe_absolute_error_msg, afe_is_absolute_eq, assert_float_absolute_eq};
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use symcode_compute::numerical::{eval, eval_f64, Ctxt};
    use super::*;

    fn parse(input: &str) -> SymExpr {
        input.parse().unwrap()
    }

    fn parse_all(inputs: &[&str]) -> Vec<SymExpr> {
        inputs.iter().map(|input| parse(input)).collect()
    }

    /// Evaluates the outputs of the code by running its assignments in order.
    fn run(code: &Code, ctxt: &Ctxt) -> Vec<f64> {
        let mut ctxt = ctxt.clone();
        for assignment in &code.assignments {
            let value = eval(&assignment.expr, &ctxt).unwrap();
            ctxt.add_var(&assignment.name, value);
        }
        code.outputs.iter().map(|output| eval_f64(output, &ctxt).unwrap()).collect()
    }

    /// Checks that both codes compute the same outputs for a few random positive inputs.
    fn assert_same_values(expected: &Code, actual: &Code) {
        let mut rng = rand::thread_rng();
        for _ in 0..10 {
            let mut ctxt = Ctxt::empty();
            for input in expected.inputs() {
                ctxt.add_var(&input, rng.gen_range(0.5..2.0));
            }

            let expected = run(expected, &ctxt);
            let actual = run(actual, &ctxt);
            assert_eq!(expected.len(), actual.len());
            for (expected, actual) in expected.into_iter().zip(actual) {
                assert_float_absolute_eq!(expected, actual, 1e-9);
            }
        }
    }

    #[test]
    fn partial_sums_shared() {
        let exprs = parse_all(&["a + b + c", "a + b + d"]);
        let code = cse(&exprs, &CseOptions::default()).unwrap();
        assert_eq!(code.assignments, vec![Assignment::new("tmp0", parse("a + b"))]);
        assert_eq!(code.outputs, parse_all(&["tmp0 + c", "tmp0 + d"]));
    }

    #[test]
    fn without_muladd_only_equal_nodes_shared() {
        let exprs = parse_all(&["a + b + c", "a + b + d"]);
        let code = cse(&exprs, &CseOptions::default().opt_muladd(false)).unwrap();
        assert!(code.assignments.is_empty());
        assert_eq!(code.outputs, exprs);
    }

    #[test]
    fn exact_duplicate() {
        let exprs = parse_all(&["x*y + 1", "sin(x*y + 1)"]);
        let code = cse(&exprs, &CseOptions::default()).unwrap();
        assert_eq!(code.assignments, vec![Assignment::new("tmp0", parse("x*y + 1"))]);
        assert_eq!(code.outputs, parse_all(&["tmp0", "sin(tmp0)"]));
    }

    #[test]
    fn whole_expressions() {
        let exprs = parse_all(&["x*y + 1", "1 + y*x", "sin(x*y)"]);
        let code = cse(&exprs, &CseOptions::default().mode(CollectMode::WholeExpr)).unwrap();
        assert_eq!(code.assignments, vec![Assignment::new("tmp0", parse("x*y + 1"))]);
        assert_eq!(code.outputs, parse_all(&["tmp0", "tmp0", "sin(x*y)"]));
    }

    #[test]
    fn names_skip_input_symbols() {
        let exprs = parse_all(&["sin(tmp0*a) + cos(tmp0*a)"]);
        let code = cse(&exprs, &CseOptions::default()).unwrap();
        assert_eq!(code.assignments, vec![Assignment::new("tmp1", parse("tmp0*a"))]);
    }

    #[test]
    fn invalid_prefix() {
        let err = cse(&parse_all(&["a*b"]), &CseOptions::default().ivars_name("1x")).unwrap_err();
        assert!(err.is::<error::InvalidIvarsName>());
    }

    #[test]
    fn unknown_mode() {
        let err = "everything".parse::<CollectMode>().unwrap_err();
        assert_eq!(err.kind_as::<error::UnknownCollectMode>(), Some(&error::UnknownCollectMode {
            mode: "everything".to_string(),
        }));
    }

    #[test]
    fn negation() {
        let exprs = parse_all(&["-a - b", "sin(a + b)"]);
        let code = cse(&exprs, &CseOptions::default().optimization(NEGATION)).unwrap();
        assert_eq!(code.assignments, vec![Assignment::new("tmp0", parse("a + b"))]);

        let restored = code.reconstruct().iter().map(transform::distribute_negation).collect::<Vec<_>>();
        assert_eq!(restored, exprs);
    }

    #[test]
    fn matrix() {
        let matrix = Matrix::from_rows(vec![
            parse_all(&["cos(t)", "-sin(t)"]),
            parse_all(&["sin(t)", "cos(t)"]),
        ]).unwrap();
        let code = cse_matrix(&matrix, &CseOptions::default()).unwrap();
        assert_eq!(code.assignments.len(), 2);
        assert_eq!(code.reconstruct(), matrix.entries());

        let outputs = code.output_matrix().unwrap();
        assert_eq!((outputs.rows(), outputs.cols()), (2, 2));
        assert_eq!(outputs.get(1, 1), outputs.get(0, 0));
    }

    #[test]
    fn round_trip() {
        let exprs = parse_all(&[
            "x^2 + 2*x*y + y^2",
            "(x + y)^2 - sin(x*y)",
            "x*y*z + x*y + exp(x*y*z)",
            "atan2(y, x) + atan2(x, y)*x*y",
            "1.5*x - 3",
        ]);
        for opt_muladd in [true, false] {
            let code = cse(&exprs, &CseOptions::default().opt_muladd(opt_muladd)).unwrap();
            assert!(code.validate().is_ok());
            assert_eq!(code.reconstruct(), exprs);
        }
    }

    #[test]
    fn shared_sums_demo() {
        let input = include_str!("../../demos/shared_sums.sym").parse::<Code>().unwrap();
        let code = cse(&input.outputs, &CseOptions::default()).unwrap();
        assert!(code.validate().is_ok());
        assert!(code.op_count() < input.op_count());
        assert_eq!(code.reconstruct(), input.outputs);
        assert_same_values(&input, &code);
    }

    #[test]
    fn two_link_arm_demo() {
        let input = include_str!("../../demos/two_link_arm.sym").parse::<Code>().unwrap();
        let optimized = fully_optimize(&input, &OptimizeOptions::default()).unwrap();
        assert!(optimized.validate().is_ok());
        assert!(optimized.op_count() < input.op_count());
        assert_same_values(&input, &optimized);

        // `q1 + q2` is computed once
        let sums = optimized.assignments
            .iter()
            .filter(|assignment| assignment.expr == parse("q1 + q2"))
            .count();
        assert_eq!(sums, 1);
    }

    #[test]
    fn rotation_demo() {
        let input = include_str!("../../demos/rotation.sym").parse::<Code>().unwrap();
        let options = OptimizeOptions::default().ivars_name("r").single_var_output(true);
        let optimized = fully_optimize(&input, &options).unwrap();
        assert!(optimized.validate().is_ok());
        assert!(optimized.outputs.iter().all(SymExpr::is_atom));
        assert!(optimized.assignments.iter().all(|assignment| assignment.name.starts_with('r')));
        assert_same_values(&input, &optimized);
    }

    /// Builds a random tree of sums, products, and calls over a few symbols and small integers.
    fn random_expr(rng: &mut StdRng, depth: u32) -> SymExpr {
        if depth == 0 || rng.gen_bool(0.25) {
            return match rng.gen_range(0..6) {
                5 => SymExpr::integer(rng.gen_range(2..4i32)),
                i => SymExpr::symbol(["a", "b", "c", "d", "e"][i]),
            };
        }

        let operands = (0..rng.gen_range(2..5))
            .map(|_| random_expr(rng, depth - 1))
            .collect::<Vec<_>>();
        match rng.gen_range(0..5) {
            0 | 1 => SymExpr::sum(operands),
            2 | 3 => SymExpr::product(operands),
            _ => SymExpr::call("f", operands),
        }
    }

    #[test]
    fn random_sums_and_products() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for case in 0..3000 {
            let exprs = (0..rng.gen_range(1..5))
                .map(|_| random_expr(&mut rng, 4))
                .collect::<Vec<_>>();

            for opt_muladd in [true, false] {
                let code = cse(&exprs, &CseOptions::default().opt_muladd(opt_muladd)).unwrap();
                assert!(code.validate().is_ok(), "case {}", case);
                assert_eq!(code.reconstruct(), exprs, "case {}", case);

                for (i, assignment) in code.assignments.iter().enumerate() {
                    assert!(!assignment.expr.is_atom(), "case {}: {} is a copy", case, assignment.name);
                    let uses = code.assignments[i + 1..]
                        .iter()
                        .map(|later| &later.expr)
                        .chain(&code.outputs)
                        .map(|expr| expr.count_symbol(&assignment.name))
                        .sum::<usize>();
                    assert!(uses >= 2, "case {}: {} is used {} time(s)", case, assignment.name, uses);
                }
            }
        }
    }

    #[test]
    fn wide_sums() {
        let products = (0..2000)
            .map(|i| SymExpr::symbol(format!("x{}", i)) * SymExpr::symbol(format!("y{}", i)))
            .collect::<Vec<_>>();
        let all = SymExpr::sum(products.clone());
        let half = SymExpr::sum(products[..1000].iter().cloned().chain([SymExpr::symbol("z")]));
        let exprs = vec![all, half];

        let code = cse(&exprs, &CseOptions::default()).unwrap();
        assert_eq!(code.assignments.len(), 1);
        assert_eq!(code.assignments[0].expr, SymExpr::sum(products[..1000].iter().cloned()));
        assert_eq!(code.reconstruct(), exprs);
    }

    #[test]
    fn deep_nesting() {
        let mut expr = parse("x + 1");
        for i in 0..500 {
            expr = if i % 2 == 0 {
                SymExpr::call("sin", vec![expr])
            } else {
                expr * parse("x + 1")
            };
        }
        let exprs = vec![expr.clone(), SymExpr::call("cos", vec![expr])];

        let code = cse(&exprs, &CseOptions::default()).unwrap();
        assert!(code.validate().is_ok());
        assert_eq!(code.reconstruct(), exprs);
    }
}
