//! Reads lines of the form `name = expr` or `expr` from a file or stdin, and prints the optimized
//! code that computes the given assignments and outputs.
//!
//! ```text
//! symcode [--mode unique-ops|whole-expr] [--prefix NAME] [--no-muladd] [--negation]
//!         [--cse-only] [--single-output] [FILE]
//! ```
//!
//! Set `RUST_LOG=debug` to see the size of the code after each pass.

use log::*;
use std::{fs, io, process::ExitCode};
use symcode_cse::{cse, finalize, fully_optimize, Code, OptimizeOptions, NEGATION};
use symcode_error::{Error, ErrorKind};

/// Command line arguments.
#[derive(Debug, Default)]
struct Args {
    options: OptimizeOptions,
    cse_only: bool,
    file: Option<String>,
}

/// Parses the command line arguments, returning a usage message on failure.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut cse_options = parsed.options.cse.clone();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mode" => {
                let mode = args.next().ok_or("missing value for `--mode`")?;
                cse_options = cse_options.mode(mode.parse().map_err(|err: Error| err.kind.message())?);
            },
            "--prefix" => {
                let prefix = args.next().ok_or("missing value for `--prefix`")?;
                parsed.options = parsed.options.ivars_name(prefix);
            },
            "--no-muladd" => cse_options = cse_options.opt_muladd(false),
            "--negation" => cse_options = cse_options.optimization(NEGATION),
            "--cse-only" => parsed.cse_only = true,
            "--single-output" => parsed.options = parsed.options.single_var_output(true),
            _ if arg.starts_with("--") => return Err(format!("unknown option `{}`", arg)),
            _ => parsed.file = Some(arg),
        }
    }

    parsed.options = parsed.options.cse(cse_options);
    Ok(parsed)
}

/// Optimizes the parsed code, or only eliminates common subexpressions of its outputs with
/// `--cse-only`. `--prefix` and `--single-output` apply in both cases.
fn run(code: &Code, args: &Args) -> Result<Code, Error> {
    if args.cse_only {
        if !code.assignments.is_empty() {
            info!("inlining {} assignments before elimination", code.assignments.len());
        }
        finalize(&cse(&code.reconstruct(), &args.options.cse)?, &args.options)
    } else {
        fully_optimize(code, &args.options)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        },
    };

    let input = match &args.file {
        Some(file) => fs::read_to_string(file),
        None => io::read_to_string(io::stdin()),
    };
    let input = match input {
        Ok(input) => input,
        Err(err) => {
            eprintln!("could not read input: {}", err);
            return ExitCode::FAILURE;
        },
    };

    match input.parse::<Code>().and_then(|code| run(&code, &args)) {
        Ok(code) => {
            print!("{}", code);
            ExitCode::SUCCESS
        },
        Err(err) => {
            err.report_to_stderr(&input);
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use symcode_compute::SymExpr;
    use super::*;

    fn parse(input: &str) -> SymExpr {
        input.parse().unwrap()
    }

    fn args(args: &[&str]) -> Args {
        parse_args(args.iter().map(|arg| arg.to_string())).unwrap()
    }

    #[test]
    fn cse_only_applies_naming_options() {
        let code = "u = a*b\nsin(u) * cos(u)\na\n".parse::<Code>().unwrap();
        let optimized = run(&code, &args(&["--cse-only", "--prefix", "t", "--single-output"])).unwrap();
        let names = optimized.assignments.iter().map(|a| a.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["t0", "t1"]);
        assert_eq!(optimized.outputs, vec![parse("t1"), parse("a")]);
        assert_eq!(optimized.reconstruct(), code.reconstruct());
    }

    #[test]
    fn unknown_option() {
        assert!(parse_args(["--fast".to_string()].into_iter()).is_err());
    }
}
