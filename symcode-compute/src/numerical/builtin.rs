//! The functions that numeric evaluation understands.

use rug::{ops::Pow, Float};
use symcode_error::Error;
use super::error::{UndefinedFunction, WrongArgumentCount};
use crate::primitive::{float, PRECISION};

/// The name and number of arguments of every builtin function.
pub const BUILTINS: &[(&str, usize)] = &[
    ("abs", 1),
    ("acos", 1),
    ("asin", 1),
    ("atan", 1),
    ("atan2", 2),
    ("cos", 1),
    ("cosh", 1),
    ("exp", 1),
    ("ln", 1),
    ("log", 1),
    ("pow", 2),
    ("sin", 1),
    ("sinh", 1),
    ("sqrt", 1),
    ("tan", 1),
    ("tanh", 1),
];

/// Returns the number of arguments the builtin function takes, or [`None`] if there is no such
/// function.
pub fn arity(name: &str) -> Option<usize> {
    BUILTINS.iter().find(|(n, _)| *n == name).map(|(_, arity)| *arity)
}

/// Calls the builtin function with the given arguments.
///
/// `similar` is used to build the suggestions of the error if the function does not exist.
pub fn call(name: &str, args: &[Float], similar: impl FnOnce(&str) -> Vec<String>) -> Result<Float, Error> {
    let value = match (name, args) {
        ("abs", [x]) => x.clone().abs(),
        ("acos", [x]) => x.clone().acos(),
        ("asin", [x]) => x.clone().asin(),
        ("atan", [x]) => x.clone().atan(),
        ("atan2", [y, x]) => y.clone().atan2(x),
        ("cos", [x]) => x.clone().cos(),
        ("cosh", [x]) => x.clone().cosh(),
        ("exp", [x]) => x.clone().exp(),
        ("ln" | "log", [x]) => x.clone().ln(),
        ("pow", [x, y]) => Float::with_val(PRECISION, x.pow(y)),
        ("sin", [x]) => x.clone().sin(),
        ("sinh", [x]) => x.clone().sinh(),
        ("sqrt", [x]) => x.clone().sqrt(),
        ("tan", [x]) => x.clone().tan(),
        ("tanh", [x]) => x.clone().tanh(),
        _ => {
            return Err(match arity(name) {
                Some(expected) => Error::without_spans(WrongArgumentCount {
                    name: name.to_owned(),
                    expected,
                    given: args.len(),
                }),
                None => Error::without_spans(UndefinedFunction {
                    name: name.to_owned(),
                    suggestions: similar(name),
                }),
            });
        },
    };

    // keep every result at the working precision, whatever precision the inputs had
    Ok(float(value))
}
