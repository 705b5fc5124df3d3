use ariadne::Fmt;
use symcode_attrs::ErrorKind;
use symcode_error::{ErrorKind, EXPR};

/// A numeric literal could not be converted into a number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid number `{}`", literal),
    labels = ["this literal"],
)]
pub struct InvalidLiteral {
    /// The literal as written.
    pub literal: String,
}

/// The rows of a matrix have different lengths.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "the rows of the matrix have different lengths",
    help = format!("row {} has {} entries, but the first row has {}", row.to_string().fg(EXPR), found, expected),
)]
pub struct RaggedMatrix {
    /// The index of the offending row.
    pub row: usize,

    /// The length of the first row.
    pub expected: usize,

    /// The length of the offending row.
    pub found: usize,
}
