//! Errors that can occur while collecting or optimizing code.

use ariadne::Fmt;
use symcode_attrs::ErrorKind;
use symcode_error::{ErrorKind, EXPR};

/// The collection mode string is not one of the known modes.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown collection mode `{}`", mode),
    help = format!("the known modes are {} and {}", "unique-ops".fg(EXPR), "whole-expr".fg(EXPR)),
)]
pub struct UnknownCollectMode {
    /// The mode that was given.
    pub mode: String,
}

/// The prefix for generated names cannot start an identifier.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` cannot be used to name intermediate variables", name),
    help = "names must start with a letter or `_`, followed by letters, digits, or `_`",
)]
pub struct InvalidIvarsName {
    /// The rejected prefix.
    pub name: String,
}

/// A symbol in the input has the same name as a generated variable.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the symbol `{}` clashes with a generated variable", name),
    help = format!("rename the symbol, or pick another prefix than the one that generated {}", name.fg(EXPR)),
)]
pub struct SymbolClash {
    /// The name used by both.
    pub name: String,
}

/// A variable is used by an assignment at or before the position where it is assigned.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is used by assignment {} before it is defined", name, position),
)]
pub struct UseBeforeDefinition {
    /// The name of the variable.
    pub name: String,

    /// The index of the assignment that uses it.
    pub position: usize,
}

/// A variable is assigned more than once.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("`{}` is assigned more than once", name))]
pub struct DuplicateAssignment {
    /// The name of the variable.
    pub name: String,
}

/// The assignments depend on each other in a cycle, so they cannot be ordered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("the definition of `{}` depends on itself", name))]
pub struct CyclicDefinitions {
    /// A variable on the cycle.
    pub name: String,
}

/// The left-hand side of an assignment is not a variable name.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` cannot be assigned to", name),
    labels = ["this is not a variable name"],
    help = "names must start with a letter or `_`, followed by letters, digits, or `_`",
)]
pub struct InvalidAssignmentName {
    /// The text left of the `=`, trimmed.
    pub name: String,
}
