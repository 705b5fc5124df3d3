//! Symbolic expressions and the containers they are collected in.

pub mod error;
pub mod expr;
pub mod matrix;

pub use expr::{NodeKind, Primary, SymExpr};
pub use matrix::Matrix;
