//! Tokenizer and parser for the textual syntax of symbolic expressions, such as
//! `x*y + sin(theta)^2 - 1.5e-3/z`.
//!
//! Use [`parser::Parser`] to parse a source string into an [`parser::expr::Expr`].

pub mod parser;
pub mod tokenizer;
