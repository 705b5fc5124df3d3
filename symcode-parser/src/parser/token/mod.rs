//! Tokens that carry meaning on their own, such as operators.

pub mod op;
