//! Numeric evaluation of [`SymExpr`](crate::SymExpr)s with arbitrary-precision floats.
//!
//! Evaluation never recurses, so it is safe on very large generated expressions. Results may be
//! non-finite (for example `1/0`); callers that need a finite value must check for it.

pub mod builtin;
pub mod ctxt;
pub mod error;
pub mod eval;

pub use ctxt::Ctxt;
pub use eval::{eval, eval_f64, eval_node};
