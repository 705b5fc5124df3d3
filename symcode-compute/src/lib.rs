//! Symbolic expressions for code optimization.
//!
//! [`symbolic`] holds the expression tree ([`SymExpr`]) that the optimizer works on, along with
//! the traversal and substitution helpers it needs. [`numerical`] evaluates those trees with
//! arbitrary-precision floats, which is used for constant folding and for checking that two
//! expressions agree numerically.
//!
//! # Features
//!
//! - `serde`: Derives [`Serialize`] and [`Deserialize`] for the expression types.
//!
//! [`Serialize`]: https://docs.rs/serde/latest/serde/trait.Serialize.html
//! [`Deserialize`]: https://docs.rs/serde/latest/serde/trait.Deserialize.html

pub mod consts;
pub mod numerical;
pub mod primitive;
pub mod symbolic;

pub use symbolic::{NodeKind, Primary, SymExpr};
