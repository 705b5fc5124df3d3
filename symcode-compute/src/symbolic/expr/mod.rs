//! A representation of mathematical expressions that is easy to hash, compare, and rewrite.
//!
//! The [`Expr`](symcode_parser::parser::expr::Expr) type from `symcode_parser` is a recursive
//! `enum` that mirrors the source text. It's convenient for parsing, but not for algebraic
//! manipulation, where `a + (b + c)` and `c + b + a` should be the same thing.
//!
//! This module defines [`SymExpr`], which **flattens** nested sums and products into a single
//! list of terms / factors, and keeps every such list sorted in a canonical total order. As a
//! result, two expressions built from the same operator and the same operand multiset are equal
//! and hash equal, no matter how they were written.
//!
//! # Strict equality
//!
//! The [`PartialEq`] and [`Eq`] implementations for [`SymExpr`] implement **strict equality**,
//! not semantic equality. Two expressions are strictly equal if:
//!
//! - They are the same type of expression (i.e. both [`SymExpr::Primary`], both
//!   [`SymExpr::Add`], etc.).
//! - If both are [`SymExpr::Primary`], both expressions must have strictly equal values.
//! - If both are [`SymExpr::Add`] or [`SymExpr::Mul`], both expressions must have strictly equal
//!   terms / factors, with the same multiplicities.
//! - If both are [`SymExpr::Exp`], both expressions must have strictly equal base and exponent.
//!
//! `x^2 + 2*x + 1` and `(x + 1)^2` are not strictly equal. No arithmetic is ever performed by the
//! constructors in this module (`2 + 3` stays a sum of two integers), so rebuilding a node from
//! its own operands always gives back the same node.
//!
//! # Canonical order
//!
//! Numbers sort before symbols, symbols before function calls, and function calls before powers,
//! products, and sums. Values of the same kind compare by value, name, or operands.

mod convert;
mod iter;

use crate::primitive::int;
pub use iter::ExprIter;
use rug::{Float, Integer};
use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashMap},
    convert::Infallible,
    fmt,
    hash::{Hash, Hasher},
    ops::{Add, Mul, Neg, Sub},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primary {
    /// An integer, such as `2` or `144`.
    Integer(Integer),

    /// A floating-point number, such as `3.14` or `0.5`.
    Float(Float),

    /// A variable, such as `x` or `y`.
    Symbol(String),

    /// A function call, such as `sin(x)` or `f(x, y)`.
    Call(String, Vec<SymExpr>),
}

/// [`Eq`] is implemented manually to allow comparing [`Primary::Float`]s. This module **must
/// never** produce non-normal [`Float`]s (such as `NaN` or `Infinity`)!
impl Eq for Primary {}

/// [`Hash`] is implemented manually to allow hashing [`Primary::Float`]s. Both signed zeros hash
/// the same, since they compare equal.
impl Hash for Primary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Integer(int) => int.hash(state),
            Self::Float(float) => {
                let value = if float.is_zero() { 0.0 } else { float.to_f64() };
                value.to_bits().hash(state);
            },
            Self::Symbol(sym) => sym.hash(state),
            Self::Call(name, args) => {
                name.hash(state);
                args.hash(state);
            },
        }
    }
}

impl Primary {
    /// The rank of this kind of primary in the canonical order.
    fn rank(&self) -> u8 {
        match self {
            Self::Integer(_) => 0,
            Self::Float(_) => 1,
            Self::Symbol(_) => 2,
            Self::Call(..) => 3,
        }
    }
}

impl PartialOrd for Primary {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Primary {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(lhs), Self::Integer(rhs)) => lhs.cmp(rhs),
            // floats are never NaN, so the partial order is total
            (Self::Float(lhs), Self::Float(rhs)) => lhs.partial_cmp(rhs).unwrap_or(Ordering::Equal),
            (Self::Symbol(lhs), Self::Symbol(rhs)) => lhs.cmp(rhs),
            (Self::Call(lhs_name, lhs_args), Self::Call(rhs_name, rhs_args)) => {
                lhs_name.cmp(rhs_name).then_with(|| lhs_args.cmp(rhs_args))
            },
            (lhs, rhs) => lhs.rank().cmp(&rhs.rank()),
        }
    }
}

/// Classification of an expression node, as far as sharing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A number or a symbol; a leaf of the tree.
    Atom,

    /// A commutative sum.
    Add,

    /// A commutative product.
    Mul,

    /// Any other compound node: a power or a function call.
    Other,
}

/// A mathematical expression with information about its terms and factors.
///
/// This type should be distinguished from the [`symcode_parser::parser::expr::Expr`] type, which
/// is produced by [`symcode_parser`]. The main difference is that this type **flattens** out the
/// tree structure. For example, the expression `x + (y + z)` would be represented internally as a
/// single [`SymExpr::Add`] node with _three_ children, `x`, `y`, and `z`.
///
/// Build compound expressions with [`SymExpr::sum`], [`SymExpr::product`], [`SymExpr::power`],
/// and [`SymExpr::call`] (or the arithmetic operators), which keep them in canonical form.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymExpr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<SymExpr>),

    /// Multiple factors multiplied together.
    Mul(Vec<SymExpr>),

    /// An expression raised to a power.
    Exp(Box<SymExpr>, Box<SymExpr>),
}

impl SymExpr {
    /// The rank of this kind of expression in the canonical order.
    fn rank(&self) -> u8 {
        match self {
            Self::Primary(primary) => primary.rank(),
            Self::Exp(..) => 4,
            Self::Mul(_) => 5,
            Self::Add(_) => 6,
        }
    }

    /// Creates a symbol with the given name.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Primary(Primary::Symbol(name.into()))
    }

    /// Creates an integer.
    pub fn integer<T>(n: T) -> Self
    where
        Integer: From<T>,
    {
        Self::Primary(Primary::Integer(int(n)))
    }

    /// Creates a floating-point number. The value must be finite.
    pub fn float(f: Float) -> Self {
        Self::Primary(Primary::Float(f))
    }

    /// Creates a function call.
    pub fn call(name: impl Into<String>, args: Vec<SymExpr>) -> Self {
        Self::Primary(Primary::Call(name.into(), args))
    }

    /// Creates the sum of the given terms in canonical form: nested sums are flattened, terms are
    /// sorted, and a sum of zero / one terms becomes `0` / the term itself.
    pub fn sum(terms: impl IntoIterator<Item = SymExpr>) -> Self {
        let mut flat = Vec::new();
        for term in terms {
            match term {
                Self::Add(inner) => flat.extend(inner),
                term => flat.push(term),
            }
        }
        flat.sort();
        Self::Add(flat).downgrade()
    }

    /// Creates the product of the given factors in canonical form: nested products are flattened,
    /// factors are sorted, and a product of zero / one factors becomes `1` / the factor itself.
    pub fn product(factors: impl IntoIterator<Item = SymExpr>) -> Self {
        let mut flat = Vec::new();
        for factor in factors {
            match factor {
                Self::Mul(inner) => flat.extend(inner),
                factor => flat.push(factor),
            }
        }
        flat.sort();
        Self::Mul(flat).downgrade()
    }

    /// Creates `base^exp`. No simplification is done.
    pub fn power(base: SymExpr, exp: SymExpr) -> Self {
        Self::Exp(Box::new(base), Box::new(exp))
    }

    /// Returns `self^-1`. No simplification is done.
    pub fn recip(self) -> Self {
        Self::power(self, Self::integer(-1))
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`SymExpr::Add`] with zero / one term, or an
    /// [`SymExpr::Mul`] with zero / one factor. This function checks for these cases and
    /// simplifies the expression into the single term / factor, or an [`SymExpr::Primary`]
    /// containing the integer 0 or 1.
    pub(crate) fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::integer(0)
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::integer(1)
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns the kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Primary(Primary::Call(..)) | Self::Exp(..) => NodeKind::Other,
            Self::Primary(_) => NodeKind::Atom,
            Self::Add(_) => NodeKind::Add,
            Self::Mul(_) => NodeKind::Mul,
        }
    }

    /// Returns true if the expression is a leaf: a number or a symbol.
    pub fn is_atom(&self) -> bool {
        self.kind() == NodeKind::Atom
    }

    /// Returns true if the expression is a [`Primary::Integer`] or [`Primary::Float`].
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Primary(Primary::Integer(_) | Primary::Float(_)))
    }

    /// Returns true if the expression is a negative number.
    pub fn is_negative_number(&self) -> bool {
        match self {
            Self::Primary(Primary::Integer(int)) => *int < 0,
            Self::Primary(Primary::Float(float)) => *float < 0,
            _ => false,
        }
    }

    /// If the expression is a [`Primary::Integer`], returns a reference to the contained integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(int),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// Returns the terms of a sum or the factors of a product, or [`None`] for any other node.
    pub fn operands(&self) -> Option<&[SymExpr]> {
        match self {
            Self::Add(terms) => Some(terms),
            Self::Mul(factors) => Some(factors),
            _ => None,
        }
    }

    /// Returns the direct children of this node, in order. Atoms have no children.
    pub fn children(&self) -> Vec<&SymExpr> {
        match self {
            Self::Primary(Primary::Call(_, args)) => args.iter().collect(),
            Self::Primary(_) => Vec::new(),
            Self::Add(terms) => terms.iter().collect(),
            Self::Mul(factors) => factors.iter().collect(),
            Self::Exp(base, exp) => vec![base, exp],
        }
    }

    /// Rebuilds this node with the given children in place of its own, in canonical form.
    ///
    /// The number of children must match [`SymExpr::children`]. Atoms are returned unchanged.
    pub fn with_children(&self, children: Vec<SymExpr>) -> Self {
        match self {
            Self::Primary(Primary::Call(name, _)) => Self::call(name.clone(), children),
            Self::Primary(_) => self.clone(),
            Self::Add(_) => Self::sum(children),
            Self::Mul(_) => Self::product(children),
            Self::Exp(..) => {
                let mut children = children.into_iter();
                match (children.next(), children.next()) {
                    (Some(base), Some(exp)) => Self::power(base, exp),
                    _ => self.clone(),
                }
            },
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Folds the tree bottom-up without recursion. `f` is called once per node, in post-order,
    /// with the node and the results already computed for its children.
    ///
    /// The first error returned by `f` stops the traversal.
    pub fn try_fold_post_order<T, E, F>(&self, mut f: F) -> Result<T, E>
    where
        F: FnMut(&SymExpr, Vec<T>) -> Result<T, E>,
    {
        enum Frame<'a> {
            Enter(&'a SymExpr),
            Exit(&'a SymExpr, usize),
        }

        let mut stack = vec![Frame::Enter(self)];
        let mut results: Vec<T> = Vec::new();

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(expr) => {
                    let children = expr.children();
                    stack.push(Frame::Exit(expr, children.len()));
                    stack.extend(children.into_iter().rev().map(Frame::Enter));
                },
                Frame::Exit(expr, count) => {
                    let args = results.split_off(results.len() - count);
                    results.push(f(expr, args)?);
                },
            }
        }

        // the root is the last node to exit, leaving exactly one result behind
        Ok(results.pop().unwrap_or_else(|| unreachable!("the root always produces a result")))
    }

    /// Infallible version of [`SymExpr::try_fold_post_order`].
    pub fn fold_post_order<T, F>(&self, mut f: F) -> T
    where
        F: FnMut(&SymExpr, Vec<T>) -> T,
    {
        match self.try_fold_post_order(|expr, args| Ok::<_, Infallible>(f(expr, args))) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Rebuilds the tree bottom-up, applying `f` to every node after its children have been
    /// rebuilt. Compound nodes are passed to `f` already in canonical form.
    pub fn map_post_order<F>(&self, mut f: F) -> SymExpr
    where
        F: FnMut(SymExpr) -> SymExpr,
    {
        self.fold_post_order(|expr, children| {
            if children.is_empty() && expr.is_atom() {
                f(expr.clone())
            } else {
                f(expr.with_children(children))
            }
        })
    }

    /// Substitutes every symbol that appears as a key of `map` with the corresponding
    /// expression, simultaneously. Substituted expressions are not searched again.
    pub fn replace_symbols(&self, map: &HashMap<String, SymExpr>) -> SymExpr {
        if map.is_empty() {
            return self.clone();
        }

        self.map_post_order(|expr| match expr.as_symbol().and_then(|sym| map.get(sym)) {
            Some(replacement) => replacement.clone(),
            None => expr,
        })
    }

    /// Returns the set of symbol names that appear in the expression. Function names are not
    /// symbols.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        self.post_order_iter()
            .filter_map(|expr| expr.as_symbol().map(str::to_owned))
            .collect()
    }

    /// Returns true if no symbol appears anywhere in the expression.
    pub fn is_constant(&self) -> bool {
        self.post_order_iter().all(|expr| expr.as_symbol().is_none())
    }

    /// Counts the occurrences of the symbol `name` in the expression.
    pub fn count_symbol(&self, name: &str) -> usize {
        self.post_order_iter()
            .filter(|expr| expr.as_symbol() == Some(name))
            .count()
    }

    /// Counts the arithmetic operations needed to evaluate the expression as written: a sum or
    /// product of `n` operands costs `n - 1`, a power or function call costs 1.
    pub fn op_count(&self) -> usize {
        self.post_order_iter()
            .map(|expr| match expr {
                Self::Add(operands) | Self::Mul(operands) => operands.len().saturating_sub(1),
                Self::Exp(..) | Self::Primary(Primary::Call(..)) => 1,
                Self::Primary(_) => 0,
            })
            .sum()
    }

    /// Returns true if `self` must be parenthesized when printed as an operand of an expression
    /// of kind `parent`.
    fn needs_parens_in(&self, parent: &SymExpr, is_base: bool) -> bool {
        match parent {
            Self::Mul(_) => matches!(self, Self::Add(_)),
            Self::Exp(..) if is_base => {
                matches!(self, Self::Add(_) | Self::Mul(_) | Self::Exp(..)) || self.is_negative_number()
            },
            Self::Exp(..) => matches!(self, Self::Add(_) | Self::Mul(_)),
            _ => false,
        }
    }

    /// Writes `operand` as a child of `self`, parenthesized if needed.
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, operand: &SymExpr, is_base: bool) -> fmt::Result {
        if operand.needs_parens_in(self, is_base) {
            write!(f, "({})", operand)
        } else {
            write!(f, "{}", operand)
        }
    }
}

impl PartialOrd for SymExpr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SymExpr {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs.cmp(rhs),
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => lhs.cmp(rhs),
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base.cmp(rhs_base).then_with(|| lhs_exp.cmp(rhs_exp))
            },
            (lhs, rhs) => lhs.rank().cmp(&rhs.rank()),
        }
    }
}

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(num) => write!(f, "{}", num),
            // `Debug` of `f64` always keeps a decimal point or exponent, so the printed number
            // reads back as a float
            Self::Float(num) => write!(f, "{:?}", num.to_f64()),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                let mut iter = args.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

/// Prints the expression in a form that [`symcode_parser`] reads back as an equal expression
/// (floats are printed with `f64` precision).
impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(operands) | Self::Mul(operands) => {
                let sep = if matches!(self, Self::Add(_)) { " + " } else { " * " };
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", sep)?;
                    }
                    self.fmt_operand(f, operand, false)?;
                }
                Ok(())
            },
            Self::Exp(base, exp) => {
                self.fmt_operand(f, base, true)?;
                write!(f, "^")?;
                self.fmt_operand(f, exp, false)
            },
        }
    }
}

/// Adds two [`SymExpr`]s together. No simplification is done, except flattening into a canonical
/// sum.
impl Add for SymExpr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::sum([self, rhs])
    }
}

/// Subtracts `rhs` from `self`, as `self + (-1 * rhs)`.
impl Sub for SymExpr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::sum([self, -rhs])
    }
}

/// Multiplies two [`SymExpr`]s together. No simplification is done, except flattening into a
/// canonical product.
impl Mul for SymExpr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::product([self, rhs])
    }
}

/// Multiplies this expression by -1. No simplification is done, except for the case where the
/// expression is a number, in which case the number is negated.
impl Neg for SymExpr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Primary(Primary::Integer(int)) => Self::Primary(Primary::Integer(-int)),
            Self::Primary(Primary::Float(float)) => Self::Primary(Primary::Float(-float)),
            expr => Self::product([Self::integer(-1), expr]),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::collections::hash_map::DefaultHasher;
    use super::*;

    fn sym(name: &str) -> SymExpr {
        SymExpr::symbol(name)
    }

    fn parse(input: &str) -> SymExpr {
        input.parse().unwrap()
    }

    fn hash_of(expr: &SymExpr) -> u64 {
        let mut hasher = DefaultHasher::new();
        expr.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn strict_equality() {
        let a = parse("2*(x + (y - 5))");
        let b = parse("(y - 5 + x) * 2");
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn strict_equality_2() {
        // these are NOT strictly equal (but are semantically equal)
        let a = parse("2*(x + (y - 5))");
        let b = parse("2*x + 2*y - 10");
        assert_ne!(a, b);
    }

    #[test]
    fn multiset_operands() {
        let a = sym("a") + sym("a") + sym("b");
        assert_eq!(a, SymExpr::Add(vec![sym("a"), sym("a"), sym("b")]));
        assert_ne!(a, sym("a") + sym("b"));
    }

    #[test]
    fn sum_flattens_and_sorts() {
        let expr = SymExpr::sum([sym("c"), sym("a") + sym("b"), SymExpr::integer(3)]);
        assert_eq!(expr, SymExpr::Add(vec![SymExpr::integer(3), sym("a"), sym("b"), sym("c")]));
    }

    #[test]
    fn downgrade_empty_and_single() {
        assert_eq!(SymExpr::sum([]), SymExpr::integer(0));
        assert_eq!(SymExpr::product([]), SymExpr::integer(1));
        assert_eq!(SymExpr::product([sym("q")]), sym("q"));
    }

    #[test]
    fn rebuild_is_identity() {
        let expr = parse("a*b + sin(c, d)^2 - 3*e");
        for node in expr.post_order_iter() {
            let children = node.children().into_iter().cloned().collect();
            assert_eq!(&node.with_children(children), node);
        }
    }

    #[test]
    fn node_kinds() {
        assert_eq!(sym("x").kind(), NodeKind::Atom);
        assert_eq!(SymExpr::integer(4).kind(), NodeKind::Atom);
        assert_eq!(parse("x + y").kind(), NodeKind::Add);
        assert_eq!(parse("x * y").kind(), NodeKind::Mul);
        assert_eq!(parse("x ^ y").kind(), NodeKind::Other);
        assert_eq!(parse("cos(x)").kind(), NodeKind::Other);
    }

    #[test]
    fn replace_is_simultaneous() {
        let expr = parse("x + y*x");
        let map = HashMap::from([
            ("x".to_string(), sym("y")),
            ("y".to_string(), sym("x")),
        ]);
        assert_eq!(expr.replace_symbols(&map), parse("y + x*y"));
    }

    #[test]
    fn replace_reflattens() {
        let expr = parse("t + c");
        let map = HashMap::from([("t".to_string(), parse("a + b"))]);
        assert_eq!(expr.replace_symbols(&map), parse("a + b + c"));
    }

    #[test]
    fn symbol_queries() {
        let expr = parse("x*y + sin(x)^z + 2");
        assert_eq!(
            expr.free_symbols().into_iter().collect::<Vec<_>>(),
            vec!["x".to_string(), "y".to_string(), "z".to_string()],
        );
        assert_eq!(expr.count_symbol("x"), 2);
        assert!(!expr.is_constant());
        assert!(parse("sqrt(2) * 3").is_constant());
    }

    #[test]
    fn operation_count() {
        // 2 additions, 1 product, 1 power, 1 call
        assert_eq!(parse("a*b + c^2 + cos(d)").op_count(), 5);
        assert_eq!(sym("a").op_count(), 0);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let mut expr = sym("x0");
        for i in 1..20_000 {
            expr = SymExpr::call("f", vec![expr, sym(&format!("x{}", i % 7))]);
        }
        assert_eq!(expr.op_count(), 19_999);
        assert_eq!(expr.free_symbols().len(), 7);
        let folded = expr.fold_post_order(|_, children: Vec<usize>| 1 + children.iter().sum::<usize>());
        assert_eq!(folded, 39_999);
        // drop the tree iteratively; the default drop glue recurses
        let mut stack = vec![expr];
        while let Some(node) = stack.pop() {
            if let SymExpr::Primary(Primary::Call(_, args)) = node {
                stack.extend(args);
            }
        }
    }

    #[test]
    fn display_round_trip() {
        for input in [
            "a + b*c",
            "(a + b)*c",
            "(x^y)^z",
            "x^(y*z)",
            "(-2)^x",
            "x^-1",
            "-1 * (a + b)",
            "atan2(y, x) + 1.5",
            "2.0 * x",
        ] {
            let expr = parse(input);
            assert_eq!(parse(&expr.to_string()), expr, "{}", input);
        }
    }

    #[test]
    fn display_float_keeps_point() {
        assert_eq!(parse("2.0").to_string(), "2.0");
        assert_eq!(parse("x * 3").to_string(), "3 * x");
    }

    #[test]
    fn negation() {
        assert_eq!(-SymExpr::integer(4), SymExpr::integer(-4));
        assert_eq!(-sym("x"), SymExpr::Mul(vec![SymExpr::integer(-1), sym("x")]));
    }
}
