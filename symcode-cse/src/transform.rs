//! Rewrites applied to expressions around collection.
//!
//! An [`Optimization`] is a pair of transforms: `pre` is applied to every input expression before
//! it is collected, and `post` is applied to every emitted assignment and output afterwards, in
//! reverse order of the pairs. The idea is to collect a representation that exposes more sharing,
//! then turn it back into a normal one.

use symcode_compute::SymExpr;

/// A rewrite of an expression.
pub type Transform = fn(&SymExpr) -> SymExpr;

/// A pair of rewrites applied before and after collection. Either may be absent.
#[derive(Debug, Clone, Copy)]
pub struct Optimization {
    /// Applied to the inputs, in the order the pairs are given.
    pub pre: Option<Transform>,

    /// Applied to the outputs, in reverse order of the pairs.
    pub post: Option<Transform>,
}

/// Pulls `-1` out of sums that are mostly negative, so that `-a - b` is collected as `-(a + b)`
/// and shares `a + b` with other expressions. The negation is distributed again afterwards.
pub const NEGATION: Optimization = Optimization {
    pre: Some(factor_negation),
    post: Some(distribute_negation),
};

/// Applies the `pre` transforms of the optimizations, in order.
pub fn preprocess(expr: &SymExpr, optimizations: &[Optimization]) -> SymExpr {
    optimizations
        .iter()
        .filter_map(|opt| opt.pre)
        .fold(expr.clone(), |expr, pre| pre(&expr))
}

/// Applies the `post` transforms of the optimizations, in reverse order.
pub fn postprocess(expr: &SymExpr, optimizations: &[Optimization]) -> SymExpr {
    optimizations
        .iter()
        .rev()
        .filter_map(|opt| opt.post)
        .fold(expr.clone(), |expr, post| post(&expr))
}

/// Returns true if the expression is the integer `-1`.
fn is_minus_one(expr: &SymExpr) -> bool {
    expr.as_integer().is_some_and(|int| *int == -1)
}

/// Returns true if the numeric coefficient of the term is negative.
fn is_negative_term(term: &SymExpr) -> bool {
    match term {
        SymExpr::Mul(factors) => factors.iter().filter(|factor| factor.is_negative_number()).count() % 2 == 1,
        term => term.is_negative_number(),
    }
}

/// Negates a term. A factor of `-1` is removed if there is one, otherwise one is added (numbers
/// are negated directly).
fn negate_term(term: SymExpr) -> SymExpr {
    match term {
        SymExpr::Mul(mut factors) => match factors.iter().position(is_minus_one) {
            Some(minus) => {
                factors.remove(minus);
                SymExpr::product(factors)
            },
            None => -SymExpr::Mul(factors),
        },
        term => -term,
    }
}

/// Rewrites every sum with more negative terms than positive ones as `-1 * (negated sum)`.
pub fn factor_negation(expr: &SymExpr) -> SymExpr {
    expr.map_post_order(|node| match node {
        SymExpr::Add(terms) => {
            let negative = terms.iter().filter(|term| is_negative_term(term)).count();
            if 2 * negative > terms.len() {
                let negated = SymExpr::sum(terms.into_iter().map(negate_term));
                SymExpr::product([SymExpr::integer(-1), negated])
            } else {
                SymExpr::Add(terms)
            }
        },
        node => node,
    })
}

/// If the node is a product with a factor of `-1` and a sum, drops the `-1` and negates the terms
/// of the sum instead.
fn distribute_node(node: SymExpr) -> SymExpr {
    let SymExpr::Mul(mut factors) = node else {
        return node;
    };
    let (Some(minus), Some(sum)) = (
        factors.iter().position(is_minus_one),
        factors.iter().position(|factor| matches!(factor, SymExpr::Add(_))),
    ) else {
        return SymExpr::Mul(factors);
    };

    // numbers sort before sums, so removing the sum first keeps `minus` valid
    let negated = match factors.remove(sum) {
        SymExpr::Add(terms) => SymExpr::sum(terms.into_iter().map(|term| distribute_node(negate_term(term)))),
        other => -other,
    };
    factors.remove(minus);
    SymExpr::product(factors.into_iter().chain(std::iter::once(negated)))
}

/// Distributes every factor of `-1` that multiplies a sum into the terms of the sum.
pub fn distribute_negation(expr: &SymExpr) -> SymExpr {
    expr.map_post_order(distribute_node)
}
