//! Factoring of sums and products that share some of their operands.
//!
//! Structural hashing only finds subexpressions that are exactly equal. Here, a new sum or
//! product is compared against the factorable sums / products already collected, and shared
//! operands are pulled out into their own intermediate variable:
//!
//! - A new two-operand node is substituted into every collected node that contains both of its
//!   operands.
//! - A new node with more operands first absorbs any collected two-operand node whose operands it
//!   contains, then the first collected multi-operand node it overlaps in two or more operands.
//!   The overlap gets its own variable, and both nodes are rewritten to use it.
//!
//! Operands are compared as multisets. Candidates are scanned in canonical order, so the result
//! only depends on the input. The search is greedy: the first overlap found is used, not the
//! best one.

use super::Collector;
use log::*;
use std::cmp::Ordering;
use symcode_compute::{NodeKind, SymExpr};

/// Returns the multiset intersection of two sorted operand lists.
fn intersection(lhs: &[SymExpr], rhs: &[SymExpr]) -> Vec<SymExpr> {
    let (mut i, mut j) = (0, 0);
    let mut shared = Vec::new();
    while i < lhs.len() && j < rhs.len() {
        match lhs[i].cmp(&rhs[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                shared.push(lhs[i].clone());
                i += 1;
                j += 1;
            },
        }
    }
    shared
}

/// Removes one occurrence of each operand of `shared` from the sorted list `operands`. `shared`
/// must be sorted.
fn difference(operands: &[SymExpr], shared: &[SymExpr]) -> Vec<SymExpr> {
    let mut shared = shared.iter().peekable();
    let mut rest = Vec::with_capacity(operands.len());
    for operand in operands {
        if shared.peek().is_some_and(|&next| next == operand) {
            shared.next();
        } else {
            rest.push(operand.clone());
        }
    }
    rest
}

/// Builds a sum or a product of the operands.
fn rebuild(kind: NodeKind, operands: impl IntoIterator<Item = SymExpr>) -> SymExpr {
    match kind {
        NodeKind::Add => SymExpr::sum(operands),
        _ => SymExpr::product(operands),
    }
}

/// Replaces the `shared` operands of the node with the variable that computes them.
fn substitute(kind: NodeKind, operands: &[SymExpr], shared: &[SymExpr], var: SymExpr) -> SymExpr {
    rebuild(kind, difference(operands, shared).into_iter().chain(std::iter::once(var)))
}

/// Returns the operands of a definition, which are never empty for a factorable node.
fn operands_of(def: &SymExpr) -> &[SymExpr] {
    def.operands().unwrap_or_default()
}

impl Collector {
    /// Collects a sum or product whose operands are already collected, factoring it against the
    /// sums / products of the same kind collected so far.
    pub(super) fn factor(&mut self, mut expr: SymExpr) -> SymExpr {
        let kind = expr.kind();

        // every iteration removes at least one operand from `expr`
        loop {
            if let Some(&index) = self.by_expr.get(&expr) {
                return self.symbol(index);
            }

            let operands = match expr.operands() {
                Some(operands) if expr.kind() == kind => operands.to_vec(),
                _ => return self.collect_op(expr),
            };

            if operands.len() == 2 {
                let index = self.mint(expr);
                self.share_binary(kind, index, &operands);
                return self.symbol(index);
            }

            if let Some((def, index)) = self.find_binary(kind, &operands) {
                trace!("{} = {} is part of {}", self.ivars[index], def, expr);
                expr = substitute(kind, &operands, operands_of(&def), self.symbol(index));
                continue;
            }

            if let Some((def, index, shared)) = self.find_multi(kind, &operands) {
                let shared_expr = rebuild(kind, shared.iter().cloned());
                let shared_var = if shared_expr == def {
                    self.symbol(index)
                } else {
                    let shared_index = self.share_multi(kind, shared_expr.clone(), &shared);

                    // the binary sharing may already have rewritten the other node
                    if self.defs[index] == def {
                        let rewritten = substitute(kind, operands_of(&def), &shared, self.symbol(shared_index));
                        self.redefine(index, rewritten);
                    }
                    self.symbol(shared_index)
                };

                if shared_expr == expr {
                    return shared_var;
                }
                expr = substitute(kind, &operands, &shared, shared_var);
                continue;
            }

            let index = self.mint(expr);
            return self.symbol(index);
        }
    }

    /// Returns the first two-operand node of the given kind whose operands all appear in
    /// `operands`.
    fn find_binary(&self, kind: NodeKind, operands: &[SymExpr]) -> Option<(SymExpr, usize)> {
        self.factoring
            .partition(kind)?
            .binary
            .iter()
            .find(|(def, _)| intersection(operands, operands_of(def)).len() == 2)
            .map(|(def, &index)| (def.clone(), index))
    }

    /// Returns the first multi-operand node of the given kind that shares at least two operands
    /// with `operands`, along with the shared operands.
    fn find_multi(&self, kind: NodeKind, operands: &[SymExpr]) -> Option<(SymExpr, usize, Vec<SymExpr>)> {
        self.factoring
            .partition(kind)?
            .multi
            .iter()
            .find_map(|(def, &index)| {
                let shared = intersection(operands, operands_of(def));
                (shared.len() >= 2).then(|| (def.clone(), index, shared))
            })
    }

    /// Returns the intermediate variable for the shared part of two nodes, creating it if needed.
    fn share_multi(&mut self, kind: NodeKind, shared_expr: SymExpr, shared: &[SymExpr]) -> usize {
        if let Some(&index) = self.by_expr.get(&shared_expr) {
            return index;
        }

        let index = self.mint(shared_expr);
        trace!("{} = {} factored out", self.ivars[index], self.defs[index]);
        if shared.len() == 2 {
            self.share_binary(kind, index, shared);
        }
        index
    }

    /// Substitutes the new two-operand node at `index` into every multi-operand node of the same
    /// kind that contains both of its operands.
    fn share_binary(&mut self, kind: NodeKind, index: usize, pair: &[SymExpr]) {
        let targets = match self.factoring.partition(kind) {
            Some(partition) => partition
                .multi
                .iter()
                .filter(|(def, _)| intersection(pair, operands_of(def)).len() == 2)
                .map(|(def, &target)| (def.clone(), target))
                .collect::<Vec<_>>(),
            None => return,
        };

        for (def, target) in targets {
            let rewritten = substitute(kind, operands_of(&def), pair, self.symbol(index));
            self.redefine(target, rewritten);
        }
    }
}
