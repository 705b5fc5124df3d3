//! Extraction of [`Code`] from a [`Collector`].
//!
//! Only intermediate variables that are referenced more than once become assignments of the
//! extracted code. The others are inlined into the expression that uses them.

use crate::{code::{Assignment, Code}, collect::Collector};
use log::*;
use symcode_compute::SymExpr;

/// A step of the depth-first walk over intermediate variables.
enum Frame {
    Enter(usize),
    Exit(usize),
}

impl Collector {
    /// Counts how many times each intermediate variable is referenced by the roots and by the
    /// definitions of the variables reachable from them.
    fn count_uses(&self, roots: &[SymExpr]) -> Vec<usize> {
        let mut uses = vec![0; self.len()];
        let mut pending = Vec::new();
        let mut visit = |index: usize, pending: &mut Vec<usize>| {
            uses[index] += 1;
            if uses[index] == 1 {
                pending.push(index);
            }
        };

        for root in roots {
            for index in self.references(root) {
                visit(index, &mut pending);
            }
        }
        while let Some(index) = pending.pop() {
            for child in self.references(self.def(index)) {
                visit(child, &mut pending);
            }
        }

        uses
    }

    /// Calls `exit` on every intermediate variable reachable from `root` that has not been
    /// visited yet, after all the variables its definition references.
    fn walk(&self, root: &SymExpr, visited: &mut [bool], mut exit: impl FnMut(usize)) {
        let mut stack = self.references(root)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .map(Frame::Enter)
            .collect::<Vec<_>>();

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(index) => {
                    if visited[index] {
                        continue;
                    }
                    visited[index] = true;
                    stack.push(Frame::Exit(index));
                    let children = self.references(self.def(index)).collect::<Vec<_>>();
                    stack.extend(children.into_iter().rev().map(Frame::Enter));
                },
                Frame::Exit(index) => exit(index),
            }
        }
    }

    /// Replaces the intermediate variables of the expression by their resolved form. A variable
    /// used only once is moved out of `resolved`.
    fn resolve(&self, expr: &SymExpr, uses: &[usize], resolved: &mut [Option<SymExpr>]) -> SymExpr {
        expr.map_post_order(|node| match self.ivar_index(&node).map(|index| self.target(index)) {
            Some(index) if uses[index] > 1 => resolved[index].clone().unwrap_or(node),
            Some(index) => resolved[index].take().unwrap_or(node),
            None => node,
        })
    }

    /// Extracts the code that computes the given collected expressions.
    ///
    /// Intermediate variables referenced more than once become assignments, named by the
    /// options of the collector, in an order where every assignment comes after the ones it
    /// uses. The others are inlined. The outputs of the code are the roots, rewritten in terms
    /// of the assigned variables.
    pub fn get(&self, roots: &[SymExpr]) -> Code {
        let uses = self.count_uses(roots);
        let mut names = self.options().emitted_names();
        names.add_exclusions(self.inputs().iter().cloned());

        let mut visited = vec![false; self.len()];
        let mut resolved = vec![None; self.len()];
        let mut assignments = Vec::new();
        let mut outputs = Vec::with_capacity(roots.len());

        for root in roots {
            self.walk(root, &mut visited, |index| {
                let value = self.resolve(self.def(index), &uses, &mut resolved);
                resolved[index] = Some(if uses[index] > 1 {
                    let name = names.next_name();
                    assignments.push(Assignment::new(name.clone(), value));
                    SymExpr::symbol(name)
                } else {
                    value
                });
            });
            outputs.push(self.resolve(root, &uses, &mut resolved));
        }

        debug!(
            "extracted {} assignments from {} reachable intermediates",
            assignments.len(),
            uses.iter().filter(|&&count| count > 0).count(),
        );
        Code::new(assignments, outputs)
    }

    /// Extracts the code that computes every intermediate variable of the collector.
    pub fn get_all(&self) -> Code {
        let roots = (0..self.len()).map(|index| self.symbol(index)).collect::<Vec<_>>();
        self.get(&roots)
    }

    /// Replaces every alias in the expression by the variable it stands for.
    fn unalias(&self, expr: &SymExpr) -> SymExpr {
        expr.map_post_order(|node| match self.ivar_index(&node) {
            Some(index) => self.symbol(self.target(index)),
            None => node,
        })
    }

    /// Returns every intermediate variable reachable from the roots, with its definition, in an
    /// order where every assignment comes after the ones it uses. Nothing is inlined, and the
    /// collector's own variable names are kept; the outputs are the roots, with aliases replaced
    /// by the variables they stand for.
    pub fn reachable(&self, roots: &[SymExpr]) -> Code {
        let mut visited = vec![false; self.len()];
        let mut assignments = Vec::new();
        for root in roots {
            self.walk(root, &mut visited, |index| {
                assignments.push(Assignment::new(self.ivar_name(index), self.unalias(self.def(index))));
            });
        }
        Code::new(assignments, roots.iter().map(|root| self.unalias(root)).collect())
    }
}
