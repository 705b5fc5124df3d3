//! Collection of subexpressions into intermediate variables.
//!
//! A [`Collector`] walks expressions bottom-up and gives every distinct compound node an
//! intermediate variable (an "ivar"), so that structurally equal subexpressions end up as
//! references to the same variable. With [`CseOptions::opt_muladd`] enabled, sums and products
//! that share some of their operands are additionally factored, so that `a + b + c` and
//! `a + b + d` share `a + b`.
//!
//! Intermediate variables are identified by their index into the collector's arena of
//! definitions. Factoring a node rewrites the definition stored at its index, so every reference
//! to the node stays valid.
//!
//! Once collection is done, [`Collector::get`] extracts the [`Code`](crate::Code) that computes
//! the collected expressions.

mod factor;

use crate::{
    error::SymbolClash,
    options::{CollectMode, CseOptions},
    symbols::Symbols,
};
use log::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use symcode_compute::{symbolic::Matrix, NodeKind, SymExpr};
use symcode_error::Error;

/// The prefix of the collector's own intermediate variables. These names never reach the
/// extracted code.
const PRIVATE_PREFIX: &str = "_iv";

/// The sums or the products that can be factored, split by their number of operands. Entries are
/// kept in canonical order, which makes the factoring deterministic.
#[derive(Debug, Default)]
struct Partition {
    binary: BTreeMap<SymExpr, usize>,
    multi: BTreeMap<SymExpr, usize>,
}

impl Partition {
    fn insert(&mut self, def: SymExpr, index: usize) {
        match def.operands().map_or(0, <[_]>::len) {
            2 => {
                self.binary.insert(def, index);
            },
            len if len > 2 => {
                self.multi.insert(def, index);
            },
            _ => (),
        }
    }

    fn remove(&mut self, def: &SymExpr) {
        self.binary.remove(def);
        self.multi.remove(def);
    }
}

/// The factorable definitions, by operator.
#[derive(Debug, Default)]
struct FactoringIndex {
    adds: Partition,
    muls: Partition,
}

impl FactoringIndex {
    fn partition(&self, kind: NodeKind) -> Option<&Partition> {
        match kind {
            NodeKind::Add => Some(&self.adds),
            NodeKind::Mul => Some(&self.muls),
            _ => None,
        }
    }

    fn partition_mut(&mut self, kind: NodeKind) -> Option<&mut Partition> {
        match kind {
            NodeKind::Add => Some(&mut self.adds),
            NodeKind::Mul => Some(&mut self.muls),
            _ => None,
        }
    }

    fn insert(&mut self, def: &SymExpr, index: usize) {
        if let Some(partition) = self.partition_mut(def.kind()) {
            partition.insert(def.clone(), index);
        }
    }

    fn remove(&mut self, def: &SymExpr) {
        if let Some(partition) = self.partition_mut(def.kind()) {
            partition.remove(def);
        }
    }
}

/// Collects the subexpressions of expressions into intermediate variables.
///
/// A collector can be fed several batches of expressions with [`Collector::collect`]; sharing is
/// found across all of them. It is not meant to be shared between threads.
#[derive(Debug)]
pub struct Collector {
    options: CseOptions,

    /// Generator of the collector's own variable names.
    names: Symbols,

    /// The definition of each intermediate variable. A definition only references atoms and
    /// other intermediate variables.
    defs: Vec<SymExpr>,

    /// The name of each intermediate variable.
    ivars: Vec<String>,

    /// Maps the name of an intermediate variable back to its index.
    index_of: HashMap<String, usize>,

    /// Maps every definition to its index. Aliases (definitions that are a bare variable) are
    /// not included.
    by_expr: HashMap<SymExpr, usize>,

    factoring: FactoringIndex,

    /// Every symbol seen in the collected expressions.
    inputs: HashSet<String>,
}

impl Collector {
    /// Creates a collector with the given options.
    pub fn new(options: CseOptions) -> Result<Self, Error> {
        options.validate()?;
        Ok(Self {
            options,
            names: Symbols::new(PRIVATE_PREFIX),
            defs: Vec::new(),
            ivars: Vec::new(),
            index_of: HashMap::new(),
            by_expr: HashMap::new(),
            factoring: FactoringIndex::default(),
            inputs: HashSet::new(),
        })
    }

    /// The options of this collector.
    pub fn options(&self) -> &CseOptions {
        &self.options
    }

    /// The number of intermediate variables created so far.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Returns true if no intermediate variable has been created.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Returns the current definition of the intermediate variable with the given name.
    pub fn definition(&self, name: &str) -> Option<&SymExpr> {
        self.index_of.get(name).map(|&index| &self.defs[index])
    }

    /// Collects the expressions, returning them rewritten in terms of intermediate variables.
    ///
    /// Returns an error if one of the expressions uses a symbol that has the name of an
    /// intermediate variable this collector already created.
    pub fn collect(&mut self, exprs: &[SymExpr]) -> Result<Vec<SymExpr>, Error> {
        let symbols = exprs.iter().flat_map(SymExpr::free_symbols).collect::<HashSet<_>>();
        if let Some(name) = symbols.iter().filter(|name| self.index_of.contains_key(*name)).min() {
            return Err(Error::without_spans(SymbolClash { name: name.clone() }));
        }
        self.names.add_exclusions(symbols.iter().cloned());
        self.inputs.extend(symbols);

        let collected = exprs
            .iter()
            .map(|expr| match self.options.mode {
                CollectMode::UniqueOps => self.collect_unique_ops(expr),
                CollectMode::WholeExpr => self.collect_whole(expr),
            })
            .collect::<Vec<_>>();
        debug!("collected {} expressions into {} intermediates", exprs.len(), self.defs.len());
        Ok(collected)
    }

    /// Collects the entries of a matrix, keeping its shape.
    pub fn collect_matrix(&mut self, matrix: &Matrix) -> Result<Matrix, Error> {
        let entries = self.collect(matrix.entries())?;
        Ok(Matrix::from_entries(matrix.rows(), matrix.cols(), entries)
            .unwrap_or_else(|| unreachable!("collection keeps the number of entries")))
    }

    /// Every symbol seen in the collected expressions.
    pub(crate) fn inputs(&self) -> &HashSet<String> {
        &self.inputs
    }

    /// The definition of the intermediate variable with the given index.
    pub(crate) fn def(&self, index: usize) -> &SymExpr {
        &self.defs[index]
    }

    /// The name of the intermediate variable with the given index.
    pub(crate) fn ivar_name(&self, index: usize) -> String {
        self.ivars[index].clone()
    }

    /// Returns the intermediate variable with the given index, as an expression.
    pub(crate) fn symbol(&self, index: usize) -> SymExpr {
        SymExpr::symbol(self.ivars[index].clone())
    }

    /// Returns the index of the intermediate variable that the expression refers to, if it is
    /// one.
    pub(crate) fn ivar_index(&self, expr: &SymExpr) -> Option<usize> {
        expr.as_symbol().and_then(|name| self.index_of.get(name).copied())
    }

    /// Follows the aliases starting at the intermediate variable with the given index, returning
    /// the variable whose definition is not a bare variable.
    pub(crate) fn target(&self, mut index: usize) -> usize {
        while let Some(next) = self.ivar_index(&self.defs[index]) {
            index = next;
        }
        index
    }

    /// Returns the indices of the intermediate variables referenced by the expression, once per
    /// occurrence, left to right. Aliases are followed to their target.
    pub(crate) fn references<'a>(&'a self, expr: &'a SymExpr) -> impl Iterator<Item = usize> + 'a {
        expr.post_order_iter()
            .filter_map(|node| self.ivar_index(node))
            .map(|index| self.target(index))
    }

    /// Creates a new intermediate variable for the definition, which must not be mapped yet.
    fn mint(&mut self, def: SymExpr) -> usize {
        let index = self.defs.len();
        let name = self.names.next_name();
        if self.options.opt_muladd {
            self.factoring.insert(&def, index);
        }
        self.by_expr.insert(def.clone(), index);
        self.index_of.insert(name.clone(), index);
        self.ivars.push(name);
        self.defs.push(def);
        index
    }

    /// Replaces the definition of an existing intermediate variable. If the new definition is
    /// already mapped to another variable, this one becomes an alias of it.
    fn redefine(&mut self, index: usize, def: SymExpr) {
        let old = std::mem::replace(&mut self.defs[index], def.clone());
        self.by_expr.remove(&old);
        self.factoring.remove(&old);

        match self.by_expr.get(&def) {
            Some(&existing) => {
                trace!("{} = {} is an alias of {}", self.ivars[index], def, self.ivars[existing]);
                self.defs[index] = self.symbol(existing);
            },
            None => {
                trace!("{} = {} rewritten as {}", self.ivars[index], old, def);
                if self.options.opt_muladd {
                    self.factoring.insert(&def, index);
                }
                self.by_expr.insert(def, index);
            },
        }
    }

    /// Collects a node whose operands are already collected, returning the intermediate variable
    /// that computes it.
    fn collect_op(&mut self, expr: SymExpr) -> SymExpr {
        if let Some(&index) = self.by_expr.get(&expr) {
            return self.symbol(index);
        }

        match expr.kind() {
            NodeKind::Atom => expr,
            NodeKind::Add | NodeKind::Mul if self.options.opt_muladd => self.factor(expr),
            _ => {
                let index = self.mint(expr);
                self.symbol(index)
            },
        }
    }

    /// Collects every compound node of the expression, bottom-up.
    fn collect_unique_ops(&mut self, expr: &SymExpr) -> SymExpr {
        expr.fold_post_order(|node, children| {
            if node.is_atom() {
                node.clone()
            } else {
                self.collect_op(node.with_children(children))
            }
        })
    }

    /// Collects the expression as a whole.
    fn collect_whole(&mut self, expr: &SymExpr) -> SymExpr {
        if expr.is_atom() {
            return expr.clone();
        }

        let index = match self.by_expr.get(expr) {
            Some(&index) => index,
            None => self.mint(expr.clone()),
        };
        self.symbol(index)
    }
}
