use super::{error::RaggedMatrix, SymExpr};
use symcode_error::Error;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rectangular grid of expressions, stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix {
    rows: usize,
    cols: usize,
    entries: Vec<SymExpr>,
}

impl Matrix {
    /// Creates a matrix from its rows. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<SymExpr>>) -> Result<Self, Error> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((row, found)) = rows.iter().map(Vec::len).enumerate().find(|(_, len)| *len != cols) {
            return Err(Error::without_spans(RaggedMatrix { row, expected: cols, found }));
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            entries: rows.into_iter().flatten().collect(),
        })
    }

    /// Creates a matrix from entries in row-major order. Returns [`None`] if the number of entries
    /// is not `rows * cols`.
    pub fn from_entries(rows: usize, cols: usize, entries: Vec<SymExpr>) -> Option<Self> {
        (rows * cols == entries.len()).then_some(Self { rows, cols, entries })
    }

    /// The number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The entries in row-major order.
    pub fn entries(&self) -> &[SymExpr] {
        &self.entries
    }

    /// Consumes the matrix, returning its entries in row-major order.
    pub fn into_entries(self) -> Vec<SymExpr> {
        self.entries
    }

    /// Returns the entry at the given row and column.
    pub fn get(&self, row: usize, col: usize) -> Option<&SymExpr> {
        if row < self.rows && col < self.cols {
            self.entries.get(row * self.cols + col)
        } else {
            None
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for row in 0..self.rows {
            if row > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.entries[row * self.cols + col])?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}
