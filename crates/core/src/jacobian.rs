//! Sparse derivatives of scalar outputs with respect to optimization variables.
//!
//! A motion sample typically depends on the coefficients of one polynomial
//! segment and one dimension only, so a [`JacobianRow`] stores only the
//! touched columns. Constraint sets collect rows into a [`JacobianBlock`],
//! one block per variable set, which converts into `nalgebra_sparse`
//! matrices for the solver.

use std::ops::{Add, Mul, Neg, Sub};

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CsrMatrix};

/// A sparse row vector over a fixed number of columns.
///
/// Entries are kept sorted by column with at most one entry per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JacobianRow {
    cols: usize,
    entries: Vec<(usize, f64)>,
}

impl JacobianRow {
    /// Creates an empty row spanning `cols` columns.
    #[must_use]
    pub fn zeros(cols: usize) -> Self {
        Self {
            cols,
            entries: Vec::new(),
        }
    }

    /// Number of columns the row spans.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Adds `value` to the entry at `col`, creating it if absent.
    ///
    /// # Panics
    ///
    /// Panics if `col` is outside the row.
    pub fn accumulate(&mut self, col: usize, value: f64) {
        match self.position(col) {
            Ok(i) => self.entries[i].1 += value,
            Err(i) => self.entries.insert(i, (col, value)),
        }
    }

    /// Overwrites the entry at `col`.
    ///
    /// # Panics
    ///
    /// Panics if `col` is outside the row.
    pub fn insert(&mut self, col: usize, value: f64) {
        match self.position(col) {
            Ok(i) => self.entries[i].1 = value,
            Err(i) => self.entries.insert(i, (col, value)),
        }
    }

    /// Returns the entry at `col`, zero if not stored.
    #[must_use]
    pub fn get(&self, col: usize) -> f64 {
        self.entries
            .binary_search_by_key(&col, |&(c, _)| c)
            .map_or(0.0, |i| self.entries[i].1)
    }

    /// Iterates stored `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Multiplies every entry by `factor` in place.
    pub fn scale(&mut self, factor: f64) {
        for (_, value) in &mut self.entries {
            *value *= factor;
        }
    }

    /// Adds `factor * other` to this row.
    ///
    /// # Panics
    ///
    /// Panics if the rows span different column counts.
    pub fn add_scaled(&mut self, other: &JacobianRow, factor: f64) {
        assert_eq!(
            self.cols, other.cols,
            "cannot combine Jacobian rows of different widths"
        );
        for (col, value) in other.iter() {
            self.accumulate(col, factor * value);
        }
    }

    /// Inner product with a dense vector.
    ///
    /// # Panics
    ///
    /// Panics if `x` is shorter than the row.
    #[must_use]
    pub fn dot(&self, x: &DVector<f64>) -> f64 {
        assert!(x.len() >= self.cols, "vector shorter than Jacobian row");
        self.iter().map(|(col, value)| value * x[col]).sum()
    }

    /// Expands the row into a dense vector.
    #[must_use]
    pub fn to_dense(&self) -> DVector<f64> {
        let mut dense = DVector::zeros(self.cols);
        for (col, value) in self.iter() {
            dense[col] = value;
        }
        dense
    }

    fn position(&self, col: usize) -> Result<usize, usize> {
        assert!(
            col < self.cols,
            "column {col} outside Jacobian row of width {}",
            self.cols
        );
        self.entries.binary_search_by_key(&col, |&(c, _)| c)
    }
}

impl Mul<f64> for JacobianRow {
    type Output = Self;

    fn mul(mut self, factor: f64) -> Self {
        self.scale(factor);
        self
    }
}

impl Mul<JacobianRow> for f64 {
    type Output = JacobianRow;

    fn mul(self, row: JacobianRow) -> JacobianRow {
        row * self
    }
}

impl Neg for JacobianRow {
    type Output = Self;

    fn neg(self) -> Self {
        self * -1.0
    }
}

impl Add<&JacobianRow> for JacobianRow {
    type Output = Self;

    fn add(mut self, rhs: &JacobianRow) -> Self {
        self.add_scaled(rhs, 1.0);
        self
    }
}

impl Sub<&JacobianRow> for JacobianRow {
    type Output = Self;

    fn sub(mut self, rhs: &JacobianRow) -> Self {
        self.add_scaled(rhs, -1.0);
        self
    }
}

/// A first-order expansion `x(u) ≈ J(u*)·(u − u*) + x(u*)` of a motion.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearApprox {
    /// The Jacobian `J(u*)` at the expansion point.
    pub jacobian: JacobianRow,

    /// The value `x(u*)` at the expansion point.
    pub offset: f64,
}

impl LinearApprox {
    /// Evaluates the expansion at `u`, given the expansion point `u_star`.
    #[must_use]
    pub fn evaluate(&self, u: &DVector<f64>, u_star: &DVector<f64>) -> f64 {
        self.jacobian.dot(&(u - u_star)) + self.offset
    }
}

/// Sparse Jacobian of one constraint set with respect to one variable set.
///
/// Entries written to the same position accumulate.
#[derive(Debug, Clone)]
pub struct JacobianBlock {
    coo: CooMatrix<f64>,
}

impl JacobianBlock {
    /// Creates an empty `nrows × ncols` block.
    #[must_use]
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            coo: CooMatrix::new(nrows, ncols),
        }
    }

    #[must_use]
    pub fn nrows(&self) -> usize {
        self.coo.nrows()
    }

    #[must_use]
    pub fn ncols(&self) -> usize {
        self.coo.ncols()
    }

    /// Number of written entries, counting repeated positions separately.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.coo.nnz()
    }

    /// Adds `value` at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the block.
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.coo.push(row, col, value);
    }

    /// Adds every entry of `jac` into block row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `jac` is not as wide as the block or `row` is outside it.
    pub fn add_row(&mut self, row: usize, jac: &JacobianRow) {
        assert_eq!(
            jac.cols(),
            self.ncols(),
            "Jacobian row width does not match block"
        );
        for (col, value) in jac.iter() {
            self.coo.push(row, col, value);
        }
    }

    /// Iterates written `(row, col, value)` triplets.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.coo.triplet_iter().map(|(i, j, v)| (i, j, *v))
    }

    /// Compresses the block, summing repeated positions.
    #[must_use]
    pub fn to_csr(&self) -> CsrMatrix<f64> {
        CsrMatrix::from(&self.coo)
    }

    /// Expands the block into a dense matrix.
    #[must_use]
    pub fn to_dense(&self) -> DMatrix<f64> {
        DMatrix::from(&self.coo)
    }
}
