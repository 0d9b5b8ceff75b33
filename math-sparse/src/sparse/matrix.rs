//! Column-oriented sparse matrix
//!
//! A [`SparseMatrix`] owns one [`SparseVector`] per column, each of length
//! `num_rows`. Rows are reachable through [`SparseMatrix::row`] and
//! [`SparseMatrix::set_row`], which scatter across the columns.

use super::vector::{SparseVector, check_permutation};
use crate::error::{Result, SparseError};
use crate::traits::{ComplexField, LinearOperator};
use ndarray::{Array1, Array2};
use num_traits::{Float, Zero};

/// Sparse matrix stored as a sequence of sparse columns
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<T: ComplexField> {
    num_rows: usize,
    num_cols: usize,
    columns: Vec<SparseVector<T>>,
}

impl<T: ComplexField> SparseMatrix<T> {
    /// Create a new matrix with no stored entries
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self {
            num_rows,
            num_cols,
            columns: (0..num_cols).map(|_| SparseVector::new(num_rows)).collect(),
        }
    }

    /// Create identity matrix
    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n, n);
        for (j, col) in m.columns.iter_mut().enumerate() {
            col.push(j, T::one());
        }
        m
    }

    /// Create a matrix from a dense array
    ///
    /// Only stores entries with magnitude > threshold
    pub fn from_dense(dense: &Array2<T>, threshold: T::Real) -> Self {
        let (num_rows, num_cols) = dense.dim();
        let columns = dense
            .columns()
            .into_iter()
            .map(|col| SparseVector::from_dense(&col.to_owned(), threshold))
            .collect();
        Self {
            num_rows,
            num_cols,
            columns,
        }
    }

    /// Create a matrix from COO (Coordinate) format triplets
    ///
    /// Triplets are (row, col, value). Duplicate entries are summed.
    pub fn from_triplets(
        num_rows: usize,
        num_cols: usize,
        mut triplets: Vec<(usize, usize, T)>,
    ) -> Result<Self> {
        for &(i, j, _) in &triplets {
            if i >= num_rows {
                return Err(SparseError::IndexOutOfRange {
                    index: i,
                    bound: num_rows,
                });
            }
            if j >= num_cols {
                return Err(SparseError::IndexOutOfRange {
                    index: j,
                    bound: num_cols,
                });
            }
        }

        // Sort by column, then by row
        triplets.sort_by_key(|&(i, j, _)| (j, i));

        let mut m = Self::new(num_rows, num_cols);
        let mut iter = triplets.into_iter().peekable();
        while let Some((i, j, mut val)) = iter.next() {
            while let Some(&(ni, nj, nv)) = iter.peek() {
                if ni != i || nj != j {
                    break;
                }
                val += nv;
                iter.next();
            }
            m.columns[j].push(i, val);
        }

        Ok(m)
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// `(num_rows, num_cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows, self.num_cols)
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.columns.iter().map(SparseVector::nnz).sum()
    }

    /// Check if the matrix is square
    pub fn is_square(&self) -> bool {
        self.num_rows == self.num_cols
    }

    /// All columns, in order
    pub fn columns(&self) -> &[SparseVector<T>] {
        &self.columns
    }

    fn check_row(&self, i: usize) -> Result<()> {
        if i >= self.num_rows {
            return Err(SparseError::IndexOutOfRange {
                index: i,
                bound: self.num_rows,
            });
        }
        Ok(())
    }

    fn check_col(&self, j: usize) -> Result<()> {
        if j >= self.num_cols {
            return Err(SparseError::IndexOutOfRange {
                index: j,
                bound: self.num_cols,
            });
        }
        Ok(())
    }

    /// Column `j`
    pub fn column(&self, j: usize) -> Result<&SparseVector<T>> {
        self.check_col(j)?;
        Ok(&self.columns[j])
    }

    /// Replace column `j`
    pub fn set_column(&mut self, j: usize, column: SparseVector<T>) -> Result<()> {
        self.check_col(j)?;
        if column.len() != self.num_rows {
            return Err(SparseError::DimensionMismatch {
                expected: self.num_rows,
                got: column.len(),
            });
        }
        self.columns[j] = column;
        Ok(())
    }

    /// Row `i`, gathered from every column
    pub fn row(&self, i: usize) -> Result<SparseVector<T>> {
        self.check_row(i)?;
        let mut row = SparseVector::new(self.num_cols);
        for (j, col) in self.columns.iter().enumerate() {
            row.push(j, col.get(i)?);
        }
        Ok(row)
    }

    /// Replace row `i`
    pub fn set_row(&mut self, i: usize, row: &SparseVector<T>) -> Result<()> {
        self.check_row(i)?;
        if row.len() != self.num_cols {
            return Err(SparseError::DimensionMismatch {
                expected: self.num_cols,
                got: row.len(),
            });
        }
        for (j, col) in self.columns.iter_mut().enumerate() {
            col.set(i, row.get(j)?)?;
        }
        Ok(())
    }

    /// Get element at (i, j), returns 0 if not stored
    pub fn get(&self, i: usize, j: usize) -> Result<T> {
        self.check_row(i)?;
        self.check_col(j)?;
        self.columns[j].get(i)
    }

    /// Set element at (i, j); zero removes the entry
    pub fn set(&mut self, i: usize, j: usize, value: T) -> Result<()> {
        self.check_row(i)?;
        self.check_col(j)?;
        self.columns[j].set(i, value)
    }

    /// Largest stored magnitude
    pub fn max_abs(&self) -> T::Real {
        self.columns
            .iter()
            .fold(T::Real::zero(), |acc, col| acc.max(col.max_abs()))
    }

    /// Matrix-vector product: y = A * x
    ///
    /// Accumulates `x[j] * A[:, j]` over the columns, skipping zero `x[j]`.
    pub fn matvec(&self, x: &Array1<T>) -> Result<Array1<T>> {
        if x.len() != self.num_cols {
            return Err(SparseError::DimensionMismatch {
                expected: self.num_cols,
                got: x.len(),
            });
        }

        let mut y = Array1::from_elem(self.num_rows, T::zero());
        for (col, &xj) in self.columns.iter().zip(x.iter()) {
            if xj.is_zero() {
                continue;
            }
            for (i, a_ij) in col.iter() {
                y[i] += a_ij * xj;
            }
        }
        Ok(y)
    }

    /// Sparse matrix-vector product; only columns hit by `x`'s nonzeros are visited
    pub fn matvec_sparse(&self, x: &SparseVector<T>) -> Result<SparseVector<T>> {
        if x.len() != self.num_cols {
            return Err(SparseError::DimensionMismatch {
                expected: self.num_cols,
                got: x.len(),
            });
        }
        let mut acc = Accumulator::new(self.num_rows);
        for (j, xj) in x.iter() {
            acc.add_scaled(&self.columns[j], xj);
        }
        Ok(acc.drain())
    }

    /// Transpose matrix-vector product: y = A^T * x
    pub fn matvec_transpose(&self, x: &Array1<T>) -> Result<Array1<T>> {
        if x.len() != self.num_rows {
            return Err(SparseError::DimensionMismatch {
                expected: self.num_rows,
                got: x.len(),
            });
        }
        let y = self
            .columns
            .iter()
            .map(|col| col.iter().fold(T::zero(), |acc, (i, v)| acc + v * x[i]))
            .collect::<Vec<_>>();
        Ok(Array1::from_vec(y))
    }

    /// Compute C = A * B
    ///
    /// Column `j` of C is accumulated from the columns of A selected by the
    /// structural nonzeros of `B[:, j]`, so C never holds more entries than
    /// that overlap allows.
    pub fn matmul(&self, other: &SparseMatrix<T>) -> Result<SparseMatrix<T>> {
        if self.num_cols != other.num_rows {
            return Err(SparseError::DimensionMismatch {
                expected: self.num_cols,
                got: other.num_rows,
            });
        }

        let mut acc = Accumulator::new(self.num_rows);
        let columns = other
            .columns
            .iter()
            .map(|b_col| {
                for (k, b_kj) in b_col.iter() {
                    acc.add_scaled(&self.columns[k], b_kj);
                }
                acc.drain()
            })
            .collect();

        Ok(SparseMatrix {
            num_rows: self.num_rows,
            num_cols: other.num_cols,
            columns,
        })
    }

    /// Transposed copy: rows become columns
    pub fn transpose(&self) -> SparseMatrix<T> {
        let mut t = SparseMatrix::new(self.num_cols, self.num_rows);
        // Visiting columns in order appends to each row of `t` in index order.
        for (j, col) in self.columns.iter().enumerate() {
            for (i, v) in col.iter() {
                t.columns[i].push(j, v);
            }
        }
        t
    }

    /// Reorder rows: row `i` moves to row `perm[i]`
    pub fn permute_rows(&mut self, perm: &[usize]) -> Result<()> {
        check_permutation(perm, self.num_rows)?;
        for col in &mut self.columns {
            col.permute(perm)?;
        }
        Ok(())
    }

    /// Scale all values by a scalar; entries that underflow to zero are removed
    pub fn scale(&mut self, scalar: T) {
        for col in &mut self.columns {
            col.scale(scalar);
        }
    }

    /// No stored entry lies below the diagonal
    pub fn is_upper_triangular(&self) -> bool {
        self.columns
            .iter()
            .enumerate()
            .all(|(j, col)| col.indices().last().is_none_or(|&i| i <= j))
    }

    /// Lower triangular with every diagonal entry exactly one
    pub fn is_unit_lower_triangular(&self) -> bool {
        self.is_square()
            && self.columns.iter().enumerate().all(|(j, col)| {
                col.indices().first() == Some(&j) && col.values().first() == Some(&T::one())
            })
    }

    /// Convert to dense matrix (for debugging/small matrices)
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::from_elem((self.num_rows, self.num_cols), T::zero());
        for (j, col) in self.columns.iter().enumerate() {
            for (i, v) in col.iter() {
                dense[[i, j]] = v;
            }
        }
        dense
    }

    pub(crate) fn from_columns(num_rows: usize, columns: Vec<SparseVector<T>>) -> Self {
        debug_assert!(columns.iter().all(|c| c.len() == num_rows));
        Self {
            num_rows,
            num_cols: columns.len(),
            columns,
        }
    }

    pub(crate) fn into_columns(self) -> Vec<SparseVector<T>> {
        self.columns
    }
}

impl<T: ComplexField> LinearOperator<T> for SparseMatrix<T> {
    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn num_cols(&self) -> usize {
        self.num_cols
    }

    fn apply(&self, x: &Array1<T>) -> Result<Array1<T>> {
        self.matvec(x)
    }

    fn apply_transpose(&self, x: &Array1<T>) -> Result<Array1<T>> {
        self.matvec_transpose(x)
    }
}

/// Dense scatter buffer with an occupancy list, for sparse accumulation.
///
/// Each `drain` emits the touched positions in sorted order and resets only
/// those positions.
struct Accumulator<T: ComplexField> {
    values: Vec<T>,
    occupied: Vec<bool>,
    pattern: Vec<usize>,
}

impl<T: ComplexField> Accumulator<T> {
    fn new(len: usize) -> Self {
        Self {
            values: vec![T::zero(); len],
            occupied: vec![false; len],
            pattern: Vec::new(),
        }
    }

    fn add_scaled(&mut self, column: &SparseVector<T>, alpha: T) {
        for (i, v) in column.iter() {
            if !self.occupied[i] {
                self.occupied[i] = true;
                self.pattern.push(i);
            }
            self.values[i] += alpha * v;
        }
    }

    fn drain(&mut self) -> SparseVector<T> {
        self.pattern.sort_unstable();
        let mut out = SparseVector::with_capacity(self.values.len(), self.pattern.len());
        for &i in &self.pattern {
            out.push(i, self.values[i]);
            self.values[i] = T::zero();
            self.occupied[i] = false;
        }
        self.pattern.clear();
        out
    }
}
