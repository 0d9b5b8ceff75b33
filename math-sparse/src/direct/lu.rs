//! Sparse LU factorization
//!
//! Computes `P·A = L·U` by right-looking Gaussian elimination on a
//! row-oriented working copy of `A`:
//!
//! ```text
//! For each column k = 0, 1, ..., n-1:
//!     1. Collect the unreduced rows with a nonzero in column k
//!     2. Keep those with |a_ik| >= threshold * max_i |a_ik|
//!     3. Pick the one with the fewest nonzeros (Markowitz count)
//!     4. Subtract multiples of the pivot row from the other candidates,
//!        recording multipliers in L and fill positions in the column lists
//! ```
//!
//! Candidates for a column are found through per-column row lists that grow
//! as fill-in appears, so no step scans the whole matrix.

use crate::error::{Result, SparseError};
use crate::sparse::{SparseMatrix, SparseVector};
use crate::traits::ComplexField;
use ndarray::Array1;
use num_traits::{Float, FromPrimitive, Zero};
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// LU factorization configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LuConfig {
    /// Column k is singular when its largest candidate magnitude is at most
    /// `pivot_tolerance * max_i |a_ik|`, taken over column k of the input
    pub pivot_tolerance: f64,
    /// Candidates must satisfy `|a_ik| >= pivot_threshold * max|a_·k|`.
    /// 1.0 is classic partial pivoting; smaller values give the Markowitz
    /// criterion more freedom to limit fill-in.
    pub pivot_threshold: f64,
}

impl Default for LuConfig {
    fn default() -> Self {
        Self {
            pivot_tolerance: 1e-10,
            pivot_threshold: 0.1,
        }
    }
}

impl LuConfig {
    /// Replace the singularity tolerance
    pub fn with_pivot_tolerance(mut self, pivot_tolerance: f64) -> Self {
        self.pivot_tolerance = pivot_tolerance;
        self
    }

    /// Replace the stability threshold
    pub fn with_pivot_threshold(mut self, pivot_threshold: f64) -> Self {
        self.pivot_threshold = pivot_threshold;
        self
    }

    /// Check that both tolerances are usable
    pub fn validate(&self) -> Result<()> {
        if !self.pivot_tolerance.is_finite() || self.pivot_tolerance < 0.0 {
            return Err(SparseError::invalid(format!(
                "pivot tolerance must be finite and non-negative, got {}",
                self.pivot_tolerance
            )));
        }
        if !(self.pivot_threshold > 0.0 && self.pivot_threshold <= 1.0) {
            return Err(SparseError::invalid(format!(
                "pivot threshold must lie in (0, 1], got {}",
                self.pivot_threshold
            )));
        }
        Ok(())
    }
}

/// Sizes of the factors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LuStats {
    /// Stored entries of the input matrix
    pub nnz_a: usize,
    /// Stored entries of L, unit diagonal included
    pub nnz_l: usize,
    /// Stored entries of U
    pub nnz_u: usize,
    /// Entries of L (below the diagonal) and U that were zero in A
    pub fill_in: usize,
    /// Steps whose pivot row was not the row at the same position
    pub pivot_swaps: usize,
}

/// Sparse LU factorization result
///
/// Stores L and U factors along with the row permutation. Only a successful
/// factorization is ever constructed, and it is immutable.
#[derive(Debug, Clone)]
pub struct LuFactorization<T: ComplexField> {
    /// Unit lower triangular factor
    l: SparseMatrix<T>,
    /// Upper triangular factor
    u: SparseMatrix<T>,
    /// Diagonal of U (the pivots)
    u_diag: Vec<T>,
    /// `perm[k]` is the original row placed at position k
    perm: Vec<usize>,
    /// Sign of `perm`, +1 or -1
    sign: i32,
    stats: LuStats,
}

impl<T: ComplexField> LuFactorization<T> {
    /// Factorize a square matrix
    pub fn new(matrix: &SparseMatrix<T>, config: &LuConfig) -> Result<Self> {
        config.validate()?;

        let n = matrix.num_rows();
        if !matrix.is_square() {
            return Err(SparseError::DimensionMismatch {
                expected: n,
                got: matrix.num_cols(),
            });
        }

        let to_real = |x: f64| {
            T::Real::from_f64(x)
                .ok_or_else(|| SparseError::invalid(format!("{x} is not representable")))
        };
        let pivot_tolerance = to_real(config.pivot_tolerance)?;
        let col_tol: Vec<T::Real> = matrix
            .columns()
            .iter()
            .map(|col| col.max_abs() * pivot_tolerance)
            .collect();
        let threshold = to_real(config.pivot_threshold)?;

        let mut work = Elimination::new(matrix);
        let mut l_entries: Vec<Vec<(usize, T)>> = Vec::with_capacity(n);
        let mut u_cols: Vec<SparseVector<T>> = (0..n).map(|_| SparseVector::new(n)).collect();
        let mut u_diag = Vec::with_capacity(n);
        let mut perm = Vec::with_capacity(n);

        for k in 0..n {
            let candidates = work.candidates(k);

            let max_mag = candidates
                .iter()
                .fold(T::Real::zero(), |acc, (_, v)| acc.max(v.norm()));
            let tol = col_tol[k];
            if max_mag.partial_cmp(&tol) != Some(Ordering::Greater) {
                log::debug!("LU: no pivot above {tol:?} in column {k} of {n}");
                return Err(SparseError::SingularMatrix { column: k });
            }

            let cutoff = threshold * max_mag;
            let (p, pivot) = candidates
                .iter()
                .copied()
                .filter(|(_, v)| v.norm() >= cutoff)
                .min_by(|a, b| {
                    work.rows[a.0]
                        .nnz()
                        .cmp(&work.rows[b.0].nnz())
                        .then_with(|| {
                            b.1.norm()
                                .partial_cmp(&a.1.norm())
                                .unwrap_or(Ordering::Equal)
                        })
                        .then_with(|| a.0.cmp(&b.0))
                })
                .ok_or(SparseError::SingularMatrix { column: k })?;

            log::trace!(
                "LU step {k}: pivot row {p}, {} candidates, row nnz {}",
                candidates.len(),
                work.rows[p].nnz()
            );

            let pivot_row = work.retire(p);
            let pivot_inv = pivot.inv();

            let mut multipliers = Vec::with_capacity(candidates.len().saturating_sub(1));
            for &(r, a_rk) in &candidates {
                if r == p {
                    continue;
                }
                let mult = a_rk * pivot_inv;
                work.eliminate(r, k, mult, &pivot_row);
                multipliers.push((r, mult));
            }
            l_entries.push(multipliers);

            for (j, v) in pivot_row.iter() {
                u_cols[j].push(k, v);
            }
            u_diag.push(pivot);
            perm.push(p);
        }

        // Rows of L are indexed by original row until every position is known.
        let mut position = vec![0; n];
        for (k, &p) in perm.iter().enumerate() {
            position[p] = k;
        }
        let l_cols = l_entries
            .into_iter()
            .enumerate()
            .map(|(k, mut entries)| {
                for entry in &mut entries {
                    entry.0 = position[entry.0];
                }
                entries.sort_unstable_by_key(|&(i, _)| i);
                let mut col = SparseVector::with_capacity(n, entries.len() + 1);
                col.push(k, T::one());
                for (i, v) in entries {
                    col.push(i, v);
                }
                col
            })
            .collect();

        let l = SparseMatrix::from_columns(n, l_cols);
        let u = SparseMatrix::from_columns(n, u_cols);

        let nnz_a = matrix.nnz();
        let nnz_l = l.nnz();
        let nnz_u = u.nnz();
        let stats = LuStats {
            nnz_a,
            nnz_l,
            nnz_u,
            fill_in: count_fill(matrix, &l, &u, &perm),
            pivot_swaps: perm.iter().enumerate().filter(|&(k, &p)| k != p).count(),
        };

        log::debug!(
            "LU factorization: n = {n}, nnz(A) = {nnz_a}, nnz(L) = {nnz_l}, nnz(U) = {nnz_u}, fill-in = {}",
            stats.fill_in
        );

        Ok(Self {
            l,
            u,
            u_diag,
            sign: permutation_sign(&perm),
            perm,
            stats,
        })
    }

    /// Matrix dimension
    pub fn dim(&self) -> usize {
        self.perm.len()
    }

    /// Unit lower triangular factor L
    pub fn l(&self) -> &SparseMatrix<T> {
        &self.l
    }

    /// Upper triangular factor U
    pub fn u(&self) -> &SparseMatrix<T> {
        &self.u
    }

    /// Row permutation: row k of `P·A` is row `permutation()[k]` of A
    pub fn permutation(&self) -> &[usize] {
        &self.perm
    }

    /// Sign of the row permutation (+1 or -1)
    pub fn permutation_sign(&self) -> i32 {
        self.sign
    }

    /// Factor sizes and fill-in
    pub fn stats(&self) -> &LuStats {
        &self.stats
    }

    /// Solve Ax = b using the pre-computed factorization
    pub fn solve(&self, b: &Array1<T>) -> Result<Array1<T>> {
        let n = self.dim();
        if b.len() != n {
            return Err(SparseError::DimensionMismatch {
                expected: n,
                got: b.len(),
            });
        }

        // y = P b
        let mut x = Array1::from_iter(self.perm.iter().map(|&p| b[p]));

        // Forward substitution: L y = P b, column by column
        for (k, col) in self.l.columns().iter().enumerate() {
            let x_k = x[k];
            if x_k.is_zero() {
                continue;
            }
            for (i, l_ik) in col.iter() {
                if i > k {
                    x[i] -= l_ik * x_k;
                }
            }
        }

        // Backward substitution: U x = y
        for (k, col) in self.u.columns().iter().enumerate().rev() {
            x[k] /= self.u_diag[k];
            let x_k = x[k];
            if x_k.is_zero() {
                continue;
            }
            for (i, u_ik) in col.iter() {
                if i < k {
                    x[i] -= u_ik * x_k;
                }
            }
        }

        Ok(x)
    }

    /// Solve Ax = b for a sparse right-hand side.
    ///
    /// `b` is scattered into a dense work vector, so each call costs O(n)
    /// on top of the triangular solves regardless of `nnz(b)`.
    pub fn solve_sparse(&self, b: &SparseVector<T>) -> Result<SparseVector<T>> {
        if b.len() != self.dim() {
            return Err(SparseError::DimensionMismatch {
                expected: self.dim(),
                got: b.len(),
            });
        }
        let x = self.solve(&b.to_dense())?;
        Ok(SparseVector::from_dense(&x, T::Real::zero()))
    }

    /// Solve AX = B column by column
    pub fn solve_columns(&self, b: &SparseMatrix<T>) -> Result<SparseMatrix<T>> {
        if b.num_rows() != self.dim() {
            return Err(SparseError::DimensionMismatch {
                expected: self.dim(),
                got: b.num_rows(),
            });
        }
        let columns = b
            .columns()
            .iter()
            .map(|col| self.solve_sparse(col))
            .collect::<Result<Vec<_>>>()?;
        Ok(SparseMatrix::from_columns(self.dim(), columns))
    }

    /// Determinant: product of the pivots times the permutation sign
    pub fn determinant(&self) -> Result<T> {
        let det = self.u_diag.iter().fold(T::one(), |acc, &d| acc * d);
        let det = if self.sign < 0 { -det } else { det };
        if !det.is_finite() {
            return Err(SparseError::Overflow);
        }
        Ok(det)
    }
}

/// Factorize `matrix` with the given singularity tolerance and the default
/// stability threshold
pub fn factorize<T: ComplexField>(
    matrix: &SparseMatrix<T>,
    pivot_tolerance: f64,
) -> Result<LuFactorization<T>> {
    let config = LuConfig::default().with_pivot_tolerance(pivot_tolerance);
    LuFactorization::new(matrix, &config)
}

/// Solve Ax = b using sparse LU decomposition
///
/// This is a convenience function that combines factorization and solve.
pub fn lu_solve<T: ComplexField>(matrix: &SparseMatrix<T>, b: &Array1<T>) -> Result<Array1<T>> {
    LuFactorization::new(matrix, &LuConfig::default())?.solve(b)
}

/// Entries of L (below the diagonal) and U whose position in A holds no entry.
///
/// Position `(i, j)` of a factor maps back to `(perm[i], j)` in A.
fn count_fill<T: ComplexField>(
    a: &SparseMatrix<T>,
    l: &SparseMatrix<T>,
    u: &SparseMatrix<T>,
    perm: &[usize],
) -> usize {
    let stored_in_a =
        |i: usize, j: usize| a.columns()[j].indices().binary_search(&perm[i]).is_ok();
    let below_diagonal = l.columns().iter().enumerate().map(|(j, col)| {
        col.indices()
            .iter()
            .filter(|&&i| i > j && !stored_in_a(i, j))
            .count()
    });
    let upper = u.columns().iter().enumerate().map(|(j, col)| {
        col.indices()
            .iter()
            .filter(|&&i| !stored_in_a(i, j))
            .count()
    });
    below_diagonal.chain(upper).sum()
}

/// +1 for an even permutation, -1 for an odd one
fn permutation_sign(perm: &[usize]) -> i32 {
    let mut visited = vec![false; perm.len()];
    let mut sign = 1;
    for start in 0..perm.len() {
        if visited[start] {
            continue;
        }
        let mut len = 0;
        let mut i = start;
        while !visited[i] {
            visited[i] = true;
            i = perm[i];
            len += 1;
        }
        if len % 2 == 0 {
            sign = -sign;
        }
    }
    sign
}

/// Active submatrix during elimination
struct Elimination<T: ComplexField> {
    /// Working rows, indexed by original row
    rows: Vec<SparseVector<T>>,
    /// Original rows that hold (or once held) an entry in each column
    col_rows: Vec<Vec<usize>>,
    reduced: Vec<bool>,
    /// Recycled merge buffer
    scratch: SparseVector<T>,
}

impl<T: ComplexField> Elimination<T> {
    fn new(matrix: &SparseMatrix<T>) -> Self {
        let n = matrix.num_rows();
        let rows = matrix.transpose().into_columns();

        let mut col_rows = vec![Vec::new(); n];
        for (r, row) in rows.iter().enumerate() {
            for &j in row.indices() {
                col_rows[j].push(r);
            }
        }

        Self {
            rows,
            col_rows,
            reduced: vec![false; n],
            scratch: SparseVector::new(n),
        }
    }

    /// Unreduced rows with a nonzero in column `k`, sorted by row
    fn candidates(&mut self, k: usize) -> Vec<(usize, T)> {
        let mut out: Vec<(usize, T)> = std::mem::take(&mut self.col_rows[k])
            .into_iter()
            .filter(|&r| !self.reduced[r])
            .filter_map(|r| {
                let v = self.rows[r].get(k).ok()?;
                (!v.is_zero()).then_some((r, v))
            })
            .collect();
        // Entries cancelled and refilled are listed twice.
        out.sort_unstable_by_key(|&(r, _)| r);
        out.dedup_by_key(|e| e.0);
        out
    }

    /// Remove row `p` from the active submatrix and hand it back
    fn retire(&mut self, p: usize) -> SparseVector<T> {
        self.reduced[p] = true;
        std::mem::replace(&mut self.rows[p], SparseVector::new(0))
    }

    /// `row_r -= mult * pivot_row`, dropping the eliminated column `k`
    fn eliminate(&mut self, r: usize, k: usize, mult: T, pivot_row: &SparseVector<T>) {
        let col_rows = &mut self.col_rows;
        self.rows[r].axpy_with(-mult, pivot_row, &mut self.scratch, |j| {
            col_rows[j].push(r)
        });
        self.rows[r].take(k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};
    use num_complex::Complex64;

    fn sparse(dense: &Array2<f64>) -> SparseMatrix<f64> {
        SparseMatrix::from_dense(dense, 0.0)
    }

    fn arrow() -> SparseMatrix<f64> {
        sparse(&array![
            [4.0, 1.0, 1.0, 1.0],
            [1.0, 4.0, 0.0, 0.0],
            [1.0, 0.0, 4.0, 0.0],
            [1.0, 0.0, 0.0, 4.0],
        ])
    }

    #[test]
    fn test_lu_solve_tridiagonal() {
        let dense = array![[2.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 4.0]];
        let a = sparse(&dense);
        let b = array![1.0, 2.0, 3.0];

        let lu = factorize(&a, 1e-10).expect("Factorization should succeed");
        let x = lu.solve(&b).expect("Solve should succeed");

        let ax = dense.dot(&x);
        for i in 0..3 {
            assert_relative_eq!(ax[i], b[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_factors_reproduce_permuted_matrix() {
        let a = arrow();
        let lu = LuFactorization::new(&a, &LuConfig::default()).unwrap();

        assert!(lu.l().is_unit_lower_triangular());
        assert!(lu.u().is_upper_triangular());

        let mut pa = a.clone();
        // permute_rows moves row i to perm[i]; P·A needs the inverse mapping
        let mut inverse = vec![0; 4];
        for (k, &p) in lu.permutation().iter().enumerate() {
            inverse[p] = k;
        }
        pa.permute_rows(&inverse).unwrap();

        let product = lu.l().matmul(lu.u()).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                assert_relative_eq!(
                    product.get(i, j).unwrap(),
                    pa.get(i, j).unwrap(),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_markowitz_limits_fill() {
        let a = arrow();

        let lu = LuFactorization::new(&a, &LuConfig::default()).unwrap();
        assert_eq!(lu.permutation(), &[1, 2, 0, 3]);
        assert_eq!(lu.stats().fill_in, 3);
        assert_eq!(lu.stats().nnz_a, 10);

        // Pure partial pivoting picks the dense row first and fills everything
        let strict = LuFactorization::new(&a, &LuConfig::default().with_pivot_threshold(1.0))
            .unwrap();
        assert_eq!(strict.permutation()[0], 0);
        assert_eq!(strict.stats().fill_in, 6);

        assert_relative_eq!(lu.determinant().unwrap(), 208.0, epsilon = 1e-9);
        assert_relative_eq!(strict.determinant().unwrap(), 208.0, epsilon = 1e-9);
    }

    #[test]
    fn test_identity_determinant() {
        for n in [0, 1, 5] {
            let id: SparseMatrix<f64> = SparseMatrix::identity(n);
            let lu = factorize(&id, 1e-10).unwrap();
            assert_relative_eq!(lu.determinant().unwrap(), 1.0);
            assert_eq!(lu.stats().fill_in, 0);
        }
    }

    #[test]
    fn test_determinant_sign() {
        // Row swap of the identity
        let a = sparse(&array![[0.0, 1.0], [1.0, 0.0]]);
        let lu = factorize(&a, 1e-10).unwrap();
        assert_eq!(lu.permutation_sign(), -1);
        assert_relative_eq!(lu.determinant().unwrap(), -1.0);
    }

    #[test]
    fn test_singular_zero_row() {
        let a = sparse(&array![[1.0, 2.0], [0.0, 0.0]]);
        let err = factorize(&a, 1e-10).unwrap_err();
        assert_eq!(err, SparseError::SingularMatrix { column: 1 });
    }

    #[test]
    fn test_singular_dependent_rows() {
        let a = sparse(&array![[1.0, 2.0], [2.0, 4.0]]);
        let err = factorize(&a, 1e-10).unwrap_err();
        assert!(err.is_singular());

        let zero: SparseMatrix<f64> = SparseMatrix::new(3, 3);
        assert_eq!(
            factorize(&zero, 1e-10).unwrap_err(),
            SparseError::SingularMatrix { column: 0 }
        );
    }

    #[test]
    fn test_pivot_tolerance() {
        // Elimination leaves 2^-40 in column 1, whose input scale is 1
        let eps = 2.0_f64.powi(-40);
        let a = sparse(&array![[1.0, 1.0], [1.0, 1.0 + eps]]);
        assert!(factorize(&a, 1e-10).unwrap_err().is_singular());

        let lu = factorize(&a, 1e-14).unwrap();
        assert_relative_eq!(lu.determinant().unwrap(), eps, max_relative = 1e-12);
    }

    #[test]
    fn test_tolerance_is_relative_to_each_column() {
        let a = SparseMatrix::from_triplets(2, 2, vec![(0, 0, 1e12_f64), (1, 1, 1.0)]).unwrap();
        let lu = factorize(&a, 1e-10).expect("well scaled per column");
        let x = lu.solve(&array![1e12, 2.0]).unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(lu.determinant().unwrap(), 1e12, max_relative = 1e-12);

        let tiny_column = sparse(&array![[1e8, 0.0], [0.0, 1e-8]]);
        assert!(factorize(&tiny_column, 1e-10).is_ok());
    }

    #[test]
    fn test_fill_ignores_cancelled_entries() {
        // Eliminating row 1 with row 0 cancels a_11 and fills position (1, 3)
        let a = sparse(&array![
            [2.0, 1.0, 0.0, 1.0],
            [2.0, 1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let lu = factorize(&a, 1e-10).unwrap();
        assert_eq!(lu.permutation(), &[0, 2, 1, 3]);
        assert_eq!(lu.stats().nnz_a, 8);
        assert_eq!(lu.stats().nnz_l + lu.stats().nnz_u - 4, 8);
        assert_eq!(lu.stats().fill_in, 1);
        assert_relative_eq!(lu.determinant().unwrap(), -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_non_square_rejected() {
        let a: SparseMatrix<f64> = SparseMatrix::new(2, 3);
        assert_eq!(
            factorize(&a, 1e-10).unwrap_err(),
            SparseError::DimensionMismatch {
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn test_invalid_config() {
        let a: SparseMatrix<f64> = SparseMatrix::identity(2);
        let bad_threshold = LuConfig::default().with_pivot_threshold(0.0);
        assert!(matches!(
            LuFactorization::new(&a, &bad_threshold),
            Err(SparseError::InvalidInput(_))
        ));
        assert!(factorize(&a, -1.0).is_err());
        assert!(factorize(&a, f64::NAN).is_err());
    }

    #[test]
    fn test_solve_dimension_mismatch() {
        let lu = factorize(&arrow(), 1e-10).unwrap();
        assert!(lu.solve(&array![1.0, 2.0]).is_err());
        assert!(lu.solve_sparse(&SparseVector::new(3)).is_err());
    }

    #[test]
    fn test_solve_sparse_and_columns() {
        let a = arrow();
        let lu = factorize(&a, 1e-10).unwrap();

        let e0 = SparseVector::from_entries(4, [(0, 1.0)]).unwrap();
        let x = lu.solve_sparse(&e0).unwrap();
        let ax = a.matvec_sparse(&x).unwrap();
        assert_relative_eq!(ax.get(0).unwrap(), 1.0, epsilon = 1e-12);
        for i in 1..4 {
            assert_relative_eq!(ax.get(i).unwrap(), 0.0, epsilon = 1e-12);
        }

        let inverse = lu.solve_columns(&SparseMatrix::identity(4)).unwrap();
        let product = a.matmul(&inverse).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(product.get(i, j).unwrap(), expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_determinant_overflow() {
        let big = SparseMatrix::from_triplets(
            2,
            2,
            vec![(0, 0, 1e200_f64), (1, 1, 1e200_f64)],
        )
        .unwrap();
        let lu = factorize(&big, 1e-10).unwrap();
        assert_eq!(lu.determinant().unwrap_err(), SparseError::Overflow);
    }

    #[test]
    fn test_lu_solve_complex() {
        let dense = array![
            [Complex64::new(4.0, 1.0), Complex64::new(1.0, 0.0)],
            [Complex64::new(1.0, 0.0), Complex64::new(3.0, -1.0)],
        ];
        let a = SparseMatrix::from_dense(&dense, 1e-15);
        let b = array![Complex64::new(1.0, 1.0), Complex64::new(2.0, -1.0)];

        let x = lu_solve(&a, &b).expect("LU solve should succeed");

        let ax = dense.dot(&x);
        for i in 0..2 {
            assert_relative_eq!((ax[i] - b[i]).norm(), 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_permutation_sign() {
        assert_eq!(permutation_sign(&[]), 1);
        assert_eq!(permutation_sign(&[0, 1, 2]), 1);
        assert_eq!(permutation_sign(&[1, 0, 2]), -1);
        assert_eq!(permutation_sign(&[1, 2, 0]), 1);
        assert_eq!(permutation_sign(&[3, 2, 1, 0]), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_from_json() {
        let config: LuConfig = serde_json::from_str(r#"{ "pivot_threshold": 0.5 }"#).unwrap();
        assert_eq!(config.pivot_threshold, 0.5);
        assert_eq!(config.pivot_tolerance, 1e-10);
        config.validate().unwrap();
    }
}
