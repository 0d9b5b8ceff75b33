//! Compressed sparse vector
//!
//! A [`SparseVector`] stores:
//! - `indices`: positions of the stored entries, strictly increasing
//! - `values`: the entry at each stored position, never exactly zero
//!
//! Everything not stored is an implicit zero. The logical length is fixed at
//! construction.

use crate::error::{Result, SparseError};
use crate::traits::ComplexField;
use ndarray::Array1;
use num_traits::{Float, Zero};

/// Compressed sparse vector of fixed length
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector<T: ComplexField> {
    len: usize,
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: ComplexField> SparseVector<T> {
    /// Create an empty (structurally zero) vector
    pub fn new(len: usize) -> Self {
        Self {
            len,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Create an empty vector with room for `nnz_estimate` entries
    pub fn with_capacity(len: usize, nnz_estimate: usize) -> Self {
        Self {
            len,
            indices: Vec::with_capacity(nnz_estimate),
            values: Vec::with_capacity(nnz_estimate),
        }
    }

    /// Build from explicit `(index, value)` pairs.
    ///
    /// Indices must be strictly increasing and smaller than `len`. Zero values
    /// are accepted but not stored.
    pub fn from_entries(len: usize, entries: impl IntoIterator<Item = (usize, T)>) -> Result<Self> {
        let entries = entries.into_iter();
        let mut v = Self::with_capacity(len, entries.size_hint().0);
        let mut prev: Option<usize> = None;

        for (index, value) in entries {
            if index >= len {
                return Err(SparseError::invalid(format!(
                    "index {index} out of range for vector of length {len}"
                )));
            }
            if let Some(p) = prev {
                if index == p {
                    return Err(SparseError::invalid(format!("duplicate index {index}")));
                }
                if index < p {
                    return Err(SparseError::invalid(format!(
                        "indices not sorted: {index} follows {p}"
                    )));
                }
            }
            prev = Some(index);
            if !value.is_zero() {
                v.indices.push(index);
                v.values.push(value);
            }
        }

        Ok(v)
    }

    /// Build from a dense array, keeping nonzero entries with magnitude > threshold
    pub fn from_dense(dense: &Array1<T>, threshold: T::Real) -> Self {
        let mut v = Self::new(dense.len());
        for (i, &val) in dense.iter().enumerate() {
            if !val.is_zero() && val.norm() > threshold {
                v.indices.push(i);
                v.values.push(val);
            }
        }
        v
    }

    /// Logical length
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// `true` if no entry is stored (the vector is structurally zero)
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored positions, strictly increasing
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Stored values, aligned with [`indices`](Self::indices)
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Iterate over `(index, value)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(SparseError::IndexOutOfRange {
                index,
                bound: self.len,
            });
        }
        Ok(())
    }

    /// Value at `index`, zero if not stored
    pub fn get(&self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => T::zero(),
        })
    }

    /// Set the value at `index`. Setting zero removes the entry.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        self.check_index(index)?;
        match self.indices.binary_search(&index) {
            Ok(pos) if value.is_zero() => {
                self.indices.remove(pos);
                self.values.remove(pos);
            }
            Ok(pos) => self.values[pos] = value,
            Err(_) if value.is_zero() => {}
            Err(pos) => {
                self.indices.insert(pos, index);
                self.values.insert(pos, value);
            }
        }
        Ok(())
    }

    /// Append an entry past the last stored index.
    ///
    /// Used by builders that produce entries in index order.
    pub(crate) fn push(&mut self, index: usize, value: T) {
        debug_assert!(index < self.len);
        debug_assert!(self.indices.last().is_none_or(|&last| last < index));
        if !value.is_zero() {
            self.indices.push(index);
            self.values.push(value);
        }
    }

    /// Remove the entry at `index` if stored, returning its value
    pub(crate) fn take(&mut self, index: usize) -> Option<T> {
        let pos = self.indices.binary_search(&index).ok()?;
        self.indices.remove(pos);
        Some(self.values.remove(pos))
    }

    /// Remove every stored entry, keeping the allocation
    pub fn clear(&mut self) {
        self.indices.clear();
        self.values.clear();
    }

    /// Sparse inner product `Σ aᵢ·bᵢ` by merge-walking both index lists
    pub fn dot(&self, other: &SparseVector<T>) -> Result<T> {
        if self.len != other.len {
            return Err(SparseError::DimensionMismatch {
                expected: self.len,
                got: other.len,
            });
        }

        let mut sum = T::zero();
        let (mut a, mut b) = (0, 0);
        while a < self.indices.len() && b < other.indices.len() {
            let (ia, ib) = (self.indices[a], other.indices[b]);
            if ia == ib {
                sum += self.values[a] * other.values[b];
                a += 1;
                b += 1;
            } else if ia < ib {
                a += 1;
            } else {
                b += 1;
            }
        }
        Ok(sum)
    }

    /// Inner product with a dense array of the same length
    pub fn dot_dense(&self, other: &Array1<T>) -> Result<T> {
        if self.len != other.len() {
            return Err(SparseError::DimensionMismatch {
                expected: self.len,
                got: other.len(),
            });
        }
        Ok(self.iter().fold(T::zero(), |acc, (i, v)| acc + v * other[i]))
    }

    /// Multiply every stored value by `factor`.
    ///
    /// Products that underflow to zero are removed.
    pub fn scale(&mut self, factor: T) {
        if factor.is_zero() {
            self.clear();
            return;
        }
        for val in &mut self.values {
            *val *= factor;
        }
        self.drop_zeros();
    }

    /// Compact away exact zeros, keeping index order
    fn drop_zeros(&mut self) {
        let mut keep = 0;
        for pos in 0..self.values.len() {
            if !self.values[pos].is_zero() {
                self.indices[keep] = self.indices[pos];
                self.values[keep] = self.values[pos];
                keep += 1;
            }
        }
        self.indices.truncate(keep);
        self.values.truncate(keep);
    }

    /// Euclidean norm
    pub fn norm(&self) -> T::Real {
        self.values
            .iter()
            .fold(T::Real::zero(), |acc, v| acc + v.norm_sqr())
            .sqrt()
    }

    /// Largest stored magnitude, zero for an empty vector
    pub fn max_abs(&self) -> T::Real {
        self.values
            .iter()
            .fold(T::Real::zero(), |acc, v| acc.max(v.norm()))
    }

    /// `self += alpha * x`
    pub fn axpy(&mut self, alpha: T, x: &SparseVector<T>) -> Result<()> {
        if self.len != x.len {
            return Err(SparseError::DimensionMismatch {
                expected: self.len,
                got: x.len,
            });
        }
        let mut scratch = SparseVector::with_capacity(self.len, self.nnz() + x.nnz());
        self.axpy_with(alpha, x, &mut scratch, |_| {});
        Ok(())
    }

    /// Merge `self + alpha * x` into `scratch`, then swap it into `self`.
    ///
    /// `on_fill` sees every index that was absent from `self` and is stored
    /// afterwards. Exact cancellations are dropped. `scratch` keeps the old
    /// buffers so repeated calls recycle allocations.
    pub(crate) fn axpy_with(
        &mut self,
        alpha: T,
        x: &SparseVector<T>,
        scratch: &mut SparseVector<T>,
        mut on_fill: impl FnMut(usize),
    ) {
        debug_assert_eq!(self.len, x.len);
        scratch.len = self.len;
        scratch.clear();

        let (mut a, mut b) = (0, 0);
        loop {
            let ia = self.indices.get(a).copied();
            let ib = x.indices.get(b).copied();
            match (ia, ib) {
                (None, None) => break,
                (Some(i), Some(j)) if i == j => {
                    let v = self.values[a] + alpha * x.values[b];
                    if !v.is_zero() {
                        scratch.indices.push(i);
                        scratch.values.push(v);
                    }
                    a += 1;
                    b += 1;
                }
                (Some(i), Some(j)) if i < j => {
                    scratch.indices.push(i);
                    scratch.values.push(self.values[a]);
                    a += 1;
                }
                (Some(i), None) => {
                    scratch.indices.push(i);
                    scratch.values.push(self.values[a]);
                    a += 1;
                }
                (_, Some(j)) => {
                    let v = alpha * x.values[b];
                    if !v.is_zero() {
                        scratch.indices.push(j);
                        scratch.values.push(v);
                        on_fill(j);
                    }
                    b += 1;
                }
            }
        }

        std::mem::swap(&mut self.indices, &mut scratch.indices);
        std::mem::swap(&mut self.values, &mut scratch.values);
    }

    /// Reorder entries: the value at position `i` moves to `perm[i]`.
    pub fn permute(&mut self, perm: &[usize]) -> Result<()> {
        check_permutation(perm, self.len)?;
        let mut entries: Vec<(usize, T)> = self.iter().map(|(i, v)| (perm[i], v)).collect();
        entries.sort_unstable_by_key(|&(i, _)| i);
        self.indices = entries.iter().map(|&(i, _)| i).collect();
        self.values = entries.into_iter().map(|(_, v)| v).collect();
        Ok(())
    }

    /// Convert to a dense array
    pub fn to_dense(&self) -> Array1<T> {
        let mut dense = Array1::from_elem(self.len, T::zero());
        for (i, v) in self.iter() {
            dense[i] = v;
        }
        dense
    }
}

/// Validate that `perm` is a bijection over `[0, n)`
pub(crate) fn check_permutation(perm: &[usize], n: usize) -> Result<()> {
    if perm.len() != n {
        return Err(SparseError::DimensionMismatch {
            expected: n,
            got: perm.len(),
        });
    }
    let mut seen = vec![false; n];
    for &p in perm {
        if p >= n || seen[p] {
            return Err(SparseError::invalid(format!(
                "not a permutation of 0..{n}: entry {p}"
            )));
        }
        seen[p] = true;
    }
    Ok(())
}
