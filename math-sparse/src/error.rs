//! Error types for sparse vectors, matrices and factorizations.
//!
//! Every fallible operation in the crate reports through [`SparseError`].
//! Nothing is retried or recovered internally: the caller decides whether to
//! rebuild the input or loosen a tolerance.

use thiserror::Error;

/// Errors that can occur while building or using sparse objects.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SparseError {
    /// Malformed construction input (unsorted, duplicated or out-of-range
    /// indices, invalid permutations, invalid configuration values).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Two operands disagree in size.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Size required by the receiver
        expected: usize,
        /// Size actually supplied
        got: usize,
    },

    /// A row, column or element index lies outside the object.
    #[error("index {index} out of range (bound {bound})")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
        /// Exclusive upper bound
        bound: usize,
    },

    /// No pivot above the numerical tolerance exists in a column.
    #[error("matrix is singular: no acceptable pivot in column {column}")]
    SingularMatrix {
        /// Elimination step (column) that failed
        column: usize,
    },

    /// A result is not representable in the scalar type.
    #[error("numeric overflow")]
    Overflow,
}

/// A specialized `Result` type for sparse operations.
pub type Result<T> = std::result::Result<T, SparseError>;

impl SparseError {
    /// Returns `true` if the factorization failed on a singular matrix.
    pub fn is_singular(&self) -> bool {
        matches!(self, SparseError::SingularMatrix { .. })
    }

    /// Returns `true` for shape errors (`DimensionMismatch` and
    /// `IndexOutOfRange`).
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            SparseError::DimensionMismatch { .. } | SparseError::IndexOutOfRange { .. }
        )
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SparseError::InvalidInput(msg.into())
    }
}
