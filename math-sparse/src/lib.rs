//! Sparse linear algebra: vectors, matrices and LU factorization
//!
//! This crate provides compressed sparse storage and a sparse direct solver
//! that keeps fill-in under control.
//!
//! # Features
//!
//! - **Sparse Vectors**: sorted index/value storage with merge-walk dot products
//! - **Sparse Matrices**: column-oriented storage with sparse matrix-vector and
//!   matrix-matrix products
//! - **LU Factorization**: threshold partial pivoting with Markowitz pivot
//!   selection, solves and determinants
//! - **Generic Scalar Types**: Works with f64, f32, Complex64, Complex32
//!
//! # Example
//!
//! ```
//! use math_audio_sparse::{SparseMatrix, SparseVector, factorize};
//! use ndarray::array;
//!
//! let mut a = SparseMatrix::<f64>::new(3, 3);
//! a.set_column(0, SparseVector::from_entries(3, [(0, 2.0), (1, 1.0)])?)?;
//! a.set_column(1, SparseVector::from_entries(3, [(0, 1.0), (1, 3.0), (2, 1.0)])?)?;
//! a.set_column(2, SparseVector::from_entries(3, [(1, 1.0), (2, 4.0)])?)?;
//!
//! let lu = factorize(&a, 1e-10)?;
//! let x = lu.solve(&array![1.0, 2.0, 3.0])?;
//! let residual = &a.matvec(&x)? - &array![1.0, 2.0, 3.0];
//! assert!(residual.iter().all(|r| r.abs() < 1e-9));
//! # Ok::<(), math_audio_sparse::SparseError>(())
//! ```

pub mod direct;
pub mod error;
pub mod module;
pub mod sparse;
pub mod traits;

// Re-export main types
pub use error::{Result, SparseError};
pub use sparse::{SparseMatrix, SparseVector};
pub use traits::{ComplexField, LinearOperator};

// Re-export direct solvers
pub use direct::{LuConfig, LuFactorization, LuStats, factorize, lu_solve};

// Re-export the host-facing surface
pub use module::{ModuleRegistry, ObjectKind, SparseObject, init_module, make_matrix, make_vector};
