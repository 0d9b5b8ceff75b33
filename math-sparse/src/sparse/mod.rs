//! Sparse storage
//!
//! This module provides a compressed sparse vector and a matrix built from
//! one sparse vector per column.

mod matrix;
mod vector;

pub use matrix::SparseMatrix;
pub use vector::SparseVector;
