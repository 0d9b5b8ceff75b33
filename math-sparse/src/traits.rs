//! Core traits for sparse linear algebra
//!
//! This module defines the abstractions shared by every sparse type:
//! - [`ComplexField`]: scalar types (real and complex numbers)
//! - [`LinearOperator`]: matrix-like objects that can perform matrix-vector products

use crate::error::Result;
use ndarray::Array1;
use num_complex::{Complex32, Complex64};
use num_traits::{Float, FromPrimitive, NumAssign, One, Zero};
use std::fmt::Debug;
use std::ops::Neg;

/// Trait for scalar types that can be stored in sparse vectors and matrices.
///
/// This trait abstracts over real and complex number types, providing
/// a unified interface for magnitude comparisons (pivoting), inversion
/// (elimination) and finiteness checks (overflow detection).
///
/// # Implementations
///
/// Provided for:
/// - `f64` (default precision)
/// - `f32`
/// - `Complex64`
/// - `Complex32`
pub trait ComplexField:
    NumAssign + Clone + Copy + Send + Sync + Debug + PartialEq + Zero + One + Neg<Output = Self> + 'static
{
    /// The real number type underlying this field
    type Real: Float + NumAssign + FromPrimitive + Send + Sync + Debug + 'static;

    /// Complex conjugate
    fn conj(&self) -> Self;

    /// Squared magnitude |z|²
    fn norm_sqr(&self) -> Self::Real;

    /// Magnitude |z|
    fn norm(&self) -> Self::Real {
        self.norm_sqr().sqrt()
    }

    /// Multiplicative inverse (1/z)
    fn inv(&self) -> Self;

    /// `true` unless some component is infinite or NaN
    fn is_finite(&self) -> bool;
}

impl ComplexField for Complex64 {
    type Real = f64;

    #[inline]
    fn conj(&self) -> Self {
        Complex64::conj(self)
    }

    #[inline]
    fn norm_sqr(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    #[inline]
    fn norm(&self) -> f64 {
        self.re.hypot(self.im)
    }

    #[inline]
    fn inv(&self) -> Self {
        Complex64::inv(self)
    }

    #[inline]
    fn is_finite(&self) -> bool {
        Complex64::is_finite(*self)
    }
}

impl ComplexField for Complex32 {
    type Real = f32;

    #[inline]
    fn conj(&self) -> Self {
        Complex32::conj(self)
    }

    #[inline]
    fn norm_sqr(&self) -> f32 {
        self.re * self.re + self.im * self.im
    }

    #[inline]
    fn norm(&self) -> f32 {
        self.re.hypot(self.im)
    }

    #[inline]
    fn inv(&self) -> Self {
        Complex32::inv(self)
    }

    #[inline]
    fn is_finite(&self) -> bool {
        Complex32::is_finite(*self)
    }
}

impl ComplexField for f64 {
    type Real = f64;

    #[inline]
    fn conj(&self) -> Self {
        *self
    }

    #[inline]
    fn norm_sqr(&self) -> f64 {
        *self * *self
    }

    #[inline]
    fn norm(&self) -> f64 {
        self.abs()
    }

    #[inline]
    fn inv(&self) -> Self {
        1.0 / *self
    }

    #[inline]
    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

impl ComplexField for f32 {
    type Real = f32;

    #[inline]
    fn conj(&self) -> Self {
        *self
    }

    #[inline]
    fn norm_sqr(&self) -> f32 {
        *self * *self
    }

    #[inline]
    fn norm(&self) -> f32 {
        self.abs()
    }

    #[inline]
    fn inv(&self) -> Self {
        1.0 / *self
    }

    #[inline]
    fn is_finite(&self) -> bool {
        f32::is_finite(*self)
    }
}

/// Trait for linear operators (matrices) that can perform matrix-vector products.
///
/// Unlike a bare `matvec`, shape disagreements are reported as
/// [`SparseError::DimensionMismatch`](crate::SparseError::DimensionMismatch).
pub trait LinearOperator<T: ComplexField> {
    /// Number of rows in the operator
    fn num_rows(&self) -> usize;

    /// Number of columns in the operator
    fn num_cols(&self) -> usize;

    /// Apply the operator: y = A * x
    fn apply(&self, x: &Array1<T>) -> Result<Array1<T>>;

    /// Apply the transpose: y = A^T * x
    fn apply_transpose(&self, x: &Array1<T>) -> Result<Array1<T>>;

    /// Apply the Hermitian (conjugate transpose): y = A^H * x
    fn apply_hermitian(&self, x: &Array1<T>) -> Result<Array1<T>> {
        let x_conj = x.mapv(|v| v.conj());
        let y = self.apply_transpose(&x_conj)?;
        Ok(y.mapv(|v| v.conj()))
    }

    /// Check if the operator is square
    fn is_square(&self) -> bool {
        self.num_rows() == self.num_cols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_complex64_field() {
        let z = Complex64::new(3.0, 4.0);
        assert_relative_eq!(z.norm_sqr(), 25.0);
        assert_relative_eq!(z.norm(), 5.0);

        let z_conj = ComplexField::conj(&z);
        assert_relative_eq!(z_conj.re, 3.0);
        assert_relative_eq!(z_conj.im, -4.0);

        let product = z * ComplexField::inv(&z);
        assert_relative_eq!(product.re, 1.0, epsilon = 1e-10);
        assert_relative_eq!(product.im, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_f64_field() {
        let x: f64 = -3.0;
        assert_relative_eq!(x.norm_sqr(), 9.0);
        assert_relative_eq!(ComplexField::norm(&x), 3.0);
        assert_relative_eq!(ComplexField::inv(&x), -1.0 / 3.0);
        assert!(ComplexField::is_finite(&x));
        assert!(!ComplexField::is_finite(&f64::INFINITY));
    }

    #[test]
    fn test_complex_finiteness() {
        assert!(ComplexField::is_finite(&Complex32::new(1.0, -2.0)));
        assert!(!ComplexField::is_finite(&Complex64::new(f64::NAN, 0.0)));
    }
}
