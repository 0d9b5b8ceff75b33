//! Direct solvers for sparse linear systems
//!
//! This module provides:
//! - [`LuFactorization`]: sparse LU with threshold partial pivoting and
//!   Markowitz fill-in control
//! - [`factorize`], [`lu_solve`]: one-call conveniences

mod lu;

pub use lu::{LuConfig, LuFactorization, LuStats, factorize, lu_solve};
