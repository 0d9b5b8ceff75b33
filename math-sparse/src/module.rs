//! Extension-module surface
//!
//! A host environment (a scripting-language binding, a plugin loader) drives
//! the crate through the functions and traits here:
//! - [`init_module`] registers the three object kinds once, in a fixed order
//! - [`make_vector`], [`make_matrix`] and [`factorize`](crate::factorize)
//!   construct objects
//! - [`SparseObject`] gives uniform, typed access to any of them
//!
//! No process-wide state is kept; the registry belongs to the caller.

use crate::direct::LuFactorization;
use crate::error::Result;
use crate::sparse::{SparseMatrix, SparseVector};
use crate::traits::ComplexField;
use std::fmt;

/// The kinds of object exposed to a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Vector,
    Matrix,
    LuFactorization,
}

impl ObjectKind {
    /// Registration order used by [`init_module`]
    pub const ALL: [ObjectKind; 3] = [
        ObjectKind::Vector,
        ObjectKind::Matrix,
        ObjectKind::LuFactorization,
    ];

    /// Stable name under which the kind is registered
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Vector => "vector",
            ObjectKind::Matrix => "matrix",
            ObjectKind::LuFactorization => "lu_factorization",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common read-only interface of every exposed object
pub trait SparseObject {
    fn kind(&self) -> ObjectKind;

    /// `(rows, cols)`; a vector of length n reports `(n, 1)`
    fn shape(&self) -> (usize, usize);

    /// Stored entries (for a factorization: L and U together)
    fn nnz(&self) -> usize;
}

impl<T: ComplexField> SparseObject for SparseVector<T> {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Vector
    }

    fn shape(&self) -> (usize, usize) {
        (self.len(), 1)
    }

    fn nnz(&self) -> usize {
        SparseVector::nnz(self)
    }
}

impl<T: ComplexField> SparseObject for SparseMatrix<T> {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Matrix
    }

    fn shape(&self) -> (usize, usize) {
        SparseMatrix::shape(self)
    }

    fn nnz(&self) -> usize {
        SparseMatrix::nnz(self)
    }
}

impl<T: ComplexField> SparseObject for LuFactorization<T> {
    fn kind(&self) -> ObjectKind {
        ObjectKind::LuFactorization
    }

    fn shape(&self) -> (usize, usize) {
        (self.dim(), self.dim())
    }

    fn nnz(&self) -> usize {
        self.stats().nnz_l + self.stats().nnz_u
    }
}

/// Receiver of object-kind registrations
pub trait ModuleRegistry {
    fn register(&mut self, kind: ObjectKind);
}

impl ModuleRegistry for Vec<ObjectKind> {
    fn register(&mut self, kind: ObjectKind) {
        self.push(kind);
    }
}

/// Register vector, matrix and LU factorization, in that order
pub fn init_module<R: ModuleRegistry + ?Sized>(registry: &mut R) {
    for kind in ObjectKind::ALL {
        log::debug!("registering {kind}");
        registry.register(kind);
    }
}

/// Build a sparse vector of `length` from sorted `(index, value)` pairs
pub fn make_vector<T: ComplexField>(
    length: usize,
    entries: impl IntoIterator<Item = (usize, T)>,
) -> Result<SparseVector<T>> {
    SparseVector::from_entries(length, entries)
}

/// Build an empty `rows × cols` sparse matrix
pub fn make_matrix<T: ComplexField>(rows: usize, cols: usize) -> SparseMatrix<T> {
    SparseMatrix::new(rows, cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direct::factorize;
    use std::collections::HashMap;

    #[test]
    fn test_init_module_order() {
        let mut registry: Vec<ObjectKind> = Vec::new();
        init_module(&mut registry);
        assert_eq!(registry, ObjectKind::ALL.to_vec());

        let names: Vec<_> = registry.iter().map(|k| k.to_string()).collect();
        assert_eq!(names, ["vector", "matrix", "lu_factorization"]);
    }

    #[test]
    fn test_init_module_is_stateless() {
        let mut first: Vec<ObjectKind> = Vec::new();
        let mut second: Vec<ObjectKind> = Vec::new();
        init_module(&mut first);
        init_module(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_registry() {
        struct Counting(HashMap<&'static str, usize>);
        impl ModuleRegistry for Counting {
            fn register(&mut self, kind: ObjectKind) {
                *self.0.entry(kind.name()).or_default() += 1;
            }
        }

        let mut registry = Counting(HashMap::new());
        init_module(&mut registry);
        assert_eq!(registry.0.len(), 3);
        assert!(registry.0.values().all(|&count| count == 1));
    }

    #[test]
    fn test_sparse_objects() {
        let v = make_vector(4, [(1, 2.0_f64), (3, 1.0)]).unwrap();
        let mut m = make_matrix::<f64>(4, 4);
        for j in 0..4 {
            m.set(j, j, 2.0).unwrap();
        }
        m.set_column(0, v.clone()).unwrap();
        m.set(0, 0, 1.0).unwrap();
        let lu = factorize(&m, 1e-10).unwrap();

        let objects: [&dyn SparseObject; 3] = [&v, &m, &lu];
        let kinds: Vec<_> = objects.iter().map(|o| o.kind()).collect();
        assert_eq!(kinds, ObjectKind::ALL);

        assert_eq!(v.shape(), (4, 1));
        assert_eq!(SparseObject::shape(&m), (4, 4));
        assert_eq!(lu.shape(), (4, 4));
        assert_eq!(SparseObject::nnz(&v), 2);
        assert_eq!(SparseObject::nnz(&m), 6);
    }
}
