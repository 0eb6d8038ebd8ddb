//! Conversion between collections of vectorizable entities and dense matrices.
//!
//! Every entity encodes to a fixed-length numeric vector. Stacking those
//! vectors as rows gives a `(n_entities, n_parameters)` matrix; decoding the
//! rows against a template gives the entities back.
//!
//! - `as_matrix`: entities → matrix, from a slice or a lazy iterator
//! - `from_matrix`: matrix → entities, eagerly or lazily

pub mod as_matrix;
pub mod from_matrix;

use crate::matrix::Scalar;

pub use as_matrix::{StackOptions, Stacked, as_matrix, as_matrix_iter};
pub use from_matrix::{Entities, Materialize, Reconstruct, from_matrix};

/// Something that can be flattened to a fixed-length vector and rebuilt
/// from one.
///
/// `from_vector` is called on a *template*: the receiver only supplies
/// structure (shape, metadata), never data. For a homogeneous collection,
/// `as_vector().len() == n_parameters()` for every entity.
pub trait Vectorizable: Sized {
    /// Element type of the encoding.
    type Scalar: Scalar;

    /// Length of the vector produced by [`as_vector`](Self::as_vector).
    fn n_parameters(&self) -> usize;

    fn as_vector(&self) -> Vec<Self::Scalar>;

    /// Build a new entity shaped like `self` carrying `vector`'s data.
    fn from_vector(&self, vector: &[Self::Scalar]) -> Self;
}

impl<T: Scalar> Vectorizable for Vec<T> {
    type Scalar = T;

    fn n_parameters(&self) -> usize {
        self.len()
    }

    fn as_vector(&self) -> Vec<T> {
        self.clone()
    }

    fn from_vector(&self, vector: &[T]) -> Self {
        vector.to_vec()
    }
}
