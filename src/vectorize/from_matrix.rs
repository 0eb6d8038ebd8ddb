//! Rebuild entities from the rows of a matrix.

use std::iter::FusedIterator;

use crate::matrix::Matrix;

use super::Vectorizable;

/// How [`from_matrix`] produces its entities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Materialize {
    /// Decode every row up front.
    #[default]
    Eager,
    /// Decode each row only when the iterator reaches it.
    Lazy,
}

/// Lazily decodes matrix rows against a template, in row order.
///
/// Clone it to iterate again from the same position; the matrix and the
/// template are only borrowed.
pub struct Reconstruct<'a, V: Vectorizable> {
    matrix: &'a Matrix<V::Scalar>,
    template: &'a V,
    front: usize,
    back: usize,
}

impl<'a, V: Vectorizable> Reconstruct<'a, V> {
    pub fn new(matrix: &'a Matrix<V::Scalar>, template: &'a V) -> Self {
        Self {
            matrix,
            template,
            front: 0,
            back: matrix.rows(),
        }
    }
}

impl<V: Vectorizable> Clone for Reconstruct<'_, V> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<V: Vectorizable> Iterator for Reconstruct<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        if self.front == self.back {
            return None;
        }
        let row = self.matrix.row(self.front);
        self.front += 1;
        Some(self.template.from_vector(row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<V: Vectorizable> DoubleEndedIterator for Reconstruct<'_, V> {
    fn next_back(&mut self) -> Option<V> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.template.from_vector(self.matrix.row(self.back)))
    }
}

impl<V: Vectorizable> ExactSizeIterator for Reconstruct<'_, V> {}

impl<V: Vectorizable> FusedIterator for Reconstruct<'_, V> {}

/// Entities decoded from a matrix, either already materialized or on demand.
///
/// Both producers yield the same sequence; iterate it, or call
/// [`into_vec`](Self::into_vec) to collect.
pub enum Entities<'a, V: Vectorizable> {
    Eager(std::vec::IntoIter<V>),
    Lazy(Reconstruct<'a, V>),
}

impl<V: Vectorizable> Entities<'_, V> {
    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }

    pub fn into_vec(self) -> Vec<V> {
        match self {
            Self::Eager(iter) => iter.collect(),
            Self::Lazy(iter) => iter.collect(),
        }
    }
}

impl<V: Vectorizable> Iterator for Entities<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        match self {
            Self::Eager(iter) => iter.next(),
            Self::Lazy(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Eager(iter) => iter.size_hint(),
            Self::Lazy(iter) => iter.size_hint(),
        }
    }
}

impl<V: Vectorizable> ExactSizeIterator for Entities<'_, V> {}

/// Rebuild one entity per matrix row using `template.from_vector`.
///
/// The template is only read. With [`Materialize::Lazy`] no row is decoded
/// until the returned iterator is advanced.
///
/// # Example
///
/// ```
/// use blockmat::Matrix;
/// use blockmat::vectorize::{Materialize, from_matrix};
///
/// let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let template = vec![0.0, 0.0];
///
/// let items = from_matrix(&m, &template, Materialize::Eager).into_vec();
/// assert_eq!(items, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
/// ```
pub fn from_matrix<'a, V: Vectorizable>(
    matrix: &'a Matrix<V::Scalar>,
    template: &'a V,
    materialize: Materialize,
) -> Entities<'a, V> {
    let rows = Reconstruct::new(matrix, template);
    match materialize {
        Materialize::Eager => Entities::Eager(rows.collect::<Vec<_>>().into_iter()),
        Materialize::Lazy => Entities::Lazy(rows),
    }
}
