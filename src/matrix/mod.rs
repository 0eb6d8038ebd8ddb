//! Dense row-major matrix storage and the scalar kernels built on it.
//!
//! [`Matrix`] owns its buffer; the in-place multipliers borrow it mutably and
//! hand back a [`MatrixView`] over the region that now holds the product.

pub mod naive_ikj;
pub mod transpose;

use std::fmt::Debug;
use std::ops::{Index, IndexMut};

use num_traits::Float;

use crate::error::{Error, Result};

/// Element type a [`Matrix`] can hold. Implemented for `f32` and `f64`.
pub trait Scalar: Float + Send + Sync + Debug + 'static {}

impl<T: Float + Send + Sync + Debug + 'static> Scalar for T {}

/// A dense matrix stored row-major in one contiguous allocation.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<T = f64> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Scalar> Matrix<T> {
    /// Allocate a `rows × cols` matrix filled with zeros.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`. Use [`try_zeros`](Self::try_zeros)
    /// when the shape comes from untrusted input.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        match Self::try_zeros(rows, cols) {
            Ok(matrix) => matrix,
            Err(err) => panic!("{}", err),
        }
    }

    /// Allocate a `rows × cols` matrix filled with zeros, failing with
    /// `ShapeMismatch` if the element count does not fit in `usize`.
    pub fn try_zeros(rows: usize, cols: usize) -> Result<Self> {
        let len = element_count(rows, cols)?;
        Ok(Self {
            data: vec![T::zero(); len],
            rows,
            cols,
        })
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Example
    ///
    /// ```
    /// use blockmat::Matrix;
    ///
    /// let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0,
    ///                                     4.0, 5.0, 6.0]).unwrap();
    /// assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
    /// ```
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != element_count(rows, cols)? {
            return Err(Error::ShapeMismatch(format!(
                "buffer of {} elements cannot hold a {}x{} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { data, rows, cols })
    }

    /// Build a matrix by stacking rows. All rows must have the same length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::ShapeMismatch(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Size of the element buffer in bytes.
    pub fn nbytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<T>()
    }

    pub fn row(&self, r: usize) -> &[T] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn row_mut(&mut self, r: usize) -> &mut [T] {
        &mut self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Iterate over rows in order. Works for zero-column matrices too.
    pub fn iter_rows(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Return `selfᵗ` as a new matrix.
    pub fn transpose(&self) -> Self {
        let mut out = vec![T::zero(); self.data.len()];
        transpose::transpose(&self.data, &mut out, self.rows, self.cols);
        Self {
            data: out,
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Conventional product `self · other` into a freshly allocated matrix.
    ///
    /// This is the out-of-place baseline the blocked in-place routines are
    /// checked against.
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        if self.cols != other.rows {
            return Err(Error::ShapeMismatch(format!(
                "cannot dot {:?} * {:?}",
                self.shape(),
                other.shape()
            )));
        }
        let mut out = Self::zeros(self.rows, other.cols);
        naive_ikj::matmul_naive_ikj(
            &self.data,
            &other.data,
            &mut out.data,
            self.rows,
            other.cols,
            self.cols,
        );
        Ok(out)
    }

    /// View over the leading `cols` columns of every row.
    pub(crate) fn leading_cols(&self, cols: usize) -> MatrixView<'_, T> {
        debug_assert!(cols <= self.cols);
        MatrixView {
            data: &self.data,
            rows: self.rows,
            cols,
            stride: self.cols,
        }
    }

    /// View over the leading `rows` rows.
    pub(crate) fn leading_rows(&self, rows: usize) -> MatrixView<'_, T> {
        debug_assert!(rows <= self.rows);
        MatrixView {
            data: &self.data[..rows * self.cols],
            rows,
            cols: self.cols,
            stride: self.cols,
        }
    }
}

fn element_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        Error::ShapeMismatch(format!("a {}x{} matrix overflows usize", rows, cols))
    })
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (r, c): (usize, usize)) -> &T {
        assert!(c < self.cols, "column {} out of bounds ({})", c, self.cols);
        &self.data[r * self.cols + c]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut T {
        assert!(c < self.cols, "column {} out of bounds ({})", c, self.cols);
        &mut self.data[r * self.cols + c]
    }
}

/// A borrowed, row-strided window into a matrix buffer.
///
/// Returned by the in-place multipliers: the product lives in the leading
/// columns (left variant) or leading rows (right variant) of the big operand,
/// so consecutive result rows are `stride` elements apart.
#[derive(Clone, Copy, Debug)]
pub struct MatrixView<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
    stride: usize,
}

impl<'a, T: Scalar> MatrixView<'a, T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn row(&self, r: usize) -> &'a [T] {
        assert!(r < self.rows, "row {} out of bounds ({})", r, self.rows);
        let start = r * self.stride;
        &self.data[start..start + self.cols]
    }

    pub fn iter_rows(&self) -> impl ExactSizeIterator<Item = &'a [T]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Copy the viewed elements into a compact owned matrix.
    pub fn to_matrix(&self) -> Matrix<T> {
        let mut data = Vec::with_capacity(self.rows * self.cols);
        for row in self.iter_rows() {
            data.extend_from_slice(row);
        }
        Matrix {
            data,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T: Scalar> Index<(usize, usize)> for MatrixView<'_, T> {
    type Output = T;

    fn index(&self, (r, c): (usize, usize)) -> &T {
        &self.row(r)[c]
    }
}

impl<T: Scalar> PartialEq<Matrix<T>> for MatrixView<'_, T> {
    fn eq(&self, other: &Matrix<T>) -> bool {
        self.shape() == other.shape()
            && self
                .iter_rows()
                .zip(other.iter_rows())
                .all(|(a, b)| a == b)
    }
}
