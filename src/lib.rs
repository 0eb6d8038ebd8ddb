//! In-place blocked matrix products and vectorizable-to-matrix conversion.
//!
//! Two independent tools that share a dense [`Matrix`] type:
//!
//! - **In-place multiply.** `A · B` where one operand is too big to want a
//!   second copy of. The product is written back over the leading columns of
//!   `A` (or leading rows of `B`), one block at a time, so the only extra
//!   memory is a single block-sized scratch buffer.
//! - **Vectorization.** Stack entities that flatten to fixed-length vectors
//!   into the rows of a matrix, and rebuild them from the rows again.
//!
//! ## Usage
//!
//! ```
//! use blockmat::{Matrix, dot_inplace_left};
//!
//! let mut a = Matrix::from_vec(3, 2, vec![1.0, 2.0,
//!                                         3.0, 4.0,
//!                                         5.0, 6.0]).unwrap();
//! let b = Matrix::from_vec(2, 1, vec![1.0, 1.0]).unwrap();
//!
//! let c = dot_inplace_left(&mut a, &b).unwrap();
//! assert_eq!(c.to_matrix().into_vec(), vec![3.0, 7.0, 11.0]);
//! ```
//!
//! Block size and threading are set with [`DotConfig`]:
//!
//! ```
//! use blockmat::{DotConfig, Matrix};
//!
//! let mut a = Matrix::<f64>::zeros(10_000, 64);
//! let b = Matrix::zeros(64, 8);
//!
//! let c = DotConfig::default()
//!     .with_block_size(256)
//!     .with_threads(4)
//!     .dot_left(&mut a, &b)
//!     .unwrap();
//! assert_eq!(c.shape(), (10_000, 8));
//! ```
//!
//! ## What's inside
//!
//! - Sequential blocked kernels (`blocked`)
//! - `rayon` variants over disjoint blocks (`threaded`)
//! - Slice and lazy-iterator stacking, eager and lazy reconstruction (`vectorize`)
//! - Pluggable progress sinks (`progress`)

pub mod blocked;
pub mod config;
pub mod error;
pub mod matrix;
pub mod progress;
pub mod threaded;
pub mod vectorize;

pub use blocked::DEFAULT_BLOCK_SIZE;
pub use config::DotConfig;
pub use error::{Error, Result};
pub use matrix::{Matrix, MatrixView, Scalar};
pub use progress::{LogProgress, Progress};
pub use vectorize::{
    Entities, Materialize, StackOptions, Stacked, Vectorizable, as_matrix, as_matrix_iter,
    from_matrix,
};

/// In-place product `a · b`, overwriting `a[:, :b.cols]`.
///
/// `a` is `n_big × k`, `b` is `k × n_small` with `n_small <= k`. Uses
/// [`DEFAULT_BLOCK_SIZE`] rows per block on the calling thread.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] before touching `a` if the shapes are
/// incompatible.
pub fn dot_inplace_left<'a, T: Scalar>(
    a: &'a mut Matrix<T>,
    b: &Matrix<T>,
) -> Result<MatrixView<'a, T>> {
    DotConfig::default().dot_left(a, b)
}

/// In-place product `a · b`, overwriting `b[:a.rows, :]`.
///
/// `a` is `n_small × k` with `n_small <= k`, `b` is `k × n_big`. Uses
/// [`DEFAULT_BLOCK_SIZE`] columns per block on the calling thread.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] before touching `b` if the shapes are
/// incompatible.
pub fn dot_inplace_right<'a, T: Scalar>(
    a: &Matrix<T>,
    b: &'a mut Matrix<T>,
) -> Result<MatrixView<'a, T>> {
    DotConfig::default().dot_right(a, b)
}
