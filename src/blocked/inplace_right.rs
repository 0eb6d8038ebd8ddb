//! `A · B` written back over the leading rows of `B`.

use tracing::debug;

use crate::error::Result;
use crate::matrix::naive_ikj::matmul_ikj_strided;
use crate::matrix::{Matrix, MatrixView, Scalar};

use super::check_right;

/// Blocked product `a · b` stored in place over `b[:n_small, :]`.
///
/// Mirror of [`dot_inplace_left`](super::inplace_left::dot_inplace_left):
/// `a` (n_small × k) is small and read-only, `b` (k × n_big) is the big
/// operand. Columns of `b` are processed `block_size` at a time and each
/// block's product lands in the first `n_small` rows of that column band.
/// Requires `n_small <= k`.
///
/// # Errors
///
/// `ShapeMismatch` if `a.cols != b.rows` or `a.rows > b.rows`,
/// `InvalidBlockSize` if `block_size == 0`. Nothing is written on error.
///
/// # Example
///
/// ```
/// use blockmat::Matrix;
/// use blockmat::blocked::inplace_right::dot_inplace_right;
///
/// let a = Matrix::from_vec(1, 2, vec![1.0, 1.0]).unwrap();
/// let mut b = Matrix::from_vec(2, 3, vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]).unwrap();
///
/// let c = dot_inplace_right(&a, &mut b, 2).unwrap();
/// assert_eq!(c.row(0), &[3.0, 7.0, 11.0]);
/// ```
pub fn dot_inplace_right<'a, T: Scalar>(
    a: &Matrix<T>,
    b: &'a mut Matrix<T>,
    block_size: usize,
) -> Result<MatrixView<'a, T>> {
    check_right(a.shape(), b.shape(), block_size)?;
    let (k, n_big) = b.shape();
    let n_small = a.rows();

    if n_big > 0 && n_small > 0 {
        let block_cols = block_size.min(n_big);
        debug!(
            n_big,
            k,
            n_small,
            block_cols,
            blocks = n_big.div_ceil(block_cols),
            "dot inplace right"
        );

        let mut scratch = vec![T::zero(); n_small * block_cols];
        for start in (0..n_big).step_by(block_cols) {
            let width = block_cols.min(n_big - start);
            let out = &mut scratch[..n_small * width];
            out.fill(T::zero());

            // Column band [start, start + width) of B, rows n_big apart.
            matmul_ikj_strided(
                a.as_slice(),
                &b.as_slice()[start..],
                n_big,
                out,
                n_small,
                width,
                k,
            );

            store_band(b.as_mut_slice(), out, start, width, n_big);
        }
    }

    Ok(b.leading_rows(n_small))
}

/// Copy an `n_small × width` result into rows `0..n_small`, columns
/// `start..start + width` of a row-major buffer with `n_big` columns.
pub(crate) fn store_band<T: Scalar>(
    b: &mut [T],
    out: &[T],
    start: usize,
    width: usize,
    n_big: usize,
) {
    for (i, src) in out.chunks_exact(width).enumerate() {
        let offset = i * n_big + start;
        b[offset..offset + width].copy_from_slice(src);
    }
}
