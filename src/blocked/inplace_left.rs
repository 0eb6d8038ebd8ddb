//! `A · B` written back over the leading columns of `A`.

use tracing::debug;

use crate::error::Result;
use crate::matrix::naive_ikj::matmul_naive_ikj;
use crate::matrix::{Matrix, MatrixView, Scalar};

use super::check_left;

/// Blocked product `a · b` stored in place over `a[:, :n_small]`.
///
/// `a` is the big operand (n_big × k) and is damaged by the call: the first
/// `n_small` columns of every row end up holding the product, the remaining
/// columns keep whatever they held. `b` (k × n_small) must satisfy
/// `n_small <= k` so the result fits inside `a`'s rows.
///
/// Rows of `a` are processed `block_size` at a time. Each block needs a
/// transient `block_size × n_small` buffer; larger blocks trade memory for
/// fewer kernel calls. The result does not depend on `block_size`.
///
/// # Errors
///
/// `ShapeMismatch` if `a.cols != b.rows` or `b.cols > a.cols`,
/// `InvalidBlockSize` if `block_size == 0`. Nothing is written on error.
///
/// # Example
///
/// ```
/// use blockmat::Matrix;
/// use blockmat::blocked::inplace_left::dot_inplace_left;
///
/// let mut a = Matrix::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// let b = Matrix::from_vec(2, 1, vec![1.0, 1.0]).unwrap();
///
/// let c = dot_inplace_left(&mut a, &b, 1).unwrap();
/// assert_eq!(c.to_matrix().into_vec(), vec![3.0, 7.0, 11.0]);
/// ```
pub fn dot_inplace_left<'a, T: Scalar>(
    a: &'a mut Matrix<T>,
    b: &Matrix<T>,
    block_size: usize,
) -> Result<MatrixView<'a, T>> {
    check_left(a.shape(), b.shape(), block_size)?;
    let (n_big, k) = a.shape();
    let n_small = b.cols();

    if n_big > 0 && n_small > 0 {
        let block_rows = block_size.min(n_big);
        debug!(
            n_big,
            k,
            n_small,
            block_rows,
            blocks = n_big.div_ceil(block_rows),
            "dot inplace left"
        );

        let mut scratch = vec![T::zero(); block_rows * n_small];
        for block in a.as_mut_slice().chunks_mut(block_rows * k) {
            multiply_block_left(block, b.as_slice(), &mut scratch, k, n_small);
        }
    }

    Ok(a.leading_cols(n_small))
}

/// Multiply one row block of A by B and store the result over the block.
///
/// `block` holds whole rows of A (its length is a multiple of `k`), and
/// `scratch` must have room for `block.len() / k × n_small` values.
pub(crate) fn multiply_block_left<T: Scalar>(
    block: &mut [T],
    b: &[T],
    scratch: &mut [T],
    k: usize,
    n_small: usize,
) {
    let rows = block.len() / k;
    let out = &mut scratch[..rows * n_small];
    out.fill(T::zero());

    // Read the whole block before writing any of it.
    matmul_naive_ikj(block, b, out, rows, n_small, k);

    for (dst, src) in block.chunks_exact_mut(k).zip(out.chunks_exact(n_small)) {
        dst[..n_small].copy_from_slice(src);
    }
}
