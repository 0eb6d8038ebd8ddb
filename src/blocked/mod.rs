//! Blocked in-place matrix products.
//!
//! Both routines reuse the big operand's buffer as output storage. The big
//! dimension is cut into blocks of `block_size`; each block's product is
//! computed into a small scratch buffer from the block's untouched input and
//! only then copied back over the block's leading columns/rows. Blocks never
//! overlap, so no block reads data a previous block has overwritten.
//!
//! Available implementations:
//! - `inplace_left`: `A · B` stored in `A[:, :n_small]`
//! - `inplace_right`: `A · B` stored in `B[:n_small, :]`

pub mod inplace_left;
pub mod inplace_right;

use crate::error::{Error, Result};

/// Block size used when the caller does not pick one.
pub const DEFAULT_BLOCK_SIZE: usize = 1000;

/// Validate shapes for `a (n_big, k) · b (k, n_small)` stored into `a`.
pub(crate) fn check_left(
    a: (usize, usize),
    b: (usize, usize),
    block_size: usize,
) -> Result<()> {
    let ((_, k_a), (k_b, n_small)) = (a, b);
    if k_a != k_b {
        return Err(Error::ShapeMismatch(format!("cannot dot {:?} * {:?}", a, b)));
    }
    if n_small > k_a {
        return Err(Error::ShapeMismatch(format!(
            "cannot dot inplace left - b has {} columns but a only has {}",
            n_small, k_a
        )));
    }
    if block_size == 0 {
        return Err(Error::InvalidBlockSize);
    }
    Ok(())
}

/// Validate shapes for `a (n_small, k) · b (k, n_big)` stored into `b`.
pub(crate) fn check_right(
    a: (usize, usize),
    b: (usize, usize),
    block_size: usize,
) -> Result<()> {
    let ((n_small, k_a), (k_b, _)) = (a, b);
    if k_a != k_b {
        return Err(Error::ShapeMismatch(format!("cannot dot {:?} * {:?}", a, b)));
    }
    if n_small > k_b {
        return Err(Error::ShapeMismatch(format!(
            "cannot dot inplace right - a has {} rows but b only has {}",
            n_small, k_b
        )));
    }
    if block_size == 0 {
        return Err(Error::InvalidBlockSize);
    }
    Ok(())
}
