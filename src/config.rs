//! Tuning knobs for the in-place multipliers.

use crate::blocked::DEFAULT_BLOCK_SIZE;
use crate::blocked::inplace_left::dot_inplace_left;
use crate::blocked::inplace_right::dot_inplace_right;
use crate::error::{Error, Result};
use crate::matrix::{Matrix, MatrixView, Scalar};
use crate::threaded::inplace_mt::{dot_inplace_left_mt, dot_inplace_right_mt};

/// Block size and thread budget for an in-place product.
///
/// `block_size` only trades memory for speed: each block needs a scratch
/// buffer of `block_size × n_small` elements. It never changes the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DotConfig {
    pub block_size: usize,
    pub num_threads: usize,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            num_threads: 1,
        }
    }
}

impl DotConfig {
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Allow up to `num_threads` workers. `1` keeps everything on the
    /// calling thread.
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(Error::InvalidBlockSize);
        }
        Ok(())
    }

    /// `a · b` stored over `a[:, :b.cols]`.
    pub fn dot_left<'a, T: Scalar>(
        &self,
        a: &'a mut Matrix<T>,
        b: &Matrix<T>,
    ) -> Result<MatrixView<'a, T>> {
        self.validate()?;
        if self.num_threads > 1 {
            dot_inplace_left_mt(a, b, self.block_size, self.num_threads)
        } else {
            dot_inplace_left(a, b, self.block_size)
        }
    }

    /// `a · b` stored over `b[:a.rows, :]`.
    pub fn dot_right<'a, T: Scalar>(
        &self,
        a: &Matrix<T>,
        b: &'a mut Matrix<T>,
    ) -> Result<MatrixView<'a, T>> {
        self.validate()?;
        if self.num_threads > 1 {
            dot_inplace_right_mt(a, b, self.block_size, self.num_threads)
        } else {
            dot_inplace_right(a, b, self.block_size)
        }
    }
}
