//! Multi-threaded blocked in-place products.

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::debug;

use crate::blocked::inplace_left::{dot_inplace_left, multiply_block_left};
use crate::blocked::inplace_right::{dot_inplace_right, store_band};
use crate::blocked::{check_left, check_right};
use crate::error::Result;
use crate::matrix::naive_ikj::matmul_ikj_strided;
use crate::matrix::{Matrix, MatrixView, Scalar};

/// Multi-threaded version of
/// [`dot_inplace_left`](crate::blocked::inplace_left::dot_inplace_left).
///
/// Row blocks of `a` are handed to a pool of up to `num_threads` workers,
/// each with its own scratch buffer. The result is identical to the
/// single-threaded routine.
///
/// # Arguments
///
/// * `num_threads` - Maximum threads (actual may be fewer for small products)
pub fn dot_inplace_left_mt<'a, T: Scalar>(
    a: &'a mut Matrix<T>,
    b: &Matrix<T>,
    block_size: usize,
    num_threads: usize,
) -> Result<MatrixView<'a, T>> {
    check_left(a.shape(), b.shape(), block_size)?;
    let (n_big, k) = a.shape();
    let n_small = b.cols();

    let block_rows = block_size.min(n_big.max(1));
    let threads = choose_thread_count(
        n_big,
        n_small,
        k,
        num_threads,
        n_big.div_ceil(block_rows),
    );
    if threads <= 1 {
        return dot_inplace_left(a, b, block_size);
    }
    debug!(n_big, k, n_small, block_rows, threads, "dot inplace left (threaded)");

    let blocks_per_task = n_big.div_ceil(block_rows).div_ceil(threads);
    let b_data = b.as_slice();
    let a_data = a.as_mut_slice();
    run_on_pool(threads, || {
        a_data
            .par_chunks_mut(block_rows * k)
            .with_min_len(blocks_per_task)
            .for_each_init(
                || vec![T::zero(); block_rows * n_small],
                |scratch, block| multiply_block_left(block, b_data, scratch, k, n_small),
            );
    })?;

    Ok(a.leading_cols(n_small))
}

/// Multi-threaded version of
/// [`dot_inplace_right`](crate::blocked::inplace_right::dot_inplace_right).
///
/// Column bands of `b` are still visited one at a time; within a band the
/// `n_small` result rows are computed in parallel, then stored.
///
/// # Arguments
///
/// * `num_threads` - Maximum threads (actual may be fewer for small products)
pub fn dot_inplace_right_mt<'a, T: Scalar>(
    a: &Matrix<T>,
    b: &'a mut Matrix<T>,
    block_size: usize,
    num_threads: usize,
) -> Result<MatrixView<'a, T>> {
    check_right(a.shape(), b.shape(), block_size)?;
    let (k, n_big) = b.shape();
    let n_small = a.rows();

    let threads = choose_thread_count(n_big, n_small, k, num_threads, n_small);
    if threads <= 1 {
        return dot_inplace_right(a, b, block_size);
    }
    let block_cols = block_size.min(n_big);
    debug!(n_big, k, n_small, block_cols, threads, "dot inplace right (threaded)");

    let rows_per_task = n_small.div_ceil(threads);
    let a_data = a.as_slice();
    let mut scratch = vec![T::zero(); n_small * block_cols];
    run_on_pool(threads, || {
        for start in (0..n_big).step_by(block_cols) {
            let width = block_cols.min(n_big - start);
            let out = &mut scratch[..n_small * width];
            let band = &b.as_slice()[start..];

            out.par_chunks_mut(width)
                .zip(a_data.par_chunks(k))
                .with_min_len(rows_per_task)
                .for_each(|(out_row, a_row)| {
                    out_row.fill(T::zero());
                    matmul_ikj_strided(a_row, band, n_big, out_row, 1, width, k);
                });

            store_band(b.as_mut_slice(), out, start, width, n_big);
        }
    })?;

    Ok(b.leading_rows(n_small))
}

/// Run `op` with at least `threads` workers available.
///
/// The global pool is reused whenever it is large enough; callers bound the
/// number of tasks with `with_min_len`. A dedicated pool is only built when
/// the caller asks for more threads than the global pool has.
fn run_on_pool<R: Send>(threads: usize, op: impl FnOnce() -> R + Send) -> Result<R> {
    if threads <= rayon::current_num_threads() {
        return Ok(op());
    }
    let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
    Ok(pool.install(op))
}

/// Pick how many threads a product of `m × n × k` is worth.
///
/// - < 1M FLOPs: 1 thread
/// - < 4M FLOPs: 2 threads
/// - Otherwise: up to `max_threads`
///
/// Never more threads than there are independent `work_units`.
pub fn choose_thread_count(
    m: usize,
    n: usize,
    k: usize,
    max_threads: usize,
    work_units: usize,
) -> usize {
    let flops = 2.0 * m as f64 * n as f64 * k as f64;

    const SINGLE_THREAD_THRESHOLD: f64 = 1_000_000.0;
    const TWO_THREAD_THRESHOLD: f64 = 4_000_000.0;

    let optimal_threads = if flops < SINGLE_THREAD_THRESHOLD {
        1
    } else if flops < TWO_THREAD_THRESHOLD {
        2
    } else {
        max_threads
    };

    optimal_threads.min(work_units).min(max_threads).max(1)
}
