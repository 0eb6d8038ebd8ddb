use super::Scalar;

/// Cache-friendly matrix multiplication using i-k-j loop order.
///
/// By swapping the j and k loops, the innermost loop accesses both B and C
/// sequentially (stride 1). This is the kernel every block of the in-place
/// multipliers runs.
///
/// # Arguments
///
/// * `a` - Matrix A (m × k), row-major
/// * `b` - Matrix B (k × n), row-major
/// * `c` - Matrix C (m × n), row-major, accumulated into (C += A * B)
/// * `m` - Rows of A and C
/// * `n` - Columns of B and C
/// * `k` - Columns of A, rows of B
pub fn matmul_naive_ikj<T: Scalar>(a: &[T], b: &[T], c: &mut [T], m: usize, n: usize, k: usize) {
    matmul_ikj_strided(a, b, n, c, m, n, k);
}

/// i-k-j multiplication where consecutive rows of B are `ldb` elements apart.
///
/// Lets a caller multiply against a column band of a wider matrix without
/// packing it first: pass the band's first element as `b` and the full row
/// length as `ldb`.
///
/// # Arguments
///
/// * `ldb` - Row stride of B, at least `n`
pub fn matmul_ikj_strided<T: Scalar>(
    a: &[T],
    b: &[T],
    ldb: usize,
    c: &mut [T],
    m: usize,
    n: usize,
    k: usize,
) {
    debug_assert!(ldb >= n);
    if n == 0 {
        return;
    }
    for i in 0..m {
        let c_row = &mut c[i * n..(i + 1) * n];
        for p in 0..k {
            let a_ip = a[i * k + p];
            let b_row = &b[p * ldb..p * ldb + n];
            for (c_ij, &b_pj) in c_row.iter_mut().zip(b_row) {
                *c_ij = *c_ij + a_ip * b_pj;
            }
        }
    }
}
