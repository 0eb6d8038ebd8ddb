use blockmat::blocked::inplace_left::dot_inplace_left;
use blockmat::blocked::inplace_right::dot_inplace_right;
use blockmat::threaded::choose_thread_count;
use blockmat::threaded::inplace_mt::{dot_inplace_left_mt, dot_inplace_right_mt};
use blockmat::{DotConfig, Error, Matrix};

fn assert_matrices_equal(expected: &Matrix, actual: &Matrix, name: &str) {
    assert_eq!(expected.shape(), actual.shape(), "{}: shape mismatch", name);
    let (e, a) = (expected.as_slice(), actual.as_slice());
    for i in 0..e.len() {
        assert!(
            (e[i] - a[i]).abs() < 1e-8,
            "{}: mismatch at index {}: expected {}, got {}",
            name,
            i,
            e[i],
            a[i]
        );
    }
}

fn patterned(rows: usize, cols: usize, modulus: usize) -> Matrix {
    let data = (0..rows * cols).map(|i| (i % modulus) as f64 - 3.0).collect();
    Matrix::from_vec(rows, cols, data).unwrap()
}

// ============================================================
// Worked example
// ============================================================

#[test]
fn test_left_worked_example() {
    let mut a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
    let b = Matrix::from_rows(&[[1.0], [1.0]]).unwrap();

    let c = dot_inplace_left(&mut a, &b, 1).unwrap().to_matrix();

    assert_eq!(c, Matrix::from_rows(&[[3.0], [7.0], [11.0]]).unwrap());

    // First column of A now holds the result, second column is untouched
    assert_eq!(a.as_slice(), &[3.0, 2.0, 7.0, 4.0, 11.0, 6.0]);
}

#[test]
fn test_right_worked_example() {
    let a = Matrix::from_rows(&[[1.0, 1.0]]).unwrap();
    let mut b = Matrix::from_rows(&[[1.0, 3.0, 5.0], [2.0, 4.0, 6.0]]).unwrap();

    let c = dot_inplace_right(&a, &mut b, 1).unwrap().to_matrix();

    assert_eq!(c, Matrix::from_rows(&[[3.0, 7.0, 11.0]]).unwrap());
    assert_eq!(b.row(0), &[3.0, 7.0, 11.0]);
    assert_eq!(b.row(1), &[2.0, 4.0, 6.0]);
}

// ============================================================
// Agreement with the out-of-place product
// ============================================================

#[test]
fn test_left_matches_matmul_every_block_size() {
    let test_sizes = [(1, 1, 1), (7, 3, 2), (13, 5, 5), (20, 8, 3), (33, 6, 1)];

    for (n_big, k, n_small) in test_sizes {
        let a = patterned(n_big, k, 7);
        let b = patterned(k, n_small, 5);
        let expected = a.matmul(&b).unwrap();

        for block_size in 1..=n_big + 1 {
            let mut a_work = a.clone();
            let c = dot_inplace_left(&mut a_work, &b, block_size)
                .unwrap()
                .to_matrix();
            assert_matrices_equal(
                &expected,
                &c,
                &format!("left {}x{}x{} block {}", n_big, k, n_small, block_size),
            );
        }
    }
}

#[test]
fn test_right_matches_matmul_every_block_size() {
    let test_sizes = [(1, 1, 1), (7, 3, 2), (13, 5, 5), (20, 8, 3), (33, 6, 1)];

    for (n_big, k, n_small) in test_sizes {
        let a = patterned(n_small, k, 5);
        let b = patterned(k, n_big, 7);
        let expected = a.matmul(&b).unwrap();

        for block_size in 1..=n_big + 1 {
            let mut b_work = b.clone();
            let c = dot_inplace_right(&a, &mut b_work, block_size)
                .unwrap()
                .to_matrix();
            assert_matrices_equal(
                &expected,
                &c,
                &format!("right {}x{}x{} block {}", n_big, k, n_small, block_size),
            );
        }
    }
}

#[test]
fn test_left_and_right_agree_via_transpose() {
    let a = patterned(17, 6, 9);
    let b = patterned(6, 4, 4);

    let mut a_work = a.clone();
    let left = dot_inplace_left(&mut a_work, &b, 5).unwrap().to_matrix();

    let bt = b.transpose();
    let mut at = a.transpose();
    let right = dot_inplace_right(&bt, &mut at, 5).unwrap().to_matrix();

    assert_matrices_equal(&left, &right.transpose(), "transpose agreement");
}

#[test]
fn test_block_size_one_equals_single_block() {
    let a = patterned(50, 10, 11);
    let b = patterned(10, 7, 3);

    let mut a1 = a.clone();
    let mut a2 = a.clone();
    let one = dot_inplace_left(&mut a1, &b, 1).unwrap().to_matrix();
    let all = dot_inplace_left(&mut a2, &b, usize::MAX).unwrap().to_matrix();

    assert_eq!(one, all);
    assert_eq!(a1, a2);
}

#[test]
fn test_square_small_operand() {
    // n_small == k: the whole of A is overwritten
    let a = patterned(9, 4, 6);
    let b = patterned(4, 4, 5);
    let expected = a.matmul(&b).unwrap();

    let mut a_work = a.clone();
    dot_inplace_left(&mut a_work, &b, 2).unwrap();

    assert_matrices_equal(&expected, &a_work, "square small operand");
}

#[test]
fn test_view_shape_and_indexing() {
    let mut a = patterned(6, 5, 4);
    let b = patterned(5, 2, 3);
    let expected = a.matmul(&b).unwrap();

    let c = dot_inplace_left(&mut a, &b, 4).unwrap();

    assert_eq!(c.shape(), (6, 2));
    for r in 0..6 {
        assert_eq!(c.row(r), expected.row(r));
        for col in 0..2 {
            assert_eq!(c[(r, col)], expected[(r, col)]);
        }
    }
    assert!(c == expected);
}

#[test]
fn test_f32_operands() {
    let mut a = Matrix::<f32>::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    let b = Matrix::<f32>::from_rows(&[[2.0], [0.5]]).unwrap();

    let c = dot_inplace_left(&mut a, &b, 1).unwrap();

    assert_eq!(c.to_matrix().into_vec(), vec![3.0f32, 8.0]);
}

// ============================================================
// Degenerate shapes
// ============================================================

#[test]
fn test_empty_big_dimension() {
    let mut a = Matrix::zeros(0, 3);
    let b = patterned(3, 2, 5);

    let c = dot_inplace_left(&mut a, &b, 10).unwrap();
    assert_eq!(c.shape(), (0, 2));

    let small = patterned(2, 3, 5);
    let mut b_big = Matrix::zeros(3, 0);
    let c = dot_inplace_right(&small, &mut b_big, 10).unwrap();
    assert_eq!(c.shape(), (2, 0));
}

#[test]
fn test_zero_width_result_leaves_operand_alone() {
    let mut a = patterned(4, 3, 5);
    let before = a.clone();
    let b = Matrix::zeros(3, 0);

    let c = dot_inplace_left(&mut a, &b, 2).unwrap();

    assert_eq!(c.shape(), (4, 0));
    assert_eq!(a, before);
}

// ============================================================
// Shape errors
// ============================================================

#[test]
fn test_inner_dimension_mismatch() {
    let mut a = Matrix::<f64>::zeros(4, 3);
    let b = Matrix::zeros(5, 2);

    let err = dot_inplace_left(&mut a, &b, 1000).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch(_)), "{err}");

    let mut b = Matrix::zeros(5, 2);
    let err = dot_inplace_right(&a, &mut b, 1000).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch(_)), "{err}");
}

#[test]
fn test_left_result_too_wide() {
    let mut a = patterned(4, 3, 5);
    let before = a.clone();
    let b = Matrix::zeros(3, 5);

    let err = dot_inplace_left(&mut a, &b, 1000).unwrap_err();

    assert!(matches!(err, Error::ShapeMismatch(_)));
    assert!(err.to_string().contains("inplace left"), "{err}");
    assert_eq!(a, before, "A must be untouched on error");
}

#[test]
fn test_right_result_too_tall() {
    let a = Matrix::zeros(5, 3);
    let mut b = patterned(3, 4, 5);
    let before = b.clone();

    let err = dot_inplace_right(&a, &mut b, 1000).unwrap_err();

    assert!(matches!(err, Error::ShapeMismatch(_)));
    assert!(err.to_string().contains("inplace right"), "{err}");
    assert_eq!(b, before, "B must be untouched on error");
}

#[test]
fn test_zero_block_size_rejected() {
    let mut a = patterned(4, 3, 5);
    let b = patterned(3, 2, 5);

    assert!(matches!(
        dot_inplace_left(&mut a, &b, 0),
        Err(Error::InvalidBlockSize)
    ));
    assert!(matches!(
        DotConfig::default().with_block_size(0).validate(),
        Err(Error::InvalidBlockSize)
    ));
}

#[test]
fn test_overflowing_shape_rejected() {
    // rows * cols wraps to 0 in release builds
    let rows = 1usize << (usize::BITS - 1);
    let err = Matrix::<f64>::from_vec(rows, 2, Vec::new()).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch(_)), "{err}");
    assert!(err.to_string().contains("overflows"), "{err}");

    assert!(matches!(
        Matrix::<f64>::try_zeros(rows, 2),
        Err(Error::ShapeMismatch(_))
    ));
}

#[test]
#[should_panic(expected = "overflows usize")]
fn test_zeros_panics_on_overflowing_shape() {
    let _ = Matrix::<f64>::zeros(usize::MAX, 2);
}

#[test]
fn test_from_vec_rejects_wrong_length() {
    assert!(matches!(
        Matrix::from_vec(2, 3, vec![0.0; 5]),
        Err(Error::ShapeMismatch(_))
    ));
    assert!(matches!(
        Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]),
        Err(Error::ShapeMismatch(_))
    ));
}

// ============================================================
// Multi-threaded tests
// ============================================================

#[test]
fn test_left_mt_matches_single_threaded() {
    let a = patterned(4000, 64, 13);
    let b = patterned(64, 32, 7);

    let mut a_st = a.clone();
    let mut a_mt = a.clone();
    let st = dot_inplace_left(&mut a_st, &b, 100).unwrap().to_matrix();
    let mt = dot_inplace_left_mt(&mut a_mt, &b, 100, 4).unwrap().to_matrix();

    assert_matrices_equal(&st, &mt, "left mt");
    assert_eq!(a_st, a_mt);
}

#[test]
fn test_right_mt_matches_single_threaded() {
    let a = patterned(32, 64, 7);
    let b = patterned(64, 4000, 13);

    let mut b_st = b.clone();
    let mut b_mt = b.clone();
    let st = dot_inplace_right(&a, &mut b_st, 333).unwrap().to_matrix();
    let mt = dot_inplace_right_mt(&a, &mut b_mt, 333, 4)
        .unwrap()
        .to_matrix();

    assert_matrices_equal(&st, &mt, "right mt");
    assert_eq!(b_st, b_mt);
}

#[test]
fn test_mt_small_product_runs_inline() {
    let mut a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
    let b = Matrix::from_rows(&[[1.0], [1.0]]).unwrap();

    let c = dot_inplace_left_mt(&mut a, &b, 1, 8).unwrap();

    assert_eq!(c.to_matrix().into_vec(), vec![3.0, 7.0, 11.0]);
}

#[test]
fn test_mt_shape_errors() {
    let mut a = Matrix::<f64>::zeros(4, 3);
    let b = Matrix::zeros(3, 5);
    assert!(matches!(
        dot_inplace_left_mt(&mut a, &b, 10, 4),
        Err(Error::ShapeMismatch(_))
    ));
}

#[test]
fn test_config_dispatch() {
    let a = patterned(3000, 48, 9);
    let b = patterned(48, 24, 5);
    let expected_left = a.matmul(&b).unwrap();

    let a_small = patterned(24, 48, 5);
    let b_big = patterned(48, 3000, 9);
    let expected_right = a_small.matmul(&b_big).unwrap();

    for config in [
        DotConfig::default(),
        DotConfig::default().with_block_size(7),
        DotConfig::default().with_block_size(256).with_threads(4),
    ] {
        let mut a_work = a.clone();
        let c = config.dot_left(&mut a_work, &b).unwrap().to_matrix();
        assert_matrices_equal(&expected_left, &c, &format!("left {:?}", config));

        let mut b_work = b_big.clone();
        let c = config.dot_right(&a_small, &mut b_work).unwrap().to_matrix();
        assert_matrices_equal(&expected_right, &c, &format!("right {:?}", config));
    }
}

#[test]
fn test_mt_repeated_calls_and_large_budgets() {
    let a = patterned(4000, 64, 13);
    let b = patterned(64, 32, 7);
    let expected = a.matmul(&b).unwrap();

    // Budgets below, at and above the global pool size
    let global = rayon::current_num_threads();
    for threads in [2, global, global + 3, 2, global + 3] {
        let mut a_work = a.clone();
        let c = dot_inplace_left_mt(&mut a_work, &b, 100, threads)
            .unwrap()
            .to_matrix();
        assert_matrices_equal(&expected, &c, &format!("left {} threads", threads));

        let at = a.transpose();
        let mut b_work = at.clone();
        let c = dot_inplace_right_mt(&b.transpose(), &mut b_work, 100, threads)
            .unwrap()
            .to_matrix();
        assert_matrices_equal(
            &expected.transpose(),
            &c,
            &format!("right {} threads", threads),
        );
    }
}

#[test]
fn test_choose_thread_count() {
    // Tiny products stay on one thread
    assert_eq!(choose_thread_count(10, 10, 10, 8, 100), 1);
    // Medium products use two
    assert_eq!(choose_thread_count(1000, 10, 100, 8, 100), 2);
    // Large products use the budget, capped by available work
    assert_eq!(choose_thread_count(10_000, 64, 64, 8, 100), 8);
    assert_eq!(choose_thread_count(10_000, 64, 64, 8, 3), 3);
    assert_eq!(choose_thread_count(10_000, 64, 64, 0, 100), 1);
}
