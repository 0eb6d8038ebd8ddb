//! Criterion benchmarks: block size and threading for the in-place products,
//! plus stacking entities into a matrix.

use blockmat::blocked::inplace_left::dot_inplace_left;
use blockmat::blocked::inplace_right::dot_inplace_right;
use blockmat::threaded::inplace_mt::dot_inplace_left_mt;
use blockmat::{Materialize, Matrix, StackOptions, as_matrix, from_matrix};
use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const N_BIG: usize = 20_000;
const K: usize = 128;
const N_SMALL: usize = 32;

fn patterned(rows: usize, cols: usize) -> Matrix {
    let data = (0..rows * cols).map(|i| (i % 100) as f64).collect();
    Matrix::from_vec(rows, cols, data).unwrap()
}

fn bench_block_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot_inplace_left");
    let a = patterned(N_BIG, K);
    let b = patterned(K, N_SMALL);

    for block_size in [1, 64, 1000, N_BIG] {
        group.bench_with_input(
            BenchmarkId::new("block", block_size),
            &block_size,
            |bench, &block_size| {
                bench.iter_batched_ref(
                    || a.clone(),
                    |a| {
                        dot_inplace_left(a, &b, block_size).unwrap();
                    },
                    BatchSize::LargeInput,
                )
            },
        );
    }

    for threads in [2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("threads", threads),
            &threads,
            |bench, &threads| {
                bench.iter_batched_ref(
                    || a.clone(),
                    |a| {
                        dot_inplace_left_mt(a, &b, 1000, threads).unwrap();
                    },
                    BatchSize::LargeInput,
                )
            },
        );
    }
    group.finish();
}

fn bench_right(c: &mut Criterion) {
    let a = patterned(N_SMALL, K);
    let b = patterned(K, N_BIG);

    c.bench_function("dot_inplace_right/block/1000", |bench| {
        bench.iter_batched_ref(
            || b.clone(),
            |b| {
                dot_inplace_right(&a, b, 1000).unwrap();
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_round_trip(c: &mut Criterion) {
    let samples: Vec<Vec<f64>> = (0..10_000)
        .map(|i| (0..68).map(|j| (i * j % 97) as f64).collect())
        .collect();

    c.bench_function("as_matrix/10000x68", |bench| {
        bench.iter(|| as_matrix(black_box(&samples), StackOptions::new()).unwrap())
    });

    let matrix = as_matrix(&samples, StackOptions::new()).unwrap().matrix;
    c.bench_function("from_matrix/lazy/10000x68", |bench| {
        bench.iter(|| {
            from_matrix(black_box(&matrix), &samples[0], Materialize::Lazy)
                .map(|v| v.len())
                .sum::<usize>()
        })
    });
}

criterion_group!(benches, bench_block_size, bench_right, bench_round_trip);
criterion_main!(benches);
