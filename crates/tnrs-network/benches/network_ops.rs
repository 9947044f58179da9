//! Performance benchmarks for compressed tensor networks
//!
//! Covers compression of dense arrays, rounding, elementwise arithmetic on
//! compressed operands, indexing and contraction-based metrics.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
use scirs2_core::random::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;
use tnrs_network::{KeyEntry, TensorNetwork};

fn random_dense(shape: &[usize], seed: u64) -> ArrayD<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    ArrayD::from_shape_fn(IxDyn(shape), |_| rng.random_range(0.0..1.0))
}

/// Low-rank network: a dense array compressed and rounded to `rank`.
fn low_rank_network(size: usize, ndim: usize, rank: usize, seed: u64) -> TensorNetwork<f64> {
    let dense = random_dense(&vec![size; ndim], seed);
    let mut t = TensorNetwork::from_dense(&dense).expect("dense array should compress");
    t.set_ranks_tt(&vec![rank; ndim - 1])
        .expect("rank limits should apply");
    t
}

// ============================================================================
// Compression and rounding
// ============================================================================

fn bench_from_dense(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_dense");

    for &(size, ndim) in &[(8, 3), (16, 3), (8, 4), (6, 5)] {
        let dense = random_dense(&vec![size; ndim], 1);
        group.throughput(Throughput::Elements(dense.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}^{}", size, ndim)),
            &dense,
            |b, dense| b.iter(|| black_box(TensorNetwork::from_dense(black_box(dense)))),
        );
    }

    group.finish();
}

fn bench_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("round");
    group.sample_size(20);

    for &(size, ndim) in &[(8, 3), (16, 3), (8, 4)] {
        let t = TensorNetwork::from_dense(&random_dense(&vec![size; ndim], 2))
            .expect("dense array should compress");
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}^{}_eps1e-2", size, ndim)),
            &t,
            |b, t| {
                b.iter(|| {
                    let mut rounded = t.clone();
                    black_box(rounded.round(black_box(1e-2)))
                })
            },
        );
    }

    group.finish();
}

fn bench_round_tt_vs_tucker(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_tt_vs_tucker");
    group.sample_size(20);

    let t = TensorNetwork::from_dense(&random_dense(&[12, 12, 12], 3))
        .expect("dense array should compress");

    group.bench_function("round_tt", |b| {
        b.iter(|| {
            let mut rounded = t.clone();
            black_box(rounded.round_tt(1e-2, None))
        })
    });
    group.bench_function("round_tucker", |b| {
        b.iter(|| {
            let mut rounded = t.clone();
            black_box(rounded.round_tucker(1e-2, None))
        })
    });

    group.finish();
}

// ============================================================================
// Arithmetic
// ============================================================================

fn bench_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic");

    for &rank in &[2, 4, 8] {
        let a = low_rank_network(16, 4, rank, 10);
        let b = low_rank_network(16, 4, rank, 11);

        group.bench_with_input(BenchmarkId::new("add", rank), &(&a, &b), |bench, (a, b)| {
            bench.iter(|| black_box(*a + *b))
        });
        group.bench_with_input(BenchmarkId::new("mul", rank), &(&a, &b), |bench, (a, b)| {
            bench.iter(|| black_box(*a * *b))
        });
        group.bench_with_input(
            BenchmarkId::new("add_then_round", rank),
            &(&a, &b),
            |bench, (a, b)| {
                bench.iter(|| {
                    let mut sum = (*a + *b).expect("shapes match");
                    black_box(sum.round(1e-8))
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Indexing and metrics
// ============================================================================

fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");
    let t = low_rank_network(16, 5, 4, 20);

    group.bench_function("single_entry", |b| {
        let key: Vec<KeyEntry> = vec![3.into(), 7.into(), 1.into(), 15.into(), 0.into()];
        b.iter(|| black_box(t.index(black_box(&key))))
    });
    group.bench_function("slab", |b| {
        let key: Vec<KeyEntry> = vec![KeyEntry::Ellipsis, 5.into(), (2..10).into()];
        b.iter(|| black_box(t.index(black_box(&key))))
    });
    group.bench_function("fancy_64_points", |b| {
        let key: Vec<KeyEntry> = (0..5)
            .map(|mode| {
                KeyEntry::Indices((0..64).map(|p| ((p * (mode + 3)) % 16) as isize).collect())
            })
            .collect();
        b.iter(|| black_box(t.index(black_box(&key))))
    });

    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");

    for &rank in &[2, 8] {
        let a = low_rank_network(16, 5, rank, 30);
        let b = low_rank_network(16, 5, rank, 31);
        group.bench_with_input(BenchmarkId::new("dot", rank), &(&a, &b), |bench, (a, b)| {
            bench.iter(|| black_box(a.dot(b)))
        });
        group.bench_with_input(BenchmarkId::new("norm", rank), &a, |bench, a| {
            bench.iter(|| black_box(a.norm()))
        });
    }

    group.finish();
}

fn bench_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize");

    for &ndim in &[3, 4, 5] {
        let t = low_rank_network(8, ndim, 4, 40);
        group.throughput(Throughput::Elements(8u64.pow(ndim as u32)));
        group.bench_with_input(BenchmarkId::from_parameter(ndim), &t, |b, t| {
            b.iter(|| black_box(t.materialize()))
        });
    }

    group.finish();
}

criterion_group!(
    compression_benches,
    bench_from_dense,
    bench_round,
    bench_round_tt_vs_tucker,
);

criterion_group!(arithmetic_benches, bench_arithmetic);

criterion_group!(access_benches, bench_indexing, bench_metrics, bench_materialize);

criterion_main!(compression_benches, arithmetic_benches, access_benches);
