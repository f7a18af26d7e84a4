//! Benchmarks for batched dispatch through the binding layer.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use distratio::{matmul, norm, pdist_ratio, ArrayView, ArrayViewMut};
use rand::prelude::*;

fn random_vec(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Many small projections of one point set: the typical distortion workload.
fn bench_batched_pdist_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("gufunc_pdist_ratio");
    let (d, m, n) = (32, 8, 128);
    let original = random_vec(d * n, 7);

    for batch in [1, 16, 256] {
        let projected = random_vec(batch * d * m, 42);
        let (mut lo, mut hi) = (vec![0.0; batch], vec![0.0; batch]);

        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::new("broadcast_den", batch), &batch, |bench, &batch| {
            bench.iter(|| {
                pdist_ratio(
                    ArrayView::contiguous(black_box(&projected), &[batch, d, m]).unwrap(),
                    ArrayView::contiguous(black_box(&original), &[d, n]).unwrap(),
                    ArrayViewMut::contiguous(&mut lo, &[batch]).unwrap(),
                    ArrayViewMut::contiguous(&mut hi, &[batch]).unwrap(),
                )
                .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_batched_matmul(c: &mut Criterion) {
    let mut group = c.benchmark_group("gufunc_matmul");
    let size = 8;

    for outer in [1, 8, 64] {
        let x = random_vec(outer * 4 * size * size, 42);
        let y = random_vec(size * size, 43);
        let mut z = vec![0.0; outer * 4 * size * size];

        group.throughput(Throughput::Elements((outer * 4) as u64));
        group.bench_with_input(BenchmarkId::new("two_batch_dims", outer), &outer, |bench, &outer| {
            bench.iter(|| {
                matmul(
                    ArrayView::contiguous(black_box(&x), &[outer, 4, size, size]).unwrap(),
                    ArrayView::contiguous(black_box(&y), &[size, size]).unwrap(),
                    ArrayViewMut::contiguous(&mut z, &[outer, 4, size, size]).unwrap(),
                )
                .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_batched_norm(c: &mut Criterion) {
    let mut group = c.benchmark_group("gufunc_norm");
    let dim = 384;

    for rows in [16, 256, 4096] {
        let x = random_vec(rows * dim, 42);
        let mut r = vec![0.0; rows];

        group.throughput(Throughput::Elements((rows * dim) as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &rows, |bench, &rows| {
            bench.iter(|| {
                norm(
                    ArrayView::contiguous(black_box(&x), &[rows, dim]).unwrap(),
                    ArrayViewMut::contiguous(&mut r, &[rows]).unwrap(),
                )
                .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_batched_pdist_ratio, bench_batched_matmul, bench_batched_norm);
criterion_main!(benches);
