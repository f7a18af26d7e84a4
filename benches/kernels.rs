//! Benchmarks for the single-element kernels on strided views.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use distratio::ratio::{cdist_ratio, pdist_ratio};
use distratio::{MatrixView, MatrixViewMut, StridedView, VectorWalk};
use rand::prelude::*;

fn random_vec(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn bench_pdist_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("pdist_ratio");
    let (m, n) = (32, 256);

    for d in [16, 64, 256] {
        let num = random_vec(d * m, 42);
        let den = random_vec(d * n, 43);

        group.throughput(Throughput::Elements((d * (d - 1) / 2) as u64));
        group.bench_with_input(BenchmarkId::new("row_major", d), &d, |bench, &d| {
            bench.iter(|| {
                pdist_ratio(
                    black_box(MatrixView::row_major(&num, d, m)),
                    black_box(MatrixView::row_major(&den, d, n)),
                )
            })
        });
        // Same points read column-major: every coordinate step jumps d elements.
        group.bench_with_input(BenchmarkId::new("column_major", d), &d, |bench, &d| {
            let num_cm = MatrixView::new(&num, 0, VectorWalk::new(d, 1), VectorWalk::new(m, d as isize));
            let den_cm = MatrixView::new(&den, 0, VectorWalk::new(d, 1), VectorWalk::new(n, d as isize));
            bench.iter(|| pdist_ratio(black_box(num_cm), black_box(den_cm)))
        });
    }

    group.finish();
}

fn bench_cdist_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("cdist_ratio");
    let (m, n) = (32, 256);

    for d in [16, 64, 256] {
        let nf = random_vec(d * m, 42);
        let nt = random_vec(d * m, 43);
        let df = random_vec(d * n, 44);
        let dt = random_vec(d * n, 45);

        group.throughput(Throughput::Elements((d * d) as u64));
        group.bench_with_input(BenchmarkId::new("cdist_ratio", d), &d, |bench, &d| {
            bench.iter(|| {
                cdist_ratio(
                    black_box(MatrixView::row_major(&nf, d, m)),
                    black_box(MatrixView::row_major(&nt, d, m)),
                    black_box(MatrixView::row_major(&df, d, n)),
                    black_box(MatrixView::row_major(&dt, d, n)),
                )
            })
        });
    }

    group.finish();
}

fn bench_matmul(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul");

    for size in [8, 32, 128] {
        let x = random_vec(size * size, 42);
        let y = random_vec(size * size, 43);
        let mut z = vec![0.0; size * size];

        group.throughput(Throughput::Elements((size * size * size) as u64));
        group.bench_with_input(BenchmarkId::new("square", size), &size, |bench, &size| {
            bench.iter(|| {
                let mut out = MatrixViewMut::row_major(&mut z, size, size);
                distratio::matmul::matmul(
                    black_box(MatrixView::row_major(&x, size, size)),
                    black_box(MatrixView::row_major(&y, size, size)),
                    &mut out,
                );
            })
        });
    }

    group.finish();
}

fn bench_norm(c: &mut Criterion) {
    let mut group = c.benchmark_group("norm");

    for dim in [128, 768, 1536] {
        let v = random_vec(2 * dim, 42);

        group.throughput(Throughput::Elements(dim as u64));
        group.bench_with_input(BenchmarkId::new("contiguous", dim), &dim, |bench, &dim| {
            let view = StridedView::contiguous(&v[..dim]);
            bench.iter(|| distratio::norm::norm(black_box(view)))
        });
        group.bench_with_input(BenchmarkId::new("stride_2", dim), &dim, |bench, &dim| {
            let view = StridedView::new(&v, 0, VectorWalk::new(dim, 2));
            bench.iter(|| distratio::norm::norm(black_box(view)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pdist_ratio, bench_cdist_ratio, bench_matmul, bench_norm);
criterion_main!(benches);
