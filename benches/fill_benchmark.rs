use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndhist::prelude::*;
use rand::prelude::*;
use rand_distr::Normal;

/// Generate `n` points of dimension `dim` from a standard normal
fn generate_points(n: usize, dim: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    (0..n)
        .map(|_| (0..dim).map(|_| normal.sample(&mut rng)).collect())
        .collect()
}

fn bench_fill_1d(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_1d");
    for &bins in &[10usize, 100, 10_000] {
        let xs: Vec<f64> = generate_points(10_000, 1, 42).into_iter().map(|p| p[0]).collect();
        group.throughput(Throughput::Elements(xs.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(bins), &xs, |b, xs| {
            b.iter(|| {
                let mut h = Hist1D::new(bins, -4.0, 4.0, "").unwrap();
                for &x in xs {
                    h.fill(black_box(x));
                }
                h
            })
        });
    }
    group.finish();
}

fn bench_fill_nd(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_pos");
    for &dim in &[1usize, 2, 3, 4] {
        let points = generate_points(10_000, dim, 7);
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(dim), &points, |b, points| {
            b.iter(|| {
                let mut h =
                    HistND::new(dim, &vec![-4.0; dim], &vec![4.0; dim], &vec![20; dim], "").unwrap();
                for p in points {
                    h.fill_pos(black_box(p)).unwrap();
                }
                h
            })
        });
    }
    group.finish();
}

fn bench_profile_fill(c: &mut Criterion) {
    let points = generate_points(10_000, 2, 3);
    c.bench_function("profile_fill_1d", |b| {
        b.iter(|| {
            let mut p = Profile1D::new(50, -4.0, 4.0, ValueRange::new(-3.0, 3.0), "").unwrap();
            for point in &points {
                p.fill(black_box(point[0]), black_box(point[1]));
            }
            p
        })
    });
}

#[cfg(feature = "parallel")]
fn bench_par_fill(c: &mut Criterion) {
    let points = generate_points(200_000, 3, 9);
    let template = HistND::new(3, &[-4.0; 3], &[4.0; 3], &[20; 3], "").unwrap();
    let mut group = c.benchmark_group("par_fill");
    group.sample_size(20);
    group.bench_function("sequential", |b| {
        b.iter(|| {
            let mut h = template.empty_like();
            for p in &points {
                h.fill_pos(p).unwrap();
            }
            h
        })
    });
    group.bench_function("parallel", |b| {
        b.iter(|| {
            let mut h = template.empty_like();
            h.par_fill_pos(&points, None).unwrap();
            h
        })
    });
    group.finish();
}

#[cfg(not(feature = "parallel"))]
fn bench_par_fill(_c: &mut Criterion) {}

criterion_group!(
    benches,
    bench_fill_1d,
    bench_fill_nd,
    bench_profile_fill,
    bench_par_fill
);
criterion_main!(benches);
