use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use scanslice_3d::{slicing, sort};

fn random_sweep(num_points: usize) -> Vec<Vec<f64>> {
    (0..num_points)
        .map(|_| {
            vec![
                rand::random::<f64>() * 100.0 - 50.0,
                rand::random::<f64>() * 100.0 - 50.0,
                rand::random::<f64>() * 4.0 - 2.0,
                rand::random::<f64>(),
            ]
        })
        .collect()
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_by_column");

    for num_points in [100, 1_000, 10_000].iter() {
        group.throughput(criterion::Throughput::Elements(*num_points as u64));
        let rows = random_sweep(*num_points);

        group.bench_with_input(
            BenchmarkId::new("merge_sort", num_points),
            &rows,
            |b, rows| {
                b.iter_batched(
                    || rows.clone(),
                    |mut rows| sort::sort_by_column(black_box(&mut rows), 2),
                    criterion::BatchSize::LargeInput,
                )
            },
        );

        group.bench_with_input(BenchmarkId::new("std_stable", num_points), &rows, |b, rows| {
            b.iter_batched(
                || rows.clone(),
                |mut rows| black_box(&mut rows).sort_by(|a, b| a[2].total_cmp(&b[2])),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_organize(c: &mut Criterion) {
    let mut group = c.benchmark_group("organize_points");
    let config = slicing::SlicerConfig::default();

    for num_points in [10_000, 100_000].iter() {
        group.throughput(criterion::Throughput::Elements(*num_points as u64));
        let points = random_sweep(*num_points);

        group.bench_with_input(
            BenchmarkId::new("sequential", num_points),
            &points,
            |b, points| {
                b.iter(|| slicing::organize_points(black_box(points.iter().cloned()), &config))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("parallel", num_points),
            &points,
            |b, points| {
                b.iter(|| slicing::par_organize_points(black_box(points.iter().cloned()), &config))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sort, bench_organize);
criterion_main!(benches);
