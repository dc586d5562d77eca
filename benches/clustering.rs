use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use segmenter::cluster::{initialize, normalize, Kmeans};
use segmenter::Record;

fn customers(n: usize, seed: u64) -> Vec<Record<usize>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|id| {
            Record::new(
                id,
                rng.random_range(18.0..80.0),
                rng.random_range(15_000.0..150_000.0),
                rng.random_range(100.0..6_000.0),
            )
        })
        .collect()
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");

    let data = customers(5_000, 42);
    let points = normalize(&data);

    group.bench_function("normalize_n5000", |b| {
        b.iter(|| normalize(black_box(&data)))
    });

    group.bench_function("kmeans_pp_init_n5000_k5", |b| {
        b.iter(|| initialize(black_box(&points), 5, 42).unwrap())
    });

    group.bench_function("fit_n5000_k5", |b| {
        b.iter(|| {
            let model = Kmeans::new(5).with_max_iter(20).with_seed(42);
            model.fit(black_box(&data)).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_kmeans);
criterion_main!(benches);
