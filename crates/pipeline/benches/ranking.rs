//! Benchmarks for the ranking engine
//!
//! Run with: cargo bench --package pipeline
//!
//! Scores and ranks synthetic 768-dimensional embeddings, the size produced
//! by all-mpnet-base-v2.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pipeline::{MovieRecord, RankingEngine, cosine_similarity};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DIMS: usize = 768;

fn synthetic_vectors(count: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (0..DIMS).map(|_| rng.random_range(-0.5f32..0.5)).collect())
        .collect()
}

fn records(count: usize) -> Vec<MovieRecord> {
    (0..count)
        .map(|i| MovieRecord::with_description(format!("movie {}", i)).with_field("id", i as u64))
        .collect()
}

fn bench_cosine_similarity(c: &mut Criterion) {
    let vectors = synthetic_vectors(2, 7);

    c.bench_function("cosine_similarity_768", |b| {
        b.iter(|| black_box(cosine_similarity(black_box(&vectors[0]), black_box(&vectors[1]))))
    });
}

fn bench_rank(c: &mut Criterion) {
    let engine = RankingEngine::default();
    let query = synthetic_vectors(1, 1).remove(0);

    let mut group = c.benchmark_group("rank");
    for count in [20usize, 100, 1000] {
        let vectors = synthetic_vectors(count, 42);
        let movies = records(count);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let ranked = engine
                    .rank(black_box(&query), black_box(&vectors), movies.clone())
                    .unwrap();
                black_box(ranked)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cosine_similarity, bench_rank);
criterion_main!(benches);
