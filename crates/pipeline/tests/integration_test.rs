//! Integration tests for the ranking pipeline.
//!
//! These tests drive the RankingEngine with synthetic embeddings whose
//! cosine similarity to the query is known in advance.

use pipeline::{
    Candidate, MovieRecord, QueryEnhancer, RankingEngine, RankingPolicy, cosine_similarity,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

/// Query vector used throughout: the unit x axis.
fn query_vector() -> Vec<f32> {
    vec![1.0, 0.0]
}

/// A 2-d unit vector whose cosine similarity with the query is `score`.
fn vector_with_score(score: f32) -> Vec<f32> {
    vec![score, (1.0 - score * score).max(0.0).sqrt()]
}

fn movies(count: usize) -> Vec<MovieRecord> {
    (0..count)
        .map(|i| {
            MovieRecord::with_description(format!("plot of movie {}", i))
                .with_field("id", i as u64)
                .with_field("title", format!("Movie {}", i))
        })
        .collect()
}

fn ids(candidates: &[Candidate]) -> Vec<u64> {
    candidates
        .iter()
        .map(|c| c.record.get("id").and_then(|v| v.as_u64()).unwrap())
        .collect()
}

#[test]
fn test_empty_movie_list_returns_empty() {
    let engine = RankingEngine::default();
    let ranked = engine.rank(&query_vector(), &[], Vec::new()).unwrap();
    assert!(ranked.is_empty());
}

#[test]
fn test_only_movies_above_floor_are_returned() {
    // 15 movies, three of them clearly relevant and all inside the top 10.
    let mut scores = vec![0.1f32; 15];
    scores[4] = 0.72;
    scores[9] = 0.91;
    scores[13] = 0.45;
    scores[0] = 0.29;
    scores[1] = 0.2;

    let vectors: Vec<Vec<f32>> = scores.iter().map(|&s| vector_with_score(s)).collect();
    let engine = RankingEngine::default();
    let ranked = engine.rank(&query_vector(), &vectors, movies(15)).unwrap();

    assert_eq!(ids(&ranked), vec![9, 4, 13]);
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_eleventh_best_is_never_returned() {
    // Every movie clears the floor; ranks run from 0.99 down to 0.85.
    let scores: Vec<f32> = (0..15).map(|i| 0.99 - i as f32 * 0.01).collect();
    let vectors: Vec<Vec<f32>> = scores.iter().map(|&s| vector_with_score(s)).collect();

    let engine = RankingEngine::default();
    let ranked = engine.rank(&query_vector(), &vectors, movies(15)).unwrap();

    assert_eq!(ids(&ranked), vec![0, 1, 2, 3, 4]);
    assert!(!ids(&ranked).contains(&10));
}

#[test]
fn test_pool_limits_candidates_before_floor() {
    // With a cap larger than the pool, the pool is what bounds the output:
    // movie 10 clears the floor but is outside the top 10.
    let scores: Vec<f32> = (0..15).map(|i| 0.95 - i as f32 * 0.02).collect();
    let vectors: Vec<Vec<f32>> = scores.iter().map(|&s| vector_with_score(s)).collect();

    let engine = RankingEngine::new(RankingPolicy::default().with_max_results(20));
    let ranked = engine.rank(&query_vector(), &vectors, movies(15)).unwrap();

    assert_eq!(ranked.len(), 10);
    assert!(scores[10] > 0.3);
    assert!(!ids(&ranked).contains(&10));
}

#[test]
fn test_all_below_floor_returns_empty() {
    let scores = [0.29f32, 0.1, -0.4, 0.0, 0.25];
    let vectors: Vec<Vec<f32>> = scores.iter().map(|&s| vector_with_score(s)).collect();

    let engine = RankingEngine::default();
    let ranked = engine.rank(&query_vector(), &vectors, movies(5)).unwrap();
    assert!(ranked.is_empty());
}

#[test]
fn test_identical_embedding_ranks_first() {
    let query = vec![0.2, -0.4, 0.9, 0.1];
    let vectors = vec![
        vec![0.2, -0.1, 0.8, 0.3],
        query.clone(),
        vec![0.1, -0.4, 0.9, 0.0],
    ];

    let engine = RankingEngine::default();
    let ranked = engine.rank(&query, &vectors, movies(3)).unwrap();

    assert_eq!(ids(&ranked)[0], 1);
    assert!((ranked[0].score - 1.0).abs() < 1e-6);
}

#[test]
fn test_zero_vectors_are_excluded() {
    let vectors = vec![vec![0.0, 0.0], vector_with_score(0.8), vec![0.0, 0.0]];

    let engine = RankingEngine::default();
    let ranked = engine.rank(&query_vector(), &vectors, movies(3)).unwrap();
    assert_eq!(ids(&ranked), vec![1]);
}

#[test]
fn test_records_are_passed_through_verbatim() {
    let record: MovieRecord = serde_json::from_value(json!({
        "id": 157336,
        "title": "Interstellar",
        "description": "A crew travels through a wormhole to save humanity",
        "poster_path": "/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg",
        "vote_average": 8.4
    }))
    .unwrap();

    let engine = RankingEngine::default();
    let ranked = engine
        .rank_records(&query_vector(), &[vector_with_score(0.9)], vec![record.clone()])
        .unwrap();

    assert_eq!(ranked, vec![record.clone()]);
    assert_eq!(
        serde_json::to_value(&ranked).unwrap(),
        json!([serde_json::to_value(&record).unwrap()])
    );
}

#[test]
fn test_large_numbers_survive_ranking() {
    let input = r#"{"id":123456789012345678901234567890,"rating":7.10,"description":"x"}"#;
    let record: MovieRecord = serde_json::from_str(input).unwrap();

    let ranked = RankingEngine::default()
        .rank_records(&query_vector(), &[vector_with_score(0.9)], vec![record])
        .unwrap();

    assert_eq!(serde_json::to_string(&ranked).unwrap(), format!("[{}]", input));
}

#[test]
fn test_ranking_properties_hold_for_random_inputs() {
    let mut rng = StdRng::seed_from_u64(0x9e3779b97f4a7c15);
    let mut next = move || rng.random_range(-1.0f32..1.0);

    let engine = RankingEngine::default();
    let policy = *engine.policy();

    for round in 0..200 {
        let dims = 3 + round % 6;
        let count = round % 25;
        let query: Vec<f32> = (0..dims).map(|_| next()).collect();
        let vectors: Vec<Vec<f32>> = (0..count)
            .map(|_| (0..dims).map(|_| next() + 0.3).collect())
            .collect();

        let ranked = engine.rank(&query, &vectors, movies(count)).unwrap();

        assert!(ranked.len() <= policy.max_results);

        let mut seen = std::collections::HashSet::new();
        for candidate in &ranked {
            let recomputed = cosine_similarity(&query, &vectors[candidate.position]);
            assert!(recomputed > policy.min_similarity);
            assert!((recomputed - candidate.score).abs() < 1e-6);
            assert!(seen.insert(candidate.position), "duplicate result");
        }

        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));

        let best = vectors
            .iter()
            .map(|v| cosine_similarity(&query, v))
            .fold(f32::NEG_INFINITY, f32::max);
        match ranked.first() {
            Some(first) => assert_eq!(first.score, best),
            None => assert!(best <= policy.min_similarity),
        }
    }
}

#[test]
fn test_enhanced_query_is_what_gets_embedded() {
    let enhancer = QueryEnhancer::default();
    assert_eq!(
        enhancer.enhance("space adventure"),
        "I am looking for a movie that is: space adventure"
    );
}
