//! Scoring and ranking of movies against a query embedding.
//!
//! The engine scores every movie, then runs the three ranking stages:
//! keep the top `pool_size` by similarity, drop anything at or below the
//! floor, cap the output at `max_results`.

use rayon::prelude::*;
use tracing::debug;

use crate::error::{RankingError, Result};
use crate::filter_pipeline::FilterPipeline;
use crate::filters::{MaxResultsFilter, MinimumSimilarityFilter, TopPoolFilter};
use crate::similarity::checked_cosine_similarity;
use crate::types::{Candidate, MovieRecord};

/// Number of best-scoring movies considered before the floor is applied
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Similarity a movie must strictly exceed to be returned
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.3;

/// Maximum number of movies returned
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Ranking parameters.
///
/// The service always runs [`RankingPolicy::default`]; the setters exist for
/// library callers and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingPolicy {
    pub pool_size: usize,
    pub min_similarity: f32,
    pub max_results: usize,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl RankingPolicy {
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Build the pool → floor → cap pipeline for this policy.
    pub fn build_pipeline(&self) -> FilterPipeline {
        FilterPipeline::new()
            .add_filter(TopPoolFilter::new(self.pool_size))
            .add_filter(MinimumSimilarityFilter::new(self.min_similarity))
            .add_filter(MaxResultsFilter::new(self.max_results))
    }
}

/// Scores movies against a query vector and ranks them.
///
/// Stateless between calls: the result depends only on the vectors passed
/// in and the policy.
pub struct RankingEngine {
    policy: RankingPolicy,
    pipeline: FilterPipeline,
}

impl RankingEngine {
    pub fn new(policy: RankingPolicy) -> Self {
        Self {
            pipeline: policy.build_pipeline(),
            policy,
        }
    }

    pub fn policy(&self) -> &RankingPolicy {
        &self.policy
    }

    /// Score every movie, keeping input order.
    ///
    /// `movie_vectors[i]` must be the embedding of `records[i]`.
    pub fn score(
        &self,
        query_vector: &[f32],
        movie_vectors: &[Vec<f32>],
        records: Vec<MovieRecord>,
    ) -> Result<Vec<Candidate>> {
        if movie_vectors.len() != records.len() {
            return Err(RankingError::CountMismatch {
                expected: records.len(),
                found: movie_vectors.len(),
            });
        }

        let scores: Vec<f32> = movie_vectors
            .par_iter()
            .enumerate()
            .map(|(position, vector)| checked_cosine_similarity(query_vector, vector, position))
            .collect::<Result<Vec<f32>>>()?;

        Ok(records
            .into_iter()
            .zip(scores)
            .enumerate()
            .map(|(position, (record, score))| Candidate::new(position, record, score))
            .collect())
    }

    /// Score and rank, returning the surviving candidates best first.
    pub fn rank(
        &self,
        query_vector: &[f32],
        movie_vectors: &[Vec<f32>],
        records: Vec<MovieRecord>,
    ) -> Result<Vec<Candidate>> {
        let candidates = self.score(query_vector, movie_vectors, records)?;
        let scored = candidates.len();
        let ranked = self.pipeline.apply(candidates)?;
        debug!("Ranked {} movies, {} returned", scored, ranked.len());
        Ok(ranked)
    }

    /// Like [`rank`](Self::rank) but returns only the records.
    pub fn rank_records(
        &self,
        query_vector: &[f32],
        movie_vectors: &[Vec<f32>],
        records: Vec<MovieRecord>,
    ) -> Result<Vec<MovieRecord>> {
        Ok(self
            .rank(query_vector, movie_vectors, records)?
            .into_iter()
            .map(|candidate| candidate.record)
            .collect())
    }
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new(RankingPolicy::default())
    }
}
