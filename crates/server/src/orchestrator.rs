//! # Recommendation Orchestrator
//!
//! Coordinates one recommendation request:
//! 1. Enhance the raw query with the configured template
//! 2. Embed the enhanced query and every movie description in parallel
//! 3. Rank the movies against the query on the blocking pool
//! 4. Return the surviving records, best first

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, instrument};

use ml_client::{Embedder, MLClientError, validate_embeddings};
use pipeline::{Candidate, MovieRecord, QueryEnhancer, RankingEngine, RankingError};

/// Why a recommendation request failed
#[derive(Error, Debug)]
pub enum RecommendError {
    #[error("Embedding failed: {0}")]
    Embedding(#[from] MLClientError),

    #[error("Ranking failed: {0}")]
    Ranking(#[from] RankingError),

    #[error("Ranking task failed: {0}")]
    Task(String),
}

/// Main orchestrator that turns a query plus movies into recommendations
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    embedder: Arc<dyn Embedder>,
    enhancer: QueryEnhancer,
    engine: Arc<RankingEngine>,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator with the default ranking policy
    pub fn new(embedder: Arc<dyn Embedder>, enhancer: QueryEnhancer) -> Self {
        Self::with_engine(embedder, enhancer, RankingEngine::default())
    }

    pub fn with_engine(
        embedder: Arc<dyn Embedder>,
        enhancer: QueryEnhancer,
        engine: RankingEngine,
    ) -> Self {
        Self {
            embedder,
            enhancer,
            engine: Arc::new(engine),
        }
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Main entry point: the movies most similar to `query`, best first.
    ///
    /// Records come back exactly as supplied. An empty movie list returns
    /// an empty result without contacting the embedding service.
    pub async fn get_recommendations(
        &self,
        query: &str,
        movies: Vec<MovieRecord>,
    ) -> Result<Vec<MovieRecord>, RecommendError> {
        Ok(self
            .get_ranked(query, movies)
            .await?
            .into_iter()
            .map(|candidate| candidate.record)
            .collect())
    }

    /// Like [`get_recommendations`](Self::get_recommendations) but keeps
    /// each record's score and input position.
    #[instrument(skip(self, movies), fields(movies = movies.len()))]
    pub async fn get_ranked(
        &self,
        query: &str,
        movies: Vec<MovieRecord>,
    ) -> Result<Vec<Candidate>, RecommendError> {
        if movies.is_empty() {
            debug!("No movies supplied, skipping embedding");
            return Ok(Vec::new());
        }

        let start_time = Instant::now();

        let (query_vector, movie_vectors) = self.embed(query, &movies).await?;
        let embed_elapsed = start_time.elapsed();
        debug!(
            "Embedded query and {} descriptions in {:.2?}",
            movie_vectors.len(),
            embed_elapsed
        );

        let ranked = self.rank(query_vector, movie_vectors, movies).await?;

        info!(
            "Returned {} recommendations in {:.2?} (embedding {:.2?})",
            ranked.len(),
            start_time.elapsed(),
            embed_elapsed
        );
        Ok(ranked)
    }

    /// Embed the enhanced query and all descriptions concurrently
    async fn embed(
        &self,
        query: &str,
        movies: &[MovieRecord],
    ) -> Result<(Vec<f32>, Vec<Vec<f32>>), RecommendError> {
        let enhanced = self.enhancer.enhance(query);
        let descriptions: Vec<String> = movies
            .iter()
            .map(|movie| movie.description().to_string())
            .collect();

        let (query_result, movies_result) = tokio::join!(
            self.embedder.encode_one(&enhanced),
            self.embedder.encode(&descriptions)
        );

        let query_vector = query_result?;
        let movie_vectors = movies_result?;
        validate_embeddings(&movie_vectors, movies.len())?;

        Ok((query_vector, movie_vectors))
    }

    /// Rank on the blocking pool, scoring is CPU-bound
    async fn rank(
        &self,
        query_vector: Vec<f32>,
        movie_vectors: Vec<Vec<f32>>,
        movies: Vec<MovieRecord>,
    ) -> Result<Vec<Candidate>, RecommendError> {
        let engine = self.engine.clone();
        let ranked = tokio::task::spawn_blocking(move || {
            engine.rank(&query_vector, &movie_vectors, movies)
        })
        .await
        .map_err(|e| RecommendError::Task(e.to_string()))??;

        Ok(ranked)
    }
}
