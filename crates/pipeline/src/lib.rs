//! Ranking pipeline for semantic movie recommendations.
//!
//! This crate provides:
//! - MovieRecord, the opaque caller-supplied movie
//! - QueryEnhancer for turning a raw query into embedding input
//! - Cosine similarity with explicit handling of degenerate vectors
//! - Filter trait, FilterPipeline and the ranking stages
//! - RankingEngine tying scoring and ranking together
//!
//! ## Architecture
//! Everything here is pure and synchronous. Embeddings come in as plain
//! vectors; the caller owns the model.
//! 1. Each movie vector is scored against the query vector
//! 2. The best `pool_size` (10) are kept, highest first
//! 3. Scores at or below the floor (0.3) are dropped
//! 4. At most `max_results` (5) records are returned
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{QueryEnhancer, RankingEngine};
//!
//! let text = QueryEnhancer::default().enhance("space adventure");
//! // ... embed `text` and every movie description ...
//! let engine = RankingEngine::default();
//! let ranked = engine.rank_records(&query_vector, &movie_vectors, movies)?;
//! ```

pub mod error;
pub mod filter_pipeline;
pub mod filters;
pub mod query;
pub mod ranking;
pub mod similarity;
pub mod traits;
pub mod types;

// Re-export main types
pub use error::{RankingError, Result};
pub use filter_pipeline::FilterPipeline;
pub use query::{DEFAULT_QUERY_TEMPLATE, QueryEnhancer};
pub use ranking::{
    DEFAULT_MAX_RESULTS, DEFAULT_MIN_SIMILARITY, DEFAULT_POOL_SIZE, RankingEngine, RankingPolicy,
};
pub use similarity::{DEGENERATE_SCORE, cosine_similarity};
pub use traits::Filter;
pub use types::{Candidate, MovieRecord};
