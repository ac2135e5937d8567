//! Error types for the ranking pipeline.

use thiserror::Error;

/// Errors that can occur while scoring and ranking candidates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankingError {
    /// Query vector and a movie vector do not have the same length
    #[error("Embedding dimension mismatch: query has {expected} dimensions, movie {position} has {found}")]
    DimensionMismatch {
        position: usize,
        expected: usize,
        found: usize,
    },

    /// Number of movie vectors does not match the number of movie records
    #[error("Expected {expected} movie embeddings but got {found}")]
    CountMismatch { expected: usize, found: usize },

    /// Query template has no `{query}` placeholder
    #[error("Invalid query template {0:?}: missing {{query}} placeholder")]
    InvalidTemplate(String),

    /// A movie record failed validation
    #[error("Invalid movie record: {0}")]
    InvalidRecord(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RankingError>;
