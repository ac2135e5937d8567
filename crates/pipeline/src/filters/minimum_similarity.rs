//! Filter to enforce the similarity floor.
//!
//! Removes candidates whose similarity is not strictly above the floor,
//! keeping the relative order of the survivors.

use crate::error::Result;
use crate::traits::Filter;
use crate::types::Candidate;

/// Keeps candidates with `score > min_similarity`.
///
/// A score exactly equal to the floor is dropped, as are degenerate scores.
pub struct MinimumSimilarityFilter {
    min_similarity: f32,
}

impl MinimumSimilarityFilter {
    pub fn new(min_similarity: f32) -> Self {
        Self { min_similarity }
    }
}

impl Filter for MinimumSimilarityFilter {
    fn name(&self) -> &str {
        "MinimumSimilarityFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| candidate.score > self.min_similarity)
            .collect();
        Ok(filtered)
    }
}
