//! Caps the number of results.

use crate::error::Result;
use crate::traits::Filter;
use crate::types::Candidate;

/// Keeps at most `max_results` candidates from the front of the list.
pub struct MaxResultsFilter {
    max_results: usize,
}

impl MaxResultsFilter {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }
}

impl Filter for MaxResultsFilter {
    fn name(&self) -> &str {
        "MaxResultsFilter"
    }

    fn apply(&self, mut candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        candidates.truncate(self.max_results);
        Ok(candidates)
    }
}
