//! The FilterPipeline chains ranking stages.

use crate::error::Result;
use crate::traits::Filter;
use crate::types::Candidate;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(TopPoolFilter::new(10))
///     .add_filter(MinimumSimilarityFilter::new(0.3))
///     .add_filter(MaxResultsFilter::new(5));
///
/// let ranked = pipeline.apply(candidates)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the end of the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the stages, in application order.
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence, stopping at the first error.
    pub fn apply(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            let input_count = current.len();
            current = filter.apply(current)?;
            tracing::debug!(
                "Filter applied: {} (input count: {}, output count: {})",
                filter.name(),
                input_count,
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
