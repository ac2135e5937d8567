//! Core traits for the ranking pipeline.
//!
//! This module defines the Filter trait that lets each ranking stage
//! (pool selection, similarity floor, output cap) be composed in order.

use crate::error::Result;
use crate::types::Candidate;

/// A single stage of the ranking pipeline.
///
/// Filters take ownership of the candidates and return the survivors. A
/// stage may reorder as well as drop; the order it returns is the order the
/// next stage sees.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of scored candidates.
    fn apply(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>>;
}
