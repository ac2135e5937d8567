//! Keeps the highest-scoring candidates, highest first.

use crate::error::Result;
use crate::similarity::DEGENERATE_SCORE;
use crate::traits::Filter;
use crate::types::Candidate;

/// Selects the `pool_size` best candidates and orders them descending.
///
/// ## Algorithm
/// 1. Stable sort ascending by score
/// 2. Keep the last `pool_size` entries
/// 3. Reverse, so the best candidate comes first
///
/// Equal scores therefore come out in reverse input order. NaN scores are
/// ranked as degenerate.
pub struct TopPoolFilter {
    pool_size: usize,
}

impl TopPoolFilter {
    pub fn new(pool_size: usize) -> Self {
        Self { pool_size }
    }
}

fn sort_key(score: f32) -> f32 {
    if score.is_nan() { DEGENERATE_SCORE } else { score }
}

impl Filter for TopPoolFilter {
    fn name(&self) -> &str {
        "TopPoolFilter"
    }

    fn apply(&self, mut candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        candidates.sort_by(|a, b| sort_key(a.score).total_cmp(&sort_key(b.score)));

        let keep_from = candidates.len().saturating_sub(self.pool_size);
        let mut pool = candidates.split_off(keep_from);
        pool.reverse();
        Ok(pool)
    }
}
