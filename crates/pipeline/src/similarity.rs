//! Cosine similarity between embedding vectors.

use crate::error::{RankingError, Result};

/// Score assigned when similarity is undefined (zero-norm or non-finite input).
///
/// It never passes a similarity floor and always sorts last.
pub const DEGENERATE_SCORE: f32 = f32::NEG_INFINITY;

/// Dot product of `a` and `b`, divided by the product of their norms.
///
/// Returns [`DEGENERATE_SCORE`] when either norm is zero or the result is not
/// finite. An empty pair has zero norm and is therefore degenerate.
///
/// # Panics
/// Panics if `a` and `b` differ in length. Use
/// [`checked_cosine_similarity`] for vectors from an untrusted source.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(
        a.len(),
        b.len(),
        "cosine similarity of vectors with different dimensions"
    );

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return DEGENERATE_SCORE;
    }

    let score = dot / denom;
    if score.is_finite() {
        score
    } else {
        DEGENERATE_SCORE
    }
}

/// Like [`cosine_similarity`] but checks dimensions first.
///
/// `position` identifies the movie vector in error messages.
pub fn checked_cosine_similarity(query: &[f32], movie: &[f32], position: usize) -> Result<f32> {
    if query.len() != movie.len() {
        return Err(RankingError::DimensionMismatch {
            position,
            expected: query.len(),
            found: movie.len(),
        });
    }
    Ok(cosine_similarity(query, movie))
}
