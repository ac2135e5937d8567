//! Ranking stages that can be composed into a FilterPipeline.
//!
//! The production order is pool → floor → cap. Because the floor runs on
//! the already-limited pool, a movie outside the top `pool_size` by raw
//! similarity can never be returned, even if it clears the floor.

pub mod max_results;
pub mod minimum_similarity;
pub mod top_pool;

pub use max_results::MaxResultsFilter;
pub use minimum_similarity::MinimumSimilarityFilter;
pub use top_pool::TopPoolFilter;
