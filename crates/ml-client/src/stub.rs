//! Deterministic offline embedder.
//!
//! Used when no model service is available (local development, demos).
//! Each lowercase alphanumeric token is hashed into one of `dimension`
//! buckets and the counts are L2-normalized. Texts sharing words score
//! high; paraphrases do not. Empty text maps to the zero vector.

use async_trait::async_trait;
use fxhash::hash64;

use crate::{Embedder, MLClientError, ModelInfo};

/// Name reported by [`HashingEmbedder::model_info`]
pub const STUB_MODEL_NAME: &str = "stub/hashed-bag-of-words";

/// Default output dimension, same as all-mpnet-base-v2
pub const DEFAULT_STUB_DIMENSION: usize = 768;

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimension];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let bucket = hash64(token.to_lowercase().as_bytes()) % self.dimension as u64;
            vector[bucket as usize] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_STUB_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        STUB_MODEL_NAME
    }

    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MLClientError> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    async fn model_info(&self) -> Result<ModelInfo, MLClientError> {
        Ok(ModelInfo {
            model_name: STUB_MODEL_NAME.to_string(),
            dimension: self.dimension,
        })
    }
}
