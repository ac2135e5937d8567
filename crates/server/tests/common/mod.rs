//! Deterministic embedders shared by the server tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use ml_client::{Embedder, MLClientError, ModelInfo};
use pipeline::MovieRecord;
use server::{AppState, ServerConfig, build_router};

/// Each dimension counts the words of one concept.
const CONCEPTS: &[&[&str]] = &[
    &["space", "wormhole", "galaxy", "planet", "astronaut", "crew", "adventure", "stars"],
    &["romantic", "love", "comedy", "paris", "wedding"],
    &["detective", "murder", "heist", "crime", "gangster"],
    &["haunted", "ghost", "zombie", "horror"],
    &["family", "kids", "animated", "dog"],
];

/// Embeds text as concept counts, so similarity follows shared topics.
/// Text with no concept word embeds to the zero vector.
#[derive(Default)]
pub struct ConceptEmbedder {
    calls: AtomicUsize,
}

impl ConceptEmbedder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn embed(text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        CONCEPTS
            .iter()
            .map(|concept| words.iter().filter(|w| concept.contains(w)).count() as f32)
            .collect()
    }
}

#[async_trait]
impl Embedder for ConceptEmbedder {
    fn name(&self) -> &str {
        "concept"
    }

    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MLClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::embed(t)).collect())
    }

    async fn model_info(&self) -> Result<ModelInfo, MLClientError> {
        Ok(ModelInfo {
            model_name: "concept-counts".to_string(),
            dimension: CONCEPTS.len(),
        })
    }
}

/// Fails every call with the given error.
pub struct FailingEmbedder(pub MLClientError);

#[async_trait]
impl Embedder for FailingEmbedder {
    fn name(&self) -> &str {
        "failing"
    }

    async fn encode(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, MLClientError> {
        Err(self.0.clone())
    }

    async fn model_info(&self) -> Result<ModelInfo, MLClientError> {
        Err(self.0.clone())
    }
}

/// Returns one vector fewer than asked for on batches.
pub struct ShortEmbedder;

#[async_trait]
impl Embedder for ShortEmbedder {
    fn name(&self) -> &str {
        "short"
    }

    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MLClientError> {
        let keep = if texts.len() > 1 { texts.len() - 1 } else { texts.len() };
        Ok(texts[..keep].iter().map(|t| ConceptEmbedder::embed(t)).collect())
    }

    async fn model_info(&self) -> Result<ModelInfo, MLClientError> {
        Ok(ModelInfo {
            model_name: "short".to_string(),
            dimension: CONCEPTS.len(),
        })
    }
}

/// Embeds single texts with one more dimension than batches.
pub struct SkewedEmbedder;

#[async_trait]
impl Embedder for SkewedEmbedder {
    fn name(&self) -> &str {
        "skewed"
    }

    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MLClientError> {
        let extra = usize::from(texts.len() == 1);
        Ok(texts
            .iter()
            .map(|t| {
                let mut v = ConceptEmbedder::embed(t);
                v.extend(std::iter::repeat_n(1.0, extra));
                v
            })
            .collect())
    }

    async fn model_info(&self) -> Result<ModelInfo, MLClientError> {
        Ok(ModelInfo {
            model_name: "skewed".to_string(),
            dimension: CONCEPTS.len(),
        })
    }
}

pub fn movie(title: &str, description: &str) -> MovieRecord {
    MovieRecord::with_description(description).with_field("title", title)
}

/// Answers correctly, but only after a delay.
pub struct SlowEmbedder(pub Duration);

#[async_trait]
impl Embedder for SlowEmbedder {
    fn name(&self) -> &str {
        "slow"
    }

    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MLClientError> {
        tokio::time::sleep(self.0).await;
        Ok(texts.iter().map(|t| ConceptEmbedder::embed(t)).collect())
    }

    async fn model_info(&self) -> Result<ModelInfo, MLClientError> {
        Ok(ModelInfo {
            model_name: "slow".to_string(),
            dimension: CONCEPTS.len(),
        })
    }
}

pub fn router(embedder: Arc<dyn Embedder>) -> Router {
    router_with_config(ServerConfig::default(), embedder)
}

pub fn router_with_config(config: ServerConfig, embedder: Arc<dyn Embedder>) -> Router {
    let state = AppState::new(config, embedder).expect("test config is valid");
    build_router(Arc::new(state))
}
