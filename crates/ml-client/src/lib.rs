//! Embedding client for the sentence-embedding model service.
//!
//! The pretrained model lives in a separate gRPC service that loads its
//! weights once at start-up. This crate provides:
//! - The [`Embedder`] trait, the seam the recommendation service depends on
//! - [`GrpcEmbedder`], a client for the `SentenceEncoder` gRPC service
//! - Validation of what comes back (one vector per text, consistent dimension)
//! - [`HashingEmbedder`], a deterministic offline stand-in for the model
//!
//! Nothing here retries. A failed call is reported to the caller as is.

use async_trait::async_trait;
use thiserror::Error;

pub mod grpc;
pub mod stub;

// Include the generated protobuf code
pub mod embeddings {
    tonic::include_proto!("embeddings");
}

pub use grpc::GrpcEmbedder;
pub use stub::HashingEmbedder;

/// Errors that can occur when interacting with the embedding service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MLClientError {
    #[error("Failed to connect to embedding service: {0}")]
    ConnectionError(String),

    #[error("Embedding service unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to encode texts: {0}")]
    EncodingError(String),

    #[error("Invalid response from embedding service: {0}")]
    InvalidResponse(String),
}

impl MLClientError {
    /// True when the service could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            MLClientError::ConnectionError(_) | MLClientError::Unavailable(_)
        )
    }
}

impl From<tonic::Status> for MLClientError {
    fn from(status: tonic::Status) -> Self {
        match status.code() {
            tonic::Code::Unavailable | tonic::Code::DeadlineExceeded => {
                MLClientError::Unavailable(status.message().to_string())
            }
            code => MLClientError::EncodingError(format!("{:?}: {}", code, status.message())),
        }
    }
}

/// Identity of the model behind an [`Embedder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub model_name: String,
    pub dimension: usize,
}

/// Anything that turns text into fixed-dimension vectors.
///
/// Implementations must be deterministic for a fixed model and must return
/// exactly one vector per input text, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Short name for logging (e.g. the service address)
    fn name(&self) -> &str;

    /// Encode a batch of texts.
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MLClientError>;

    /// Encode a single text.
    async fn encode_one(&self, text: &str) -> Result<Vec<f32>, MLClientError> {
        let mut vectors = self.encode(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| MLClientError::InvalidResponse("no embedding returned".into()))
    }

    /// Model identity and output dimension. Used as the readiness probe.
    async fn model_info(&self) -> Result<ModelInfo, MLClientError>;
}

/// Check that a batch response has one vector per text and a single dimension.
pub fn validate_embeddings(
    vectors: &[Vec<f32>],
    expected_len: usize,
) -> Result<(), MLClientError> {
    if vectors.len() != expected_len {
        return Err(MLClientError::InvalidResponse(format!(
            "expected {} embeddings, got {}",
            expected_len,
            vectors.len()
        )));
    }

    if let Some(first) = vectors.first() {
        let dimension = first.len();
        if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dimension) {
            return Err(MLClientError::InvalidResponse(format!(
                "embedding {} has dimension {}, expected {}",
                i,
                v.len(),
                dimension
            )));
        }
    }

    Ok(())
}
