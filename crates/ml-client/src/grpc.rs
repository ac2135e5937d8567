//! gRPC client for the `SentenceEncoder` service.

use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::Channel;
use tracing::{debug, error, info};

use crate::embeddings::{
    sentence_encoder_client::SentenceEncoderClient, EncodeRequest, ModelInfoRequest,
};
use crate::{validate_embeddings, Embedder, MLClientError, ModelInfo};

/// Default time allowed for establishing the connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default time allowed for a single encode call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the sentence-embedding service.
///
/// Cloning is cheap: clones share the underlying channel.
#[derive(Clone)]
pub struct GrpcEmbedder {
    client: SentenceEncoderClient<Channel>,
    service_addr: String,
}

impl GrpcEmbedder {
    /// Connect to the embedding service with the default timeouts.
    ///
    /// # Arguments
    /// * `addr` - Address of the gRPC service (e.g., "http://localhost:50051")
    pub async fn connect(addr: impl Into<String>) -> Result<Self, MLClientError> {
        Self::connect_with_timeouts(addr, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT).await
    }

    /// Connect with explicit connect and per-request timeouts.
    pub async fn connect_with_timeouts(
        addr: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, MLClientError> {
        let addr = addr.into();
        info!("Connecting to embedding service at {}", addr);

        let channel = Channel::from_shared(addr.clone())
            .map_err(|e| MLClientError::ConnectionError(format!("invalid address {}: {}", addr, e)))?
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .connect()
            .await
            .map_err(|e| {
                error!("Failed to connect to embedding service at {}: {}", addr, e);
                MLClientError::ConnectionError(e.to_string())
            })?;

        Ok(GrpcEmbedder {
            client: SentenceEncoderClient::new(channel),
            service_addr: addr,
        })
    }

    /// Get the address of the embedding service this client is connected to.
    pub fn service_address(&self) -> &str {
        &self.service_addr
    }
}

#[async_trait]
impl Embedder for GrpcEmbedder {
    fn name(&self) -> &str {
        &self.service_addr
    }

    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MLClientError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let expected_len = texts.len();
        debug!("Encoding {} texts via {}", expected_len, self.service_addr);

        let request = tonic::Request::new(EncodeRequest {
            texts: texts.to_vec(),
        });

        let mut client = self.client.clone();
        let response = client.encode(request).await.map_err(|status| {
            error!("gRPC error while encoding texts: {}", status);
            MLClientError::from(status)
        })?;

        let vectors: Vec<Vec<f32>> = response
            .into_inner()
            .embeddings
            .into_iter()
            .map(|embedding| embedding.values)
            .collect();

        if let Err(e) = validate_embeddings(&vectors, expected_len) {
            error!("{}", e);
            return Err(e);
        }
        Ok(vectors)
    }

    async fn model_info(&self) -> Result<ModelInfo, MLClientError> {
        let mut client = self.client.clone();
        let response = client
            .model_info(tonic::Request::new(ModelInfoRequest {}))
            .await
            .map_err(MLClientError::from)?
            .into_inner();

        Ok(ModelInfo {
            model_name: response.model_name,
            dimension: response.dimension as usize,
        })
    }
}
