use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::orchestrator::RecommendError;
use ml_client::MLClientError;
use pipeline::RankingError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Embedding service unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Ranking error: {0}")]
    Ranking(#[from] RankingError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ServerError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::EmbeddingUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Embedding(_) => StatusCode::BAD_GATEWAY,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Ranking(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::Timeout => "REQUEST_TIMEOUT",
            ServerError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ServerError::EmbeddingUnavailable(_) => "EMBEDDING_UNAVAILABLE",
            ServerError::Embedding(_) => "EMBEDDING_ERROR",
            ServerError::Ranking(_) => "RANKING_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), "{}", self);
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        });

        (status, body).into_response()
    }
}

impl From<MLClientError> for ServerError {
    fn from(err: MLClientError) -> Self {
        warn!("Embedding provider failed: {}", err);
        if err.is_unavailable() {
            ServerError::EmbeddingUnavailable(err.to_string())
        } else {
            ServerError::Embedding(err.to_string())
        }
    }
}

impl From<RecommendError> for ServerError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::Embedding(e) => e.into(),
            RecommendError::Ranking(e) => ServerError::Ranking(e),
            RecommendError::Task(msg) => ServerError::Internal(msg),
        }
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::BadRequest(format!("Invalid request body: {err}"))
    }
}
