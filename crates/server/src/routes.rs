//! HTTP route handlers
//!
//! - `POST /recommend`: rank caller-supplied movies against a query
//! - `GET /health`: liveness
//! - `GET /ready`: readiness, backed by the embedding service

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use pipeline::MovieRecord;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Body of `POST /recommend`
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub query: String,
    pub movies: Vec<MovieRecord>,
}

/// Rank the supplied movies against the query.
///
/// The body is parsed by hand so that every malformed request, including a
/// missing content type, is answered with `400 BAD_REQUEST`.
///
/// # Response
///
/// A JSON array of at most five of the supplied movie objects, unchanged,
/// most similar first.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ServerResult<Json<Vec<MovieRecord>>> {
    let request: RecommendRequest = serde_json::from_slice(&body)?;
    info!(
        movies = request.movies.len(),
        "Recommendation request for {:?}", request.query
    );

    let recommendations = state
        .orchestrator
        .get_recommendations(&request.query, request.movies)
        .await?;

    Ok(Json(recommendations))
}

/// Liveness probe, 200 whenever the process is serving
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "reel-recs",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness probe, 200 only if the embedding service answers
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> ServerResult<impl IntoResponse> {
    let embedder = state.orchestrator.embedder();
    let model = embedder.model_info().await?;

    Ok(Json(json!({
        "status": "ready",
        "embedder": embedder.name(),
        "model": model.model_name,
        "dimension": model.dimension,
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
