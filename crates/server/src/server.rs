//! Server initialization and routing
//!
//! This module handles:
//! - Connecting the embedding backend and probing it
//! - Router configuration with the middleware stack
//! - Graceful shutdown handling

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::map_response;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use ml_client::{Embedder, GrpcEmbedder, HashingEmbedder};

use crate::config::{EmbeddingBackend, ServerConfig};
use crate::error::ServerError;
use crate::routes::{health_check, not_found, readiness_check, recommend};
use crate::state::AppState;

/// Build the Axum router with all routes and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    let timeout = state.config.timeout();
    let max_body_size = state.config.max_body_size();

    Router::new()
        .route("/recommend", post(recommend))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(map_response(json_rejections))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Timeout and body-limit rejections come from middleware with an empty or
/// plain-text body; give them the same JSON shape as every other error.
async fn json_rejections(response: Response) -> Response {
    match response.status() {
        StatusCode::REQUEST_TIMEOUT => ServerError::Timeout.into_response(),
        StatusCode::PAYLOAD_TOO_LARGE => ServerError::PayloadTooLarge.into_response(),
        _ => response,
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured `log_level`. Calling this twice is
/// harmless; the first subscriber stays.
pub fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    let installed = if config.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
    };

    if installed.is_err() {
        debug!("Tracing subscriber already installed");
    }
}

/// Create the configured embedder and check that it answers.
pub async fn connect_embedder(config: &ServerConfig) -> anyhow::Result<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match config.embedding_backend {
        EmbeddingBackend::Grpc => {
            let client = GrpcEmbedder::connect_with_timeouts(
                config.embedding_service_addr.clone(),
                config.connect_timeout(),
                config.timeout(),
            )
            .await
            .context("Failed to connect to embedding service")?;
            Arc::new(client)
        }
        EmbeddingBackend::Stub => {
            info!("Using the in-process stub embedder");
            Arc::new(HashingEmbedder::default())
        }
    };

    let model = embedder
        .model_info()
        .await
        .context("Embedding service did not report its model")?;
    info!(
        "Embedder {} ready: model {} ({} dimensions)",
        embedder.name(),
        model.model_name,
        model.dimension
    );

    Ok(embedder)
}

/// Start the recommendation HTTP server
///
/// Connects the embedding backend before binding, so a server that is
/// listening is able to answer requests. Blocks until SIGTERM or Ctrl+C.
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    init_tracing(&config);

    let addr: SocketAddr = config.socket_addr()?;
    let embedder = connect_embedder(&config).await?;
    let state = Arc::new(AppState::new(config.clone(), embedder)?);
    let app = build_router(state);

    info!("Starting ReelRecs server on {}", addr);
    info!(
        "Timeout: {}s, Max body: {}MB, Query template: {:?}",
        config.timeout_secs, config.max_body_size_mb, config.query_template
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
