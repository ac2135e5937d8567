//! HTTP service for the ReelRecs recommendation engine.
//!
//! This crate contains the orchestrator that coordinates the embedding
//! client and the ranking pipeline, and the axum server exposing it:
//!
//! - `POST /recommend` - Rank a list of movies against a free-text query
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe (asks the embedding service)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{EmbeddingBackend, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use orchestrator::{RecommendError, RecommendationOrchestrator};
pub use server::{build_router, connect_embedder, init_tracing, start_server};
pub use state::AppState;
