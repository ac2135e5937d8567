use std::sync::Arc;

use ml_client::Embedder;

use crate::config::ServerConfig;
use crate::orchestrator::RecommendationOrchestrator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Orchestrator shared by every request
    pub orchestrator: RecommendationOrchestrator,
}

impl AppState {
    /// Build the state around an already connected embedder
    pub fn new(config: ServerConfig, embedder: Arc<dyn Embedder>) -> anyhow::Result<Self> {
        let enhancer = config.query_enhancer()?;
        Ok(Self {
            config: Arc::new(config),
            orchestrator: RecommendationOrchestrator::new(embedder, enhancer),
        })
    }
}
