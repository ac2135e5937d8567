//! Server configuration.
//!
//! Loaded from an optional `reel-recs.toml` (or an explicit file), then
//! overridden by `REEL_RECS_*` environment variables. A `.env` file in the
//! working directory is read first.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use pipeline::{DEFAULT_QUERY_TEMPLATE, QueryEnhancer};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides, e.g. `REEL_RECS_PORT=8080`
pub const ENV_PREFIX: &str = "REEL_RECS";

/// Log filter used when neither `RUST_LOG` nor `log_level` is set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Config file looked up in the working directory (any supported extension)
pub const DEFAULT_CONFIG_FILE: &str = "reel-recs";

/// Where embeddings come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// The sentence-embedding gRPC service
    Grpc,
    /// In-process hashed bag-of-words, for running without the model
    Stub,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_embedding_backend")]
    pub embedding_backend: EmbeddingBackend,

    /// Address of the sentence-embedding service
    #[serde(default = "default_embedding_service_addr")]
    pub embedding_service_addr: String,

    /// Time allowed to connect to the embedding service, in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Request timeout in seconds (HTTP request and each embedding call)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Template wrapped around every query, must contain `{query}`
    #[serde(default = "default_query_template")]
    pub query_template: String,

    /// Log filter used when `RUST_LOG` is not set, `info` if absent
    #[serde(default)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            embedding_backend: default_embedding_backend(),
            embedding_service_addr: default_embedding_service_addr(),
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            query_template: default_query_template(),
            log_level: None,
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `reel-recs.*` (if present) and the environment
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let builder = config::Config::builder()
            .add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false));
        Self::finish(builder)
    }

    /// Load configuration from an explicit file, then the environment
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let builder = config::Config::builder().add_source(config::File::from(path).required(true));
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> anyhow::Result<Self> {
        let config: ServerConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> anyhow::Result<()> {
        self.query_enhancer()?;
        self.socket_addr()?;
        Ok(())
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        addr_str
            .parse()
            .with_context(|| format!("Invalid bind address {}", addr_str))
    }

    pub fn query_enhancer(&self) -> anyhow::Result<QueryEnhancer> {
        Ok(QueryEnhancer::new(self.query_template.clone())?)
    }

    /// The configured log filter, or [`DEFAULT_LOG_LEVEL`]
    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_embedding_backend() -> EmbeddingBackend {
    EmbeddingBackend::Grpc
}

fn default_embedding_service_addr() -> String {
    "http://localhost:50051".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    10
}

fn default_query_template() -> String {
    DEFAULT_QUERY_TEMPLATE.to_string()
}
