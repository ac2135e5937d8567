//! ReelRecs recommendation server.
//!
//! Configuration comes from `reel-recs.toml` and `REEL_RECS_*` variables,
//! see [`server::ServerConfig`].

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    server::start_server(config).await?;
    Ok(())
}
