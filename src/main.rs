use anyhow::Context;
use restdb::prelude::*;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let level = std::env::var("RESTDB_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    restdb::init_logging(&level);

    let config_path = std::env::var_os("RESTDB_CONFIG").map(PathBuf::from);
    let config = ServerConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    tracing::info!(
        db_path = %config.db_path.display(),
        prefix = ?config.route_prefix,
        "Starting restdb"
    );

    ServerBuilder::new().with_config(config).serve().await
}
