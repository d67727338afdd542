use anyhow::Context;
use tracing_subscriber::EnvFilter;

use medtrack_server::config::{self, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(
        version = config::APP_VERSION,
        "Starting {} server",
        config::APP_NAME
    );

    medtrack_server::serve(config).await
}
