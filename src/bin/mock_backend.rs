//! Mock generation backend for local development.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use reflection_client::config::MockBackendConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config =
        MockBackendConfig::from_env().context("Failed to load mock backend configuration")?;
    reflection_client::mock::serve(config).await
}
