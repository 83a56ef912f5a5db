use nms_api_gate::{config::GateConfig, server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up API_HOST, credentials, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Credentials and fallback list are validated here; bad config never serves
    let config = GateConfig::from_env()?;
    tracing::info!("Starting NMS API gate in {:?} mode", config.environment);

    server::serve(config).await
}
