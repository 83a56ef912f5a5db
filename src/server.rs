use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::GateConfig;
use crate::handlers::{self, proxy};
use crate::state::GateState;

pub fn app(state: Arc<GateState>) -> Router {
    Router::new()
        // Public
        .route("/health", get(handlers::health))
        // Session-gated controller API proxy
        .nest(proxy::PROXY_MOUNT, proxy::routes(state.clone()))
        .fallback(proxy::not_found)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the gate from `config` and serve until the listener fails.
pub async fn serve(config: GateConfig) -> anyhow::Result<()> {
    let state = Arc::new(GateState::from_config(&config)?);

    let bind_addr = SocketAddr::new(config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    tracing::info!(
        "NMS API gate listening on http://{} (upstream {}, {} fallback networks)",
        bind_addr,
        config.upstream.api_host,
        config.upstream.fallback_network_ids.len()
    );

    axum::serve(listener, app(state)).await?;
    Ok(())
}
