use std::sync::Arc;

use crate::config::{ConfigError, GateConfig};
use crate::upstream::{Upstream, UpstreamClient};

/// Process-wide, read-only state shared by every request
pub struct GateState {
    pub upstream: Arc<dyn Upstream>,
    pub fallback_network_ids: Vec<String>,
    pub jwt_secret: String,
}

impl GateState {
    pub fn new(upstream: Arc<dyn Upstream>, fallback_network_ids: Vec<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            upstream,
            fallback_network_ids,
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Parses the client identity and builds the upstream client up front, so
    /// a bad certificate stops the process before it accepts connections.
    pub fn from_config(config: &GateConfig) -> Result<Self, ConfigError> {
        let upstream = UpstreamClient::from_config(&config.upstream)?;

        Ok(Self::new(
            Arc::new(upstream),
            config.upstream.fallback_network_ids.clone(),
            config.security.jwt_secret.clone(),
        ))
    }
}
