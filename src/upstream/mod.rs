// upstream/mod.rs - The controller API as seen from the gate
//
// Bodies are opaque bytes here; only the list-networks handler ever looks
// inside one.

pub mod client;

pub use client::UpstreamClient;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// An authorized request, ready to be sent to the controller API
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    /// Path relative to the controller API root (proxy mount already stripped)
    pub target_path: String,
    pub query: Option<String>,
    pub requested_network_id: Option<String>,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Whatever the controller API answered, status and body untouched
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        match self.content_type {
            Some(content_type) => {
                response.headers_mut().insert(CONTENT_TYPE, content_type);
            }
            None => {
                response.headers_mut().remove(CONTENT_TYPE);
            }
        }
        response
    }
}

/// Failure to obtain any HTTP response from the controller API
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("upstream request timed out: {0}")]
    Timeout(String),

    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    #[error("upstream request failed: {0}")]
    Request(String),

    #[error("path {requested} would be sent upstream as {parsed}")]
    PathRewritten { requested: String, parsed: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Unreachable(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Anything that can carry a proxied request to the controller API
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn forward(&self, request: ProxyRequest) -> Result<UpstreamResponse, TransportError>;

    /// Human-readable upstream address, for health output and logs
    fn host(&self) -> &str;
}
