use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Bytes,
    http::{HeaderValue, StatusCode},
    Router,
};

use crate::auth::{generate_jwt, Claims};
use crate::server::app;
use crate::state::GateState;
use crate::upstream::{ProxyRequest, TransportError, Upstream, UpstreamResponse};

pub const TEST_SECRET: &str = "gate-unit-test-secret";

enum Reply {
    Respond(UpstreamResponse),
    TimeOut,
}

/// Upstream stand-in that records every forwarded request and answers with
/// a canned reply
pub struct RecordingUpstream {
    reply: Reply,
    calls: Mutex<Vec<ProxyRequest>>,
}

impl RecordingUpstream {
    pub fn json(status: StatusCode, body: &'static str) -> Self {
        Self {
            reply: Reply::Respond(UpstreamResponse {
                status,
                content_type: Some(HeaderValue::from_static("application/json")),
                body: Bytes::from_static(body.as_bytes()),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn timing_out() -> Self {
        Self {
            reply: Reply::TimeOut,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ProxyRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Upstream for RecordingUpstream {
    async fn forward(&self, request: ProxyRequest) -> Result<UpstreamResponse, TransportError> {
        self.calls.lock().unwrap().push(request);
        match &self.reply {
            Reply::Respond(response) => Ok(response.clone()),
            Reply::TimeOut => Err(TransportError::Timeout("test deadline".into())),
        }
    }

    fn host(&self) -> &str {
        "recording://controller"
    }
}

pub fn test_app(upstream: Arc<RecordingUpstream>, fallback: &[&str]) -> Router {
    let state = GateState::new(
        upstream,
        fallback.iter().map(|id| id.to_string()).collect(),
        TEST_SECRET,
    );
    app(Arc::new(state))
}

/// Signed session token for a caller with the given entitlements
pub fn bearer(is_super_user: bool, network_ids: &[&str]) -> String {
    let claims = Claims::new(
        "test-operator",
        Some("test-org".into()),
        is_super_user,
        network_ids.iter().map(|id| id.to_string()).collect(),
        1,
    );
    generate_jwt(TEST_SECRET, &claims).unwrap()
}
