#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use tokio::task::JoinHandle;
use url::Url;

use nms_api_gate::auth::{generate_jwt, Claims};
use nms_api_gate::server;
use nms_api_gate::state::GateState;
use nms_api_gate::upstream::UpstreamClient;

pub const SECRET: &str = "integration-test-secret";

/// A server running on the test's runtime; aborted on drop
pub struct Spawned {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl Drop for Spawned {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_router(router: Router) -> Result<Spawned> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(Spawned {
        base_url: format!("http://127.0.0.1:{}", port),
        handle,
    })
}

/// Gate in front of `upstream_url`, talking plain HTTP and no client identity
pub async fn spawn_gate(upstream_url: &str, fallback: &[&str], timeout: Duration) -> Result<Spawned> {
    let client = UpstreamClient::build(Url::parse(upstream_url)?, None, None, timeout)?;
    let state = GateState::new(
        Arc::new(client),
        fallback.iter().map(|id| id.to_string()).collect(),
        SECRET,
    );
    spawn_router(server::app(Arc::new(state))).await
}

pub fn session(is_super_user: bool, network_ids: &[&str]) -> String {
    let claims = Claims::new(
        "integration",
        None,
        is_super_user,
        network_ids.iter().map(|id| id.to_string()).collect(),
        1,
    );
    generate_jwt(SECRET, &claims).expect("mint session token")
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Bytes,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: &'static str,
    delay: Duration,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

/// Controller API stand-in: answers every request with one canned JSON reply
pub struct MockUpstream {
    pub server: Spawned,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

impl MockUpstream {
    pub async fn replying(status: StatusCode, body: &'static str) -> Result<Self> {
        Self::spawn(status, body, Duration::ZERO).await
    }

    pub async fn slow(delay: Duration) -> Result<Self> {
        Self::spawn(StatusCode::OK, "[]", delay).await
    }

    async fn spawn(status: StatusCode, body: &'static str, delay: Duration) -> Result<Self> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status,
            body,
            delay,
            seen: seen.clone(),
        };
        let router = Router::new().fallback(record).with_state(state);
        Ok(Self {
            server: spawn_router(router).await?,
            seen,
        })
    }

    pub fn url(&self) -> &str {
        &self.server.base_url
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.seen.lock().unwrap().clone()
    }
}

async fn record(State(state): State<MockState>, method: Method, uri: Uri, body: Bytes) -> impl IntoResponse {
    state.seen.lock().unwrap().push(Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body,
    });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (
        state.status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        state.body,
    )
}
