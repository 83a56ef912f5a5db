// handlers/proxy/mod.rs - Controller API proxy routes
//
// Route families under the mount, each with its own rule:
//   *   /magma/networks/:networkID[/...]  session must include the network
//   GET /magma/networks                   forwarded, response filtered
//   GET /magma/channels/:channel          read-only for everyone
// Anything else answers 404 so route existence is not revealed.

pub mod channels;
pub mod network;
pub mod networks;

use std::sync::Arc;

use axum::{
    body::Bytes,
    http::{header::CONTENT_TYPE, HeaderMap, Method, Uri},
    middleware,
    routing::any,
    Router,
};

use crate::error::ApiError;
use crate::middleware::require_session;
use crate::state::GateState;
use crate::upstream::ProxyRequest;

/// Where the console mounts the controller API proxy
pub const PROXY_MOUNT: &str = "/nms/apicontroller";

pub fn routes(state: Arc<GateState>) -> Router<Arc<GateState>> {
    Router::new()
        .route("/magma/networks", any(networks::list_networks))
        .route("/magma/networks/:network_id", any(network::proxy_network))
        .route("/magma/networks/:network_id/*rest", any(network::proxy_network))
        .route("/magma/channels/:channel", any(channels::proxy_channel))
        .route_layer(middleware::from_fn_with_state(state, require_session))
        .fallback(not_found)
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}

/// Controller-relative path for a request that arrived under the mount
pub fn strip_mount_prefix(path: &str) -> Option<&str> {
    path.strip_prefix(PROXY_MOUNT)
        .filter(|rest| rest.starts_with('/'))
}

/// `.` and `..` segments (plain or percent-encoded) would be collapsed by the
/// URL parser and could step out of the authorized network's subtree.
pub fn has_dot_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| {
        let normalized = segment.to_ascii_lowercase().replace("%2e", ".");
        normalized == "." || normalized == ".."
    })
}

/// Backslashes and encoded slashes are treated as separators by some URL
/// parsers, so a path carrying them may not address what the router matched.
pub fn has_ambiguous_separator(path: &str) -> bool {
    let lowered = path.to_ascii_lowercase();
    lowered.contains('\\') || lowered.contains("%5c") || lowered.contains("%2f")
}

pub(crate) fn proxy_request(
    method: Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: Bytes,
    requested_network_id: Option<String>,
) -> Result<ProxyRequest, ApiError> {
    let target_path = strip_mount_prefix(uri.path())
        .filter(|path| !has_dot_segment(path) && !has_ambiguous_separator(path))
        .ok_or_else(|| ApiError::not_found("Not Found"))?;

    Ok(ProxyRequest {
        method,
        target_path: target_path.to_string(),
        query: uri.query().map(str::to_string),
        requested_network_id,
        content_type: headers.get(CONTENT_TYPE).cloned(),
        body,
    })
}
