// handlers/proxy/channels.rs - GET /magma/channels/:channel
//
// Channels are not network-scoped; any authenticated caller may read them.
// Every other verb is answered as an unknown route.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{OriginalUri, State},
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
};

use super::proxy_request;
use crate::error::ApiError;
use crate::gate::passthrough_read_only_channel;
use crate::state::GateState;

pub async fn proxy_channel(
    State(state): State<Arc<GateState>>,
    OriginalUri(uri): OriginalUri,
    method: Method,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if !passthrough_read_only_channel(&method).is_allowed() {
        tracing::debug!("Blocked {} on read-only channel {}", method, uri.path());
        return Err(ApiError::not_found("Not Found"));
    }

    let request = proxy_request(method, &uri, &headers, Bytes::new(), None)?;
    let response = state.upstream.forward(request).await?;
    Ok(response.into_response())
}
