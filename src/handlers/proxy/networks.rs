// handlers/proxy/networks.rs - GET /magma/networks
//
// The controller lists every network it knows; tenants only see their own.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, OriginalUri, State},
    http::{HeaderMap, HeaderValue, Method},
    response::{IntoResponse, Json, Response},
};

use super::proxy_request;
use crate::error::ApiError;
use crate::gate::{fallback_engaged, filter_network_ids, filter_network_list_response, AuthenticatedCaller};
use crate::state::GateState;
use crate::upstream::UpstreamResponse;

pub async fn list_networks(
    State(state): State<Arc<GateState>>,
    Extension(caller): Extension<AuthenticatedCaller>,
    OriginalUri(uri): OriginalUri,
    method: Method,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if method != Method::GET {
        return Err(ApiError::not_found("Not Found"));
    }

    let request = proxy_request(method, &uri, &headers, Bytes::new(), None)?;
    let response = state.upstream.forward(request).await?;

    // Static substitute for deployments without a working trust chain to the
    // controller; not an authorization decision.
    if fallback_engaged(response.status, &state.fallback_network_ids) {
        tracing::warn!(
            "Fallback engaged: controller answered {} to network list for {}, serving {} configured networks",
            response.status,
            caller.subject,
            state.fallback_network_ids.len()
        );
        return Ok(Json(filter_network_ids(&caller, &state.fallback_network_ids)).into_response());
    }

    if !response.status.is_success() {
        return Ok(response.into_response());
    }

    let content_type = if caller.is_super_user {
        response.content_type
    } else {
        Some(HeaderValue::from_static("application/json"))
    };

    let body = filter_network_list_response(&caller, response.body)?;

    Ok(UpstreamResponse {
        status: response.status,
        content_type,
        body,
    }
    .into_response())
}
