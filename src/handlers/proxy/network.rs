// handlers/proxy/network.rs - any verb on /magma/networks/:networkID[/*]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Extension, OriginalUri, Path, State},
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
};

use super::proxy_request;
use crate::error::ApiError;
use crate::gate::{filter_single_network_request, AuthenticatedCaller};
use crate::state::GateState;

pub async fn proxy_network(
    State(state): State<Arc<GateState>>,
    Extension(caller): Extension<AuthenticatedCaller>,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    OriginalUri(uri): OriginalUri,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    // Undecodable segments (e.g. `%FF`) address nothing the gate routes
    let Path(params) = params.map_err(|_| ApiError::not_found("Not Found"))?;
    let network_id = params.get("network_id").cloned().unwrap_or_default();
    let request = proxy_request(method, &uri, &headers, body, Some(network_id.clone()))?;

    if !filter_single_network_request(&caller, &network_id).is_allowed() {
        tracing::debug!(
            "Denied {} {} for {}: network not in session",
            request.method,
            request.target_path,
            caller.subject
        );
        return Err(ApiError::forbidden(format!(
            "Not authorized for network {}",
            network_id
        )));
    }

    let response = state.upstream.forward(request).await?;
    Ok(response.into_response())
}
