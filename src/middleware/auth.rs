use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::validate_jwt;
use crate::error::ApiError;
use crate::gate::AuthenticatedCaller;
use crate::state::GateState;

/// Session middleware: validates the bearer token and injects the
/// `AuthenticatedCaller` the proxy handlers authorize against
pub async fn require_session(
    State(state): State<Arc<GateState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(|msg| {
        tracing::warn!("Rejected {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    let claims = validate_jwt(&state.jwt_secret, token).map_err(|e| {
        tracing::warn!("Rejected {}: {}", request.uri().path(), e);
        ApiError::unauthorized("Invalid or expired session")
    })?;

    let caller = AuthenticatedCaller::from(claims);
    tracing::debug!(
        "Session for {} (org {:?}, super_user={}, {} networks)",
        caller.subject,
        caller.organization,
        caller.is_super_user,
        caller.network_ids.len()
    );
    request.extensions_mut().insert(caller);

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer ...` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err("Empty session token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}
