// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::gate::ListFilterError;
use crate::upstream::TransportError;

/// Client-visible failures of the gate, each mapped to a status code and a
/// JSON error envelope
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 502 Bad Gateway (upstream unreachable or unusable response)
    BadGateway(String),

    // 504 Gateway Timeout
    GatewayTimeout(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::BadGateway(msg) => msg,
            ApiError::GatewayTimeout(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
            ApiError::GatewayTimeout(_) => "GATEWAY_TIMEOUT",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        })
    }
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        ApiError::GatewayTimeout(message.into())
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        if let TransportError::PathRewritten { .. } = err {
            tracing::warn!("Refused to forward: {}", err);
            return ApiError::not_found("Not Found");
        }

        // Operational fault: the upstream never produced a response
        tracing::error!("Upstream transport error: {}", err);
        match err {
            TransportError::Timeout(_) => {
                ApiError::gateway_timeout("Controller API did not respond in time")
            }
            TransportError::Unreachable(_)
            | TransportError::Request(_)
            | TransportError::PathRewritten { .. } => {
                ApiError::bad_gateway("Controller API is unavailable")
            }
        }
    }
}

impl From<ListFilterError> for ApiError {
    fn from(err: ListFilterError) -> Self {
        tracing::error!("Cannot filter network list: {}", err);
        ApiError::bad_gateway("Controller API returned an unexpected network list")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_maps_to_gateway_timeout() {
        let err: ApiError = TransportError::Timeout("deadline".into()).into();
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(err.error_code(), "GATEWAY_TIMEOUT");
    }

    #[test]
    fn connect_failure_maps_to_bad_gateway() {
        let err: ApiError = TransportError::Unreachable("refused".into()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn rewritten_path_is_not_found() {
        let err: ApiError = TransportError::PathRewritten {
            requested: "/magma/networks/a/..\\b".into(),
            parsed: "/magma/networks/b".into(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn envelope_shape() {
        let body = ApiError::forbidden("nope").to_json();
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "nope");
        assert_eq!(body["code"], "FORBIDDEN");
    }
}
