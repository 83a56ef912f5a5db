// handlers/health.rs - GET /health handler
//
// Liveness only: never contacts the controller API.

use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::state::GateState;

pub async fn health(State(state): State<Arc<GateState>>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "upstream": state.upstream.host(),
        }
    }))
}
