//! HTTP route handlers for the completion gateway.

pub mod completion;
pub mod logs;

use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::middleware::RequestContext;

/// Health check endpoint. Reports the request's own arrival timestamp, which
/// doubles as a liveness check of the context middleware.
pub async fn home(Extension(ctx): Extension<RequestContext>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "time": ctx.arrival,
    }))
}
