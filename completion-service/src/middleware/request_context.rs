//! Request-scoped context and lifecycle logging.
//!
//! Correlation id, source address, and timing live in a [`RequestContext`]
//! carried in the request extensions for exactly one request; nothing here is
//! shared across requests.

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{SecondsFormat, Utc};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info_span;
use uuid::Uuid;

use crate::services::CompletionRecord;
use crate::startup::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request metadata, created at entry and discarded after the response.
#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub source_addr: String,
    /// Arrival time, RFC 3339 UTC with millisecond precision.
    pub arrival: String,
    started: Instant,
}

/// Successful prompt/completion pair, stashed in the response extensions by
/// the completion handler so the exit hook can log it with the final latency.
#[derive(Clone)]
pub struct CompletionExchange {
    pub prompt: String,
    pub completion: String,
}

pub async fn request_context_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let source_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let ctx = RequestContext {
        request_id: request_id.clone(),
        source_addr: source_addr.clone(),
        arrival: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        started: Instant::now(),
    };

    state
        .op_log
        .append(
            "INFO",
            Some(&source_addr),
            Some(&request_id),
            &format!("Incoming request {} {}", req.method(), req.uri().path()),
        )
        .await;

    let span = info_span!(
        "http_request",
        request_id = %request_id,
        method = %req.method(),
        uri = %req.uri(),
    );

    req.extensions_mut().insert(ctx.clone());

    let mut response = {
        let _guard = span.enter();
        next.run(req).await
    };

    let latency_ms = (ctx.started.elapsed().as_secs_f64() * 1000.0).round() as u64;
    state
        .op_log
        .append(
            "INFO",
            Some(&source_addr),
            Some(&request_id),
            &format!(
                "Request completed with status {} in {} ms",
                response.status().as_u16(),
                latency_ms
            ),
        )
        .await;

    // History lines carry the final latency, so this runs after it is known.
    if let Some(exchange) = response.extensions().get::<CompletionExchange>().cloned() {
        let record = CompletionRecord {
            timestamp: ctx.arrival.clone(),
            origin: source_addr.clone(),
            latency: latency_ms,
            prompt: exchange.prompt,
            completion: exchange.completion,
        };
        state.history.append(&record).await;
    }

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    response
}
