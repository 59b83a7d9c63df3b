//! Text-completion endpoint.
//!
//! Forwards the prompt to the configured upstream backend, or applies the
//! local alternating-case transform when no backend is configured. Upstream
//! failures fail closed: the caller gets an explicit 502, never a stale or
//! undefined completion.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Serialize;
use serde_json::Value;

use service_common::error::AppError;

use crate::middleware::{CompletionExchange, RequestContext};
use crate::services::fallback::local_completion;
use crate::startup::AppState;

const MALFORMED_PROMPT: &str = "Malformed or missing prompt argument";
const UPSTREAM_UNAVAILABLE: &str = "Upstream completion backend unavailable";

#[derive(Debug, Serialize)]
struct CompletionResponse {
    completion: String,
}

/// `POST /completion` — body is JSON with a non-empty string `prompt`; an
/// absent body counts as an empty object, not a parse error.
pub async fn completion(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    body: Bytes,
) -> Result<Response, AppError> {
    let payload: Value = if body.is_empty() {
        Value::Object(Default::default())
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(e) => {
                reject_prompt(&state, &ctx, &format!("unparsable body: {}", e)).await;
                return Err(AppError::BadRequest(MALFORMED_PROMPT.to_string()));
            }
        }
    };

    let prompt = match payload.get("prompt").and_then(Value::as_str) {
        Some(p) if !p.trim().is_empty() => p.to_string(),
        _ => {
            reject_prompt(&state, &ctx, "prompt is missing, empty, or not a string").await;
            return Err(AppError::BadRequest(MALFORMED_PROMPT.to_string()));
        }
    };

    match &state.upstream {
        Some(provider) => {
            let completion = match provider.complete(&prompt).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(
                        request_id = %ctx.request_id,
                        "Upstream completion failed: {}",
                        e
                    );
                    state
                        .op_log
                        .append(
                            "ERROR",
                            Some(&ctx.source_addr),
                            Some(&ctx.request_id),
                            &format!("Upstream completion failed: {}", e),
                        )
                        .await;
                    return Err(AppError::BadGateway(UPSTREAM_UNAVAILABLE.to_string()));
                }
            };

            let mut response = Json(CompletionResponse {
                completion: completion.clone(),
            })
            .into_response();
            response.extensions_mut().insert(CompletionExchange {
                prompt,
                completion,
            });
            Ok(response)
        }
        None => {
            // Local fallback: no upstream exchange happened, so nothing is
            // recorded in the history log.
            let completion = local_completion(&prompt);
            Ok(Json(CompletionResponse { completion }).into_response())
        }
    }
}

async fn reject_prompt(state: &AppState, ctx: &RequestContext, reason: &str) {
    tracing::error!(
        request_id = %ctx.request_id,
        "Rejected completion request: {}",
        reason
    );
    state
        .op_log
        .append(
            "ERROR",
            Some(&ctx.source_addr),
            Some(&ctx.request_id),
            &format!("Rejected completion request: {}", reason),
        )
        .await;
}
