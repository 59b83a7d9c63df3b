//! Log-retrieval endpoints: the operational log and the completion history.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Extension;

use service_common::error::AppError;

use crate::middleware::RequestContext;
use crate::startup::AppState;

const LOG_READ_ERROR: &str = "Cannot access log file";
const HISTORY_READ_ERROR: &str = "Cannot access completion log file";

/// `GET /logs` — full operational log as plain text.
pub async fn operational_log(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, AppError> {
    match state.op_log.read_all().await {
        Ok(contents) => Ok(plain_text(contents)),
        Err(e) => {
            tracing::error!(
                request_id = %ctx.request_id,
                "Failed to read operational log: {}",
                e
            );
            Err(AppError::Internal(LOG_READ_ERROR.to_string()))
        }
    }
}

/// `GET /history` — full completion history as plain text, one JSON record
/// per line.
pub async fn completion_history(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, AppError> {
    match state.history.read_all().await {
        Ok(contents) => Ok(plain_text(contents)),
        Err(e) => {
            tracing::error!(
                request_id = %ctx.request_id,
                "Failed to read completion history: {}",
                e
            );
            Err(AppError::Internal(HISTORY_READ_ERROR.to_string()))
        }
    }
}

fn plain_text(contents: String) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        contents,
    )
        .into_response()
}
