use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ChatError;

/// 422 carrying the list of field validation messages.
pub(crate) fn validation_err(errors: Vec<String>) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
}

/// 500 with the storage error text echoed to the caller.
pub(crate) fn internal_err(e: &ChatError) -> Response {
    tracing::warn!(error = %e, "store error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
}

/// Collapse a spawn_blocking result into a Response, mapping errors to 500.
pub(crate) fn from_blocking<T>(
    result: std::result::Result<crate::error::Result<T>, tokio::task::JoinError>,
    on_ok: impl FnOnce(T) -> Response,
) -> Response {
    match result {
        Ok(Ok(val)) => on_ok(val),
        Ok(Err(e)) => internal_err(&e),
        Err(e) => {
            tracing::warn!(error = %e, "store task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
