use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::api::response::internal_err;
use crate::api::{user_header, AppState};
use crate::error::ChatError;
use crate::model::now_millis;

/// Heartbeat — refresh the caller's liveness timestamp.
/// An unresolvable sender (missing header or unregistered name) is 404.
pub async fn heartbeat(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let name = match user_header(&headers) {
        Some(user) => user,
        None => return StatusCode::NOT_FOUND.into_response(),
    };

    let store = state.store.clone();
    let result =
        tokio::task::spawn_blocking(move || store.touch_participant(&name, now_millis())).await;

    match result {
        Ok(Ok(())) => StatusCode::OK.into_response(),
        Ok(Err(ChatError::UnknownParticipant { .. })) => StatusCode::NOT_FOUND.into_response(),
        Ok(Err(e)) => internal_err(&e),
        Err(e) => {
            tracing::warn!(error = %e, "heartbeat task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
