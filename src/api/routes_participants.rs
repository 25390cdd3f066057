use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::response::{from_blocking, internal_err, validation_err};
use crate::api::AppState;
use crate::error::ChatError;
use crate::model::{now_millis, Participant};

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    let name = req.name.as_deref().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return validation_err(vec!["name must be a non-empty string".to_string()]);
    }

    let store = state.store.clone();
    let participant = Participant {
        name,
        last_status: now_millis(),
    };

    let result =
        tokio::task::spawn_blocking(move || store.register_participant(&participant)).await;

    match result {
        Ok(Ok(())) => StatusCode::CREATED.into_response(),
        Ok(Err(e @ ChatError::DuplicateParticipant { .. })) => {
            (StatusCode::CONFLICT, e.to_string()).into_response()
        }
        Ok(Err(e)) => internal_err(&e),
        Err(e) => {
            tracing::warn!(error = %e, "registration task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn list(State(state): State<AppState>) -> Response {
    let store = state.store.clone();
    let result = tokio::task::spawn_blocking(move || store.list_participants()).await;

    from_blocking(result, |participants| Json(participants).into_response())
}
