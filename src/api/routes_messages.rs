use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::response::{from_blocking, internal_err, validation_err};
use crate::api::{user_header, AppState};
use crate::model::{wall_clock_time, Message, MessageKind};

#[derive(Deserialize)]
pub struct PostMessageRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct ListParams {
    pub limit: Option<String>,
}

pub async fn post_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PostMessageRequest>,
) -> Response {
    let mut errors = Vec::new();

    let to = req.to.as_deref().unwrap_or("").trim().to_string();
    if to.is_empty() {
        errors.push("to must be a non-empty string".to_string());
    }

    let text = req.text.as_deref().unwrap_or("").trim().to_string();
    if text.is_empty() {
        errors.push("text must be a non-empty string".to_string());
    }

    // clients may not forge synthetic status notices
    let kind = match req.kind.as_deref().map(str::trim) {
        Some("message") => Some(MessageKind::Message),
        Some("private_message") => Some(MessageKind::PrivateMessage),
        _ => {
            errors.push("type must be either message or private_message".to_string());
            None
        }
    };

    let from = user_header(&headers);
    if from.is_none() {
        errors.push("user header is required".to_string());
    }

    if !errors.is_empty() {
        return validation_err(errors);
    }
    let (from, kind) = (from.unwrap(), kind.unwrap());

    let store = state.store.clone();
    let sender = from.clone();
    let exists = tokio::task::spawn_blocking(move || store.participant_exists(&sender)).await;
    match exists {
        Ok(Ok(true)) => {}
        Ok(Ok(false)) => {
            return validation_err(vec![format!("participant {from} is not registered")]);
        }
        Ok(Err(e)) => return internal_err(&e),
        Err(e) => {
            tracing::warn!(error = %e, "participant lookup task failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    let msg = Message {
        from,
        to,
        text,
        kind,
        time: wall_clock_time(),
    };
    let store = state.store.clone();
    let result = tokio::task::spawn_blocking(move || store.insert_message(&msg)).await;

    from_blocking(result, |()| StatusCode::CREATED.into_response())
}

pub async fn list_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    let viewer = match user_header(&headers) {
        Some(user) => user,
        None => return validation_err(vec!["user header is required".to_string()]),
    };

    let limit = match params.limit.as_deref() {
        None => None,
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                return validation_err(vec!["limit must be a positive integer".to_string()]);
            }
        },
    };

    let store = state.store.clone();
    let result =
        tokio::task::spawn_blocking(move || store.visible_messages(&viewer, limit)).await;

    from_blocking(result, |messages| Json(messages).into_response())
}
