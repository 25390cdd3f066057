//! HTTP API — the service's entire external surface.
//!
//! Five routes: participant registration and listing, message posting and
//! retrieval, and the heartbeat. There is no authentication anywhere — any
//! caller naming a registered participant in the `user` header may act as
//! them.

pub mod response;
pub mod routes_messages;
pub mod routes_participants;
pub mod routes_status;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::store::ChatStore;

#[derive(Clone)]
pub struct AppState {
    pub store: ChatStore,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/participants",
            post(routes_participants::register).get(routes_participants::list),
        )
        .route(
            "/messages",
            post(routes_messages::post_message).get(routes_messages::list_messages),
        )
        .route("/status", post(routes_status::heartbeat))
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB
        .with_state(state)
}

/// Sender identity from the `user` header. Trimmed; None when the header is
/// absent, empty, or not valid visible ASCII.
pub(crate) fn user_header(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("user")?.to_str().ok()?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
