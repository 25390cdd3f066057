//! API integration tests for registration, messaging, heartbeat, and the
//! interaction between eviction and message visibility.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use batepapo::api::{router, AppState};
use batepapo::model::{now_millis, Participant};
use batepapo::store::ChatStore;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Create test store and the production router over it.
fn create_test_app() -> (ChatStore, axum::Router) {
    let store = ChatStore::open_memory().unwrap();
    let app = router(AppState {
        store: store.clone(),
    });
    (store, app)
}

async fn register(app: &axum::Router, name: &str) -> StatusCode {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/participants")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "name": name }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

async fn post_message(
    app: &axum::Router,
    user: &str,
    to: &str,
    text: &str,
    kind: &str,
) -> StatusCode {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/messages")
                .header("content-type", "application/json")
                .header("user", user)
                .body(Body::from(
                    json!({ "to": to, "text": text, "type": kind }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

async fn get_messages(app: &axum::Router, user: &str, limit: Option<&str>) -> (StatusCode, Value) {
    let uri = match limit {
        Some(n) => format!("/messages?limit={n}"),
        None => "/messages".to_string(),
    };
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header("user", user)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn heartbeat(app: &axum::Router, user: &str) -> StatusCode {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/status")
                .header("user", user)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

fn texts(messages: &Value) -> Vec<String> {
    messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_registration_creates_participant_and_join_notice() {
    let (store, app) = create_test_app();

    assert_eq!(register(&app, "ana").await, StatusCode::CREATED);
    assert_eq!(store.participant_count().unwrap(), 1);

    let (status, messages) = get_messages(&app, "bia", None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["from"], "ana");
    assert_eq!(messages[0]["to"], "Todos");
    assert_eq!(messages[0]["text"], "entra na sala...");
    assert_eq!(messages[0]["type"], "status");
}

#[tokio::test]
async fn test_duplicate_registration_returns_conflict() {
    let (store, app) = create_test_app();

    assert_eq!(register(&app, "ana").await, StatusCode::CREATED);
    assert_eq!(register(&app, "ana").await, StatusCode::CONFLICT);
    assert_eq!(store.participant_count().unwrap(), 1);
}

#[tokio::test]
async fn test_blank_name_returns_field_errors() {
    let (store, app) = create_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/participants")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "name": "   " }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let errors: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(errors.as_array().unwrap().len(), 1);
    assert_eq!(store.participant_count().unwrap(), 0);
}

#[tokio::test]
async fn test_participant_listing_uses_wire_field_names() {
    let (_store, app) = create_test_app();
    register(&app, "ana").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/participants")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let participants: Value = serde_json::from_slice(&body).unwrap();
    let participants = participants.as_array().unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0]["name"], "ana");
    assert!(participants[0]["lastStatus"].is_i64());
}

#[tokio::test]
async fn test_posting_from_unregistered_sender_is_unprocessable() {
    let (store, app) = create_test_app();

    let status = post_message(&app, "ghost", "Todos", "oi", "message").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(store.message_count().unwrap(), 0);
}

#[tokio::test]
async fn test_posting_collects_all_field_errors() {
    let (_store, app) = create_test_app();
    register(&app, "ana").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/messages")
                .header("content-type", "application/json")
                .header("user", "ana")
                .body(Body::from(
                    json!({ "to": "", "text": "  ", "type": "status" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let errors: Value = serde_json::from_slice(&body).unwrap();
    // to, text, and the forbidden status type
    assert_eq!(errors.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_missing_user_header_on_post_is_unprocessable() {
    let (_store, app) = create_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/messages")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "to": "Todos", "text": "oi", "type": "message" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_private_message_visibility() {
    let (_store, app) = create_test_app();
    register(&app, "ana").await;
    register(&app, "bia").await;
    register(&app, "carla").await;

    let status = post_message(&app, "ana", "bia", "segredo", "private_message").await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, for_carla) = get_messages(&app, "carla", None).await;
    assert!(!texts(&for_carla).contains(&"segredo".to_string()));

    let (_, for_ana) = get_messages(&app, "ana", None).await;
    assert!(texts(&for_ana).contains(&"segredo".to_string()));

    let (_, for_bia) = get_messages(&app, "bia", None).await;
    assert!(texts(&for_bia).contains(&"segredo".to_string()));
}

#[tokio::test]
async fn test_limit_returns_chronological_tail() {
    let (_store, app) = create_test_app();
    register(&app, "ana").await;
    for i in 1..=5 {
        post_message(&app, "ana", "Todos", &format!("msg {i}"), "message").await;
    }

    // visible log is the join notice plus five messages
    let (status, tail) = get_messages(&app, "bia", Some("3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(texts(&tail), vec!["msg 3", "msg 4", "msg 5"]);

    let (_, all) = get_messages(&app, "bia", Some("50")).await;
    assert_eq!(all.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_invalid_limit_is_unprocessable() {
    let (_store, app) = create_test_app();

    let (status, _) = get_messages(&app, "ana", Some("abc")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = get_messages(&app, "ana", Some("0")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_heartbeat_refreshes_liveness() {
    let (store, app) = create_test_app();
    let stale = now_millis() - 60_000;
    store
        .register_participant(&Participant {
            name: "ana".to_string(),
            last_status: stale,
        })
        .unwrap();

    assert_eq!(heartbeat(&app, "ana").await, StatusCode::OK);

    let refreshed = store.get_participant("ana").unwrap().unwrap();
    assert!(refreshed.last_status > stale);
}

#[tokio::test]
async fn test_heartbeat_from_unknown_sender_returns_not_found() {
    let (_store, app) = create_test_app();
    assert_eq!(heartbeat(&app, "ghost").await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_eviction_emits_leave_notice_visible_over_http() {
    let (store, app) = create_test_app();
    register(&app, "ana").await;
    store
        .touch_participant("ana", now_millis() - 60_000)
        .unwrap();

    let evicted = store.evict_inactive(now_millis() - 10_000).unwrap();
    assert_eq!(evicted, vec!["ana".to_string()]);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/participants")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let participants: Value = serde_json::from_slice(&body).unwrap();
    assert!(participants.as_array().unwrap().is_empty());

    let (_, messages) = get_messages(&app, "bia", None).await;
    assert!(texts(&messages).contains(&"sai da sala...".to_string()));
}
