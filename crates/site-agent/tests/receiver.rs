use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{Request as HttpRequest, StatusCode},
    routing::get,
    Router,
};
use common::api::{MaintenancePresentation, SiteStatus};
use http_body_util::BodyExt;
use site_agent::{
    build_router,
    state::{MemoryStatusStore, SiteState},
    telemetry, AgentState,
};
use tower::ServiceExt;

const SECRET: &str = "abc123";

fn test_state(allowed_origins: &[&str], store: Arc<MemoryStatusStore>) -> AgentState {
    AgentState {
        secret: SECRET.to_string(),
        allowed_origins: allowed_origins.iter().map(|s| s.to_string()).collect(),
        store,
        sessions: site_agent::session::SessionStore::new(),
        maintenance_template: None,
        metrics_handle: telemetry::init_metrics_recorder(),
    }
}

fn test_app(state: AgentState, peer: SocketAddr) -> Router {
    let site = Router::<AgentState>::new().route("/", get(|| async { "NORMAL_CONTENT" }));
    build_router(state, site).layer(MockConnectInfo(peer))
}

fn peer(addr: &str) -> SocketAddr {
    format!("{addr}:51234").parse().expect("socket addr")
}

fn update_request(body: serde_json::Value) -> HttpRequest<Body> {
    HttpRequest::builder()
        .method("POST")
        .uri("/fleetgate/v1/update-status")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn maintenance_update_applies_and_is_idempotent() {
    let store = Arc::new(MemoryStatusStore::new());
    let app = test_app(test_state(&[], store.clone()), peer("203.0.113.9"));

    let body = serde_json::json!({
        "key": SECRET,
        "status": "maintenance",
        "maintenance_title": "Scheduled Maintenance",
        "maintenance_logo_url": "https://example.com/logo.png",
        "maintenance_text": "<p>Back <strong>soon</strong>.</p>"
    });

    let response = app
        .clone()
        .oneshot(update_request(body.clone()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let ack = read_json(response).await;
    assert_eq!(ack["success"], true);
    assert_eq!(ack["message"], "Status updated to maintenance");

    let first = store.load().expect("load");
    assert_eq!(first.status, SiteStatus::Maintenance);
    let presentation = first.presentation.clone().expect("presentation stored");
    assert_eq!(presentation.title, "Scheduled Maintenance");
    assert_eq!(presentation.logo_url, "https://example.com/logo.png");
    assert_eq!(presentation.text, "<p>Back <strong>soon</strong>.</p>");

    // Same payload again: same success, same stored state.
    let response = app
        .clone()
        .oneshot(update_request(body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.load().expect("load"), first);
}

#[tokio::test]
async fn active_update_erases_presentation() {
    let store = Arc::new(MemoryStatusStore::with_state(SiteState::maintenance(
        MaintenancePresentation {
            title: "Down".into(),
            logo_url: "https://example.com/logo.png".into(),
            text: "Old copy".into(),
        },
    )));
    let app = test_app(test_state(&[], store.clone()), peer("203.0.113.9"));

    let response = app
        .oneshot(update_request(serde_json::json!({
            "key": SECRET,
            "status": "active"
        })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let state = store.load().expect("load");
    assert_eq!(state.status, SiteStatus::Active);
    assert!(state.presentation.is_none(), "no stale copy may linger");
}

#[tokio::test]
async fn wrong_key_is_rejected_and_state_unchanged() {
    let store = Arc::new(MemoryStatusStore::new());
    let app = test_app(test_state(&[], store.clone()), peer("203.0.113.9"));

    // Literal case from the protocol contract: secret abc123, key abc124.
    let response = app
        .oneshot(update_request(serde_json::json!({
            "key": "abc124",
            "status": "maintenance"
        })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let err = read_json(response).await;
    assert_eq!(err["code"], "invalid_key");

    assert_eq!(store.load().expect("load"), SiteState::default());
}

#[tokio::test]
async fn missing_or_empty_key_is_rejected() {
    let store = Arc::new(MemoryStatusStore::new());
    let state = test_state(&[], store.clone());

    let response = test_app(state.clone(), peer("203.0.113.9"))
        .oneshot(update_request(serde_json::json!({
            "key": "",
            "status": "maintenance"
        })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A request without the key field at all fails the same way.
    let response = test_app(state, peer("203.0.113.9"))
        .oneshot(update_request(serde_json::json!({
            "status": "maintenance"
        })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let err = read_json(response).await;
    assert_eq!(err["code"], "invalid_key");

    assert_eq!(store.load().expect("load"), SiteState::default());
}

#[tokio::test]
async fn origin_allow_list_rejects_unlisted_caller() {
    let store = Arc::new(MemoryStatusStore::new());
    let state = test_state(&["10.0.0.1", "10.0.0.2"], store.clone());

    // Valid secret, wrong caller: the origin gate fires first.
    let response = test_app(state.clone(), peer("10.0.0.3"))
        .oneshot(update_request(serde_json::json!({
            "key": SECRET,
            "status": "maintenance"
        })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let err = read_json(response).await;
    assert_eq!(err["code"], "forbidden_origin");
    assert_eq!(store.load().expect("load"), SiteState::default());

    // Listed caller passes.
    let response = test_app(state, peer("10.0.0.1"))
        .oneshot(update_request(serde_json::json!({
            "key": SECRET,
            "status": "maintenance"
        })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        store.load().expect("load").status,
        SiteStatus::Maintenance
    );
}

#[tokio::test]
async fn unrecognized_status_is_rejected_with_400() {
    let store = Arc::new(MemoryStatusStore::new());
    let app = test_app(test_state(&[], store.clone()), peer("203.0.113.9"));

    let response = app
        .oneshot(update_request(serde_json::json!({
            "key": SECRET,
            "status": "paused"
        })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err = read_json(response).await;
    assert_eq!(err["code"], "invalid_status");

    assert_eq!(store.load().expect("load"), SiteState::default());
}

#[tokio::test]
async fn pushed_fields_are_sanitized_before_storage() {
    let store = Arc::new(MemoryStatusStore::new());
    let app = test_app(test_state(&[], store.clone()), peer("203.0.113.9"));

    let response = app
        .oneshot(update_request(serde_json::json!({
            "key": SECRET,
            "status": "maintenance",
            "maintenance_title": "Down <b>now</b>",
            "maintenance_logo_url": "javascript:alert(1)",
            "maintenance_text": "<script>alert(1)</script><p>ok</p>"
        })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let presentation = store
        .load()
        .expect("load")
        .presentation
        .expect("presentation stored");
    assert_eq!(presentation.title, "Down now");
    assert_eq!(presentation.logo_url, "");
    assert_eq!(presentation.text, "alert(1)<p>ok</p>");
}

#[tokio::test]
async fn unspecified_presentation_fields_store_empty() {
    let store = Arc::new(MemoryStatusStore::new());
    let app = test_app(test_state(&[], store.clone()), peer("203.0.113.9"));

    let response = app
        .oneshot(update_request(serde_json::json!({
            "key": SECRET,
            "status": "maintenance"
        })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let presentation = store
        .load()
        .expect("load")
        .presentation
        .expect("presentation stored");
    assert!(presentation.is_empty());
}
