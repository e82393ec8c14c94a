#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, Request as HttpRequest},
    Router,
};
use common::api;
use controller::{
    app_state::{AppState, OperatorAuth},
    config::LimitsConfig,
    http::build_router,
    persistence as db,
    persistence::migrations,
    telemetry,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const TEST_OPERATOR_TOKEN: &str = "test-operator-token";

pub type SiteCreateResponse = api::SiteCreateResponse;
pub type SiteSummary = api::SiteSummary;
pub type SiteSummaryPage = api::SiteSummaryPage;
pub type ErrorResponse = api::ErrorResponse;

pub async fn setup_app() -> (Router, db::Db) {
    setup_app_with_timeout(Duration::from_secs(5)).await
}

pub async fn setup_app_with_timeout(dispatch_timeout: Duration) -> (Router, db::Db) {
    let pool = migrations::init_pool("sqlite::memory:")
        .await
        .expect("db init");
    migrations::run_migrations(&pool).await.expect("migrations");

    let state = AppState {
        db: pool.clone(),
        http: reqwest::Client::new(),
        operator_auth: OperatorAuth {
            tokens: vec![TEST_OPERATOR_TOKEN.to_string()],
            header_name: HeaderName::from_static("authorization"),
        },
        dispatch_timeout,
        limits: LimitsConfig { max_field_len: 255 },
        metrics_handle: telemetry::init_metrics_recorder(),
    };

    let app = build_router(state.clone()).with_state(state);
    (app, pool)
}

pub fn operator_request(method: &str, uri: &str, body: Option<serde_json::Value>) -> HttpRequest<Body> {
    let builder = HttpRequest::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {TEST_OPERATOR_TOKEN}"));

    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn create_site(app: &Router, name: &str, url: &str) -> SiteCreateResponse {
    let response = app
        .clone()
        .oneshot(operator_request(
            "POST",
            "/api/v1/sites",
            Some(serde_json::json!({ "name": name, "url": url })),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    read_json(response).await
}
