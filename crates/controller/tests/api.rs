use axum::{body::Body, http::Request as HttpRequest, http::StatusCode};
use tower::ServiceExt;

mod support {
    pub mod common;
}
use support::common::*;

#[tokio::test]
async fn register_site_returns_secret_once() {
    let (app, _db) = setup_app().await;

    let created = create_site(&app, "Acme Storefront", "https://acme.example.com").await;
    assert_eq!(created.secret.len(), 48);
    assert!(created.secret.chars().all(|c| c.is_ascii_alphanumeric()));

    // The detail view never echoes the secret back.
    let response = app
        .clone()
        .oneshot(operator_request(
            "GET",
            &format!("/api/v1/sites/{}", created.site_id),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let detail: serde_json::Value = read_json(response).await;
    assert!(detail.get("secret").is_none());
    assert_eq!(detail["status"], "active");
}

#[tokio::test]
async fn register_site_validates_inputs() {
    let (app, _db) = setup_app().await;

    let response = app
        .clone()
        .oneshot(operator_request(
            "POST",
            "/api/v1/sites",
            Some(serde_json::json!({ "name": "  ", "url": "https://acme.example.com" })),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(operator_request(
            "POST",
            "/api/v1/sites",
            Some(serde_json::json!({ "name": "acme", "url": "ftp://acme.example.com" })),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = read_json(response).await;
    assert_eq!(err.code, "bad_request");
}

#[tokio::test]
async fn operator_auth_is_enforced() {
    let (app, _db) = setup_app().await;

    let response = app
        .clone()
        .oneshot(
            HttpRequest::builder()
                .method("GET")
                .uri("/api/v1/sites")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            HttpRequest::builder()
                .method("GET")
                .uri("/api/v1/sites")
                .header("authorization", "Bearer wrong-token")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn health_is_open() {
    let (app, _db) = setup_app().await;

    let response = app
        .clone()
        .oneshot(
            HttpRequest::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = read_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn list_sites_pages_with_total() {
    let (app, _db) = setup_app().await;

    for i in 0..3 {
        create_site(&app, &format!("site-{i}"), "https://client.example.com").await;
    }

    let response = app
        .clone()
        .oneshot(operator_request("GET", "/api/v1/sites?limit=2&offset=0", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let page: SiteSummaryPage = read_json(response).await;
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 3);
    assert_eq!(page.limit, 2);

    let response = app
        .clone()
        .oneshot(operator_request("GET", "/api/v1/sites?limit=0", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_site_stores_maintenance_draft() {
    let (app, _db) = setup_app().await;
    let created = create_site(&app, "acme", "https://acme.example.com").await;

    let response = app
        .clone()
        .oneshot(operator_request(
            "PUT",
            &format!("/api/v1/sites/{}", created.site_id),
            Some(serde_json::json!({
                "maintenance_title": "Scheduled Maintenance",
                "maintenance_text": "Back in an hour."
            })),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let summary: SiteSummary = read_json(response).await;
    assert_eq!(summary.maintenance.title, "Scheduled Maintenance");
    assert_eq!(summary.maintenance.text, "Back in an hour.");
    assert_eq!(summary.name, "acme");
}

#[tokio::test]
async fn delete_site_deregisters() {
    let (app, _db) = setup_app().await;
    let created = create_site(&app, "acme", "https://acme.example.com").await;

    let response = app
        .clone()
        .oneshot(operator_request(
            "DELETE",
            &format!("/api/v1/sites/{}", created.site_id),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(operator_request(
            "GET",
            &format!("/api/v1/sites/{}", created.site_id),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
