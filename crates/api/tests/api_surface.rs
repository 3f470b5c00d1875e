//! Router-level tests that exercise the HTTP surface without a live
//! database: a lazy pool defers connecting until a query actually runs, so
//! routes that fail validation first (and the health endpoint's degraded
//! path) can be driven end to end.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use redress_api::config::ServerConfig;
use redress_api::router::build_app_router;
use redress_api::state::AppState;

/// Build the app against a pool pointing at a port nothing listens on.
fn test_app() -> axum::Router {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://127.0.0.1:1/redress")
        .expect("lazy pool from valid URL");

    let config = ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".into()],
        request_timeout_secs: 5,
    };

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let app = test_app();

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = test_app();

    let response = app
        .oneshot(Request::get("/api/v1/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_status_filter_is_rejected_before_any_query() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::get("/api/v1/complaints?status=bogus")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn invalid_urgency_filter_is_rejected() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::get("/api/v1/complaints?urgency=critical")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_since_timestamp_is_rejected() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::get("/api/v1/activity?since=yesterday")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "INVALID_TIMESTAMP");
}

#[tokio::test]
async fn non_numeric_complaint_id_is_rejected() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::get("/api/v1/complaints/abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
