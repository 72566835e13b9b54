//! Host router tests: health, runtime config, SPA fallback and the `/api` forwarder.

mod mock_servers;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use mock_servers::MockBackend;
use riad_booking::config::ServerConfig;
use riad_booking::server::{router, AppState};

fn test_app(api_base_url: &str, dist: &std::path::Path) -> Router {
    let config = ServerConfig {
        port: 0,
        api_base_url: api_base_url.to_string(),
        backend_origin: None,
        dist_dir: dist.to_path_buf(),
        flash_duration_ms: 2500,
    };
    router(AppState::new(config).expect("state should build"))
}

fn dist_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("index.html"),
        "<!doctype html><div id=\"main\"></div>",
    )
    .expect("write index");
    std::fs::write(dir.path().join("app.js"), "console.log('riad')").expect("write js");
    dir
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn healthz_reports_version() {
    let dist = dist_dir();
    let app = test_app("http://127.0.0.1:9/api", dist.path());

    let (status, body) = send(&app, get("/healthz")).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert!(json["git_sha"].is_string());
}

#[tokio::test]
async fn app_config_points_browser_at_forwarder() {
    let dist = dist_dir();
    let app = test_app("http://backend.test:8000/api", dist.path());

    let (status, body) = send(&app, get("/app-config.json")).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["api_base_url"], "/api");
    assert_eq!(json["backend_origin"], "http://backend.test:8000");
    assert_eq!(json["flash_duration_ms"], 2500);
}

#[tokio::test]
async fn static_files_and_client_routes_are_served() {
    let dist = dist_dir();
    let app = test_app("http://127.0.0.1:9/api", dist.path());

    let (status, body) = send(&app, get("/app.js")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"console.log('riad')");

    // Deep links are client-side routes
    for path in ["/listUsers", "/riad/3", "/edit-user/12"] {
        let (status, body) = send(&app, get(path)).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert!(String::from_utf8_lossy(&body).contains("id=\"main\""), "{path}");
    }
}

#[tokio::test]
async fn forwarder_preserves_method_query_auth_and_body() {
    let backend = MockBackend::start().await;
    let dist = dist_dir();
    let app = test_app(&backend.api_base_url(), dist.path());

    let (status, body) = send(&app, get("/api/riads?page=1")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["hydra:totalItems"], 1);

    let reservation = r#"{"firstname":"Salma","room":"/api/rooms/2"}"#;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/reservations")
        .header(header::AUTHORIZATION, "Bearer user-jwt")
        .header(header::CONTENT_TYPE, "application/ld+json")
        .body(Body::from(reservation))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);

    let seen = backend.requests().await;
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].method, Method::GET);
    assert_eq!(seen[0].path_and_query, "/api/riads?page=1");
    assert_eq!(seen[0].authorization, None);
    assert_eq!(seen[1].method, Method::POST);
    assert_eq!(seen[1].authorization.as_deref(), Some("Bearer user-jwt"));
    assert_eq!(seen[1].content_type.as_deref(), Some("application/ld+json"));
    assert_eq!(seen[1].body, reservation.as_bytes());

    backend.stop().await;
}

#[tokio::test]
async fn forwarder_passes_backend_errors_through() {
    let backend = MockBackend::start().await;
    let dist = dist_dir();
    let app = test_app(&backend.api_base_url(), dist.path());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/validate-token")
        .header(header::AUTHORIZATION, "Bearer old")
        .body(Body::from(r#"{"admin":true}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "Expired JWT Token");

    backend.stop().await;
}

#[tokio::test]
async fn unreachable_backend_is_bad_gateway() {
    let dist = dist_dir();
    // Port 9 (discard) is not listening on loopback
    let app = test_app("http://127.0.0.1:9/api", dist.path());

    let (status, body) = send(&app, get("/api/riads")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["message"]
        .as_str()
        .is_some_and(|m| m.starts_with("Backend unreachable")));
}
