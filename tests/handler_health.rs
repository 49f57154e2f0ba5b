mod common;

use axum::http::StatusCode;
use axum_test::TestServer;

#[tokio::test]
async fn test_health_endpoint_success() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server.get("/api/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["storage"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server.get("/api/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("storage").is_some());
}

#[tokio::test]
async fn test_health_endpoint_storage_down() {
    let app = common::create_test_app(common::create_unavailable_state());
    let server = TestServer::new(app).unwrap();

    let response = server.get("/api/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["storage"]["status"], "error");
    assert_eq!(json["checks"]["storage"]["message"], "Storage unreachable");
}

#[tokio::test]
async fn test_health_is_not_a_short_code() {
    let (state, repo) = common::create_test_state();
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    common::create_test_link(&repo, "health", "https://example.com").await;

    server.get("/api/health").await.assert_status_ok();
    server.get("/health").await.assert_status(StatusCode::FOUND);
}
