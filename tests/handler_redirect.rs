mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use tinylink::domain::repositories::LinkRepository;

#[tokio::test]
async fn test_redirect_success() {
    let (state, repo) = common::create_test_state();
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    common::create_test_link(&repo, "redir1", "https://example.com/target?q=1").await;

    let response = server.get("/redir1").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        "https://example.com/target?q=1"
    );
}

#[tokio::test]
async fn test_redirect_records_click() {
    let (state, repo) = common::create_test_state();
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    common::create_test_link(&repo, "clickme", "https://example.com").await;

    server.get("/clickme").await.assert_status(StatusCode::FOUND);
    server.get("/clickme").await.assert_status(StatusCode::FOUND);

    let link = repo.find_by_code("clickme").await.unwrap().unwrap();
    assert_eq!(link.clicks, 2);
    assert!(link.last_clicked.is_some());

    let response = server.get("/api/links/clickme").await;
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["link"]["clicks"], 2);
    assert!(json["link"]["lastClicked"].is_string());
}

#[tokio::test]
async fn test_redirect_not_found() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server.get("/nothere").await;

    response.assert_status_not_found();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "not_found"
    );
}

#[tokio::test]
async fn test_redirect_malformed_code() {
    let (state, repo) = common::create_test_state();
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    common::create_test_link(&repo, "abcdef", "https://example.com").await;

    server.get("/abc").await.assert_status_not_found();
    server.get("/abcdefghij").await.assert_status_not_found();
    server.get("/abc_def").await.assert_status_not_found();

    let link = repo.find_by_code("abcdef").await.unwrap().unwrap();
    assert_eq!(link.clicks, 0);
}

#[tokio::test]
async fn test_redirect_deleted_link() {
    let (state, repo) = common::create_test_state();
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    common::create_test_link(&repo, "byebye", "https://example.com").await;
    server
        .delete("/api/links/byebye")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server.get("/byebye").await.assert_status_not_found();
}
