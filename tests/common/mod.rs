#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;
use tinylink::api::handlers::redirect_handler;
use tinylink::api::routes::{link_routes, service_routes};
use tinylink::domain::entities::{Link, NewLink};
use tinylink::domain::repositories::LinkRepository;
use tinylink::error::AppError;
use tinylink::infrastructure::persistence::MemoryLinkRepository;
use tinylink::state::AppState;

pub const TEST_BASE_URL: &str = "https://tiny.example";

/// State over a fresh in-memory store. The repository is returned too so
/// tests can seed or inspect it directly.
pub fn create_test_state() -> (AppState, Arc<MemoryLinkRepository>) {
    let repo = Arc::new(MemoryLinkRepository::new());
    let state = AppState::new(repo.clone(), Some(TEST_BASE_URL.to_string()));
    (state, repo)
}

/// Routes without rate limiting, mounted the same way as in production.
pub fn create_test_app(state: AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .nest("/api", link_routes().merge(service_routes()))
        .with_state(state)
}

pub async fn create_test_link(repo: &MemoryLinkRepository, code: &str, url: &str) -> Link {
    repo.create(NewLink {
        code: code.to_string(),
        url: url.to_string(),
    })
    .await
    .unwrap()
}

/// A store whose every call fails, as if the database were down.
pub struct UnavailableRepository;

#[async_trait]
impl LinkRepository for UnavailableRepository {
    async fn create(&self, _new_link: NewLink) -> Result<Link, AppError> {
        Err(AppError::storage("connection refused"))
    }

    async fn find_by_code(&self, _code: &str) -> Result<Option<Link>, AppError> {
        Err(AppError::storage("connection refused"))
    }

    async fn list(&self) -> Result<Vec<Link>, AppError> {
        Err(AppError::storage("connection refused"))
    }

    async fn delete(&self, _code: &str) -> Result<bool, AppError> {
        Err(AppError::storage("connection refused"))
    }

    async fn increment_clicks(&self, _code: &str) -> Result<Option<Link>, AppError> {
        Err(AppError::storage("connection refused"))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::storage("connection refused"))
    }
}

pub fn create_unavailable_state() -> AppState {
    AppState::new(Arc::new(UnavailableRepository), None)
}

/// Inserts a fixed peer address, standing in for
/// `into_make_service_with_connect_info` in tests.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
