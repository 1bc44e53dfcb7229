#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo, middleware};
use axum_test::TestServer;
use linkstat::api::middleware::auth;
use linkstat::api::routes::protected_routes;
use linkstat::application::services::auth_service::hash_api_key;
use linkstat::domain::click_event::ClickEvent;
use linkstat::state::AppState;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "https://sho.rt";

/// Inserts an account whose API key is `api_key` and returns its id.
pub async fn create_test_user(pool: &PgPool, email: &str, tier: &str, api_key: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (email, subscription_tier, api_key_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(email)
    .bind(tier)
    .bind(hash_api_key(SIGNING_SECRET, api_key))
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_link(pool: &PgPool, owner_id: i64, code: &str, url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (owner_id, short_code, destination_url) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(owner_id)
    .bind(code)
    .bind(url)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_expired_link(pool: &PgPool, owner_id: i64, code: &str, url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (owner_id, short_code, destination_url, expires_at) \
         VALUES ($1, $2, $3, NOW() - INTERVAL '1 hour') RETURNING id",
    )
    .bind(owner_id)
    .bind(code)
    .bind(url)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_tagged_link(
    pool: &PgPool,
    owner_id: i64,
    code: &str,
    tags: &[&str],
) -> i64 {
    let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
    sqlx::query_scalar(
        "INSERT INTO links (owner_id, short_code, destination_url, tags) \
         VALUES ($1, $2, 'https://example.com', $3) RETURNING id",
    )
    .bind(owner_id)
    .bind(code)
    .bind(tags)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_click(
    pool: &PgPool,
    link_id: i64,
    country: Option<&str>,
    referer: Option<&str>,
    device: Option<&str>,
) {
    sqlx::query(
        "INSERT INTO clicks (link_id, ip_address, country_code, referer, device_type) \
         VALUES ($1, '10.0.0.1', $2, $3, $4)",
    )
    .bind(link_id)
    .bind(country)
    .bind(referer)
    .bind(device)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn create_test_state(pool: PgPool) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(100);

    let state = AppState::new(
        Arc::new(pool),
        tx,
        BASE_URL,
        false,
        SIGNING_SECRET.to_string(),
    );

    (state, rx)
}

/// Test server exposing the authenticated API under `/api/v1`.
pub fn make_api_server(pool: PgPool) -> TestServer {
    let (state, _rx) = create_test_state(pool);
    let api = protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
    let app = Router::new().nest("/api/v1", api).with_state(state);

    TestServer::new(app).unwrap()
}

/// Inserts a fixed `ConnectInfo` so handlers extracting the peer address
/// work without a real socket.
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
