//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`      - Short link redirect (public)
//! - `GET  /health`      - Health check: DB, click queue (public)
//! - `/api/v1/*`         - REST API (API key required)
//!
//! # Middleware
//!
//! - **Request id** - `x-request-id` assigned when missing and echoed back
//! - **Tracing** - Structured request/response logging under the request id
//! - **Authentication** - API key (API routes only)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::{Layer, ServiceBuilder};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let router = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", api_router)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(tracing::set_request_id())
                .layer(tracing::layer())
                .layer(tracing::propagate_request_id()),
        );

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
