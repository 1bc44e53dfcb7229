//! API route configuration.
//!
//! All API endpoints require API key authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, link_stats_handler,
    list_links_handler, profile_handler, tags_handler, update_link_handler,
    user_analytics_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, protected by API key authentication.
///
/// # Endpoints
///
/// - `POST   /links`            - Create a short link
/// - `GET    /links`            - List links (paging, search, sort, tag)
/// - `GET    /links/{id}`       - Fetch one link
/// - `PUT    /links/{id}`       - Replace a link's mutable fields
/// - `DELETE /links/{id}`       - Delete a link and its clicks
/// - `GET    /links/{id}/stats` - Click analytics for a link
/// - `GET    /tags`             - Distinct tags of the account
/// - `GET    /analytics`        - Account-wide totals
/// - `GET    /profile`          - Account and tier limits
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{id}",
            get(get_link_handler)
                .put(update_link_handler)
                .delete(delete_link_handler),
        )
        .route("/links/{id}/stats", get(link_stats_handler))
        .route("/tags", get(tags_handler))
        .route("/analytics", get(user_analytics_handler))
        .route("/profile", get(profile_handler))
}
