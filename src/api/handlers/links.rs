//! Handlers for link management endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkListResponse, LinkResponse, UpdateLinkRequest};
use crate::api::dto::pagination::ListLinksParams;
use crate::api::middleware::auth::AuthenticatedUser;
use crate::application::services::link_service::MAX_PAGE_SIZE;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for the authenticated account.
///
/// # Endpoint
///
/// `POST /api/v1/links`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "example.com/docs",
///   "custom_code": "docs",        // optional
///   "title": "Documentation",     // optional
///   "tags": ["work"],             // optional
///   "expires_at": "2026-12-31T00:00:00Z" // optional
/// }
/// ```
///
/// # Errors
///
/// - 400 for invalid input or custom code rules
/// - 403 when the tier link quota is reached
/// - 409 when the custom code is taken
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(user.id, payload.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, &state.base_url)),
    ))
}

/// Lists the authenticated account's links.
///
/// # Endpoint
///
/// `GET /api/v1/links`
///
/// # Query Parameters
///
/// - `limit` (optional): page size, default 20, clamped to 1-100
/// - `offset` (optional): default 0
/// - `search` (optional): substring of code, destination or title
/// - `sort` (optional): `created_desc`, `created_asc` or `clicks`
/// - `tag` (optional): only links carrying this tag, newest first (`search`
///   and `sort` ignored)
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    params: Result<Query<ListLinksParams>, QueryRejection>,
) -> Result<Json<LinkListResponse>, AppError> {
    let Query(params) = params.map_err(|e| {
        AppError::bad_request("Invalid query parameters", json!({ "reason": e.body_text() }))
    })?;

    let query = params.to_query();
    let (limit, offset) = (query.limit, query.offset);

    let links = match params.tag.as_deref().filter(|tag| !tag.is_empty()) {
        Some(tag) => {
            state
                .link_service
                .list_links_by_tag(user.id, tag, limit, offset)
                .await?
        }
        None => state.link_service.list_links(user.id, query).await?,
    };

    let items = links
        .into_iter()
        .map(|link| LinkResponse::from_link(link, &state.base_url))
        .collect();

    Ok(Json(LinkListResponse {
        items,
        limit: limit.clamp(1, MAX_PAGE_SIZE),
        offset: offset.max(0),
    }))
}

/// Returns one of the authenticated account's links.
///
/// # Endpoint
///
/// `GET /api/v1/links/{id}`
///
/// # Errors
///
/// Returns 404 both for unknown ids and for links of other accounts.
pub async fn get_link_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state
        .link_service
        .get_link(id, user.id)
        .await
        .map_err(AppError::mask_forbidden)?;

    Ok(Json(LinkResponse::from_link(link, &state.base_url)))
}

/// Replaces the mutable fields of a link.
///
/// # Endpoint
///
/// `PUT /api/v1/links/{id}`
pub async fn update_link_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .update_link(id, user.id, payload.into())
        .await
        .map_err(AppError::mask_forbidden)?;

    Ok(Json(LinkResponse::from_link(link, &state.base_url)))
}

/// Deletes a link and its click history.
///
/// # Endpoint
///
/// `DELETE /api/v1/links/{id}`
///
/// Returns 204 No Content on success.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(id, user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
