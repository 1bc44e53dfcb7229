//! Handlers for account-scoped endpoints.

use axum::{Extension, Json, extract::State};

use crate::api::dto::profile::{ProfileResponse, TagsResponse};
use crate::api::middleware::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the authenticated account with its tier limits.
///
/// # Endpoint
///
/// `GET /api/v1/profile`
pub async fn profile_handler(
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Json<ProfileResponse> {
    Json(user.into())
}

/// Lists the distinct tags used across the account's links.
///
/// # Endpoint
///
/// `GET /api/v1/tags`
pub async fn tags_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Json<TagsResponse>, AppError> {
    let tags = state.link_service.get_user_tags(user.id).await?;

    Ok(Json(TagsResponse { tags }))
}
