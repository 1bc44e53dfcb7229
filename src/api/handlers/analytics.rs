//! Handlers for analytics endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::analytics::{LinkStatsResponse, UserAnalyticsResponse};
use crate::api::middleware::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Returns click analytics for one of the account's links.
///
/// # Endpoint
///
/// `GET /api/v1/links/{id}/stats`
///
/// # Response
///
/// ```json
/// {
///   "link_id": 1,
///   "short_code": "abc1234",
///   "total_clicks": 42,
///   "last_30_days": 17,
///   "daily_clicks": [{ "date": "2026-10-01", "clicks": 3 }],
///   "countries": [{ "label": "Unknown", "count": 42 }],
///   "referers": [{ "label": "Direct", "count": 30 }],
///   "device_types": [{ "label": "mobile", "count": 25 }]
/// }
/// ```
///
/// # Errors
///
/// Returns 404 both for unknown ids and for links of other accounts.
pub async fn link_stats_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<LinkStatsResponse>, AppError> {
    let link = state
        .link_service
        .get_link(id, user.id)
        .await
        .map_err(AppError::mask_forbidden)?;

    let stats = state.click_tracker.get_link_stats(link.id).await?;

    Ok(Json(LinkStatsResponse::new(link.id, link.short_code, stats)))
}

/// Returns account-wide totals.
///
/// # Endpoint
///
/// `GET /api/v1/analytics`
pub async fn user_analytics_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Json<UserAnalyticsResponse>, AppError> {
    let analytics = state.click_tracker.get_user_analytics(user.id).await?;

    Ok(Json(analytics.into()))
}
