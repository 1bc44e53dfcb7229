//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use std::net::SocketAddr;
use tokio::sync::mpsc::error::TrySendError;

use crate::api::middleware::tracing::request_id;
use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::{client_ip, header_str};

/// Redirects a short code to its destination URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code (lookup plus expiry check at read time)
/// 2. Send a click event to the background worker without waiting
/// 3. Return 302 Found
///
/// # Click Tracking
///
/// Click events go to a bounded channel. If the queue is full the click is
/// dropped and counted in `clicks_dropped_total`; the redirect is never
/// delayed or failed by tracking.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 410 Gone if the link has expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.resolve(&code).await?;

    let click_event = ClickEvent::new(
        link.id,
        client_ip(&headers, addr, state.behind_proxy),
        header_str(&headers, header::REFERER.as_str()),
        header_str(&headers, header::USER_AGENT.as_str()),
    )
    .with_request_id(request_id(&headers).map(str::to_string));

    if let Err(e) = state.click_sender.try_send(click_event) {
        metrics::counter!("clicks_dropped_total").increment(1);
        match e {
            TrySendError::Full(event) => {
                tracing::warn!(link_id = event.link_id, "Click queue full, dropping click");
            }
            TrySendError::Closed(event) => {
                tracing::warn!(link_id = event.link_id, "Click queue closed, dropping click");
            }
        }
    }

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, link.destination_url)],
    ))
}
