//! API key authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::domain::entities::User;
use crate::utils::client_ip::header_str;
use crate::{error::AppError, state::AppState};

/// Header carrying the raw API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The account a request was authenticated as.
///
/// Inserted into request extensions by [`layer`]; handlers read it with
/// `Extension<AuthenticatedUser>`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Authenticates requests using an account API key.
///
/// # Header Format
///
/// ```text
/// X-API-Key: <key>
/// Authorization: Bearer <key>
/// ```
///
/// `X-API-Key` wins when both are present.
///
/// # Authentication Flow
///
/// 1. Extract the key from `X-API-Key`, else from `Authorization`
/// 2. Hash it and look up the owning account
/// 3. Attach [`AuthenticatedUser`] to the request
/// 4. Continue to next middleware/handler
///
/// # Errors
///
/// Returns `401 Unauthorized` if no key is supplied or it matches no account.
/// The response carries `WWW-Authenticate: Bearer` per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/api/v1/links", get(list_links_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let api_key = match header_str(&parts.headers, API_KEY_HEADER) {
        Some(key) => key.to_string(),
        None => {
            let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
                .await
                .map_err(|_| {
                    AppError::unauthorized(
                        "Unauthorized",
                        serde_json::json!({"reason": "API key is missing or malformed"}),
                    )
                })?;
            token
        }
    };

    let user = st.auth_service.authenticate(&api_key).await?;

    tracing::debug!(user_id = user.id, "Request authenticated");

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(req).await)
}
