//! Application-wide error type and its HTTP mapping.
//!
//! [`AppError`] flows unchanged from repositories through services up to the
//! handlers, where [`IntoResponse`] turns it into a JSON error body:
//!
//! ```json
//! { "error": { "code": "quota_exceeded", "message": "...", "details": {} } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload, also embedded in per-item batch results.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("Short code must be between 3 and 20 characters")]
    InvalidCodeLength { length: usize },

    #[error("Short code can only contain letters, numbers, and hyphens")]
    InvalidCodeCharset { code: String },

    #[error("Short code is reserved")]
    ReservedCode { code: String },

    #[error("Short code already exists")]
    CodeTaken { code: String },

    #[error("Failed to generate a unique short code after {attempts} attempts")]
    CodeExhausted { attempts: usize },

    #[error("Link limit reached for the {tier} tier ({limit} links)")]
    QuotaExceeded { tier: String, limit: i64 },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The entity exists but belongs to another account.
    #[error("{message}")]
    Forbidden { message: String, details: Value },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("{message}")]
    Gone { message: String, details: Value },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    #[error("Storage error: {0}")]
    Storage(#[source] sqlx::Error),

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn gone(message: impl Into<String>, details: Value) -> Self {
        Self::Gone {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Collapses an ownership mismatch into a plain not-found.
    ///
    /// Handlers use this so that non-owners cannot learn which link ids exist.
    pub fn mask_forbidden(self) -> Self {
        match self {
            Self::Forbidden { details, .. } => Self::not_found("Link not found", details),
            other => other,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. }
            | Self::InvalidCodeLength { .. }
            | Self::InvalidCodeCharset { .. }
            | Self::ReservedCode { .. } => StatusCode::BAD_REQUEST,
            Self::CodeTaken { .. } | Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::QuotaExceeded { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } | Self::Forbidden { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Gone { .. } => StatusCode::GONE,
            Self::CodeExhausted { .. } | Self::Storage(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Builds the serializable payload for this error.
    ///
    /// Storage failures never leak the underlying database message.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, details) = match self {
            Self::Validation { details, .. } => ("validation_error", details.clone()),
            Self::InvalidCodeLength { length } => {
                ("invalid_code_length", json!({ "provided_length": length }))
            }
            Self::InvalidCodeCharset { code } => ("invalid_code_charset", json!({ "code": code })),
            Self::ReservedCode { code } => ("reserved_code", json!({ "code": code })),
            Self::CodeTaken { code } => ("code_taken", json!({ "code": code })),
            Self::CodeExhausted { attempts } => {
                ("code_exhausted", json!({ "attempts": attempts }))
            }
            Self::QuotaExceeded { tier, limit } => {
                ("quota_exceeded", json!({ "tier": tier, "limit": limit }))
            }
            // Forbidden is reported as not_found so ownership is never revealed.
            Self::NotFound { details, .. } | Self::Forbidden { details, .. } => {
                ("not_found", details.clone())
            }
            Self::Unauthorized { details, .. } => ("unauthorized", details.clone()),
            Self::Gone { details, .. } => ("gone", details.clone()),
            Self::Conflict { details, .. } => ("conflict", details.clone()),
            Self::Storage(_) => ("internal_error", json!({})),
            Self::Internal { details, .. } => ("internal_error", details.clone()),
        };

        let message = match self {
            Self::Forbidden { .. } => "Link not found".to_string(),
            Self::Storage(_) => "Database error".to_string(),
            other => other.to_string(),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let mut response = (
            status,
            Json(ErrorBody {
                error: self.to_error_info(),
            }),
        )
            .into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        AppError::Storage(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InvalidCodeLength { length: 2 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::CodeTaken {
                code: "abc".into()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::QuotaExceeded {
                tier: "free".into(),
                limit: 50
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::gone("expired", json!({})).status_code(),
            StatusCode::GONE
        );
        assert_eq!(
            AppError::Storage(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_forbidden_is_reported_as_not_found() {
        let err = AppError::forbidden("Not the owner", json!({ "link_id": 7 }));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let info = err.to_error_info();
        assert_eq!(info.code, "not_found");
        assert_eq!(info.message, "Link not found");
    }

    #[test]
    fn test_mask_forbidden() {
        let masked = AppError::forbidden("Not the owner", json!({})).mask_forbidden();
        assert!(matches!(masked, AppError::NotFound { .. }));

        let untouched = AppError::gone("expired", json!({})).mask_forbidden();
        assert!(matches!(untouched, AppError::Gone { .. }));
    }

    #[test]
    fn test_storage_error_hides_cause() {
        let info = AppError::Storage(sqlx::Error::PoolTimedOut).to_error_info();
        assert_eq!(info.code, "internal_error");
        assert_eq!(info.message, "Database error");
    }

    #[test]
    fn test_quota_message() {
        let err = AppError::QuotaExceeded {
            tier: "free".into(),
            limit: 50,
        };
        assert!(err.to_string().contains("free"));
        assert!(err.to_string().contains("50"));
    }
}
