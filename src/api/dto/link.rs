//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Link, LinkChanges, LinkDraft};

/// Request body for `POST /api/v1/links`.
///
/// The URL is only checked for presence and size; a missing scheme is
/// completed with `https://` by the link service.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    /// Optional custom short code, checked by the code rules of the service.
    pub custom_code: Option<String>,

    #[validate(length(max = 500))]
    pub title: Option<String>,

    #[serde(default)]
    #[validate(length(max = 50, message = "At most 50 tags per link"))]
    pub tags: Vec<String>,

    /// After this instant the short link answers 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<CreateLinkRequest> for LinkDraft {
    fn from(req: CreateLinkRequest) -> Self {
        LinkDraft {
            destination_url: req.url,
            custom_code: req.custom_code.filter(|code| !code.is_empty()),
            title: req.title,
            tags: req.tags,
            expires_at: req.expires_at,
        }
    }
}

/// Request body for `PUT /api/v1/links/{id}`.
///
/// Full replacement: omitted optional fields are cleared.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    #[validate(length(max = 500))]
    pub title: Option<String>,

    #[serde(default)]
    #[validate(length(max = 50, message = "At most 50 tags per link"))]
    pub tags: Vec<String>,

    pub expires_at: Option<DateTime<Utc>>,
}

impl From<UpdateLinkRequest> for LinkChanges {
    fn from(req: UpdateLinkRequest) -> Self {
        LinkChanges {
            destination_url: req.url,
            title: req.title,
            tags: req.tags,
            expires_at: req.expires_at,
        }
    }
}

/// A link as returned by the API.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub short_code: String,
    pub short_url: String,
    pub destination_url: String,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_expired: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    /// Builds the response, deriving `short_url` from the public base URL.
    pub fn from_link(link: Link, base_url: &str) -> Self {
        Self {
            short_url: short_url(base_url, &link.short_code),
            is_expired: link.is_expired(),
            id: link.id,
            short_code: link.short_code,
            destination_url: link.destination_url,
            title: link.title,
            tags: link.tags,
            expires_at: link.expires_at,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Page of links returned by `GET /api/v1/links`.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub items: Vec<LinkResponse>,
    pub limit: i64,
    pub offset: i64,
}

/// Joins the public base URL and a short code.
pub fn short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}
