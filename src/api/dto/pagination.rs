//! Query parameters for link listings.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::application::services::link_service::DEFAULT_PAGE_SIZE;
use crate::domain::repositories::{LinkListQuery, SortMode};

/// Query parameters of `GET /api/v1/links`.
///
/// Uses `serde_with` to parse numbers from query strings. Out-of-range
/// values are clamped by the link service rather than rejected.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub offset: Option<i64>,

    pub search: Option<String>,

    /// `created_desc` (default), `created_asc` or `clicks`; anything else
    /// falls back to the default.
    pub sort: Option<String>,

    /// When set, lists the links carrying this tag instead.
    pub tag: Option<String>,
}

impl ListLinksParams {
    /// Converts the parameters into a repository query.
    ///
    /// # Defaults
    ///
    /// - `limit`: 20
    /// - `offset`: 0
    /// - `sort`: `created_desc`
    pub fn to_query(&self) -> LinkListQuery {
        LinkListQuery {
            limit: self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            offset: self.offset.unwrap_or(0),
            search: self.search.clone(),
            sort: self
                .sort
                .as_deref()
                .map(SortMode::parse_lenient)
                .unwrap_or_default(),
        }
    }
}
