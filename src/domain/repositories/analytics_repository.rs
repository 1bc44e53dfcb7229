//! Repository trait for click events and their aggregates.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One row of the per-link daily click counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyClickCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// A grouped count; `key` is `None` for clicks where the attribute was unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: Option<String>,
    pub count: i64,
}

/// Click attribute a breakdown is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDimension {
    Country,
    Referer,
    Device,
}

impl ClickDimension {
    /// Label reported for clicks where the attribute was never set.
    pub fn unset_label(&self) -> &'static str {
        match self {
            ClickDimension::Country | ClickDimension::Device => "Unknown",
            ClickDimension::Referer => "Direct",
        }
    }
}

/// Repository interface for click tracking and analytics queries.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAnalyticsRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_analytics.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Stores a click; storage assigns `id` and `clicked_at`.
    async fn insert_click(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Atomically increments the `(link_id, date)` counter, creating it at 1.
    ///
    /// Must be a single statement so concurrent callers never lose updates.
    async fn upsert_daily_aggregate(&self, link_id: i64, date: NaiveDate) -> Result<(), AppError>;

    /// Counts a link's clicks, optionally only those at or after `since`.
    async fn count_clicks(
        &self,
        link_id: i64,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64, AppError>;

    /// Daily counters for a link from `since` onwards, ascending by date.
    async fn daily_clicks(
        &self,
        link_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<DailyClickCount>, AppError>;

    /// Click counts grouped by `dimension`, largest first.
    ///
    /// `limit` of `None` returns every group.
    async fn breakdown(
        &self,
        link_id: i64,
        dimension: ClickDimension,
        limit: Option<i64>,
    ) -> Result<Vec<GroupCount>, AppError>;

    /// Number of links owned by `owner_id`.
    async fn count_owner_links(&self, owner_id: i64) -> Result<i64, AppError>;

    /// Clicks across every link owned by `owner_id`, optionally since an instant.
    async fn count_owner_clicks(
        &self,
        owner_id: i64,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64, AppError>;
}
