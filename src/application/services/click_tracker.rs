//! Click recording and analytics rollups.

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinSet};
use tracing::Instrument;

use crate::domain::click_event::ClickEvent;
use crate::domain::click_worker::ClickSink;
use crate::domain::entities::{Click, DeviceType, NewClick};
use crate::domain::repositories::{AnalyticsRepository, ClickDimension, DailyClickCount};
use crate::error::AppError;

/// Length of the rolling window used by [`ClickTracker::get_link_stats`].
pub const STATS_WINDOW_DAYS: i64 = 30;

/// Number of entries kept in the country and referer breakdowns.
pub const TOP_BREAKDOWN_ENTRIES: i64 = 10;

/// One entry of a breakdown, with unset attributes already labelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountBucket {
    pub label: String,
    pub count: i64,
}

/// Per-link analytics summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClickStats {
    pub total_clicks: i64,
    pub last_30_days: i64,
    /// Existing daily counters inside the window; days without clicks are absent.
    pub daily_clicks: Vec<DailyClickCount>,
    pub countries: Vec<CountBucket>,
    pub referers: Vec<CountBucket>,
    pub device_types: Vec<CountBucket>,
}

/// Account-wide analytics summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAnalytics {
    pub total_links: i64,
    pub total_clicks: i64,
    pub clicks_this_month: i64,
}

/// Records clicks and computes analytics from stored clicks and aggregates.
///
/// Recording is invoked by the click worker, never inline with a redirect.
pub struct ClickTracker<R: AnalyticsRepository + 'static> {
    repository: Arc<R>,
    pending_upserts: Mutex<JoinSet<()>>,
}

impl<R: AnalyticsRepository + 'static> ClickTracker<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            pending_upserts: Mutex::new(JoinSet::new()),
        }
    }

    /// Persists one click and schedules its daily aggregate increment.
    ///
    /// Empty header values are stored as absent and the device type is
    /// derived from the user agent. The aggregate upsert runs in its own task
    /// and is not awaited here: its failure is logged and counted but does
    /// not fail the click. [`ClickTracker::drain_pending`] waits for it.
    ///
    /// # Errors
    ///
    /// Returns the repository error if the click insert fails. No retry is
    /// attempted.
    pub async fn track_click(&self, event: ClickEvent) -> Result<Click, AppError> {
        let user_agent = non_empty(event.user_agent);
        let new_click = NewClick {
            link_id: event.link_id,
            ip_address: event.ip_address,
            referer: non_empty(event.referer),
            device_type: user_agent.as_deref().map(DeviceType::from_user_agent),
            user_agent,
            country_code: None,
        };

        let click = self.repository.insert_click(new_click).await?;

        let repository = self.repository.clone();
        let link_id = click.link_id;
        let date = click.aggregate_date();

        let mut pending = self.pending_upserts.lock().await;
        while let Some(result) = pending.try_join_next() {
            log_upsert_outcome(result);
        }
        pending.spawn(
            async move {
                if let Err(e) = repository.upsert_daily_aggregate(link_id, date).await {
                    metrics::counter!("daily_aggregate_failed_total").increment(1);
                    tracing::warn!(error = %e, %date, "Failed to update daily click aggregate");
                }
            }
            .in_current_span(),
        );

        Ok(click)
    }

    /// Waits until every aggregate upsert started so far has finished.
    pub async fn drain_pending(&self) {
        let mut pending = std::mem::take(&mut *self.pending_upserts.lock().await);
        while let Some(result) = pending.join_next().await {
            log_upsert_outcome(result);
        }
    }

    /// Builds the analytics summary of one link.
    ///
    /// Callers check link ownership first; an unknown link yields zeros and
    /// empty lists.
    #[tracing::instrument(skip(self))]
    pub async fn get_link_stats(&self, link_id: i64) -> Result<ClickStats, AppError> {
        let window_start = window_start(Utc::now());

        let total_clicks = self.repository.count_clicks(link_id, None).await?;
        let last_30_days = self
            .repository
            .count_clicks(link_id, Some(window_start))
            .await?;
        let daily_clicks = self
            .repository
            .daily_clicks(link_id, window_start.date_naive())
            .await?;

        let countries = self
            .breakdown(link_id, ClickDimension::Country, Some(TOP_BREAKDOWN_ENTRIES))
            .await?;
        let referers = self
            .breakdown(link_id, ClickDimension::Referer, Some(TOP_BREAKDOWN_ENTRIES))
            .await?;
        let device_types = self.breakdown(link_id, ClickDimension::Device, None).await?;

        Ok(ClickStats {
            total_clicks,
            last_30_days,
            daily_clicks,
            countries,
            referers,
            device_types,
        })
    }

    /// Builds the account-wide summary for `owner_id`.
    #[tracing::instrument(skip(self))]
    pub async fn get_user_analytics(&self, owner_id: i64) -> Result<UserAnalytics, AppError> {
        let total_links = self.repository.count_owner_links(owner_id).await?;
        let total_clicks = self.repository.count_owner_clicks(owner_id, None).await?;
        let clicks_this_month = self
            .repository
            .count_owner_clicks(owner_id, Some(month_start(Utc::now())))
            .await?;

        Ok(UserAnalytics {
            total_links,
            total_clicks,
            clicks_this_month,
        })
    }

    async fn breakdown(
        &self,
        link_id: i64,
        dimension: ClickDimension,
        limit: Option<i64>,
    ) -> Result<Vec<CountBucket>, AppError> {
        let mut buckets: Vec<CountBucket> = Vec::new();
        for group in self.repository.breakdown(link_id, dimension, limit).await? {
            let label = group
                .key
                .unwrap_or_else(|| dimension.unset_label().to_string());
            // A stored value equal to the unset label shares its bucket.
            match buckets.iter_mut().find(|bucket| bucket.label == label) {
                Some(bucket) => bucket.count += group.count,
                None => buckets.push(CountBucket {
                    label,
                    count: group.count,
                }),
            }
        }

        buckets.sort_by(|a, b| {
            Reverse(a.count)
                .cmp(&Reverse(b.count))
                .then_with(|| a.label.cmp(&b.label))
        });

        Ok(buckets)
    }
}

#[async_trait]
impl<R: AnalyticsRepository + 'static> ClickSink for ClickTracker<R> {
    async fn track_click(&self, event: ClickEvent) -> Result<Click, AppError> {
        ClickTracker::track_click(self, event).await
    }

    async fn flush(&self) {
        self.drain_pending().await;
    }
}

fn log_upsert_outcome(result: Result<(), JoinError>) {
    if let Err(e) = result {
        metrics::counter!("daily_aggregate_failed_total").increment(1);
        tracing::error!("Daily aggregate task failed: {}", e);
    }
}

/// Start of the rolling stats window ending at `now`.
pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(STATS_WINDOW_DAYS)
}

/// 00:00 UTC on the first day of `now`'s month.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .unwrap_or_else(|| now.date_naive())
        .and_time(NaiveTime::MIN)
        .and_utc()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
