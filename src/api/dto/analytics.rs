//! DTOs for analytics endpoints.

use chrono::NaiveDate;
use serde::Serialize;

use crate::application::services::{ClickStats, CountBucket, UserAnalytics};

/// Response of `GET /api/v1/links/{id}/stats`.
#[derive(Debug, Serialize)]
pub struct LinkStatsResponse {
    pub link_id: i64,
    pub short_code: String,
    pub total_clicks: i64,
    pub last_30_days: i64,
    pub daily_clicks: Vec<DailyClicksItem>,
    pub countries: Vec<CountBucket>,
    pub referers: Vec<CountBucket>,
    pub device_types: Vec<CountBucket>,
}

#[derive(Debug, Serialize)]
pub struct DailyClicksItem {
    pub date: NaiveDate,
    pub clicks: i64,
}

impl LinkStatsResponse {
    pub fn new(link_id: i64, short_code: String, stats: ClickStats) -> Self {
        Self {
            link_id,
            short_code,
            total_clicks: stats.total_clicks,
            last_30_days: stats.last_30_days,
            daily_clicks: stats
                .daily_clicks
                .into_iter()
                .map(|d| DailyClicksItem {
                    date: d.date,
                    clicks: d.count,
                })
                .collect(),
            countries: stats.countries,
            referers: stats.referers,
            device_types: stats.device_types,
        }
    }
}

/// Response of `GET /api/v1/analytics`.
#[derive(Debug, Serialize)]
pub struct UserAnalyticsResponse {
    pub total_links: i64,
    pub total_clicks: i64,
    pub clicks_this_month: i64,
}

impl From<UserAnalytics> for UserAnalyticsResponse {
    fn from(analytics: UserAnalytics) -> Self {
        Self {
            total_links: analytics.total_links,
            total_clicks: analytics.total_clicks,
            clicks_this_month: analytics.clicks_this_month,
        }
    }
}
