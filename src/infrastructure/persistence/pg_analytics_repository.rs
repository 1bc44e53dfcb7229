//! PostgreSQL implementation of analytics repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::{
    AnalyticsRepository, ClickDimension, DailyClickCount, GroupCount,
};
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    link_id: i64,
    clicked_at: DateTime<Utc>,
    ip_address: String,
    referer: Option<String>,
    user_agent: Option<String>,
    device_type: Option<String>,
    country_code: Option<String>,
}

impl From<ClickRow> for Click {
    fn from(row: ClickRow) -> Self {
        Click {
            id: row.id,
            link_id: row.link_id,
            clicked_at: row.clicked_at,
            ip_address: row.ip_address,
            referer: row.referer,
            user_agent: row.user_agent,
            device_type: row.device_type.and_then(|d| d.parse().ok()),
            country_code: row.country_code,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DailyRow {
    date: NaiveDate,
    click_count: i64,
}

#[derive(sqlx::FromRow)]
struct GroupRow {
    key: Option<String>,
    count: i64,
}

fn dimension_column(dimension: ClickDimension) -> &'static str {
    match dimension {
        ClickDimension::Country => "country_code",
        ClickDimension::Referer => "referer",
        ClickDimension::Device => "device_type",
    }
}

/// PostgreSQL repository for clicks and daily click aggregates.
///
/// Daily counters are maintained with a single `INSERT ... ON CONFLICT DO
/// UPDATE` statement, so concurrent increments of the same day never lose
/// updates.
pub struct PgAnalyticsRepository {
    pool: Arc<PgPool>,
}

impl PgAnalyticsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn insert_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO clicks (link_id, ip_address, referer, user_agent, device_type, country_code)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, link_id, clicked_at, ip_address, referer, user_agent,
                      device_type, country_code
            "#,
        )
        .bind(new_click.link_id)
        .bind(&new_click.ip_address)
        .bind(&new_click.referer)
        .bind(&new_click.user_agent)
        .bind(new_click.device_type.map(|d| d.as_str()))
        .bind(&new_click.country_code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn upsert_daily_aggregate(&self, link_id: i64, date: NaiveDate) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO link_analytics_daily (link_id, date, click_count)
            VALUES ($1, $2, 1)
            ON CONFLICT (link_id, date)
            DO UPDATE SET click_count = link_analytics_daily.click_count + 1
            "#,
        )
        .bind(link_id)
        .bind(date)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn count_clicks(
        &self,
        link_id: i64,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM clicks
            WHERE link_id = $1 AND ($2::timestamptz IS NULL OR clicked_at >= $2)
            "#,
        )
        .bind(link_id)
        .bind(since)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn daily_clicks(
        &self,
        link_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<DailyClickCount>, AppError> {
        let rows = sqlx::query_as::<_, DailyRow>(
            r#"
            SELECT date, click_count
            FROM link_analytics_daily
            WHERE link_id = $1 AND date >= $2
            ORDER BY date ASC
            "#,
        )
        .bind(link_id)
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DailyClickCount {
                date: r.date,
                count: r.click_count,
            })
            .collect())
    }

    async fn breakdown(
        &self,
        link_id: i64,
        dimension: ClickDimension,
        limit: Option<i64>,
    ) -> Result<Vec<GroupCount>, AppError> {
        let column = dimension_column(dimension);

        let rows = sqlx::query_as::<_, GroupRow>(&format!(
            r#"
            SELECT {column} AS key, COUNT(*) AS count
            FROM clicks
            WHERE link_id = $1
            GROUP BY {column}
            ORDER BY COUNT(*) DESC, COALESCE({column}, $2) ASC
            LIMIT $3
            "#
        ))
        .bind(link_id)
        .bind(dimension.unset_label())
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| GroupCount {
                key: r.key,
                count: r.count,
            })
            .collect())
    }

    async fn count_owner_links(&self, owner_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_owner_clicks(
        &self,
        owner_id: i64,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM clicks c
            JOIN links l ON l.id = c.link_id
            WHERE l.owner_id = $1 AND ($2::timestamptz IS NULL OR c.clicked_at >= $2)
            "#,
        )
        .bind(owner_id)
        .bind(since)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }
}
