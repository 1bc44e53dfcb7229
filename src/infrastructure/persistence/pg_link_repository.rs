//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkChanges, NewLink};
use crate::domain::repositories::{LinkListQuery, LinkRepository, SortMode};
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, owner_id, short_code, destination_url, title, tags, \
                            expires_at, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    owner_id: i64,
    short_code: String,
    destination_url: String,
    title: Option<String>,
    tags: Vec<String>,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            id: row.id,
            owner_id: row.owner_id,
            short_code: row.short_code,
            destination_url: row.destination_url,
            title: row.title,
            tags: row.tags,
            expires_at: row.expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn order_clause(sort: SortMode) -> &'static str {
    match sort {
        SortMode::CreatedDesc => "created_at DESC, id DESC",
        SortMode::CreatedAsc => "created_at ASC, id ASC",
        SortMode::Clicks => {
            "(SELECT COUNT(*) FROM clicks c WHERE c.link_id = links.id) DESC, id ASC"
        }
    }
}

/// Builds an `ILIKE` pattern matching `search` literally anywhere in a value.
fn contains_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses SQLx prepared statements for SQL injection protection. The only
/// interpolated SQL is the `ORDER BY` clause, picked from fixed strings.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            INSERT INTO links (owner_id, short_code, destination_url, title, tags, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(new_link.owner_id)
        .bind(&new_link.short_code)
        .bind(&new_link.destination_url)
        .bind(&new_link.title)
        .bind(&new_link.tags)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE short_code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM links WHERE short_code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn list_by_owner(
        &self,
        owner_id: i64,
        query: LinkListQuery,
    ) -> Result<Vec<Link>, AppError> {
        let pattern = query.search.as_deref().map(contains_pattern);

        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE owner_id = $1
              AND ($2::text IS NULL
                   OR short_code ILIKE $2
                   OR destination_url ILIKE $2
                   OR title ILIKE $2)
            ORDER BY {order}
            LIMIT $3 OFFSET $4
            "#,
            order = order_clause(query.sort)
        ))
        .bind(owner_id)
        .bind(pattern)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn list_by_tag(
        &self,
        owner_id: i64,
        tag: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE owner_id = $1 AND $2 = ANY(tags)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(owner_id)
        .bind(tag)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn count_by_owner(&self, owner_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, changes: LinkChanges) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            UPDATE links
            SET destination_url = $2, title = $3, tags = $4, expires_at = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.destination_url)
        .bind(&changes.title)
        .bind(&changes.tags)
        .bind(changes.expires_at)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::from)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "link_id": id })))
    }

    async fn delete_by_id_and_owner(&self, id: i64, owner_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn distinct_tags_by_owner(&self, owner_id: i64) -> Result<Vec<String>, AppError> {
        let tags: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT tag
            FROM links, unnest(tags) AS tag
            WHERE owner_id = $1 AND tag <> ''
            ORDER BY tag
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(tags)
    }
}
