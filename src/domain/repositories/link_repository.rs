//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkChanges, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Ordering applied when listing an account's links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Newest first, ties broken by id descending.
    #[default]
    CreatedDesc,
    /// Oldest first, ties broken by id ascending.
    CreatedAsc,
    /// Most clicked first, ties broken by id ascending.
    Clicks,
}

impl SortMode {
    /// Parses a sort query value; unknown values fall back to [`SortMode::CreatedDesc`].
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "created_asc" => SortMode::CreatedAsc,
            "clicks" => SortMode::Clicks,
            _ => SortMode::CreatedDesc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::CreatedDesc => "created_desc",
            SortMode::CreatedAsc => "created_asc",
            SortMode::Clicks => "clicks",
        }
    }
}

/// Filter and paging for [`LinkRepository::list_by_owner`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinkListQuery {
    pub limit: i64,
    pub offset: i64,
    /// Case-insensitive substring matched against code, destination and title.
    pub search: Option<String>,
    pub sort: SortMode,
}

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link; storage assigns `id`, `created_at` and `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken
    /// (unique constraint). Returns [`AppError::Storage`] on other database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Finds a link by its (case-sensitive) short code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Returns true if any link currently uses `code`.
    async fn code_exists(&self, code: &str) -> Result<bool, AppError>;

    /// Lists an owner's links with paging, search and ordering.
    async fn list_by_owner(
        &self,
        owner_id: i64,
        query: LinkListQuery,
    ) -> Result<Vec<Link>, AppError>;

    /// Lists one page of an owner's links carrying `tag`, newest first.
    async fn list_by_tag(
        &self,
        owner_id: i64,
        tag: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Link>, AppError>;

    /// Counts all links owned by `owner_id`.
    async fn count_by_owner(&self, owner_id: i64) -> Result<i64, AppError>;

    /// Overwrites the mutable fields of a link and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    async fn update(&self, id: i64, changes: LinkChanges) -> Result<Link, AppError>;

    /// Deletes a link only if it belongs to `owner_id`, in a single statement.
    ///
    /// Returns the number of rows removed (0 or 1).
    async fn delete_by_id_and_owner(&self, id: i64, owner_id: i64) -> Result<u64, AppError>;

    /// Distinct, non-empty tags across the owner's links.
    async fn distinct_tags_by_owner(&self, owner_id: i64) -> Result<Vec<String>, AppError>;
}
