//! Link lifecycle service: creation, lookup, listing, update and deletion.

use std::sync::Arc;

use serde_json::json;

use crate::application::services::CodeAllocator;
use crate::domain::entities::{Link, LinkChanges, LinkDraft, NewLink};
use crate::domain::repositories::{LinkListQuery, LinkRepository, UserRepository};
use crate::error::AppError;
use crate::utils::code_generator::MAX_CODE_ATTEMPTS;
use crate::utils::url_normalizer::normalize_destination;

/// Default page size for link listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound for a single page of links.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Service for creating and managing an account's short links.
///
/// Enforces the tier link quota, short code rules and ownership. Expiry is
/// evaluated at read time in [`Self::resolve`]; nothing here caches links.
pub struct LinkService<L: LinkRepository, U: UserRepository> {
    link_repository: Arc<L>,
    user_repository: Arc<U>,
    code_allocator: CodeAllocator<L>,
}

impl<L: LinkRepository, U: UserRepository> LinkService<L, U> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>, user_repository: Arc<U>) -> Self {
        Self {
            code_allocator: CodeAllocator::new(link_repository.clone()),
            link_repository,
            user_repository,
        }
    }

    /// Creates a link for `owner_id`.
    ///
    /// # Steps
    ///
    /// 1. Loads the owner and checks the tier link quota
    /// 2. Validates the custom code, or draws a random one
    /// 3. Normalizes the destination URL
    /// 4. Inserts the link
    ///
    /// A generated code that loses an insert race is replaced by a fresh
    /// draw; collisions found before and during insert share one budget of
    /// [`MAX_CODE_ATTEMPTS`].
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the owner does not exist
    /// - [`AppError::QuotaExceeded`] once the tier limit is reached
    /// - Custom code errors from [`CodeAllocator::validate_custom_code`];
    ///   a custom code taken by a concurrent insert also yields
    ///   [`AppError::CodeTaken`]
    /// - [`AppError::CodeExhausted`] when no free code was found
    /// - [`AppError::Storage`] on database errors
    #[tracing::instrument(skip(self, draft), fields(custom_code = draft.custom_code.is_some()))]
    pub async fn create_link(&self, owner_id: i64, draft: LinkDraft) -> Result<Link, AppError> {
        let owner = self
            .user_repository
            .find_by_id(owner_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "user_id": owner_id })))?;

        let limit = owner.link_limit();
        let link_count = self.link_repository.count_by_owner(owner_id).await?;
        if link_count >= limit {
            tracing::info!(link_count, limit, "Link quota reached");
            return Err(AppError::QuotaExceeded {
                tier: owner.subscription_tier.to_string(),
                limit,
            });
        }

        let LinkDraft {
            destination_url,
            custom_code,
            title,
            tags,
            expires_at,
        } = draft;

        let new_link = |short_code: String| NewLink {
            owner_id,
            short_code,
            destination_url: normalize_destination(&destination_url),
            title: title.clone(),
            tags: tags.clone(),
            expires_at,
        };

        let link = match custom_code {
            Some(code) => {
                self.code_allocator.validate_custom_code(&code).await?;

                match self.link_repository.create(new_link(code.clone())).await {
                    Err(AppError::Conflict { .. }) => return Err(AppError::CodeTaken { code }),
                    other => other?,
                }
            }
            None => self.create_with_generated_code(new_link).await?,
        };

        tracing::info!(link_id = link.id, short_code = %link.short_code, "Link created");

        Ok(link)
    }

    async fn create_with_generated_code<F>(&self, new_link: F) -> Result<Link, AppError>
    where
        F: Fn(String) -> NewLink,
    {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let Some(code) = self.code_allocator.try_generate().await? else {
                continue;
            };

            match self.link_repository.create(new_link(code)).await {
                Err(AppError::Conflict { .. }) => {
                    tracing::debug!(attempt, "Generated code taken by a concurrent insert");
                }
                other => return other,
            }
        }

        tracing::error!(attempts = MAX_CODE_ATTEMPTS, "Could not allocate a short code");

        Err(AppError::CodeExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Returns one of the owner's links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist and
    /// [`AppError::Forbidden`] if it belongs to another account.
    pub async fn get_link(&self, link_id: i64, owner_id: i64) -> Result<Link, AppError> {
        let link = self
            .link_repository
            .find_by_id(link_id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "link_id": link_id })))?;

        if !link.is_owned_by(owner_id) {
            return Err(AppError::forbidden(
                "Link belongs to another account",
                json!({ "link_id": link_id }),
            ));
        }

        Ok(link)
    }

    /// Public lookup by short code, regardless of owner or expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link uses the code.
    pub async fn get_link_by_code(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// Resolves a short code for redirection.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes and [`AppError::Gone`]
    /// when the link has expired.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        let link = self.get_link_by_code(code).await?;

        if link.is_expired() {
            return Err(AppError::gone(
                "Short link has expired",
                json!({ "code": code, "expired_at": link.expires_at }),
            ));
        }

        Ok(link)
    }

    /// Lists the owner's links.
    ///
    /// `limit` is clamped to `1..=100`, a negative `offset` is treated as 0
    /// and a blank search string is ignored.
    pub async fn list_links(
        &self,
        owner_id: i64,
        query: LinkListQuery,
    ) -> Result<Vec<Link>, AppError> {
        let query = LinkListQuery {
            limit: query.limit.clamp(1, MAX_PAGE_SIZE),
            offset: query.offset.max(0),
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            sort: query.sort,
        };

        self.link_repository.list_by_owner(owner_id, query).await
    }

    /// Lists the owner's links carrying `tag`, newest first.
    ///
    /// Paging is clamped the same way as in [`Self::list_links`].
    pub async fn list_links_by_tag(
        &self,
        owner_id: i64,
        tag: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Link>, AppError> {
        self.link_repository
            .list_by_tag(owner_id, tag, limit.clamp(1, MAX_PAGE_SIZE), offset.max(0))
            .await
    }

    /// Replaces the mutable fields of one of the owner's links.
    ///
    /// # Errors
    ///
    /// Same ownership errors as [`Self::get_link`].
    #[tracing::instrument(skip(self, changes))]
    pub async fn update_link(
        &self,
        link_id: i64,
        owner_id: i64,
        changes: LinkChanges,
    ) -> Result<Link, AppError> {
        self.get_link(link_id, owner_id).await?;

        let changes = LinkChanges {
            destination_url: normalize_destination(&changes.destination_url),
            ..changes
        };

        let link = self.link_repository.update(link_id, changes).await?;

        tracing::info!("Link updated");

        Ok(link)
    }

    /// Deletes one of the owner's links together with its click history.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when nothing was deleted, whether the
    /// link is missing or owned by someone else.
    #[tracing::instrument(skip(self))]
    pub async fn delete_link(&self, link_id: i64, owner_id: i64) -> Result<(), AppError> {
        let deleted = self
            .link_repository
            .delete_by_id_and_owner(link_id, owner_id)
            .await?;

        if deleted == 0 {
            return Err(AppError::not_found(
                "Link not found",
                json!({ "link_id": link_id }),
            ));
        }

        tracing::info!("Link deleted");

        Ok(())
    }

    /// Returns the owner's distinct non-empty tags in ascending byte order.
    pub async fn get_user_tags(&self, owner_id: i64) -> Result<Vec<String>, AppError> {
        let mut tags = self.link_repository.distinct_tags_by_owner(owner_id).await?;

        tags.retain(|tag| !tag.is_empty());
        tags.sort();
        tags.dedup();

        Ok(tags)
    }
}
