//! Repository-backed short code allocation.

use std::sync::Arc;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{MAX_CODE_ATTEMPTS, check_custom_code_format, random_code};

/// Hands out short codes that are free at the time of the check.
///
/// A free code can still be taken by a concurrent insert before it is used;
/// callers treat a unique violation on insert as one more failed attempt
/// (see [`crate::application::services::LinkService::create_link`]).
pub struct CodeAllocator<L: LinkRepository> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository> CodeAllocator<L> {
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Draws one random code and returns it if no link uses it yet.
    ///
    /// `Ok(None)` means the draw collided; the caller decides whether to retry.
    pub async fn try_generate(&self) -> Result<Option<String>, AppError> {
        let code = random_code();

        if self.link_repository.code_exists(&code).await? {
            tracing::debug!(code = %code, "Generated code collided");
            return Ok(None);
        }

        Ok(Some(code))
    }

    /// Generates a free random code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeExhausted`] after [`MAX_CODE_ATTEMPTS`]
    /// collisions in a row. Repository failures are returned unchanged.
    pub async fn generate_code(&self) -> Result<String, AppError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            if let Some(code) = self.try_generate().await? {
                return Ok(code);
            }
        }

        Err(AppError::CodeExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Validates a user-chosen code, format rules first and availability last.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidCodeLength`], [`AppError::InvalidCodeCharset`],
    ///   [`AppError::ReservedCode`] from the format rules
    /// - [`AppError::CodeTaken`] if a link already uses the code
    pub async fn validate_custom_code(&self, code: &str) -> Result<(), AppError> {
        check_custom_code_format(code)?;

        if self.link_repository.code_exists(code).await? {
            return Err(AppError::CodeTaken {
                code: code.to_string(),
            });
        }

        Ok(())
    }
}
