//! Short code generation and validation utilities.
//!
//! Pure rules only: random draws and format checks. Uniqueness against
//! storage is handled by [`crate::application::services::CodeAllocator`].

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::error::AppError;

/// Alphabet used for generated codes: `a-z`, `A-Z`, `0-9`.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated codes.
pub const CODE_LENGTH: usize = 7;

/// Attempts allowed before allocation gives up with [`AppError::CodeExhausted`].
pub const MAX_CODE_ATTEMPTS: usize = 5;

pub const MIN_CUSTOM_CODE_LENGTH: usize = 3;
pub const MAX_CUSTOM_CODE_LENGTH: usize = 20;

/// Reserved codes that cannot be used as short links, compared case-insensitively.
///
/// These names collide with application routes.
pub const RESERVED_CODES: &[&str] = &[
    "api",
    "admin",
    "login",
    "signup",
    "dashboard",
    "settings",
    "analytics",
];

static CUSTOM_CODE_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("custom code regex is valid"));

/// Draws a random code of [`CODE_LENGTH`] characters.
///
/// Every character is picked uniformly from [`ALPHABET`] using the
/// thread-local CSPRNG.
///
/// # Examples
///
/// ```ignore
/// let code = random_code();
/// assert_eq!(code.len(), 7);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn random_code() -> String {
    let mut rng = rand::rng();

    (0..CODE_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Checks a user-provided custom code against the format rules.
///
/// # Rules
///
/// Checked in order, the first failure wins:
///
/// 1. Length: 3-20 bytes
/// 2. Allowed characters: ASCII letters, digits, hyphens
/// 3. Not a reserved code (case-insensitive)
///
/// # Errors
///
/// - [`AppError::InvalidCodeLength`]
/// - [`AppError::InvalidCodeCharset`]
/// - [`AppError::ReservedCode`]
///
/// # Examples
///
/// ```ignore
/// assert!(check_custom_code_format("valid-code1").is_ok());
/// assert!(check_custom_code_format("ab").is_err());       // Too short
/// assert!(check_custom_code_format("my_code!").is_err()); // Bad characters
/// assert!(check_custom_code_format("Admin").is_err());    // Reserved
/// ```
pub fn check_custom_code_format(code: &str) -> Result<(), AppError> {
    let length = code.len();
    if !(MIN_CUSTOM_CODE_LENGTH..=MAX_CUSTOM_CODE_LENGTH).contains(&length) {
        return Err(AppError::InvalidCodeLength { length });
    }

    if !CUSTOM_CODE_CHARSET.is_match(code) {
        return Err(AppError::InvalidCodeCharset {
            code: code.to_string(),
        });
    }

    if RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
    {
        return Err(AppError::ReservedCode {
            code: code.to_string(),
        });
    }

    Ok(())
}
