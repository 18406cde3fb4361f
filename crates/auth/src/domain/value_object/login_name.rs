//! Login Name Value Object
//!
//! The login name is the public handle an account registers under. Input
//! is NFKC-normalized and trimmed; the case the user typed is preserved
//! for display while a lowercase canonical form is used for uniqueness.
//!
//! ## Invariants
//! - 3 to 20 characters after normalization
//! - ASCII letters, digits, and `_ . -` only
//! - Starts and ends with a letter, digit, or `_`
//! - No consecutive dots, at least one alphanumeric character

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for a login name (in characters)
pub const LOGIN_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for a login name (in characters)
pub const LOGIN_NAME_MAX_LENGTH: usize = 20;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

/// Error returned when login name validation fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginNameError {
    #[error("Login name cannot be empty")]
    Empty,

    #[error("Login name is too short ({length} chars, minimum {min})")]
    TooShort { length: usize, min: usize },

    #[error("Login name is too long ({length} chars, maximum {max})")]
    TooLong { length: usize, max: usize },

    #[error("Invalid character '{char}' at position {position}. Only a-z, 0-9, _, ., - are allowed")]
    InvalidCharacter { char: char, position: usize },

    #[error("Login name must start and end with a letter, digit, or _")]
    InvalidBoundary,

    #[error("Login name cannot contain consecutive dots (..)")]
    ConsecutiveDots,

    #[error("Login name must contain at least one letter or digit")]
    NoAlphanumeric,
}

/// Validated, normalized login name
///
/// # Storage
/// - `original`: the user's input (trimmed, NFKC normalized, case kept)
/// - `canonical`: lowercase form for uniqueness checks
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoginName {
    original: String,
    canonical: String,
}

impl LoginName {
    /// Create a new LoginName from raw input
    pub fn new(input: impl AsRef<str>) -> Result<Self, LoginNameError> {
        let normalized: String = input.as_ref().trim().nfkc().collect();

        if normalized.is_empty() {
            return Err(LoginNameError::Empty);
        }

        let length = normalized.chars().count();
        if length < LOGIN_NAME_MIN_LENGTH {
            return Err(LoginNameError::TooShort {
                length,
                min: LOGIN_NAME_MIN_LENGTH,
            });
        }
        if length > LOGIN_NAME_MAX_LENGTH {
            return Err(LoginNameError::TooLong {
                length,
                max: LOGIN_NAME_MAX_LENGTH,
            });
        }

        for (position, char) in normalized.chars().enumerate() {
            if !char.is_ascii_alphanumeric() && !ALLOWED_SPECIAL_CHARS.contains(&char) {
                return Err(LoginNameError::InvalidCharacter { char, position });
            }
        }

        let first = normalized.chars().next().ok_or(LoginNameError::Empty)?;
        let last = normalized.chars().last().ok_or(LoginNameError::Empty)?;
        if !Self::is_boundary_char(first) || !Self::is_boundary_char(last) {
            return Err(LoginNameError::InvalidBoundary);
        }

        if normalized.contains("..") {
            return Err(LoginNameError::ConsecutiveDots);
        }

        if !normalized.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(LoginNameError::NoAlphanumeric);
        }

        let canonical = normalized.to_lowercase();
        Ok(Self {
            original: normalized,
            canonical,
        })
    }

    fn is_boundary_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    /// Reconstruct from a stored value (assumed already validated)
    pub fn from_db(original: impl Into<String>) -> Self {
        let original = original.into();
        let canonical = original.to_lowercase();
        Self {
            original,
            canonical,
        }
    }

    /// The user's input as typed (case preserved)
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Lowercase canonical form used for uniqueness
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl TryFrom<String> for LoginName {
    type Error = LoginNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LoginName> for String {
    fn from(name: LoginName) -> Self {
        name.original
    }
}

impl fmt::Debug for LoginName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoginName({})", self.original)
    }
}

impl fmt::Display for LoginName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
