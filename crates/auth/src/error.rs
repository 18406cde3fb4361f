//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::AppError` system. The taxonomy deliberately keeps unknown
//! email and wrong password indistinguishable (`InvalidCredentials`);
//! `AccountLocked` is the one exception, since triggering lockout already
//! proves the account exists.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password (intentionally indistinguishable)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account is locked after too many failed attempts
    #[error("Account is temporarily locked, retry in {retry_after_secs} seconds")]
    AccountLocked {
        /// Remaining lock time, rounded up to the whole minute
        retry_after_secs: u64,
    },

    /// Registration conflicts with an existing login name or email
    #[error("{field} already exists")]
    DuplicateIdentity { field: &'static str },

    /// Profile record creation failed; the credential was rolled back
    #[error("Profile creation failed")]
    ProfileCreationFailed,

    /// Registration rollback failed, leaving an orphan credential record.
    /// A data-consistency defect requiring operator attention.
    #[error("Registration rollback failed, orphan credential {identity}")]
    RollbackFailed { identity: String },

    /// Token signature, expiry, or payload check failed
    #[error("Invalid token")]
    InvalidToken,

    /// Stored password hash could not be parsed (data corruption, not
    /// user error)
    #[error("Stored password hash is malformed")]
    HashVerification,

    /// Account not found (identity lookup, not login)
    #[error("User not found")]
    UserNotFound,

    /// Input failed value-object validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials | AuthError::InvalidToken => ErrorKind::Unauthorized,
            AuthError::AccountLocked { .. } => ErrorKind::Locked,
            AuthError::DuplicateIdentity { .. } => ErrorKind::Conflict,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::ProfileCreationFailed => ErrorKind::UnprocessableEntity,
            AuthError::RollbackFailed { .. }
            | AuthError::HashVerification
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Convert to AppError for the transport boundary
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate severity
    ///
    /// Intended for the caller boundary; the use cases already emit the
    /// error-severity events for consistency defects themselves.
    pub fn log(&self) {
        match self {
            AuthError::RollbackFailed { identity } => {
                tracing::error!(%identity, "Orphan credential record after failed rollback");
            }
            AuthError::HashVerification => {
                tracing::error!("Malformed password hash in credential store");
            }
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountLocked { retry_after_secs } => {
                tracing::warn!(retry_after_secs, "Login attempt on locked account");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            AuthError::Internal(err.to_string())
        } else {
            AuthError::Validation(err.message().to_string())
        }
    }
}
