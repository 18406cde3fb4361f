//! Credential-Management Core
//!
//! Clean Architecture structure:
//! - `domain/` - entities, value objects, lockout policy, repository traits
//! - `application/` - use cases and configuration
//! - `infra/` - database implementations
//! - `token` - JWT issuing and verification
//!
//! ## Features
//! - Registration with compensating rollback across the credential and
//!   profile stores (no multi-record transaction assumed)
//! - Login with progressive account lockout (5 failures, 30 minutes)
//! - Short-lived access and long-lived refresh tokens signed with
//!   distinct secrets
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Unknown email and wrong password are indistinguishable to callers
//! - Lockout state persisted synchronously with each attempt
//! - All mutable state lives in the external store; the core holds no
//!   shared in-process state and never retries internally

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod token;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError};
pub use application::{
    GetUserInfoUseCase, LoginInput, LoginOutput, LoginUseCase, RegisterInput, RegisterOutput,
    RegisterUseCase, UserInfoOutput,
};
pub use domain::lockout::{LOCKOUT_MINUTES, LOCKOUT_THRESHOLD, LockState};
pub use domain::repository::{CredentialRepository, ProfileRepository};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthStore;
pub use token::{Claims, TokenIssuer, TokenPair};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
