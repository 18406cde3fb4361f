//! Repository Traits
//!
//! Store contracts consumed by the use cases. Implementations live in the
//! infrastructure layer; the stores must enforce uniqueness on
//! `login_name` and `email` (credentials) and `account_id` (profiles) and
//! surface violations as `AuthError::DuplicateIdentity`.
//!
//! Each method is an independent single-record operation; no multi-record
//! transaction is assumed (see the registration rollback protocol).

use chrono::{DateTime, Utc};

use crate::domain::entity::{credential::Credential, profile::Profile};
use crate::domain::value_object::{AccountId, Email, LoginName};
use crate::error::AuthResult;

/// Credential store contract
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Insert a new credential record; fails on duplicate key
    async fn insert(&self, credential: &Credential) -> AuthResult<()>;

    /// Find by email (login lookup)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Credential>>;

    /// Find by canonical login name (registration pre-check)
    async fn find_by_login_name(&self, login_name: &LoginName) -> AuthResult<Option<Credential>>;

    /// Find by account identity
    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Credential>>;

    /// Persist the lockout counters for one account
    ///
    /// A single-row write; an implementation targeting stronger
    /// concurrency guarantees may realize it as a conditional increment.
    async fn update_counters(
        &self,
        account_id: &AccountId,
        failed_attempts: u32,
        locked_until: Option<DateTime<Utc>>,
    ) -> AuthResult<()>;

    /// Delete a credential record (registration rollback)
    async fn delete_by_id(&self, account_id: &AccountId) -> AuthResult<()>;
}

/// Profile store contract
#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    /// Insert a new profile record; fails on duplicate account id
    async fn insert(&self, profile: &Profile) -> AuthResult<()>;

    /// Find the profile for an account
    async fn find_by_account_id(&self, account_id: &AccountId) -> AuthResult<Option<Profile>>;
}
