//! PostgreSQL Repository Implementations
//!
//! Expects a `credentials` table with unique indexes on
//! `login_name_canonical` and `email`, and a `profiles` table keyed by
//! `account_id`. Unique-constraint violations are translated into
//! `AuthError::DuplicateIdentity` so the use cases never see driver
//! errors for expected conflicts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::clock::{Clock, SystemClock};
use platform::password::HashedPassword;
use sqlx::PgPool;

use crate::domain::entity::{credential::Credential, profile::Profile, profile::SocialLinks};
use crate::domain::repository::{CredentialRepository, ProfileRepository};
use crate::domain::value_object::{AccountId, Email, LoginName, Role};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed credential + profile store
#[derive(Clone)]
pub struct PgAuthStore {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgAuthStore {
    pub fn new(pool: PgPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    /// Build with an explicit time source, matching the one injected into
    /// the use cases so `updated_at` stamps stay consistent under test.
    pub fn with_clock(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

/// Map an insert error, translating unique violations to the duplicate
/// taxonomy based on the violated constraint
fn map_insert_err(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.contains("login_name") {
                return AuthError::DuplicateIdentity {
                    field: "login_name",
                };
            }
            if constraint.contains("email") {
                return AuthError::DuplicateIdentity { field: "email" };
            }
            if constraint.contains("account_id") {
                return AuthError::DuplicateIdentity {
                    field: "account_id",
                };
            }
        }
    }
    AuthError::Database(err)
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgAuthStore {
    async fn insert(&self, credential: &Credential) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO credentials (
                account_id,
                login_name,
                login_name_canonical,
                email,
                password_hash,
                role,
                failed_attempts,
                locked_until,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(credential.account_id.as_uuid())
        .bind(credential.login_name.original())
        .bind(credential.login_name.canonical())
        .bind(credential.email.as_str())
        .bind(credential.password_hash.as_phc_string())
        .bind(credential.role.id())
        .bind(credential.failed_attempts as i32)
        .bind(credential.locked_until)
        .bind(credential.created_at)
        .bind(credential.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_err)?;

        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                account_id,
                login_name,
                email,
                password_hash,
                role,
                failed_attempts,
                locked_until,
                created_at,
                updated_at
            FROM credentials
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CredentialRow::into_credential))
    }

    async fn find_by_login_name(&self, login_name: &LoginName) -> AuthResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                account_id,
                login_name,
                email,
                password_hash,
                role,
                failed_attempts,
                locked_until,
                created_at,
                updated_at
            FROM credentials
            WHERE login_name_canonical = $1
            "#,
        )
        .bind(login_name.canonical())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CredentialRow::into_credential))
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                account_id,
                login_name,
                email,
                password_hash,
                role,
                failed_attempts,
                locked_until,
                created_at,
                updated_at
            FROM credentials
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CredentialRow::into_credential))
    }

    async fn update_counters(
        &self,
        account_id: &AccountId,
        failed_attempts: u32,
        locked_until: Option<DateTime<Utc>>,
    ) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE credentials SET
                failed_attempts = $2,
                locked_until = $3,
                updated_at = $4
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(failed_attempts as i32)
        .bind(locked_until)
        .bind(self.clock.now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_by_id(&self, account_id: &AccountId) -> AuthResult<()> {
        sqlx::query("DELETE FROM credentials WHERE account_id = $1")
            .bind(account_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Profile Repository Implementation
// ============================================================================

impl ProfileRepository for PgAuthStore {
    async fn insert(&self, profile: &Profile) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (
                account_id,
                display_name,
                avatar,
                bio,
                github,
                twitter,
                website,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(profile.account_id.as_uuid())
        .bind(&profile.display_name)
        .bind(&profile.avatar)
        .bind(&profile.bio)
        .bind(&profile.social.github)
        .bind(&profile.social.twitter)
        .bind(&profile.social.website)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_err)?;

        Ok(())
    }

    async fn find_by_account_id(&self, account_id: &AccountId) -> AuthResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT
                account_id,
                display_name,
                avatar,
                bio,
                github,
                twitter,
                website,
                created_at,
                updated_at
            FROM profiles
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRow::into_profile))
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct CredentialRow {
    account_id: uuid::Uuid,
    login_name: String,
    email: String,
    password_hash: String,
    role: i16,
    failed_attempts: i32,
    locked_until: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> Credential {
        Credential {
            account_id: AccountId::from_uuid(self.account_id),
            login_name: LoginName::from_db(self.login_name),
            email: Email::from_db(self.email),
            password_hash: HashedPassword::from_phc_string(self.password_hash),
            role: Role::from_id(self.role),
            failed_attempts: self.failed_attempts.max(0) as u32,
            locked_until: self.locked_until,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    account_id: uuid::Uuid,
    display_name: String,
    avatar: Option<String>,
    bio: Option<String>,
    github: Option<String>,
    twitter: Option<String>,
    website: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_profile(self) -> Profile {
        Profile {
            account_id: AccountId::from_uuid(self.account_id),
            display_name: self.display_name,
            avatar: self.avatar,
            bio: self.bio,
            social: SocialLinks {
                github: self.github,
                twitter: self.twitter,
                website: self.website,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
