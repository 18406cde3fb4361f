//! Register Use Case
//!
//! Two-record registration with compensating rollback. The credential and
//! profile stores support independent single-record writes only, so when
//! the profile insert fails after the credential committed, the credential
//! is deleted before the error surfaces. A failed rollback is escalated as
//! `RollbackFailed` — callers must be able to tell "failed cleanly" from
//! "failed and left an orphan credential record".

use std::sync::Arc;

use platform::clock::Clock;
use platform::password::ClearTextPassword;

use crate::domain::entity::{credential::Credential, profile::Profile};
use crate::domain::repository::{CredentialRepository, ProfileRepository};
use crate::domain::value_object::{Email, LoginName};
use crate::error::{AuthError, AuthResult};

/// Registration input
pub struct RegisterInput {
    pub login_name: String,
    pub email: String,
    pub password: String,
}

/// Registration output
#[derive(Debug)]
pub struct RegisterOutput {
    pub identity: String,
    pub login_name: String,
    pub email: String,
    pub display_name: String,
}

/// Register use case
pub struct RegisterUseCase<C, P>
where
    C: CredentialRepository,
    P: ProfileRepository,
{
    credentials: Arc<C>,
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<C, P> RegisterUseCase<C, P>
where
    C: CredentialRepository,
    P: ProfileRepository,
{
    pub fn new(credentials: Arc<C>, profiles: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            credentials,
            profiles,
            clock,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let login_name =
            LoginName::new(&input.login_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let email = Email::new(&input.email)?;
        let password =
            ClearTextPassword::new(input.password).map_err(|e| AuthError::Validation(e.to_string()))?;

        // Duplicate checks before any write; the store-level unique
        // constraints still back this up against concurrent registration.
        if self
            .credentials
            .find_by_login_name(&login_name)
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateIdentity {
                field: "login_name",
            });
        }
        if self.credentials.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateIdentity { field: "email" });
        }

        let password_hash = password
            .hash()
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let now = self.clock.now();
        let credential = Credential::new(login_name, email, password_hash, now);
        let profile = Profile::new(credential.account_id, credential.login_name.original(), now);

        self.credentials.insert(&credential).await?;

        if let Err(profile_err) = self.profiles.insert(&profile).await {
            tracing::warn!(
                identity = %credential.account_id,
                error = %profile_err,
                "Profile creation failed, rolling back credential"
            );

            // Compensating delete; its own failure leaves an orphan and is
            // escalated rather than swallowed.
            if let Err(rollback_err) = self.credentials.delete_by_id(&credential.account_id).await {
                tracing::error!(
                    identity = %credential.account_id,
                    error = %rollback_err,
                    "Rollback failed, orphan credential record left behind"
                );
                return Err(AuthError::RollbackFailed {
                    identity: credential.account_id.to_string(),
                });
            }

            return Err(AuthError::ProfileCreationFailed);
        }

        tracing::info!(
            identity = %credential.account_id,
            login_name = %credential.login_name,
            "User registered"
        );

        Ok(RegisterOutput {
            identity: credential.account_id.to_string(),
            login_name: credential.login_name.original().to_string(),
            email: credential.email.as_str().to_string(),
            display_name: profile.display_name,
        })
    }
}
