//! Get User Info Use Case
//!
//! Looks up the credential summary and the profile for an account. The
//! profile may legitimately be absent only if an operator repaired a
//! partial registration by hand; the output models it as optional rather
//! than failing.

use std::sync::Arc;

use crate::domain::entity::profile::Profile;
use crate::domain::repository::{CredentialRepository, ProfileRepository};
use crate::domain::value_object::{AccountId, Role};
use crate::error::{AuthError, AuthResult};

/// User info output
#[derive(Debug)]
pub struct UserInfoOutput {
    pub identity: String,
    pub login_name: String,
    pub email: String,
    pub role: Role,
    pub profile: Option<Profile>,
}

/// Get user info use case
pub struct GetUserInfoUseCase<C, P>
where
    C: CredentialRepository,
    P: ProfileRepository,
{
    credentials: Arc<C>,
    profiles: Arc<P>,
}

impl<C, P> GetUserInfoUseCase<C, P>
where
    C: CredentialRepository,
    P: ProfileRepository,
{
    pub fn new(credentials: Arc<C>, profiles: Arc<P>) -> Self {
        Self {
            credentials,
            profiles,
        }
    }

    pub async fn execute(&self, account_id: &AccountId) -> AuthResult<UserInfoOutput> {
        let credential = self
            .credentials
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let profile = self.profiles.find_by_account_id(account_id).await?;

        Ok(UserInfoOutput {
            identity: credential.account_id.to_string(),
            login_name: credential.login_name.original().to_string(),
            email: credential.email.as_str().to_string(),
            role: credential.role,
            profile,
        })
    }
}
