//! Login Use Case
//!
//! Authenticates an account by email + password, enforcing progressive
//! lockout and issuing the token pair on success.
//!
//! Error discipline: an unknown email and a wrong password both surface
//! as `InvalidCredentials`. `AccountLocked` is the single more-specific
//! answer, since triggering lockout already proved the account exists.
//! The lockout counters are persisted synchronously with the attempt so
//! the state survives restarts and is visible to concurrent requests as
//! soon as the write commits.

use std::sync::Arc;

use platform::clock::Clock;
use platform::password::{ClearTextPassword, PasswordHashError};

use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{Email, Role};
use crate::error::{AuthError, AuthResult};
use crate::token::{TokenIssuer, TokenPair};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub identity: String,
    pub login_name: String,
    pub email: String,
    pub role: Role,
    pub access_token: String,
    pub refresh_token: String,
}

/// Login use case
pub struct LoginUseCase<C>
where
    C: CredentialRepository,
{
    credentials: Arc<C>,
    tokens: Arc<TokenIssuer>,
    clock: Arc<dyn Clock>,
}

impl<C> LoginUseCase<C>
where
    C: CredentialRepository,
{
    pub fn new(credentials: Arc<C>, tokens: Arc<TokenIssuer>, clock: Arc<dyn Clock>) -> Self {
        Self {
            credentials,
            tokens,
            clock,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // A malformed email cannot match any account; same answer as an
        // unknown one.
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let credential = self
            .credentials
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let now = self.clock.now();
        let state = credential.lock_state();

        // Locked accounts are refused before the hasher runs
        if state.is_locked(now) {
            tracing::warn!(identity = %credential.account_id, "Login attempt on locked account");
            return Err(AuthError::AccountLocked {
                retry_after_secs: state.retry_after_secs(now),
            });
        }

        // A guess the registration policy would never have accepted cannot
        // match any stored hash; it is a mismatch and consumes lockout
        // budget like any other wrong password.
        let password_valid = match ClearTextPassword::new(input.password) {
            Ok(password) => match credential.password_hash.verify(&password) {
                Ok(valid) => valid,
                Err(PasswordHashError::InvalidHashFormat) => {
                    tracing::error!(
                        identity = %credential.account_id,
                        "Malformed password hash in credential store"
                    );
                    return Err(AuthError::HashVerification);
                }
                Err(e) => return Err(AuthError::Internal(e.to_string())),
            },
            Err(_) => false,
        };

        if !password_valid {
            let next = state.on_failure(now);
            self.credentials
                .update_counters(&credential.account_id, next.failed_attempts, next.locked_until)
                .await?;

            // The failure that trips the threshold reports the lock it
            // just engaged; earlier failures stay indistinguishable.
            return if next.locked_until.is_some() {
                tracing::warn!(identity = %credential.account_id, "Account locked after repeated failures");
                Err(AuthError::AccountLocked {
                    retry_after_secs: next.retry_after_secs(now),
                })
            } else {
                Err(AuthError::InvalidCredentials)
            };
        }

        // Success clears the counters, including a lock that expired lazily
        let next = state.on_success();
        self.credentials
            .update_counters(&credential.account_id, next.failed_attempts, next.locked_until)
            .await?;

        let TokenPair { access, refresh } = self
            .tokens
            .issue(&credential.account_id, &credential.login_name)?;

        tracing::info!(
            identity = %credential.account_id,
            login_name = %credential.login_name,
            "User logged in"
        );

        Ok(LoginOutput {
            identity: credential.account_id.to_string(),
            login_name: credential.login_name.original().to_string(),
            email: credential.email.as_str().to_string(),
            role: credential.role,
            access_token: access,
            refresh_token: refresh,
        })
    }
}
