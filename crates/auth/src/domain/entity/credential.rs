//! Credential Entity
//!
//! Authentication record for an account. Separated from the profile
//! entity to isolate sensitive data; the password hash never leaves this
//! type except as a PHC string for storage.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::lockout::LockState;
use crate::domain::value_object::{AccountId, Email, LoginName, Role};

/// Credential entity
///
/// Contains the password hash and the lockout counters. The account
/// identity is generated here at registration and is never derived from
/// user input.
#[derive(Debug, Clone)]
pub struct Credential {
    /// Stable opaque identity, shared with the profile record
    pub account_id: AccountId,
    /// Unique login handle
    pub login_name: LoginName,
    /// Unique contact email, used for login lookup
    pub email: Email,
    /// Hashed password (never logged, never returned)
    pub password_hash: HashedPassword,
    /// Role, defaults to `User`
    pub role: Role,
    /// Consecutive login failure count
    pub failed_attempts: u32,
    /// Account locked until (lazy expiry, a past value means unlocked)
    pub locked_until: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    /// Create a new credential with a freshly generated identity
    pub fn new(
        login_name: LoginName,
        email: Email,
        password_hash: HashedPassword,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id: AccountId::new(),
            login_name,
            email,
            password_hash,
            role: Role::default(),
            failed_attempts: 0,
            locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Current lockout state as a value for the pure policy
    pub fn lock_state(&self) -> LockState {
        LockState {
            failed_attempts: self.failed_attempts,
            locked_until: self.locked_until,
        }
    }

    /// Apply a lockout transition computed by the policy
    pub fn apply_lock_state(&mut self, state: LockState, now: DateTime<Utc>) {
        self.failed_attempts = state.failed_attempts;
        self.locked_until = state.locked_until;
        self.updated_at = now;
    }
}
