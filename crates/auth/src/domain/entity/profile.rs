//! Profile Entity
//!
//! Display and bio data for an account, 1:1 with a credential record via
//! the account identity. Carries no authentication-relevant invariants;
//! the registration protocol guarantees a profile never exists without
//! its credential.

use chrono::{DateTime, Utc};

use crate::domain::value_object::AccountId;

/// Social links attached to a profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialLinks {
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
}

/// Profile entity
#[derive(Debug, Clone)]
pub struct Profile {
    /// Foreign key to the credential record
    pub account_id: AccountId,
    /// Display name, seeded from the login name at registration
    pub display_name: String,
    /// Avatar URL
    pub avatar: Option<String>,
    /// Free-text bio
    pub bio: Option<String>,
    /// Social links
    pub social: SocialLinks,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create a new profile seeded with a display name
    pub fn new(account_id: AccountId, display_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            account_id,
            display_name: display_name.into(),
            avatar: None,
            bio: None,
            social: SocialLinks::default(),
            created_at: now,
            updated_at: now,
        }
    }
}
