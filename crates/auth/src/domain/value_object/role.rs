//! Role Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role
///
/// New accounts default to `User`; `Admin` is only assigned through an
/// administrative path outside this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum Role {
    #[default]
    User = 0,
    Admin = 1,
}

impl Role {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Map a stored role id back to the enum; unknown ids degrade to the
    /// least-privileged role rather than panicking on a bad row.
    #[inline]
    pub fn from_id(id: i16) -> Self {
        match id {
            1 => Role::Admin,
            0 => Role::User,
            _ => {
                tracing::error!("Invalid Role id: {}", id);
                Role::User
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
