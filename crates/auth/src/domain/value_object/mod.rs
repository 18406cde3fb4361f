//! Value Object Module

pub mod email;
pub mod login_name;
pub mod role;

pub use email::Email;
pub use login_name::LoginName;
pub use role::Role;

/// Stable opaque account identity, shared with the profile record
pub use kernel::id::AccountId;
