//! Domain Layer
//!
//! Entities, value objects, the lockout policy, and repository traits.

pub mod entity;
pub mod lockout;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{Credential, Profile};
pub use lockout::LockState;
pub use repository::{CredentialRepository, ProfileRepository};
