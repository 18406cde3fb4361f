//! Entity Module

pub mod credential;
pub mod profile;

pub use credential::Credential;
pub use profile::{Profile, SocialLinks};
