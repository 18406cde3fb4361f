//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Injectable time source for deterministic tests

pub mod clock;
pub mod password;
