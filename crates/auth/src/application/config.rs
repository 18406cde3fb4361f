//! Application Configuration
//!
//! Signing secrets and token lifetimes for the auth core. The two secrets
//! are distinct by design; a missing secret is a startup-fatal condition,
//! never a per-request error.

use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the access-token secret
pub const ACCESS_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable holding the refresh-token secret
pub const REFRESH_SECRET_ENV: &str = "REFRESH_TOKEN_SECRET";

/// Configuration loading errors (fatal at startup)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not defined")]
    MissingSecret(&'static str),
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret for signing/verifying access tokens
    pub access_secret: Vec<u8>,
    /// Secret for signing/verifying refresh tokens
    pub refresh_secret: Vec<u8>,
    /// Access token lifetime (15 minutes)
    pub access_ttl: Duration,
    /// Refresh token lifetime (7 days)
    pub refresh_ttl: Duration,
}

impl AuthConfig {
    /// Default access token lifetime
    pub const ACCESS_TTL: Duration = Duration::from_secs(15 * 60);
    /// Default refresh token lifetime
    pub const REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

    /// Build from explicit secrets
    pub fn new(access_secret: Vec<u8>, refresh_secret: Vec<u8>) -> Self {
        Self {
            access_secret,
            refresh_secret,
            access_ttl: Self::ACCESS_TTL,
            refresh_ttl: Self::REFRESH_TTL,
        }
    }

    /// Load secrets from the environment
    ///
    /// Fails when either secret is absent; callers are expected to abort
    /// startup on error rather than continue without token support.
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_secret = std::env::var(ACCESS_SECRET_ENV)
            .map_err(|_| ConfigError::MissingSecret(ACCESS_SECRET_ENV))?;
        let refresh_secret = std::env::var(REFRESH_SECRET_ENV)
            .map_err(|_| ConfigError::MissingSecret(REFRESH_SECRET_ENV))?;

        Ok(Self::new(
            access_secret.into_bytes(),
            refresh_secret.into_bytes(),
        ))
    }

    /// Create config with random secrets (for development and tests)
    pub fn with_random_secrets() -> Self {
        use rand::RngCore;
        let mut access = vec![0u8; 32];
        let mut refresh = vec![0u8; 32];
        rand::rng().fill_bytes(&mut access);
        rand::rng().fill_bytes(&mut refresh);
        Self::new(access, refresh)
    }
}
