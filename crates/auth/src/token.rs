//! Token Issuer/Verifier
//!
//! Signs and verifies the two bearer token classes. Access and refresh
//! tokens are signed with distinct secrets so leaking one class does not
//! compromise the other; only refresh tokens carry the `class` claim, and
//! the refresh verifier rejects any token without it (an access token
//! replayed as a refresh token).
//!
//! Both verifiers fail closed: signature mismatch, expiry, and malformed
//! payloads all collapse to `InvalidToken`; the reason is logged at debug
//! level only.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use platform::clock::Clock;
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::value_object::{AccountId, LoginName};
use crate::error::{AuthError, AuthResult};

/// Class marker carried by refresh tokens
const REFRESH_CLASS: &str = "refresh";

/// Signed claims carried by both token classes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account identity
    pub sub: String,
    /// Login name as registered
    pub name: String,
    /// Token class; absent on access tokens, `"refresh"` on refresh tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject back into an account identity
    pub fn account_id(&self) -> AuthResult<AccountId> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// Access + refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Issues and verifies the two token classes
pub struct TokenIssuer {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Build from configuration with an injectable clock
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(&config.access_secret),
            access_decoding: DecodingKey::from_secret(&config.access_secret),
            refresh_encoding: EncodingKey::from_secret(&config.refresh_secret),
            refresh_decoding: DecodingKey::from_secret(&config.refresh_secret),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            clock,
        }
    }

    /// Issue an access/refresh pair for an authenticated account
    pub fn issue(&self, account_id: &AccountId, login_name: &LoginName) -> AuthResult<TokenPair> {
        let now = self.clock.now().timestamp();

        let access_claims = Claims {
            sub: account_id.to_string(),
            name: login_name.original().to_string(),
            class: None,
            iat: now,
            exp: now + self.access_ttl.as_secs() as i64,
        };
        let refresh_claims = Claims {
            class: Some(REFRESH_CLASS.to_string()),
            exp: now + self.refresh_ttl.as_secs() as i64,
            ..access_claims.clone()
        };

        let access = jsonwebtoken::encode(&Header::default(), &access_claims, &self.access_encoding)
            .map_err(|e| AuthError::Internal(format!("Token signing failed: {e}")))?;
        let refresh =
            jsonwebtoken::encode(&Header::default(), &refresh_claims, &self.refresh_encoding)
                .map_err(|e| AuthError::Internal(format!("Token signing failed: {e}")))?;

        Ok(TokenPair { access, refresh })
    }

    /// Verify an access token
    pub fn verify_access(&self, token: &str) -> AuthResult<Claims> {
        self.decode(token, &self.access_decoding)
    }

    /// Verify a refresh token, additionally checking the class claim
    pub fn verify_refresh(&self, token: &str) -> AuthResult<Claims> {
        let claims = self.decode(token, &self.refresh_decoding)?;
        if claims.class.as_deref() != Some(REFRESH_CLASS) {
            tracing::debug!("Token presented as refresh lacks the refresh class");
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }

    fn decode(&self, token: &str, key: &DecodingKey) -> AuthResult<Claims> {
        jsonwebtoken::decode::<Claims>(token, key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(reason = %e, "Token verification failed");
                AuthError::InvalidToken
            })
    }
}
