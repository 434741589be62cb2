//! RS256 token creation with per-kind lifetimes.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, Header, encode};
use serde::{Deserialize, Serialize};

use warden_core::config::AuthConfig;
use warden_core::error::AppError;

use crate::error::AuthError;
use crate::session::AccessSnapshot;

use super::claims::{Claims, TokenKind};
use super::keys::KeyPair;

/// Creates signed access and refresh tokens.
#[derive(Debug, Clone)]
pub struct JwtEncoder {
    /// Shared key material; must hold the private half.
    keys: Arc<KeyPair>,
    /// `app_name@app_version`.
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

/// A signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWS string.
    pub token: String,
    /// The embedded claims.
    pub claims: Claims,
}

impl IssuedToken {
    /// Expiration instant of the token.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.claims.expires_at()
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// Fails when the key pair carries no private key or a lifetime does
    /// not fit in a timestamp.
    pub fn new(config: &AuthConfig, keys: Arc<KeyPair>) -> Result<Self, AuthError> {
        if !keys.can_sign() {
            return Err(AuthError::Key(
                "token issuance requires an RSA private key".to_string(),
            ));
        }

        let access_ttl = Duration::from_std(config.access_ttl()?).map_err(|e| {
            AppError::configuration(format!("access token TTL out of range: {e}"))
        })?;
        let refresh_ttl = Duration::from_std(config.refresh_ttl()?).map_err(|e| {
            AppError::configuration(format!("refresh token TTL out of range: {e}"))
        })?;

        Ok(Self {
            keys,
            issuer: config.issuer(),
            access_ttl,
            refresh_ttl,
        })
    }

    /// The issuer written into every token.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Configured lifetime for `kind`.
    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::AccessToken => self.access_ttl,
            TokenKind::RefreshToken => self.refresh_ttl,
        }
    }

    /// Issues a token of `kind` for `snapshot`, valid from `now`.
    pub fn issue(
        &self,
        snapshot: &AccessSnapshot,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let claims = Claims::new(snapshot, kind, &self.issuer, now, self.ttl(kind));
        let token = self.encode(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    /// Issues a token whose kind is given by its wire name.
    pub fn issue_named(
        &self,
        snapshot: &AccessSnapshot,
        kind: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        self.issue(snapshot, kind.parse()?, now)
    }

    /// Generates an access + refresh token pair from one snapshot and instant.
    pub fn generate_token_pair(
        &self,
        snapshot: &AccessSnapshot,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AuthError> {
        let access = self.issue(snapshot, TokenKind::AccessToken, now)?;
        let refresh = self.issue(snapshot, TokenKind::RefreshToken, now)?;

        Ok(TokenPair {
            access_expires_at: access.expires_at(),
            refresh_expires_at: refresh.expires_at(),
            access_token: access.token,
            refresh_token: refresh.token,
        })
    }

    /// Signs arbitrary claims with the private key.
    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        let key = self
            .keys
            .signing_key()
            .ok_or_else(|| AuthError::Key("no RSA private key loaded".to_string()))?;

        encode(&Header::new(Algorithm::RS256), claims, key)
            .map_err(|e| AuthError::Key(format!("failed to sign {} token: {e}", claims.kind)))
    }
}
