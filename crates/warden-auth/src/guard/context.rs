//! Typed per-request authentication context.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AuthError;
use crate::jwt::{Claims, JwtDecoder};

use super::enforcer::AccessGuard;
use super::requirement::Requirement;

/// Verified identity of the caller, attached to a request once its token
/// has passed signature and expiry checks.
///
/// Only obtainable through a [`JwtDecoder`], so holding one proves the
/// claims were verified.
#[derive(Debug, Clone)]
pub struct AuthContext {
    claims: Claims,
    /// Correlates log lines of one request.
    request_id: Uuid,
}

impl AuthContext {
    /// Verifies `token` now and wraps the resulting claims.
    pub fn from_token(decoder: &JwtDecoder, token: &str) -> Result<Self, AuthError> {
        Self::from_token_at(decoder, token, Utc::now())
    }

    /// Verifies `token` against `now` and wraps the resulting claims.
    pub fn from_token_at(
        decoder: &JwtDecoder,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let claims = decoder.verify_at(token, now)?;
        Ok(Self {
            claims,
            request_id: Uuid::now_v7(),
        })
    }

    /// The verified claims.
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Subject of the token.
    pub fn user_id(&self) -> Uuid {
        self.claims.sub
    }

    /// Whether the caller bypasses tenant and permission checks.
    pub fn is_superuser(&self) -> bool {
        self.claims.is_superuser
    }

    /// Active tenants at issuance.
    pub fn tenants(&self) -> &BTreeSet<String> {
        &self.claims.tenants
    }

    /// Time-ordered ID for correlating this request's log lines.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Applies the access guard to this context.
    pub fn authorize(&self, requirement: &Requirement) -> Result<(), AuthError> {
        AccessGuard::new().require(&self.claims, requirement)
    }
}
