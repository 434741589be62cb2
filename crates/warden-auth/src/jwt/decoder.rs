//! RS256 token verification.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, Validation, decode};
use tracing::debug;

use crate::error::AuthError;

use super::claims::{Claims, TokenKind};
use super::keys::KeyPair;

/// Validates tokens against the public key.
///
/// Pure: no storage lookup happens here, the embedded claims are trusted
/// as-is for the lifetime of the token.
#[derive(Clone)]
pub struct JwtDecoder {
    keys: Arc<KeyPair>,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a decoder over the shared key pair.
    pub fn new(keys: Arc<KeyPair>) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        // Expiry is checked against an explicit instant in `verify_at`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self { keys, validation }
    }

    /// Verifies a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies signature and shape, then expiry against `now`.
    ///
    /// The token is expired from `exp` onwards.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, self.keys.verifying_key(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidSignature
                }
                JwtErrorKind::ExpiredSignature => AuthError::Expired,
                JwtErrorKind::InvalidKeyFormat | JwtErrorKind::InvalidRsaKey(_) => {
                    AuthError::Key(e.to_string())
                }
                _ => {
                    debug!(error = %e, "Rejected unparseable token");
                    AuthError::Malformed
                }
            })?;

        if claims.is_expired_at(now) {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }

    /// Verifies a token and requires it to be a refresh token.
    pub fn verify_refresh_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Claims, AuthError> {
        let claims = self.verify_at(token, now)?;
        if claims.kind != TokenKind::RefreshToken {
            return Err(AuthError::WrongTokenKind {
                expected: TokenKind::RefreshToken.as_str(),
            });
        }
        Ok(claims)
    }
}
