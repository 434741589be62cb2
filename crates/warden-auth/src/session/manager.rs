//! Session flows: login, refresh with staleness check, change-password.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::Clock;

use crate::error::{AuthError, AuthResult};
use crate::jwt::{Claims, JwtDecoder, JwtEncoder, TokenKind, TokenPair};
use crate::password::{PasswordHasher, PasswordValidator};
use crate::store::UserStore;

use super::snapshot::AccessSnapshot;

/// Result of a successful refresh.
///
/// The refresh token is echoed back unchanged; it is never rotated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshedToken {
    /// Newly issued access token.
    pub access_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// The refresh token that was presented.
    pub refresh_token: String,
}

/// Orchestrates credential checks and token issuance.
///
/// Holds no session state of its own: the user record's `updated_at` is
/// the only thing that revokes a refresh token.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn UserStore>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    clock: Arc<dyn Clock>,
    /// Upper bound for every store call.
    store_timeout: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("issuer", &self.encoder.issuer())
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        store: Arc<dyn UserStore>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        clock: Arc<dyn Clock>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            encoder,
            decoder,
            hasher,
            validator,
            clock,
            store_timeout,
        }
    }

    /// Performs the login flow:
    ///
    /// 1. Look up the user by email
    /// 2. Verify the password
    /// 3. Reject inactive users
    /// 4. Project roles, permissions and tenants down to active ones
    /// 5. Issue an access and a refresh token from that projection
    ///
    /// Unknown email and wrong password both yield
    /// [`AuthError::InvalidCredentials`] at the same hashing cost.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<TokenPair> {
        let user = self
            .with_timeout("find_by_email", self.store.find_by_email(email))
            .await?;

        let Some(user) = user else {
            self.hasher.verify_dummy(password);
            warn!(email = %email, "Login failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify_password(password, &user.password_hash) {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.active {
            warn!(user_id = %user.id, "Login rejected: user is inactive");
            return Err(AuthError::UserInactive);
        }

        let snapshot = AccessSnapshot::from_user(&user);
        let tokens = self
            .encoder
            .generate_token_pair(&snapshot, self.clock.now())?;

        info!(
            user_id = %user.id,
            superuser = snapshot.is_superuser,
            permissions = snapshot.permissions.len(),
            tenants = snapshot.tenants.len(),
            "User logged in"
        );

        Ok(tokens)
    }

    /// Mints a new access token from a refresh token.
    ///
    /// The user is re-read and the new token reflects its current state.
    /// Any write to the user after the refresh token was issued makes the
    /// token stale. Timestamps are compared at whole-second precision, the
    /// resolution of `iat`.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<RefreshedToken> {
        let now = self.clock.now();
        let claims = self.decoder.verify_refresh_at(refresh_token, now)?;
        let user_id = claims.user_id();

        let user = self
            .with_timeout("find_by_id", self.store.find_by_id(user_id))
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user_id, "Refresh rejected: user no longer exists");
                AuthError::UserNotFound
            })?;

        if !user.active {
            warn!(user_id = %user_id, "Refresh rejected: user is inactive");
            return Err(AuthError::UserInactive);
        }

        if user.updated_at.timestamp() > claims.iat {
            info!(
                user_id = %user_id,
                issued_at = %claims.issued_at(),
                updated_at = %user.updated_at,
                "Refresh rejected: user changed since token was issued"
            );
            return Err(AuthError::StaleToken);
        }

        let snapshot = AccessSnapshot::from_user(&user);
        let access = self.encoder.issue(&snapshot, TokenKind::AccessToken, now)?;

        info!(user_id = %user_id, "Access token refreshed");

        Ok(RefreshedToken {
            access_expires_at: access.expires_at(),
            access_token: access.token,
            refresh_token: refresh_token.to_string(),
        })
    }

    /// Verifies any token against the manager's clock.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        self.decoder.verify_at(token, self.clock.now())
    }

    /// Replaces a user's password.
    ///
    /// The write bumps `updated_at`, which makes every refresh token issued
    /// before it stale.
    pub async fn change_password(&self, user_id: Uuid, new_password: &str) -> AuthResult<()> {
        self.validator.validate(new_password)?;
        let hash = self.hasher.hash_password(new_password)?;

        let updated = self
            .with_timeout(
                "update_password",
                self.store.update_password(user_id, &hash, self.clock.now()),
            )
            .await?;

        if !updated {
            return Err(AuthError::UserNotFound);
        }

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Runs a store call under the configured timeout.
    async fn with_timeout<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = AppResult<T>>,
    ) -> AuthResult<T> {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!(operation, error = %e, "User store call failed");
                Err(AuthError::Infrastructure(e))
            }
            Err(_) => {
                error!(
                    operation,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "User store call timed out"
                );
                Err(AuthError::Infrastructure(AppError::timeout(format!(
                    "user store did not answer {operation} within {:?}",
                    self.store_timeout
                ))))
            }
        }
    }
}
