//! Token issuance configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest accepted access token lifetime: one day.
pub const MAX_ACCESS_TTL_MINUTES: u64 = 24 * 60;

/// Longest accepted refresh token lifetime: one year.
pub const MAX_REFRESH_TTL_HOURS: u64 = 365 * 24;

/// Token lifetimes, issuer identity and key locations.
///
/// Fixed for the lifetime of the process; key rotation happens by
/// redeploying with new files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Application name, first half of the token issuer.
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Application version, second half of the token issuer.
    #[serde(default = "default_app_version")]
    pub app_version: String,
    /// PEM file holding the RSA private key. Verifier-only processes leave it unset.
    #[serde(default)]
    pub private_key_path: Option<String>,
    /// PEM file holding the RSA public key.
    pub public_key_path: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: u64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_hours: u64,
    /// Upper bound for a single user store call, in seconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_seconds: u64,
}

impl AuthConfig {
    /// Issuer string embedded in every token: `app_name@app_version`.
    pub fn issuer(&self) -> String {
        format!("{}@{}", self.app_name, self.app_version)
    }

    /// Access token lifetime.
    pub fn access_ttl(&self) -> Result<Duration, AppError> {
        ttl_secs(
            "auth.access_token_ttl_minutes",
            self.access_token_ttl_minutes,
            60,
        )
    }

    /// Refresh token lifetime.
    pub fn refresh_ttl(&self) -> Result<Duration, AppError> {
        ttl_secs(
            "auth.refresh_token_ttl_hours",
            self.refresh_token_ttl_hours,
            3600,
        )
    }

    /// Time budget for one user store call.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_seconds)
    }
}

fn ttl_secs(field: &str, value: u64, unit_secs: u64) -> Result<Duration, AppError> {
    value
        .checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or_else(|| AppError::configuration(format!("{field} is out of range: {value}")))
}

fn default_app_name() -> String {
    "warden".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    24
}

fn default_store_timeout() -> u64 {
    5
}
