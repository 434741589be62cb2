//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod logging;
pub mod password;

use serde::{Deserialize, Serialize};

pub use self::auth::{AuthConfig, MAX_ACCESS_TTL_MINUTES, MAX_REFRESH_TTL_HOURS};
pub use self::logging::LoggingConfig;
pub use self::password::PasswordPolicyConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// (base file + environment overlay + `WARDEN__*` variables).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Token issuance and key material settings.
    pub auth: AuthConfig,
    /// Password strength policy.
    #[serde(default)]
    pub password: PasswordPolicyConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// `path` is the base file (extension optional). When `env` is given,
    /// `config/{env}` is layered on top if present. Environment variables
    /// prefixed with `WARDEN__` override both, e.g.
    /// `WARDEN__AUTH__ACCESS_TOKEN_TTL_MINUTES=5`.
    pub fn load(path: &str, env: Option<&str>) -> Result<Self, AppError> {
        let mut builder =
            config::Config::builder().add_source(config::File::with_name(path).required(true));

        if let Some(env) = env {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("WARDEN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that deserialization cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=MAX_ACCESS_TTL_MINUTES).contains(&self.auth.access_token_ttl_minutes) {
            return Err(AppError::configuration(format!(
                "auth.access_token_ttl_minutes must be between 1 and {MAX_ACCESS_TTL_MINUTES}, got {}",
                self.auth.access_token_ttl_minutes
            )));
        }
        if !(1..=MAX_REFRESH_TTL_HOURS).contains(&self.auth.refresh_token_ttl_hours) {
            return Err(AppError::configuration(format!(
                "auth.refresh_token_ttl_hours must be between 1 and {MAX_REFRESH_TTL_HOURS}, got {}",
                self.auth.refresh_token_ttl_hours
            )));
        }
        if self.auth.store_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "auth.store_timeout_seconds must be positive",
            ));
        }
        if self.password.min_strength_score > 4 {
            return Err(AppError::configuration(format!(
                "password.min_strength_score must be between 0 and 4, got {}",
                self.password.min_strength_score
            )));
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(AppError::configuration(format!(
                "logging.format must be 'json' or 'pretty', got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_idle_timeout() -> u64 {
    300
}
