//! CLI command definitions and dispatch.

pub mod auth;
pub mod config;
pub mod migrate;
pub mod superuser;
pub mod token;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use warden_auth::{
    JwtDecoder, JwtEncoder, KeyPair, PasswordHasher, PasswordValidator, SessionManager,
};
use warden_core::config::AppConfig;
use warden_core::error::AppError;
use warden_core::traits::SystemClock;
use warden_database::{DatabasePool, UserRepository};

use crate::output::OutputFormat;

/// Warden: identity, sessions and access control
#[derive(Debug, Parser)]
#[command(name = "warden", version, about, long_about = None)]
pub struct Cli {
    /// Path to the base configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay, read from config/{env}.toml
    #[arg(short, long, env = "WARDEN_ENV")]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Superuser seeding
    Superuser(superuser::SuperuserArgs),
    /// Login, refresh and password changes
    Auth(auth::AuthArgs),
    /// Token inspection and authorization checks
    Token(token::TokenArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command against the loaded configuration.
    pub async fn execute(&self, config: Result<AppConfig, AppError>) -> Result<(), AppError> {
        match &self.command {
            Commands::Config(args) => config::execute(args, &self.config, config, self.format),
            Commands::Migrate(args) => migrate::execute(args, &config?).await,
            Commands::Superuser(args) => superuser::execute(args, &config?, self.format).await,
            Commands::Auth(args) => auth::execute(args, &config?, self.format).await,
            Commands::Token(args) => token::execute(args, &config?, self.format),
        }
    }
}

/// Helper: connect to the identity database
pub async fn connect_db(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: build a verify-only decoder from the configured public key
pub fn build_decoder(config: &AppConfig) -> Result<JwtDecoder, AppError> {
    let keys = KeyPair::load(&config.auth)?;
    Ok(JwtDecoder::new(Arc::new(keys)))
}

/// Helper: wire a session manager over the PostgreSQL user store
pub async fn build_session_manager(config: &AppConfig) -> Result<SessionManager, AppError> {
    let keys = Arc::new(KeyPair::load(&config.auth)?);
    let encoder = JwtEncoder::new(&config.auth, keys.clone())?;
    let db = connect_db(config).await?;

    Ok(SessionManager::new(
        Arc::new(UserRepository::new(db.pool().clone())),
        Arc::new(encoder),
        Arc::new(JwtDecoder::new(keys)),
        Arc::new(PasswordHasher::new()),
        Arc::new(PasswordValidator::new(&config.password)),
        Arc::new(SystemClock),
        config.auth.store_timeout(),
    ))
}

/// Helper: read a secret from the argument or prompt for it
pub fn secret_or_prompt(
    value: &Option<String>,
    prompt: &str,
    confirm: bool,
) -> Result<String, AppError> {
    if let Some(value) = value {
        return Ok(value.clone());
    }

    let mut input = dialoguer::Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Confirm password", "Passwords do not match");
    }
    input
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
