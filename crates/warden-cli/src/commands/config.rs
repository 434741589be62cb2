//! Configuration inspection commands.

use clap::{Args, Subcommand};

use warden_core::config::AppConfig;
use warden_core::error::AppError;
use warden_database::connection::redact_url;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate the configuration and the key files it names
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config_path: &str,
    config: Result<AppConfig, AppError>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&format!("Configuration '{config_path}' is invalid"));
            return Err(e);
        }
    };

    match &args.command {
        ConfigCommand::Show => {
            config.database.url = redact_url(&config.database.url);
            match format {
                OutputFormat::Json => output::print_json(&config),
                OutputFormat::Table => {
                    output::print_kv("database.url", &config.database.url);
                    output::print_kv("auth.issuer", &config.auth.issuer());
                    output::print_kv(
                        "auth.private_key_path",
                        config.auth.private_key_path.as_deref().unwrap_or("(verify only)"),
                    );
                    output::print_kv("auth.public_key_path", &config.auth.public_key_path);
                    output::print_kv(
                        "auth.access_token_ttl",
                        &format!("{} min", config.auth.access_token_ttl_minutes),
                    );
                    output::print_kv(
                        "auth.refresh_token_ttl",
                        &format!("{} h", config.auth.refresh_token_ttl_hours),
                    );
                    output::print_kv(
                        "auth.store_timeout",
                        &format!("{} s", config.auth.store_timeout_seconds),
                    );
                    output::print_kv(
                        "password.min_strength_score",
                        &config.password.min_strength_score.to_string(),
                    );
                    output::print_kv("logging.level", &config.logging.level);
                    output::print_kv("logging.format", &config.logging.format);
                }
            }
        }
        ConfigCommand::Validate => {
            config.validate()?;
            let keys = warden_auth::KeyPair::load(&config.auth)?;
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv("Issuer", &config.auth.issuer());
            output::print_kv("Can sign", &keys.can_sign().to_string());
            output::print_kv("Database", &redact_url(&config.database.url));
        }
    }

    Ok(())
}
