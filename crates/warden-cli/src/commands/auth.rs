//! Session commands: login, refresh, change-password.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use warden_core::config::AppConfig;
use warden_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for auth commands
#[derive(Debug, Args)]
pub struct AuthArgs {
    /// Auth subcommand
    #[command(subcommand)]
    pub command: AuthCommand,
}

/// Auth subcommands
#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Log in and print an access/refresh token pair
    Login {
        /// Login email
        #[arg(long)]
        email: String,
        /// Password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },
    /// Exchange a refresh token for a new access token
    Refresh {
        /// The refresh token
        token: String,
    },
    /// Replace a user's password
    ChangePassword {
        /// User ID
        #[arg(long)]
        user_id: Uuid,
        /// New password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },
}

/// Token display row for table output
#[derive(Debug, Serialize, Tabled)]
struct TokenRow {
    kind: &'static str,
    expires_at: String,
    token: String,
}

/// Execute auth commands
pub async fn execute(
    args: &AuthArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let manager = super::build_session_manager(config).await?;

    match &args.command {
        AuthCommand::Login { email, password } => {
            let password = super::secret_or_prompt(password, "Password", false)?;
            let pair = manager.login(email, &password).await?;

            match format {
                OutputFormat::Json => output::print_json(&pair),
                OutputFormat::Table => output::print_list(
                    &[
                        TokenRow {
                            kind: "access_token",
                            expires_at: pair.access_expires_at.to_rfc3339(),
                            token: pair.access_token.clone(),
                        },
                        TokenRow {
                            kind: "refresh_token",
                            expires_at: pair.refresh_expires_at.to_rfc3339(),
                            token: pair.refresh_token.clone(),
                        },
                    ],
                    format,
                ),
            }
        }
        AuthCommand::Refresh { token } => {
            let refreshed = manager.refresh(token).await?;

            match format {
                OutputFormat::Json => output::print_json(&refreshed),
                OutputFormat::Table => output::print_list(
                    &[TokenRow {
                        kind: "access_token",
                        expires_at: refreshed.access_expires_at.to_rfc3339(),
                        token: refreshed.access_token.clone(),
                    }],
                    format,
                ),
            }
        }
        AuthCommand::ChangePassword { user_id, password } => {
            let password = super::secret_or_prompt(password, "New password", true)?;
            manager.change_password(*user_id, &password).await?;
            output::print_success(&format!(
                "Password changed for {user_id}; refresh tokens issued earlier are now stale"
            ));
        }
    }

    Ok(())
}
