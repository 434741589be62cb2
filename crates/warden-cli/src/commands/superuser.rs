//! Superuser seeding commands.

use chrono::Utc;
use clap::{Args, Subcommand};

use warden_auth::{PasswordHasher, PasswordValidator, SuperuserSeed, seed_superuser};
use warden_core::config::AppConfig;
use warden_core::error::AppError;
use warden_database::UserRepository;

use crate::output::{self, FieldRow, OutputFormat};

/// Arguments for superuser commands
#[derive(Debug, Args)]
pub struct SuperuserArgs {
    /// Superuser subcommand
    #[command(subcommand)]
    pub command: SuperuserCommand,
}

/// Superuser subcommands
#[derive(Debug, Subcommand)]
pub enum SuperuserCommand {
    /// Create an active superuser
    Create {
        /// Login email
        #[arg(long)]
        email: String,
        /// Password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
        /// Primary phone number
        #[arg(long)]
        phone: String,
        /// Username
        #[arg(long, default_value = "super.super")]
        username: String,
        /// Given name
        #[arg(long, default_value = "Super")]
        first_name: String,
        /// Family name
        #[arg(long, default_value = "User")]
        last_name: String,
    },
}

/// Execute superuser commands
pub async fn execute(
    args: &SuperuserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        SuperuserCommand::Create {
            email,
            password,
            phone,
            username,
            first_name,
            last_name,
        } => {
            let password = super::secret_or_prompt(password, "Superuser password", true)?;
            let seed = SuperuserSeed {
                username: username.clone(),
                first_name: first_name.clone(),
                last_name: Some(last_name.clone()),
                ..SuperuserSeed::new(email.clone(), password, phone.clone())
            };

            let db = super::connect_db(config).await?;
            let store = UserRepository::new(db.pool().clone());
            let user = seed_superuser(
                &store,
                &PasswordHasher::new(),
                &PasswordValidator::new(&config.password),
                seed,
                Utc::now(),
            )
            .await?;
            db.close().await;

            output::print_fields(
                &user,
                &[
                    FieldRow::new("id", user.id),
                    FieldRow::new("username", &user.username),
                    FieldRow::new("email", &user.email),
                    FieldRow::new("created_at", user.created_at.to_rfc3339()),
                ],
                format,
            );
            if format == OutputFormat::Table {
                output::print_success(&format!("Superuser '{}' created", user.username));
            }
        }
    }

    Ok(())
}
