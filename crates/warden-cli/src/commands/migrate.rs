//! Database migration commands.

use clap::{Args, Subcommand};

use warden_core::config::AppConfig;
use warden_core::error::AppError;
use warden_database::PermissionRepository;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations and provision built-in permissions
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    let db = super::connect_db(config).await?;

    match &args.command {
        MigrateCommand::Run => {
            warden_database::migration::run_migrations(db.pool()).await?;
            let inserted = PermissionRepository::new(db.pool().clone())
                .ensure_built_in()
                .await?;
            output::print_success("All migrations applied.");
            output::print_kv("Built-in permissions added", &inserted.to_string());
        }
    }

    db.close().await;
    Ok(())
}
