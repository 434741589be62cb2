//! Offline token inspection and authorization checks.

use clap::{Args, Subcommand};
use serde::Serialize;

use warden_auth::{AccessGuard, AuthError, Claims, Decision, Requirement};
use warden_core::config::AppConfig;
use warden_core::error::AppError;

use crate::output::{self, FieldRow, OutputFormat};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Verify a token and print its claims
    Inspect {
        /// The token to verify
        token: String,
    },
    /// Verify a token and decide access to a route
    Check {
        /// The token to verify
        token: String,
        /// Accepted permission code; repeat for alternatives
        #[arg(short, long = "permission")]
        permissions: Vec<String>,
        /// Tenant the route is scoped to
        #[arg(short, long)]
        tenant: Option<String>,
    },
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    user_id: String,
    #[serde(flatten)]
    decision: Decision,
    permissions: &'a [String],
    tenant: Option<&'a str>,
}

/// Execute token commands
pub fn execute(args: &TokenArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let decoder = super::build_decoder(config)?;

    match &args.command {
        TokenCommand::Inspect { token } => {
            let claims = decoder.verify(token)?;
            output::print_fields(&claims, &claim_rows(&claims), format);
        }
        TokenCommand::Check {
            token,
            permissions,
            tenant,
        } => {
            let claims = decoder.verify(token)?;
            let mut requirement = Requirement::any_of(permissions.iter().cloned());
            if let Some(tenant) = tenant {
                requirement = requirement.in_tenant(tenant.clone());
            }

            let decision = AccessGuard::new().decide(
                &claims,
                requirement.permissions(),
                requirement.tenant(),
            );

            let report = CheckReport {
                user_id: claims.sub.to_string(),
                decision,
                permissions,
                tenant: tenant.as_deref(),
            };
            let verdict = match decision {
                Decision::Allow => "allow".to_string(),
                Decision::Deny(reason) => format!("deny ({reason})"),
            };
            output::print_fields(
                &report,
                &[
                    FieldRow::new("user_id", claims.sub),
                    FieldRow::new("decision", verdict),
                ],
                format,
            );

            decision
                .into_result()
                .map_err(|reason| AppError::from(AuthError::Denied(reason)))?;
        }
    }

    Ok(())
}

fn claim_rows(claims: &Claims) -> Vec<FieldRow> {
    let join = |set: &std::collections::BTreeSet<String>| {
        set.iter().cloned().collect::<Vec<_>>().join(", ")
    };

    vec![
        FieldRow::new("subject", claims.sub),
        FieldRow::new("type", claims.kind),
        FieldRow::new("issuer", &claims.iss),
        FieldRow::new("superuser", claims.is_superuser),
        FieldRow::new("permissions", join(&claims.permissions)),
        FieldRow::new("tenants", join(&claims.tenants)),
        FieldRow::new("issued_at", claims.issued_at().to_rfc3339()),
        FieldRow::new("expires_at", claims.expires_at().to_rfc3339()),
    ]
}
