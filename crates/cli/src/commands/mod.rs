//! # CLI Commands
//!
//! Argument definitions and implementations for every `conducta` subcommand.

pub mod completions;
pub mod ensure_admin;
pub mod migrate;
pub mod seed;
pub mod serve;
pub mod validate;

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Available commands for the Conducta CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the API server (runs migrations and system seeds first)
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Execute the SQL seed script against the target database
    #[command(visible_alias = "run-seed")]
    Seed(SeedArgs),

    /// Create the local administrator account if needed and promote it
    EnsureAdmin(EnsureAdminArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Verify configuration
    Validate(ValidateArgs),
}

impl Commands {
    /// Subcommand name for logs. Arguments are left out since some are secret.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Serve(_) => "serve",
            Self::Migrate(_) => "migrate",
            Self::Seed(_) => "seed",
            Self::EnsureAdmin(_) => "ensure-admin",
            Self::Completions(_) => "completions",
            Self::Validate(_) => "validate",
        }
    }
}

/// Connection override shared by every database command.
#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Full database URL; overrides the discrete CONDUCTA_DATABASE_* variables
    #[arg(long, env = "CONDUCTA_DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

/// Session token settings
#[derive(Args, Debug, Clone)]
pub struct JwtArgs {
    /// Base64-encoded signing secret (at least 32 bytes once decoded)
    #[arg(long, env = "CONDUCTA_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Token lifetime in seconds
    #[arg(long, env = "CONDUCTA_JWT_EXPIRATION", default_value = "3600")]
    pub jwt_expiration: u64,

    /// Token issuer
    #[arg(long, env = "CONDUCTA_JWT_ISSUER", default_value = "conducta")]
    pub jwt_issuer: String,

    /// Token audience
    #[arg(long, env = "CONDUCTA_JWT_AUDIENCE", default_value = "conducta")]
    pub jwt_audience: String,
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Server host to bind to
    #[arg(long, env = "CONDUCTA_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port to bind to
    #[arg(short, long, env = "CONDUCTA_PORT", default_value = "3000")]
    pub port: u16,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub jwt: JwtArgs,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// List pending migrations without applying them
    #[arg(long, conflicts_with = "rollback")]
    pub dry_run: bool,

    /// Rollback the last migration
    #[arg(long)]
    pub rollback: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Arguments for the seed command
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// SQL script to execute
    #[arg(long, env = "CONDUCTA_SEED_FILE", default_value = "seed/seed.sql")]
    pub file: PathBuf,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Arguments for the ensure-admin command
#[derive(Args, Debug)]
pub struct EnsureAdminArgs {
    /// Administrator email
    #[arg(long, env = "CONDUCTA_ADMIN_EMAIL", default_value = "admin.local@example.com")]
    pub email: String,

    /// Administrator password, used only when the account is created
    #[arg(
        long,
        env = "CONDUCTA_ADMIN_PASSWORD",
        default_value = "Passw0rd!-local",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub password: String,

    /// Display name for a newly created account
    #[arg(long, env = "CONDUCTA_ADMIN_NAME", default_value = "Randy Llobera")]
    pub display_name: String,

    /// Job title for a newly created account
    #[arg(long, env = "CONDUCTA_ADMIN_SCHOOL_ROLE", default_value = "Technology Professor")]
    pub school_role: String,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub jwt: JwtArgs,
}
