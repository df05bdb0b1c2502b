//! # Conducta CLI
//!
//! Command-line interface for the Conducta incident tracker.
//!
//! ## Usage
//!
//! ```bash
//! conducta serve         # Start the API server (runs migrations automatically)
//! conducta migrate       # Run database migrations
//! conducta seed          # Execute seed/seed.sql against the target database
//! conducta ensure-admin  # Create and promote the local administrator
//! conducta --help        # Show help
//! ```
//!
//! A `.env` file in the working directory is loaded before arguments are
//! parsed, so every `env =` default can come from it.

mod commands;
mod config;

use clap::{CommandFactory as _, Parser};

use crate::commands::Commands;

/// Conducta - school behavior incident tracker
#[derive(Parser, Debug)]
#[command(name = "conducta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter (debug, info, warn, error, or full directives)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "CONDUCTA_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// Also write logs to this file, rotated hourly
    #[arg(long, env = "CONDUCTA_LOG_FILE")]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        commands::completions::completions(args.shell, &mut Cli::command(), &mut std::io::stdout());
        return Ok(());
    }

    let _guard = logging::init(&cli.log_level, &cli.log_format, cli.log_file.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    logging::info!(target: "app", command = cli.command.name(), "Conducta CLI starting...");

    let outcome = match &cli.command {
        Commands::Serve(args) => commands::serve::serve(args).await,
        Commands::Migrate(args) => commands::migrate::migrate(args).await,
        Commands::Seed(args) => commands::seed::seed(args).await,
        Commands::EnsureAdmin(args) => commands::ensure_admin::run(args).await,
        Commands::Validate(args) => commands::validate::validate(args),
        Commands::Completions(_) => Ok(()),
    };

    if let Err(e) = &outcome {
        logging::error!(target: "app", code = e.code(), error = %e, "Command failed");
    }
    Ok(outcome?)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from(["conducta", "serve", "--host", "127.0.0.1", "--port", "8080"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.host, "127.0.0.1");
                assert_eq!(args.port, 8080);
                assert_eq!(args.jwt.jwt_expiration, 3600);
            },
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_run_seed_alias() {
        let cli = Cli::parse_from(["conducta", "run-seed", "--file", "other.sql"]);
        match cli.command {
            Commands::Seed(args) => assert_eq!(args.file, std::path::PathBuf::from("other.sql")),
            _ => panic!("Expected Seed command"),
        }
    }

    #[test]
    fn test_ensure_admin_defaults() {
        let cli = Cli::parse_from(["conducta", "ensure-admin", "--email", "head@school.test"]);
        match cli.command {
            Commands::EnsureAdmin(args) => {
                assert_eq!(args.email, "head@school.test");
                assert_eq!(args.display_name, "Randy Llobera");
                assert_eq!(args.school_role, "Technology Professor");
            },
            _ => panic!("Expected EnsureAdmin command"),
        }
    }

    #[test]
    fn test_migrate_flags_conflict() {
        assert!(Cli::try_parse_from(["conducta", "migrate", "--dry-run", "--rollback"]).is_err());
        let cli = Cli::parse_from(["conducta", "migrate", "--rollback"]);
        assert!(matches!(cli.command, Commands::Migrate(ref args) if args.rollback));
    }

    #[test]
    fn test_completions_mention_subcommands() {
        let mut out = Vec::new();
        commands::completions::completions(clap_complete::Shell::Bash, &mut Cli::command(), &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("ensure-admin"));
    }

    #[test]
    fn test_cli_command_factory() {
        Cli::command().debug_assert();
        assert_eq!(Cli::command().get_name(), "conducta");
    }
}
