//! # CLI Migration Command
//!
//! Applies, previews or rolls back schema migrations.

use error::{AppError, Result};
use migration::{Migrator, MigratorTrait as _};
use tracing::info;

use crate::{commands::MigrateArgs, config::database_config};

/// Runs database migrations
///
/// # Arguments
///
/// * `args` - Migrate command arguments
///
/// # Errors
///
/// Returns `Unavailable` when the database cannot be reached and a migration
/// error when a step fails.
pub async fn migrate(args: &MigrateArgs) -> Result<()> {
    info!(
        target: "migrate",
        dry_run = %args.dry_run,
        rollback = %args.rollback,
        "Running database migrations..."
    );

    let db = database_config(&args.database).connect().await?;

    if args.dry_run {
        let pending = Migrator::get_pending_migrations(&db)
            .await
            .map_err(|e| AppError::migration(format!("Failed to list pending migrations: {}", e)))?;

        info!(target: "migrate", pending_count = pending.len(), "Dry run, nothing applied");
        for m in &pending {
            info!(target: "migrate", migration = %m.name(), "Would apply");
        }
        return Ok(());
    }

    if args.rollback {
        Migrator::down(&db, Some(1))
            .await
            .map_err(|e| AppError::migration(format!("Failed to roll back: {}", e)))?;
        info!(target: "migrate", "Rolled back the last migration");
        return Ok(());
    }

    Migrator::up(&db, None)
        .await
        .map_err(|e| AppError::migration(format!("Failed to run migrations: {}", e)))?;

    info!(target: "migrate", "Migrations completed successfully");
    Ok(())
}
