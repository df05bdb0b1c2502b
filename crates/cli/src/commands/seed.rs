//! # CLI Seed Command
//!
//! Executes the operator's SQL script. An empty script succeeds without
//! opening a connection; transport security follows the target host.

use std::path::Path;

use error::{AppError, Result};
use migration::seeds::{run_seeds, SqlScriptSeed};
use tracing::info;

use crate::{commands::SeedArgs, config::database_config};

/// Whether the script at `path` has nothing to run.
///
/// # Errors
///
/// Returns `NotFound` when the file does not exist.
pub async fn script_is_empty(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Err(AppError::not_found(format!(
            "Seed file not found at {}",
            path.display()
        )));
    }
    let sql = tokio::fs::read_to_string(path).await?;
    Ok(sql.trim().is_empty())
}

/// Runs the seed script
///
/// # Errors
///
/// Returns `NotFound` for a missing script, `Unavailable` when the database
/// cannot be reached, and a database error when the script fails.
pub async fn seed(args: &SeedArgs) -> Result<()> {
    let script = SqlScriptSeed::new(&args.file);

    if script_is_empty(script.path()).await? {
        info!(target: "seed", path = %script.path().display(), "Seed file is empty, nothing to do");
        return Ok(());
    }

    let config = database_config(&args.database);
    let (_, ssl_mode) = config.resolved_url()?;
    info!(
        target: "seed",
        path = %script.path().display(),
        ssl_mode = ssl_mode.map(|m| m.as_str()).unwrap_or("n/a"),
        "Running seed script"
    );

    let db = config.connect().await?;
    let outcome = run_seeds(&db, &[&script]).await;

    // Pooled connections may report a shutdown after the script finished.
    if let Err(e) = db.close().await {
        tracing::debug!(target: "seed", error = %e, "Error closing connection after seeding");
    }

    outcome?;
    info!(target: "seed", "Seed executed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use sea_orm::{ConnectionTrait, Database, DatabaseBackend, Statement};

    use super::*;

    fn temp_script(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("conducta-cli-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_missing_script_is_not_found() {
        let err = script_is_empty(Path::new("/definitely/not/here.sql"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_whitespace_script_is_empty() {
        let path = temp_script("blank.sql", "  \n\t\n");
        assert!(script_is_empty(&path).await.unwrap());
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_empty_script_never_connects() {
        let path = temp_script("noop.sql", "\n");
        let args = SeedArgs {
            file:     path.clone(),
            database: crate::commands::DatabaseArgs {
                database_url: Some("postgres://nobody@unreachable.invalid:1/none".to_string()),
            },
        };
        assert!(seed(&args).await.is_ok());
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_script_runs_against_sqlite() {
        let db_path = std::env::temp_dir().join(format!("conducta-cli-seed-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&db_path);
        let url = format!("sqlite://{}?mode=rwc", db_path.display());

        let script = temp_script(
            "seed.sql",
            "CREATE TABLE notes (body TEXT NOT NULL);\nINSERT INTO notes (body) VALUES ('seeded');",
        );
        let args = SeedArgs {
            file:     script.clone(),
            database: crate::commands::DatabaseArgs {
                database_url: Some(url.clone()),
            },
        };
        seed(&args).await.unwrap();

        let db = Database::connect(&url).await.unwrap();
        let row = db
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT body FROM notes",
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.try_get::<String>("", "body").unwrap(), "seeded");

        std::fs::remove_file(script).unwrap();
        let _ = std::fs::remove_file(db_path);
    }
}
