//! # Seed Data Management
//!
//! Seed providers populate reference data after migrations run:
//!
//! - [`RolesSeed`]: the three system roles, inserted idempotently.
//! - [`SqlScriptSeed`]: an operator-supplied SQL script, executed verbatim.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use ::error::{AppError, ResultExt, SeedResult};
use chrono::Utc;
use entity::roles;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

/// Names of the roles every deployment must have, lowest tier last.
pub const SYSTEM_ROLES: [&str; 3] = ["admin", "coordinator", "teacher"];

/// Trait for seed data providers
///
/// Implement this trait to provide seed data for the database.
#[async_trait::async_trait]
pub trait SeedProvider: Send + Sync {
    /// The name of this seed
    fn name(&self) -> &str;

    /// Runs the seed operation
    ///
    /// # Arguments
    ///
    /// * `db` - The database connection
    ///
    /// # Errors
    ///
    /// Returns an error if the seed operation fails.
    async fn run(&self, db: &DatabaseConnection) -> Result<SeedResult, AppError>;
}

/// Inserts any missing system role.
#[derive(Debug, Default, Clone, Copy)]
pub struct RolesSeed;

#[async_trait::async_trait]
impl SeedProvider for RolesSeed {
    fn name(&self) -> &str { "roles" }

    async fn run(&self, db: &DatabaseConnection) -> Result<SeedResult, AppError> {
        let start = Instant::now();
        let mut inserted = 0;
        let mut skipped = 0;

        for name in SYSTEM_ROLES {
            let existing = roles::Entity::find()
                .filter(roles::Column::Name.eq(name))
                .one(db)
                .await
                .context("Looking up system role")?;

            if existing.is_some() {
                skipped += 1;
                continue;
            }

            roles::ActiveModel {
                id:         Set(Uuid::new_v4()),
                name:       Set(name.to_string()),
                created_at: Set(Utc::now()),
            }
            .insert(db)
            .await
            .context("Inserting system role")?;
            inserted += 1;

            tracing::debug!(target: "seed", role = name, "Inserted system role");
        }

        Ok(SeedResult::success(
            self.name(),
            inserted,
            skipped,
            start.elapsed().as_millis() as u64,
        ))
    }
}

/// Executes a SQL script file against the database.
///
/// A missing file is an error. A file that is empty after trimming is an
/// informational no-op.
#[derive(Debug, Clone)]
pub struct SqlScriptSeed {
    path: PathBuf,
}

impl SqlScriptSeed {
    /// Creates a seed for the script at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Path of the script.
    pub fn path(&self) -> &Path { &self.path }
}

#[async_trait::async_trait]
impl SeedProvider for SqlScriptSeed {
    fn name(&self) -> &str { "sql_script" }

    async fn run(&self, db: &DatabaseConnection) -> Result<SeedResult, AppError> {
        if !self.path.is_file() {
            return Err(AppError::not_found(format!(
                "Seed file not found at {}",
                self.path.display()
            )));
        }

        let sql = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(format!("Reading {}", self.path.display()))?;
        let sql = sql.trim();

        if sql.is_empty() {
            tracing::info!(target: "seed", path = %self.path.display(), "Seed file is empty, nothing to do");
            return Ok(SeedResult::noop(self.name()));
        }

        let start = Instant::now();
        db.execute_unprepared(sql)
            .await
            .context("Executing seed script")?;

        Ok(SeedResult::success(
            self.name(),
            0,
            0,
            start.elapsed().as_millis() as u64,
        ))
    }
}

/// Runs a list of seed providers in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first provider error.
pub async fn run_seeds(db: &DatabaseConnection, seeds: &[&dyn SeedProvider]) -> Result<Vec<SeedResult>, AppError> {
    let mut results = Vec::with_capacity(seeds.len());

    for seed in seeds {
        let result = seed.run(db).await.context(format!("Seed {}", seed.name()))?;
        tracing::info!(
            target: "seed",
            seed = %result.seed_name,
            inserted = result.inserted_count,
            skipped = result.skipped_count,
            duration_ms = result.duration_ms,
            "Seed completed"
        );
        results.push(result);
    }

    Ok(results)
}

/// Runs the system seeds every deployment needs.
///
/// # Errors
///
/// Returns an error if any seed operation fails.
pub async fn run_all_seeds(db: &DatabaseConnection) -> Result<Vec<SeedResult>, AppError> {
    run_seeds(db, &[&RolesSeed]).await
}

#[cfg(test)]
mod tests {
    use sea_orm::{Database, PaginatorTrait};
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::Migrator;

    async fn setup() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("conducta-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_roles_seed_is_idempotent() {
        let db = setup().await;

        let first = RolesSeed.run(&db).await.unwrap();
        assert_eq!(first.inserted_count, 3);

        let second = RolesSeed.run(&db).await.unwrap();
        assert_eq!(second.inserted_count, 0);
        assert_eq!(second.skipped_count, 3);

        assert_eq!(roles::Entity::find().count(&db).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_empty_script_is_noop() {
        let db = setup().await;
        let path = temp_file("empty.sql", "   \n\t ");

        let result = SqlScriptSeed::new(&path).run(&db).await.unwrap();
        assert!(result.is_success());
        assert_eq!(result.inserted_count, 0);
    }

    #[tokio::test]
    async fn test_missing_script_is_not_found() {
        let db = setup().await;
        let err = SqlScriptSeed::new("/nonexistent/seed.sql")
            .run(&db)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_script_executes() {
        let db = setup().await;
        let path = temp_file(
            "roles.sql",
            "INSERT INTO roles (id, name, created_at) VALUES ('a0000000-0000-0000-0000-000000000001', 'auditor', \
             '2024-01-01T00:00:00Z');",
        );

        SqlScriptSeed::new(&path).run(&db).await.unwrap();

        let found = roles::Entity::find()
            .filter(roles::Column::Name.eq("auditor"))
            .count(&db)
            .await
            .unwrap();
        assert_eq!(found, 1);
    }

    #[tokio::test]
    async fn test_run_all_seeds() {
        let db = setup().await;
        let results = run_all_seeds(&db).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].seed_name, "roles");
    }
}
