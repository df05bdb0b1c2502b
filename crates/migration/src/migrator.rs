//! # Database Migrator
//!
//! Ordered list of every schema migration.

use sea_orm_migration::prelude::*;

use crate::{
    m20241001_000001_create_roles_table,
    m20241001_000002_create_users_table,
    m20241001_000003_create_groups_table,
    m20241001_000004_create_categories_table,
    m20241001_000005_create_students_table,
    m20241001_000006_create_incidents_table,
};

/// The main migrator.
///
/// Tables are created parents first so every foreign key target exists.
///
/// # Example
///
/// ```rust,ignore
/// use migration::{Migrator, MigratorTrait};
///
/// Migrator::up(&db, None).await?;
/// ```
#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241001_000001_create_roles_table::Migration),
            Box::new(m20241001_000002_create_users_table::Migration),
            Box::new(m20241001_000003_create_groups_table::Migration),
            Box::new(m20241001_000004_create_categories_table::Migration),
            Box::new(m20241001_000005_create_students_table::Migration),
            Box::new(m20241001_000006_create_incidents_table::Migration),
        ]
    }
}
