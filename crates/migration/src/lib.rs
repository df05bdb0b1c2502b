//! # Conducta Database Migrations
//!
//! Schema migrations, seed providers and connection configuration for the
//! incident tracker. Migrations are portable between PostgreSQL and SQLite.

pub use sea_orm_migration::prelude::*;

pub mod db;
mod m20241001_000001_create_roles_table;
mod m20241001_000002_create_users_table;
mod m20241001_000003_create_groups_table;
mod m20241001_000004_create_categories_table;
mod m20241001_000005_create_students_table;
mod m20241001_000006_create_incidents_table;
mod migrator;
pub mod seeds;

pub use db::{DatabaseConfig, SslMode};
pub use migrator::Migrator;
