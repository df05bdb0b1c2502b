use sea_orm_migration::prelude::*;

/// Standalone sea-orm migration CLI.
///
/// Resolves `DATABASE_URL` from the Conducta database settings when it is not
/// already set.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if std::env::var("DATABASE_URL").is_err() {
        let config = migration::DatabaseConfig::from_env();
        std::env::set_var("DATABASE_URL", config.connection_url());
    }

    cli::run_cli(migration::Migrator).await;
}
