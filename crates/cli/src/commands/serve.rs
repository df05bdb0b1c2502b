//! # CLI Serve Command
//!
//! Prepares the database, wires the auth provider and navigation watcher into
//! the application state, and serves the router until a shutdown signal.

use std::{net::SocketAddr, sync::Arc};

use auth::{AuthProvider, LocalAuthProvider};
use error::{AppError, Result};
use migration::{seeds::run_all_seeds, Migrator, MigratorTrait as _};
use server::{create_app_router, AppState, NavigationWatcher, ServerResult};
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    commands::ServeArgs,
    config::{database_config, jwt_config, parse_socket_addr},
};

/// Starts the API server
///
/// # Errors
///
/// Returns a config error for bad JWT or address settings, `Unavailable` when
/// the database cannot be reached, and a migration error when the schema
/// cannot be brought up to date.
pub async fn serve(args: &ServeArgs) -> Result<()> {
    let jwt = jwt_config(&args.jwt)?;
    let address = parse_socket_addr(&args.host, args.port)?;

    let db = database_config(&args.database).connect().await?;

    info!(target: "serve", "Running database migrations...");
    Migrator::up(&db, None)
        .await
        .map_err(|e| AppError::migration(format!("Failed to run database migrations: {}", e)))?;

    let seeded = run_all_seeds(&db).await?;
    info!(target: "serve", seeds = seeded.len(), "System seeds applied");

    let auth: Arc<dyn AuthProvider> = Arc::new(LocalAuthProvider::new(db.clone(), jwt));
    let watcher = NavigationWatcher::spawn(db.clone(), &auth);
    let app = create_app_router(AppState::new(db, auth));

    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| AppError::config(format!("Failed to bind to {}: {}", address, e)))?;

    let started = ServerResult::new(&address.to_string());
    info!(
        target: "serve",
        address = %started.address,
        started_at = %started.started_at,
        "Listening for HTTP requests"
    );

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    watcher.abort();
    served.map_err(|e| AppError::internal(format!("HTTP server error: {}", e)))?;

    info!(target: "serve", "Server stopped");
    Ok(())
}

/// Waits for Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(target: "serve", error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(target: "serve", error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!(target: "serve", "Shutdown signal received");
}
