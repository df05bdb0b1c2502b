//! # Conducta API Server
//!
//! Axum-based HTTP server for the Conducta incident tracker.
//!
//! ## Modules
//!
//! - [`dto`]: Request/response data transfer objects
//! - [`handlers`]: One module per screen
//! - [`middleware`]: Request logging, viewer resolution and destination gates
//! - [`reports`]: Pure filtering, dashboard aggregation and CSV export
//! - [`router`]: Route table

use std::sync::Arc;

use auth::AuthProvider;

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod listener;
pub mod middleware;
pub mod reports;
pub mod router;

pub use listener::NavigationWatcher;
pub use router::create_app_router;

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db:         sea_orm::DbConn,
    /// Session provider
    pub auth:       Arc<dyn AuthProvider>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(db: sea_orm::DbConn, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            db,
            auth,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Server initialization result
#[derive(Debug)]
pub struct ServerResult {
    /// The address the server is bound to
    pub address:    String,
    /// Server start timestamp for logging
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl ServerResult {
    /// Creates a new server result
    #[must_use]
    pub fn new(address: &str) -> Self {
        Self {
            address:    address.to_string(),
            started_at: chrono::Utc::now(),
        }
    }
}
