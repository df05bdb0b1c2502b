//! # Dashboard Handler

use axum::Json;
use error::Result;

use super::incidents::load_incident_views;
use crate::{
    reports::{aggregate, Dashboard},
    AppState,
};

/// Aggregates every incident, newest first
pub async fn dashboard_handler(state: &AppState) -> Result<Json<Dashboard>> {
    let incidents = load_incident_views(state).await?;
    let dashboard = logging::measure_duration!("dashboard", "aggregate", { aggregate(&incidents) });

    Ok(Json(dashboard))
}
