//! # Incident Handlers
//!
//! Base-tier screen. The list is fetched newest first, joined against
//! students, groups, categories and teachers in memory, then filtered.
//! The recording teacher is always the acting user.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use entity::{categories, groups, incidents, students, users};
use error::{AppError, OptionExt as _, Result, SuccessResponse};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::incidents::{CreateIncidentRequest, IncidentListResponse, UpdateIncidentRequest},
    reports::{export_csv, export_filename, filter_incidents, IncidentFilter, IncidentView, Lookup},
    AppState,
};

/// Fetches every incident newest first and joins display names.
///
/// # Errors
///
/// Returns a database error if any of the five reads fails.
pub async fn load_incident_views(state: &AppState) -> Result<Vec<IncidentView>> {
    let db = &state.db;
    let incidents = incidents::Entity::find()
        .order_by_desc(incidents::Column::CreatedAt)
        .order_by_desc(incidents::Column::Id)
        .all(db)
        .await?;

    let lookup = Lookup::new(
        &students::Entity::find().all(db).await?,
        &groups::Entity::find().all(db).await?,
        &categories::Entity::find().all(db).await?,
        &users::Entity::find().all(db).await?,
    );

    Ok(lookup.views(incidents))
}

async fn find_incident(state: &AppState, id: Uuid) -> Result<incidents::Model> {
    incidents::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .or_not_found("Incident")
}

async fn view_of(state: &AppState, incident: incidents::Model) -> Result<IncidentView> {
    let id = incident.id;
    load_incident_views(state)
        .await?
        .into_iter()
        .find(|view| view.incident.id == id)
        .or_not_found("Incident")
}

/// Checks that the student and category an incident points at exist.
async fn require_references(state: &AppState, student_id: Uuid, category_id: Uuid) -> Result<()> {
    if students::Entity::find_by_id(student_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        return Err(AppError::constraint(format!("Student {} does not exist", student_id)));
    }
    if categories::Entity::find_by_id(category_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        return Err(AppError::constraint(format!("Category {} does not exist", category_id)));
    }
    Ok(())
}

/// Lists incidents newest first, narrowed by `filter`
pub async fn list_incidents_handler(state: &AppState, filter: IncidentFilter) -> Result<Json<IncidentListResponse>> {
    let all = load_incident_views(state).await?;
    let incidents = filter_incidents(&all, &filter);

    Ok(Json(IncidentListResponse {
        success: true,
        total: incidents.len(),
        filter,
        incidents,
    }))
}

/// Records an incident
///
/// # Arguments
///
/// * `state` - Application state
/// * `actor` - The acting user, stored as the incident's teacher
/// * `req` - Validated request body
///
/// # Errors
///
/// Returns `ConstraintViolation` if the student or category does not exist.
pub async fn create_incident_handler(
    state: &AppState,
    actor: Uuid,
    req: CreateIncidentRequest,
) -> Result<(StatusCode, Json<IncidentView>)> {
    require_references(state, req.student_id, req.category_id).await?;

    let incident = incidents::ActiveModel {
        id:          Set(Uuid::new_v4()),
        student_id:  Set(req.student_id),
        category_id: Set(req.category_id),
        severity:    Set(req.severity),
        description: Set(req.description.trim().to_string()),
        date:        Set(req.date),
        teacher_id:  Set(actor),
        created_at:  Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    info!(
        incident_id = %incident.id,
        teacher_id = %actor,
        severity = %incident.severity,
        "Incident recorded"
    );

    Ok((StatusCode::CREATED, Json(view_of(state, incident).await?)))
}

/// Applies a partial update; the teacher and timestamps never change.
pub async fn update_incident_handler(
    state: &AppState,
    id: Uuid,
    req: UpdateIncidentRequest,
) -> Result<Json<IncidentView>> {
    let incident = find_incident(state, id).await?;
    require_references(
        state,
        req.student_id.unwrap_or(incident.student_id),
        req.category_id.unwrap_or(incident.category_id),
    )
    .await?;

    let mut active = incident.clone().into_active_model();
    if let Some(student_id) = req.student_id {
        active.student_id = Set(student_id);
    }
    if let Some(category_id) = req.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(severity) = req.severity {
        active.severity = Set(severity);
    }
    if let Some(description) = req.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(date) = req.date {
        active.date = Set(date);
    }
    let incident = if active.is_changed() {
        active.update(&state.db).await?
    }
    else {
        incident
    };

    info!(incident_id = %id, "Incident updated");

    Ok(Json(view_of(state, incident).await?))
}

pub async fn delete_incident_handler(state: &AppState, id: Uuid) -> Result<Json<SuccessResponse>> {
    find_incident(state, id).await?;
    incidents::Entity::delete_by_id(id).exec(&state.db).await?;
    info!(incident_id = %id, "Incident deleted");

    Ok(Json(SuccessResponse::ok("Incident deleted")))
}

/// Downloads the filtered list as CSV
pub async fn export_incidents_handler(state: &AppState, filter: IncidentFilter) -> Result<Response> {
    let all = load_incident_views(state).await?;
    let incidents = filter_incidents(&all, &filter);
    let body = export_csv(&incidents);
    let filename = export_filename(Utc::now().date_naive());

    info!(rows = incidents.len(), filename = %filename, "Incidents exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}
