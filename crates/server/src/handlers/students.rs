//! # Student Handlers
//!
//! Base-tier screen. Every student belongs to an existing group.

use std::collections::HashMap;

use axum::{http::StatusCode, Json};
use chrono::Utc;
use entity::{groups, incidents, students};
use error::{AppError, OptionExt as _, Result, SuccessResponse};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::{
        students::{student_model_to_response, CreateStudentRequest, StudentResponse, UpdateStudentRequest},
        ListResponse,
    },
    AppState,
};

async fn find_student(state: &AppState, id: Uuid) -> Result<students::Model> {
    students::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .or_not_found("Student")
}

/// Loads the group a student is being placed in.
///
/// # Errors
///
/// Returns `ConstraintViolation` when the group does not exist.
async fn require_group(state: &AppState, group_id: Uuid) -> Result<groups::Model> {
    groups::Entity::find_by_id(group_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::constraint(format!("Group {} does not exist", group_id)))
}

/// Lists students ordered by name, with their group names
pub async fn list_students_handler(state: &AppState) -> Result<Json<ListResponse<StudentResponse>>> {
    let groups: HashMap<Uuid, String> = groups::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|group| (group.id, group.name))
        .collect();

    let items = students::Entity::find()
        .order_by_asc(students::Column::Name)
        .order_by_asc(students::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|student| {
            let group_name = groups.get(&student.group_id).cloned();
            student_model_to_response(student, group_name)
        })
        .collect();

    Ok(Json(ListResponse::new(items)))
}

pub async fn create_student_handler(state: &AppState, req: CreateStudentRequest) -> Result<(StatusCode, Json<StudentResponse>)> {
    let group = require_group(state, req.group_id).await?;

    let student = students::ActiveModel {
        id:         Set(Uuid::new_v4()),
        name:       Set(req.name.trim().to_string()),
        group_id:   Set(group.id),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    info!(student_id = %student.id, group_id = %group.id, "Student created");

    Ok((
        StatusCode::CREATED,
        Json(student_model_to_response(student, Some(group.name))),
    ))
}

/// Applies a partial update to a student
pub async fn update_student_handler(
    state: &AppState,
    id: Uuid,
    req: UpdateStudentRequest,
) -> Result<Json<StudentResponse>> {
    let student = find_student(state, id).await?;
    let group = require_group(state, req.group_id.unwrap_or(student.group_id)).await?;

    let mut active = student.into_active_model();
    if let Some(name) = req.name {
        active.name = Set(name.trim().to_string());
    }
    if req.group_id.is_some() {
        active.group_id = Set(group.id);
    }
    let student = if active.is_changed() {
        active.update(&state.db).await?
    }
    else {
        find_student(state, id).await?
    };

    info!(student_id = %id, "Student updated");

    Ok(Json(student_model_to_response(student, Some(group.name))))
}

/// Deletes a student with no recorded incidents
///
/// # Errors
///
/// Returns `ConstraintViolation` while incidents reference the student.
pub async fn delete_student_handler(state: &AppState, id: Uuid) -> Result<Json<SuccessResponse>> {
    let student = find_student(state, id).await?;

    let dependents = incidents::Entity::find()
        .filter(incidents::Column::StudentId.eq(id))
        .count(&state.db)
        .await?;
    if dependents > 0 {
        return Err(AppError::constraint(format!(
            "Student '{}' has {} recorded incident(s)",
            student.name, dependents
        )));
    }

    students::Entity::delete_by_id(id).exec(&state.db).await?;
    info!(student_id = %id, "Student deleted");

    Ok(Json(SuccessResponse::ok("Student deleted")))
}
