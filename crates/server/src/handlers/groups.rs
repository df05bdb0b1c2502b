//! # Group Handlers
//!
//! Coordinator-tier screen. A group that still has students cannot be
//! deleted.

use axum::{http::StatusCode, Json};
use chrono::Utc;
use entity::{groups, students};
use error::{AppError, OptionExt as _, Result, SuccessResponse};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;

use super::user_names;
use crate::{
    dto::{
        catalog::{group_model_to_response, CreateNamedRequest, NamedResponse, UpdateNamedRequest},
        ListResponse,
    },
    AppState,
};

async fn find_group(state: &AppState, id: Uuid) -> Result<groups::Model> {
    groups::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .or_not_found("Group")
}

/// Lists groups ordered by name
pub async fn list_groups_handler(state: &AppState) -> Result<Json<ListResponse<NamedResponse>>> {
    let names = user_names(&state.db).await?;
    let items = groups::Entity::find()
        .order_by_asc(groups::Column::Name)
        .order_by_asc(groups::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|group| {
            let creator = names.get(&group.created_by).cloned();
            group_model_to_response(group, creator)
        })
        .collect();

    Ok(Json(ListResponse::new(items)))
}

/// Creates a group owned by the acting user
///
/// # Errors
///
/// Returns `Validation` for a blank name.
pub async fn create_group_handler(
    state: &AppState,
    actor: Uuid,
    req: CreateNamedRequest,
) -> Result<(StatusCode, Json<NamedResponse>)> {
    let group = groups::ActiveModel {
        id:         Set(Uuid::new_v4()),
        name:       Set(req.name.trim().to_string()),
        created_by: Set(actor),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    info!(group_id = %group.id, created_by = %actor, "Group created");

    let names = user_names(&state.db).await?;
    let creator = names.get(&actor).cloned();
    Ok((
        StatusCode::CREATED,
        Json(group_model_to_response(group, creator)),
    ))
}

/// Renames a group
pub async fn update_group_handler(state: &AppState, id: Uuid, req: UpdateNamedRequest) -> Result<Json<NamedResponse>> {
    let group = find_group(state, id).await?;

    let group = match req.name {
        Some(name) => {
            let mut active = group.into_active_model();
            active.name = Set(name.trim().to_string());
            active.update(&state.db).await?
        },
        None => group,
    };

    info!(group_id = %id, "Group updated");

    let names = user_names(&state.db).await?;
    let creator = names.get(&group.created_by).cloned();
    Ok(Json(group_model_to_response(group, creator)))
}

/// Deletes a group with no students
///
/// # Errors
///
/// Returns `ConstraintViolation` while students still belong to the group.
pub async fn delete_group_handler(state: &AppState, id: Uuid) -> Result<Json<SuccessResponse>> {
    let group = find_group(state, id).await?;

    let dependents = students::Entity::find()
        .filter(students::Column::GroupId.eq(id))
        .count(&state.db)
        .await?;
    if dependents > 0 {
        return Err(AppError::constraint(format!(
            "Group '{}' still has {} student(s)",
            group.name, dependents
        )));
    }

    groups::Entity::delete_by_id(id).exec(&state.db).await?;
    info!(group_id = %id, "Group deleted");

    Ok(Json(SuccessResponse::ok("Group deleted")))
}
