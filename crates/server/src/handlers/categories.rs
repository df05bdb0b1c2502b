//! # Category Handlers

use axum::{http::StatusCode, Json};
use chrono::Utc;
use entity::{categories, incidents};
use error::{AppError, OptionExt as _, Result, SuccessResponse};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;

use super::user_names;
use crate::{
    dto::{
        catalog::{category_model_to_response, CreateNamedRequest, NamedResponse, UpdateNamedRequest},
        ListResponse,
    },
    AppState,
};

async fn find_category(state: &AppState, id: Uuid) -> Result<categories::Model> {
    categories::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .or_not_found("Category")
}

pub async fn list_categories_handler(state: &AppState) -> Result<Json<ListResponse<NamedResponse>>> {
    let names = user_names(&state.db).await?;
    let items = categories::Entity::find()
        .order_by_asc(categories::Column::Name)
        .order_by_asc(categories::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|category| {
            let creator = names.get(&category.created_by).cloned();
            category_model_to_response(category, creator)
        })
        .collect();

    Ok(Json(ListResponse::new(items)))
}

pub async fn create_category_handler(
    state: &AppState,
    actor: Uuid,
    req: CreateNamedRequest,
) -> Result<(StatusCode, Json<NamedResponse>)> {
    let category = categories::ActiveModel {
        id:         Set(Uuid::new_v4()),
        name:       Set(req.name.trim().to_string()),
        created_by: Set(actor),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    info!(category_id = %category.id, created_by = %actor, "Category created");

    let names = user_names(&state.db).await?;
    let creator = names.get(&actor).cloned();
    Ok((
        StatusCode::CREATED,
        Json(category_model_to_response(category, creator)),
    ))
}

pub async fn update_category_handler(state: &AppState, id: Uuid, req: UpdateNamedRequest) -> Result<Json<NamedResponse>> {
    let category = find_category(state, id).await?;

    let category = match req.name {
        Some(name) => {
            let mut active = category.into_active_model();
            active.name = Set(name.trim().to_string());
            active.update(&state.db).await?
        },
        None => category,
    };

    info!(category_id = %id, "Category updated");

    let names = user_names(&state.db).await?;
    let creator = names.get(&category.created_by).cloned();
    Ok(Json(category_model_to_response(category, creator)))
}

/// Deletes a category no incident uses
///
/// # Errors
///
/// Returns `ConstraintViolation` while incidents reference the category.
pub async fn delete_category_handler(state: &AppState, id: Uuid) -> Result<Json<SuccessResponse>> {
    let category = find_category(state, id).await?;

    let dependents = incidents::Entity::find()
        .filter(incidents::Column::CategoryId.eq(id))
        .count(&state.db)
        .await?;
    if dependents > 0 {
        return Err(AppError::constraint(format!(
            "Category '{}' is used by {} incident(s)",
            category.name, dependents
        )));
    }

    categories::Entity::delete_by_id(id).exec(&state.db).await?;
    info!(category_id = %id, "Category deleted");

    Ok(Json(SuccessResponse::ok("Category deleted")))
}
