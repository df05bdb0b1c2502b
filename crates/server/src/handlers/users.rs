//! # User Role Assignment Handlers
//!
//! Admin-tier screen listing every user with their role, and reassigning
//! roles. A reassignment is broadcast so the affected session re-evaluates
//! its navigation.

use auth::{assign_role, SessionEvent};
use axum::Json;
use entity::{roles, users};
use error::Result;
use sea_orm::{EntityTrait, QueryOrder};
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::{
        users::{role_model_to_response, user_model_to_response, AssignRoleRequest, RoleResponse, UserResponse},
        ListResponse,
    },
    AppState,
};

/// Lists users newest first with their role names
pub async fn list_users_handler(state: &AppState) -> Result<Json<ListResponse<UserResponse>>> {
    let items = users::Entity::find()
        .find_also_related(roles::Entity)
        .order_by_desc(users::Column::CreatedAt)
        .order_by_asc(users::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|(user, role)| user_model_to_response(user, role))
        .collect();

    Ok(Json(ListResponse::new(items)))
}

/// Lists the assignable roles ordered by name
pub async fn list_roles_handler(state: &AppState) -> Result<Json<ListResponse<RoleResponse>>> {
    let items = roles::Entity::find()
        .order_by_asc(roles::Column::Name)
        .all(&state.db)
        .await?
        .into_iter()
        .map(role_model_to_response)
        .collect();

    Ok(Json(ListResponse::new(items)))
}

/// Assigns a role to a user
///
/// # Errors
///
/// Returns `NotFound` if the user or the role does not exist.
pub async fn assign_role_handler(
    state: &AppState,
    actor: Uuid,
    user_id: Uuid,
    req: AssignRoleRequest,
) -> Result<Json<UserResponse>> {
    let user = assign_role(&state.db, user_id, req.role_id).await?;
    let role = roles::Entity::find_by_id(user.role_id).one(&state.db).await?;

    info!(user_id = %user_id, role_id = %req.role_id, assigned_by = %actor, "User role changed");
    state.auth.publish(SessionEvent::RoleChanged {
        identity: user_id,
    });

    Ok(Json(user_model_to_response(user, role)))
}
