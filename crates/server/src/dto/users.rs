//! # User Role Assignment Data Transfer Objects

use auth::role_label;
use chrono::{DateTime, Utc};
use entity::{roles, users};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A user with their current role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id:           Uuid,
    pub email:        String,
    pub display_name: String,
    pub school_role:  Option<String>,
    pub role_id:      Uuid,
    /// Stored role name, verbatim
    pub role_name:    Option<String>,
    pub role_label:   Option<String>,
    pub created_at:   DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleResponse {
    pub id:    Uuid,
    pub name:  String,
    pub label: String,
}

/// Request to assign a role to a user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct AssignRoleRequest {
    pub role_id: Uuid,
}

pub fn user_model_to_response(user: users::Model, role: Option<roles::Model>) -> UserResponse {
    UserResponse {
        id:           user.id,
        email:        user.email,
        display_name: user.display_name,
        school_role:  user.school_role,
        role_id:      user.role_id,
        role_label:   role.as_ref().map(|r| role_label(&r.name)),
        role_name:    role.map(|r| r.name),
        created_at:   user.created_at,
    }
}

pub fn role_model_to_response(role: roles::Model) -> RoleResponse {
    RoleResponse {
        id:    role.id,
        label: role_label(&role.name),
        name:  role.name,
    }
}
