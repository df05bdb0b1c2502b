//! # Group and Category Data Transfer Objects
//!
//! Groups and categories share one shape: a name plus the creating user.

use chrono::{DateTime, Utc};
use entity::{categories, groups};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::not_blank;

/// Request to create a group or category
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateNamedRequest {
    #[validate(
        length(max = 255, message = "Name must not exceed 255 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,
}

/// Request to rename a group or category
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateNamedRequest {
    #[validate(
        length(max = 255, message = "Name must not exceed 255 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedResponse {
    pub id:              Uuid,
    pub name:            String,
    pub created_by:      Uuid,
    /// Display name of the creator, if the user still exists
    pub created_by_name: Option<String>,
    pub created_at:      DateTime<Utc>,
}

/// Converts a group row into a response
pub fn group_model_to_response(group: groups::Model, created_by_name: Option<String>) -> NamedResponse {
    NamedResponse {
        id: group.id,
        name: group.name,
        created_by: group.created_by,
        created_by_name,
        created_at: group.created_at,
    }
}

/// Converts a category row into a response
pub fn category_model_to_response(category: categories::Model, created_by_name: Option<String>) -> NamedResponse {
    NamedResponse {
        id: category.id,
        name: category.name,
        created_by: category.created_by,
        created_by_name,
        created_at: category.created_at,
    }
}
