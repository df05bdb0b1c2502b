//! # Student Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::students;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::not_blank;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(
        length(max = 255, message = "Name must not exceed 255 characters"),
        custom(function = "not_blank")
    )]
    pub name:     String,
    pub group_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateStudentRequest {
    #[validate(
        length(max = 255, message = "Name must not exceed 255 characters"),
        custom(function = "not_blank")
    )]
    pub name:     Option<String>,
    pub group_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentResponse {
    pub id:         Uuid,
    pub name:       String,
    pub group_id:   Uuid,
    pub group_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub fn student_model_to_response(student: students::Model, group_name: Option<String>) -> StudentResponse {
    StudentResponse {
        id: student.id,
        name: student.name,
        group_id: student.group_id,
        group_name,
        created_at: student.created_at,
    }
}
