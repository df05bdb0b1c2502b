//! # Incident Data Transfer Objects
//!
//! Includes the list filter query, where an empty parameter means "any".

use chrono::NaiveDate;
use entity::sea_orm_active_enums::Severity;
use error::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::not_blank;
use crate::reports::{IncidentFilter, IncidentView};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateIncidentRequest {
    pub student_id:  Uuid,
    pub category_id: Uuid,
    pub severity:    Severity,
    #[validate(
        length(max = 5000, message = "Description must not exceed 5000 characters"),
        custom(function = "not_blank")
    )]
    pub description: String,
    pub date:        NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateIncidentRequest {
    pub student_id:  Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub severity:    Option<Severity>,
    #[validate(
        length(max = 5000, message = "Description must not exceed 5000 characters"),
        custom(function = "not_blank")
    )]
    pub description: Option<String>,
    pub date:        Option<NaiveDate>,
}

/// Raw filter query as sent by the incidents screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IncidentFilterQuery {
    pub category:  Option<String>,
    pub severity:  Option<String>,
    pub group:     Option<String>,
    pub date_from: Option<String>,
    pub date_to:   Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn parse_uuid(field: &str, value: &Option<String>) -> Result<Option<Uuid>, AppError> {
    present(value)
        .map(|v| {
            Uuid::parse_str(v).map_err(|_| AppError::validation(format!("{}: not a valid id", field)))
        })
        .transpose()
}

fn parse_date(field: &str, value: &Option<String>) -> Result<Option<NaiveDate>, AppError> {
    present(value)
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d")
                .map_err(|_| AppError::validation(format!("{}: expected YYYY-MM-DD", field)))
        })
        .transpose()
}

impl TryFrom<IncidentFilterQuery> for IncidentFilter {
    type Error = AppError;

    fn try_from(query: IncidentFilterQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            category:  parse_uuid("category", &query.category)?,
            severity:  present(&query.severity)
                .map(|v| v.parse::<Severity>().map_err(AppError::validation))
                .transpose()?,
            group:     parse_uuid("group", &query.group)?,
            date_from: parse_date("date_from", &query.date_from)?,
            date_to:   parse_date("date_to", &query.date_to)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentListResponse {
    pub success:   bool,
    pub filter:    IncidentFilter,
    pub total:     usize,
    pub incidents: Vec<IncidentView>,
}
